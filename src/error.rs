/// Result type for game operations
pub type TriviaResult<T> = Result<T, TriviaError>;

/// Errors that can abort startup or a game session
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TriviaError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("{kind} channel not found: {id}")]
    ResourceNotFound { kind: &'static str, id: String },

    #[error("Playback connection failed: {0}")]
    ConnectionFailure(String),

    #[error("Not enough tracks in the catalog: {available} available, {required} required")]
    InsufficientCatalog { available: usize, required: usize },

    #[error("Failed to load catalog: {0}")]
    Catalog(String),

    #[error("A game is already running")]
    GameAlreadyRunning,

    #[error("Game task failed: {0}")]
    GameCrashed(String),
}

impl TriviaError {
    /// Machine-readable code used in protocol error messages
    pub fn code(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::ResourceNotFound { .. } => "RESOURCE_NOT_FOUND",
            Self::ConnectionFailure(_) => "CONNECTION_FAILURE",
            Self::InsufficientCatalog { .. } => "INSUFFICIENT_CATALOG",
            Self::Catalog(_) => "CATALOG_ERROR",
            Self::GameAlreadyRunning => "GAME_ALREADY_RUNNING",
            Self::GameCrashed(_) => "GAME_CRASHED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TriviaError::InsufficientCatalog {
            available: 5,
            required: 10,
        };
        assert_eq!(
            err.to_string(),
            "Not enough tracks in the catalog: 5 available, 10 required"
        );
        assert_eq!(err.code(), "INSUFFICIENT_CATALOG");

        let err = TriviaError::ResourceNotFound {
            kind: "Voice",
            id: "lounge".to_string(),
        };
        assert_eq!(err.to_string(), "Voice channel not found: lounge");
    }
}
