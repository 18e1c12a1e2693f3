use crate::services::IdentityResolver;
use crate::types::*;
use async_trait::async_trait;
use rand::Rng;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Safe character set for join codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const CODE_LENGTH: usize = 5;
const MAX_DISPLAY_NAME_CHARS: usize = 32;

/// Generate a random join code (5 characters)
fn generate_short_code() -> String {
    let mut rng = rand::rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Friendly fallback name like "brave-otter"
fn generate_display_name() -> String {
    petname::petname(2, "-").unwrap_or_else(|| format!("guest-{}", generate_short_code()))
}

fn clean_display_name(name: Option<String>) -> String {
    name.map(|n| n.trim().chars().take(MAX_DISPLAY_NAME_CHARS).collect::<String>())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(generate_display_name)
}

/// Everyone who has joined the chat, keyed by opaque id.
/// Display names live only here; scoring never sees them.
#[derive(Debug, Default)]
pub struct ParticipantRegistry {
    participants: RwLock<HashMap<ParticipantId, Participant>>,
}

impl ParticipantRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new participant with a unique join code
    pub async fn join(&self, display_name: Option<String>) -> Participant {
        let mut participants = self.participants.write().await;

        let token = loop {
            let code = generate_short_code();
            if !participants.values().any(|p| p.token == code) {
                break code;
            }
        };

        let participant = Participant {
            id: ulid::Ulid::new().to_string(),
            token,
            display_name: clean_display_name(display_name),
        };

        participants.insert(participant.id.clone(), participant.clone());
        tracing::info!(
            "Participant joined: {} ({})",
            participant.display_name,
            participant.id
        );
        participant
    }

    pub async fn get_by_token(&self, token: &str) -> Option<Participant> {
        self.participants
            .read()
            .await
            .values()
            .find(|p| p.token == token)
            .cloned()
    }

    /// Change the display name of the participant owning `token`
    pub async fn rename(&self, token: &str, display_name: String) -> Option<Participant> {
        let mut participants = self.participants.write().await;
        let participant = participants.values_mut().find(|p| p.token == token)?;
        participant.display_name = clean_display_name(Some(display_name));
        Some(participant.clone())
    }

    pub async fn count(&self) -> usize {
        self.participants.read().await.len()
    }
}

#[async_trait]
impl IdentityResolver for ParticipantRegistry {
    async fn display_name(&self, participant_id: &ParticipantId) -> Option<String> {
        self.participants
            .read()
            .await
            .get(participant_id)
            .map(|p| p.display_name.clone())
    }
}
