use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type GameId = String;
pub type ParticipantId = String;
pub type ChannelId = String;
pub type ClipId = String;

/// A playable catalog entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub title: String,
    pub artist: String,
    /// Canonical answer text; catalogs may omit it, in which case the title is used
    #[serde(default)]
    pub answer: String,
    /// Opaque playable media handle
    pub preview_url: String,
}

impl Track {
    pub fn new(title: &str, artist: &str, preview_url: &str) -> Self {
        Self {
            title: title.to_string(),
            artist: artist.to_string(),
            answer: title.to_string(),
            preview_url: preview_url.to_string(),
        }
    }

    /// Answer to match guesses against
    pub fn canonical_answer(&self) -> &str {
        if self.answer.trim().is_empty() {
            &self.title
        } else {
            &self.answer
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    Starting,
    Listening,
    Intermission,
    Finished,
    Aborted,
}

/// Result of a single guess against the open round
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GuessOutcome {
    /// No round open; nothing happened
    Ignored,
    Rejected {
        similarity: u8,
    },
    AlreadyScored,
    Accepted {
        points: u32,
        first: bool,
        similarity: u8,
    },
}

impl GuessOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, GuessOutcome::Accepted { .. })
    }
}

/// Point values and acceptance threshold for one game
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoringRules {
    pub threshold: u8,
    pub first_scorer_points: u32,
    pub scorer_points: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            threshold: 80,
            first_scorer_points: 15,
            scorer_points: 10,
        }
    }
}

/// One line of the final leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Standing {
    pub rank: usize,
    pub participant_id: ParticipantId,
    pub display_name: String,
    pub points: u32,
}

/// Chat participant with a join token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub token: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Host,
    Player,
    Bot,
}
