//! Game configuration loaded from the environment

use crate::error::{TriviaError, TriviaResult};
use crate::types::{ChannelId, ScoringRules};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_ROUNDS: usize = 10;
pub const DEFAULT_LISTEN_SECONDS: u64 = 10;
pub const DEFAULT_PAUSE_SECONDS: u64 = 6;
pub const DEFAULT_START_COMMAND: &str = "!music";
// 6573 is ascii for "AI"
pub const DEFAULT_PORT: u16 = 6573;

#[derive(Debug, Clone)]
pub struct TriviaConfig {
    /// Text channel guesses are read from and status is posted to
    pub text_channel_id: ChannelId,
    /// Voice channel clips are played in
    pub voice_channel_id: ChannelId,
    pub round_count: usize,
    /// How long each round accepts guesses
    pub listen_duration: Duration,
    /// Pause between rounds
    pub pause_duration: Duration,
    pub scoring: ScoringRules,
    pub songs_path: PathBuf,
    /// Chat text that starts a new game
    pub start_command: String,
    /// Start a game as soon as the server is up. Off unless
    /// `TRIVIA_AUTO_START` is set, so a restart never starts a game nobody asked for.
    pub auto_start: bool,
    pub port: u16,
}

impl TriviaConfig {
    /// Config with defaults for everything except the channels
    pub fn new(text_channel_id: impl Into<ChannelId>, voice_channel_id: impl Into<ChannelId>) -> Self {
        Self {
            text_channel_id: text_channel_id.into(),
            voice_channel_id: voice_channel_id.into(),
            round_count: DEFAULT_ROUNDS,
            listen_duration: Duration::from_secs(DEFAULT_LISTEN_SECONDS),
            pause_duration: Duration::from_secs(DEFAULT_PAUSE_SECONDS),
            scoring: ScoringRules::default(),
            songs_path: PathBuf::from("songs.json"),
            start_command: DEFAULT_START_COMMAND.to_string(),
            auto_start: false,
            port: DEFAULT_PORT,
        }
    }

    /// Load config from environment variables
    pub fn from_env() -> TriviaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load config through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> TriviaResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text_channel_id = required(&lookup, "TRIVIA_TEXT_CHANNEL")?;
        let voice_channel_id = required(&lookup, "TRIVIA_VOICE_CHANNEL")?;
        let defaults = Self::new(text_channel_id, voice_channel_id);

        let config = Self {
            round_count: parsed(&lookup, "TRIVIA_ROUNDS", defaults.round_count)?,
            listen_duration: Duration::from_secs(parsed(
                &lookup,
                "TRIVIA_LISTEN_SECONDS",
                DEFAULT_LISTEN_SECONDS,
            )?),
            pause_duration: Duration::from_secs(parsed(
                &lookup,
                "TRIVIA_PAUSE_SECONDS",
                DEFAULT_PAUSE_SECONDS,
            )?),
            scoring: ScoringRules {
                threshold: parsed(&lookup, "TRIVIA_MATCH_THRESHOLD", defaults.scoring.threshold)?,
                first_scorer_points: parsed(
                    &lookup,
                    "TRIVIA_FIRST_POINTS",
                    defaults.scoring.first_scorer_points,
                )?,
                scorer_points: parsed(&lookup, "TRIVIA_POINTS", defaults.scoring.scorer_points)?,
            },
            songs_path: optional(&lookup, "TRIVIA_SONGS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| defaults.songs_path.clone()),
            start_command: optional(&lookup, "TRIVIA_START_COMMAND")
                .unwrap_or_else(|| defaults.start_command.clone()),
            auto_start: optional(&lookup, "TRIVIA_AUTO_START")
                .map(|v| v != "0" && v.to_lowercase() != "false")
                .unwrap_or(false),
            port: parsed(&lookup, "TRIVIA_PORT", defaults.port)?,
            ..defaults
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> TriviaResult<()> {
        if self.round_count == 0 {
            return Err(TriviaError::Configuration(
                "TRIVIA_ROUNDS must be at least 1".to_string(),
            ));
        }
        if self.listen_duration.is_zero() {
            return Err(TriviaError::Configuration(
                "TRIVIA_LISTEN_SECONDS must be at least 1".to_string(),
            ));
        }
        if self.scoring.threshold > 100 {
            return Err(TriviaError::Configuration(
                "TRIVIA_MATCH_THRESHOLD must be between 0 and 100".to_string(),
            ));
        }
        Ok(())
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

fn required<F>(lookup: &F, key: &str) -> TriviaResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| TriviaError::Configuration(format!("{} is not set", key)))
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> TriviaResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match optional(lookup, key) {
        Some(value) => value.parse().map_err(|_| {
            TriviaError::Configuration(format!("{} has an invalid value: '{}'", key, value))
        }),
        None => Ok(default),
    }
}
