//! Collaborator interfaces consumed by the round orchestrator
//!
//! The orchestrator only talks to these traits. The in-process WebSocket
//! implementations live in `broadcast`; tests substitute recording fakes.

use crate::error::TriviaResult;
use crate::types::{ChannelId, ClipId, ParticipantId, Track};
use async_trait::async_trait;
use std::sync::Arc;

pub use crate::catalog::CatalogLoader;

/// A text destination for status messages
#[async_trait]
pub trait TextChannel: Send + Sync {
    fn id(&self) -> &str;

    async fn send(&self, text: &str) -> TriviaResult<()>;
}

/// Resolves configured channel ids to usable destinations
#[async_trait]
pub trait ChannelDirectory: Send + Sync {
    async fn text_channel(&self, id: &ChannelId) -> TriviaResult<Arc<dyn TextChannel>>;

    /// Validate that a voice destination exists
    async fn voice_channel(&self, id: &ChannelId) -> TriviaResult<ChannelId>;
}

/// Handle for one playing clip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaybackHandle {
    pub clip_id: ClipId,
    pub voice_channel: ChannelId,
}

/// Starts and stops audio delivery
#[async_trait]
pub trait PlaybackService: Send + Sync {
    async fn connect(&self, voice_channel: &ChannelId) -> TriviaResult<()>;

    async fn play(&self, track: &Track) -> TriviaResult<PlaybackHandle>;

    async fn stop(&self, handle: PlaybackHandle);

    async fn disconnect(&self);
}

/// Maps participant ids to human-readable labels
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    async fn display_name(&self, participant_id: &ParticipantId) -> Option<String>;
}

/// Everything the orchestrator needs from the outside world
#[derive(Clone)]
pub struct GameServices {
    pub catalog: Arc<dyn CatalogLoader>,
    pub channels: Arc<dyn ChannelDirectory>,
    pub playback: Arc<dyn PlaybackService>,
    pub identity: Arc<dyn IdentityResolver>,
}

impl GameServices {
    /// Label for a participant, falling back to the raw id
    pub async fn label(&self, participant_id: &ParticipantId) -> String {
        self.identity
            .display_name(participant_id)
            .await
            .unwrap_or_else(|| participant_id.clone())
    }
}
