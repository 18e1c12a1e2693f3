//! In-process channel hub
//!
//! Implements the text channel, channel directory and playback services on
//! top of one tokio broadcast bus. Every WebSocket client subscribes to the
//! bus; clients filter on channel ids themselves.

use crate::config::TriviaConfig;
use crate::error::{TriviaError, TriviaResult};
use crate::protocol::ServerMessage;
use crate::services::{ChannelDirectory, PlaybackHandle, PlaybackService, TextChannel};
use crate::types::{ChannelId, Track};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex};

pub struct BroadcastHub {
    tx: broadcast::Sender<ServerMessage>,
    text_channels: HashSet<ChannelId>,
    voice_channels: HashSet<ChannelId>,
    /// Voice channel playback is currently attached to
    connected_voice: Mutex<Option<ChannelId>>,
}

impl BroadcastHub {
    pub fn new(
        tx: broadcast::Sender<ServerMessage>,
        text_channels: impl IntoIterator<Item = ChannelId>,
        voice_channels: impl IntoIterator<Item = ChannelId>,
    ) -> Self {
        Self {
            tx,
            text_channels: text_channels.into_iter().collect(),
            voice_channels: voice_channels.into_iter().collect(),
            connected_voice: Mutex::new(None),
        }
    }

    /// Hub hosting exactly the configured trivia channels
    pub fn for_config(tx: broadcast::Sender<ServerMessage>, config: &TriviaConfig) -> Self {
        Self::new(
            tx,
            [config.text_channel_id.clone()],
            [config.voice_channel_id.clone()],
        )
    }

    pub async fn connected_voice(&self) -> Option<ChannelId> {
        self.connected_voice.lock().await.clone()
    }

    fn publish(&self, msg: ServerMessage) {
        // No receivers connected is fine
        let _ = self.tx.send(msg);
    }
}

struct HubTextChannel {
    id: ChannelId,
    tx: broadcast::Sender<ServerMessage>,
}

#[async_trait]
impl TextChannel for HubTextChannel {
    fn id(&self) -> &str {
        &self.id
    }

    async fn send(&self, text: &str) -> TriviaResult<()> {
        tracing::debug!("[#{}] {}", self.id, text);
        let _ = self.tx.send(ServerMessage::ChannelMessage {
            channel_id: self.id.clone(),
            author: None,
            text: text.to_string(),
            ts: chrono::Utc::now().to_rfc3339(),
        });
        Ok(())
    }
}

#[async_trait]
impl ChannelDirectory for BroadcastHub {
    async fn text_channel(&self, id: &ChannelId) -> TriviaResult<Arc<dyn TextChannel>> {
        if !self.text_channels.contains(id) {
            return Err(TriviaError::ResourceNotFound {
                kind: "Text",
                id: id.clone(),
            });
        }

        Ok(Arc::new(HubTextChannel {
            id: id.clone(),
            tx: self.tx.clone(),
        }))
    }

    async fn voice_channel(&self, id: &ChannelId) -> TriviaResult<ChannelId> {
        if self.voice_channels.contains(id) {
            Ok(id.clone())
        } else {
            Err(TriviaError::ResourceNotFound {
                kind: "Voice",
                id: id.clone(),
            })
        }
    }
}

#[async_trait]
impl PlaybackService for BroadcastHub {
    async fn connect(&self, voice_channel: &ChannelId) -> TriviaResult<()> {
        if !self.voice_channels.contains(voice_channel) {
            return Err(TriviaError::ConnectionFailure(format!(
                "unknown voice channel {}",
                voice_channel
            )));
        }

        let mut connected = self.connected_voice.lock().await;
        if let Some(current) = connected.as_ref() {
            if current != voice_channel {
                return Err(TriviaError::ConnectionFailure(format!(
                    "already connected to voice channel {}",
                    current
                )));
            }
        }

        *connected = Some(voice_channel.clone());
        tracing::info!("Playback connected to voice channel {}", voice_channel);
        Ok(())
    }

    async fn play(&self, track: &Track) -> TriviaResult<PlaybackHandle> {
        let voice_channel = self.connected_voice.lock().await.clone().ok_or_else(|| {
            TriviaError::ConnectionFailure("not connected to a voice channel".to_string())
        })?;

        if track.preview_url.trim().is_empty() {
            return Err(TriviaError::ConnectionFailure(format!(
                "no media for track {}",
                track.title
            )));
        }

        let handle = PlaybackHandle {
            clip_id: ulid::Ulid::new().to_string(),
            voice_channel,
        };

        self.publish(ServerMessage::PlayClip {
            voice_channel_id: handle.voice_channel.clone(),
            clip_id: handle.clip_id.clone(),
            url: track.preview_url.clone(),
        });
        Ok(handle)
    }

    async fn stop(&self, handle: PlaybackHandle) {
        self.publish(ServerMessage::StopClip {
            voice_channel_id: handle.voice_channel,
            clip_id: handle.clip_id,
        });
    }

    async fn disconnect(&self) {
        if let Some(voice_channel) = self.connected_voice.lock().await.take() {
            tracing::info!("Playback disconnected from voice channel {}", voice_channel);
            self.publish(ServerMessage::VoiceDisconnected {
                voice_channel_id: voice_channel,
            });
        }
    }
}
