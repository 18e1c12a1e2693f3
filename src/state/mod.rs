mod game;
mod participant;

pub use game::RunningGame;
pub use participant::ParticipantRegistry;

use crate::broadcast::BroadcastHub;
use crate::catalog::CatalogLoader;
use crate::config::TriviaConfig;
use crate::orchestrator::GameSession;
use crate::protocol::ServerMessage;
use crate::services::GameServices;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<TriviaConfig>,
    pub services: GameServices,
    pub participants: Arc<ParticipantRegistry>,
    /// The game in progress; at most one at a time
    pub game: Arc<RwLock<Option<Arc<GameSession>>>>,
    /// Broadcast channel for sending messages to all connected clients
    pub broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// State wired to the in-process broadcast hub
    pub fn new(config: TriviaConfig, catalog: Arc<dyn CatalogLoader>) -> Self {
        let (tx, _rx) = broadcast::channel(100);
        let hub = Arc::new(BroadcastHub::for_config(tx.clone(), &config));
        let participants = Arc::new(ParticipantRegistry::new());

        let services = GameServices {
            catalog,
            channels: hub.clone(),
            playback: hub,
            identity: participants.clone(),
        };

        Self::with_services(config, services, participants, tx)
    }

    pub fn with_services(
        config: TriviaConfig,
        services: GameServices,
        participants: Arc<ParticipantRegistry>,
        broadcast: broadcast::Sender<ServerMessage>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            services,
            participants,
            game: Arc::new(RwLock::new(None)),
            broadcast,
        }
    }

    pub fn broadcast_to_all(&self, msg: ServerMessage) {
        // Ignore send errors (no receivers connected is fine)
        let _ = self.broadcast.send(msg);
    }
}
