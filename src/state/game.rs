use super::AppState;
use crate::error::{TriviaError, TriviaResult};
use crate::orchestrator::{run_game, GameSession, GameSummary};
use crate::protocol::ServerMessage;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// A game that has been started, plus the task driving it
pub struct RunningGame {
    pub game: Arc<GameSession>,
    pub task: JoinHandle<()>,
}

impl AppState {
    /// Start a new game in the background.
    /// Rejected while another game is still running.
    pub async fn start_game(&self) -> TriviaResult<RunningGame> {
        let mut slot = self.game.write().await;
        if let Some(current) = slot.as_ref() {
            tracing::warn!("Start rejected, game {} is still running", current.id());
            return Err(TriviaError::GameAlreadyRunning);
        }

        let game = Arc::new(GameSession::new((*self.config).clone()));
        *slot = Some(game.clone());
        drop(slot);

        tracing::info!("Game {} created", game.id());

        let state = self.clone();
        let running = game.clone();
        let task = tokio::spawn(async move {
            // Driven on its own task so a panic still reaches finish_game
            let driver = {
                let game = running.clone();
                let services = state.services.clone();
                tokio::spawn(async move { run_game(&game, &services).await })
            };

            let result = match driver.await {
                Ok(result) => result,
                Err(e) => {
                    tracing::error!("Game {} task failed: {}", running.id(), e);
                    running.abort().await;
                    state.services.playback.disconnect().await;
                    Err(TriviaError::GameCrashed(e.to_string()))
                }
            };
            state.finish_game(&running, result).await;
        });

        Ok(RunningGame { game, task })
    }

    /// Get the game in progress
    pub async fn active_game(&self) -> Option<Arc<GameSession>> {
        self.game.read().await.clone()
    }

    pub async fn is_game_running(&self) -> bool {
        self.game.read().await.is_some()
    }

    async fn finish_game(&self, game: &GameSession, result: TriviaResult<GameSummary>) {
        match result {
            Ok(summary) => {
                self.broadcast_to_all(ServerMessage::GameFinished {
                    game_id: summary.game_id,
                    standings: summary.standings,
                });
            }
            Err(e) => {
                tracing::warn!("Game {} ended early: {}", game.id(), e);
            }
        }

        let mut slot = self.game.write().await;
        if slot.as_ref().is_some_and(|g| g.id() == game.id()) {
            *slot = None;
        }
    }
}
