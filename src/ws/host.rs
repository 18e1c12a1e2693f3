//! Host message handlers

use crate::intake::{announce, START_NOTICE};
use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

use super::player::error_message;

pub async fn handle_start_game(state: &Arc<AppState>) -> Option<ServerMessage> {
    tracing::info!("Host requested a new game");
    match state.start_game().await {
        Ok(running) => {
            announce(state, START_NOTICE).await;
            Some(ServerMessage::GameStarted {
                game_id: running.game.id().clone(),
            })
        }
        Err(e) => Some(error_message(&e)),
    }
}
