//! WebSocket message dispatch
//!
//! Authorization is checked here, then dispatched to role-specific handler modules.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::Role;
use std::sync::Arc;

use super::{host, player};

/// Macro to check host authorization and return early if unauthorized
macro_rules! check_host {
    ($role:expr, $action:expr) => {
        if *$role != Role::Host {
            return Some(ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only host can {}", $action),
            });
        }
    };
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    role: &Role,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        ClientMessage::Join {
            token,
            display_name,
        } => player::handle_join(state, token, display_name).await,

        ClientMessage::Chat {
            token,
            channel_id,
            text,
        } => player::handle_chat(state, role, token, channel_id, text).await,

        ClientMessage::HostStartGame => {
            check_host!(role, "start a game");
            host::handle_start_game(state).await
        }
    }
}
