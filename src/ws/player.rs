//! Player message handlers
//!
//! Joining the chat and posting chat lines (which may be guesses or the start
//! command).

use crate::error::TriviaError;
use crate::intake::{handle_inbound, InboundMessage, IntakeResult};
use crate::protocol::ServerMessage;
use crate::state::AppState;
use crate::types::{ChannelId, Role};
use std::sync::Arc;

pub async fn handle_join(
    state: &Arc<AppState>,
    token: Option<String>,
    display_name: Option<String>,
) -> Option<ServerMessage> {
    let participant = match token {
        Some(token) => {
            let existing = match display_name {
                Some(name) => state.participants.rename(&token, name).await,
                None => state.participants.get_by_token(&token).await,
            };
            match existing {
                Some(p) => p,
                None => return Some(invalid_token()),
            }
        }
        None => state.participants.join(display_name).await,
    };

    Some(ServerMessage::Joined {
        participant_id: participant.id,
        token: participant.token,
        display_name: participant.display_name,
    })
}

pub async fn handle_chat(
    state: &Arc<AppState>,
    role: &Role,
    token: String,
    channel_id: ChannelId,
    text: String,
) -> Option<ServerMessage> {
    let participant = match state.participants.get_by_token(&token).await {
        Some(p) => p,
        None => return Some(invalid_token()),
    };

    // Everyone in the channel sees the line, like any chat
    state.broadcast_to_all(ServerMessage::ChannelMessage {
        channel_id: channel_id.clone(),
        author: Some(participant.display_name.clone()),
        text: text.clone(),
        ts: chrono::Utc::now().to_rfc3339(),
    });

    let inbound = InboundMessage {
        sender: participant.id,
        sender_is_bot: *role == Role::Bot,
        channel_id,
        text,
    };

    match handle_inbound(state, inbound).await {
        IntakeResult::Filtered | IntakeResult::NoActiveRound => None,
        IntakeResult::StartRequested(Ok(game_id)) => Some(ServerMessage::GameStarted { game_id }),
        IntakeResult::StartRequested(Err(e)) => Some(error_message(&e)),
        IntakeResult::Guess(outcome) => Some(ServerMessage::GuessResult { outcome }),
    }
}

fn invalid_token() -> ServerMessage {
    ServerMessage::Error {
        code: "INVALID_TOKEN".to_string(),
        msg: "Unknown participant token".to_string(),
    }
}

pub(super) fn error_message(e: &TriviaError) -> ServerMessage {
    ServerMessage::Error {
        code: e.code().to_string(),
        msg: e.to_string(),
    }
}
