//! Guess intake
//!
//! Entry point for inbound chat lines. Drops bot and off-channel traffic,
//! turns the start command into a new game, and forwards everything else to
//! the open round as a guess.

use crate::error::TriviaResult;
use crate::state::AppState;
use crate::types::{ChannelId, GameId, GuessOutcome, ParticipantId};

/// Longest guess passed to the matcher; the rest is dropped
pub const MAX_GUESS_CHARS: usize = 200;

/// Posted when a game is started by hand
pub const START_NOTICE: &str = "🎧 Starting a new music trivia round!";

/// A chat line as it arrives from the chat surface
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub sender: ParticipantId,
    pub sender_is_bot: bool,
    pub channel_id: ChannelId,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum IntakeResult {
    /// Bot sender or wrong channel
    Filtered,
    /// Nothing to guess at right now
    NoActiveRound,
    StartRequested(TriviaResult<GameId>),
    Guess(GuessOutcome),
}

pub async fn handle_inbound(state: &AppState, msg: InboundMessage) -> IntakeResult {
    if msg.sender_is_bot || msg.channel_id != state.config.text_channel_id {
        return IntakeResult::Filtered;
    }

    let text = msg.text.trim();

    if text == state.config.start_command {
        tracing::info!("Start command from {}", msg.sender);
        let started = state
            .start_game()
            .await
            .map(|running| running.game.id().clone());
        if started.is_ok() {
            announce(state, START_NOTICE).await;
        }
        return IntakeResult::StartRequested(started);
    }

    let Some(game) = state.active_game().await else {
        return IntakeResult::NoActiveRound;
    };
    let Some(round) = game.current_round().await else {
        return IntakeResult::NoActiveRound;
    };

    let guess: String = text.chars().take(MAX_GUESS_CHARS).collect();
    let outcome = round.try_answer(&msg.sender, &guess).await;

    if let GuessOutcome::Accepted { points, first, .. } = outcome {
        let label = state.services.label(&msg.sender).await;
        let title = &round.track().title;
        let notice = if first {
            format!("⚡ {} got it first! **{}** (+{} pts)", label, title, points)
        } else {
            format!("✅ {} got it! **{}** (+{} pts)", label, title, points)
        };
        announce(state, &notice).await;
    }

    IntakeResult::Guess(outcome)
}

pub(crate) async fn announce(state: &AppState, text: &str) {
    match state
        .services
        .channels
        .text_channel(&state.config.text_channel_id)
        .await
    {
        Ok(channel) => {
            if let Err(e) = channel.send(text).await {
                tracing::warn!("Failed to post to the text channel: {}", e);
            }
        }
        Err(e) => tracing::warn!("Failed to post to the text channel: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;
    use crate::config::TriviaConfig;
    use crate::error::TriviaError;
    use crate::protocol::ServerMessage;
    use crate::types::Track;
    use std::sync::Arc;
    use std::time::Duration;

    fn state() -> AppState {
        let mut config = TriviaConfig::new("trivia", "lounge");
        config.round_count = 2;
        let catalog = vec![
            Track::new("Yellow Submarine", "The Beatles", "https://cdn/ys.mp3"),
            Track::new("Hey Jude", "The Beatles", "https://cdn/hj.mp3"),
        ];
        AppState::new(config, Arc::new(StaticCatalog::new(catalog)))
    }

    fn chat(sender: &str, channel: &str, text: &str) -> InboundMessage {
        InboundMessage {
            sender: sender.to_string(),
            sender_is_bot: false,
            channel_id: channel.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bot_and_foreign_channel_filtered() {
        let state = state();

        let mut from_bot = chat("b1", "trivia", "!music");
        from_bot.sender_is_bot = true;
        assert_eq!(handle_inbound(&state, from_bot).await, IntakeResult::Filtered);

        let elsewhere = chat("p1", "general", "!music");
        assert_eq!(handle_inbound(&state, elsewhere).await, IntakeResult::Filtered);

        assert!(!state.is_game_running().await);
    }

    #[tokio::test]
    async fn test_guess_without_game() {
        let state = state();
        assert_eq!(
            handle_inbound(&state, chat("p1", "trivia", "hey jude")).await,
            IntakeResult::NoActiveRound
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_start_command_and_guess() {
        let state = state();
        let mut rx = state.broadcast.subscribe();

        let started = handle_inbound(&state, chat("p1", "trivia", "  !music ")).await;
        assert!(matches!(started, IntakeResult::StartRequested(Ok(_))));

        let again = handle_inbound(&state, chat("p2", "trivia", "!music")).await;
        assert_eq!(
            again,
            IntakeResult::StartRequested(Err(TriviaError::GameAlreadyRunning))
        );

        tokio::time::sleep(Duration::from_secs(1)).await;
        let game = state.active_game().await.unwrap();
        let round = game.current_round().await.unwrap();
        let answer = round.track().answer.clone();

        let outcome = handle_inbound(&state, chat("p1", "trivia", &answer.to_uppercase())).await;
        assert!(matches!(
            outcome,
            IntakeResult::Guess(GuessOutcome::Accepted { points: 15, first: true, .. })
        ));

        let outcome = handle_inbound(&state, chat("p2", "trivia", "definitely not it")).await;
        assert!(matches!(outcome, IntakeResult::Guess(GuessOutcome::Rejected { .. })));

        let mut announced = false;
        let mut notices = 0;
        while let Ok(msg) = rx.try_recv() {
            if let ServerMessage::ChannelMessage { text, .. } = msg {
                if text == START_NOTICE {
                    notices += 1;
                }
                if text.contains("got it first!") {
                    assert!(text.contains(&round.track().title));
                    assert!(text.contains("(+15 pts)"));
                    announced = true;
                }
            }
        }
        assert!(announced);
        // Only the accepted start is announced
        assert_eq!(notices, 1);
    }
}
