use std::sync::Arc;
use std::time::Duration;
use tunetrivia::catalog::StaticCatalog;
use tunetrivia::config::TriviaConfig;
use tunetrivia::protocol::{ClientMessage, ServerMessage};
use tunetrivia::state::AppState;
use tunetrivia::types::{GuessOutcome, Role, Track};
use tunetrivia::ws::handlers::handle_message;

fn catalog() -> Vec<Track> {
    vec![
        Track::new("Yellow Submarine", "The Beatles", "https://cdn/ys.mp3"),
        Track::new("Bohemian Rhapsody", "Queen", "https://cdn/br.mp3"),
        Track::new("Hotel California", "Eagles", "https://cdn/hc.mp3"),
        Track::new("Stairway to Heaven", "Led Zeppelin", "https://cdn/sh.mp3"),
    ]
}

fn app(rounds: usize, tracks: Vec<Track>) -> Arc<AppState> {
    let mut config = TriviaConfig::new("trivia", "lounge");
    config.round_count = rounds;
    Arc::new(AppState::new(config, Arc::new(StaticCatalog::new(tracks))))
}

async fn join(state: &Arc<AppState>, name: &str, role: &Role) -> (String, String) {
    match handle_message(
        ClientMessage::Join {
            token: None,
            display_name: Some(name.to_string()),
        },
        role,
        state,
    )
    .await
    {
        Some(ServerMessage::Joined {
            participant_id,
            token,
            display_name,
        }) => {
            assert_eq!(display_name, name);
            (participant_id, token)
        }
        other => panic!("Expected Joined message, got {:?}", other),
    }
}

async fn chat(state: &Arc<AppState>, role: &Role, token: &str, text: &str) -> Option<ServerMessage> {
    handle_message(
        ClientMessage::Chat {
            token: token.to_string(),
            channel_id: "trivia".to_string(),
            text: text.to_string(),
        },
        role,
        state,
    )
    .await
}

/// End-to-end game: two players, one bot, host start, guesses, leaderboard
#[tokio::test(start_paused = true)]
async fn test_full_game_flow() {
    let state = app(2, catalog());
    let mut rx = state.broadcast.subscribe();
    let player = Role::Player;
    let bot = Role::Bot;

    let (alice_id, alice) = join(&state, "Alice", &player).await;
    let (bob_id, bob) = join(&state, "Bob", &player).await;
    let (_, robo) = join(&state, "Robo", &bot).await;

    // Players cannot use host commands
    match handle_message(ClientMessage::HostStartGame, &player, &state).await {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "UNAUTHORIZED"),
        other => panic!("Expected UNAUTHORIZED, got {:?}", other),
    }

    let game_id = match handle_message(ClientMessage::HostStartGame, &Role::Host, &state).await {
        Some(ServerMessage::GameStarted { game_id }) => game_id,
        other => panic!("Expected GameStarted, got {:?}", other),
    };

    // Second start while running is rejected
    match handle_message(ClientMessage::HostStartGame, &Role::Host, &state).await {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "GAME_ALREADY_RUNNING"),
        other => panic!("Expected GAME_ALREADY_RUNNING, got {:?}", other),
    }

    // Round 1
    tokio::time::sleep(Duration::from_secs(2)).await;
    let game = state.active_game().await.expect("game should be running");
    assert_eq!(game.id(), &game_id);
    let round = game.current_round().await.expect("round 1 should be open");
    let answer = round.track().answer.clone();

    // The bot knows the answer but is never scored
    assert!(chat(&state, &bot, &robo, &answer).await.is_none());

    match chat(&state, &player, &alice, &answer).await {
        Some(ServerMessage::GuessResult { outcome }) => assert_eq!(
            outcome,
            GuessOutcome::Accepted {
                points: 15,
                first: true,
                similarity: 100
            }
        ),
        other => panic!("Expected GuessResult, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_secs(2)).await;
    match chat(&state, &player, &bob, &answer.to_lowercase()).await {
        Some(ServerMessage::GuessResult { outcome }) => {
            assert!(matches!(outcome, GuessOutcome::Accepted { points: 10, first: false, .. }))
        }
        other => panic!("Expected GuessResult, got {:?}", other),
    }

    match chat(&state, &player, &alice, &answer).await {
        Some(ServerMessage::GuessResult { outcome }) => {
            assert_eq!(outcome, GuessOutcome::AlreadyScored)
        }
        other => panic!("Expected GuessResult, got {:?}", other),
    }

    // Round 2: nobody answers, so the answer gets revealed
    tokio::time::sleep(Duration::from_secs(14)).await;
    let round2 = game.current_round().await.expect("round 2 should be open");
    assert_eq!(round2.round_no(), 2);
    match chat(&state, &player, &bob, "la la la").await {
        Some(ServerMessage::GuessResult { outcome }) => {
            assert!(matches!(outcome, GuessOutcome::Rejected { .. }))
        }
        other => panic!("Expected GuessResult, got {:?}", other),
    }

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert!(!state.is_game_running().await);

    // Guesses after the game are not judged
    assert!(chat(&state, &player, &bob, &answer).await.is_none());

    let mut lines = Vec::new();
    let mut standings = None;
    let mut plays = 0;
    while let Ok(msg) = rx.try_recv() {
        match msg {
            ServerMessage::ChannelMessage {
                author: None, text, ..
            } => lines.push(text),
            ServerMessage::PlayClip { .. } => plays += 1,
            ServerMessage::GameFinished {
                game_id: finished_id,
                standings: s,
            } => {
                assert_eq!(finished_id, game_id);
                standings = Some(s);
            }
            _ => {}
        }
    }

    assert_eq!(plays, 2);
    assert_eq!(lines.iter().filter(|l| l.starts_with("🎧 Starting")).count(), 1);
    assert!(lines.iter().any(|l| l.contains("Alice got it first!")));
    assert!(lines.iter().any(|l| l.contains("Bob got it!")));
    assert_eq!(lines.iter().filter(|l| l.contains("Time's up")).count(), 1);
    assert!(lines.iter().any(|l| l.contains("**1. Alice** — 15 pts")));

    let standings = standings.expect("GameFinished should be broadcast");
    assert_eq!(standings.len(), 2);
    assert_eq!(standings[0].participant_id, alice_id);
    assert_eq!(standings[0].points, 15);
    assert_eq!(standings[1].participant_id, bob_id);
    assert_eq!(standings[1].points, 10);
}

#[tokio::test(start_paused = true)]
async fn test_chat_start_command() {
    let state = app(1, catalog());
    let (_, token) = join(&state, "Alice", &Role::Player).await;

    match chat(&state, &Role::Player, &token, "!music").await {
        Some(ServerMessage::GameStarted { .. }) => {}
        other => panic!("Expected GameStarted, got {:?}", other),
    }
    assert!(state.is_game_running().await);

    tokio::time::sleep(Duration::from_secs(15)).await;
    assert!(!state.is_game_running().await);
}

#[tokio::test(start_paused = true)]
async fn test_insufficient_catalog_reported() {
    let state = app(10, catalog());
    let mut rx = state.broadcast.subscribe();

    let running = state.start_game().await.unwrap();
    running.task.await.unwrap();

    assert!(!state.is_game_running().await);
    assert!(running.game.scoreboard().is_empty().await);

    let mut reported = false;
    while let Ok(msg) = rx.try_recv() {
        match msg {
            ServerMessage::ChannelMessage { text, .. } if text.contains("Not enough tracks") => {
                reported = true
            }
            ServerMessage::PlayClip { .. } => panic!("No clip should play"),
            ServerMessage::GameFinished { .. } => panic!("Aborted game should not finish"),
            _ => {}
        }
    }
    assert!(reported);
}

#[tokio::test]
async fn test_chat_with_unknown_token() {
    let state = app(1, catalog());
    match chat(&state, &Role::Player, "ZZZZZ", "hello").await {
        Some(ServerMessage::Error { code, .. }) => assert_eq!(code, "INVALID_TOKEN"),
        other => panic!("Expected INVALID_TOKEN, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejoin_with_token() {
    let state = app(1, catalog());
    let (id, token) = join(&state, "Alice", &Role::Player).await;

    match handle_message(
        ClientMessage::Join {
            token: Some(token.clone()),
            display_name: Some("Alicia".to_string()),
        },
        &Role::Player,
        &state,
    )
    .await
    {
        Some(ServerMessage::Joined {
            participant_id,
            display_name,
            ..
        }) => {
            assert_eq!(participant_id, id);
            assert_eq!(display_name, "Alicia");
        }
        other => panic!("Expected Joined, got {:?}", other),
    }
}
