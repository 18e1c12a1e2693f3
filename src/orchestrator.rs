//! Round orchestration for one game
//!
//! A `GameSession` owns the scoreboard and the slot holding the live
//! `AnswerSession`. `run_game` drives the rounds: publish a fresh session,
//! play the clip, wait for the clock, retire the session, reveal, pause.
//! A new session is only published after the previous one is closed and
//! removed from the slot.

use crate::clock::RoundClock;
use crate::config::TriviaConfig;
use crate::error::{TriviaError, TriviaResult};
use crate::scoreboard::Scoreboard;
use crate::services::{GameServices, TextChannel};
use crate::session::AnswerSession;
use crate::types::{GameId, GamePhase, Standing, Track};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Outcome of a completed game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSummary {
    pub game_id: GameId,
    pub rounds_played: u32,
    pub standings: Vec<Standing>,
}

/// State of one game from start command to final leaderboard
pub struct GameSession {
    id: GameId,
    config: TriviaConfig,
    scoreboard: Arc<Scoreboard>,
    current: RwLock<Option<Arc<AnswerSession>>>,
    phase: RwLock<GamePhase>,
}

impl GameSession {
    pub fn new(config: TriviaConfig) -> Self {
        Self {
            id: ulid::Ulid::new().to_string(),
            config,
            scoreboard: Arc::new(Scoreboard::new()),
            current: RwLock::new(None),
            phase: RwLock::new(GamePhase::Starting),
        }
    }

    pub fn id(&self) -> &GameId {
        &self.id
    }

    pub fn config(&self) -> &TriviaConfig {
        &self.config
    }

    pub fn scoreboard(&self) -> &Arc<Scoreboard> {
        &self.scoreboard
    }

    /// The round currently accepting guesses, if any
    pub async fn current_round(&self) -> Option<Arc<AnswerSession>> {
        self.current.read().await.clone()
    }

    pub async fn phase(&self) -> GamePhase {
        *self.phase.read().await
    }

    async fn set_phase(&self, phase: GamePhase) {
        *self.phase.write().await = phase;
    }

    /// Close any open round and mark the game aborted
    pub(crate) async fn abort(&self) {
        self.retire_round().await;
        self.set_phase(GamePhase::Aborted).await;
    }

    async fn publish_round(&self, session: Arc<AnswerSession>) {
        let mut current = self.current.write().await;
        debug_assert!(current.is_none(), "previous round was not retired");
        *current = Some(session);
    }

    /// Close the live round and clear the slot
    async fn retire_round(&self) {
        let mut current = self.current.write().await;
        if let Some(session) = current.take() {
            session.close().await;
        }
    }

    /// Ranked totals with display labels resolved
    pub async fn standings(&self, services: &GameServices) -> Vec<Standing> {
        let mut standings = Vec::new();
        for (idx, entry) in self.scoreboard.rank().await.into_iter().enumerate() {
            standings.push(Standing {
                rank: idx + 1,
                display_name: services.label(&entry.participant_id).await,
                participant_id: entry.participant_id,
                points: entry.points,
            });
        }
        standings
    }
}

/// Post to the text channel; a failed post is logged, never fatal
async fn say(channel: &dyn TextChannel, text: &str) {
    if let Err(e) = channel.send(text).await {
        tracing::warn!("Failed to post to #{}: {}", channel.id(), e);
    }
}

fn render_leaderboard(standings: &[Standing]) -> String {
    let lines: Vec<String> = standings
        .iter()
        .map(|s| format!("**{}. {}** — {} pts", s.rank, s.display_name, s.points))
        .collect();
    format!("🏆 **Final Leaderboard:**\n{}", lines.join("\n"))
}

/// Run a whole game. Failures abort this game only and are reported on the
/// text channel when it is reachable.
pub async fn run_game(game: &GameSession, services: &GameServices) -> TriviaResult<GameSummary> {
    tracing::info!("Starting game {}", game.id);

    let text = match services
        .channels
        .text_channel(&game.config.text_channel_id)
        .await
    {
        Ok(channel) => channel,
        Err(e) => {
            tracing::error!("Game {} aborted: {}", game.id, e);
            game.set_phase(GamePhase::Aborted).await;
            return Err(e);
        }
    };

    let result = play(game, services, text.as_ref()).await;

    match &result {
        Ok(summary) => {
            tracing::info!(
                "Game {} finished after {} rounds",
                game.id,
                summary.rounds_played
            );
            game.set_phase(GamePhase::Finished).await;
        }
        Err(e) => {
            tracing::error!("Game {} aborted: {}", game.id, e);
            game.set_phase(GamePhase::Aborted).await;
        }
    }

    result
}

async fn play(
    game: &GameSession,
    services: &GameServices,
    text: &dyn TextChannel,
) -> TriviaResult<GameSummary> {
    let voice = match services
        .channels
        .voice_channel(&game.config.voice_channel_id)
        .await
    {
        Ok(voice) => voice,
        Err(e) => {
            say(text, "❌ Voice channel not found.").await;
            return Err(e);
        }
    };

    if let Err(e) = services.playback.connect(&voice).await {
        say(text, &format!("❌ Failed to connect to voice channel: {}", e)).await;
        return Err(e);
    }

    let rounds = play_rounds(game, services, text).await;

    game.retire_round().await;
    services.playback.disconnect().await;
    let rounds_played = rounds?;

    let standings = game.standings(services).await;
    if standings.is_empty() {
        say(text, "No correct answers this round.").await;
    } else {
        say(text, &render_leaderboard(&standings)).await;
    }
    say(
        text,
        &format!(
            "🎵 Round complete! Type `{}` to start another game.",
            game.config.start_command
        ),
    )
    .await;

    Ok(GameSummary {
        game_id: game.id.clone(),
        rounds_played,
        standings,
    })
}

async fn load_tracks(
    game: &GameSession,
    services: &GameServices,
    text: &dyn TextChannel,
) -> TriviaResult<Vec<Track>> {
    let pool = match services.catalog.load_tracks().await {
        Ok(pool) => pool,
        Err(e) => {
            say(text, "❌ Could not load the song catalog.").await;
            return Err(e);
        }
    };

    crate::catalog::select_tracks(pool, game.config.round_count).map_err(|e| {
        tracing::warn!("Game {}: {}", game.id, e);
        e
    })
}

async fn play_rounds(
    game: &GameSession,
    services: &GameServices,
    text: &dyn TextChannel,
) -> TriviaResult<u32> {
    let config = &game.config;

    let tracks = match load_tracks(game, services, text).await {
        Ok(tracks) => tracks,
        Err(e @ TriviaError::InsufficientCatalog { .. }) => {
            say(text, "⚠️ Not enough tracks in the catalog!").await;
            return Err(e);
        }
        Err(e) => return Err(e),
    };

    say(
        text,
        "🎶 **Welcome to Music Trivia!** Guess the song title as fast as you can!",
    )
    .await;

    let total = tracks.len() as u32;
    let mut played = 0;

    for (idx, track) in tracks.into_iter().enumerate() {
        let round_no = idx as u32 + 1;
        let session = Arc::new(AnswerSession::new(
            round_no,
            track,
            config.scoring,
            game.scoreboard.clone(),
        ));

        say(
            text,
            &format!("▶️ **Song {}/{}** — listen carefully!", round_no, total),
        )
        .await;

        let handle = match services.playback.play(session.track()).await {
            Ok(handle) => handle,
            Err(e) => {
                say(text, &format!("❌ Playback failed: {}", e)).await;
                return Err(e);
            }
        };

        game.publish_round(session.clone()).await;
        game.set_phase(GamePhase::Listening).await;

        let closer = session.clone();
        let mut clock = RoundClock::start_with(config.listen_duration, async move {
            closer.close().await;
        });
        tracing::debug!(
            "Round {}/{} of game {} open until {}",
            round_no,
            total,
            game.id,
            clock.deadline().to_rfc3339()
        );

        clock.expired().await;
        game.retire_round().await;
        clock.cancel();
        services.playback.stop(handle).await;
        played = round_no;

        if !session.was_solved().await {
            let track = session.track();
            say(
                text,
                &format!(
                    "⏰ Time's up! The answer was **{}** by *{}*.",
                    track.title, track.artist
                ),
            )
            .await;
        }

        if round_no < total {
            game.set_phase(GamePhase::Intermission).await;
            RoundClock::start(config.pause_duration).expired().await;
        }
    }

    Ok(played)
}
