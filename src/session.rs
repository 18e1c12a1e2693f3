//! Per-round answer session
//!
//! Open -> Closed, exactly once. Every accept decision (open check,
//! already-scored check, first-scorer claim and the scoreboard credit) runs
//! under the single round mutex, so simultaneous correct guesses cannot both
//! take the first-scorer bonus.

use crate::matcher::{normalize, similarity};
use crate::scoreboard::Scoreboard;
use crate::types::{GuessOutcome, ParticipantId, ScoringRules, Track};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Mutable state of the live round
#[derive(Debug, Clone)]
pub struct RoundState {
    pub track: Track,
    pub is_open: bool,
    pub first_scorer_claimed: bool,
    /// Participants who already scored, in scoring order
    pub scorers: Vec<ParticipantId>,
}

pub struct AnswerSession {
    round_no: u32,
    track: Track,
    normalized_answer: String,
    rules: ScoringRules,
    scoreboard: Arc<Scoreboard>,
    state: Mutex<RoundState>,
}

impl AnswerSession {
    /// Open a fresh session for `track`
    pub fn new(round_no: u32, track: Track, rules: ScoringRules, scoreboard: Arc<Scoreboard>) -> Self {
        let normalized_answer = normalize(track.canonical_answer());
        let state = RoundState {
            track: track.clone(),
            is_open: true,
            first_scorer_claimed: false,
            scorers: Vec::new(),
        };

        Self {
            round_no,
            track,
            normalized_answer,
            rules,
            scoreboard,
            state: Mutex::new(state),
        }
    }

    pub fn round_no(&self) -> u32 {
        self.round_no
    }

    pub fn track(&self) -> &Track {
        &self.track
    }

    /// Judge a guess and credit the scoreboard if it is accepted
    pub async fn try_answer(&self, participant_id: &ParticipantId, guess: &str) -> GuessOutcome {
        // Matching is pure; keep it outside the critical section
        let guess = normalize(guess);
        let score = similarity(&guess, &self.normalized_answer);

        let mut state = self.state.lock().await;

        if !state.is_open {
            return GuessOutcome::Ignored;
        }

        if state.scorers.contains(participant_id) {
            return GuessOutcome::AlreadyScored;
        }

        if guess.is_empty() || score < self.rules.threshold {
            return GuessOutcome::Rejected { similarity: score };
        }

        let first = !state.first_scorer_claimed;
        state.first_scorer_claimed = true;
        state.scorers.push(participant_id.clone());

        let points = if first {
            self.rules.first_scorer_points
        } else {
            self.rules.scorer_points
        };
        let total = self.scoreboard.credit(participant_id, points).await;

        tracing::info!(
            "Round {}: {} scored {} points (first: {}, similarity: {}, total: {})",
            self.round_no,
            participant_id,
            points,
            first,
            score,
            total
        );

        GuessOutcome::Accepted {
            points,
            first,
            similarity: score,
        }
    }

    /// Stop accepting guesses. Returns `true` only for the call that closed it.
    pub async fn close(&self) -> bool {
        let mut state = self.state.lock().await;
        let was_open = state.is_open;
        state.is_open = false;
        was_open
    }

    pub async fn is_open(&self) -> bool {
        self.state.lock().await.is_open
    }

    /// Whether anyone answered correctly this round
    pub async fn was_solved(&self) -> bool {
        !self.state.lock().await.scorers.is_empty()
    }

    pub async fn snapshot(&self) -> RoundState {
        self.state.lock().await.clone()
    }
}
