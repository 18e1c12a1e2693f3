use crate::types::ParticipantId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::sync::RwLock;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScoreEntry {
    pub participant_id: ParticipantId,
    pub points: u32,
}

#[derive(Debug, Default)]
struct Totals {
    /// Kept in first-credited order for tie-breaking
    entries: Vec<ScoreEntry>,
    index: HashMap<ParticipantId, usize>,
}

/// Running point totals for one game
#[derive(Debug, Default)]
pub struct Scoreboard {
    totals: RwLock<Totals>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add points to a participant, creating the entry at 0 if needed.
    /// Returns the new total.
    pub async fn credit(&self, participant_id: &ParticipantId, points: u32) -> u32 {
        let mut totals = self.totals.write().await;

        let existing = totals.index.get(participant_id).copied();
        let idx = match existing {
            Some(idx) => idx,
            None => {
                let idx = totals.entries.len();
                totals.entries.push(ScoreEntry {
                    participant_id: participant_id.clone(),
                    points: 0,
                });
                totals.index.insert(participant_id.clone(), idx);
                idx
            }
        };

        let entry = &mut totals.entries[idx];
        entry.points += points;
        entry.points
    }

    pub async fn points_of(&self, participant_id: &ParticipantId) -> Option<u32> {
        let totals = self.totals.read().await;
        totals
            .index
            .get(participant_id)
            .map(|&idx| totals.entries[idx].points)
    }

    pub async fn is_empty(&self) -> bool {
        self.totals.read().await.entries.is_empty()
    }

    /// Totals sorted by points descending; ties keep first-credited order
    pub async fn rank(&self) -> Vec<ScoreEntry> {
        let mut ranked = self.totals.read().await.entries.clone();
        // sort_by is stable
        ranked.sort_by(|a, b| b.points.cmp(&a.points));
        ranked
    }
}
