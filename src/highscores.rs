//! Ranking table
//!
//! Persisted through a `Store`, keeps the top 10 scores in descending order.

use serde::{Deserialize, Serialize};

use crate::persistence::{RANKINGS_KEY, Store, StoreError, load_json, save_json};

/// Maximum number of ranked scores to keep
pub const MAX_RANKINGS: usize = 10;

/// A single ranked run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub score: u32,
    /// Human-readable date the run finished
    pub date: String,
}

/// Ranking table, best first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Rankings {
    pub entries: Vec<RankingEntry>,
}

impl Rankings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a score would make the table
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_RANKINGS
            || self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a run, keep the table sorted and trimmed.
    /// Returns the rank achieved (1-indexed) or None if it fell off the table.
    pub fn add_score(&mut self, score: u32, date: impl Into<String>) -> Option<usize> {
        // Ties rank below earlier runs with the same score
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            pos,
            RankingEntry {
                score,
                date: date.into(),
            },
        );
        self.entries.truncate(MAX_RANKINGS);
        (pos < MAX_RANKINGS).then_some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Load from the store; malformed data yields an empty table
    pub fn load(store: &dyn Store) -> Self {
        let mut rankings: Rankings = load_json(store, RANKINGS_KEY).unwrap_or_default();
        // Stored data may have been edited by hand
        rankings.entries.sort_by(|a, b| b.score.cmp(&a.score));
        rankings.entries.truncate(MAX_RANKINGS);
        log::debug!("loaded {} rankings", rankings.entries.len());
        rankings
    }

    pub fn save(&self, store: &mut dyn Store) -> Result<(), StoreError> {
        save_json(store, RANKINGS_KEY, self)?;
        log::debug!("rankings saved ({} entries)", self.entries.len());
        Ok(())
    }

    /// Load, insert `score`, save: the whole "record a run" round trip.
    /// Scores that cannot make the table leave the store untouched.
    pub fn record(store: &mut dyn Store, score: u32, date: &str) -> Result<Option<usize>, StoreError> {
        let mut rankings = Self::load(store);
        if !rankings.qualifies(score) {
            log::debug!("score {} does not make the rankings", score);
            return Ok(None);
        }
        let rank = rankings.add_score(score, date);
        rankings.save(store)?;
        Ok(rank)
    }
}
