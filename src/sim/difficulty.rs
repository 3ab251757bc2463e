//! Difficulty escalation
//!
//! Purely additive: every successful landing nudges difficulty and platform
//! spacing up until the caps. Nothing ever lowers them within a session.

use serde::{Deserialize, Serialize};

use crate::tuning::DifficultyTuning;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyState {
    pub difficulty: f32,
    /// Shortest gap to the next platform
    pub min_distance: f32,
    /// Longest gap to the next platform
    pub max_distance: f32,
}

impl Default for DifficultyState {
    fn default() -> Self {
        Self::from_tuning(&DifficultyTuning::default())
    }
}

impl DifficultyState {
    /// Starting difficulty for a new session
    pub fn from_tuning(tuning: &DifficultyTuning) -> Self {
        Self {
            difficulty: tuning.start_difficulty,
            min_distance: tuning.start_min_distance.min(tuning.min_distance_cap),
            max_distance: tuning.start_max_distance.min(tuning.max_distance_cap),
        }
    }

    /// Escalate after a successful landing
    pub fn apply(&mut self, tuning: &DifficultyTuning) {
        self.difficulty += tuning.difficulty_step;
        self.min_distance = (self.min_distance + tuning.distance_step).min(tuning.min_distance_cap);
        self.max_distance = (self.max_distance + tuning.distance_step).min(tuning.max_distance_cap);
    }
}
