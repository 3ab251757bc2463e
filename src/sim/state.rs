//! Game state and core simulation types
//!
//! All state that must be persisted for determinism lives here.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arbiter::LandingMode;
use super::body::Player;
use super::difficulty::DifficultyState;
use super::gauge::PowerGauge;
use super::platforms::{Platform, PlatformPair};
use super::timer::OneShot;
use crate::tuning::Tuning;

/// Session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen, nothing simulated
    Menu,
    /// Active gameplay
    Playing,
    /// Ticking frozen
    Paused,
    /// Run ended
    GameOver,
}

impl GamePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            GamePhase::Menu => "menu",
            GamePhase::Playing => "playing",
            GamePhase::Paused => "paused",
            GamePhase::GameOver => "game_over",
        }
    }
}

/// Things that happened during a command or tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged(GamePhase),
    ScoreChanged { score: u32, best: u32 },
    ChargeStarted,
    Jumped { power: f32 },
    Landed { score: u32 },
    Missed { x: f32 },
    GameOver { score: u32, best: u32 },
    /// Inconsistent state was detected and the session restarted
    Recovered,
}

/// Transitions that fire after a delay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingTransition {
    GameOver,
}

/// Score bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub score: u32,
    /// Best score ever seen; only raised, never lowered
    pub best_score: u32,
}

impl Session {
    pub fn with_best(best_score: u32) -> Self {
        Self {
            score: 0,
            best_score,
        }
    }

    /// Fold the current score into the best; returns true on a new record
    pub fn commit_best(&mut self) -> bool {
        if self.score > self.best_score {
            self.best_score = self.score;
            true
        } else {
            false
        }
    }
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Course generator
    pub rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub session: Session,
    pub player: Player,
    pub platforms: PlatformPair,
    pub difficulty: DifficultyState,
    pub gauge: PowerGauge,
    pub landing_mode: LandingMode,
    /// Delayed phase change (game over after a miss)
    pub deferred: OneShot<PendingTransition>,
    /// Jumps launched this session
    pub jumps: u32,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a game sitting on the menu with the given seed.
    /// `tuning` is expected to have passed `Tuning::validate`.
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let difficulty = DifficultyState::from_tuning(&tuning.difficulty);
        let current = seed_platform(&tuning);
        let platforms = PlatformPair::seed(&mut rng, current, &difficulty, &tuning.platforms);
        let player = Player::standing_on(&current).with_gravity(tuning.jump.gravity);

        Self {
            seed,
            rng,
            tuning,
            phase: GamePhase::Menu,
            session: Session::default(),
            player,
            platforms,
            difficulty,
            gauge: PowerGauge::new(),
            landing_mode: LandingMode::default(),
            deferred: OneShot::new(),
            jumps: 0,
            events: Vec::new(),
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("phase {} -> {}", self.phase.as_str(), phase.as_str());
            self.phase = phase;
            self.push_event(GameEvent::PhaseChanged(phase));
        }
    }

    /// Whether a delayed game over is counting down
    pub fn game_over_pending(&self) -> bool {
        self.deferred.is_pending()
    }

    /// Everything the tick relies on is finite and well-formed
    pub fn is_consistent(&self) -> bool {
        let platforms_ok = self
            .platforms
            .iter()
            .all(|p| p.x.is_finite() && p.y.is_finite() && p.width > 0.0);
        platforms_ok && self.player.pos.is_finite() && self.player.vel.is_finite()
    }
}

/// First platform of every course, parked at the viewport anchor
pub fn seed_platform(tuning: &Tuning) -> Platform {
    let y = (tuning.viewport.height / 2.0 + 100.0)
        .clamp(tuning.platforms.min_y, tuning.platforms.max_y);
    Platform::new(
        tuning.viewport.anchor_x(),
        y,
        tuning.platforms.base_width,
        tuning.platforms.height,
    )
}
