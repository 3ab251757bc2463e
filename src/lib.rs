//! Hop Charge - a one-button charge-and-jump arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (charge gauge, jump planning, landing, platforms)
//! - `game`: Session orchestration wired to host collaborators
//! - `host`: Clock and input abstraction
//! - `renderer`: Read-only drawing boundary
//! - `persistence`: Key/value storage and best-score records
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod game;
pub mod highscores;
pub mod host;
pub mod persistence;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::JumpGame;
pub use highscores::Rankings;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Longest single integration step (seconds); larger frames are sub-stepped
    pub const MAX_STEP_DT: f32 = 0.05;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Frame deltas above this are clamped (tab switches, debugger pauses)
    pub const MAX_FRAME_DT: f32 = 0.25;

    /// Player body dimensions
    pub const PLAYER_WIDTH: f32 = 30.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;

    /// Platform defaults
    pub const PLATFORM_HEIGHT: f32 = 20.0;
    pub const SEED_PLATFORM_WIDTH: f32 = 80.0;
    pub const MIN_PLATFORM_WIDTH: f32 = 30.0;

    /// Viewport shifts smaller than this are skipped to avoid jitter
    pub const RECENTER_HYSTERESIS: f32 = 5.0;

    /// Gravity applied when no planned flight overrides it (pixels/s²)
    pub const DEFAULT_GRAVITY: f32 = 800.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Position of `value` within `[start, end]`, clamped to [0, 1]
#[inline]
pub fn inverse_lerp(start: f32, end: f32, value: f32) -> f32 {
    if (end - start).abs() <= f32::EPSILON {
        return 0.0;
    }
    ((value - start) / (end - start)).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(-150.0, -320.0, 0.0), -150.0);
        assert_eq!(lerp(-150.0, -320.0, 1.0), -320.0);
        assert!((lerp(0.0, 10.0, 0.25) - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_inverse_lerp_clamps() {
        assert_eq!(inverse_lerp(0.2, 0.4, 0.1), 0.0);
        assert_eq!(inverse_lerp(0.2, 0.4, 0.9), 1.0);
        assert!((inverse_lerp(0.2, 0.4, 0.3) - 0.5).abs() < 1e-6);
        assert_eq!(inverse_lerp(1.0, 1.0, 1.0), 0.0);
    }
}
