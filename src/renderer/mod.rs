//! Drawing boundary
//!
//! The core never paints pixels. Each frame it walks the game state and hands
//! primitives to a `Display`, which may be a canvas, a terminal or a recorder.

pub mod draw_list;

pub use draw_list::{DrawCommand, DrawList};

use glam::Vec2;

use crate::sim::{GameState, Platform, Player};

/// RGBA color, components in [0, 1]
pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.878, 0.969, 0.980, 1.0];
pub const PLAYER_COLOR: Color = [0.290, 0.412, 0.741, 1.0];
pub const TRAJECTORY_COLOR: Color = [0.290, 0.412, 0.741, 0.4];

/// Platform colors, cycled as the course advances
pub const PLATFORM_COLORS: [Color; 5] = [
    [0.290, 0.412, 0.741, 1.0],
    [0.416, 0.690, 0.298, 1.0],
    [0.941, 0.576, 0.169, 1.0],
    [0.922, 0.302, 0.294, 1.0],
    [0.745, 0.180, 0.867, 1.0],
];

/// Segments used for the trajectory hint
pub const TRAJECTORY_STEPS: usize = 20;

/// Read-only sink for frame primitives
pub trait Display {
    fn draw_platform(&mut self, platform: &Platform, color: Color);
    fn draw_player(&mut self, player: &Player);
    /// Charge gauge, `level` in [0, 1]
    fn draw_power(&mut self, level: f32, color: Color);
    fn draw_trajectory(&mut self, points: &[Vec2]);
}

/// Gauge color by fill level (low=green, mid=yellow, full=red)
pub fn power_color(level: f32) -> Color {
    let t = level.clamp(0.0, 1.0);
    let (r, g, b) = if t < 0.5 {
        // Green to yellow
        let u = t / 0.5;
        (0.4 + 0.6 * u, 0.8, 0.2)
    } else {
        // Yellow to red
        let u = (t - 0.5) / 0.5;
        (1.0, 0.8 - 0.5 * u, 0.2)
    };
    [r, g, b, 1.0]
}

/// Emit one frame of `state` to `display`.
///
/// Order matches painter's order: platforms, trajectory hint, player, gauge.
pub fn draw_frame(state: &GameState, now_ms: f64, show_trajectory: bool, display: &mut dyn Display) {
    let base = state.session.score as usize;
    for (slot, platform) in state.platforms.iter().enumerate() {
        display.draw_platform(platform, PLATFORM_COLORS[(base + slot) % PLATFORM_COLORS.len()]);
    }

    if show_trajectory {
        if let Some(points) = state.preview(now_ms, TRAJECTORY_STEPS) {
            display.draw_trajectory(&points);
        }
    }

    display.draw_player(&state.player);

    if state.gauge.is_charging() {
        let level = state.gauge.level(now_ms, &state.tuning.charge);
        display.draw_power(level, power_color(level));
    }
}
