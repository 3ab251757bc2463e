//! Jump trajectory planning
//!
//! Turns a released charge into launch velocity. Screen coordinates are used
//! throughout: +y points down, so heights above the launch point are negative.
//!
//! The planner works in closed form. For flight time `T` and half time
//! `th = T / 2`, it picks the gravity and initial vertical speed of the one
//! constant-acceleration parabola whose apex sits exactly `jump_height` above
//! the start at `th`:
//!
//! ```text
//! gravity = -2 * jump_height / th²
//! vy0     = -gravity * th
//! ```
//!
//! The body then integrates that parabola; integration error only shifts the
//! landing point by a fraction of a pixel at normal frame rates.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::platforms::Platform;
use crate::tuning::{AccuracyBand, JumpTuning};
use crate::{inverse_lerp, lerp};

/// Launch parameters for one jump
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JumpPlan {
    /// Initial velocity (pixels/s)
    pub velocity: Vec2,
    /// Gravity to apply for the duration of this flight (pixels/s²)
    pub gravity: f32,
    /// Where the jump is expected to come down
    pub target_x: f32,
    /// Height at which the landing check fires
    pub target_y: f32,
    /// Signed horizontal travel
    pub jump_distance: f32,
    /// Apex height relative to the launch point (negative is up)
    pub jump_height: f32,
    /// Planned time from launch back to launch height (seconds)
    pub flight_time: f32,
}

/// Fraction of the target distance a jump of `power` covers
pub fn accuracy(power: f32, bands: &[AccuracyBand]) -> f32 {
    let mut band_start = 0.0;
    for band in bands {
        if power <= band.up_to {
            let t = inverse_lerp(band_start, band.up_to, power);
            return lerp(band.min_fraction, band.max_fraction, t);
        }
        band_start = band.up_to;
    }
    bands.last().map(|b| b.max_fraction).unwrap_or(1.0)
}

/// Index of the band `power` falls in (for logging)
pub fn band_index(power: f32, bands: &[AccuracyBand]) -> usize {
    bands
        .iter()
        .position(|b| power <= b.up_to)
        .unwrap_or(bands.len().saturating_sub(1))
}

/// Apex height for `power` (more power = higher, i.e. more negative)
#[inline]
pub fn jump_height(power: f32, tuning: &JumpTuning) -> f32 {
    lerp(tuning.min_height, tuning.max_height, power)
}

/// Flight time for a hop of `jump_distance` pixels
#[inline]
pub fn flight_time(jump_distance: f32, tuning: &JumpTuning) -> f32 {
    let reach = (jump_distance.abs() / tuning.reference_distance).clamp(0.0, 1.0);
    tuning.base_time + reach * tuning.time_range
}

/// Plan a jump from `player_pos` toward the center of `target`
pub fn plan_jump(
    power: f32,
    player_pos: Vec2,
    player_height: f32,
    target: &Platform,
    tuning: &JumpTuning,
) -> JumpPlan {
    let distance_to_target = target.x - player_pos.x;
    let jump_distance = distance_to_target * accuracy(power, &tuning.bands);
    let jump_height = jump_height(power, tuning);
    let flight_time = flight_time(jump_distance, tuning);

    let half_time = flight_time / 2.0;
    let gravity = -2.0 * jump_height / (half_time * half_time);
    let velocity = Vec2::new(jump_distance / flight_time, -gravity * half_time);

    log::debug!(
        "plan: power={:.2} band={} D={:.1} dist={:.1} height={:.1} T={:.2}s",
        power,
        band_index(power, &tuning.bands),
        distance_to_target,
        jump_distance,
        jump_height,
        flight_time
    );

    JumpPlan {
        velocity,
        gravity,
        target_x: player_pos.x + jump_distance,
        target_y: target.y - player_height / 2.0,
        jump_distance,
        jump_height,
        flight_time,
    }
}

/// Sample a quadratic Bézier arc from `start` to `end` whose control point is
/// lifted `height` above `start`, for drawing a trajectory hint.
pub fn preview_path(start: Vec2, end: Vec2, height: f32, steps: usize) -> Vec<Vec2> {
    if steps == 0 {
        return vec![start, end];
    }
    (0..=steps)
        .map(|i| {
            let t = i as f32 / steps as f32;
            let u = 1.0 - t;
            let x = start.x + (end.x - start.x) * t;
            let y = start.y * u * u + (start.y + height) * 2.0 * u * t + end.y * t * t;
            Vec2::new(x, y)
        })
        .collect()
}
