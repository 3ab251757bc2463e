//! Data-driven game balance
//!
//! Every tunable number the simulation reads lives here. Defaults reproduce the
//! shipped feel; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading or validating a tuning document
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning JSON could not be parsed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("at least one accuracy band is required")]
    NoBands,
    #[error("accuracy band {index} ends at {up_to}, before the previous band")]
    UnsortedBands { index: usize, up_to: f32 },
    #[error("accuracy bands end at power {0}, but must reach 1.0")]
    BandsTooShort(f32),
    #[error("{field} must be {expected}, got {value}")]
    OutOfRange {
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Charge gauge parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeTuning {
    /// Hold time (ms) that saturates the gauge
    pub max_charge_ms: f64,
    /// Weakest power a release can produce
    pub min_power: f32,
}

impl Default for ChargeTuning {
    fn default() -> Self {
        Self {
            max_charge_ms: 1000.0,
            min_power: 0.2,
        }
    }
}

/// One slice of the power range and the distance fractions it maps to.
///
/// The band covers power from the previous band's `up_to` (or 0) to its own
/// `up_to`; the fraction of the target distance grows linearly from
/// `min_fraction` to `max_fraction` across that slice.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AccuracyBand {
    pub up_to: f32,
    pub min_fraction: f32,
    pub max_fraction: f32,
}

impl AccuracyBand {
    pub const fn new(up_to: f32, min_fraction: f32, max_fraction: f32) -> Self {
        Self {
            up_to,
            min_fraction,
            max_fraction,
        }
    }
}

/// Jump planner parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JumpTuning {
    /// Accuracy bands ordered by ascending `up_to`
    pub bands: Vec<AccuracyBand>,
    /// Apex height at minimum power (negative is up)
    pub min_height: f32,
    /// Apex height at full power
    pub max_height: f32,
    /// Flight time of a zero-length hop (seconds)
    pub base_time: f32,
    /// Hop length that earns the full `time_range`
    pub reference_distance: f32,
    /// Extra flight time for long hops (seconds)
    pub time_range: f32,
    /// Gravity outside planned flights (pixels/s²).
    /// Each planned jump solves its own gravity so the apex falls at half the
    /// flight time; this value only applies while grounded and after a miss.
    pub gravity: f32,
}

impl Default for JumpTuning {
    fn default() -> Self {
        Self {
            bands: vec![
                // Weak charge: falls short, but still covers half the gap
                AccuracyBand::new(0.35, 0.5, 0.85),
                // Lands near the near edge
                AccuracyBand::new(0.5, 0.9, 0.97),
                // Golden zone
                AccuracyBand::new(0.75, 0.97, 1.03),
                // Overcharged: flies past the center, may miss the far edge
                AccuracyBand::new(1.0, 1.05, 1.4),
            ],
            min_height: -150.0,
            max_height: -320.0,
            base_time: 0.8,
            reference_distance: 300.0,
            time_range: 0.6,
            gravity: DEFAULT_GRAVITY,
        }
    }
}

/// Landing arbitration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandingTuning {
    /// Horizontal slack added to both platform edges (pixels)
    pub tolerance: f32,
    /// Tolerance multiplier for the forgiving policy
    pub forgiving_scale: f32,
}

impl Default for LandingTuning {
    fn default() -> Self {
        Self {
            tolerance: 35.0,
            forgiving_scale: 2.0,
        }
    }
}

/// Platform generation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformTuning {
    /// Maximum vertical offset between neighbours
    pub vertical_jitter: f32,
    /// Width at difficulty 0
    pub base_width: f32,
    /// Width lost per difficulty point
    pub width_per_difficulty: f32,
    pub min_width: f32,
    pub height: f32,
    /// Vertical band platforms are kept inside
    pub min_y: f32,
    pub max_y: f32,
}

impl Default for PlatformTuning {
    fn default() -> Self {
        Self {
            vertical_jitter: 40.0,
            base_width: SEED_PLATFORM_WIDTH,
            width_per_difficulty: 5.0,
            min_width: MIN_PLATFORM_WIDTH,
            height: PLATFORM_HEIGHT,
            min_y: 250.0,
            max_y: 520.0,
        }
    }
}

/// Difficulty escalation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyTuning {
    pub start_difficulty: f32,
    pub difficulty_step: f32,
    pub start_min_distance: f32,
    pub start_max_distance: f32,
    pub distance_step: f32,
    pub min_distance_cap: f32,
    pub max_distance_cap: f32,
}

impl Default for DifficultyTuning {
    fn default() -> Self {
        Self {
            start_difficulty: 1.0,
            difficulty_step: 0.1,
            start_min_distance: 100.0,
            start_max_distance: 200.0,
            distance_step: 5.0,
            min_distance_cap: 200.0,
            max_distance_cap: 350.0,
        }
    }
}

/// Visible area and recentering anchor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportTuning {
    pub width: f32,
    pub height: f32,
    /// Screen fraction where the current platform is parked
    pub anchor_fraction: f32,
    /// Distance from either edge that triggers a recenter
    pub edge_margin: f32,
}

impl ViewportTuning {
    /// Screen x the current platform is recentered to
    pub fn anchor_x(&self) -> f32 {
        self.width * self.anchor_fraction
    }
}

impl Default for ViewportTuning {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            anchor_fraction: 0.25,
            edge_margin: 40.0,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub charge: ChargeTuning,
    pub jump: JumpTuning,
    pub landing: LandingTuning,
    pub platforms: PlatformTuning,
    pub difficulty: DifficultyTuning,
    pub viewport: ViewportTuning,
    /// Simulated seconds between a missed landing and game over
    pub game_over_delay: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            charge: ChargeTuning::default(),
            jump: JumpTuning::default(),
            landing: LandingTuning::default(),
            platforms: PlatformTuning::default(),
            difficulty: DifficultyTuning::default(),
            viewport: ViewportTuning::default(),
            game_over_delay: 0.6,
        }
    }
}

impl Tuning {
    /// Parse and validate a JSON tuning document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        let bands = &self.jump.bands;
        if bands.is_empty() {
            return Err(TuningError::NoBands);
        }
        let mut previous = 0.0;
        for (index, band) in bands.iter().enumerate() {
            if band.up_to < previous {
                return Err(TuningError::UnsortedBands {
                    index,
                    up_to: band.up_to,
                });
            }
            positive("jump.bands.min_fraction", band.min_fraction)?;
            positive("jump.bands.max_fraction", band.max_fraction)?;
            previous = band.up_to;
        }
        if previous < 1.0 {
            return Err(TuningError::BandsTooShort(previous));
        }

        if !(self.charge.min_power > 0.0 && self.charge.min_power <= 1.0) {
            return Err(TuningError::OutOfRange {
                field: "charge.min_power",
                expected: "in (0, 1]",
                value: self.charge.min_power as f64,
            });
        }
        if self.charge.max_charge_ms <= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "charge.max_charge_ms",
                expected: "positive",
                value: self.charge.max_charge_ms,
            });
        }
        positive("jump.base_time", self.jump.base_time)?;
        if self.jump.time_range < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "jump.time_range",
                expected: "non-negative",
                value: self.jump.time_range as f64,
            });
        }
        positive("jump.base_time + jump.time_range", self.jump.base_time + self.jump.time_range)?;
        positive("jump.reference_distance", self.jump.reference_distance)?;
        positive("jump.gravity", self.jump.gravity)?;
        if self.jump.min_height >= 0.0 || self.jump.max_height >= 0.0 {
            return Err(TuningError::OutOfRange {
                field: "jump.min_height/max_height",
                expected: "negative (upward)",
                value: self.jump.min_height.max(self.jump.max_height) as f64,
            });
        }
        if self.landing.tolerance < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "landing.tolerance",
                expected: "non-negative",
                value: self.landing.tolerance as f64,
            });
        }
        if self.platforms.min_y > self.platforms.max_y {
            return Err(TuningError::OutOfRange {
                field: "platforms.min_y",
                expected: "at most platforms.max_y",
                value: self.platforms.min_y as f64,
            });
        }
        positive("viewport.width", self.viewport.width)?;
        if self.game_over_delay.is_nan() || self.game_over_delay < 0.0 {
            return Err(TuningError::OutOfRange {
                field: "game_over_delay",
                expected: "non-negative",
                value: self.game_over_delay as f64,
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), TuningError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(TuningError::OutOfRange {
            field,
            expected: "positive",
            value: value as f64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        Tuning::default().validate().unwrap();
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "landing": { "tolerance": 20.0 } }"#).unwrap();
        assert_eq!(tuning.landing.tolerance, 20.0);
        assert_eq!(tuning.landing.forgiving_scale, 2.0);
        assert_eq!(tuning.charge.max_charge_ms, 1000.0);
        assert_eq!(tuning.jump.bands.len(), 4);
        assert!((tuning.game_over_delay - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_rejects_short_bands() {
        let json = r#"{ "jump": { "bands": [ { "up_to": 0.5, "min_fraction": 0.9, "max_fraction": 1.0 } ] } }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::BandsTooShort(_))
        ));
    }

    #[test]
    fn test_rejects_unsorted_bands() {
        let mut tuning = Tuning::default();
        tuning.jump.bands.swap(0, 1);
        tuning.jump.bands[0].up_to = 0.6;
        assert!(matches!(
            tuning.validate(),
            Err(TuningError::UnsortedBands { index: 1, .. })
        ));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_min_power() {
        let mut tuning = Tuning::default();
        tuning.charge.min_power = 0.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_rejects_negative_time_range() {
        let json = r#"{ "jump": { "base_time": 0.5, "time_range": -0.5 } }"#;
        assert!(matches!(
            Tuning::from_json(json),
            Err(TuningError::OutOfRange { field: "jump.time_range", .. })
        ));
    }

    #[test]
    fn test_rejects_negative_game_over_delay() {
        let mut tuning = Tuning::default();
        tuning.game_over_delay = -1.0;
        assert!(tuning.validate().is_err());
    }

    #[test]
    fn test_anchor_x() {
        assert_eq!(ViewportTuning::default().anchor_x(), 200.0);
    }
}
