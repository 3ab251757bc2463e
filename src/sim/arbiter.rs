//! Landing arbitration
//!
//! A landing succeeds when the player's footprint, widened by a fixed
//! tolerance on each side, overlaps the target platform's span. Judgement is a
//! pure function of its inputs; there is no chance involved.

use serde::{Deserialize, Serialize};

use super::platforms::Platform;
use crate::tuning::LandingTuning;

/// Horizontal overlap test between a player footprint and a platform
#[inline]
pub fn judge(
    player_x: f32,
    player_radius: f32,
    platform_x: f32,
    platform_width: f32,
    tolerance: f32,
) -> bool {
    let player_left = player_x - player_radius;
    let player_right = player_x + player_radius;
    let platform_left = platform_x - platform_width / 2.0;
    let platform_right = platform_x + platform_width / 2.0;
    player_right + tolerance >= platform_left && player_left - tolerance <= platform_right
}

/// Strategy deciding whether a touchdown counts
pub trait LandingPolicy {
    fn judge(&self, player_x: f32, player_radius: f32, target: &Platform) -> bool;
}

/// The normal rule: configured tolerance on both edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardLanding {
    pub tolerance: f32,
}

impl LandingPolicy for StandardLanding {
    fn judge(&self, player_x: f32, player_radius: f32, target: &Platform) -> bool {
        judge(player_x, player_radius, target.x, target.width, self.tolerance)
    }
}

/// Easy mode: the tolerance is scaled up, still deterministic
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForgivingLanding {
    pub tolerance: f32,
    pub scale: f32,
}

impl LandingPolicy for ForgivingLanding {
    fn judge(&self, player_x: f32, player_radius: f32, target: &Platform) -> bool {
        judge(
            player_x,
            player_radius,
            target.x,
            target.width,
            self.tolerance * self.scale.max(1.0),
        )
    }
}

/// Which landing policy a session uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LandingMode {
    #[default]
    Standard,
    Forgiving,
}

impl LandingMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            LandingMode::Standard => "Standard",
            LandingMode::Forgiving => "Forgiving",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "standard" | "normal" => Some(LandingMode::Standard),
            "forgiving" | "easy" => Some(LandingMode::Forgiving),
            _ => None,
        }
    }

    /// Resolve to a concrete policy
    pub fn policy(&self, tuning: &LandingTuning) -> Box<dyn LandingPolicy> {
        match self {
            LandingMode::Standard => Box::new(StandardLanding {
                tolerance: tuning.tolerance,
            }),
            LandingMode::Forgiving => Box::new(ForgivingLanding {
                tolerance: tuning.tolerance,
                scale: tuning.forgiving_scale,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TOLERANCE: f32 = 35.0;

    fn target() -> Platform {
        Platform::new(300.0, 400.0, 80.0, 20.0)
    }

    #[test]
    fn test_near_center_lands() {
        assert!(judge(295.0, 15.0, 300.0, 80.0, TOLERANCE));
    }

    #[test]
    fn test_within_tolerance_lands() {
        // 60 px off center: inside half-width plus tolerance
        assert!(judge(360.0, 15.0, 300.0, 80.0, TOLERANCE));
        assert!(judge(240.0, 15.0, 300.0, 80.0, TOLERANCE));
    }

    #[test]
    fn test_far_miss() {
        assert!(!judge(400.0, 15.0, 300.0, 80.0, TOLERANCE));
        assert!(!judge(200.0, 15.0, 300.0, 80.0, TOLERANCE));
    }

    #[test]
    fn test_exact_boundary_is_inclusive() {
        // right edge 340 + tolerance 35 + radius 15 = 390
        assert!(judge(390.0, 15.0, 300.0, 80.0, TOLERANCE));
        assert!(!judge(390.5, 15.0, 300.0, 80.0, TOLERANCE));
    }

    #[test]
    fn test_forgiving_is_wider() {
        let tuning = LandingTuning::default();
        let standard = LandingMode::Standard.policy(&tuning);
        let forgiving = LandingMode::Forgiving.policy(&tuning);
        assert!(!standard.judge(400.0, 15.0, &target()));
        assert!(forgiving.judge(400.0, 15.0, &target()));
        assert!(!forgiving.judge(500.0, 15.0, &target()));
    }

    #[test]
    fn test_mode_names() {
        assert_eq!(LandingMode::from_str("EASY"), Some(LandingMode::Forgiving));
        assert_eq!(LandingMode::from_str("standard"), Some(LandingMode::Standard));
        assert_eq!(LandingMode::from_str("random"), None);
        assert_eq!(LandingMode::Forgiving.as_str(), "Forgiving");
    }

    proptest! {
        #[test]
        fn prop_judge_is_pure(
            x in -1000.0f32..1000.0,
            px in -1000.0f32..1000.0,
            w in 30.0f32..80.0,
        ) {
            let first = judge(x, 15.0, px, w, TOLERANCE);
            for _ in 0..8 {
                prop_assert_eq!(judge(x, 15.0, px, w, TOLERANCE), first);
            }
        }

        #[test]
        fn prop_matches_distance_rule(offset in -300.0f32..300.0) {
            let landed = judge(300.0 + offset, 15.0, 300.0, 80.0, TOLERANCE);
            let reach = 40.0 + 15.0 + TOLERANCE;
            if offset.abs() < reach - 0.01 {
                prop_assert!(landed);
            } else if offset.abs() > reach + 0.01 {
                prop_assert!(!landed);
            }
        }
    }
}
