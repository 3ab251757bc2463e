//! Platform course and viewport recentering
//!
//! During play exactly two platforms matter: the one the player stands on and
//! the one being jumped at. They are held in named slots rather than a list.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Player;
use super::difficulty::DifficultyState;
use crate::consts::RECENTER_HYSTERESIS;
use crate::tuning::PlatformTuning;

/// A landing pad, centered on (`x`, `y`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Platform {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x - self.width / 2.0
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width / 2.0
    }
}

/// Width of platforms generated at `difficulty`
pub fn platform_width(difficulty: f32, tuning: &PlatformTuning) -> f32 {
    (tuning.base_width - difficulty * tuning.width_per_difficulty).max(tuning.min_width)
}

/// Generate the platform that follows `last`
pub fn generate_next<R: Rng + ?Sized>(
    rng: &mut R,
    last: &Platform,
    difficulty: &DifficultyState,
    tuning: &PlatformTuning,
) -> Platform {
    let (lo, hi) = if difficulty.min_distance <= difficulty.max_distance {
        (difficulty.min_distance, difficulty.max_distance)
    } else {
        (difficulty.max_distance, difficulty.min_distance)
    };
    let distance = rng.random_range(lo..=hi);
    let jitter = tuning.vertical_jitter.abs();
    let dy = rng.random_range(-jitter..=jitter);

    Platform::new(
        last.x + distance,
        (last.y + dy).clamp(tuning.min_y, tuning.max_y),
        platform_width(difficulty.difficulty, tuning),
        tuning.height,
    )
}

/// The platform being stood on and the one being jumped at
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformPair {
    pub current: Platform,
    pub target: Platform,
}

impl PlatformPair {
    pub fn new(current: Platform, target: Platform) -> Self {
        Self { current, target }
    }

    /// Seed a fresh course: `current` as given, target generated after it
    pub fn seed<R: Rng + ?Sized>(
        rng: &mut R,
        current: Platform,
        difficulty: &DifficultyState,
        tuning: &PlatformTuning,
    ) -> Self {
        let target = generate_next(rng, &current, difficulty, tuning);
        Self { current, target }
    }

    /// Step onto the target: it becomes current and a new target is generated.
    /// Returns the discarded platform.
    pub fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        difficulty: &DifficultyState,
        tuning: &PlatformTuning,
    ) -> Platform {
        let next = generate_next(rng, &self.target, difficulty, tuning);
        let departed = std::mem::replace(&mut self.current, self.target);
        self.target = next;
        departed
    }

    pub fn iter(&self) -> impl Iterator<Item = &Platform> {
        [&self.current, &self.target].into_iter()
    }

    /// Shift every platform and the player so `current` sits at `desired_x`.
    /// Shifts at or under the hysteresis threshold are skipped; returns the
    /// amount actually subtracted.
    pub fn recenter(&mut self, player: &mut Player, desired_x: f32) -> f32 {
        let move_x = self.current.x - desired_x;
        if move_x.abs() <= RECENTER_HYSTERESIS {
            return 0.0;
        }
        self.shift(player, -move_x);
        move_x
    }

    /// Translate both platforms and the player by `dx`
    pub fn shift(&mut self, player: &mut Player, dx: f32) {
        self.current.x += dx;
        self.target.x += dx;
        player.shift_x(dx);
        log::trace!("viewport shifted by {:.1}", dx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn seed_pair(rng: &mut Pcg32) -> PlatformPair {
        PlatformPair::seed(
            rng,
            Platform::new(200.0, 400.0, 80.0, 20.0),
            &DifficultyState::default(),
            &PlatformTuning::default(),
        )
    }

    #[test]
    fn test_generate_within_ranges() {
        let mut rng = Pcg32::seed_from_u64(7);
        let tuning = PlatformTuning::default();
        let difficulty = DifficultyState::default();
        let last = Platform::new(200.0, 400.0, 80.0, 20.0);
        for _ in 0..200 {
            let p = generate_next(&mut rng, &last, &difficulty, &tuning);
            assert!(p.x >= 300.0 && p.x <= 400.0, "x = {}", p.x);
            assert!(p.y >= 360.0 && p.y <= 440.0, "y = {}", p.y);
            assert_eq!(p.height, 20.0);
        }
    }

    #[test]
    fn test_width_shrinks_to_floor() {
        let tuning = PlatformTuning::default();
        assert_eq!(platform_width(1.0, &tuning), 75.0);
        assert_eq!(platform_width(4.0, &tuning), 60.0);
        assert_eq!(platform_width(20.0, &tuning), 30.0);
    }

    #[test]
    fn test_vertical_band_clamps() {
        let mut rng = Pcg32::seed_from_u64(1);
        let tuning = PlatformTuning::default();
        let last = Platform::new(0.0, tuning.max_y, 80.0, 20.0);
        for _ in 0..50 {
            let p = generate_next(&mut rng, &last, &DifficultyState::default(), &tuning);
            assert!(p.y <= tuning.max_y);
        }
    }

    #[test]
    fn test_same_seed_same_course() {
        let mut a = Pcg32::seed_from_u64(42);
        let mut b = Pcg32::seed_from_u64(42);
        assert_eq!(seed_pair(&mut a), seed_pair(&mut b));
    }

    #[test]
    fn test_advance_shifts_target_to_current() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pair = seed_pair(&mut rng);
        let old_current = pair.current;
        let old_target = pair.target;
        let departed = pair.advance(
            &mut rng,
            &DifficultyState::default(),
            &PlatformTuning::default(),
        );
        assert_eq!(departed, old_current);
        assert_eq!(pair.current, old_target);
        assert!(pair.target.x > pair.current.x);
    }

    #[test]
    fn test_recenter_moves_everything() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pair = seed_pair(&mut rng);
        pair.current.x = 500.0;
        pair.target.x = 650.0;
        let mut player = Player::standing_on(&pair.current);
        let moved = pair.recenter(&mut player, 200.0);
        assert_eq!(moved, 300.0);
        assert_eq!(pair.current.x, 200.0);
        assert_eq!(pair.target.x, 350.0);
        assert_eq!(player.pos, Vec2::new(200.0, player.pos.y));
    }

    #[test]
    fn test_recenter_hysteresis() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut pair = seed_pair(&mut rng);
        pair.current.x = 204.0;
        let before = pair.clone();
        let mut player = Player::standing_on(&pair.current);
        assert_eq!(pair.recenter(&mut player, 200.0), 0.0);
        assert_eq!(pair, before);
    }

    proptest! {
        #[test]
        fn prop_advance_keeps_both_slots(seed in any::<u64>(), landings in 1usize..200) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let tuning = PlatformTuning::default();
            let mut difficulty = DifficultyState::default();
            let mut pair = seed_pair(&mut rng);
            let mut player = Player::standing_on(&pair.current);
            for _ in 0..landings {
                pair.advance(&mut rng, &difficulty, &tuning);
                pair.recenter(&mut player, 200.0);
                difficulty.apply(&Default::default());
                prop_assert_eq!(pair.iter().count(), 2);
                prop_assert!(pair.target.x > pair.current.x);
                prop_assert!(pair.target.width >= tuning.min_width);
            }
        }
    }
}
