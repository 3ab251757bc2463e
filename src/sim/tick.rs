//! Per-frame update and session commands
//!
//! `tick` is driven by an external frame source with a variable `dt`; input
//! commands arrive between ticks with wall-clock timestamps for the gauge.

use glam::Vec2;

use super::state::{GameEvent, GamePhase, GameState, PendingTransition, seed_platform};
use super::body::Player;
use super::difficulty::DifficultyState;
use super::platforms::PlatformPair;
use super::trajectory::{plan_jump, preview_path};
use crate::consts::*;

/// Advance the game by one frame of `dt` seconds.
///
/// Frames longer than `MAX_STEP_DT` are split into sub-steps so a slow frame
/// cannot carry the player far past the landing height in one jump.
pub fn tick(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if !dt.is_finite() || dt <= 0.0 {
        log::trace!("skipping tick with dt={}", dt);
        return;
    }
    if !state.is_consistent() {
        log::warn!("inconsistent game state detected, restarting session");
        state.start();
        state.push_event(GameEvent::Recovered);
        return;
    }

    let mut remaining = dt.min(MAX_FRAME_DT);
    let mut substeps = 0;
    while remaining > 0.0 && substeps < MAX_SUBSTEPS {
        let step = remaining.min(MAX_STEP_DT);
        step_once(state, step);
        remaining -= step;
        substeps += 1;
        if state.phase != GamePhase::Playing {
            break;
        }
    }
}

fn step_once(state: &mut GameState, dt: f32) {
    state.player.update(dt);

    if state.deferred.is_pending() {
        // Falling out after a miss; no more landing checks
        if let Some(PendingTransition::GameOver) = state.deferred.advance(dt) {
            finish_game_over(state);
        }
        return;
    }

    if state.player.landing_due() {
        resolve_landing(state);
    } else if state.player.is_jumping() {
        keep_player_visible(state);
    }
}

/// Judge a touchdown against the target platform and apply the outcome
fn resolve_landing(state: &mut GameState) {
    let policy = state.landing_mode.policy(&state.tuning.landing);
    let player_x = state.player.pos.x;
    let landed = policy.judge(player_x, state.player.radius(), &state.platforms.target);

    log::debug!(
        "touchdown x={:.1} target=[{:.1}, {:.1}] -> {}",
        player_x,
        state.platforms.target.left(),
        state.platforms.target.right(),
        if landed { "landed" } else { "missed" }
    );

    if landed {
        state.player.land();
        state.session.score += 1;

        state.platforms.advance(
            &mut state.rng,
            &state.difficulty,
            &state.tuning.platforms,
        );
        let anchor = state.tuning.viewport.anchor_x();
        state.platforms.recenter(&mut state.player, anchor);
        state.difficulty.apply(&state.tuning.difficulty);

        let score = state.session.score;
        let best = state.session.best_score;
        state.push_event(GameEvent::Landed { score });
        state.push_event(GameEvent::ScoreChanged { score, best });
    } else {
        state.player.release_plan();
        let delay = state.tuning.game_over_delay;
        let token = state.deferred.schedule(delay, PendingTransition::GameOver);
        log::debug!("game over scheduled in {:.2}s ({:?})", delay, token);
        state.push_event(GameEvent::Missed { x: player_x });
    }
}

/// Scroll the course so a long flight never leaves the viewport margins
fn keep_player_visible(state: &mut GameState) {
    let viewport = &state.tuning.viewport;
    let x = state.player.pos.x;
    let left = viewport.edge_margin;
    let right = viewport.width - viewport.edge_margin;
    let dx = if x > right {
        right - x
    } else if x < left {
        left - x
    } else {
        return;
    };
    state.platforms.shift(&mut state.player, dx);
}

fn finish_game_over(state: &mut GameState) {
    state.gauge.cancel();
    state.session.commit_best();
    let score = state.session.score;
    let best = state.session.best_score;
    log::info!("game over: score={} best={} jumps={}", score, best, state.jumps);
    state.set_phase(GamePhase::GameOver);
    state.push_event(GameEvent::GameOver { score, best });
}

impl GameState {
    /// Begin a fresh run. Cancels any pending delayed transition first.
    pub fn start(&mut self) {
        if let Some(token) = self.deferred.cancel_pending() {
            log::info!("cancelled pending transition {:?}", token);
        }
        self.gauge.cancel();

        self.session.score = 0;
        self.difficulty = DifficultyState::from_tuning(&self.tuning.difficulty);
        let current = seed_platform(&self.tuning);
        self.platforms = PlatformPair::seed(
            &mut self.rng,
            current,
            &self.difficulty,
            &self.tuning.platforms,
        );
        self.player = Player::standing_on(&current).with_gravity(self.tuning.jump.gravity);
        self.jumps = 0;

        log::info!("session started (seed={})", self.seed);
        self.set_phase(GamePhase::Playing);
        self.push_event(GameEvent::ScoreChanged {
            score: 0,
            best: self.session.best_score,
        });
    }

    /// Restart from any phase
    pub fn reset(&mut self) {
        self.start();
    }

    /// Whether a charge may begin right now
    pub fn can_charge(&self) -> bool {
        self.phase == GamePhase::Playing
            && !self.player.is_jumping()
            && !self.deferred.is_pending()
    }

    /// Charge input went down at `now_ms`
    pub fn charge_begin(&mut self, now_ms: f64) {
        if !self.can_charge() || self.gauge.is_charging() {
            return;
        }
        self.gauge.begin(now_ms);
        self.push_event(GameEvent::ChargeStarted);
    }

    /// Charge input released at `now_ms`: plan and launch the jump
    pub fn charge_end(&mut self, now_ms: f64) {
        let Some(power) = self.gauge.release(now_ms, &self.tuning.charge) else {
            return;
        };
        if !self.can_charge() {
            return;
        }

        let plan = plan_jump(
            power,
            self.player.pos,
            self.player.height,
            &self.platforms.target,
            &self.tuning.jump,
        );
        if self.player.jump(&plan) {
            self.jumps += 1;
            self.push_event(GameEvent::Jumped { power });
        }
    }

    /// Current gauge level for display
    pub fn charge_level(&mut self, now_ms: f64) -> f32 {
        self.gauge.sample(now_ms, &self.tuning.charge)
    }

    /// Arc the player would fly if the charge were released at `now_ms`
    pub fn preview(&self, now_ms: f64, steps: usize) -> Option<Vec<Vec2>> {
        if !self.gauge.is_charging() {
            return None;
        }
        let power = self
            .gauge
            .level(now_ms, &self.tuning.charge)
            .max(self.tuning.charge.min_power);
        let plan = plan_jump(
            power,
            self.player.pos,
            self.player.height,
            &self.platforms.target,
            &self.tuning.jump,
        );
        let end = Vec2::new(plan.target_x, plan.target_y);
        // A quadratic Bézier peaks halfway to its control point
        Some(preview_path(self.player.pos, end, plan.jump_height * 2.0, steps))
    }

    /// Freeze ticking. A half-finished charge is dropped.
    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.gauge.cancel();
            self.set_phase(GamePhase::Paused);
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.set_phase(GamePhase::Playing);
        }
    }

    /// Leave a paused or finished run for the title screen
    pub fn to_menu(&mut self) {
        if matches!(self.phase, GamePhase::Paused | GamePhase::GameOver) {
            if let Some(token) = self.deferred.cancel_pending() {
                log::info!("cancelled pending transition {:?}", token);
            }
            self.gauge.cancel();
            self.set_phase(GamePhase::Menu);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::arbiter::LandingMode;
    use crate::sim::platforms::Platform;
    use crate::tuning::Tuning;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 120.0;

    fn playing(seed: u64) -> GameState {
        let mut state = GameState::new(seed, Tuning::default());
        state.start();
        state.drain_events();
        state
    }

    /// Charge for `hold_ms` then tick until the player is grounded again or
    /// the run ends
    fn jump(state: &mut GameState, hold_ms: f64) {
        state.charge_begin(0.0);
        state.charge_end(hold_ms);
        for _ in 0..2000 {
            tick(state, DT);
            if !state.player.is_jumping() || state.phase != GamePhase::Playing {
                break;
            }
        }
    }

    /// Put the target straight ahead at the same height so the golden zone lands
    fn level_target(state: &mut GameState, gap: f32) {
        let current = state.platforms.current;
        state.platforms.target = Platform::new(current.x + gap, current.y, 80.0, 20.0);
    }

    #[test]
    fn test_start_enters_playing() {
        let mut state = GameState::new(1, Tuning::default());
        state.start();
        assert_eq!(state.phase, GamePhase::Playing);
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::PhaseChanged(GamePhase::Playing)));
        assert!(events.contains(&GameEvent::ScoreChanged { score: 0, best: 0 }));
    }

    #[test]
    fn test_menu_does_not_tick() {
        let mut state = GameState::new(1, Tuning::default());
        state.charge_begin(0.0);
        assert!(!state.gauge.is_charging());
        let before = state.player.clone();
        tick(&mut state, DT);
        assert_eq!(state.player, before);
        assert!(state.drain_events().is_empty());
    }

    #[test]
    fn test_golden_jump_lands() {
        let mut state = playing(5);
        level_target(&mut state, 150.0);
        jump(&mut state, 600.0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.session.score, 1);
        assert!(!state.player.is_jumping());
        let events = state.drain_events();
        assert!(events.contains(&GameEvent::Landed { score: 1 }));
        // New current platform recentered to the anchor
        assert_eq!(state.platforms.current.x, 200.0);
    }

    #[test]
    fn test_weak_jump_misses_and_ends_after_delay() {
        let mut state = playing(5);
        level_target(&mut state, 400.0);
        state.charge_begin(0.0);
        state.charge_end(10.0);
        let mut missed_at = None;
        for i in 0..2000 {
            tick(&mut state, DT);
            if missed_at.is_none() && state.game_over_pending() {
                missed_at = Some(i);
                assert_eq!(state.phase, GamePhase::Playing);
            }
            if state.phase == GamePhase::GameOver {
                break;
            }
        }
        assert!(missed_at.is_some());
        assert_eq!(state.phase, GamePhase::GameOver);
        let events = state.drain_events();
        assert!(events.iter().any(|e| matches!(e, GameEvent::Missed { .. })));
        assert!(events.contains(&GameEvent::GameOver { score: 0, best: 0 }));
    }

    #[test]
    fn test_reset_cancels_pending_game_over() {
        let mut state = playing(5);
        level_target(&mut state, 400.0);
        state.charge_begin(0.0);
        state.charge_end(10.0);
        while !state.game_over_pending() {
            tick(&mut state, DT);
        }
        state.reset();
        assert!(!state.game_over_pending());
        // Well past the old delay: the cancelled transition must not fire
        for _ in 0..240 {
            tick(&mut state, DT);
        }
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_no_charge_while_airborne_or_falling_out() {
        let mut state = playing(5);
        level_target(&mut state, 400.0);
        state.charge_begin(0.0);
        state.charge_end(10.0);
        tick(&mut state, DT);
        state.charge_begin(20.0);
        assert!(!state.gauge.is_charging());
        while !state.game_over_pending() {
            tick(&mut state, DT);
        }
        state.charge_begin(100.0);
        assert!(!state.gauge.is_charging());
    }

    #[test]
    fn test_charge_end_without_begin_is_noop() {
        let mut state = playing(5);
        state.charge_end(500.0);
        assert!(!state.player.is_jumping());
        assert_eq!(state.jumps, 0);
    }

    #[test]
    fn test_pause_freezes_and_drops_charge() {
        let mut state = playing(5);
        state.charge_begin(0.0);
        state.pause();
        assert_eq!(state.phase, GamePhase::Paused);
        assert!(!state.gauge.is_charging());
        let before = state.player.clone();
        tick(&mut state, DT);
        assert_eq!(state.player, before);
        state.resume();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_long_flight_scrolls_course_with_player() {
        let mut state = playing(5);
        level_target(&mut state, 650.0);
        state.charge_begin(0.0);
        state.charge_end(1000.0);
        let right = state.tuning.viewport.width - state.tuning.viewport.edge_margin;
        let offset = state.player.target_x - state.platforms.target.x;
        let start_target_x = state.platforms.target.x;

        for _ in 0..2000 {
            tick(&mut state, DT);
            if !state.player.is_jumping() || state.game_over_pending() {
                break;
            }
            assert!(state.player.pos.x <= right + 1e-3, "player at {}", state.player.pos.x);
        }
        // Platforms and the planned touchdown moved together
        assert!(state.platforms.target.x < start_target_x);
        assert!((state.player.target_x - state.platforms.target.x - offset).abs() < 1e-2);
    }

    #[test]
    fn test_pause_mid_flight_resumes_trajectory() {
        let mut state = playing(5);
        level_target(&mut state, 150.0);
        state.charge_begin(0.0);
        state.charge_end(600.0);
        tick(&mut state, DT);
        state.pause();
        let frozen = state.player.pos;
        for _ in 0..10 {
            tick(&mut state, DT);
        }
        assert_eq!(state.player.pos, frozen);
        state.resume();
        for _ in 0..2000 {
            tick(&mut state, DT);
            if !state.player.is_jumping() {
                break;
            }
        }
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_to_menu_from_game_over() {
        let mut state = playing(5);
        level_target(&mut state, 400.0);
        jump(&mut state, 10.0);
        for _ in 0..200 {
            tick(&mut state, DT);
        }
        assert_eq!(state.phase, GamePhase::GameOver);
        state.to_menu();
        assert_eq!(state.phase, GamePhase::Menu);
    }

    #[test]
    fn test_to_menu_ignored_while_playing() {
        let mut state = playing(5);
        state.to_menu();
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_large_frame_is_substepped() {
        let mut state = playing(5);
        level_target(&mut state, 150.0);
        state.charge_begin(0.0);
        state.charge_end(600.0);
        // A handful of very long frames still resolve the landing
        for _ in 0..20 {
            tick(&mut state, 0.2);
            if !state.player.is_jumping() {
                break;
            }
        }
        assert_eq!(state.session.score, 1);
    }

    #[test]
    fn test_recovers_from_corrupt_state() {
        let mut state = playing(5);
        state.player.pos.y = f32::NAN;
        tick(&mut state, DT);
        assert!(state.is_consistent());
        assert_eq!(state.phase, GamePhase::Playing);
        assert!(state.drain_events().contains(&GameEvent::Recovered));
    }

    #[test]
    fn test_forgiving_mode_accepts_wider_miss() {
        let mut standard = playing(5);
        let mut forgiving = playing(5);
        forgiving.landing_mode = LandingMode::Forgiving;
        for state in [&mut standard, &mut forgiving] {
            level_target(state, 280.0);
            // Full overcharge flies 40% long: 112 px past the center
            jump(state, 1000.0);
        }
        assert!(standard.game_over_pending() || standard.phase == GamePhase::GameOver);
        assert_eq!(forgiving.session.score, 1);
    }

    #[test]
    fn test_preview_only_while_charging() {
        let mut state = playing(5);
        assert!(state.preview(0.0, 8).is_none());
        state.charge_begin(0.0);
        let path = state.preview(500.0, 8).unwrap();
        assert_eq!(path.len(), 9);
        assert_eq!(path[0], state.player.pos);
    }

    #[test]
    fn test_determinism() {
        let mut a = playing(99999);
        let mut b = playing(99999);
        for hold in [600.0, 650.0, 550.0] {
            jump(&mut a, hold);
            jump(&mut b, hold);
        }
        assert_eq!(a.session, b.session);
        assert_eq!(a.platforms, b.platforms);
        assert_eq!(a.player, b.player);
    }

    proptest! {
        #[test]
        fn prop_two_platforms_while_playing(seed in any::<u64>(), landings in 1usize..40) {
            let mut state = playing(seed);
            for _ in 0..landings {
                level_target(&mut state, 150.0);
                jump(&mut state, 600.0);
                prop_assert_eq!(state.phase, GamePhase::Playing);
                prop_assert_eq!(state.platforms.iter().count(), 2);
                prop_assert!(state.platforms.target.x > state.platforms.current.x);
            }
            prop_assert_eq!(state.session.score as usize, landings);
            prop_assert!(state.difficulty.min_distance <= 200.0);
            prop_assert!(state.difficulty.max_distance <= 350.0);
        }
    }
}
