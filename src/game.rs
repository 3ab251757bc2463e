//! Session orchestration
//!
//! `JumpGame` owns the simulation and the host collaborators. Commands and
//! frame updates go in; events come out of the state and are fanned out to the
//! HUD, audio and storage. Nothing here returns an error: storage failures are
//! logged and play continues.

use crate::audio::{Audio, SoundEffect};
use crate::highscores::Rankings;
use crate::host::{Clock, InputEvent, RawInput, map_raw};
use crate::persistence::{Store, load_best_score, save_best_score};
use crate::renderer::{Display, draw_frame};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Session, tick};
use crate::tuning::Tuning;
use crate::ui::UiListener;

/// Collaborators injected by the host
pub struct Host {
    pub store: Box<dyn Store>,
    pub ui: Box<dyn UiListener>,
    pub audio: Box<dyn Audio>,
    pub clock: Box<dyn Clock>,
}

pub struct JumpGame {
    state: GameState,
    settings: Settings,
    host: Host,
    /// Rank reached by the last finished run, if it made the table
    last_rank: Option<usize>,
}

impl JumpGame {
    /// Build a game on the title screen, restoring best score and settings.
    /// Tuning that fails validation is replaced by the defaults.
    pub fn new(seed: u64, tuning: Tuning, mut host: Host) -> Self {
        let tuning = match tuning.validate() {
            Ok(()) => tuning,
            Err(e) => {
                log::warn!("invalid tuning, using defaults: {}", e);
                Tuning::default()
            }
        };
        let settings = Settings::load(host.store.as_ref());
        let best = load_best_score(host.store.as_ref());

        let mut state = GameState::new(seed, tuning);
        state.session = Session::with_best(best);
        state.landing_mode = settings.landing_mode;

        host.audio.set_sound_enabled(settings.sound_enabled);
        host.audio.set_music_enabled(settings.music_enabled);
        host.ui.on_score_changed(0, best);
        host.ui.on_phase_changed(state.phase);

        log::info!("game ready (seed={}, best={})", seed, best);
        Self {
            state,
            settings,
            host,
            last_rank: None,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that restore or script a session
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn store(&self) -> &dyn Store {
        self.host.store.as_ref()
    }

    pub fn last_rank(&self) -> Option<usize> {
        self.last_rank
    }

    /// Ranking table as currently stored
    pub fn rankings(&self) -> Rankings {
        Rankings::load(self.host.store.as_ref())
    }

    /// Apply and persist new settings
    pub fn set_settings(&mut self, settings: Settings) {
        self.host.audio.set_sound_enabled(settings.sound_enabled);
        self.host.audio.set_music_enabled(settings.music_enabled);
        if settings.music_enabled && self.state.phase == GamePhase::Playing {
            self.host.audio.play_music();
        }
        self.state.landing_mode = settings.landing_mode;
        if let Err(e) = settings.save(self.host.store.as_mut()) {
            log::warn!("failed to save settings: {}", e);
        }
        self.settings = settings;
    }

    // === Commands ===

    pub fn start(&mut self) {
        self.last_rank = None;
        self.state.start();
        self.dispatch_events();
    }

    pub fn reset(&mut self) {
        self.last_rank = None;
        self.state.reset();
        self.dispatch_events();
    }

    pub fn pause(&mut self) {
        self.state.pause();
        self.dispatch_events();
    }

    pub fn resume(&mut self) {
        self.state.resume();
        self.dispatch_events();
    }

    pub fn menu(&mut self) {
        self.state.to_menu();
        self.dispatch_events();
    }

    /// Apply a game command; `now_ms` timestamps charge input
    pub fn handle(&mut self, event: InputEvent, now_ms: f64) {
        log::trace!("input {:?} at {:.1}ms", event, now_ms);
        match event {
            InputEvent::ChargeBegin => self.state.charge_begin(now_ms),
            InputEvent::ChargeEnd => self.state.charge_end(now_ms),
            InputEvent::Pause => self.state.pause(),
            InputEvent::Resume => self.state.resume(),
            InputEvent::Reset => {
                self.last_rank = None;
                self.state.reset();
            }
            InputEvent::Menu => self.state.to_menu(),
        }
        self.dispatch_events();
    }

    /// Map and apply raw host input, timestamped by the clock
    pub fn handle_raw(&mut self, raw: &RawInput) {
        if let Some(event) = map_raw(raw, self.state.phase) {
            let now = self.host.clock.now_ms();
            self.handle(event, now);
        }
    }

    /// Advance by one frame of `dt` seconds
    pub fn update(&mut self, dt: f32) {
        tick(&mut self.state, dt);
        self.dispatch_events();
    }

    /// Gauge level for the HUD
    pub fn charge_level(&mut self, now_ms: f64) -> f32 {
        self.state.charge_level(now_ms)
    }

    pub fn render(&self, display: &mut dyn Display, now_ms: f64) {
        draw_frame(&self.state, now_ms, self.settings.show_trajectory, display);
    }

    // === Event fan-out ===

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::PhaseChanged(phase) => {
                    match phase {
                        GamePhase::Playing => self.host.audio.play_music(),
                        _ => self.host.audio.pause_music(),
                    }
                    self.host.ui.on_phase_changed(phase);
                }
                GameEvent::ScoreChanged { score, best } => {
                    self.host.ui.on_score_changed(score, best);
                }
                GameEvent::ChargeStarted => self.host.audio.play(SoundEffect::Charge),
                GameEvent::Jumped { power } => {
                    log::debug!("jump power={:.2}", power);
                    self.host.audio.play(SoundEffect::Jump);
                }
                GameEvent::Landed { .. } => self.host.audio.play(SoundEffect::Land),
                GameEvent::Missed { x } => log::debug!("missed at x={:.1}", x),
                GameEvent::GameOver { score, best } => {
                    self.host.audio.play(SoundEffect::GameOver);
                    self.record_run(score, best);
                    self.host.ui.on_game_over(score, best);
                }
                GameEvent::Recovered => log::warn!("session recovered from a corrupt state"),
            }
        }
    }

    /// Persist the best score and add the run to the rankings
    fn record_run(&mut self, score: u32, best: u32) {
        let store = self.host.store.as_mut();
        if best > load_best_score(store) {
            match save_best_score(store, best) {
                Ok(()) => log::info!("new best score {}", best),
                Err(e) => log::warn!("failed to save best score: {}", e),
            }
        }

        let date = self.host.clock.date_label();
        match Rankings::record(store, score, &date) {
            Ok(rank) => {
                if let Some(rank) = rank {
                    log::info!("run ranked #{}", rank);
                }
                self.last_rank = rank;
            }
            Err(e) => log::warn!("failed to save rankings: {}", e),
        }
    }
}
