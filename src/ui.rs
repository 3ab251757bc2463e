//! HUD and screen notifications

use crate::sim::GamePhase;

/// Receives score and screen changes from the game
pub trait UiListener {
    fn on_score_changed(&mut self, current: u32, best: u32);
    fn on_game_over(&mut self, final_score: u32, best: u32);
    fn on_phase_changed(&mut self, phase: GamePhase);
}

/// Listener that keeps the latest values, for hosts that poll the HUD
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct HudSnapshot {
    pub score: u32,
    pub best: u32,
    pub phase: Option<GamePhase>,
    /// Final score of the last finished run
    pub final_score: Option<u32>,
}

impl UiListener for HudSnapshot {
    fn on_score_changed(&mut self, current: u32, best: u32) {
        self.score = current;
        self.best = best;
    }

    fn on_game_over(&mut self, final_score: u32, best: u32) {
        self.final_score = Some(final_score);
        self.best = best;
    }

    fn on_phase_changed(&mut self, phase: GamePhase) {
        if phase == GamePhase::Playing {
            self.final_score = None;
        }
        self.phase = Some(phase);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_tracks_latest() {
        let mut hud = HudSnapshot::default();
        hud.on_phase_changed(GamePhase::Playing);
        hud.on_score_changed(3, 7);
        hud.on_game_over(3, 7);
        hud.on_phase_changed(GamePhase::GameOver);
        assert_eq!(hud.final_score, Some(3));
        assert_eq!(hud.phase, Some(GamePhase::GameOver));

        hud.on_phase_changed(GamePhase::Playing);
        assert_eq!(hud.final_score, None);
        assert_eq!(hud.best, 7);
    }
}
