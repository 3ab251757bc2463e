//! Input mapping
//!
//! One button drives the whole game: Space, the primary mouse button or a
//! touch all charge on press and jump on release.

use serde::{Deserialize, Serialize};

use crate::sim::GamePhase;

/// Game-level commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    ChargeBegin,
    ChargeEnd,
    Pause,
    Resume,
    /// Start a fresh run
    Reset,
    /// Back to the title screen
    Menu,
}

/// Raw host input, as delivered by the browser or a native window
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawInput {
    /// `code` follows `KeyboardEvent.code` ("Space", "Escape", ...)
    KeyDown { code: String, repeat: bool },
    KeyUp { code: String },
    MouseDown { button: i16 },
    MouseUp { button: i16 },
    TouchStart,
    TouchEnd,
    /// Window lost focus or the tab was hidden
    FocusLost,
}

/// Primary mouse button as reported by `MouseEvent.button`
pub const PRIMARY_BUTTON: i16 = 0;

/// Translate a raw input into a game command for the given phase
pub fn map_raw(raw: &RawInput, phase: GamePhase) -> Option<InputEvent> {
    match raw {
        // Held keys auto-repeat; only the first press starts a charge
        RawInput::KeyDown { code, repeat: false } => match (code.as_str(), phase) {
            ("Space", GamePhase::Playing) => Some(InputEvent::ChargeBegin),
            ("Escape", GamePhase::Playing) => Some(InputEvent::Pause),
            ("Escape", GamePhase::Paused) => Some(InputEvent::Resume),
            ("Enter", GamePhase::Menu | GamePhase::GameOver) => Some(InputEvent::Reset),
            _ => None,
        },
        RawInput::KeyDown { repeat: true, .. } => None,
        RawInput::KeyUp { code } if code == "Space" => Some(InputEvent::ChargeEnd),
        RawInput::KeyUp { .. } => None,
        RawInput::MouseDown { button } if *button == PRIMARY_BUTTON => {
            (phase == GamePhase::Playing).then_some(InputEvent::ChargeBegin)
        }
        RawInput::MouseUp { button } if *button == PRIMARY_BUTTON => Some(InputEvent::ChargeEnd),
        RawInput::MouseDown { .. } | RawInput::MouseUp { .. } => None,
        RawInput::TouchStart => (phase == GamePhase::Playing).then_some(InputEvent::ChargeBegin),
        RawInput::TouchEnd => Some(InputEvent::ChargeEnd),
        RawInput::FocusLost => (phase == GamePhase::Playing).then_some(InputEvent::Pause),
    }
}
