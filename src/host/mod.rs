//! Host abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time and calendar dates
//! - Raw key/mouse/touch input

pub mod clock;
pub mod input;

pub use clock::{Clock, ManualClock};
pub use input::{InputEvent, RawInput, map_raw};

#[cfg(target_arch = "wasm32")]
pub use clock::JsClock;
#[cfg(not(target_arch = "wasm32"))]
pub use clock::SystemClock;
