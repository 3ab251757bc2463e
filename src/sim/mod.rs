//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Time only from explicit `dt` and caller-supplied timestamps
//! - No rendering, storage or platform dependencies

pub mod arbiter;
pub mod body;
pub mod difficulty;
pub mod gauge;
pub mod platforms;
pub mod state;
pub mod tick;
pub mod timer;
pub mod trajectory;

pub use arbiter::{ForgivingLanding, LandingMode, LandingPolicy, StandardLanding, judge};
pub use body::{Motion, Player};
pub use difficulty::DifficultyState;
pub use gauge::{PowerCharge, PowerGauge};
pub use platforms::{Platform, PlatformPair, generate_next, platform_width};
pub use state::{GameEvent, GamePhase, GameState, PendingTransition, Session};
pub use tick::tick;
pub use timer::{CancelToken, OneShot};
pub use trajectory::{JumpPlan, accuracy, jump_height, plan_jump, preview_path};
