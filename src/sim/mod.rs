//! Deterministic game-state engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Virtual clock only (no wall time)
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering, input, audio or storage dependencies

pub mod engine;
pub mod layout;
pub mod level;
pub mod palette;
pub mod schedule;
pub mod state;

pub use engine::{GameEngine, Placement, Snapshot};
pub use layout::{LayoutSample, Rect, pick_valid_position, sample_position};
pub use level::populate_level;
pub use palette::{Color, NamedColor, PALETTE, pick_distinct_color, pick_distinct_color_capped};
pub use schedule::{Job, Scheduler, TaskHandle};
pub use state::{Cue, GameEvent, GamePhase, RoundState, Target, Token};
