//! Splashsort - a colour-sorting drag-and-drop puzzle
//!
//! Core modules:
//! - `sim`: Deterministic game-state engine (palette, layout, timers, scoring)
//! - `highscores`: Persisted best-level storage
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (volume, haptics)
//! - `persistence`: JSON save/load with atomic writes

pub mod error;
pub mod highscores;
pub mod persistence;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use error::{Result, SplashError};
pub use highscores::{FileHighScore, HighScoreStore, MemoryHighScore};
pub use settings::Settings;
pub use sim::{Color, GameEngine, GameEvent, GamePhase, Placement, Rect};
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Max distance between a dropped token and a target for the drop to count
    pub const CAPTURE_RADIUS: f32 = 25.0;
    /// Minimum distance between any two spawned tokens/targets
    pub const MIN_SEPARATION: f32 = 100.0;
    /// Layout samples before accepting an overlapping position
    pub const MAX_LAYOUT_ATTEMPTS: u32 = 100;

    /// Minimum RGB distance between colours used in the same level
    pub const COLOR_THRESHOLD: f32 = 0.5;
    /// Largest possible RGB distance (black to white)
    pub const MAX_COLOR_DISTANCE: f32 = 1.732_050_8;

    /// Seconds on the clock for the first level of a round
    pub const INITIAL_TIME_SECS: u32 = 10;
    /// Later levels get `LEVEL_TIME_BASE + level * LEVEL_TIME_STEP` seconds
    pub const LEVEL_TIME_BASE: u32 = 10;
    pub const LEVEL_TIME_STEP: u32 = 2;

    /// Countdown cadence
    pub const TICK_INTERVAL_MS: u64 = 1000;
    /// Delay from the winning match to the success cue
    pub const SUCCESS_CUE_DELAY_MS: u64 = 250;
    /// Delay from the winning match to the next level
    pub const ADVANCE_DELAY_MS: u64 = 750;

    /// Logical screen size (portrait phone)
    pub const ARENA_WIDTH: f32 = 390.0;
    pub const ARENA_HEIGHT: f32 = 844.0;
    /// Keeps objects fully visible, below the status band and above the HUD
    pub const INSET_SIDE: f32 = 50.0;
    pub const INSET_TOP: f32 = 100.0;
    pub const INSET_BOTTOM: f32 = 150.0;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// True if `point` is at least `min` away from every point in `others`
#[inline]
pub fn is_separated(point: Vec2, others: &[Vec2], min: f32) -> bool {
    others.iter().all(|&o| distance(point, o) >= min)
}
