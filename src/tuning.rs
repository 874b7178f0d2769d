//! Data-driven game balance
//!
//! Every number the engine plays by. Defaults come from [`crate::consts`].

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::{Result, SplashError};
use crate::persistence;
use crate::sim::Rect;

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Matching ===
    pub capture_radius: f32,

    // === Layout ===
    pub min_separation: f32,
    pub max_layout_attempts: u32,
    /// Logical screen size
    pub arena: Vec2,
    pub inset_side: f32,
    pub inset_top: f32,
    pub inset_bottom: f32,

    // === Colours ===
    pub color_threshold: f32,
    pub prefer_palette: bool,
    /// Cap on random colour samples. `None` retries until a colour fits.
    pub color_attempt_cap: Option<u32>,

    // === Clock ===
    pub initial_time_secs: u32,
    pub level_time_base: u32,
    pub level_time_step: u32,
    pub tick_interval_ms: u64,
    pub success_cue_delay_ms: u64,
    pub advance_delay_ms: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            capture_radius: CAPTURE_RADIUS,

            min_separation: MIN_SEPARATION,
            max_layout_attempts: MAX_LAYOUT_ATTEMPTS,
            arena: Vec2::new(ARENA_WIDTH, ARENA_HEIGHT),
            inset_side: INSET_SIDE,
            inset_top: INSET_TOP,
            inset_bottom: INSET_BOTTOM,

            color_threshold: COLOR_THRESHOLD,
            prefer_palette: true,
            color_attempt_cap: None,

            initial_time_secs: INITIAL_TIME_SECS,
            level_time_base: LEVEL_TIME_BASE,
            level_time_step: LEVEL_TIME_STEP,
            tick_interval_ms: TICK_INTERVAL_MS,
            success_cue_delay_ms: SUCCESS_CUE_DELAY_MS,
            advance_delay_ms: ADVANCE_DELAY_MS,
        }
    }
}

impl Tuning {
    /// Area objects may spawn in
    pub fn play_area(&self) -> Rect {
        Rect::new(
            Vec2::new(self.inset_side, self.inset_top),
            Vec2::new(
                self.arena.x - self.inset_side,
                self.arena.y - self.inset_bottom,
            ),
        )
    }

    /// Seconds on the clock when `level` starts (after the first level of a round)
    pub fn level_time(&self, level: u32) -> u32 {
        self.level_time_base
            .saturating_add(level.saturating_mul(self.level_time_step))
    }

    /// Reject values the engine cannot play with
    pub fn validate(&self) -> Result<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> Result<()> {
            Err(SplashError::InvalidTuning {
                field,
                reason: reason.into(),
            })
        }

        if !(self.capture_radius > 0.0 && self.capture_radius.is_finite()) {
            return invalid("capture_radius", "must be positive and finite");
        }
        if !(self.min_separation >= 0.0 && self.min_separation.is_finite()) {
            return invalid("min_separation", "must be finite and not negative");
        }
        if self.max_layout_attempts == 0 {
            return invalid("max_layout_attempts", "must be at least 1");
        }
        if !(self.color_threshold > 0.0 && self.color_threshold <= MAX_COLOR_DISTANCE) {
            return invalid(
                "color_threshold",
                format!("must be in (0, {MAX_COLOR_DISTANCE}]"),
            );
        }
        if self.color_attempt_cap == Some(0) {
            return invalid("color_attempt_cap", "must be at least 1 when set");
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms", "must be at least 1");
        }
        if self.advance_delay_ms < self.success_cue_delay_ms {
            return invalid(
                "advance_delay_ms",
                "must not be shorter than success_cue_delay_ms",
            );
        }
        if !self.arena.is_finite() {
            return invalid("arena", "must be finite");
        }
        let insets = [
            ("inset_side", self.inset_side),
            ("inset_top", self.inset_top),
            ("inset_bottom", self.inset_bottom),
        ];
        for (field, inset) in insets {
            if !inset.is_finite() {
                return invalid(field, "must be finite");
            }
        }
        if self.play_area().is_empty() {
            return invalid("arena", "insets leave no play area");
        }
        Ok(())
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self> {
        let tuning: Self = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load from disk, falling back to defaults if the file is missing
    pub fn load(path: &Path) -> Result<Self> {
        let tuning = persistence::load_json::<Self>(path)?.unwrap_or_default();
        tuning.validate()?;
        Ok(tuning)
    }
}
