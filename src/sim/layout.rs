//! Spawn positions
//!
//! Rejection sampling with a hard attempt budget. Running out of budget is
//! not an error: the last sample is used and the overlap is only logged.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::is_separated;

/// Axis-aligned rectangle, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_size(size: Vec2) -> Self {
        Self::new(Vec2::ZERO, size)
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Uniform point inside the rectangle. Degenerate axes collapse to their midpoint.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> Vec2 {
        Vec2::new(
            sample_axis(self.min.x, self.max.x, rng),
            sample_axis(self.min.y, self.max.y, rng),
        )
    }
}

fn sample_axis<R: Rng>(lo: f32, hi: f32, rng: &mut R) -> f32 {
    if lo < hi {
        rng.random_range(lo..=hi)
    } else {
        (lo + hi) * 0.5
    }
}

/// Result of one placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutSample {
    pub point: Vec2,
    /// Samples drawn, never more than the budget
    pub attempts: u32,
    /// False if the budget ran out and `point` may overlap
    pub separated: bool,
}

/// Search for a point in `bounds` at least `min_separation` from all of `existing`
pub fn sample_position<R: Rng>(
    existing: &[Vec2],
    bounds: Rect,
    min_separation: f32,
    max_attempts: u32,
    rng: &mut R,
) -> LayoutSample {
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;
    loop {
        let point = bounds.sample(rng);
        attempts += 1;
        let separated = is_separated(point, existing, min_separation);
        if separated || attempts >= max_attempts {
            return LayoutSample {
                point,
                attempts,
                separated,
            };
        }
    }
}

/// Best-effort spawn position. Never fails; may overlap when space runs out.
pub fn pick_valid_position<R: Rng>(
    existing: &[Vec2],
    bounds: Rect,
    min_separation: f32,
    max_attempts: u32,
    rng: &mut R,
) -> Vec2 {
    let sample = sample_position(existing, bounds, min_separation, max_attempts, rng);
    if !sample.separated {
        log::warn!(
            "No position {} away from {} others after {} attempts, overlapping at {:?}",
            min_separation,
            existing.len(),
            sample.attempts,
            sample.point
        );
    }
    sample.point
}
