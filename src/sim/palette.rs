//! Colours and distinct-colour picking
//!
//! Distance is plain Euclidean RGB. Alpha is carried but never compared.

use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

/// An RGBA colour with channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    /// Opaque colour
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Opaque colour from a 24-bit `0xRRGGBB` value
    pub fn from_rgb24(rgb: u32) -> Self {
        Self::rgb(
            ((rgb >> 16) & 0xFF) as f32 / 255.0,
            ((rgb >> 8) & 0xFF) as f32 / 255.0,
            (rgb & 0xFF) as f32 / 255.0,
        )
    }

    /// Parse `RGB`, `RRGGBB` or `AARRGGBB` hex, ignoring surrounding
    /// punctuation such as `#`. Anything else is opaque black.
    pub fn from_hex(hex: &str) -> Self {
        let hex = hex.trim_matches(|c: char| !c.is_ascii_alphanumeric());
        let Ok(v) = u32::from_str_radix(hex, 16) else {
            return Self::BLACK;
        };
        let channel = |shift: u32| ((v >> shift) & 0xFF) as f32 / 255.0;
        match hex.len() {
            3 => {
                let nibble = |shift: u32| ((v >> shift) & 0xF) as f32 * 17.0 / 255.0;
                Self::rgb(nibble(8), nibble(4), nibble(0))
            }
            6 => Self::from_rgb24(v),
            8 => Self {
                r: channel(16),
                g: channel(8),
                b: channel(0),
                a: channel(24),
            },
            _ => Self::BLACK,
        }
    }

    /// Uniform sample from the 24-bit colour space
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::from_rgb24(rng.random_range(0..=0xFF_FFFF))
    }

    /// Euclidean RGB distance, at most √3
    pub fn distance(&self, other: &Color) -> f32 {
        let dr = self.r - other.r;
        let dg = self.g - other.g;
        let db = self.b - other.b;
        (dr * dr + dg * dg + db * db).sqrt()
    }

    /// Distance to the closest colour in `others` (infinite if empty)
    pub fn nearest_distance(&self, others: &[Color]) -> f32 {
        others
            .iter()
            .map(|o| self.distance(o))
            .fold(f32::INFINITY, f32::min)
    }
}

/// A palette entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NamedColor {
    pub name: &'static str,
    pub color: Color,
}

const fn named(name: &'static str, r: f32, g: f32, b: f32) -> NamedColor {
    NamedColor {
        name,
        color: Color::rgb(r, g, b),
    }
}

/// Preferred colours, tried before random ones
pub const PALETTE: [NamedColor; 12] = [
    named("red", 1.0, 0.231, 0.188),
    named("green", 0.204, 0.780, 0.349),
    named("blue", 0.0, 0.478, 1.0),
    named("yellow", 1.0, 0.800, 0.0),
    named("orange", 1.0, 0.584, 0.0),
    named("purple", 0.686, 0.322, 0.871),
    named("pink", 1.0, 0.176, 0.333),
    named("gray", 0.557, 0.557, 0.576),
    named("cyan", 0.196, 0.678, 0.902),
    named("brown", 0.635, 0.518, 0.369),
    named("indigo", 0.345, 0.337, 0.839),
    named("mint", 0.0, 0.780, 0.745),
];

/// Pick a colour at least `threshold` away from every colour in `existing`.
///
/// With `prefer_palette`, a random surviving [`PALETTE`] entry is used when
/// one exists. Otherwise random colours are drawn until one fits. That loop
/// has no cap: it only terminates if the unit cube still has room, which
/// holds for the handful of colours a level uses.
pub fn pick_distinct_color<R: Rng>(
    existing: &[Color],
    threshold: f32,
    prefer_palette: bool,
    rng: &mut R,
) -> Color {
    pick_distinct_color_capped(existing, threshold, prefer_palette, None, rng)
}

/// [`pick_distinct_color`] with an optional cap on random samples.
///
/// When the cap runs out, the sample farthest from its nearest existing
/// colour is returned.
pub fn pick_distinct_color_capped<R: Rng>(
    existing: &[Color],
    threshold: f32,
    prefer_palette: bool,
    max_random_attempts: Option<u32>,
    rng: &mut R,
) -> Color {
    if prefer_palette {
        let survivors: Vec<Color> = PALETTE
            .iter()
            .map(|n| n.color)
            .filter(|c| c.nearest_distance(existing) >= threshold)
            .collect();
        if let Some(&color) = survivors.choose(rng) {
            return color;
        }
        log::debug!(
            "Palette exhausted with {} colours in use, sampling random colours",
            existing.len()
        );
    }

    let mut best: Option<(Color, f32)> = None;
    let mut attempts = 0u32;
    loop {
        let candidate = Color::random(rng);
        attempts += 1;
        let gap = candidate.nearest_distance(existing);
        if gap >= threshold {
            return candidate;
        }
        if best.map_or(true, |(_, best_gap)| gap > best_gap) {
            best = Some((candidate, gap));
        }
        if max_random_attempts.is_some_and(|cap| attempts >= cap) {
            let (color, gap) = best.unwrap_or((candidate, gap));
            log::warn!(
                "No colour {:.2} away from {} others after {} samples, using one {:.2} away",
                threshold,
                existing.len(),
                attempts,
                gap
            );
            return color;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{COLOR_THRESHOLD, MAX_COLOR_DISTANCE};
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn in_palette(color: &Color) -> bool {
        PALETTE.iter().any(|n| n.color == *color)
    }

    #[test]
    fn test_distance_bounds() {
        let black = Color::BLACK;
        let white = Color::rgb(1.0, 1.0, 1.0);
        assert_eq!(black.distance(&black), 0.0);
        assert!((black.distance(&white) - MAX_COLOR_DISTANCE).abs() < 1e-5);
        // Alpha is ignored
        let clear_black = Color { a: 0.0, ..black };
        assert_eq!(black.distance(&clear_black), 0.0);
        assert_ne!(black, clear_black);
    }

    #[test]
    fn test_from_hex() {
        assert_eq!(Color::from_hex("#FF0000"), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(Color::from_hex("F00"), Color::rgb(1.0, 0.0, 0.0));
        assert_eq!(Color::from_hex("00ff00"), Color::rgb(0.0, 1.0, 0.0));

        let argb = Color::from_hex("800000FF");
        assert_eq!(argb.b, 1.0);
        assert!((argb.a - 128.0 / 255.0).abs() < 1e-6);

        assert_eq!(Color::from_hex("zz"), Color::BLACK);
        assert_eq!(Color::from_hex("12345"), Color::BLACK);
    }

    #[test]
    fn test_first_pick_comes_from_palette() {
        let mut rng = Pcg32::seed_from_u64(1);
        let color = pick_distinct_color(&[], COLOR_THRESHOLD, true, &mut rng);
        assert!(in_palette(&color));
    }

    #[test]
    fn test_palette_exhaustion_falls_back_to_random() {
        let mut rng = Pcg32::seed_from_u64(2);
        let existing: Vec<Color> = PALETTE.iter().map(|n| n.color).collect();
        let color = pick_distinct_color(&existing, COLOR_THRESHOLD, true, &mut rng);
        assert!(!in_palette(&color));
        assert!(color.nearest_distance(&existing) >= COLOR_THRESHOLD);
    }

    #[test]
    fn test_cap_degrades_when_space_is_full() {
        // A 0.5-spaced grid leaves no point 0.5 away from all of it
        let steps = [0.0, 0.5, 1.0];
        let mut grid = Vec::new();
        for r in steps {
            for g in steps {
                for b in steps {
                    grid.push(Color::rgb(r, g, b));
                }
            }
        }
        let mut rng = Pcg32::seed_from_u64(3);
        let color = pick_distinct_color_capped(&grid, 0.5, true, Some(200), &mut rng);
        let gap = color.nearest_distance(&grid);
        assert!(gap < 0.5);
        assert!(gap > 0.0);
    }

    proptest! {
        // Both the palette branch and the random fallback enforce the
        // threshold, so every pair in a level stays distinguishable.
        #[test]
        fn prop_level_colors_are_distinct(
            seed in any::<u64>(),
            count in 1usize..10,
            prefer_palette in any::<bool>(),
        ) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut used: Vec<Color> = Vec::new();
            for _ in 0..count {
                let color = pick_distinct_color(&used, COLOR_THRESHOLD, prefer_palette, &mut rng);
                prop_assert!(color.nearest_distance(&used) >= COLOR_THRESHOLD);
                used.push(color);
            }
        }

        #[test]
        fn prop_random_colors_in_unit_cube(seed in any::<u64>()) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let c = Color::random(&mut rng);
            for v in [c.r, c.g, c.b] {
                prop_assert!((0.0..=1.0).contains(&v));
            }
            prop_assert_eq!(c.a, 1.0);
        }
    }
}
