//! Level generation
//!
//! A level holds `level` token/target pairs. Each pair gets a colour distinct
//! from every other pair and two positions clear of everything already placed.

use rand::Rng;

use super::layout::pick_valid_position;
use super::palette::pick_distinct_color_capped;
use super::state::{RoundState, Target, Token};
use crate::tuning::Tuning;

/// Replace the board with a fresh set of pairs for `state.level`
pub fn populate_level<R: Rng>(state: &mut RoundState, tuning: &Tuning, rng: &mut R) {
    state.clear_board();
    let bounds = tuning.play_area();

    for _ in 0..state.level {
        let color = pick_distinct_color_capped(
            &state.colors_in_use(),
            tuning.color_threshold,
            tuning.prefer_palette,
            tuning.color_attempt_cap,
            rng,
        );

        // Tokens and targets share one exclusion set
        let token_pos = pick_valid_position(
            &state.occupied_positions(),
            bounds,
            tuning.min_separation,
            tuning.max_layout_attempts,
            rng,
        );
        let id = state.next_entity_id();
        state.tokens.push(Token {
            id,
            color,
            pos: token_pos,
        });

        let target_pos = pick_valid_position(
            &state.occupied_positions(),
            bounds,
            tuning.min_separation,
            tuning.max_layout_attempts,
            rng,
        );
        let id = state.next_entity_id();
        state.targets.push(Target {
            id,
            color,
            pos: target_pos,
        });
    }

    state.normalize_order();
    log::info!("Level {}: {} pairs", state.level, state.tokens.len());
}
