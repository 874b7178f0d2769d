//! Round state and core simulation types
//!
//! Plain data. Entities live in id-sorted vectors and are looked up by id.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::palette::Color;

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// No round running (menu)
    Idle,
    /// Populating a level
    Setup,
    /// Clock running, drops are evaluated
    Playing,
    /// All pairs matched, waiting for the next level
    LevelComplete,
    /// Clock ran out
    GameOver,
}

/// Named audio cues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cue {
    /// Token dropped on its target
    Plop,
    /// Level cleared
    Success,
    /// Time ran out
    Fail,
}

impl Cue {
    pub fn name(&self) -> &'static str {
        match self {
            Cue::Plop => "plop",
            Cue::Success => "success",
            Cue::Fail => "fail",
        }
    }

    /// Suggested playback volume (0.0 - 1.0)
    pub fn volume_hint(&self) -> f32 {
        match self {
            Cue::Plop => 1.0,
            Cue::Success => 0.1,
            Cue::Fail => 0.5,
        }
    }
}

/// Something the host should react to (sound, haptics, HUD)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Cue { cue: Cue, volume: f32 },
    /// Pulse the matched pair
    Matched { token: u32, target: u32, pos: Vec2 },
    /// Light impact
    Haptic,
    PhaseChanged(GamePhase),
    LevelStarted { level: u32, time_secs: u32 },
    NewHighScore(u32),
}

impl GameEvent {
    pub fn cue(cue: Cue) -> Self {
        GameEvent::Cue {
            cue,
            volume: cue.volume_hint(),
        }
    }
}

/// A draggable coloured token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub id: u32,
    pub color: Color,
    pub pos: Vec2,
}

/// A fixed slot a token must be dropped on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub id: u32,
    pub color: Color,
    pub pos: Vec2,
}

/// Everything that changes during a round
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub points: u32,
    /// Current level (1-based), also the number of pairs in it
    pub level: u32,
    /// Seconds left on the clock
    pub time_remaining: u32,
    /// Pairs matched this level, never more than `level`
    pub correct_placements: u32,
    pub phase: GamePhase,
    /// Live tokens (sorted by id)
    pub tokens: Vec<Token>,
    /// Live targets (sorted by id)
    pub targets: Vec<Target>,
    /// Next entity ID. Never reset; ids are unique across rounds.
    next_id: u32,
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

impl RoundState {
    pub fn new() -> Self {
        Self {
            points: 0,
            level: 1,
            time_remaining: 0,
            correct_placements: 0,
            phase: GamePhase::Idle,
            tokens: Vec::new(),
            targets: Vec::new(),
            next_id: 1,
        }
    }

    /// Back to the start of a round
    pub fn reset(&mut self, time_secs: u32) {
        self.points = 0;
        self.level = 1;
        self.time_remaining = time_secs;
        self.correct_placements = 0;
        self.clear_board();
    }

    pub fn clear_board(&mut self) {
        self.tokens.clear();
        self.targets.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn token(&self, id: u32) -> Option<&Token> {
        self.tokens.iter().find(|t| t.id == id)
    }

    pub fn token_mut(&mut self, id: u32) -> Option<&mut Token> {
        self.tokens.iter_mut().find(|t| t.id == id)
    }

    pub fn target(&self, id: u32) -> Option<&Target> {
        self.targets.iter().find(|t| t.id == id)
    }

    /// Remove a matched token and target
    pub fn remove_pair(&mut self, token_id: u32, target_id: u32) {
        self.tokens.retain(|t| t.id != token_id);
        self.targets.retain(|t| t.id != target_id);
    }

    /// Positions of everything on the board
    pub fn occupied_positions(&self) -> Vec<Vec2> {
        self.tokens
            .iter()
            .map(|t| t.pos)
            .chain(self.targets.iter().map(|t| t.pos))
            .collect()
    }

    /// Colours on the board (each pair shares one)
    pub fn colors_in_use(&self) -> Vec<Color> {
        self.tokens.iter().map(|t| t.color).collect()
    }

    pub fn is_level_won(&self) -> bool {
        self.correct_placements >= self.level
    }

    /// Ensure entities are sorted by ID for deterministic iteration
    pub fn normalize_order(&mut self) {
        self.tokens.sort_by_key(|t| t.id);
        self.targets.sort_by_key(|t| t.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(state: &mut RoundState, color: Color, token_pos: Vec2, target_pos: Vec2) -> (u32, u32) {
        let token = state.next_entity_id();
        let target = state.next_entity_id();
        state.tokens.push(Token {
            id: token,
            color,
            pos: token_pos,
        });
        state.targets.push(Target {
            id: target,
            color,
            pos: target_pos,
        });
        (token, target)
    }

    #[test]
    fn test_reset_keeps_id_counter() {
        let mut state = RoundState::new();
        pair(&mut state, Color::BLACK, Vec2::ZERO, Vec2::ONE);
        state.points = 9;
        state.level = 4;
        state.reset(10);
        assert_eq!(state.points, 0);
        assert_eq!(state.level, 1);
        assert_eq!(state.time_remaining, 10);
        assert!(state.tokens.is_empty() && state.targets.is_empty());
        assert_eq!(state.next_entity_id(), 3);
    }

    #[test]
    fn test_remove_pair_and_lookup() {
        let mut state = RoundState::new();
        let (t1, g1) = pair(&mut state, Color::BLACK, Vec2::ZERO, Vec2::ONE);
        let (t2, _) = pair(&mut state, Color::rgb(1.0, 0.0, 0.0), Vec2::X, Vec2::Y);
        assert_eq!(state.occupied_positions().len(), 4);
        state.remove_pair(t1, g1);
        assert!(state.token(t1).is_none());
        assert!(state.target(g1).is_none());
        assert!(state.token(t2).is_some());
        assert_eq!(state.colors_in_use(), vec![Color::rgb(1.0, 0.0, 0.0)]);
    }

    #[test]
    fn test_cue_names_and_hints() {
        assert_eq!(Cue::Plop.name(), "plop");
        assert_eq!(Cue::Success.name(), "success");
        assert_eq!(Cue::Fail.name(), "fail");
        assert_eq!(
            GameEvent::cue(Cue::Fail),
            GameEvent::Cue {
                cue: Cue::Fail,
                volume: 0.5
            }
        );
    }
}
