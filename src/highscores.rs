//! High score storage
//!
//! The best level reached is a single integer. The engine only reads and
//! writes it through [`HighScoreStore`], so where it lives is up to the host.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence;

/// Get/set access to the persisted high score
pub trait HighScoreStore {
    fn get(&self) -> u32;
    fn set(&mut self, value: u32);
}

impl<S: HighScoreStore + ?Sized> HighScoreStore for &mut S {
    fn get(&self) -> u32 {
        (**self).get()
    }

    fn set(&mut self, value: u32) {
        (**self).set(value)
    }
}

/// Raise the stored value to `level` if it is a new best.
/// Returns true if the store was written.
pub fn record_level<S: HighScoreStore + ?Sized>(store: &mut S, level: u32) -> bool {
    if level > store.get() {
        store.set(level);
        log::info!("New high score: level {}", level);
        true
    } else {
        false
    }
}

/// Explicit player-triggered reset
pub fn reset<S: HighScoreStore + ?Sized>(store: &mut S) {
    store.set(0);
    log::info!("High score reset");
}

/// In-process store
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryHighScore {
    value: u32,
}

impl MemoryHighScore {
    pub fn new(value: u32) -> Self {
        Self { value }
    }
}

impl HighScoreStore for MemoryHighScore {
    fn get(&self) -> u32 {
        self.value
    }

    fn set(&mut self, value: u32) {
        self.value = value;
    }
}

/// On-disk document
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
struct HighScoreDoc {
    high_score: u32,
}

/// JSON file-backed store. Reads once on open, writes through on every set.
#[derive(Debug, Clone)]
pub struct FileHighScore {
    path: PathBuf,
    value: u32,
}

impl FileHighScore {
    /// Open the store at `path`, starting from 0 if the file does not exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let value = match persistence::load_json::<HighScoreDoc>(&path)? {
            Some(doc) => {
                log::info!("Loaded high score {} from {}", doc.high_score, path.display());
                doc.high_score
            }
            None => {
                log::info!("No high score found, starting fresh");
                0
            }
        };
        Ok(Self { path, value })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HighScoreStore for FileHighScore {
    fn get(&self) -> u32 {
        self.value
    }

    fn set(&mut self, value: u32) {
        self.value = value;
        let doc = HighScoreDoc { high_score: value };
        if let Err(e) = persistence::save_json(&self.path, &doc) {
            log::warn!("Failed to save high score to {}: {}", self.path.display(), e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::scratch_path;

    #[test]
    fn test_record_only_raises() {
        let mut store = MemoryHighScore::new(3);
        assert!(!record_level(&mut store, 2));
        assert!(!record_level(&mut store, 3));
        assert_eq!(store.get(), 3);
        assert!(record_level(&mut store, 4));
        assert_eq!(store.get(), 4);
    }

    #[test]
    fn test_reset_sets_zero() {
        for start in [0, 1, 17, u32::MAX] {
            let mut store = MemoryHighScore::new(start);
            reset(&mut store);
            assert_eq!(store.get(), 0);
        }
    }

    #[test]
    fn test_file_store_round_trips() {
        let path = scratch_path("highscore.json");
        {
            let mut store = FileHighScore::open(&path).unwrap();
            assert_eq!(store.get(), 0);
            record_level(&mut store, 5);
        }
        let store = FileHighScore::open(&path).unwrap();
        assert_eq!(store.get(), 5);
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_store_through_mut_ref() {
        let mut inner = MemoryHighScore::default();
        {
            let mut borrowed = &mut inner;
            record_level(&mut borrowed, 2);
        }
        assert_eq!(inner.get(), 2);
    }
}
