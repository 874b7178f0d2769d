//! Player preferences
//!
//! Persisted separately from the high score.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::persistence;
use crate::sim::{Cue, GameEvent};

/// Player settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Feedback ===
    /// Light impact on a successful match
    pub haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            haptics: true,
        }
    }
}

impl Settings {
    /// Volume to play `cue` at, combining its hint with the player's mix
    pub fn effective_volume(&self, cue: Cue) -> f32 {
        if self.muted {
            0.0
        } else {
            (cue.volume_hint() * self.master_volume * self.sfx_volume).clamp(0.0, 1.0)
        }
    }

    /// Whether the host should act on this event at all
    pub fn wants(&self, event: &GameEvent) -> bool {
        match event {
            GameEvent::Haptic => self.haptics,
            GameEvent::Cue { cue, .. } => self.effective_volume(*cue) > 0.0,
            _ => true,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Load settings, using defaults if the file is missing or unreadable
    pub fn load(path: &Path) -> Self {
        match persistence::load_json::<Self>(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        persistence::save_json(path, self)?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::scratch_path;

    #[test]
    fn test_effective_volume_scales_hint() {
        let settings = Settings {
            master_volume: 0.5,
            sfx_volume: 1.0,
            ..Default::default()
        };
        assert!((settings.effective_volume(Cue::Plop) - 0.5).abs() < 1e-6);
        assert!((settings.effective_volume(Cue::Fail) - 0.25).abs() < 1e-6);
        assert!((settings.effective_volume(Cue::Success) - 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_muted_filters_cues() {
        let settings = Settings {
            muted: true,
            haptics: false,
            ..Default::default()
        };
        assert_eq!(settings.effective_volume(Cue::Plop), 0.0);
        assert!(!settings.wants(&GameEvent::Cue {
            cue: Cue::Plop,
            volume: 1.0
        }));
        assert!(!settings.wants(&GameEvent::Haptic));
        assert!(settings.wants(&GameEvent::NewHighScore(3)));
    }

    #[test]
    fn test_setters_clamp() {
        let mut settings = Settings::default();
        settings.set_master_volume(1.5);
        settings.set_sfx_volume(-0.2);
        assert_eq!(settings.master_volume, 1.0);
        assert_eq!(settings.sfx_volume, 0.0);
    }

    #[test]
    fn test_load_falls_back_on_corrupt_file() {
        let path = scratch_path("settings.json");
        std::fs::write(&path, "garbage").unwrap();
        assert_eq!(Settings::load(&path), Settings::default());

        let custom = Settings {
            haptics: false,
            ..Default::default()
        };
        custom.save(&path).unwrap();
        assert_eq!(Settings::load(&path), custom);
        let _ = std::fs::remove_file(&path);
    }
}
