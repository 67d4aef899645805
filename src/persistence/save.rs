//! # Persisted Blobs
//!
//! The settings and save-game documents.

use crate::config::{MAX_STAGE, STARTING_XP_TO_NEXT};
use crate::game::{Difficulty, Progress};
use serde::{Deserialize, Serialize};

/// Side of the screen the on-screen controls sit on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    Left,
    #[default]
    Right,
}

/// User preferences.
///
/// The control fields are stored for touch front ends; the desktop front end only
/// reads `difficulty`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Scale of the on-screen controls
    pub control_size: f32,
    pub control_position: ControlPosition,
    /// Vertical offset of the controls in pixels
    pub control_offset: f32,
    pub difficulty: Difficulty,
}

impl Settings {
    pub const MIN_CONTROL_SIZE: f32 = 0.5;
    pub const MAX_CONTROL_SIZE: f32 = 2.0;
    pub const MAX_CONTROL_OFFSET: f32 = 200.0;

    /// Clamps fields into their valid ranges.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        self.control_size = if self.control_size.is_finite() {
            self.control_size
                .clamp(Self::MIN_CONTROL_SIZE, Self::MAX_CONTROL_SIZE)
        } else {
            defaults.control_size
        };
        self.control_offset = if self.control_offset.is_finite() {
            self.control_offset
                .clamp(-Self::MAX_CONTROL_OFFSET, Self::MAX_CONTROL_OFFSET)
        } else {
            defaults.control_offset
        };
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            control_size: 1.0,
            control_position: ControlPosition::default(),
            control_offset: 0.0,
            difficulty: Difficulty::default(),
        }
    }
}

/// Persistent progress written at checkpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SaveGame {
    pub coins: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
    pub stage: u32,
    pub health: u32,
}

impl SaveGame {
    /// Repairs a loaded save: stage stays within `1..=MAX_STAGE`, level starts at one,
    /// the xp threshold is never below the starting one, health stays within
    /// `1..=max_health`, and any pending level-ups in the xp are resolved.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::SaveGame;
    ///
    /// let save = SaveGame { stage: 0, health: 99, ..SaveGame::default() }.sanitized(5);
    /// assert_eq!(save.stage, 1);
    /// assert_eq!(save.health, 5);
    /// ```
    pub fn sanitized(self, max_health: u32) -> Self {
        let mut progress = Progress::new();
        progress.xp = self.xp;
        progress.level = self.level.max(1);
        progress.xp_to_next = self.xp_to_next.max(STARTING_XP_TO_NEXT);
        progress.normalize_levels();

        Self {
            coins: self.coins,
            xp: progress.xp,
            level: progress.level,
            xp_to_next: progress.xp_to_next,
            stage: self.stage.clamp(1, MAX_STAGE),
            health: self.health.clamp(1, max_health.max(1)),
        }
    }
}

impl Default for SaveGame {
    fn default() -> Self {
        Self {
            coins: 0,
            xp: 0,
            level: 1,
            xp_to_next: STARTING_XP_TO_NEXT,
            stage: 1,
            health: 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_clamped() {
        let settings = Settings {
            control_size: 9.0,
            control_offset: f32::NAN,
            ..Settings::default()
        }
        .sanitized();
        assert_eq!(settings.control_size, Settings::MAX_CONTROL_SIZE);
        assert_eq!(settings.control_offset, 0.0);
    }

    #[test]
    fn test_save_resolves_pending_levels() {
        let save = SaveGame {
            xp: 130,
            ..SaveGame::default()
        }
        .sanitized(5);
        assert_eq!(save.level, 3);
        assert_eq!(save.xp, 5);
        assert_eq!(save.xp_to_next, 112);
    }

    #[test]
    fn test_save_zero_health_is_revived() {
        let save = SaveGame {
            health: 0,
            xp_to_next: 0,
            ..SaveGame::default()
        }
        .sanitized(5);
        assert_eq!(save.health, 1);
        assert_eq!(save.xp_to_next, STARTING_XP_TO_NEXT);
    }

    #[test]
    fn test_save_tiny_threshold_is_raised() {
        let save = SaveGame {
            xp: 5_000_000,
            xp_to_next: 1,
            ..SaveGame::default()
        }
        .sanitized(5);
        assert!(save.xp_to_next >= STARTING_XP_TO_NEXT);
        assert!(save.level < 40, "level {}", save.level);
        assert!(save.xp < save.xp_to_next);
    }

    #[test]
    fn test_save_absurd_values_are_bounded() {
        let save = SaveGame {
            coins: u32::MAX,
            xp: u32::MAX,
            level: u32::MAX,
            xp_to_next: u32::MAX,
            stage: u32::MAX,
            health: u32::MAX,
        }
        .sanitized(5);
        assert_eq!(save.stage, MAX_STAGE);
        assert_eq!(save.health, 5);
        assert_eq!(save.level, u32::MAX);
    }
}
