//! # Pixel Quest
//!
//! A small top-down tile-based arcade game: collect items, open chests, fight slimes and a
//! boss, and clear stages before the countdown runs out.
//!
//! ## Architecture Overview
//!
//! The simulation core is deterministic and independent of any window or audio device:
//!
//! - **Game State**: one [`GameState`] owns the grid, the entity registry, progress counters,
//!   the deferred-action queue, and the stage director phase machine
//! - **Generation System**: authored and procedurally generated stage grids plus spawning rules
//! - **Systems**: player control, combat, enemy and boss AI, each a function over the game state
//! - **Outer Surfaces**: render snapshots, audio cues, and persisted settings/save blobs are
//!   produced for external sinks
//!
//! The macroquad front end in [`rendering`], [`input`], and [`scenes`] drives the core at a
//! fixed tick rate and draws the snapshot each frame.

pub mod audio;
pub mod game;
pub mod generation;
pub mod input;
pub mod persistence;
pub mod rendering;
pub mod scenes;
pub mod utils;

// Core module re-exports
pub use audio::*;
pub use game::*;
pub use generation::*;
pub use input::*;
pub use persistence::*;
pub use utils::*;

pub use rendering::MacroquadDisplay;
pub use scenes::{GameSession, SceneManager};

/// Core error type for the Pixel Quest engine.
///
/// The simulation itself never fails during play; errors only surface at the
/// I/O and serialization seams (persistence stores, config files, CLI).
#[derive(thiserror::Error, Debug)]
pub enum PixelQuestError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    /// Game state is invalid
    #[error("Invalid game state: {0}")]
    InvalidState(String),

    /// Persistence store rejected an operation
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Generation failed
    #[error("Generation failed: {0}")]
    GenerationFailed(String),
}

/// Result type used throughout the Pixel Quest codebase.
pub type PixelQuestResult<T> = Result<T, PixelQuestError>;

/// Version information for the game.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Game configuration constants.
pub mod config {
    /// Simulation ticks per wall-clock second
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Longest frame delta folded into the fixed-step accumulator
    pub const MAX_STEPS_PER_FRAME: u32 = 5;

    /// Tile size in pixels used by the display
    pub const TILE_SIZE: f32 = 32.0;

    /// Width of the authored stage grids
    pub const AUTHORED_WIDTH: usize = 12;

    /// Height of the authored stage grids
    pub const AUTHORED_HEIGHT: usize = 10;

    /// Width of generated stage grids
    pub const GENERATED_WIDTH: usize = 16;

    /// Height of generated stage grids
    pub const GENERATED_HEIGHT: usize = 12;

    /// Highest stage a save may resume on
    pub const MAX_STAGE: u32 = 999;

    /// Every n-th stage is a boss stage
    pub const BOSS_STAGE_INTERVAL: u32 = 5;

    /// Starting xp threshold for level 2
    pub const STARTING_XP_TO_NEXT: u32 = 50;

    /// Multiplicative growth of the xp threshold per level
    pub const XP_GROWTH: f64 = 1.5;
}

/// Tunable gameplay parameters.
///
/// Defaults reproduce the standard game; [`GameConfig::for_testing`] shortens
/// delays so integration tests need fewer ticks.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Maximum player health (heart count)
    pub max_health: u32,
    /// Ticks of invincibility after taking damage
    pub invincibility_ticks: u32,
    /// Ticks an attack locks out further attacks
    pub attack_lockout_ticks: u32,
    /// Ticks between steps while a direction is held
    pub move_repeat_ticks: u32,
    /// Ticks before an opened chest closes again (None keeps chests opened)
    pub chest_reset_ticks: Option<u32>,
    /// Ticks a reward popup stays visible
    pub popup_ticks: u32,
    /// Ticks the stage announcement stays visible
    pub announcement_ticks: u32,
    /// Pause between stage clear and loading the next stage
    pub stage_clear_delay_ticks: u32,
    /// Pause between the killing blow and the game-over reset
    pub game_over_delay_ticks: u32,
    /// Delay between the boss dying and the stage completing
    pub boss_clear_delay_ticks: u32,
    /// Seconds granted after the countdown expires
    pub mercy_seconds: u32,
    /// Maximum rejection-sampling attempts per spawned entity
    pub spawn_attempts: u32,
}

impl GameConfig {
    /// Creates a configuration with shorter delays for tests.
    pub fn for_testing() -> Self {
        Self {
            stage_clear_delay_ticks: 10,
            game_over_delay_ticks: 10,
            boss_clear_delay_ticks: 10,
            ..Self::default()
        }
    }

    /// Loads a configuration from a JSON document.
    pub fn from_json(json: &str) -> PixelQuestResult<Self> {
        serde_json::from_str(json).map_err(PixelQuestError::from)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            max_health: 5,
            invincibility_ticks: 60,
            attack_lockout_ticks: 12,
            move_repeat_ticks: 8,
            chest_reset_ticks: Some(600),
            popup_ticks: 90,
            announcement_ticks: 120,
            stage_clear_delay_ticks: 120,
            game_over_delay_ticks: 120,
            boss_clear_delay_ticks: 180,
            mercy_seconds: 15,
            spawn_attempts: 100,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_partial_json_uses_defaults() {
        let config = GameConfig::from_json(r#"{ "max_health": 3 }"#).unwrap();
        assert_eq!(config.max_health, 3);
        assert_eq!(config.attack_lockout_ticks, 12);
    }

    #[test]
    fn test_config_rejects_malformed_json() {
        assert!(matches!(
            GameConfig::from_json("{ not json"),
            Err(PixelQuestError::Serde(_))
        ));
    }
}
