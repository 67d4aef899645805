//! # Generation Module
//!
//! Stage grids and entity placement.
//!
//! Early stages use hand-authored layouts; later stages are generated arenas. The
//! spawning rules decide where collectibles, chests, slimes, and the boss appear.

pub mod arena;
pub mod spawning;
pub mod stages;

pub use arena::*;
pub use spawning::*;
pub use stages::*;

use crate::game::{Grid, Position};
use crate::PixelQuestResult;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Configuration for procedural arena generation.
///
/// The per-cell probabilities are sampled independently; whatever is left over
/// becomes floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Random seed for reproducible generation
    pub seed: u64,
    /// Grid width in tiles, including the border
    pub width: usize,
    /// Grid height in tiles, including the border
    pub height: usize,
    /// Player spawn; a 3×3 walkable zone is kept around it
    pub spawn: Position,
    /// Probability of a wall tile
    pub wall_chance: f64,
    /// Probability of an obstacle tile
    pub obstacle_chance: f64,
    /// Probability of a water tile
    pub water_chance: f64,
}

impl GenerationConfig {
    /// Creates the standard arena configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::GenerationConfig;
    ///
    /// let config = GenerationConfig::new(42);
    /// assert_eq!(config.width, 16);
    /// assert!(config.wall_chance + config.obstacle_chance + config.water_chance < 1.0);
    /// ```
    pub fn new(seed: u64) -> Self {
        let width = crate::config::GENERATED_WIDTH;
        let height = crate::config::GENERATED_HEIGHT;
        Self {
            seed,
            width,
            height,
            spawn: Position::new(2, (height / 2) as i32),
            wall_chance: 0.08,
            obstacle_chance: 0.04,
            water_chance: 0.03,
        }
    }

    /// Creates a configuration with explicit dimensions and spawn.
    pub fn with_size(seed: u64, width: usize, height: usize, spawn: Position) -> Self {
        Self {
            width,
            height,
            spawn,
            ..Self::new(seed)
        }
    }

    /// Creates a configuration for testing with an open, obstacle-free arena.
    pub fn for_testing(seed: u64) -> Self {
        Self {
            wall_chance: 0.0,
            obstacle_chance: 0.0,
            water_chance: 0.0,
            ..Self::new(seed)
        }
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::new(42)
    }
}

/// Trait for procedural generators.
pub trait Generator<T> {
    /// Generates content using the provided configuration and random number generator.
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> PixelQuestResult<T>;

    /// Validates that the generated content meets requirements.
    fn validate(&self, content: &T, config: &GenerationConfig) -> PixelQuestResult<()>;

    /// Gets the generator type name for logging and debugging.
    fn generator_type(&self) -> &'static str;
}

/// Creates a seeded random number generator from the config.
pub fn create_rng(config: &GenerationConfig) -> StdRng {
    StdRng::seed_from_u64(config.seed)
}

/// Validates that a grid has a solid border and a walkable spawn.
pub fn validate_grid(grid: &Grid) -> PixelQuestResult<()> {
    use crate::game::Tile;
    use crate::PixelQuestError;

    if grid.width < 3 || grid.height < 3 {
        return Err(PixelQuestError::GenerationFailed(format!(
            "Grid {}x{} is too small",
            grid.width, grid.height
        )));
    }

    let border_intact = (0..grid.height).all(|y| {
        (0..grid.width).all(|x| {
            let on_border = x == 0 || y == 0 || x == grid.width - 1 || y == grid.height - 1;
            !on_border || grid.tiles[y][x] == Tile::Wall
        })
    });
    if !border_intact {
        return Err(PixelQuestError::GenerationFailed(
            "Grid border is not solid".to_string(),
        ));
    }

    if !grid.is_walkable(grid.spawn) {
        return Err(PixelQuestError::GenerationFailed(format!(
            "Spawn {:?} is not walkable",
            grid.spawn
        )));
    }

    Ok(())
}
