//! # Arena Generation
//!
//! Procedural stage grids: a walled rectangle whose interior cells are scattered
//! independently with walls, obstacles, and water, leaving a clear zone at spawn.

use crate::game::{Grid, Position, Tile};
use crate::generation::{validate_grid, GenerationConfig, Generator};
use crate::PixelQuestResult;
use rand::rngs::StdRng;
use rand::Rng;

/// Generator for open arenas with random clutter.
#[derive(Debug, Clone, Default)]
pub struct ArenaGenerator {
    /// Cells forced to floor after scattering (chest slots and the like)
    pub keep_clear: Vec<Position>,
}

impl ArenaGenerator {
    /// Creates a generator with no extra cleared cells.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a generator that keeps the given cells walkable.
    pub fn with_clear_cells(keep_clear: Vec<Position>) -> Self {
        Self { keep_clear }
    }

    fn sample_tile(config: &GenerationConfig, rng: &mut StdRng) -> Tile {
        let roll: f64 = rng.gen();
        if roll < config.wall_chance {
            Tile::Wall
        } else if roll < config.wall_chance + config.obstacle_chance {
            Tile::Obstacle
        } else if roll < config.wall_chance + config.obstacle_chance + config.water_chance {
            Tile::Water
        } else {
            Tile::Floor
        }
    }

    fn in_spawn_zone(pos: Position, spawn: Position) -> bool {
        (pos.x - spawn.x).abs() <= 1 && (pos.y - spawn.y).abs() <= 1
    }

    fn is_border(config: &GenerationConfig, x: usize, y: usize) -> bool {
        x == 0 || y == 0 || x == config.width - 1 || y == config.height - 1
    }
}

impl Generator<Grid> for ArenaGenerator {
    fn generate(&self, config: &GenerationConfig, rng: &mut StdRng) -> PixelQuestResult<Grid> {
        let mut grid = Grid::filled(config.width, config.height, Tile::Floor, config.spawn);

        for y in 0..config.height {
            for x in 0..config.width {
                let pos = Position::new(x as i32, y as i32);
                let tile = if Self::is_border(config, x, y) {
                    Tile::Wall
                } else if Self::in_spawn_zone(pos, config.spawn) {
                    Tile::Floor
                } else {
                    Self::sample_tile(config, rng)
                };
                grid.tiles[y][x] = tile;
            }
        }

        for &pos in &self.keep_clear {
            let inside = pos.x > 0
                && pos.y > 0
                && (pos.x as usize) < config.width - 1
                && (pos.y as usize) < config.height - 1;
            if inside {
                grid.set(pos, Tile::Floor);
            }
        }

        self.validate(&grid, config)?;
        log::debug!(
            "{} built {}x{} grid with spawn {:?}",
            self.generator_type(),
            config.width,
            config.height,
            config.spawn
        );
        Ok(grid)
    }

    fn validate(&self, content: &Grid, config: &GenerationConfig) -> PixelQuestResult<()> {
        validate_grid(content)?;
        if content.width != config.width || content.height != config.height {
            return Err(crate::PixelQuestError::GenerationFailed(format!(
                "Expected {}x{} grid, got {}x{}",
                config.width, config.height, content.width, content.height
            )));
        }
        Ok(())
    }

    fn generator_type(&self) -> &'static str {
        "ArenaGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::create_rng;

    #[test]
    fn test_arena_border_and_spawn_zone() {
        let config = GenerationConfig::new(2024);
        let mut rng = create_rng(&config);
        let grid = ArenaGenerator::new().generate(&config, &mut rng).unwrap();

        for x in 0..config.width {
            assert_eq!(grid.tiles[0][x], Tile::Wall);
            assert_eq!(grid.tiles[config.height - 1][x], Tile::Wall);
        }
        for y in 0..config.height {
            assert_eq!(grid.tiles[y][0], Tile::Wall);
            assert_eq!(grid.tiles[y][config.width - 1], Tile::Wall);
        }
        for dy in -1..=1 {
            for dx in -1..=1 {
                let pos = Position::new(config.spawn.x + dx, config.spawn.y + dy);
                assert_eq!(grid.get(pos), Some(Tile::Floor));
            }
        }
    }

    #[test]
    fn test_arena_is_reproducible() {
        let config = GenerationConfig::new(77);
        let a = ArenaGenerator::new()
            .generate(&config, &mut create_rng(&config))
            .unwrap();
        let b = ArenaGenerator::new()
            .generate(&config, &mut create_rng(&config))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_tile_distribution_is_mostly_floor() {
        let config = GenerationConfig::with_size(5, 60, 60, Position::new(30, 30));
        let grid = ArenaGenerator::new()
            .generate(&config, &mut create_rng(&config))
            .unwrap();
        let interior: Vec<Tile> = grid
            .interior_positions()
            .filter_map(|p| grid.get(p))
            .collect();
        let floor = interior.iter().filter(|t| **t == Tile::Floor).count() as f64;
        let ratio = floor / interior.len() as f64;
        assert!(ratio > 0.78 && ratio < 0.92, "floor ratio {}", ratio);
        assert!(interior.contains(&Tile::Water));
        assert!(interior.contains(&Tile::Obstacle));
    }

    #[test]
    fn test_keep_clear_cells_are_floor() {
        let mut config = GenerationConfig::new(3);
        config.wall_chance = 1.0;
        let keep = vec![Position::new(5, 5), Position::new(0, 0)];
        let grid = ArenaGenerator::with_clear_cells(keep)
            .generate(&config, &mut create_rng(&config))
            .unwrap();
        assert_eq!(grid.get(Position::new(5, 5)), Some(Tile::Floor));
        // Border cells are never cleared
        assert_eq!(grid.get(Position::new(0, 0)), Some(Tile::Wall));
    }
}
