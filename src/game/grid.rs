//! # Grid Map
//!
//! Tile grid for a single stage and the walkability queries every system relies on.

use crate::game::Position;
use serde::{Deserialize, Serialize};

/// One cell of the stage grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tile {
    Floor,
    Wall,
    /// Decorative cover (tall grass, rubble); can be walked through
    Obstacle,
    Water,
}

impl Tile {
    /// Whether the player and enemies may stand on this tile.
    pub fn is_walkable(self) -> bool {
        !matches!(self, Tile::Wall | Tile::Water)
    }

    /// Decodes the numeric tile codes used by the authored stage tables.
    pub fn from_code(code: u8) -> Tile {
        match code {
            1 => Tile::Wall,
            2 => Tile::Obstacle,
            3 => Tile::Water,
            _ => Tile::Floor,
        }
    }
}

/// RGB color passed to render sinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// Parses a `#rrggbb` literal at compile time.
    pub const fn hex(value: u32) -> Rgb {
        Rgb((value >> 16) as u8, (value >> 8) as u8, value as u8)
    }
}

/// Tile color scheme. Changes every few stages to mark progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Palette {
    Dungeon,
    Forest,
    Cavern,
}

impl Palette {
    /// Palette used for a stage: a new biome every boss interval.
    pub fn for_stage(stage: u32) -> Palette {
        let band = stage.saturating_sub(1) / crate::config::BOSS_STAGE_INTERVAL;
        match band % 3 {
            0 => Palette::Dungeon,
            1 => Palette::Forest,
            _ => Palette::Cavern,
        }
    }

    /// Fill color for a tile in this palette.
    pub fn tile_color(self, tile: Tile) -> Rgb {
        match (self, tile) {
            (Palette::Dungeon, Tile::Floor) => Rgb::hex(0x1a1a2e),
            (Palette::Dungeon, Tile::Wall) => Rgb::hex(0x3a3a5c),
            (Palette::Dungeon, Tile::Obstacle) => Rgb::hex(0x2a4a2a),
            (Palette::Dungeon, Tile::Water) => Rgb::hex(0x1a3a5a),
            (Palette::Forest, Tile::Floor) => Rgb::hex(0x1e2b1a),
            (Palette::Forest, Tile::Wall) => Rgb::hex(0x3d5230),
            (Palette::Forest, Tile::Obstacle) => Rgb::hex(0x4f7a35),
            (Palette::Forest, Tile::Water) => Rgb::hex(0x1f4d66),
            (Palette::Cavern, Tile::Floor) => Rgb::hex(0x2b1f1a),
            (Palette::Cavern, Tile::Wall) => Rgb::hex(0x5c3a2e),
            (Palette::Cavern, Tile::Obstacle) => Rgb::hex(0x6b4f2a),
            (Palette::Cavern, Tile::Water) => Rgb::hex(0x6a2a1a),
        }
    }
}

/// Tile grid for one stage, addressed `tiles[row][col]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Tile>>,
    /// Where the player appears when the stage loads
    pub spawn: Position,
}

impl Grid {
    /// Creates a grid filled with one tile type.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::{Grid, Position, Tile};
    ///
    /// let grid = Grid::filled(4, 3, Tile::Floor, Position::new(1, 1));
    /// assert_eq!(grid.tiles.len(), 3);
    /// assert_eq!(grid.tiles[0].len(), 4);
    /// ```
    pub fn filled(width: usize, height: usize, tile: Tile, spawn: Position) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![tile; width]; height],
            spawn,
        }
    }

    /// Builds a grid from a table of numeric tile codes.
    pub fn from_codes<const W: usize>(rows: &[[u8; W]], spawn: Position) -> Self {
        let tiles: Vec<Vec<Tile>> = rows
            .iter()
            .map(|row| row.iter().map(|&code| Tile::from_code(code)).collect())
            .collect();
        Self {
            width: W,
            height: tiles.len(),
            tiles,
            spawn,
        }
    }

    /// Whether the coordinate lies inside the grid.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Gets the tile at a position, or None out of bounds.
    pub fn get(&self, pos: Position) -> Option<Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        Some(self.tiles[pos.y as usize][pos.x as usize])
    }

    /// Replaces the tile at a position. Out-of-bounds writes are ignored.
    pub fn set(&mut self, pos: Position, tile: Tile) {
        if self.in_bounds(pos) {
            self.tiles[pos.y as usize][pos.x as usize] = tile;
        }
    }

    /// False for Wall and Water tiles and for any coordinate off the grid.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::{Grid, Position, Tile};
    ///
    /// let mut grid = Grid::filled(3, 3, Tile::Floor, Position::new(1, 1));
    /// grid.set(Position::new(2, 2), Tile::Water);
    /// assert!(grid.is_walkable(Position::new(1, 1)));
    /// assert!(!grid.is_walkable(Position::new(2, 2)));
    /// assert!(!grid.is_walkable(Position::new(-1, 0)));
    /// ```
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.get(pos).map(Tile::is_walkable).unwrap_or(false)
    }

    /// Interior positions (everything but the outer ring).
    pub fn interior_positions(&self) -> impl Iterator<Item = Position> + '_ {
        (1..self.height.saturating_sub(1)).flat_map(move |y| {
            (1..self.width.saturating_sub(1)).map(move |x| Position::new(x as i32, y as i32))
        })
    }

    /// Center cell of the grid.
    pub fn center(&self) -> Position {
        Position::new((self.width / 2) as i32, (self.height / 2) as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_walkability() {
        assert!(Tile::Floor.is_walkable());
        assert!(Tile::Obstacle.is_walkable());
        assert!(!Tile::Wall.is_walkable());
        assert!(!Tile::Water.is_walkable());
    }

    #[test]
    fn test_grid_bounds() {
        let grid = Grid::filled(5, 4, Tile::Floor, Position::new(2, 2));
        assert!(grid.in_bounds(Position::new(4, 3)));
        assert!(!grid.in_bounds(Position::new(5, 3)));
        assert!(!grid.in_bounds(Position::new(4, 4)));
        assert!(!grid.is_walkable(Position::new(0, -1)));
        assert_eq!(grid.get(Position::new(10, 10)), None);
    }

    #[test]
    fn test_grid_from_codes_row_major() {
        let grid = Grid::from_codes(&[[1, 0, 3], [2, 0, 1]], Position::new(1, 0));
        assert_eq!(grid.width, 3);
        assert_eq!(grid.height, 2);
        assert_eq!(grid.get(Position::new(0, 0)), Some(Tile::Wall));
        assert_eq!(grid.get(Position::new(2, 0)), Some(Tile::Water));
        assert_eq!(grid.get(Position::new(0, 1)), Some(Tile::Obstacle));
    }

    #[test]
    fn test_interior_positions_skip_border() {
        let grid = Grid::filled(4, 4, Tile::Floor, Position::new(1, 1));
        let interior: Vec<_> = grid.interior_positions().collect();
        assert_eq!(interior.len(), 4);
        assert!(interior.iter().all(|p| p.x >= 1 && p.x <= 2 && p.y >= 1 && p.y <= 2));
    }

    #[test]
    fn test_palette_cycles_per_boss_interval() {
        assert_eq!(Palette::for_stage(1), Palette::Dungeon);
        assert_eq!(Palette::for_stage(5), Palette::Dungeon);
        assert_eq!(Palette::for_stage(6), Palette::Forest);
        assert_eq!(Palette::for_stage(11), Palette::Cavern);
        assert_eq!(Palette::for_stage(16), Palette::Dungeon);
        assert_eq!(Rgb::hex(0x1a3a5a), Rgb(0x1a, 0x3a, 0x5a));
    }
}
