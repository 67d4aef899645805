//! # Reachability
//!
//! Flood-fill queries over the walkable tiles of a grid.

use crate::game::{Grid, Position};
use ::pathfinding::prelude::bfs_reach;
use std::collections::HashSet;

/// Every tile reachable from `start` by cardinal steps over walkable tiles.
///
/// Empty when `start` itself is not walkable.
pub fn reachable_tiles(grid: &Grid, start: Position) -> HashSet<Position> {
    if !grid.is_walkable(start) {
        return HashSet::new();
    }
    bfs_reach(start, |&pos| walkable_neighbours(grid, pos)).collect()
}

fn walkable_neighbours(grid: &Grid, pos: Position) -> Vec<Position> {
    pos.cardinal_adjacent_positions()
        .into_iter()
        .filter(|&next| grid.is_walkable(next))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Tile;

    fn walled_grid() -> Grid {
        // Water column at x = 2 splits the interior in two.
        let mut grid = Grid::filled(5, 4, Tile::Floor, Position::new(1, 1));
        for y in 0..4 {
            grid.set(Position::new(2, y), Tile::Water);
        }
        grid
    }

    #[test]
    fn test_reachable_stops_at_water() {
        let grid = walled_grid();
        let reachable = reachable_tiles(&grid, Position::new(0, 0));
        assert!(reachable.contains(&Position::new(1, 3)));
        assert!(!reachable.contains(&Position::new(3, 0)));
        assert_eq!(reachable.len(), 8);
    }

    #[test]
    fn test_unwalkable_start_reaches_nothing() {
        let grid = walled_grid();
        assert!(reachable_tiles(&grid, Position::new(2, 1)).is_empty());
    }
}
