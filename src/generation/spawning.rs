//! # Spawning
//!
//! Placement rules for collectibles, hearts, chests, slimes, the boss, and boss loot.
//!
//! Every placement is rejection sampling with a bounded number of attempts. When the
//! budget runs out the entity is skipped and a warning is logged; the stage stays
//! playable with fewer entities.

use crate::game::{
    Boss, Collectible, CollectibleKind, Enemy, Grid, ItemKind, Position, Trigger, Vec2,
};
use crate::generation::CHEST_SLOTS;
use crate::utils::reachable_tiles;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use std::f32::consts::TAU;

/// Minimum Chebyshev distance between a fresh slime and the player.
pub const ENEMY_SAFE_DISTANCE: u32 = 4;

/// Treasure pieces dropped by the boss.
pub const BOSS_LOOT_COUNT: usize = 8;

/// Tries up to `attempts` random interior tiles and returns the first accepted one.
pub fn find_free_tile<R: Rng>(
    grid: &Grid,
    rng: &mut R,
    attempts: u32,
    mut accept: impl FnMut(Position) -> bool,
) -> Option<Position> {
    if grid.width < 3 || grid.height < 3 {
        return None;
    }
    for _ in 0..attempts {
        let pos = Position::new(
            rng.gen_range(1..grid.width as i32 - 1),
            rng.gen_range(1..grid.height as i32 - 1),
        );
        if grid.is_walkable(pos) && accept(pos) {
            return Some(pos);
        }
    }
    None
}

/// Places `count` reward collectibles on walkable tiles reachable from the player.
///
/// Tiles in `excluded` and the player's own tile are never used.
pub fn spawn_collectibles<R: Rng>(
    count: u32,
    grid: &Grid,
    player: Position,
    excluded: &HashSet<Position>,
    attempts: u32,
    rng: &mut R,
) -> Vec<Collectible> {
    place_collectibles(count, grid, player, excluded, attempts, rng, |rng| {
        let item = *ItemKind::STAGE_ITEMS
            .choose(rng)
            .unwrap_or(&ItemKind::Apple);
        CollectibleKind::reward(item)
    })
}

/// Heart pickups granted on a stage: one on even stages, one more on every third
/// stage from the sixth on.
pub fn heart_count(stage: u32) -> u32 {
    let even = u32::from(stage % 2 == 0);
    let bonus = u32::from(stage >= 6 && stage % 3 == 0);
    even + bonus
}

/// Places the stage's heart pickups. They do not count toward the collection goal.
pub fn spawn_hearts<R: Rng>(
    stage: u32,
    grid: &Grid,
    player: Position,
    excluded: &HashSet<Position>,
    attempts: u32,
    rng: &mut R,
) -> Vec<Collectible> {
    place_collectibles(heart_count(stage), grid, player, excluded, attempts, rng, |_| {
        CollectibleKind::Heal { amount: 1 }
    })
}

fn place_collectibles<R: Rng>(
    count: u32,
    grid: &Grid,
    player: Position,
    excluded: &HashSet<Position>,
    attempts: u32,
    rng: &mut R,
    mut kind: impl FnMut(&mut R) -> CollectibleKind,
) -> Vec<Collectible> {
    let count = count.min(interior_tiles(grid));
    let reachable = reachable_tiles(grid, player);
    let mut taken: HashSet<Position> = HashSet::new();
    let mut placed = Vec::with_capacity(count as usize);

    for _ in 0..count {
        let tile = find_free_tile(grid, rng, attempts, |pos| {
            pos != player
                && reachable.contains(&pos)
                && !excluded.contains(&pos)
                && !taken.contains(&pos)
        });
        match tile {
            Some(pos) => {
                taken.insert(pos);
                let kind = kind(rng);
                let phase = rng.gen_range(0.0..TAU);
                placed.push(Collectible::new(pos, kind, phase));
            }
            None => log::warn!(
                "No free tile for collectible after {} attempts; skipping",
                attempts
            ),
        }
    }

    placed
}

/// Upper bound on entities one grid can hold.
fn interior_tiles(grid: &Grid) -> u32 {
    let tiles = grid.width.saturating_sub(2) * grid.height.saturating_sub(2);
    u32::try_from(tiles).unwrap_or(u32::MAX)
}

/// Adds the chests unlocked by `stage` that are not present yet.
///
/// Chests already in `triggers` keep their opened state. Returns how many were added.
pub fn spawn_triggers(stage: u32, triggers: &mut Vec<Trigger>) -> usize {
    let mut added = 0;
    for (position, unlock_stage) in CHEST_SLOTS {
        let present = triggers.iter().any(|t| t.position == position);
        if unlock_stage <= stage && !present {
            triggers.push(Trigger::new(position, unlock_stage));
            added += 1;
        }
    }
    added
}

/// Slimes fielded on a regular stage.
pub fn enemy_count(stage: u32) -> u32 {
    stage.saturating_add(1)
}

/// Places the stage's slimes away from the player.
///
/// `move_interval` seeds each slime's first decision timer, staggered so the pack
/// does not move in lockstep.
pub fn spawn_enemies<R: Rng>(
    stage: u32,
    grid: &Grid,
    player: Position,
    move_interval: u32,
    attempts: u32,
    rng: &mut R,
) -> Vec<Enemy> {
    let count = enemy_count(stage).min(interior_tiles(grid));
    let mut enemies: Vec<Enemy> = Vec::new();
    for _ in 0..count {
        let tile = find_free_tile(grid, rng, attempts, |pos| {
            pos.chebyshev_distance(player) >= ENEMY_SAFE_DISTANCE
                && !enemies.iter().any(|e| e.cell() == pos)
        });
        match tile {
            Some(pos) => {
                let timer = move_interval + rng.gen_range(0..move_interval.max(1));
                enemies.push(Enemy::new(pos, timer));
            }
            None => log::warn!(
                "No tile {} away from the player for a slime; skipping",
                ENEMY_SAFE_DISTANCE
            ),
        }
    }
    enemies
}

/// Interior rectangle the boss footprint must stay inside: (min, max) of its top-left.
pub fn boss_bounds(grid: &Grid) -> (Vec2, Vec2) {
    let max_x = (grid.width as f32 - 3.0).max(1.0);
    let max_y = (grid.height as f32 - 3.0).max(1.0);
    (Vec2::new(1.0, 1.0), Vec2::new(max_x, max_y))
}

/// Creates the boss with its footprint covering the grid center.
pub fn spawn_boss(grid: &Grid) -> Boss {
    let center = grid.center();
    let (min, max) = boss_bounds(grid);
    let x = ((center.x - 1) as f32).clamp(min.x, max.x);
    let y = ((center.y - 1) as f32).clamp(min.y, max.y);
    Boss::new(Vec2::new(x, y))
}

/// Scatters treasure around where the boss fell.
pub fn spawn_boss_loot<R: Rng>(
    center: Vec2,
    grid: &Grid,
    excluded: &HashSet<Position>,
    rng: &mut R,
) -> Vec<Collectible> {
    let origin = center.rounded();
    let mut taken: HashSet<Position> = HashSet::new();
    let mut loot = Vec::with_capacity(BOSS_LOOT_COUNT);

    for _ in 0..BOSS_LOOT_COUNT {
        let mut placed = None;
        for _ in 0..20 {
            let pos = origin + Position::new(rng.gen_range(-2..=2), rng.gen_range(-2..=2));
            if grid.is_walkable(pos) && !taken.contains(&pos) && !excluded.contains(&pos) {
                placed = Some(pos);
                break;
            }
        }
        if let Some(pos) = placed {
            taken.insert(pos);
            let phase = rng.gen_range(0.0..TAU);
            loot.push(Collectible::new(
                pos,
                CollectibleKind::reward(ItemKind::Treasure),
                phase,
            ));
        }
    }

    loot
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Tile;
    use crate::generation::authored_grid;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_collectibles_avoid_player_and_excluded() {
        let grid = authored_grid(1).unwrap();
        let mut rng = StdRng::seed_from_u64(11);
        let excluded: HashSet<Position> = [Position::new(2, 2), Position::new(9, 7)].into();
        let items = spawn_collectibles(5, &grid, grid.spawn, &excluded, 100, &mut rng);

        assert_eq!(items.len(), 5);
        let unique: HashSet<Position> = items.iter().map(|c| c.position).collect();
        assert_eq!(unique.len(), 5);
        for item in &items {
            assert!(grid.is_walkable(item.position));
            assert_ne!(item.position, grid.spawn);
            assert!(!excluded.contains(&item.position));
            assert!(matches!(item.kind, CollectibleKind::Reward { .. }));
            assert!(item.phase >= 0.0 && item.phase < TAU);
        }
    }

    #[test]
    fn test_huge_counts_are_capped_by_grid() {
        let grid = Grid::filled(5, 5, Tile::Floor, Position::new(2, 2));
        let mut rng = StdRng::seed_from_u64(12);

        let items = spawn_collectibles(u32::MAX, &grid, grid.spawn, &HashSet::new(), 50, &mut rng);
        assert!(items.len() <= 8, "placed {}", items.len());

        assert_eq!(enemy_count(u32::MAX), u32::MAX);
        let enemies = spawn_enemies(u32::MAX, &grid, grid.spawn, 30, 50, &mut rng);
        assert!(enemies.len() <= 9);
    }

    #[test]
    fn test_exhausted_placement_is_skipped() {
        // Only the spawn tile is walkable, so nothing can be placed.
        let mut grid = Grid::filled(5, 5, Tile::Wall, Position::new(2, 2));
        grid.set(Position::new(2, 2), Tile::Floor);
        let mut rng = StdRng::seed_from_u64(3);
        let items = spawn_collectibles(3, &grid, grid.spawn, &HashSet::new(), 100, &mut rng);
        assert!(items.is_empty());
        let enemies = spawn_enemies(4, &grid, grid.spawn, 30, 100, &mut rng);
        assert!(enemies.is_empty());
    }

    #[test]
    fn test_heart_schedule() {
        assert_eq!(heart_count(1), 0);
        assert_eq!(heart_count(2), 1);
        assert_eq!(heart_count(3), 0);
        assert_eq!(heart_count(6), 2);
        assert_eq!(heart_count(9), 1);
        assert_eq!(heart_count(12), 2);
    }

    #[test]
    fn test_triggers_unlock_and_persist() {
        let mut triggers = Vec::new();
        assert_eq!(spawn_triggers(1, &mut triggers), 2);
        triggers[0].opened = true;
        let first_id = triggers[0].id;

        assert_eq!(spawn_triggers(3, &mut triggers), 1);
        assert_eq!(spawn_triggers(3, &mut triggers), 0);
        assert_eq!(spawn_triggers(6, &mut triggers), 1);
        assert_eq!(triggers.len(), 4);
        assert!(triggers.iter().any(|t| t.id == first_id && t.opened));
    }

    #[test]
    fn test_enemies_keep_distance_from_player() {
        let grid = Grid::filled(16, 12, Tile::Floor, Position::new(2, 6));
        let mut rng = StdRng::seed_from_u64(5);
        let enemies = spawn_enemies(4, &grid, grid.spawn, 30, 100, &mut rng);
        assert_eq!(enemies.len(), 5);
        for enemy in &enemies {
            assert!(enemy.cell().chebyshev_distance(grid.spawn) >= ENEMY_SAFE_DISTANCE);
            assert!(enemy.move_timer >= 30 && enemy.move_timer < 60);
        }
    }

    #[test]
    fn test_boss_spawns_over_center() {
        let grid = Grid::filled(16, 12, Tile::Floor, Position::new(2, 6));
        let boss = spawn_boss(&grid);
        assert_eq!(boss.position, Vec2::new(7.0, 5.0));
        assert!(boss.hitbox_contains(grid.center()));
    }

    #[test]
    fn test_boss_loot_lands_near_boss() {
        let grid = Grid::filled(16, 12, Tile::Floor, Position::new(2, 6));
        let mut rng = StdRng::seed_from_u64(8);
        let center = Vec2::new(7.5, 5.5);
        let loot = spawn_boss_loot(center, &grid, &HashSet::new(), &mut rng);
        assert_eq!(loot.len(), BOSS_LOOT_COUNT);
        for piece in &loot {
            assert!(piece.position.chebyshev_distance(center.rounded()) <= 2);
            assert_eq!(piece.kind, CollectibleKind::reward(ItemKind::Treasure));
        }
    }
}
