//! # Entity Registry
//!
//! Typed collections for every non-player entity in the current stage.

use crate::game::{Boss, Collectible, Enemy, EntityId, Particle, Position, Projectile, Rgb, Trigger, Vec2};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Owns all entities of the running stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRegistry {
    pub collectibles: Vec<Collectible>,
    /// Chests persist across stage loads
    pub triggers: Vec<Trigger>,
    pub enemies: Vec<Enemy>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes everything that belongs to a single stage. Chests and particles survive.
    pub fn clear_stage(&mut self) {
        self.collectibles.clear();
        self.enemies.clear();
        self.boss = None;
        self.projectiles.clear();
    }

    /// Tiles already taken by collectibles or chests.
    pub fn occupied_tiles(&self) -> HashSet<Position> {
        self.collectibles
            .iter()
            .map(|c| c.position)
            .chain(self.triggers.iter().map(|t| t.position))
            .collect()
    }

    /// Removes and returns the collectible lying on a tile, if any.
    pub fn take_collectible_at(&mut self, position: Position) -> Option<Collectible> {
        let index = self
            .collectibles
            .iter()
            .position(|c| c.position == position)?;
        Some(self.collectibles.remove(index))
    }

    pub fn trigger_mut(&mut self, id: EntityId) -> Option<&mut Trigger> {
        self.triggers.iter_mut().find(|t| t.id == id)
    }

    /// Chest standing on a tile, opened or not.
    pub fn trigger_at(&self, position: Position) -> Option<&Trigger> {
        self.triggers.iter().find(|t| t.position == position)
    }

    /// Drops enemies whose hp reached zero. Returns how many were removed.
    pub fn remove_dead_enemies(&mut self) -> usize {
        let before = self.enemies.len();
        self.enemies.retain(Enemy::is_alive);
        before - self.enemies.len()
    }

    /// Emits a burst of particles centered on a tile coordinate.
    pub fn burst<R: Rng>(&mut self, rng: &mut R, center: Vec2, color: Rgb, count: usize) {
        for _ in 0..count {
            self.particles.push(Particle {
                position: center,
                velocity: Vec2::new(
                    (rng.gen::<f32>() - 0.5) * 0.12,
                    (rng.gen::<f32>() - 0.5) * 0.12 - 0.06,
                ),
                color,
                size: rng.gen::<f32>() * 0.12 + 0.06,
                life: 1.0,
            });
        }
    }

    /// Advances every particle and drops the ones that faded out.
    pub fn update_particles(&mut self) {
        self.particles.retain_mut(Particle::update);
    }

    /// Reward collectibles still on the floor.
    pub fn reward_count(&self) -> usize {
        self.collectibles
            .iter()
            .filter(|c| matches!(c.kind, crate::game::CollectibleKind::Reward { .. }))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{CollectibleKind, ItemKind};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn gem_at(x: i32, y: i32) -> Collectible {
        Collectible::new(Position::new(x, y), CollectibleKind::reward(ItemKind::Gem), 0.0)
    }

    #[test]
    fn test_take_collectible_only_removes_matching_tile() {
        let mut registry = EntityRegistry::new();
        registry.collectibles.push(gem_at(1, 1));
        registry.collectibles.push(gem_at(2, 1));

        let taken = registry.take_collectible_at(Position::new(2, 1)).unwrap();
        assert_eq!(taken.position, Position::new(2, 1));
        assert_eq!(registry.collectibles.len(), 1);
        assert_eq!(registry.collectibles[0].position, Position::new(1, 1));
        assert!(registry.take_collectible_at(Position::new(3, 3)).is_none());
    }

    #[test]
    fn test_trigger_lookup_by_tile() {
        let mut registry = EntityRegistry::new();
        registry.triggers.push(Trigger::new(Position::new(2, 2), 1));
        let id = registry.triggers[0].id;

        assert_eq!(registry.trigger_at(Position::new(2, 2)).map(|t| t.id), Some(id));
        assert!(registry.trigger_at(Position::new(2, 3)).is_none());

        if let Some(chest) = registry.trigger_mut(id) {
            chest.opened = true;
        }
        assert!(registry.trigger_at(Position::new(2, 2)).is_some_and(|t| t.opened));
    }

    #[test]
    fn test_clear_stage_keeps_triggers() {
        let mut registry = EntityRegistry::new();
        registry.collectibles.push(gem_at(1, 1));
        registry.triggers.push(Trigger::new(Position::new(2, 2), 1));
        registry.enemies.push(Enemy::new(Position::new(3, 3), 10));
        registry.boss = Some(Boss::new(Vec2::new(4.0, 4.0)));

        registry.clear_stage();
        assert!(registry.collectibles.is_empty());
        assert!(registry.enemies.is_empty());
        assert!(registry.boss.is_none());
        assert_eq!(registry.triggers.len(), 1);
    }

    #[test]
    fn test_particle_burst_and_decay() {
        let mut registry = EntityRegistry::new();
        let mut rng = StdRng::seed_from_u64(7);
        registry.burst(&mut rng, Vec2::new(3.0, 3.0), Rgb(255, 215, 0), 8);
        assert_eq!(registry.particles.len(), 8);
        for _ in 0..40 {
            registry.update_particles();
        }
        assert!(registry.particles.is_empty());
    }

    #[test]
    fn test_remove_dead_enemies() {
        let mut registry = EntityRegistry::new();
        registry.enemies.push(Enemy::new(Position::new(1, 1), 10));
        registry.enemies.push(Enemy::new(Position::new(2, 2), 10));
        registry.enemies[0].hp = 0;
        assert_eq!(registry.remove_dead_enemies(), 1);
        assert_eq!(registry.enemies.len(), 1);
    }
}
