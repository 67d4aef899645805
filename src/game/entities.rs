//! # Entities
//!
//! The fixed entity taxonomy: player, slime enemies, boss, projectiles, collectibles,
//! chests, and particles.

use crate::game::{new_entity_id, Direction, EntityId, Position, Rgb, Vec2};
use serde::{Deserialize, Serialize};

/// Hit points every slime spawns with.
pub const ENEMY_MAX_HP: u32 = 2;

/// Hit points the boss spawns with.
pub const BOSS_MAX_HP: u32 = 20;

/// Knockback speed below which an enemy resumes chasing.
pub const KNOCKBACK_EPSILON: f32 = 0.05;

/// Per-tick multiplicative knockback decay.
pub const KNOCKBACK_DECAY: f32 = 0.8;

/// The player avatar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub position: Position,
    pub facing: Direction,
    pub health: u32,
    pub max_health: u32,
    /// Ticks left during which damage is ignored
    pub invincibility_ticks: u32,
    /// True while an attack swing is locked in
    pub attacking: bool,
    pub color: Rgb,
    /// Ticks a direction has been held since the last step
    pub move_repeat: u32,
}

impl Player {
    /// Creates a player at full health facing south.
    pub fn new(position: Position, max_health: u32) -> Self {
        Self {
            position,
            facing: Direction::South,
            health: max_health,
            max_health,
            invincibility_ticks: 0,
            attacking: false,
            color: Rgb::hex(0x6ee7ff),
            move_repeat: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_invincible(&self) -> bool {
        self.invincibility_ticks > 0
    }

    /// Cell directly in front of the player.
    pub fn facing_cell(&self) -> Position {
        self.position + self.facing.to_delta()
    }

    /// Restores health, capped at the maximum. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.health;
        self.health = (self.health + amount).min(self.max_health);
        self.health - before
    }
}

/// A slime enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub position: Vec2,
    pub hp: u32,
    /// Ticks until the next movement decision
    pub move_timer: u32,
    pub knockback: Vec2,
    /// Ticks left on the hit flash
    pub flash_ticks: u32,
}

impl Enemy {
    pub fn new(position: Position, move_timer: u32) -> Self {
        Self {
            id: new_entity_id(),
            position: position.to_vec2(),
            hp: ENEMY_MAX_HP,
            move_timer,
            knockback: Vec2::ZERO,
            flash_ticks: 0,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Cell used for hit-testing and contact damage.
    pub fn cell(&self) -> Position {
        self.position.rounded()
    }

    /// Whether the enemy is still sliding from a hit.
    pub fn in_knockback(&self) -> bool {
        self.knockback.length() >= KNOCKBACK_EPSILON
    }
}

/// Boss behaviour marker. Only affects how the boss is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    Normal,
    Enraged,
}

/// The boss occupies a 2×2 footprint whose top-left corner is `position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub position: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Ticks since spawn; drives movement and attack cadence
    pub ticks: u32,
    pub phase: BossPhase,
    pub flash_ticks: u32,
}

impl Boss {
    pub fn new(position: Vec2) -> Self {
        Self {
            position,
            hp: BOSS_MAX_HP,
            max_hp: BOSS_MAX_HP,
            ticks: 0,
            phase: BossPhase::Normal,
            flash_ticks: 0,
        }
    }

    /// Center of the 2×2 footprint.
    pub fn center(&self) -> Vec2 {
        self.position + Vec2::new(0.5, 0.5)
    }

    /// Loose hitbox test used for melee: the boss spans several cells.
    pub fn hitbox_contains(&self, cell: Position) -> bool {
        let center = self.center();
        (cell.x as f32 - center.x).abs() <= 1.5 && (cell.y as f32 - center.y).abs() <= 1.5
    }
}

/// A boss projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Remaining ticks before the projectile fizzles
    pub lifetime: u32,
}

/// Visual tag for reward collectibles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Gem,
    Star,
    Apple,
    Orb,
    /// High-value loot dropped by the boss
    Treasure,
}

impl ItemKind {
    /// Items that spawn during normal stage population.
    pub const STAGE_ITEMS: [ItemKind; 4] =
        [ItemKind::Gem, ItemKind::Star, ItemKind::Apple, ItemKind::Orb];

    /// Coin and xp reward for picking the item up.
    pub fn reward(self) -> (u32, u32) {
        match self {
            ItemKind::Gem => (10, 5),
            ItemKind::Star => (5, 10),
            ItemKind::Apple => (3, 3),
            ItemKind::Orb => (15, 15),
            ItemKind::Treasure => (30, 20),
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            ItemKind::Gem => "💎",
            ItemKind::Star => "⭐",
            ItemKind::Apple => "🍎",
            ItemKind::Orb => "🔮",
            ItemKind::Treasure => "👑",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            ItemKind::Gem => Rgb::hex(0x4cc9f0),
            ItemKind::Star => Rgb::hex(0xffd700),
            ItemKind::Apple => Rgb::hex(0xff4d4d),
            ItemKind::Orb => Rgb::hex(0xc44cff),
            ItemKind::Treasure => Rgb::hex(0xffb703),
        }
    }
}

/// What a collectible grants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectibleKind {
    Reward { item: ItemKind, value: u32, xp: u32 },
    Heal { amount: u32 },
}

impl CollectibleKind {
    pub fn reward(item: ItemKind) -> Self {
        let (value, xp) = item.reward();
        CollectibleKind::Reward { item, value, xp }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            CollectibleKind::Reward { item, .. } => item.glyph(),
            CollectibleKind::Heal { .. } => "❤️",
        }
    }

    pub fn color(self) -> Rgb {
        match self {
            CollectibleKind::Reward { item, .. } => item.color(),
            CollectibleKind::Heal { .. } => Rgb::hex(0xff6b9d),
        }
    }
}

/// A pickup lying on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Collectible {
    pub id: EntityId,
    pub position: Position,
    pub kind: CollectibleKind,
    /// Bobbing animation phase in radians
    pub phase: f32,
}

impl Collectible {
    pub fn new(position: Position, kind: CollectibleKind, phase: f32) -> Self {
        Self {
            id: new_entity_id(),
            position,
            kind,
            phase,
        }
    }
}

/// A chest that pays out once per opening.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    pub id: EntityId,
    pub position: Position,
    /// First stage on which this chest is present
    pub unlock_stage: u32,
    pub opened: bool,
}

impl Trigger {
    pub fn new(position: Position, unlock_stage: u32) -> Self {
        Self {
            id: new_entity_id(),
            position,
            unlock_stage,
            opened: false,
        }
    }

    /// Coins granted when opened at the given player level.
    pub fn coin_reward(level: u32) -> u32 {
        20 + level * 5
    }

    /// Xp granted when opened.
    pub const XP_REWARD: u32 = 25;

    pub fn glyph(&self) -> &'static str {
        if self.opened {
            "🎁"
        } else {
            "📦"
        }
    }
}

/// Transient visual effect. Positions are in tiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    pub color: Rgb,
    /// Radius in tiles
    pub size: f32,
    /// Remaining life in (0, 1]; also used as opacity
    pub life: f32,
}

impl Particle {
    pub const GRAVITY: f32 = 0.004;
    pub const DECAY: f32 = 0.03;

    /// Advances one tick. Returns false once the particle has faded out.
    pub fn update(&mut self) -> bool {
        self.position = self.position + self.velocity;
        self.velocity.y += Self::GRAVITY;
        self.life -= Self::DECAY;
        self.life > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_heal_is_capped() {
        let mut player = Player::new(Position::new(1, 1), 5);
        player.health = 4;
        assert_eq!(player.heal(3), 1);
        assert_eq!(player.health, 5);
    }

    #[test]
    fn test_player_facing_cell() {
        let mut player = Player::new(Position::new(3, 3), 5);
        player.facing = Direction::West;
        assert_eq!(player.facing_cell(), Position::new(2, 3));
    }

    #[test]
    fn test_enemy_cell_rounds_fractional_position() {
        let mut enemy = Enemy::new(Position::new(4, 4), 30);
        enemy.position = Vec2::new(4.6, 3.8);
        assert_eq!(enemy.cell(), Position::new(5, 4));
        assert_eq!(enemy.hp, ENEMY_MAX_HP);
    }

    #[test]
    fn test_boss_hitbox_covers_footprint_neighbours() {
        let boss = Boss::new(Vec2::new(5.0, 5.0));
        // Footprint cells
        assert!(boss.hitbox_contains(Position::new(5, 5)));
        assert!(boss.hitbox_contains(Position::new(6, 6)));
        // Adjacent ring
        assert!(boss.hitbox_contains(Position::new(4, 5)));
        assert!(boss.hitbox_contains(Position::new(7, 6)));
        // Two cells away
        assert!(!boss.hitbox_contains(Position::new(3, 5)));
        assert!(!boss.hitbox_contains(Position::new(5, 8)));
    }

    #[test]
    fn test_collectible_kind_rewards() {
        assert_eq!(
            CollectibleKind::reward(ItemKind::Orb),
            CollectibleKind::Reward { item: ItemKind::Orb, value: 15, xp: 15 }
        );
        assert_eq!(Trigger::coin_reward(3), 35);
    }

    #[test]
    fn test_particle_fades_out() {
        let mut particle = Particle {
            position: Vec2::ZERO,
            velocity: Vec2::new(0.1, 0.0),
            color: Rgb(255, 255, 255),
            size: 0.1,
            life: 1.0,
        };
        let mut ticks = 0;
        while particle.update() {
            ticks += 1;
        }
        assert_eq!(ticks, 33);
        assert!(particle.velocity.y > 0.0);
    }
}
