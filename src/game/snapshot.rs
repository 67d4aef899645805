//! # Render Snapshot
//!
//! Read-only view of the game state for drawing. Building a snapshot never mutates
//! the simulation, so display back ends stay interchangeable.

use crate::game::{
    BossPhase, Direction, GameState, Palette, Particle, Position, Rgb, StagePhase, Tile, Vec2,
};

/// Ticks per invincibility blink half-period.
const BLINK_TICKS: u32 = 4;

/// Everything a display needs to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub width: usize,
    pub height: usize,
    pub tiles: Vec<Vec<Tile>>,
    pub tile_colors: Vec<Vec<Rgb>>,
    pub palette: Palette,
    pub player: PlayerSprite,
    pub enemies: Vec<EnemySprite>,
    pub boss: Option<BossSprite>,
    pub collectibles: Vec<PickupSprite>,
    pub chests: Vec<PickupSprite>,
    pub projectiles: Vec<Vec2>,
    pub particles: Vec<Particle>,
    pub hud: HudSnapshot,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSprite {
    pub position: Position,
    pub facing: Direction,
    pub color: Rgb,
    /// False on the off-beat of the invincibility blink
    pub visible: bool,
    /// Cell covered by the sword swing while attacking
    pub swing: Option<Position>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnemySprite {
    pub position: Vec2,
    pub hp: u32,
    pub flashing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BossSprite {
    /// Top-left of the 2×2 footprint
    pub position: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    pub phase: BossPhase,
    pub flashing: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PickupSprite {
    pub position: Position,
    pub glyph: &'static str,
    pub color: Rgb,
    /// Vertical bob offset in tiles
    pub bob: f32,
}

/// Heads-up display values.
#[derive(Debug, Clone, PartialEq)]
pub struct HudSnapshot {
    pub coins: u32,
    pub level: u32,
    pub xp: u32,
    pub xp_to_next: u32,
    pub xp_fraction: f32,
    pub stage: u32,
    pub time_left: u32,
    pub collectibles_got: u32,
    pub collectibles_needed: u32,
    pub stage_fraction: f32,
    pub hearts: u32,
    pub max_hearts: u32,
    /// Boss health as a fraction, on boss stages only
    pub boss_fraction: Option<f32>,
    pub popup: Option<String>,
    pub announcement: Option<String>,
    pub phase: StagePhase,
    pub paused: bool,
}

impl GameState {
    /// Builds the view for the current tick.
    pub fn snapshot(&self) -> RenderSnapshot {
        let tile_colors = self
            .grid
            .tiles
            .iter()
            .map(|row| row.iter().map(|t| self.palette.tile_color(*t)).collect())
            .collect();

        let blink_off = self.player.is_invincible()
            && (self.player.invincibility_ticks / BLINK_TICKS) % 2 == 1;
        let player = PlayerSprite {
            position: self.player.position,
            facing: self.player.facing,
            color: self.player.color,
            visible: !blink_off,
            swing: self.player.attacking.then(|| self.player.facing_cell()),
        };

        let time = self.tick as f32 / 12.0;
        let collectibles = self
            .registry
            .collectibles
            .iter()
            .map(|c| PickupSprite {
                position: c.position,
                glyph: c.kind.glyph(),
                color: c.kind.color(),
                bob: (time + c.phase).sin() * 0.1,
            })
            .collect();
        let chests = self
            .registry
            .triggers
            .iter()
            .map(|t| PickupSprite {
                position: t.position,
                glyph: t.glyph(),
                color: if t.opened {
                    Rgb::hex(0x8a6d3b)
                } else {
                    Rgb::hex(0xd4a373)
                },
                bob: 0.0,
            })
            .collect();

        let boss = self.registry.boss.as_ref().map(|b| BossSprite {
            position: b.position,
            hp: b.hp,
            max_hp: b.max_hp,
            phase: b.phase,
            flashing: b.flash_ticks > 0,
        });

        RenderSnapshot {
            width: self.grid.width,
            height: self.grid.height,
            tiles: self.grid.tiles.clone(),
            tile_colors,
            palette: self.palette,
            player,
            enemies: self
                .registry
                .enemies
                .iter()
                .map(|e| EnemySprite {
                    position: e.position,
                    hp: e.hp,
                    flashing: e.flash_ticks > 0,
                })
                .collect(),
            boss,
            collectibles,
            chests,
            projectiles: self.registry.projectiles.iter().map(|p| p.position).collect(),
            particles: self.registry.particles.clone(),
            hud: self.hud(),
        }
    }

    /// HUD values only, for front ends that draw the HUD separately.
    pub fn hud(&self) -> HudSnapshot {
        let progress = &self.progress;
        HudSnapshot {
            coins: progress.coins,
            level: progress.level,
            xp: progress.xp,
            xp_to_next: progress.xp_to_next,
            xp_fraction: progress.xp_fraction(),
            stage: progress.stage,
            time_left: progress.time_left,
            collectibles_got: progress.collectibles_got,
            collectibles_needed: progress.collectibles_needed,
            stage_fraction: progress.stage_fraction(),
            hearts: self.player.health,
            max_hearts: self.player.max_health,
            boss_fraction: self
                .registry
                .boss
                .as_ref()
                .map(|b| b.hp as f32 / b.max_hp.max(1) as f32),
            popup: self.popup.clone(),
            announcement: self.announcement.clone(),
            phase: self.phase,
            paused: self.paused,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_mirrors_state() {
        let state = GameState::new(5);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.width, state.grid.width);
        assert_eq!(snapshot.tile_colors.len(), state.grid.height);
        assert_eq!(snapshot.collectibles.len(), state.registry.collectibles.len());
        assert_eq!(snapshot.chests.len(), 2);
        assert_eq!(snapshot.hud.hearts, 5);
        assert_eq!(snapshot.hud.stage, 1);
        assert!(snapshot.boss.is_none());
        assert!(snapshot.player.visible);
        assert!(snapshot.player.swing.is_none());
    }

    #[test]
    fn test_snapshot_is_pure() {
        let state = GameState::new(6);
        let before = state.clone();
        let _ = state.snapshot();
        assert_eq!(state.tick, before.tick);
        assert_eq!(state.registry, before.registry);
    }

    #[test]
    fn test_invincibility_blinks() {
        let mut state = GameState::new(7);
        state.player.invincibility_ticks = BLINK_TICKS;
        assert!(!state.snapshot().player.visible);
        state.player.invincibility_ticks = BLINK_TICKS * 2;
        assert!(state.snapshot().player.visible);
    }

    #[test]
    fn test_boss_fraction_on_boss_stage() {
        let mut state = GameState::new(8);
        state.load_stage(5);
        state.registry.boss.as_mut().unwrap().hp = 10;
        assert_eq!(state.hud().boss_fraction, Some(0.5));
    }
}
