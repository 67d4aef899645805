//! # Enemy AI
//!
//! Slime chasing and knockback, boss movement and attack cadence, and projectile flight.

use crate::game::{
    combat, Direction, GameEvent, GameState, Grid, Position, Projectile, Vec2, KNOCKBACK_DECAY,
};
use crate::generation::boss_bounds;
use crate::utils::{step_toward, unit_step};
use rand::seq::SliceRandom;
use rand::Rng;

/// Base ticks between slime movement decisions.
pub const ENEMY_MOVE_TICKS: u32 = 30;

/// Chance a slime wanders instead of chasing.
pub const ENEMY_RANDOM_STEP_CHANCE: f64 = 0.2;

/// Base ticks between boss steps.
pub const BOSS_MOVE_TICKS: u32 = 45;

/// Base ticks between boss projectiles.
pub const BOSS_ATTACK_TICKS: u32 = 120;

/// Boss step length per axis.
pub const BOSS_STEP: f32 = 0.5;

/// Axis offset below which the boss holds still.
pub const BOSS_DEAD_ZONE: f32 = 1.0;

pub const PROJECTILE_SPEED: f32 = 0.1;
pub const PROJECTILE_LIFETIME: u32 = 180;
pub const PROJECTILE_HIT_RADIUS: f32 = 0.5;

/// Picks the next cell for a slime at `from` chasing `target`.
///
/// With a small chance the slime wanders in a random direction. Otherwise it steps
/// along the axis with the larger offset, falling back to the other axis when the
/// first is blocked. Returns None when the slime stays put.
pub fn choose_step<R: Rng>(grid: &Grid, rng: &mut R, from: Position, target: Position) -> Option<Position> {
    if rng.gen_bool(ENEMY_RANDOM_STEP_CHANCE) {
        let direction = *Direction::all().choose(rng)?;
        let next = from + direction.to_delta();
        return grid.is_walkable(next).then_some(next);
    }

    let offset = target - from;
    let horizontal = Position::new(unit_step(offset.x), 0);
    let vertical = Position::new(0, unit_step(offset.y));
    let (primary, secondary) = if offset.x.abs() >= offset.y.abs() {
        (horizontal, vertical)
    } else {
        (vertical, horizontal)
    };

    [primary, secondary]
        .into_iter()
        .filter(|step| *step != Position::new(0, 0))
        .map(|step| from + step)
        .find(|next| grid.is_walkable(*next))
}

/// Advances every slime one tick and applies contact damage.
pub fn update_enemies(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    let interval = state.profile.enemy_interval(ENEMY_MOVE_TICKS);
    let player = state.player.position;
    let grid = &state.grid;
    let rng = &mut state.rng;
    let mut contact = false;

    for enemy in state.registry.enemies.iter_mut() {
        enemy.flash_ticks = enemy.flash_ticks.saturating_sub(1);

        if enemy.in_knockback() {
            let next = enemy.position + enemy.knockback;
            if grid.is_walkable(next.rounded()) {
                enemy.position = next;
                enemy.knockback = enemy.knockback * KNOCKBACK_DECAY;
            } else {
                enemy.knockback = Vec2::ZERO;
            }
            if !enemy.in_knockback() {
                enemy.knockback = Vec2::ZERO;
                enemy.position = enemy.cell().to_vec2();
            }
        } else {
            enemy.move_timer = enemy.move_timer.saturating_sub(1);
            if enemy.move_timer == 0 {
                enemy.move_timer = interval;
                let cell = enemy.cell();
                enemy.position = cell.to_vec2();
                if let Some(next) = choose_step(grid, rng, cell, player) {
                    enemy.position = next.to_vec2();
                }
            }
        }

        if enemy.cell() == player {
            contact = true;
        }
    }

    if contact {
        combat::take_damage(state);
    }
}

/// Advances the boss: stepping toward the player and firing on its cadence.
pub fn update_boss(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    let (min, max) = boss_bounds(&state.grid);
    let target = state.player.position.to_vec2();
    let move_every = state.profile.boss_interval(BOSS_MOVE_TICKS);
    let attack_every = state.profile.boss_interval(BOSS_ATTACK_TICKS);

    let Some(boss) = state.registry.boss.as_mut() else {
        return;
    };
    boss.ticks += 1;
    boss.flash_ticks = boss.flash_ticks.saturating_sub(1);

    if boss.ticks % move_every == 0 {
        let center = boss.center();
        let x = step_toward(center.x, target.x, BOSS_STEP, BOSS_DEAD_ZONE) - 0.5;
        let y = step_toward(center.y, target.y, BOSS_STEP, BOSS_DEAD_ZONE) - 0.5;
        boss.position = Vec2::new(x.clamp(min.x, max.x), y.clamp(min.y, max.y));
    }

    let mut fired = None;
    if boss.ticks % attack_every == 0 {
        let origin = boss.center();
        let heading = (target - origin).normalized();
        if heading != Vec2::ZERO {
            fired = Some(Projectile {
                position: origin,
                velocity: heading * PROJECTILE_SPEED,
                lifetime: PROJECTILE_LIFETIME,
            });
        }
    }

    if let Some(projectile) = fired {
        let position = projectile.position;
        state.registry.projectiles.push(projectile);
        state.emit(GameEvent::ProjectileFired { position });
    }
}

/// Moves projectiles, expiring them by lifetime, bounds, or contact with the player.
pub fn update_projectiles(state: &mut GameState) {
    if !state.is_active() {
        return;
    }
    let player = state.player.position.to_vec2();
    let width = state.grid.width as f32;
    let height = state.grid.height as f32;
    let mut hit = false;

    state.registry.projectiles.retain_mut(|projectile| {
        projectile.position = projectile.position + projectile.velocity;
        projectile.lifetime = projectile.lifetime.saturating_sub(1);
        let p = projectile.position;
        if projectile.lifetime == 0
            || p.x < -0.5
            || p.y < -0.5
            || p.x > width - 0.5
            || p.y > height - 0.5
        {
            return false;
        }
        if (p - player).length() <= PROJECTILE_HIT_RADIUS {
            hit = true;
            return false;
        }
        true
    });

    if hit {
        combat::take_damage(state);
    }
}
