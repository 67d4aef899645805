//! # Combat
//!
//! Melee attacks, player damage, and the death handling for slimes and the boss.

use crate::audio::AudioCue;
use crate::game::{
    BossPhase, Collectible, CollectibleKind, DeferredAction, GameEvent, GameState, Rgb, Vec2,
};
use crate::generation::spawn_boss_loot;
use rand::Rng;
use std::f32::consts::TAU;

/// Initial knockback speed in tiles per tick.
pub const KNOCKBACK_IMPULSE: f32 = 0.3;

/// Ticks an enemy flashes after being hit.
pub const HIT_FLASH_TICKS: u32 = 8;

/// Xp granted for a slime kill.
pub const ENEMY_XP: u32 = 15;

/// Chance a slime drops a heart while the player is hurt.
pub const HEAL_DROP_CHANCE: f64 = 0.25;

/// Swings at the cell in front of the player.
///
/// Every living slime rounding to that cell and the boss (if its hitbox covers the
/// cell) take one point of damage. Slimes are knocked back along the facing.
/// Returns false when the swing was refused by the lockout or an inactive state.
pub fn attack(state: &mut GameState) -> bool {
    if !state.is_active() || state.player.attacking {
        return false;
    }
    state.player.attacking = true;
    state
        .deferred
        .schedule(state.config.attack_lockout_ticks, DeferredAction::ReleaseAttack);
    state.sound(AudioCue::Attack);

    let target = state.player.facing_cell();
    let impulse = state.player.facing.to_vec2() * KNOCKBACK_IMPULSE;

    let mut hits = Vec::new();
    for enemy in state
        .registry
        .enemies
        .iter_mut()
        .filter(|e| e.is_alive() && e.cell() == target)
    {
        enemy.hp -= 1;
        enemy.knockback = impulse;
        enemy.flash_ticks = HIT_FLASH_TICKS;
        hits.push((enemy.position, enemy.hp));
    }

    for &(position, hp) in &hits {
        state.sound(AudioCue::Hit);
        state.emit(GameEvent::EnemyHit { position, hp });
    }
    state.registry.remove_dead_enemies();
    for (position, _) in hits.into_iter().filter(|(_, hp)| *hp == 0) {
        enemy_death(state, position);
    }

    let boss_hp = state.registry.boss.as_mut().and_then(|boss| {
        if !boss.hitbox_contains(target) || boss.hp == 0 {
            return None;
        }
        boss.hp -= 1;
        boss.flash_ticks = HIT_FLASH_TICKS;
        if boss.hp * 2 <= boss.max_hp {
            boss.phase = BossPhase::Enraged;
        }
        Some(boss.hp)
    });
    if let Some(hp) = boss_hp {
        state.sound(AudioCue::Hit);
        state.emit(GameEvent::BossHit { hp });
        if hp == 0 {
            boss_death(state);
        }
    }

    true
}

/// Applies one point of damage to the player.
///
/// Ignored while invincible or inactive. Reaching zero health starts the game-over
/// sequence. Returns whether damage was applied.
pub fn take_damage(state: &mut GameState) -> bool {
    if !state.is_active() || state.player.is_invincible() || !state.player.is_alive() {
        return false;
    }
    state.player.health -= 1;
    state.player.invincibility_ticks = state.config.invincibility_ticks;
    let health = state.player.health;
    log::debug!("Player hit, health {}", health);

    let center = state.player.position.to_vec2();
    state
        .registry
        .burst(&mut state.rng, center, Rgb::hex(0xff4d4d), 8);
    state.sound(AudioCue::Hit);
    state.emit(GameEvent::PlayerDamaged { health });

    if health == 0 {
        state.begin_game_over();
    }
    true
}

fn enemy_death(state: &mut GameState, position: Vec2) {
    state
        .registry
        .burst(&mut state.rng, position, Rgb::hex(0x7bd389), 10);
    state.sound(AudioCue::EnemyDeath);
    state.emit(GameEvent::EnemyKilled { position });
    state.award(0, ENEMY_XP);

    let hurt = state.player.health < state.player.max_health;
    if hurt && state.rng.gen_bool(HEAL_DROP_CHANCE) {
        let cell = position.rounded();
        let free = state.grid.is_walkable(cell)
            && cell != state.player.position
            && !state.registry.occupied_tiles().contains(&cell);
        if free {
            let phase = state.rng.gen_range(0.0..TAU);
            state.registry.collectibles.push(Collectible::new(
                cell,
                CollectibleKind::Heal { amount: 1 },
                phase,
            ));
        }
    }
}

fn boss_death(state: &mut GameState) {
    let Some(boss) = state.registry.boss.take() else {
        return;
    };
    let center = boss.center();
    let stage = state.progress.stage;
    log::info!("Boss defeated on stage {}", stage);

    state
        .registry
        .burst(&mut state.rng, center, Rgb::hex(0xff9f1c), 40);
    state.registry.projectiles.clear();
    state.sound(AudioCue::BossWin);
    state.emit(GameEvent::BossDefeated { position: center });
    state.show_reward("BOSS DEFEATED!".to_string());

    let mut excluded = state.registry.occupied_tiles();
    excluded.insert(state.player.position);
    let loot = spawn_boss_loot(center, &state.grid, &excluded, &mut state.rng);
    state.registry.collectibles.extend(loot);

    state.deferred.schedule(
        state.config.boss_clear_delay_ticks,
        DeferredAction::CompleteBossStage { stage },
    );
}
