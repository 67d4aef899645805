//! # Player Control
//!
//! Turns input frames into grid steps and resolves whatever the player walks onto.

use crate::audio::AudioCue;
use crate::game::{combat, CollectibleKind, DeferredAction, Direction, GameEvent, GameState, Rgb, Trigger};
use crate::input::InputFrame;

/// Applies one tick of input: a fresh press steps at once, a held direction steps
/// every `move_repeat_ticks`, and the attack edge starts a swing.
pub fn handle_input(state: &mut GameState, input: &InputFrame) {
    if let Some(direction) = input.pressed {
        state.player.move_repeat = 0;
        try_move(state, direction);
    } else if let Some(direction) = input.held {
        state.player.move_repeat += 1;
        if state.player.move_repeat >= state.config.move_repeat_ticks {
            state.player.move_repeat = 0;
            try_move(state, direction);
        }
    } else {
        state.player.move_repeat = 0;
    }

    if input.attack {
        combat::attack(state);
    }
}

/// Turns the player and steps one tile if the target is walkable.
///
/// Facing changes even when the step is blocked, so the player can aim at a wall.
pub fn try_move(state: &mut GameState, direction: Direction) -> bool {
    if !state.is_active() {
        return false;
    }
    state.player.facing = direction;

    let from = state.player.position;
    let to = from + direction.to_delta();
    if !state.grid.is_walkable(to) {
        return false;
    }

    state.player.position = to;
    state.emit(GameEvent::PlayerMoved { from, to });
    state.sound(AudioCue::Move);

    check_pickups(state);
    check_triggers(state);
    true
}

/// Picks up the collectible under the player, if any.
pub fn check_pickups(state: &mut GameState) {
    let position = state.player.position;
    let Some(collectible) = state.registry.take_collectible_at(position) else {
        return;
    };
    let center = position.to_vec2();

    match collectible.kind {
        CollectibleKind::Reward { item, value, xp } => {
            state
                .registry
                .burst(&mut state.rng, center, item.color(), 8);
            state.sound(AudioCue::Pickup);
            state.emit(GameEvent::CollectiblePicked { position });
            state.show_reward(format!("+{} coins  +{} XP", value, xp));

            if !crate::game::is_boss_stage(state.progress.stage) {
                state.progress.collectibles_got =
                    (state.progress.collectibles_got + 1).min(state.progress.collectibles_needed);
            }
            state.award(value, xp);
            state.check_stage_clear();
            state.schedule_respawn_if_empty();
        }
        CollectibleKind::Heal { amount } => {
            state.player.heal(amount);
            let health = state.player.health;
            state
                .registry
                .burst(&mut state.rng, center, Rgb::hex(0xff6b9d), 8);
            state.sound(AudioCue::Heal);
            state.emit(GameEvent::CollectiblePicked { position });
            state.emit(GameEvent::PlayerHealed { health });
            state.show_reward("+1 heart".to_string());
        }
    }
}

/// Opens the closed chest under the player, if any.
pub fn check_triggers(state: &mut GameState) {
    let position = state.player.position;
    let Some(chest) = state
        .registry
        .trigger_at(position)
        .filter(|t| !t.opened)
        .map(|t| t.id)
    else {
        return;
    };
    if let Some(trigger) = state.registry.trigger_mut(chest) {
        trigger.opened = true;
    }

    let coins = Trigger::coin_reward(state.progress.level);
    let xp = Trigger::XP_REWARD;
    log::debug!("Chest at {:?} opened for {} coins", position, coins);

    state
        .registry
        .burst(&mut state.rng, position.to_vec2(), Rgb::hex(0xff6b9d), 12);
    state.sound(AudioCue::ChestOpen);
    state.emit(GameEvent::ChestOpened { position, coins });
    state.show_reward(format!("CHEST! +{} coins  +{} XP", coins, xp));
    state.award(coins, xp);

    if let Some(ticks) = state.config.chest_reset_ticks {
        state
            .deferred
            .schedule(ticks, DeferredAction::ResetChest { chest });
    }
}

/// Per-tick player upkeep.
pub fn update_player(state: &mut GameState) {
    state.player.invincibility_ticks = state.player.invincibility_ticks.saturating_sub(1);
}
