//! Integration tests for stage progression: clearing a stage, game over, and the boss fight.

use pixel_quest::{
    CollectibleKind, Difficulty, Direction, GameConfig, GameEvent, GameState, InputFrame,
    Position, StagePhase,
};

fn playing_state(seed: u64) -> GameState {
    let mut state = GameState::with_config(seed, GameConfig::for_testing(), Difficulty::Normal);
    assert!(state.start(), "Fresh game should start from the title");
    state
}

fn run_ticks(state: &mut GameState, ticks: u32) {
    for _ in 0..ticks {
        state.step(&InputFrame::default());
    }
}

fn reward_positions(state: &GameState) -> Vec<Position> {
    state
        .registry
        .collectibles
        .iter()
        .filter(|c| matches!(c.kind, CollectibleKind::Reward { .. }))
        .map(|c| c.position)
        .collect()
}

/// Collecting every item on stage 1 clears it, pays the bonus, and loads stage 2.
#[test]
fn test_collecting_all_items_clears_stage() {
    let mut state = playing_state(1001);
    state.registry.enemies.clear();

    let positions = reward_positions(&state);
    assert_eq!(positions.len(), 5, "Stage 1 should field five rewards");

    let item_coins: u32 = state
        .registry
        .collectibles
        .iter()
        .filter_map(|c| match c.kind {
            CollectibleKind::Reward { value, .. } => Some(value),
            CollectibleKind::Heal { .. } => None,
        })
        .sum();

    for position in positions {
        state.player.position = position;
        state.check_player_tile();
    }

    assert_eq!(state.phase, StagePhase::StageClearing);
    assert_eq!(state.progress.collectibles_got, 5);
    assert_eq!(state.progress.coins, item_coins + 50, "Clear bonus is stage * 50");

    let events = state.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::StageCleared { stage: 1, bonus: 50 })));
    let checkpoint = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::Checkpoint(save) => Some(save.clone()),
            _ => None,
        })
        .last()
        .expect("Stage clear should emit a checkpoint");
    assert_eq!(checkpoint.stage, 2, "Checkpoint resumes on the next stage");

    let ticks = state.config.stage_clear_delay_ticks;
    run_ticks(&mut state, ticks);

    assert_eq!(state.phase, StagePhase::Playing);
    assert_eq!(state.progress.stage, 2);
    assert_eq!(state.progress.collectibles_got, 0);
    assert_eq!(state.progress.collectibles_needed, 7);
    assert_eq!(state.player.position, state.grid.spawn);
}

/// Losing the last heart halves the coins and resets to stage 1 after a pause.
#[test]
fn test_game_over_resets_run() {
    let mut state = playing_state(2002);
    state.load_stage(3);
    state.registry.enemies.clear();
    state.progress.coins = 101;
    state.player.health = 1;

    assert!(state.take_damage());
    assert_eq!(state.phase, StagePhase::GameOverSequence);
    assert_eq!(state.progress.coins, 50);

    // Input is ignored during the sequence.
    assert!(!state.move_player(Direction::East));

    let ticks = state.config.game_over_delay_ticks;
    run_ticks(&mut state, ticks);

    assert_eq!(state.phase, StagePhase::AwaitingStart);
    assert_eq!(state.progress.stage, 1);
    assert_eq!(state.player.health, state.player.max_health);
    assert_eq!(state.progress.coins, 50);

    let saved = state
        .drain_events()
        .into_iter()
        .filter_map(|e| match e {
            GameEvent::Checkpoint(save) => Some(save),
            _ => None,
        })
        .last()
        .expect("Game over should checkpoint the reset run");
    assert_eq!(saved.stage, 1);
    assert_eq!(saved.coins, 50);
    assert_eq!(saved.health, state.player.max_health);
}

/// Twenty hits defeat the boss exactly once and complete the stage.
#[test]
fn test_boss_fight_completes_stage() {
    let mut state = playing_state(3003);
    state.load_stage(5);
    state.drain_events();

    let boss = state.registry.boss.as_ref().expect("Stage 5 is a boss stage");
    assert_eq!(boss.hp, 20);
    let boss_cell = boss.position.rounded();

    state.player.position = boss_cell + Position::new(-1, 0);
    state.player.facing = Direction::East;

    let mut defeats = 0;
    for hit in 0..20 {
        assert!(state.attack(), "Attack {} should not be locked out", hit);
        let ticks = state.config.attack_lockout_ticks;
        run_ticks(&mut state, ticks);
        defeats += state
            .drain_events()
            .iter()
            .filter(|e| matches!(e, GameEvent::BossDefeated { .. }))
            .count();
    }

    assert!(state.registry.boss.is_none());
    assert_eq!(defeats, 1, "The boss must die exactly once");
    assert_eq!(state.statistics.bosses_defeated, 1);
    assert!(state.player.is_alive());
    assert!(state.registry.reward_count() > 0, "The boss drops treasure");

    // The completion delay elapsed during the final lockout.
    assert_eq!(state.phase, StagePhase::StageClearing);
    assert!(!state.attack(), "Swings are ignored while the stage clears");

    let ticks = state.config.stage_clear_delay_ticks;
    run_ticks(&mut state, ticks);
    assert_eq!(state.phase, StagePhase::Playing);
    assert_eq!(state.progress.stage, 6);
    assert!(state.registry.boss.is_none());
    assert_eq!(state.registry.triggers.len(), 4, "The fourth chest unlocks on stage 6");
}

/// Pausing freezes the countdown while particles keep fading.
#[test]
fn test_pause_freezes_countdown() {
    let mut state = playing_state(4004);
    state.registry.enemies.clear();
    let time_left = state.progress.time_left;

    state.set_paused(true);
    run_ticks(&mut state, 600);
    assert_eq!(state.progress.time_left, time_left);

    state.set_paused(false);
    run_ticks(&mut state, 60);
    assert_eq!(state.progress.time_left, time_left - 1);
}

/// Harder difficulty shortens the timer; easier lengthens it.
#[test]
fn test_difficulty_changes_timer() {
    let easy = GameState::with_config(1, GameConfig::default(), Difficulty::Easy);
    let hard = GameState::with_config(1, GameConfig::default(), Difficulty::Hard);
    assert_eq!(easy.progress.time_left, 90);
    assert_eq!(hard.progress.time_left, 45);
}
