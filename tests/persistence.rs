//! Persistence tests against a real directory: corrupt blobs, checkpoints, and settings.

use pixel_quest::{
    load_save, load_settings, ControlPosition, FileStore, GameConfig, GameSession,
    KeyValueStore, LogAudio, PixelQuestResult, Settings, SAVE_KEY, SETTINGS_KEY,
};
use std::fs;

fn open_session(store: FileStore) -> GameSession {
    GameSession::open(
        11,
        GameConfig::for_testing(),
        Box::new(store),
        Box::new(LogAudio::default()),
        false,
    )
}

/// Garbage on disk is ignored and the game starts fresh.
#[test]
fn test_corrupt_files_fall_back_to_defaults() -> PixelQuestResult<()> {
    let dir = tempfile::tempdir()?;
    fs::write(dir.path().join("settings.json"), "{ definitely not json")?;
    fs::write(dir.path().join("save.json"), "\"not a save\"")?;

    let store = FileStore::open(dir.path())?;
    assert_eq!(load_settings(&store), Settings::default());
    assert!(load_save(&store).is_none());

    let session = open_session(store);
    assert_eq!(session.game_state.progress.stage, 1);
    assert_eq!(session.game_state.progress.coins, 0);
    Ok(())
}

/// Out-of-range values written by hand are repaired on load.
#[test]
fn test_out_of_range_values_are_repaired() -> PixelQuestResult<()> {
    let dir = tempfile::tempdir()?;
    fs::write(
        dir.path().join("settings.json"),
        r#"{ "control_size": 9.0, "control_position": "left", "control_offset": -900.0 }"#,
    )?;
    fs::write(
        dir.path().join("save.json"),
        r#"{ "coins": 5, "xp": 130, "level": 0, "xp_to_next": 50, "stage": 0, "health": 42 }"#,
    )?;

    let store = FileStore::open(dir.path())?;
    let settings = load_settings(&store);
    assert_eq!(settings.control_size, 2.0);
    assert_eq!(settings.control_position, ControlPosition::Left);
    assert_eq!(settings.control_offset, -200.0);

    let session = open_session(store);
    let state = &session.game_state;
    assert_eq!(state.progress.stage, 1);
    assert_eq!(state.player.health, state.player.max_health);
    // 130 xp from level 1: 50 to reach 2, 75 to reach 3, 5 left over
    assert_eq!(state.progress.level, 3);
    assert_eq!(state.progress.xp, 5);
    Ok(())
}

/// A stage clear lands on disk as soon as events are dispatched.
#[test]
fn test_stage_clear_checkpoint_reaches_disk() -> PixelQuestResult<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open_session(FileStore::open(dir.path())?);
    session.game_state.start();
    session.game_state.registry.enemies.clear();

    let positions: Vec<_> = session
        .game_state
        .registry
        .collectibles
        .iter()
        .map(|c| c.position)
        .collect();
    for position in positions {
        session.game_state.player.position = position;
        session.game_state.check_player_tile();
    }
    session.dispatch_events();

    let reopened = FileStore::open(dir.path())?;
    let save = load_save(&reopened).expect("Checkpoint should be on disk");
    assert_eq!(save.stage, 2);
    assert_eq!(save.coins, session.game_state.progress.coins);
    Ok(())
}

/// Both blobs live under their fixed keys as JSON documents.
#[test]
fn test_blobs_use_fixed_keys() -> PixelQuestResult<()> {
    let dir = tempfile::tempdir()?;
    let mut session = open_session(FileStore::open(dir.path())?);
    session.set_difficulty(pixel_quest::Difficulty::Hard);
    session.persist_progress();

    let settings: serde_json::Value = serde_json::from_str(
        &session
            .store()
            .get(SETTINGS_KEY)?
            .expect("Settings blob should exist"),
    )?;
    assert_eq!(settings["difficulty"], "hard");

    let save: serde_json::Value =
        serde_json::from_str(&session.store().get(SAVE_KEY)?.expect("Save blob should exist"))?;
    assert_eq!(save["stage"], 1);
    assert_eq!(save["level"], 1);
    Ok(())
}
