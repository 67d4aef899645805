//! # Persistence Module
//!
//! Key-value persistence for the settings and save blobs.
//!
//! Both blobs are JSON documents stored under fixed keys. Loading is best-effort: a
//! missing key yields the defaults, a malformed blob is logged and replaced by the
//! defaults, and out-of-range fields are clamped. Write failures are returned to the
//! caller, which logs them and carries on.

pub mod save;
pub mod store;

pub use save::*;
pub use store::*;

use crate::PixelQuestResult;

/// Key of the settings blob.
pub const SETTINGS_KEY: &str = "settings";

/// Key of the save blob.
pub const SAVE_KEY: &str = "save";

/// Minimal string key-value store.
pub trait KeyValueStore {
    /// Reads a value. `Ok(None)` means the key was never written.
    fn get(&self, key: &str) -> PixelQuestResult<Option<String>>;

    /// Writes a value, replacing any previous one.
    fn set(&mut self, key: &str, value: &str) -> PixelQuestResult<()>;

    /// Deletes a value. Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> PixelQuestResult<()>;
}

/// Loads settings, falling back to defaults on any problem.
pub fn load_settings(store: &dyn KeyValueStore) -> Settings {
    match read_blob::<Settings>(store, SETTINGS_KEY) {
        Some(settings) => settings.sanitized(),
        None => Settings::default(),
    }
}

/// Persists settings.
pub fn save_settings(store: &mut dyn KeyValueStore, settings: &Settings) -> PixelQuestResult<()> {
    let json = serde_json::to_string(settings)?;
    store.set(SETTINGS_KEY, &json)
}

/// Loads the save game if one exists and parses.
///
/// Fields are not clamped here; [`SaveGame::sanitized`] needs the configured max health.
pub fn load_save(store: &dyn KeyValueStore) -> Option<SaveGame> {
    read_blob(store, SAVE_KEY)
}

/// Persists a save game.
pub fn write_save(store: &mut dyn KeyValueStore, save: &SaveGame) -> PixelQuestResult<()> {
    let json = serde_json::to_string(save)?;
    store.set(SAVE_KEY, &json)?;
    log::debug!("Saved game at stage {}", save.stage);
    Ok(())
}

/// Deletes the save game, e.g. for a fresh start.
pub fn clear_save(store: &mut dyn KeyValueStore) -> PixelQuestResult<()> {
    store.remove(SAVE_KEY)
}

fn read_blob<T: serde::de::DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(err) => {
            log::warn!("Could not read '{}': {}", key, err);
            return None;
        }
    };
    let parsed = serde_json::from_str::<serde_json::Value>(&raw).and_then(|value| {
        if value.is_object() {
            serde_json::from_value(value)
        } else {
            Err(serde::de::Error::custom("expected a JSON object"))
        }
    });
    match parsed {
        Ok(value) => Some(value),
        Err(err) => {
            log::warn!("Discarding malformed '{}' blob: {}", key, err);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Difficulty;

    #[test]
    fn test_missing_blobs_use_defaults() {
        let store = MemoryStore::new();
        assert_eq!(load_settings(&store), Settings::default());
        assert!(load_save(&store).is_none());
    }

    #[test]
    fn test_malformed_blobs_are_discarded() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, "{ broken").unwrap();
        store.set(SAVE_KEY, "[1, 2, 3]").unwrap();
        assert_eq!(load_settings(&store), Settings::default());
        assert!(load_save(&store).is_none());

        for blob in ["\"text\"", "42", "null", "[]"] {
            store.set(SAVE_KEY, blob).unwrap();
            assert!(load_save(&store).is_none(), "{} should be discarded", blob);
        }
        store.set(SAVE_KEY, r#"{ "coins": 4 }"#).unwrap();
        assert_eq!(load_save(&store).map(|s| s.coins), Some(4));
    }

    #[test]
    fn test_settings_round_trip_through_store() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            difficulty: Difficulty::Hard,
            control_size: 1.5,
            ..Settings::default()
        };
        save_settings(&mut store, &settings).unwrap();
        assert_eq!(load_settings(&store), settings);
    }

    #[test]
    fn test_partial_settings_fill_defaults() {
        let mut store = MemoryStore::new();
        store.set(SETTINGS_KEY, r#"{ "difficulty": "easy" }"#).unwrap();
        let settings = load_settings(&store);
        assert_eq!(settings.difficulty, Difficulty::Easy);
        assert_eq!(settings.control_size, Settings::default().control_size);
    }

    #[test]
    fn test_clear_save() {
        let mut store = MemoryStore::new();
        write_save(&mut store, &SaveGame::default()).unwrap();
        assert!(load_save(&store).is_some());
        clear_save(&mut store).unwrap();
        assert!(load_save(&store).is_none());
    }
}
