//! # Game Events
//!
//! Everything the simulation reports to the outside world during a tick. Drivers
//! drain these after each frame and forward them to audio, HUD, and persistence.

use crate::audio::AudioCue;
use crate::game::{Position, Vec2};
use crate::persistence::SaveGame;
use serde::{Deserialize, Serialize};

/// Events emitted by the game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Play a sound cue
    Sound(AudioCue),
    /// A reward popup was shown
    Reward { text: String },
    /// A stage finished loading
    StageAnnounced { stage: u32, boss: bool },
    /// Player moved one tile
    PlayerMoved { from: Position, to: Position },
    /// Player lost health
    PlayerDamaged { health: u32 },
    /// Player regained health
    PlayerHealed { health: u32 },
    CollectiblePicked { position: Position },
    ChestOpened { position: Position, coins: u32 },
    ChestReset { position: Position },
    EnemyHit { position: Vec2, hp: u32 },
    EnemyKilled { position: Vec2 },
    BossHit { hp: u32 },
    BossDefeated { position: Vec2 },
    ProjectileFired { position: Vec2 },
    LevelUp { level: u32 },
    /// The countdown reached zero and the timeout penalty was applied
    TimerExpired { health: u32 },
    StageCleared { stage: u32, bonus: u32 },
    GameOver { coins_lost: u32 },
    /// Progress should be persisted now
    Checkpoint(SaveGame),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = GameEvent::StageCleared { stage: 2, bonus: 100 };
        let json = serde_json::to_string(&event).unwrap();
        let back: GameEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(back, event);
    }
}
