//! # Audio Cues
//!
//! Named sound cues emitted by the simulation and the sinks that consume them.
//! Playback is fire-and-forget: sinks never report failure back to the game.

use serde::{Deserialize, Serialize};

/// Sound effects the simulation can request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    Move,
    Pickup,
    ChestOpen,
    Hit,
    EnemyDeath,
    BossWin,
    Heal,
    Attack,
}

impl AudioCue {
    /// Asset-style name of the cue.
    pub fn name(self) -> &'static str {
        match self {
            AudioCue::Move => "move",
            AudioCue::Pickup => "pickup",
            AudioCue::ChestOpen => "chest_open",
            AudioCue::Hit => "hit",
            AudioCue::EnemyDeath => "enemy_death",
            AudioCue::BossWin => "boss_win",
            AudioCue::Heal => "heal",
            AudioCue::Attack => "attack",
        }
    }
}

/// Destination for audio cues.
pub trait AudioSink {
    /// Plays a cue. Implementations swallow device errors.
    fn play(&mut self, cue: AudioCue);
}

/// Discards every cue. Used when no audio device is available.
#[derive(Debug, Default)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, _cue: AudioCue) {}
}

/// Writes cues to the debug log and counts them.
#[derive(Debug, Default)]
pub struct LogAudio {
    pub played: u64,
}

impl AudioSink for LogAudio {
    fn play(&mut self, cue: AudioCue) {
        self.played += 1;
        log::debug!("audio cue: {}", cue.name());
    }
}
