//! # Scene Management System
//!
//! Connects the simulation to its outer surfaces. [`GameSession`] handles menu
//! commands and forwards drained events to the audio sink and the persistence store;
//! [`SceneManager`] adds the macroquad keyboard, display, and frame loop on top.

use crate::audio::AudioSink;
use crate::game::{Difficulty, GameEvent, GameState, StagePhase};
use crate::input::{KeyboardInput, MenuCommand};
use crate::persistence::{
    clear_save, load_save, load_settings, save_settings, write_save, KeyValueStore, Settings,
};
use crate::rendering::MacroquadDisplay;
use crate::{GameConfig, PixelQuestResult};
use macroquad::prelude::*;

/// Game state plus the sinks its events flow into.
pub struct GameSession {
    pub game_state: GameState,
    pub settings: Settings,
    config: GameConfig,
    store: Box<dyn KeyValueStore>,
    audio: Box<dyn AudioSink>,
}

impl GameSession {
    /// Opens a session, restoring the save from `store` unless `fresh` is set.
    pub fn open(
        seed: u64,
        config: GameConfig,
        store: Box<dyn KeyValueStore>,
        audio: Box<dyn AudioSink>,
        fresh: bool,
    ) -> Self {
        let settings = load_settings(store.as_ref());
        let save = if fresh { None } else { load_save(store.as_ref()) };
        let game_state = match save {
            Some(save) => GameState::from_save(seed, config.clone(), &settings, &save),
            None => {
                log::info!("Starting a new game with seed {}", seed);
                GameState::with_config(seed, config.clone(), settings.difficulty)
            }
        };
        Self {
            game_state,
            settings,
            config,
            store,
            audio,
        }
    }

    /// Overrides the stored difficulty and persists the change.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.settings.difficulty = difficulty;
        self.game_state.set_difficulty(difficulty);
        if let Err(err) = save_settings(self.store.as_mut(), &self.settings) {
            log::warn!("Could not save settings: {}", err);
        }
    }

    /// Applies a menu command. Returns true when the player asked to quit.
    pub fn handle_command(&mut self, command: MenuCommand) -> bool {
        let phase = self.game_state.phase;
        match command {
            MenuCommand::Start => {
                if phase == StagePhase::AwaitingStart {
                    self.game_state.start();
                } else {
                    self.game_state.set_paused(false);
                }
            }
            MenuCommand::TogglePause => {
                if phase != StagePhase::AwaitingStart {
                    let paused = self.game_state.paused;
                    self.game_state.set_paused(!paused);
                }
            }
            MenuCommand::CycleDifficulty => {
                if phase == StagePhase::AwaitingStart {
                    let next = match self.settings.difficulty {
                        Difficulty::Easy => Difficulty::Normal,
                        Difficulty::Normal => Difficulty::Hard,
                        Difficulty::Hard => Difficulty::Easy,
                    };
                    self.set_difficulty(next);
                    let stage = self.game_state.progress.stage;
                    self.game_state.load_stage(stage);
                }
            }
            MenuCommand::NewGame => {
                if phase == StagePhase::AwaitingStart || self.game_state.paused {
                    self.new_game();
                }
            }
            MenuCommand::Quit => {
                self.persist_progress();
                return true;
            }
        }
        false
    }

    /// Discards the save and starts over from stage one.
    pub fn new_game(&mut self) {
        if let Err(err) = clear_save(self.store.as_mut()) {
            log::warn!("Could not clear save: {}", err);
        }
        let seed = self.game_state.rng_seed.wrapping_add(1);
        log::info!("New game with seed {}", seed);
        self.game_state =
            GameState::with_config(seed, self.config.clone(), self.settings.difficulty);
    }

    /// Forwards pending events: sounds to the audio sink, checkpoints to the store.
    pub fn dispatch_events(&mut self) {
        for event in self.game_state.drain_events() {
            match event {
                GameEvent::Sound(cue) => self.audio.play(cue),
                GameEvent::Checkpoint(save) => {
                    if let Err(err) = write_save(self.store.as_mut(), &save) {
                        log::warn!("Checkpoint not saved: {}", err);
                    }
                }
                other => log::trace!("{:?}", other),
            }
        }
    }

    /// Writes the current progress, e.g. on quit.
    pub fn persist_progress(&mut self) {
        let save = self.game_state.save_game();
        if let Err(err) = write_save(self.store.as_mut(), &save) {
            log::warn!("Could not save progress: {}", err);
        }
    }

    /// Read access to the backing store.
    pub fn store(&self) -> &dyn KeyValueStore {
        self.store.as_ref()
    }
}

/// The main scene manager that owns the frame loop.
pub struct SceneManager {
    session: GameSession,
    display: MacroquadDisplay,
    keyboard: KeyboardInput,
}

impl SceneManager {
    /// Creates a scene manager. Must be called inside the macroquad context.
    pub fn new(session: GameSession) -> Self {
        Self {
            session,
            display: MacroquadDisplay::new(),
            keyboard: KeyboardInput::new(),
        }
    }

    /// Runs the frame loop until the player quits.
    pub async fn run(&mut self) -> PixelQuestResult<()> {
        loop {
            if let Some(command) = self.keyboard.menu_command() {
                if self.session.handle_command(command) {
                    break;
                }
            }

            let input = self.keyboard.poll();
            self.session.game_state.advance(get_frame_time(), &input);
            self.session.dispatch_events();

            self.display.hud.difficulty = self.session.settings.difficulty;
            self.display.render(&self.session.game_state.snapshot());

            next_frame().await;
        }
        log::info!("Scene loop ended");
        Ok(())
    }
}
