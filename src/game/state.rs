//! # Game State Module
//!
//! Central game state and the stage director that drives it.
//!
//! [`GameState`] owns the grid, the player, the entity registry, progress counters and
//! the deferred-action queue. The director half of this module runs the phase machine
//! `AwaitingStart → Playing → (StageClearing | GameOverSequence) → Playing`, loads
//! stages, runs the countdown, and emits checkpoints for persistence.

use crate::config::{MAX_STEPS_PER_FRAME, TICKS_PER_SECOND};
use crate::game::{
    ai, collectibles_needed, combat, is_boss_stage, player, stage_timer_seconds, DeferredAction,
    DeferredQueue, Difficulty, DifficultyProfile, Direction, EntityRegistry, GameEvent,
    GameStatistics, Grid, Palette, Player, Progress, Rgb,
};
use crate::generation::{
    spawn_boss, spawn_collectibles, spawn_enemies, spawn_hearts, spawn_triggers, stage_grid,
};
use crate::input::InputFrame;
use crate::audio::AudioCue;
use crate::persistence::{SaveGame, Settings};
use crate::GameConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

/// Ticks between a collection goal running dry and a refill appearing.
const RESPAWN_DELAY_TICKS: u32 = 60;

/// Phases of the stage director.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StagePhase {
    /// Stage loaded, waiting for the player to start or resume
    AwaitingStart,
    /// Normal gameplay
    Playing,
    /// Goal reached; the next stage loads after a pause
    StageClearing,
    /// Player died; the run resets after a pause
    GameOverSequence,
}

/// Central game state containing all game data and systems.
#[derive(Debug, Clone)]
pub struct GameState {
    /// Gameplay tunables
    pub config: GameConfig,
    /// Selected difficulty
    pub difficulty: Difficulty,
    /// Multipliers derived from the difficulty
    pub profile: DifficultyProfile,
    /// Grid of the current stage
    pub grid: Grid,
    /// Color scheme of the current stage
    pub palette: Palette,
    pub player: Player,
    /// Every non-player entity of the current stage
    pub registry: EntityRegistry,
    pub progress: Progress,
    /// Game statistics for player progress
    pub statistics: GameStatistics,
    /// Current director phase
    pub phase: StagePhase,
    /// Overlay pause flag; gameplay is frozen while set
    pub paused: bool,
    /// Pending delayed effects
    pub deferred: DeferredQueue,
    /// Reward popup text currently shown
    pub popup: Option<String>,
    /// Stage announcement currently shown
    pub announcement: Option<String>,
    /// Simulation ticks since creation
    pub tick: u64,
    /// Random number generator seed
    pub rng_seed: u64,
    /// Random source for spawning and AI
    pub rng: StdRng,
    second_ticks: u32,
    accumulator: f32,
    popup_serial: u64,
    announcement_serial: u64,
    pending_input: InputFrame,
    events: Vec<GameEvent>,
}

impl GameState {
    /// Creates a new game on stage one with default configuration.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::{GameState, StagePhase};
    ///
    /// let game_state = GameState::new(12345);
    /// assert_eq!(game_state.progress.stage, 1);
    /// assert_eq!(game_state.phase, StagePhase::AwaitingStart);
    /// ```
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, GameConfig::default(), Difficulty::default())
    }

    /// Creates a new game with explicit configuration and difficulty.
    pub fn with_config(seed: u64, config: GameConfig, difficulty: Difficulty) -> Self {
        let mut state = Self::blank(seed, config, difficulty);
        state.load_stage(1);
        state
    }

    /// Restores a game from persisted settings and progress.
    pub fn from_save(seed: u64, config: GameConfig, settings: &Settings, save: &SaveGame) -> Self {
        let mut state = Self::blank(seed, config, settings.difficulty);
        let save = save.clone().sanitized(state.player.max_health);
        state.progress.coins = save.coins;
        state.progress.xp = save.xp;
        state.progress.level = save.level;
        state.progress.xp_to_next = save.xp_to_next;
        state.progress.normalize_levels();
        state.player.health = save.health;
        state.load_stage(save.stage);
        log::info!(
            "Restored save: stage {}, level {}, {} coins",
            save.stage,
            save.level,
            save.coins
        );
        state
    }

    fn blank(seed: u64, config: GameConfig, difficulty: Difficulty) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let grid = stage_grid(1, &mut rng);
        let player = Player::new(grid.spawn, config.max_health.max(1));
        Self {
            profile: difficulty.profile(),
            difficulty,
            palette: Palette::for_stage(1),
            player,
            grid,
            registry: EntityRegistry::new(),
            progress: Progress::new(),
            statistics: GameStatistics::new(),
            phase: StagePhase::AwaitingStart,
            paused: false,
            deferred: DeferredQueue::new(),
            popup: None,
            announcement: None,
            tick: 0,
            rng_seed: seed,
            rng,
            second_ticks: 0,
            accumulator: 0.0,
            popup_serial: 0,
            announcement_serial: 0,
            pending_input: InputFrame::default(),
            events: Vec::new(),
            config,
        }
    }

    /// Whether gameplay systems run this tick.
    pub fn is_active(&self) -> bool {
        self.phase == StagePhase::Playing && !self.paused
    }

    /// Leaves `AwaitingStart`. Returns false in any other phase.
    pub fn start(&mut self) -> bool {
        if self.phase != StagePhase::AwaitingStart {
            return false;
        }
        self.phase = StagePhase::Playing;
        log::info!("Stage {} started", self.progress.stage);
        true
    }

    /// Sets the pause overlay flag.
    pub fn set_paused(&mut self, paused: bool) {
        if self.paused != paused {
            log::debug!("Paused: {}", paused);
        }
        self.paused = paused;
    }

    /// Changes difficulty; the timer multiplier applies from the next stage.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.difficulty = difficulty;
        self.profile = difficulty.profile();
    }

    /// Loads a stage: grid, spawn, goals, timer, and a fresh entity set.
    ///
    /// Chests persist across loads. The phase is left unchanged.
    pub fn load_stage(&mut self, stage: u32) {
        let stage = stage.max(1);
        let boss_stage = is_boss_stage(stage);

        self.grid = stage_grid(stage, &mut self.rng);
        self.palette = Palette::for_stage(stage);

        self.player.position = self.grid.spawn;
        self.player.facing = Direction::South;
        self.player.attacking = false;
        self.player.invincibility_ticks = 0;
        self.player.move_repeat = 0;

        self.progress.stage = stage;
        self.progress.collectibles_needed = collectibles_needed(stage);
        self.progress.collectibles_got = 0;
        self.progress.time_left = stage_timer_seconds(stage, &self.profile);
        self.second_ticks = 0;

        self.registry.clear_stage();
        self.deferred.cancel_where(|action| {
            matches!(
                action,
                DeferredAction::ReleaseAttack
                    | DeferredAction::RespawnCollectibles { .. }
                    | DeferredAction::CompleteBossStage { .. }
            )
        });

        spawn_triggers(stage, &mut self.registry.triggers);
        let attempts = self.config.spawn_attempts;
        let spawn = self.grid.spawn;

        if !boss_stage {
            let excluded = self.registry.occupied_tiles();
            let items = spawn_collectibles(
                self.progress.collectibles_needed,
                &self.grid,
                spawn,
                &excluded,
                attempts,
                &mut self.rng,
            );
            self.registry.collectibles.extend(items);
        }

        let excluded = self.registry.occupied_tiles();
        let hearts = spawn_hearts(stage, &self.grid, spawn, &excluded, attempts, &mut self.rng);
        self.registry.collectibles.extend(hearts);

        if boss_stage {
            self.registry.enemies.clear();
            self.registry.boss = Some(spawn_boss(&self.grid));
        } else {
            let interval = self.profile.enemy_interval(ai::ENEMY_MOVE_TICKS);
            self.registry.enemies =
                spawn_enemies(stage, &self.grid, spawn, interval, attempts, &mut self.rng);
        }

        let text = if boss_stage {
            format!("Stage {} - BOSS!", stage)
        } else {
            format!("Stage {}", stage)
        };
        self.announcement = Some(text);
        self.announcement_serial += 1;
        self.deferred.schedule(
            self.config.announcement_ticks,
            DeferredAction::DismissAnnouncement {
                serial: self.announcement_serial,
            },
        );
        self.emit(GameEvent::StageAnnounced {
            stage,
            boss: boss_stage,
        });

        log::info!(
            "Loaded stage {} ({}x{}, {} collectibles, {} slimes, boss: {}, {}s)",
            stage,
            self.grid.width,
            self.grid.height,
            self.registry.collectibles.len(),
            self.registry.enemies.len(),
            boss_stage,
            self.progress.time_left
        );
    }

    /// Folds a frame's wall-clock delta into fixed simulation ticks.
    ///
    /// Edge-triggered input is delivered on the first tick that runs; if the frame
    /// was too short to run any tick it is kept for the next frame. Returns the
    /// number of ticks run.
    pub fn advance(&mut self, dt: f32, input: &InputFrame) -> u32 {
        let step_len = 1.0 / TICKS_PER_SECOND as f32;
        let max_backlog = step_len * MAX_STEPS_PER_FRAME as f32;
        self.accumulator = (self.accumulator + dt.max(0.0)).min(max_backlog);
        self.pending_input.absorb_edges(input);

        let mut steps = 0;
        while steps < MAX_STEPS_PER_FRAME && self.accumulator + f32::EPSILON >= step_len {
            self.accumulator = (self.accumulator - step_len).max(0.0);
            let frame = InputFrame {
                held: input.held,
                ..self.pending_input.take_edges()
            };
            self.step(&frame);
            steps += 1;
        }
        steps
    }

    /// Runs one simulation tick.
    pub fn step(&mut self, input: &InputFrame) {
        self.tick += 1;

        for action in self.deferred.tick() {
            self.run_deferred(action);
        }

        if self.is_active() {
            player::handle_input(self, input);
            self.tick_timer();
            ai::update_enemies(self);
            ai::update_boss(self);
            ai::update_projectiles(self);
            player::update_player(self);
        }

        self.registry.update_particles();
    }

    /// Moves the player one tile if the target is walkable.
    pub fn move_player(&mut self, direction: Direction) -> bool {
        player::try_move(self, direction)
    }

    /// Starts a melee attack toward the facing cell.
    pub fn attack(&mut self) -> bool {
        combat::attack(self)
    }

    /// Applies one point of damage to the player, respecting invincibility.
    pub fn take_damage(&mut self) -> bool {
        combat::take_damage(self)
    }

    /// Resolves pickups and chests on the player's tile.
    pub fn check_player_tile(&mut self) {
        player::check_pickups(self);
        player::check_triggers(self);
    }

    /// Removes and returns all events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events emitted since the last drain.
    pub fn pending_events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Records an event for the driver and updates statistics.
    pub fn emit(&mut self, event: GameEvent) {
        self.statistics.update_from_event(&event);
        self.events.push(event);
    }

    pub(crate) fn sound(&mut self, cue: AudioCue) {
        self.emit(GameEvent::Sound(cue));
    }

    /// Shows a reward popup that dismisses itself after a short delay.
    pub fn show_reward(&mut self, text: String) {
        self.popup_serial += 1;
        self.popup = Some(text.clone());
        self.deferred.schedule(
            self.config.popup_ticks,
            DeferredAction::DismissPopup {
                serial: self.popup_serial,
            },
        );
        self.emit(GameEvent::Reward { text });
    }

    /// Adds coins and xp, resolving any level-ups.
    pub fn award(&mut self, coins: u32, xp: u32) {
        self.progress.coins = self.progress.coins.saturating_add(coins);
        let levels = self.progress.apply_xp(xp);
        for &level in &levels {
            log::info!("Level up! Now level {}", level);
            let center = self.player.position.to_vec2();
            self.registry
                .burst(&mut self.rng, center, Rgb::hex(0xc44cff), 20);
            self.show_reward(format!("LEVEL UP! Lv.{}", level));
            self.emit(GameEvent::LevelUp { level });
        }
        if !levels.is_empty() {
            self.checkpoint();
        }
    }

    /// Snapshot of the persistent progress.
    pub fn save_game(&self) -> SaveGame {
        let stage = match self.phase {
            StagePhase::StageClearing => self.progress.stage.saturating_add(1),
            _ => self.progress.stage,
        };
        SaveGame {
            coins: self.progress.coins,
            xp: self.progress.xp,
            level: self.progress.level,
            xp_to_next: self.progress.xp_to_next,
            stage,
            health: self.player.health.max(1),
        }
    }

    /// Emits a checkpoint carrying the current save.
    pub fn checkpoint(&mut self) {
        let save = self.save_game();
        log::debug!("Checkpoint: {:?}", save);
        self.emit(GameEvent::Checkpoint(save));
    }

    /// Fires the win transition if the collection goal is met on a regular stage.
    pub fn check_stage_clear(&mut self) {
        if self.phase != StagePhase::Playing || is_boss_stage(self.progress.stage) {
            return;
        }
        if self.progress.collectibles_got >= self.progress.collectibles_needed {
            self.clear_stage();
        }
    }

    /// Enters `StageClearing`: pays the bonus, checkpoints, and schedules the next stage.
    pub fn clear_stage(&mut self) {
        if self.phase != StagePhase::Playing {
            return;
        }
        let stage = self.progress.stage;
        let bonus = stage.saturating_mul(50);
        self.phase = StagePhase::StageClearing;
        self.player.attacking = false;
        self.progress.coins = self.progress.coins.saturating_add(bonus);
        log::info!("Stage {} cleared, bonus {}", stage, bonus);

        self.show_reward(format!("STAGE CLEAR! +{} coins", bonus));
        self.emit(GameEvent::StageCleared { stage, bonus });
        self.checkpoint();
        self.deferred.schedule(
            self.config.stage_clear_delay_ticks,
            DeferredAction::AdvanceStage {
                stage: stage.saturating_add(1),
            },
        );
    }

    /// Enters `GameOverSequence`: halves the coins and schedules the reset.
    pub fn begin_game_over(&mut self) {
        if matches!(
            self.phase,
            StagePhase::GameOverSequence | StagePhase::AwaitingStart
        ) {
            return;
        }
        self.phase = StagePhase::GameOverSequence;
        self.player.attacking = false;
        let coins_lost = self.progress.coins - self.progress.coins / 2;
        self.progress.coins /= 2;
        log::info!(
            "Game over on stage {}, lost {} coins",
            self.progress.stage,
            coins_lost
        );

        self.deferred.cancel_where(|action| {
            matches!(
                action,
                DeferredAction::AdvanceStage { .. }
                    | DeferredAction::CompleteBossStage { .. }
                    | DeferredAction::RespawnCollectibles { .. }
            )
        });
        self.show_reward("GAME OVER".to_string());
        self.emit(GameEvent::GameOver { coins_lost });
        self.deferred
            .schedule(self.config.game_over_delay_ticks, DeferredAction::FinishGameOver);
    }

    fn finish_game_over(&mut self) {
        if self.phase != StagePhase::GameOverSequence {
            return;
        }
        self.player.health = self.player.max_health;
        self.load_stage(1);
        self.phase = StagePhase::AwaitingStart;
        self.checkpoint();
    }

    fn run_deferred(&mut self, action: DeferredAction) {
        match action {
            DeferredAction::DismissPopup { serial } => {
                if serial == self.popup_serial {
                    self.popup = None;
                }
            }
            DeferredAction::DismissAnnouncement { serial } => {
                if serial == self.announcement_serial {
                    self.announcement = None;
                }
            }
            DeferredAction::ReleaseAttack => {
                self.player.attacking = false;
            }
            DeferredAction::ResetChest { chest } => {
                let reset = match self.registry.trigger_mut(chest) {
                    Some(trigger) if trigger.opened => {
                        trigger.opened = false;
                        Some(trigger.position)
                    }
                    _ => None,
                };
                if let Some(position) = reset {
                    self.emit(GameEvent::ChestReset { position });
                }
            }
            DeferredAction::RespawnCollectibles { stage } => {
                self.respawn_collectibles(stage);
            }
            DeferredAction::CompleteBossStage { stage } => {
                if self.progress.stage == stage && self.registry.boss.is_none() {
                    self.clear_stage();
                }
            }
            DeferredAction::AdvanceStage { stage } => {
                if self.phase == StagePhase::StageClearing {
                    self.load_stage(stage);
                    self.phase = StagePhase::Playing;
                }
            }
            DeferredAction::FinishGameOver => self.finish_game_over(),
        }
    }

    /// Schedules a refill when the floor runs out of rewards before the goal is met.
    pub(crate) fn schedule_respawn_if_empty(&mut self) {
        let stage = self.progress.stage;
        let action = DeferredAction::RespawnCollectibles { stage };
        let short = self.progress.collectibles_got < self.progress.collectibles_needed;
        if self.phase == StagePhase::Playing
            && !is_boss_stage(stage)
            && short
            && self.registry.reward_count() == 0
            && !self.deferred.contains(&action)
        {
            self.deferred.schedule(RESPAWN_DELAY_TICKS, action);
        }
    }

    fn respawn_collectibles(&mut self, stage: u32) {
        if self.phase != StagePhase::Playing || self.progress.stage != stage {
            return;
        }
        let missing = self
            .progress
            .collectibles_needed
            .saturating_sub(self.progress.collectibles_got);
        if missing == 0 || self.registry.reward_count() > 0 {
            return;
        }
        let mut excluded = self.registry.occupied_tiles();
        excluded.extend(self.registry.enemies.iter().map(|e| e.cell()));
        let items = spawn_collectibles(
            missing,
            &self.grid,
            self.player.position,
            &excluded,
            self.config.spawn_attempts,
            &mut self.rng,
        );
        log::debug!("Respawned {} collectibles on stage {}", items.len(), stage);
        self.registry.collectibles.extend(items);
        self.schedule_respawn_if_empty();
    }

    /// Counts one second of wall-clock time every `TICKS_PER_SECOND` ticks.
    ///
    /// When the countdown expires the player loses a heart (invincibility does not
    /// protect against this) and the timer restarts with a short mercy window.
    fn tick_timer(&mut self) {
        self.second_ticks += 1;
        if self.second_ticks < TICKS_PER_SECOND {
            return;
        }
        self.second_ticks = 0;
        self.progress.time_left = self.progress.time_left.saturating_sub(1);
        if self.progress.time_left > 0 {
            return;
        }

        self.player.health = self.player.health.saturating_sub(1);
        self.player.invincibility_ticks = self.config.invincibility_ticks;
        let health = self.player.health;
        log::info!("Time up on stage {}, health {}", self.progress.stage, health);
        let center = self.player.position.to_vec2();
        self.registry
            .burst(&mut self.rng, center, Rgb::hex(0xff4d4d), 8);
        self.sound(AudioCue::Hit);
        self.emit(GameEvent::TimerExpired { health });

        if health == 0 {
            self.begin_game_over();
        } else {
            self.progress.time_left = self.config.mercy_seconds.max(1);
            self.show_reward("TIME UP! -1 heart".to_string());
        }
    }
}
