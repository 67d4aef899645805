//! # Progress
//!
//! Currency, experience, stage counters, difficulty, and the per-stage formulas
//! the stage director uses.

use crate::config::{STARTING_XP_TO_NEXT, XP_GROWTH};
use crate::game::GameEvent;
use serde::{Deserialize, Serialize};

/// Named difficulty selection stored in the settings blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn profile(self) -> DifficultyProfile {
        match self {
            Difficulty::Easy => DifficultyProfile {
                enemy_speed_mul: 0.75,
                boss_speed_mul: 0.75,
                timer_mul: 1.5,
            },
            Difficulty::Normal => DifficultyProfile::default(),
            Difficulty::Hard => DifficultyProfile {
                enemy_speed_mul: 1.5,
                boss_speed_mul: 1.3,
                timer_mul: 0.75,
            },
        }
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "easy" => Ok(Difficulty::Easy),
            "normal" => Ok(Difficulty::Normal),
            "hard" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

/// Multipliers applied to enemy cadence, boss cadence, and the stage timer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyProfile {
    pub enemy_speed_mul: f32,
    pub boss_speed_mul: f32,
    pub timer_mul: f32,
}

impl DifficultyProfile {
    /// Scales a base tick interval by a speed multiplier. Faster means shorter.
    pub fn scaled_interval(base_ticks: u32, speed_mul: f32) -> u32 {
        if speed_mul <= 0.0 {
            return base_ticks.max(1);
        }
        ((base_ticks as f32 / speed_mul).round() as u32).max(1)
    }

    pub fn enemy_interval(&self, base_ticks: u32) -> u32 {
        Self::scaled_interval(base_ticks, self.enemy_speed_mul)
    }

    pub fn boss_interval(&self, base_ticks: u32) -> u32 {
        Self::scaled_interval(base_ticks, self.boss_speed_mul)
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        Self {
            enemy_speed_mul: 1.0,
            boss_speed_mul: 1.0,
            timer_mul: 1.0,
        }
    }
}

/// Collectibles the player must gather to clear a stage.
///
/// # Examples
///
/// ```
/// use pixel_quest::collectibles_needed;
///
/// assert_eq!(collectibles_needed(1), 5);
/// assert!(collectibles_needed(2) > collectibles_needed(1));
/// ```
pub fn collectibles_needed(stage: u32) -> u32 {
    stage.max(1).saturating_mul(2).saturating_add(3)
}

/// Countdown length in seconds for a stage.
pub fn stage_timer_seconds(stage: u32, profile: &DifficultyProfile) -> u32 {
    let baseline = 60i64 - (stage.max(1) as i64 - 1) * 3;
    let seconds = baseline.max(30) as f32 * profile.timer_mul;
    (seconds.round() as u32).max(1)
}

/// Whether the stage is fought against the boss instead of collected.
pub fn is_boss_stage(stage: u32) -> bool {
    stage > 0 && stage % crate::config::BOSS_STAGE_INTERVAL == 0
}

/// Currency, experience, and stage counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Progress {
    pub coins: u32,
    pub xp: u32,
    pub level: u32,
    pub xp_to_next: u32,
    pub stage: u32,
    /// Seconds left on the countdown
    pub time_left: u32,
    pub collectibles_needed: u32,
    pub collectibles_got: u32,
}

impl Progress {
    pub fn new() -> Self {
        Self {
            coins: 0,
            xp: 0,
            level: 1,
            xp_to_next: STARTING_XP_TO_NEXT,
            stage: 1,
            time_left: 0,
            collectibles_needed: collectibles_needed(1),
            collectibles_got: 0,
        }
    }

    /// Adds xp and resolves every level-up it causes. Returns the levels reached,
    /// in order; one large gain can cross several thresholds.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::Progress;
    ///
    /// let mut progress = Progress::new();
    /// assert_eq!(progress.apply_xp(125), vec![2, 3]);
    /// assert_eq!(progress.xp, 0);
    /// assert_eq!(progress.xp_to_next, 112);
    /// ```
    pub fn apply_xp(&mut self, amount: u32) -> Vec<u32> {
        self.xp = self.xp.saturating_add(amount);
        self.normalize_levels()
    }

    /// Runs the level-up loop until xp is below the threshold.
    pub fn normalize_levels(&mut self) -> Vec<u32> {
        let mut reached = Vec::new();
        self.xp_to_next = self.xp_to_next.max(1);
        while self.xp >= self.xp_to_next {
            self.xp -= self.xp_to_next;
            self.level = self.level.saturating_add(1);
            let grown = (self.xp_to_next as f64 * XP_GROWTH).floor() as u32;
            self.xp_to_next = grown.max(self.xp_to_next.saturating_add(1));
            reached.push(self.level);
        }
        reached
    }

    /// Xp bar fill in [0, 1).
    pub fn xp_fraction(&self) -> f32 {
        self.xp as f32 / self.xp_to_next.max(1) as f32
    }

    /// Stage collection bar fill in [0, 1].
    pub fn stage_fraction(&self) -> f32 {
        if self.collectibles_needed == 0 {
            return 1.0;
        }
        (self.collectibles_got as f32 / self.collectibles_needed as f32).min(1.0)
    }
}

impl Default for Progress {
    fn default() -> Self {
        Self::new()
    }
}

/// Game statistics tracking player progress and achievements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameStatistics {
    /// Number of slimes defeated
    pub enemies_defeated: u32,
    /// Number of bosses defeated
    pub bosses_defeated: u32,
    /// Number of collectibles picked up
    pub items_collected: u32,
    /// Number of chests opened
    pub chests_opened: u32,
    /// Total damage taken
    pub damage_taken: u32,
    /// Number of times the player has died
    pub deaths: u32,
    /// Stages cleared
    pub stages_cleared: u32,
    /// Total steps taken
    pub steps_taken: u64,
}

impl GameStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates statistics based on a game event.
    pub fn update_from_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::PlayerMoved { .. } => self.steps_taken += 1,
            GameEvent::PlayerDamaged { .. } | GameEvent::TimerExpired { .. } => {
                self.damage_taken += 1
            }
            GameEvent::EnemyKilled { .. } => self.enemies_defeated += 1,
            GameEvent::BossDefeated { .. } => self.bosses_defeated += 1,
            GameEvent::CollectiblePicked { .. } => self.items_collected += 1,
            GameEvent::ChestOpened { .. } => self.chests_opened += 1,
            GameEvent::StageCleared { .. } => self.stages_cleared += 1,
            GameEvent::GameOver { .. } => self.deaths += 1,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;

    #[test]
    fn test_level_up_two_and_a_half_thresholds() {
        let mut progress = Progress::new();
        let gain = progress.xp_to_next * 5 / 2;
        let levels = progress.apply_xp(gain);
        assert_eq!(levels, vec![2, 3]);
        assert_eq!(progress.level, 3);
        assert_eq!(progress.xp, 0);
        assert_eq!(progress.xp_to_next, 112);
    }

    #[test]
    fn test_tiny_threshold_still_grows() {
        let mut progress = Progress::new();
        progress.xp_to_next = 1;
        let levels = progress.apply_xp(1_000_000);
        assert!(levels.len() < 40, "{} level-ups", levels.len());
        assert!(progress.xp < progress.xp_to_next);
    }

    #[test]
    fn test_huge_stage_goal_saturates() {
        assert_eq!(collectibles_needed(u32::MAX), u32::MAX);
        assert_eq!(collectibles_needed(2_000_000_000), u32::MAX);
    }

    #[test]
    fn test_single_level_up_keeps_remainder() {
        let mut progress = Progress::new();
        assert_eq!(progress.apply_xp(60), vec![2]);
        assert_eq!(progress.xp, 10);
        assert_eq!(progress.xp_to_next, 75);
        assert!(progress.apply_xp(5).is_empty());
        assert_eq!(progress.xp, 15);
    }

    #[test]
    fn test_timer_formula() {
        let normal = DifficultyProfile::default();
        assert_eq!(stage_timer_seconds(1, &normal), 60);
        assert_eq!(stage_timer_seconds(4, &normal), 51);
        assert_eq!(stage_timer_seconds(50, &normal), 30);
        assert_eq!(stage_timer_seconds(1, &Difficulty::Easy.profile()), 90);
        assert_eq!(stage_timer_seconds(1, &Difficulty::Hard.profile()), 45);
    }

    #[test]
    fn test_boss_stages() {
        assert!(!is_boss_stage(0));
        assert!(!is_boss_stage(4));
        assert!(is_boss_stage(5));
        assert!(is_boss_stage(10));
    }

    #[test]
    fn test_scaled_interval() {
        assert_eq!(DifficultyProfile::scaled_interval(30, 1.5), 20);
        assert_eq!(DifficultyProfile::scaled_interval(30, 0.75), 40);
        assert_eq!(DifficultyProfile::scaled_interval(30, 0.0), 30);
        assert_eq!(DifficultyProfile::scaled_interval(1, 10.0), 1);
    }

    #[test]
    fn test_difficulty_parsing() {
        assert_eq!("HARD".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn test_statistics_update() {
        let mut stats = GameStatistics::new();
        stats.update_from_event(&GameEvent::PlayerMoved {
            from: Position::new(1, 1),
            to: Position::new(2, 1),
        });
        stats.update_from_event(&GameEvent::ChestOpened {
            position: Position::new(2, 2),
            coins: 25,
        });
        stats.update_from_event(&GameEvent::GameOver { coins_lost: 4 });
        assert_eq!(stats.steps_taken, 1);
        assert_eq!(stats.chests_opened, 1);
        assert_eq!(stats.deaths, 1);
    }
}
