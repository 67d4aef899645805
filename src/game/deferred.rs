//! # Deferred Actions
//!
//! Tick-counted queue for delayed effects. Each entry counts down once per simulation
//! tick and fires exactly once when it reaches zero, keeping timing deterministic.

use crate::game::EntityId;
use serde::{Deserialize, Serialize};

/// Effects that happen some ticks after they are scheduled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeferredAction {
    /// Hide the reward popup if it is still the one with this serial
    DismissPopup { serial: u64 },
    /// Hide the stage announcement if it is still the one with this serial
    DismissAnnouncement { serial: u64 },
    /// End the attack lockout
    ReleaseAttack,
    /// Close an opened chest
    ResetChest { chest: EntityId },
    /// Refill the floor when it ran out of rewards before the goal was met
    RespawnCollectibles { stage: u32 },
    /// Finish a boss stage once the loot has had time to scatter
    CompleteBossStage { stage: u32 },
    /// Load the next stage after a clear
    AdvanceStage { stage: u32 },
    /// Reset to stage one after the game-over pause
    FinishGameOver,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Scheduled {
    remaining: u32,
    action: DeferredAction,
}

/// FIFO of pending deferred actions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeferredQueue {
    pending: Vec<Scheduled>,
}

impl DeferredQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules an action to fire after `ticks` ticks. Zero fires on the next tick.
    pub fn schedule(&mut self, ticks: u32, action: DeferredAction) {
        self.pending.push(Scheduled {
            remaining: ticks.max(1),
            action,
        });
    }

    /// Counts every entry down by one tick and returns the ones that are due,
    /// in scheduling order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixel_quest::{DeferredAction, DeferredQueue};
    ///
    /// let mut queue = DeferredQueue::new();
    /// queue.schedule(2, DeferredAction::ReleaseAttack);
    /// assert!(queue.tick().is_empty());
    /// assert_eq!(queue.tick(), vec![DeferredAction::ReleaseAttack]);
    /// assert!(queue.is_empty());
    /// ```
    pub fn tick(&mut self) -> Vec<DeferredAction> {
        let mut due = Vec::new();
        self.pending.retain_mut(|entry| {
            entry.remaining -= 1;
            if entry.remaining == 0 {
                due.push(entry.action.clone());
                false
            } else {
                true
            }
        });
        due
    }

    /// Whether an equal action is already waiting.
    pub fn contains(&self, action: &DeferredAction) -> bool {
        self.pending.iter().any(|entry| &entry.action == action)
    }

    /// Drops pending actions that match the predicate.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&DeferredAction) -> bool) {
        self.pending.retain(|entry| !predicate(&entry.action));
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
