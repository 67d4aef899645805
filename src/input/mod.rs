//! # Input Module
//!
//! Per-tick input frames for the simulation and keyboard polling for the front end.

pub mod keyboard;

pub use keyboard::*;

use crate::game::Direction;
use serde::{Deserialize, Serialize};

/// Input sampled for one simulation tick.
///
/// `pressed` and `attack` are edge-triggered (true only on the frame the key went
/// down); `held` is level-triggered.
///
/// # Examples
///
/// ```
/// use pixel_quest::{Direction, InputFrame};
///
/// let frame = InputFrame::press(Direction::North);
/// assert_eq!(frame.held, Some(Direction::North));
/// assert!(InputFrame::default().is_empty());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputFrame {
    /// Direction currently held down
    pub held: Option<Direction>,
    /// Direction newly pressed this frame
    pub pressed: Option<Direction>,
    /// Attack newly pressed this frame
    pub attack: bool,
}

impl InputFrame {
    /// A fresh press that is also held.
    pub fn press(direction: Direction) -> Self {
        Self {
            held: Some(direction),
            pressed: Some(direction),
            attack: false,
        }
    }

    /// A held direction with no new press.
    pub fn hold(direction: Direction) -> Self {
        Self {
            held: Some(direction),
            ..Self::default()
        }
    }

    /// An attack press with no movement.
    pub fn attack() -> Self {
        Self {
            attack: true,
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_none() && self.pressed.is_none() && !self.attack
    }

    /// Keeps the edge-triggered parts of `other` until they are taken.
    pub fn absorb_edges(&mut self, other: &InputFrame) {
        if other.pressed.is_some() {
            self.pressed = other.pressed;
        }
        self.attack |= other.attack;
    }

    /// Takes the pending edge-triggered parts, leaving them cleared.
    pub fn take_edges(&mut self) -> InputFrame {
        InputFrame {
            held: None,
            pressed: self.pressed.take(),
            attack: std::mem::take(&mut self.attack),
        }
    }
}

/// Front-end commands outside the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuCommand {
    /// Start or resume play
    Start,
    TogglePause,
    /// Cycle Easy → Normal → Hard
    CycleDifficulty,
    /// Discard the save and restart from stage one
    NewGame,
    Quit,
}
