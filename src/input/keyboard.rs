//! # Keyboard Input
//!
//! Polls macroquad's keyboard state into [`InputFrame`]s and menu commands.

use crate::game::Direction;
use crate::input::{InputFrame, MenuCommand};
use macroquad::prelude::*;

/// Keyboard poller for the desktop front end.
///
/// Arrow keys and WASD move, Space or J attacks. The last direction pressed wins
/// while several are held.
#[derive(Debug, Default)]
pub struct KeyboardInput {
    last_pressed: Option<Direction>,
}

impl KeyboardInput {
    pub fn new() -> Self {
        Self::default()
    }

    const BINDINGS: [(Direction, [KeyCode; 2]); 4] = [
        (Direction::North, [KeyCode::Up, KeyCode::W]),
        (Direction::South, [KeyCode::Down, KeyCode::S]),
        (Direction::West, [KeyCode::Left, KeyCode::A]),
        (Direction::East, [KeyCode::Right, KeyCode::D]),
    ];

    /// Samples the keyboard for this frame.
    pub fn poll(&mut self) -> InputFrame {
        let pressed = Self::BINDINGS
            .iter()
            .find(|(_, keys)| keys.iter().any(|k| is_key_pressed(*k)))
            .map(|(direction, _)| *direction);
        if pressed.is_some() {
            self.last_pressed = pressed;
        }

        let is_held = |direction: Direction| {
            Self::BINDINGS
                .iter()
                .filter(|(d, _)| *d == direction)
                .any(|(_, keys)| keys.iter().any(|k| is_key_down(*k)))
        };
        let held = match self.last_pressed {
            Some(direction) if is_held(direction) => Some(direction),
            _ => Direction::all().into_iter().find(|d| is_held(*d)),
        };

        InputFrame {
            held,
            pressed,
            attack: is_key_pressed(KeyCode::Space) || is_key_pressed(KeyCode::J),
        }
    }

    /// Returns the menu command pressed this frame, if any.
    pub fn menu_command(&self) -> Option<MenuCommand> {
        if is_key_pressed(KeyCode::Enter) {
            return Some(MenuCommand::Start);
        }
        if is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::P) {
            return Some(MenuCommand::TogglePause);
        }
        if is_key_pressed(KeyCode::Tab) {
            return Some(MenuCommand::CycleDifficulty);
        }
        if is_key_pressed(KeyCode::N) {
            return Some(MenuCommand::NewGame);
        }
        if is_key_pressed(KeyCode::Q) {
            return Some(MenuCommand::Quit);
        }
        None
    }
}
