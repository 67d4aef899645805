//! # User Interface Elements
//!
//! HUD bar, reward popup, stage announcement, and the title/pause/game-over overlays.

use crate::game::{Difficulty, HudSnapshot, StagePhase};
use macroquad::prelude::*;

/// Draws the HUD from a [`HudSnapshot`].
#[derive(Debug, Default)]
pub struct HudLayer {
    /// Difficulty shown on the title overlay
    pub difficulty: Difficulty,
}

impl HudLayer {
    /// Height of the top HUD bar in pixels.
    pub const BAR_HEIGHT: f32 = 64.0;

    pub fn new() -> Self {
        Self::default()
    }

    /// Draws the bar, popups, and any phase overlay.
    pub fn render(&self, hud: &HudSnapshot, width: f32, height: f32) {
        self.render_bar(hud, width);

        if let Some(text) = &hud.announcement {
            centered_text(text, width / 2.0, height * 0.3, 40.0, WHITE);
        }
        if let Some(text) = &hud.popup {
            centered_text(text, width / 2.0, height * 0.3 + 44.0, 26.0, GOLD);
        }

        match hud.phase {
            StagePhase::AwaitingStart => self.render_title(width, height),
            StagePhase::GameOverSequence => {
                dim(width, height);
                centered_text("GAME OVER", width / 2.0, height / 2.0, 56.0, RED);
            }
            StagePhase::StageClearing | StagePhase::Playing => {}
        }
        if hud.paused && hud.phase != StagePhase::AwaitingStart {
            dim(width, height);
            centered_text("PAUSED", width / 2.0, height / 2.0, 56.0, WHITE);
            centered_text(
                "Esc/P resume   N new game   Q quit",
                width / 2.0,
                height / 2.0 + 40.0,
                20.0,
                LIGHTGRAY,
            );
        }
    }

    fn render_bar(&self, hud: &HudSnapshot, width: f32) {
        draw_rectangle(0.0, 0.0, width, Self::BAR_HEIGHT, Color::new(0.0, 0.0, 0.0, 0.85));

        let hearts: String = (0..hud.max_hearts)
            .map(|i| if i < hud.hearts { 'O' } else { '.' })
            .collect();
        draw_text(&format!("HP {}", hearts), 10.0, 22.0, 22.0, PINK);
        draw_text(&format!("Coins {}", hud.coins), 10.0, 48.0, 22.0, GOLD);

        let column = width * 0.35;
        draw_text(&format!("Lv.{}", hud.level), column, 22.0, 22.0, WHITE);
        bar(column, 32.0, width * 0.2, 10.0, hud.xp_fraction, PURPLE);

        let column = width * 0.62;
        draw_text(&format!("Stage {}", hud.stage), column, 22.0, 22.0, WHITE);
        match hud.boss_fraction {
            Some(fraction) => bar(column, 32.0, width * 0.2, 10.0, fraction, RED),
            None => {
                bar(column, 32.0, width * 0.2, 10.0, hud.stage_fraction, SKYBLUE);
                draw_text(
                    &format!("{}/{}", hud.collectibles_got, hud.collectibles_needed),
                    column,
                    58.0,
                    16.0,
                    LIGHTGRAY,
                );
            }
        }

        let timer_color = if hud.time_left <= 10 { RED } else { WHITE };
        draw_text(
            &format!("{:>3}s", hud.time_left),
            width - 70.0,
            36.0,
            28.0,
            timer_color,
        );
    }

    fn render_title(&self, width: f32, height: f32) {
        dim(width, height);
        centered_text("PIXEL QUEST", width / 2.0, height / 2.0 - 40.0, 64.0, GOLD);
        centered_text(
            "Enter start   Tab difficulty   N new game",
            width / 2.0,
            height / 2.0 + 10.0,
            22.0,
            WHITE,
        );
        centered_text(
            &format!("Difficulty: {:?}", self.difficulty),
            width / 2.0,
            height / 2.0 + 40.0,
            22.0,
            LIGHTGRAY,
        );
        centered_text(
            "Arrows/WASD move   Space attack",
            width / 2.0,
            height / 2.0 + 70.0,
            18.0,
            GRAY,
        );
    }
}

fn bar(x: f32, y: f32, w: f32, h: f32, fraction: f32, color: Color) {
    draw_rectangle(x, y, w, h, DARKGRAY);
    draw_rectangle(x, y, w * fraction.clamp(0.0, 1.0), h, color);
}

fn dim(width: f32, height: f32) {
    draw_rectangle(0.0, 0.0, width, height, Color::new(0.0, 0.0, 0.0, 0.55));
}

fn centered_text(text: &str, x: f32, y: f32, size: f32, color: Color) {
    let dims = measure_text(text, None, size as u16, 1.0);
    draw_text(text, x - dims.width / 2.0, y, size, color);
}
