//! # Display Management
//!
//! Screen layout and 2D drawing of the stage using macroquad.

use crate::game::{BossPhase, Direction, RenderSnapshot, Tile};
use crate::rendering::{shade, to_color, HudLayer};
use macroquad::prelude::*;

/// Macroquad display manager for the game.
///
/// Fits the stage grid into the window below the HUD bar and draws every layer of a
/// snapshot: tiles, chests, pickups, enemies, the boss, the player, projectiles, and
/// particles, followed by the HUD.
pub struct MacroquadDisplay {
    /// Tile size in pixels for the current frame
    pub tile_size: f32,
    /// Top-left pixel of the grid
    pub origin: Vec2,
    /// HUD and overlay drawing
    pub hud: HudLayer,
    /// Tinted for every tile so the grid is a single texture batch
    tile_texture: Texture2D,
}

impl MacroquadDisplay {
    /// Creates a new display manager.
    pub fn new() -> Self {
        let tile_texture = Texture2D::from_rgba8(1, 1, &[255, 255, 255, 255]);
        tile_texture.set_filter(FilterMode::Nearest);
        Self {
            tile_size: crate::config::TILE_SIZE,
            origin: vec2(0.0, 0.0),
            hud: HudLayer::new(),
            tile_texture,
        }
    }

    /// Draws one frame.
    pub fn render(&mut self, snapshot: &RenderSnapshot) {
        self.update_layout(snapshot);
        clear_background(Color::from_rgba(12, 12, 20, 255));

        self.render_tiles(snapshot);
        self.render_chests(snapshot);
        self.render_collectibles(snapshot);
        self.render_enemies(snapshot);
        self.render_boss(snapshot);
        self.render_player(snapshot);
        self.render_projectiles(snapshot);
        self.render_particles(snapshot);

        self.hud.render(&snapshot.hud, screen_width(), screen_height());
    }

    /// Fits the grid into the window below the HUD bar.
    fn update_layout(&mut self, snapshot: &RenderSnapshot) {
        let available_w = screen_width();
        let available_h = screen_height() - HudLayer::BAR_HEIGHT;
        let fit_w = available_w / snapshot.width.max(1) as f32;
        let fit_h = available_h / snapshot.height.max(1) as f32;
        self.tile_size = fit_w.min(fit_h).floor().max(4.0);

        let grid_w = self.tile_size * snapshot.width as f32;
        let grid_h = self.tile_size * snapshot.height as f32;
        self.origin = vec2(
            ((available_w - grid_w) / 2.0).floor(),
            HudLayer::BAR_HEIGHT + ((available_h - grid_h) / 2.0).floor(),
        );
    }

    /// Pixel position of the top-left corner of a (fractional) tile coordinate.
    fn to_screen(&self, x: f32, y: f32) -> Vec2 {
        self.origin + vec2(x * self.tile_size, y * self.tile_size)
    }

    fn render_tiles(&self, snapshot: &RenderSnapshot) {
        let ts = self.tile_size;
        for (y, row) in snapshot.tiles.iter().enumerate() {
            for (x, tile) in row.iter().enumerate() {
                let color = to_color(snapshot.tile_colors[y][x], 1.0);
                let pos = self.to_screen(x as f32, y as f32);
                draw_texture_ex(
                    &self.tile_texture,
                    pos.x,
                    pos.y,
                    color,
                    DrawTextureParams {
                        dest_size: Some(vec2(ts, ts)),
                        ..Default::default()
                    },
                );

                match tile {
                    Tile::Wall => {
                        draw_rectangle(pos.x, pos.y, ts, ts * 0.15, shade(color, 1.4));
                    }
                    Tile::Obstacle => {
                        draw_circle(
                            pos.x + ts * 0.5,
                            pos.y + ts * 0.55,
                            ts * 0.3,
                            shade(color, 1.6),
                        );
                    }
                    Tile::Water => {
                        draw_line(
                            pos.x + ts * 0.2,
                            pos.y + ts * 0.5,
                            pos.x + ts * 0.8,
                            pos.y + ts * 0.5,
                            2.0,
                            shade(color, 1.8),
                        );
                    }
                    Tile::Floor => {}
                }
                draw_rectangle_lines(pos.x, pos.y, ts, ts, 1.0, shade(color, 0.8));
            }
        }
    }

    fn render_chests(&self, snapshot: &RenderSnapshot) {
        let ts = self.tile_size;
        for chest in &snapshot.chests {
            let pos = self.to_screen(chest.position.x as f32, chest.position.y as f32);
            let color = to_color(chest.color, 1.0);
            draw_rectangle(pos.x + ts * 0.15, pos.y + ts * 0.35, ts * 0.7, ts * 0.5, color);
            draw_rectangle(
                pos.x + ts * 0.15,
                pos.y + ts * 0.25,
                ts * 0.7,
                ts * 0.15,
                shade(color, 0.7),
            );
            draw_rectangle(pos.x + ts * 0.45, pos.y + ts * 0.45, ts * 0.1, ts * 0.15, GOLD);
        }
    }

    fn render_collectibles(&self, snapshot: &RenderSnapshot) {
        let ts = self.tile_size;
        for pickup in &snapshot.collectibles {
            let pos = self.to_screen(
                pickup.position.x as f32 + 0.5,
                pickup.position.y as f32 + 0.5 + pickup.bob,
            );
            let color = to_color(pickup.color, 1.0);
            draw_circle(pos.x, pos.y, ts * 0.28, color);
            draw_circle(pos.x - ts * 0.08, pos.y - ts * 0.08, ts * 0.08, WHITE);
        }
    }

    fn render_enemies(&self, snapshot: &RenderSnapshot) {
        let ts = self.tile_size;
        for enemy in &snapshot.enemies {
            let pos = self.to_screen(enemy.position.x + 0.5, enemy.position.y + 0.6);
            let body = if enemy.flashing {
                WHITE
            } else {
                Color::from_rgba(123, 211, 137, 255)
            };
            draw_circle(pos.x, pos.y, ts * 0.35, body);
            draw_circle(pos.x - ts * 0.12, pos.y - ts * 0.08, ts * 0.06, BLACK);
            draw_circle(pos.x + ts * 0.12, pos.y - ts * 0.08, ts * 0.06, BLACK);

            for pip in 0..enemy.hp {
                draw_rectangle(
                    pos.x - ts * 0.3 + pip as f32 * ts * 0.2,
                    pos.y - ts * 0.55,
                    ts * 0.15,
                    ts * 0.08,
                    RED,
                );
            }
        }
    }

    fn render_boss(&self, snapshot: &RenderSnapshot) {
        let Some(boss) = &snapshot.boss else {
            return;
        };
        let ts = self.tile_size;
        let pos = self.to_screen(boss.position.x, boss.position.y);
        let base = match boss.phase {
            BossPhase::Normal => Color::from_rgba(160, 60, 200, 255),
            BossPhase::Enraged => Color::from_rgba(220, 40, 60, 255),
        };
        let body = if boss.flashing { WHITE } else { base };
        draw_rectangle(pos.x + ts * 0.1, pos.y + ts * 0.1, ts * 1.8, ts * 1.8, body);
        draw_circle(pos.x + ts * 0.6, pos.y + ts * 0.7, ts * 0.15, YELLOW);
        draw_circle(pos.x + ts * 1.4, pos.y + ts * 0.7, ts * 0.15, YELLOW);

        let fraction = boss.hp as f32 / boss.max_hp.max(1) as f32;
        draw_rectangle(pos.x, pos.y - ts * 0.3, ts * 2.0, ts * 0.15, DARKGRAY);
        draw_rectangle(pos.x, pos.y - ts * 0.3, ts * 2.0 * fraction, ts * 0.15, RED);
    }

    fn render_player(&self, snapshot: &RenderSnapshot) {
        let ts = self.tile_size;
        let player = &snapshot.player;

        if let Some(swing) = player.swing {
            let pos = self.to_screen(swing.x as f32, swing.y as f32);
            draw_rectangle(pos.x, pos.y, ts, ts, Color::new(1.0, 1.0, 1.0, 0.35));
        }
        if !player.visible {
            return;
        }

        let pos = self.to_screen(player.position.x as f32, player.position.y as f32);
        let color = to_color(player.color, 1.0);
        draw_rectangle(pos.x + ts * 0.15, pos.y + ts * 0.15, ts * 0.7, ts * 0.7, color);

        let (dx, dy) = match player.facing {
            Direction::North => (0.0, -0.25),
            Direction::South => (0.0, 0.25),
            Direction::East => (0.25, 0.0),
            Direction::West => (-0.25, 0.0),
        };
        draw_circle(
            pos.x + ts * (0.5 + dx),
            pos.y + ts * (0.5 + dy),
            ts * 0.1,
            BLACK,
        );
    }

    fn render_projectiles(&self, snapshot: &RenderSnapshot) {
        for projectile in &snapshot.projectiles {
            let pos = self.to_screen(projectile.x + 0.5, projectile.y + 0.5);
            draw_circle(pos.x, pos.y, self.tile_size * 0.18, ORANGE);
        }
    }

    fn render_particles(&self, snapshot: &RenderSnapshot) {
        for particle in &snapshot.particles {
            let pos = self.to_screen(particle.position.x + 0.5, particle.position.y + 0.5);
            draw_circle(
                pos.x,
                pos.y,
                particle.size * self.tile_size,
                to_color(particle.color, particle.life),
            );
        }
    }
}

impl Default for MacroquadDisplay {
    fn default() -> Self {
        Self::new()
    }
}
