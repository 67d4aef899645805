//! # Rendering Module
//!
//! Macroquad drawing of [`RenderSnapshot`](crate::game::RenderSnapshot)s: the stage in
//! [`display`], the HUD and overlays in [`ui`].

pub mod display;
pub mod ui;

pub use display::*;
pub use ui::*;

use crate::game::Rgb;
use macroquad::prelude::Color;

/// Converts a simulation color to a macroquad color with the given opacity.
pub fn to_color(rgb: Rgb, alpha: f32) -> Color {
    Color::from_rgba(rgb.0, rgb.1, rgb.2, (alpha.clamp(0.0, 1.0) * 255.0) as u8)
}

/// Scales a color's brightness, keeping its opacity.
pub fn shade(color: Color, factor: f32) -> Color {
    Color::new(
        (color.r * factor).min(1.0),
        (color.g * factor).min(1.0),
        (color.b * factor).min(1.0),
        color.a,
    )
}
