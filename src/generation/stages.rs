//! # Stage Layouts
//!
//! Hand-authored grids for the opening stages and the rule that picks a grid for
//! any stage number.

use crate::config::{AUTHORED_HEIGHT, AUTHORED_WIDTH};
use crate::game::{Grid, Position};
use crate::generation::{create_rng, ArenaGenerator, GenerationConfig, Generator};
use rand::rngs::StdRng;
use rand::Rng;

/// Player spawn on every authored stage.
pub const AUTHORED_SPAWN: Position = Position { x: 5, y: 5 };

/// Chest slots as (position, first stage on which the chest appears).
pub const CHEST_SLOTS: [(Position, u32); 4] = [
    (Position { x: 2, y: 2 }, 1),
    (Position { x: 9, y: 7 }, 1),
    (Position { x: 2, y: 7 }, 3),
    (Position { x: 9, y: 2 }, 6),
];

type AuthoredLayout = [[u8; AUTHORED_WIDTH]; AUTHORED_HEIGHT];

// 0 = floor, 1 = wall, 2 = obstacle, 3 = water
const MEADOW: AuthoredLayout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 2, 2, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 2, 2, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 3, 3, 0, 1],
    [1, 2, 2, 0, 0, 0, 0, 0, 3, 3, 0, 1],
    [1, 2, 2, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 2, 2, 0, 0, 1],
    [1, 0, 0, 3, 3, 0, 0, 2, 2, 0, 0, 1],
    [1, 0, 0, 3, 3, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const PONDS: AuthoredLayout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 1, 1, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 3, 3, 0, 0, 0, 0, 2, 2, 0, 1],
    [1, 0, 3, 3, 0, 0, 0, 0, 2, 2, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 0, 0, 2, 0, 0, 2, 0, 0, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 3, 3, 0, 1, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const PILLARS: AuthoredLayout = [
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 0, 1],
    [1, 0, 1, 0, 0, 0, 0, 0, 0, 1, 0, 1],
    [1, 0, 3, 3, 0, 2, 2, 0, 3, 3, 0, 1],
    [1, 0, 3, 3, 0, 0, 0, 0, 3, 3, 0, 1],
    [1, 0, 0, 0, 0, 2, 2, 0, 0, 0, 0, 1],
    [1, 0, 0, 1, 0, 0, 0, 0, 1, 0, 0, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1],
    [1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1, 1],
];

const AUTHORED_STAGES: [&AuthoredLayout; 3] = [&MEADOW, &PONDS, &PILLARS];

/// Number of stages with hand-authored layouts.
pub fn authored_stage_count() -> u32 {
    AUTHORED_STAGES.len() as u32
}

/// Grid for an authored stage (1-based), or None past the authored content.
pub fn authored_grid(stage: u32) -> Option<Grid> {
    let index = stage.checked_sub(1)? as usize;
    AUTHORED_STAGES
        .get(index)
        .map(|layout| Grid::from_codes(&layout[..], AUTHORED_SPAWN))
}

/// Selects the grid for a stage.
///
/// Stages up to the authored count use their literal layout; every later stage is
/// a generated arena with the chest slots kept clear. Stage 0 is treated as stage 1.
/// A generation failure falls back to the first authored layout.
pub fn stage_grid(stage: u32, rng: &mut StdRng) -> Grid {
    let stage = stage.max(1);
    if let Some(grid) = authored_grid(stage) {
        return grid;
    }

    let config = GenerationConfig::new(rng.gen());
    let generator =
        ArenaGenerator::with_clear_cells(CHEST_SLOTS.iter().map(|(pos, _)| *pos).collect());
    match generator.generate(&config, &mut create_rng(&config)) {
        Ok(grid) => grid,
        Err(err) => {
            log::warn!("Stage {} generation failed ({}), using authored layout", stage, err);
            Grid::from_codes(&MEADOW[..], AUTHORED_SPAWN)
        }
    }
}
