//! # Utilities Module
//!
//! Small numeric helpers and grid reachability queries shared by the systems.

pub mod math;
pub mod pathfinding;

pub use self::math::*;
pub use self::pathfinding::*;
