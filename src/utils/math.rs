//! # Game Mathematics
//!
//! Numeric helpers for tick-based movement.

/// Moves `value` toward `target` by exactly `step` when the gap exceeds `dead_zone`.
///
/// # Examples
///
/// ```
/// use pixel_quest::step_toward;
///
/// assert_eq!(step_toward(2.0, 5.0, 0.5, 1.0), 2.5);
/// assert_eq!(step_toward(2.0, 2.8, 0.5, 1.0), 2.0);
/// assert_eq!(step_toward(4.0, 1.0, 0.5, 1.0), 3.5);
/// ```
pub fn step_toward(value: f32, target: f32, step: f32, dead_zone: f32) -> f32 {
    let gap = target - value;
    if gap.abs() <= dead_zone {
        value
    } else {
        value + step * gap.signum()
    }
}

/// Sign of an integer offset as a unit step (-1, 0, or 1).
pub fn unit_step(offset: i32) -> i32 {
    offset.signum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_toward_dead_zone() {
        assert_eq!(step_toward(0.0, 1.0, 0.5, 1.0), 0.0);
        assert_eq!(step_toward(0.0, -1.5, 0.5, 1.0), -0.5);
    }

    #[test]
    fn test_unit_step() {
        assert_eq!(unit_step(-7), -1);
        assert_eq!(unit_step(0), 0);
        assert_eq!(unit_step(3), 1);
    }
}
