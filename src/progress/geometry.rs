//! Pure geometry derivation for the progress bar.
//!
//! Nothing here is cached; the widget recomputes geometry on every render.

use super::types::STEPS;

/// Derived display values for one render.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Percentage shown on the label.
    pub display_percentage: u32,
    /// Filled share of the track, always in `[0, 1]`.
    pub fill_fraction: f64,
}

impl Geometry {
    /// Number of filled cells on a track of `track_width` cells.
    pub fn filled_cells(&self, track_width: i32) -> i32 {
        let tw = track_width.max(0);
        ((tw as f64) * self.fill_fraction).round().clamp(0.0, tw as f64) as i32
    }
}

/// Normalizes `display_percentage` against `target`.
///
/// Returns 0 for targets that are zero, negative or not finite.
pub fn fill_fraction(display_percentage: u32, target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 {
        return 0.0;
    }
    (display_percentage as f64 / target).clamp(0.0, 1.0)
}

/// Computes the geometry for a step index and target.
///
/// Indices past the end wrap around the step cycle.
pub fn compute_geometry(step_index: usize, target: f64) -> Geometry {
    let display_percentage = STEPS[step_index % STEPS.len()];
    Geometry {
        display_percentage,
        fill_fraction: fill_fraction(display_percentage, target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fraction_in_unit_range_for_positive_targets() {
        for target in [0.5, 1.0, 10.0, 15.0, 33.3, 50.0, 99.9, 100.0, 250.0] {
            for i in 0..STEPS.len() {
                let g = compute_geometry(i, target);
                assert!(
                    (0.0..=1.0).contains(&g.fill_fraction),
                    "target {target} step {i} gave {}",
                    g.fill_fraction
                );
            }
        }
    }

    #[test]
    fn test_degenerate_targets_give_empty_fill() {
        for target in [0.0, -0.0, -1.0, -100.0, f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let g = compute_geometry(3, target);
            assert_eq!(g.fill_fraction, 0.0);
            assert!(g.fill_fraction.is_finite());
            assert_eq!(g.display_percentage, 35);
        }
    }

    #[test]
    fn test_overflow_is_clamped() {
        // 100 / 50 would be 2.0 unclamped.
        assert_eq!(compute_geometry(6, 50.0).fill_fraction, 1.0);
    }

    #[test]
    fn test_index_wraps() {
        assert_eq!(compute_geometry(7, 100.0), compute_geometry(0, 100.0));
        assert_eq!(compute_geometry(15, 100.0).display_percentage, STEPS[1]);
    }

    #[test]
    fn test_filled_cells() {
        let g = Geometry {
            display_percentage: 50,
            fill_fraction: 0.5,
        };
        assert_eq!(g.filled_cells(20), 10);
        assert_eq!(g.filled_cells(0), 0);
        assert_eq!(g.filled_cells(-5), 0);

        let full = compute_geometry(6, 10.0);
        assert_eq!(full.filled_cells(33), 33);
    }
}
