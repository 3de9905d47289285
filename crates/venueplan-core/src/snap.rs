//! Grid snapping for placement and drag.

use kurbo::Point;

/// Grid size for snapping (matches the visual grid at 100% zoom).
pub const GRID_SIZE: f64 = 20.0;

/// Round half toward positive infinity, the way the web client rounds.
///
/// `f64::round` sends `-2.5` to `-3`; pointer math on the canvas expects `-2`.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Snap a single coordinate to the nearest multiple of `grid_size`.
pub fn snap_value(value: f64, grid_size: f64) -> f64 {
    if grid_size <= 0.0 {
        return value;
    }
    // `+ 0.0` normalises -0.0 so snapped values compare and print cleanly
    round_half_up(value / grid_size) * grid_size + 0.0
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    Point::new(snap_value(point.x, grid_size), snap_value(point.y, grid_size))
}

/// Check whether a coordinate already sits on the grid.
pub fn is_on_grid(value: f64, grid_size: f64) -> bool {
    grid_size > 0.0 && (value / grid_size).fract().abs() < 1e-9
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_nearest() {
        let snapped = snap_to_grid(Point::new(133.0, 47.0), GRID_SIZE);
        assert!((snapped.x - 140.0).abs() < f64::EPSILON);
        assert!((snapped.y - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_half_rounds_up() {
        assert!((snap_value(10.0, GRID_SIZE) - 20.0).abs() < f64::EPSILON);
        assert!((snap_value(-10.0, GRID_SIZE) - 0.0).abs() < f64::EPSILON);
        assert!((snap_value(-30.0, GRID_SIZE) - -20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_zero_is_normalised() {
        let snapped = snap_value(-4.0, GRID_SIZE);
        assert!(snapped.is_sign_positive());
        assert_eq!(format!("{}", snapped), "0");
    }

    #[test]
    fn test_results_are_on_grid() {
        for raw in [-317.3, -0.1, 0.0, 9.99, 10.0, 253.0, 1234.56] {
            assert!(is_on_grid(snap_value(raw, GRID_SIZE), GRID_SIZE), "{raw}");
        }
    }

    #[test]
    fn test_zero_grid_is_passthrough() {
        assert!((snap_value(13.7, 0.0) - 13.7).abs() < f64::EPSILON);
    }
}
