//! Angle utilities used across the detector pipeline.
//!
//! Light tilt is measured from vertical (an upright light has tilt 0),
//! while the pair-connecting line is measured from horizontal. Both are
//! unsigned and expressed in degrees to match the parameter types.

/// Unsigned tilt of the direction `(dx, dy)` from vertical, in degrees.
/// Range [0, 90].
#[inline]
pub fn tilt_from_vertical_deg(dx: f32, dy: f32) -> f32 {
    dx.abs().atan2(dy.abs()).to_degrees()
}

/// Unsigned inclination of the direction `(dx, dy)` from horizontal, in
/// degrees. Range [0, 90].
#[inline]
pub fn tilt_from_horizontal_deg(dx: f32, dy: f32) -> f32 {
    dy.abs().atan2(dx.abs()).to_degrees()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn vertical_direction_has_zero_tilt() {
        assert!(approx_eq(tilt_from_vertical_deg(0.0, 1.0), 0.0));
        assert!(approx_eq(tilt_from_vertical_deg(0.0, -3.0), 0.0));
    }

    #[test]
    fn diagonal_direction_tilts_45() {
        assert!(approx_eq(tilt_from_vertical_deg(1.0, 1.0), 45.0));
        assert!(approx_eq(tilt_from_horizontal_deg(-2.0, 2.0), 45.0));
    }

    #[test]
    fn horizontal_line_is_flat() {
        assert!(approx_eq(tilt_from_horizontal_deg(5.0, 0.0), 0.0));
        assert!(approx_eq(tilt_from_vertical_deg(5.0, 0.0), 90.0));
    }
}
