//! Per-axis tolerance box of a region.

use std::f64::consts::{PI, TAU};

use serde::Serialize;

use herb_core::error::ConfigError;
use herb_core::pose::Axis;

/// Six `[min, max]` intervals over `x, y, z, roll, pitch, yaw`.
///
/// Every interval starts at `[0, 0]`. Widening an axis validates the
/// interval immediately, so a box that exists is never degenerate.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BoundsBox {
    intervals: [[f64; 2]; 6],
}

impl BoundsBox {
    /// No deviation permitted on any axis.
    pub const fn zero() -> Self {
        Self {
            intervals: [[0.0; 2]; 6],
        }
    }

    /// Build from explicit rows, validating each.
    pub fn from_rows(rows: [[f64; 2]; 6]) -> Result<Self, ConfigError> {
        let mut bounds = Self::zero();
        for (axis, [min, max]) in Axis::ALL.into_iter().zip(rows) {
            bounds = bounds.with_axis(axis, min, max)?;
        }
        Ok(bounds)
    }

    /// Set the interval on one axis.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NonFiniteBound`] for NaN/infinite limits and
    /// [`ConfigError::DegenerateBounds`] when `min > max`.
    pub fn with_axis(mut self, axis: Axis, min: f64, max: f64) -> Result<Self, ConfigError> {
        if !min.is_finite() || !max.is_finite() {
            return Err(ConfigError::NonFiniteBound { axis });
        }
        if min > max {
            return Err(ConfigError::DegenerateBounds { axis, min, max });
        }
        self.intervals[axis.index()] = [min, max];
        Ok(self)
    }

    /// Symmetric interval `[-tolerance, tolerance]`.
    pub fn with_symmetric(self, axis: Axis, tolerance: f64) -> Result<Self, ConfigError> {
        self.with_axis(axis, -tolerance, tolerance)
    }

    /// Unrestricted rotation about `axis`.
    pub fn with_free_rotation(self, axis: Axis) -> Result<Self, ConfigError> {
        self.with_symmetric(axis.rotation_about(), PI)
    }

    pub const fn interval(&self, axis: Axis) -> [f64; 2] {
        self.intervals[axis.index()]
    }

    pub const fn min(&self, axis: Axis) -> f64 {
        self.intervals[axis.index()][0]
    }

    pub const fn max(&self, axis: Axis) -> f64 {
        self.intervals[axis.index()][1]
    }

    pub fn width(&self, axis: Axis) -> f64 {
        self.max(axis) - self.min(axis)
    }

    /// All six intervals in axis order.
    pub const fn rows(&self) -> &[[f64; 2]; 6] {
        &self.intervals
    }

    /// Whether a displacement `[x, y, z, roll, pitch, yaw]` lies within the
    /// box, widened by `tolerance` on every side.
    ///
    /// A rotation has two roll-pitch-yaw decompositions, `(r, p, y)` and
    /// `(r + π, π - p, y + π)`. The displacement is inside if either one
    /// fits, so a free pitch axis admits the full turn even though
    /// `displacement` reports pitch in `[-π/2, π/2]`.
    pub fn contains(&self, displacement: &[f64; 6], tolerance: f64) -> bool {
        self.contains_decomposition(displacement, tolerance)
            || self.contains_decomposition(&flipped_euler(displacement), tolerance)
    }

    fn contains_decomposition(&self, displacement: &[f64; 6], tolerance: f64) -> bool {
        Axis::ALL.into_iter().all(|axis| {
            let [min, max] = self.interval(axis);
            let value = displacement[axis.index()];
            // A full turn on a rotation axis wraps
            if !axis.is_translational() && max - min >= TAU - tolerance {
                return true;
            }
            value >= min - tolerance && value <= max + tolerance
        })
    }
}

/// Wrap an angle into `[-π, π)`.
fn wrap_angle(angle: f64) -> f64 {
    (angle + PI).rem_euclid(TAU) - PI
}

/// The other roll-pitch-yaw triple describing the same rotation.
fn flipped_euler(displacement: &[f64; 6]) -> [f64; 6] {
    let [x, y, z, roll, pitch, yaw] = *displacement;
    [
        x,
        y,
        z,
        wrap_angle(roll + PI),
        wrap_angle(PI - pitch),
        wrap_angle(yaw + PI),
    ]
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_is_zero() {
        let bounds = BoundsBox::default();
        for axis in Axis::ALL {
            assert_eq!(bounds.interval(axis), [0.0, 0.0]);
        }
        assert_eq!(bounds, BoundsBox::zero());
    }

    #[test]
    fn widening_touches_one_axis() {
        let bounds = BoundsBox::zero()
            .with_axis(Axis::Z, 0.0, 0.02)
            .unwrap()
            .with_free_rotation(Axis::Z)
            .unwrap();
        assert_eq!(bounds.interval(Axis::Z), [0.0, 0.02]);
        assert_relative_eq!(bounds.width(Axis::Yaw), 2.0 * PI);
        assert_eq!(bounds.interval(Axis::X), [0.0, 0.0]);
        assert_eq!(bounds.interval(Axis::Pitch), [0.0, 0.0]);
    }

    #[test]
    fn degenerate_interval_fails_fast() {
        let err = BoundsBox::zero().with_axis(Axis::Y, 0.1, -0.1).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::DegenerateBounds { axis: Axis::Y, .. }
        ));
    }

    #[test]
    fn non_finite_interval_fails_fast() {
        assert!(matches!(
            BoundsBox::zero().with_axis(Axis::Roll, f64::NAN, 0.0),
            Err(ConfigError::NonFiniteBound { axis: Axis::Roll })
        ));
        assert!(BoundsBox::zero().with_symmetric(Axis::X, f64::INFINITY).is_err());
    }

    #[test]
    fn negative_symmetric_tolerance_is_degenerate() {
        assert!(BoundsBox::zero().with_symmetric(Axis::X, -0.05).is_err());
    }

    #[test]
    fn from_rows_validates_every_row() {
        let mut rows = [[0.0; 2]; 6];
        rows[5] = [1.0, -1.0];
        assert!(BoundsBox::from_rows(rows).is_err());

        rows[5] = [-1.0, 1.0];
        let bounds = BoundsBox::from_rows(rows).unwrap();
        assert_eq!(bounds.rows()[5], [-1.0, 1.0]);
    }

    #[test]
    fn contains_checks_each_axis() {
        let bounds = BoundsBox::zero()
            .with_symmetric(Axis::X, 0.05)
            .unwrap()
            .with_free_rotation(Axis::Z)
            .unwrap();
        assert!(bounds.contains(&[0.04, 0.0, 0.0, 0.0, 0.0, 3.0], 1e-9));
        assert!(!bounds.contains(&[0.06, 0.0, 0.0, 0.0, 0.0, 0.0], 1e-9));
        assert!(!bounds.contains(&[0.0, 0.0, 0.01, 0.0, 0.0, 0.0], 1e-9));
        assert!(!bounds.contains(&[0.0, 0.0, 0.0, 0.2, 0.0, 0.0], 1e-9));
    }

    #[test]
    fn wrap_angle_lands_in_half_open_turn() {
        assert_relative_eq!(wrap_angle(0.5), 0.5);
        assert_relative_eq!(wrap_angle(TAU + 0.5), 0.5, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(-PI - 0.5), PI - 0.5, epsilon = 1e-12);
        assert_relative_eq!(wrap_angle(PI), -PI);
    }

    #[test]
    fn free_pitch_accepts_flipped_decomposition() {
        let bounds = BoundsBox::zero().with_free_rotation(Axis::Y).unwrap();
        // Pitch of 2.5 reported as roll = π, pitch = π - 2.5, yaw = π
        let flipped = [0.0, 0.0, 0.0, PI, PI - 2.5, PI];
        assert!(bounds.contains(&flipped, 1e-9));
        let flipped_negative = [0.0, 0.0, 0.0, -PI, -(PI - 2.5), -PI];
        assert!(bounds.contains(&flipped_negative, 1e-9));

        // A genuine roll is still rejected
        assert!(!bounds.contains(&[0.0, 0.0, 0.0, 0.3, 0.2, 0.0], 1e-9));
    }

    #[test]
    fn bounded_pitch_rejects_flipped_decomposition() {
        let bounds = BoundsBox::zero().with_symmetric(Axis::Pitch, 1.0).unwrap();
        // Same rotation as pitch 2.5, outside a ±1 rad pitch bound either way
        assert!(!bounds.contains(&[0.0, 0.0, 0.0, PI, PI - 2.5, PI], 1e-9));
    }
}
