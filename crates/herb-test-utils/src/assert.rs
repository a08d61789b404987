//! Pose comparison helpers.

use approx::relative_eq;
use herb_core::pose::Pose;

/// Assert two poses agree in translation and rotation to within `epsilon`.
///
/// # Panics
///
/// If the poses differ.
#[track_caller]
pub fn assert_pose_eq(actual: &Pose, expected: &Pose, epsilon: f64) {
    let translation_ok = relative_eq!(
        actual.translation.vector,
        expected.translation.vector,
        epsilon = epsilon
    );
    let angle = actual.rotation.angle_to(&expected.rotation);
    assert!(
        translation_ok && angle <= epsilon,
        "poses differ:\n  actual:   {actual}\n  expected: {expected}"
    );
}
