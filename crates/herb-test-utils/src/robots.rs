//! Robot snapshot fixtures.

use herb_core::pose::{Pose, translation};
use herb_core::robot::{RobotKind, RobotSnapshot};
use herb_core::scene::SceneObject;

/// End-effector link of the left arm.
pub const LEFT_LINK: &str = "/left/wam7";
/// End-effector link of the right arm.
pub const RIGHT_LINK: &str = "/right/wam7";

fn herb(left: Pose, right: Pose) -> RobotSnapshot {
    RobotSnapshot::new("herb", RobotKind::Herb)
        .with_manipulator("left", LEFT_LINK, left)
        .with_manipulator("right", RIGHT_LINK, right)
        .with_active("right")
        .unwrap()
}

/// HERB with the right hand (index 1, active) at the world origin.
///
/// The left hand (index 0) is parked out of the way.
pub fn herb_at_identity() -> RobotSnapshot {
    herb(translation(0.0, 0.6, 1.2), Pose::identity())
}

/// HERB with both hands forward at table height, right arm active.
///
/// Left (index 0) is at `(0.6, 0.3, 0.9)`, right (index 1) at
/// `(0.6, -0.3, 0.9)`.
pub fn herb_two_arms() -> RobotSnapshot {
    herb(translation(0.6, 0.3, 0.9), translation(0.6, -0.3, 0.9))
}

/// HERB with the right hand holding `object` with `grasp_in_object`.
pub fn herb_holding(object: &SceneObject, grasp_in_object: Pose) -> RobotSnapshot {
    herb(translation(0.0, 0.6, 1.2), object.pose * grasp_in_object)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
