//! Side grasps of upright cylindrical objects (bottle, glass).

use herb_core::error::{HerbError, ParameterError};
use herb_core::pose::{Axis, Pose, pose_from_rows};

use crate::bounds::BoundsBox;
use crate::chain::Chain;
use crate::context::TsrContext;
use crate::region::Region;

/// Grasp the object from the side with the palm `push_distance` further
/// back than a direct grasp.
///
/// The end effector approaches along its own Z axis, which the offset
/// aligns with the object's X axis; free yaw about the object lets the
/// approach come from any direction.
pub fn grasp(ctx: &TsrContext<'_>, push_distance: f64) -> Result<Vec<Chain>, HerbError> {
    let push_distance = ParameterError::check_non_negative("push_distance", push_distance)?;
    let kind = ctx.object().kind;
    let geometry = ctx
        .config()
        .grasp_geometry(kind)
        .ok_or_else(|| ctx.unsupported("grasp"))?;

    let manipulator = ctx.manipulator()?;
    let offset = grasp_offset(geometry.offset_distance(push_distance), geometry.height)?;
    let bounds = BoundsBox::zero()
        .with_axis(Axis::Z, 0.0, ctx.config().grasp_vertical_slack)?
        .with_free_rotation(Axis::Z)?;

    let region = Region::new(*ctx.object_pose(), offset, bounds, manipulator);
    Ok(vec![Chain::goal(vec![region])?])
}

/// `grasp` with the object's configured stand-off unless one is given.
pub fn push_grasp(
    ctx: &TsrContext<'_>,
    push_distance: Option<f64>,
) -> Result<Vec<Chain>, HerbError> {
    let default = ctx
        .config()
        .grasp_geometry(ctx.object().kind)
        .ok_or_else(|| ctx.unsupported("push_grasp"))?
        .push_distance;
    grasp(ctx, push_distance.unwrap_or(default))
}

/// End-effector pose in the object frame for a stand-off of `distance`
/// at `height`.
pub fn grasp_offset(distance: f64, height: f64) -> Result<Pose, HerbError> {
    Ok(pose_from_rows([
        [0.0, 0.0, 1.0, -distance],
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 1.0, 0.0, height],
    ])?)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
