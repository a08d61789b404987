//! Placement poses on flat surfaces (table top, tray).
//!
//! These regions describe where an object could rest, not where the hand
//! goes; `place` stacks a grasp offset on top of them.

use herb_core::error::{HerbError, ParameterError};
use herb_core::pose::{Axis, Pose};

use crate::bounds::BoundsBox;
use crate::chain::Chain;
use crate::context::TsrContext;
use crate::region::Region;

/// Any pose on the surface at least `padding` away from its edges, with
/// free rotation about the surface normal.
pub fn point_on(ctx: &TsrContext<'_>, padding: f64) -> Result<Vec<Chain>, HerbError> {
    let padding = ParameterError::check_non_negative("padding", padding)?;
    let surface = ctx
        .config()
        .surface(ctx.object().kind)
        .ok_or_else(|| ctx.unsupported("point_on"))?;

    let mut bounds = BoundsBox::zero();
    for (axis, extent) in surface.lateral_axes.into_iter().zip(surface.half_extents) {
        if padding > extent {
            return Err(ParameterError::PaddingExceedsExtent {
                axis,
                padding,
                extent,
            }
            .into());
        }
        bounds = bounds.with_symmetric(axis, extent - padding)?;
    }
    let [low, high] = surface.normal_slack;
    bounds = bounds
        .with_axis(surface.normal, low, high)?
        .with_free_rotation(surface.normal)?;

    let region = Region::new(
        *ctx.object_pose(),
        surface.offset.to_pose(),
        bounds,
        ctx.manipulator()?,
    );
    Ok(vec![Chain::goal(vec![region])?])
}

/// A fixed point given in the surface frame, free to spin about world Z.
pub fn given_point_on(ctx: &TsrContext<'_>, point: &Pose) -> Result<Vec<Chain>, HerbError> {
    let bounds = BoundsBox::zero().with_free_rotation(Axis::Z)?;
    let region = Region::new(
        ctx.object_pose() * point,
        Pose::identity(),
        bounds,
        ctx.manipulator()?,
    );
    Ok(vec![Chain::goal(vec![region])?])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
