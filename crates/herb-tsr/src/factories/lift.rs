//! Single-arm lift of a held object.

use herb_core::error::{ConfigError, HerbError, ParameterError};
use herb_core::pose::{Axis, Pose, raised};

use crate::bounds::BoundsBox;
use crate::chain::Chain;
use crate::context::TsrContext;
use crate::region::Region;

/// Lift height used when the caller does not give one (m).
pub const DEFAULT_LIFT_DISTANCE: f64 = 0.1;

/// Lift the held object `distance` along world Z.
///
/// Returns `[goal, constraint]`: a goal region at the raised end-effector
/// pose with a little lateral and yaw slack, and a trajectory constraint
/// anchored at the start pose whose vertical interval opens only in the
/// direction of travel.
pub fn lift(ctx: &TsrContext<'_>, distance: f64) -> Result<Vec<Chain>, HerbError> {
    let distance = ParameterError::check_finite("distance", distance)?;
    tracing::debug!(object = %ctx.object().name, "distance = {distance:.2}");

    let manipulator = ctx.manipulator()?;
    let start = ctx.end_effector()?;
    let epsilon = ctx.config().lift_epsilon;

    let goal_bounds = BoundsBox::zero()
        .with_symmetric(Axis::X, epsilon)?
        .with_symmetric(Axis::Y, epsilon)?
        .with_symmetric(Axis::Yaw, epsilon)?;
    let goal = Region::new(
        raised(&start, distance),
        Pose::identity(),
        goal_bounds,
        manipulator,
    );

    let constraint = Region::new(
        start,
        Pose::identity(),
        travel_bounds(epsilon, distance)?,
        manipulator,
    );

    Ok(vec![Chain::goal(vec![goal])?, Chain::constraint(vec![constraint])?])
}

/// `±epsilon` on every axis, with Z extended by `distance` toward travel.
pub fn travel_bounds(epsilon: f64, distance: f64) -> Result<BoundsBox, ConfigError> {
    let mut bounds = BoundsBox::zero();
    for axis in Axis::ALL {
        bounds = bounds.with_symmetric(axis, epsilon)?;
    }
    let (min, max) = if distance < 0.0 {
        (-epsilon + distance, epsilon)
    } else {
        (-epsilon, epsilon + distance)
    };
    bounds.with_axis(Axis::Z, min, max)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
