//! Two-handled tray: handle grasps and the two-arm lift.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use herb_core::error::{HerbError, ParameterError};
use herb_core::pose::{Axis, Pose, planar_distance, pose_from_rows, raised, relative, translation};

use crate::bounds::BoundsBox;
use crate::chain::Chain;
use crate::context::TsrContext;
use crate::region::Region;

/// Which tray handles to produce grasps for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HandleSelector {
    /// One chain per handle.
    #[default]
    All,
    /// Only the handle nearest the end effector in the XY plane.
    Closest,
}

impl FromStr for HandleSelector {
    type Err = Infallible;

    /// `"closest"` selects the nearest handle; anything else selects all.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(if s == "closest" { Self::Closest } else { Self::All })
    }
}

impl fmt::Display for HandleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Closest => "closest",
        })
    }
}

/// World poses of the two handles, in candidate order.
pub fn handle_poses(ctx: &TsrContext<'_>) -> [Pose; 2] {
    let offset = ctx.config().tray_handles.offset;
    let tray = ctx.object_pose();
    [
        tray * translation(0.0, -offset, 0.0),
        tray * translation(0.0, offset, 0.0),
    ]
}

/// Index of the candidate nearest `target` in the XY plane; the first
/// candidate wins ties.
pub fn closest_index(candidates: &[Pose], target: &Pose) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, candidate) in candidates.iter().enumerate() {
        let distance = planar_distance(candidate, target);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((i, distance));
        }
    }
    best.map(|(i, _)| i)
}

/// Grasp a tray handle from above.
pub fn handle_grasp(
    ctx: &TsrContext<'_>,
    selector: HandleSelector,
) -> Result<Vec<Chain>, HerbError> {
    let manipulator = ctx.manipulator()?;
    let geometry = &ctx.config().tray_handles;

    let grasp_in_handle = pose_from_rows([
        [0.0, 1.0, 0.0, 0.0],
        [1.0, 0.0, 0.0, 0.0],
        [0.0, 0.0, -1.0, geometry.grasp_height],
    ])?;
    let bounds = BoundsBox::zero()
        .with_axis(Axis::X, 0.0, geometry.slide)?
        .with_symmetric(Axis::Z, geometry.vertical_slack)?
        .with_symmetric(Axis::Yaw, geometry.yaw_tolerance_deg.to_radians())?;

    let handles = handle_poses(ctx);
    let selected: Vec<&Pose> = match selector {
        HandleSelector::All => handles.iter().collect(),
        HandleSelector::Closest => {
            let end_effector = ctx.end_effector()?;
            closest_index(&handles, &end_effector)
                .map(|i| &handles[i])
                .into_iter()
                .collect()
        }
    };
    tracing::debug!(%selector, count = selected.len(), "tray handle grasp");

    selected
        .into_iter()
        .map(|handle| -> Result<Chain, HerbError> {
            let region = Region::new(*handle, grasp_in_handle, bounds, manipulator);
            Ok(Chain::goal(vec![region])?)
        })
        .collect()
}

/// Lift the tray `distance` along world Z with both arms.
///
/// Returns `[coupling, right_goal, left_goal]`. The coupling constraint
/// holds the left hand at its current pose relative to the right hand for
/// the whole trajectory.
pub fn dual_arm_lift(ctx: &TsrContext<'_>, distance: f64) -> Result<Vec<Chain>, HerbError> {
    let distance = ParameterError::check_finite("distance", distance)?;
    tracing::debug!(object = %ctx.object().name, "distance = {distance:.2}");

    let robot = ctx.robot();
    let names = &ctx.config().dual_arm;
    let left = robot.manipulator_index(&names.left)?;
    let right = robot.manipulator_index(&names.right)?;

    let tray = ctx.object_pose();
    let left_in_world = robot.end_effector_transform(left)?;
    let right_in_world = robot.end_effector_transform(right)?;
    let desired_tray = raised(tray, distance);

    let right_goal = Region::new(
        desired_tray,
        relative(tray, &right_in_world),
        BoundsBox::zero(),
        right,
    );
    let left_goal = Region::new(
        desired_tray,
        relative(tray, &left_in_world),
        BoundsBox::zero(),
        left,
    );
    let coupling = Region::new(
        Pose::identity(),
        relative(&right_in_world, &left_in_world),
        BoundsBox::zero(),
        left,
    )
    .relative_to(robot.name(), robot.end_effector_link(right)?);

    Ok(vec![
        Chain::constraint(vec![coupling])?,
        Chain::goal(vec![right_goal])?,
        Chain::goal(vec![left_goal])?,
    ])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use herb_core::config::TsrConfig;
    use herb_core::robot::{ManipulatorIndex, Robot};
    use herb_test_utils::{herb_two_arms, tray_at};

    #[test]
    fn selector_parsing() {
        assert_eq!("closest".parse::<HandleSelector>(), Ok(HandleSelector::Closest));
        assert_eq!("both".parse::<HandleSelector>(), Ok(HandleSelector::All));
        assert_eq!("".parse::<HandleSelector>(), Ok(HandleSelector::All));
    }

    #[test]
    fn closest_index_prefers_first_on_tie() {
        let candidates = [translation(0.0, -1.0, 0.0), translation(0.0, 1.0, 0.0)];
        assert_eq!(closest_index(&candidates, &Pose::identity()), Some(0));
        assert_eq!(
            closest_index(&candidates, &translation(0.0, 0.2, 5.0)),
            Some(1)
        );
        assert_eq!(closest_index(&[], &Pose::identity()), None);
    }

    #[test]
    fn all_handles_in_candidate_order() {
        let robot = herb_two_arms();
        let tray = tray_at(0.7, 0.0, 0.8);
        let config = TsrConfig::default();
        let ctx = TsrContext::new(&robot, &tray, &config);

        let chains = handle_grasp(&ctx, HandleSelector::All).unwrap();
        assert_eq!(chains.len(), 2);
        assert_relative_eq!(chains[0].regions()[0].reference().translation.y, -0.33);
        assert_relative_eq!(chains[1].regions()[0].reference().translation.y, 0.33);

        let bounds = chains[0].regions()[0].bounds();
        assert_eq!(bounds.interval(Axis::X), [0.0, 0.03]);
        assert_eq!(bounds.interval(Axis::Z), [-0.01, 0.01]);
        assert_relative_eq!(bounds.max(Axis::Yaw), 5f64.to_radians());
    }

    #[test]
    fn closest_handle_follows_end_effector() {
        // Right hand is on the -y side, left hand on +y
        let robot = herb_two_arms();
        let tray = tray_at(0.7, 0.0, 0.8);
        let config = TsrConfig::default();

        let right = robot.manipulator("right").unwrap();
        let ctx = TsrContext::new(&robot, &tray, &config).with_handle(&right).unwrap();
        let chains = handle_grasp(&ctx, HandleSelector::Closest).unwrap();
        assert_eq!(chains.len(), 1);
        assert!(chains[0].regions()[0].reference().translation.y < 0.0);

        let left = robot.manipulator("left").unwrap();
        let ctx = TsrContext::new(&robot, &tray, &config).with_handle(&left).unwrap();
        let chains = handle_grasp(&ctx, HandleSelector::Closest).unwrap();
        assert_eq!(chains.len(), 1);
        assert!(chains[0].regions()[0].reference().translation.y > 0.0);
        assert_eq!(chains[0].regions()[0].manipulator(), ManipulatorIndex(0));
    }

    #[test]
    fn dual_arm_lift_structure() {
        let robot = herb_two_arms();
        let tray = tray_at(0.7, 0.0, 0.8);
        let config = TsrConfig::default();
        let ctx = TsrContext::new(&robot, &tray, &config);

        let chains = dual_arm_lift(&ctx, 0.1).unwrap();
        assert_eq!(chains.len(), 3);
        assert!(chains[0].flags().constrain);
        assert!(chains[1].flags().sample_goal);
        assert!(chains[2].flags().sample_goal);

        let coupling = &chains[0].regions()[0];
        assert_eq!(coupling.manipulator(), ManipulatorIndex(0));
        let frame = coupling.relative_frame().unwrap();
        assert_eq!(frame.body, "herb");
        assert_eq!(frame.link, "/right/wam7");

        let right_goal = &chains[1].regions()[0];
        let left_goal = &chains[2].regions()[0];
        assert_eq!(right_goal.manipulator(), ManipulatorIndex(1));
        assert_eq!(left_goal.manipulator(), ManipulatorIndex(0));
        assert_relative_eq!(right_goal.reference().translation.z, 0.9, epsilon = 1e-12);
        assert_eq!(right_goal.bounds(), &BoundsBox::zero());

        // Each goal puts its hand exactly `distance` above where it is now
        let right_now = robot.end_effector_transform(ManipulatorIndex(1)).unwrap();
        assert_relative_eq!(
            right_goal.nominal_pose().translation.vector,
            raised(&right_now, 0.1).translation.vector,
            epsilon = 1e-12
        );

        // Coupling reproduces the left hand from the right hand
        let left_now = robot.end_effector_transform(ManipulatorIndex(0)).unwrap();
        let rebuilt = right_now * coupling.offset();
        assert_relative_eq!(
            rebuilt.translation.vector,
            left_now.translation.vector,
            epsilon = 1e-12
        );
    }

    #[test]
    fn dual_arm_lift_needs_both_arms() {
        let robot = herb_two_arms();
        let tray = tray_at(0.7, 0.0, 0.8);
        let mut config = TsrConfig::default();
        config.dual_arm.left = "head".into();
        let ctx = TsrContext::new(&robot, &tray, &config);
        assert!(matches!(
            dual_arm_lift(&ctx, 0.1),
            Err(HerbError::Manipulator(_))
        ));
    }
}
