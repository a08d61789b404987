//! Placing and carrying an object that is already in the hand.

use herb_core::error::{HerbError, ManipulatorError, ParameterError};
use herb_core::pose::{Axis, Pose, raised, relative};

use crate::bounds::BoundsBox;
use crate::chain::Chain;
use crate::context::TsrContext;
use crate::region::Region;

/// Put the held object down on a pose sampled from `pose_chain`.
///
/// The returned chain is `pose_chain`'s regions followed by one region
/// that carries the current hand-to-object offset, lifted slightly so the
/// object is released just above the surface.
pub fn place(ctx: &TsrContext<'_>, pose_chain: &Chain) -> Result<Vec<Chain>, HerbError> {
    let manipulator = ctx.manipulator()?;
    if let Some((position, region)) = pose_chain
        .regions()
        .iter()
        .enumerate()
        .find(|(_, r)| r.manipulator() != manipulator)
    {
        return Err(ManipulatorError::Mismatch {
            position,
            expected: manipulator,
            found: region.manipulator(),
        }
        .into());
    }

    let place = &ctx.config().place;
    let end_effector_in_object = relative(ctx.object_pose(), &ctx.end_effector()?);
    let bounds = BoundsBox::zero().with_axis(Axis::Z, 0.0, place.vertical_slack)?;
    let release = Region::new(
        Pose::identity(),
        raised(&end_effector_in_object, place.release_height),
        bounds,
        manipulator,
    );

    let mut regions = pose_chain.regions().to_vec();
    regions.push(release);
    Ok(vec![Chain::goal(regions)?])
}

/// Per-axis rotational slack for [`transport`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientationTolerance {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl OrientationTolerance {
    pub const fn uniform(epsilon: f64) -> Self {
        Self {
            roll: epsilon,
            pitch: epsilon,
            yaw: epsilon,
        }
    }
}

/// Keep the held object's orientation steady for the whole trajectory
/// while leaving its position free.
pub fn transport(
    ctx: &TsrContext<'_>,
    tolerance: OrientationTolerance,
) -> Result<Vec<Chain>, HerbError> {
    let roll = ParameterError::check_non_negative("roll_epsilon", tolerance.roll)?;
    let pitch = ParameterError::check_non_negative("pitch_epsilon", tolerance.pitch)?;
    let yaw = ParameterError::check_non_negative("yaw_epsilon", tolerance.yaw)?;

    let manipulator = ctx.manipulator()?;
    let reach = ctx.config().transport.reach;
    let object = *ctx.object_pose();
    let end_effector_in_object = relative(&object, &ctx.end_effector()?);

    let bounds = BoundsBox::zero()
        .with_symmetric(Axis::X, reach)?
        .with_symmetric(Axis::Y, reach)?
        .with_symmetric(Axis::Z, reach)?
        .with_symmetric(Axis::Roll, roll)?
        .with_symmetric(Axis::Pitch, pitch)?
        .with_symmetric(Axis::Yaw, yaw)?;

    let region = Region::new(object, end_effector_in_object, bounds, manipulator);
    Ok(vec![Chain::constraint(vec![region])?])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use herb_core::config::TsrConfig;
    use herb_core::pose::{pose_from_xyz_rpy, translation};
    use herb_core::robot::ManipulatorIndex;
    use herb_test_utils::{glass_at, herb_holding};

    fn surface_chain(manipulator: usize) -> Chain {
        let bounds = BoundsBox::zero().with_symmetric(Axis::X, 0.2).unwrap();
        Chain::goal(vec![Region::new(
            translation(1.0, 0.0, 0.75),
            Pose::identity(),
            bounds,
            ManipulatorIndex(manipulator),
        )])
        .unwrap()
    }

    #[test]
    fn place_appends_release_region() {
        let glass = glass_at(0.8, -0.2, 0.9);
        let robot = herb_holding(&glass, translation(-0.225, 0.0, 0.08));
        let config = TsrConfig::default();
        let ctx = TsrContext::new(&robot, &glass, &config);

        let pose_chain = surface_chain(1);
        let chains = place(&ctx, &pose_chain).unwrap();
        assert_eq!(chains.len(), 1);
        let chain = &chains[0];
        assert!(chain.flags().sample_goal);
        assert_eq!(chain.len(), 2);
        assert_eq!(&chain.regions()[0], &pose_chain.regions()[0]);

        let release = &chain.regions()[1];
        assert_eq!(*release.reference(), Pose::identity());
        assert_relative_eq!(release.offset().translation.x, -0.225, epsilon = 1e-12);
        assert_relative_eq!(release.offset().translation.z, 0.1, epsilon = 1e-12);
        assert_eq!(release.bounds().interval(Axis::Z), [0.0, 0.04]);
    }

    #[test]
    fn place_rejects_chain_for_other_manipulator() {
        let glass = glass_at(0.8, -0.2, 0.9);
        let robot = herb_holding(&glass, translation(-0.225, 0.0, 0.08));
        let config = TsrConfig::default();
        let ctx = TsrContext::new(&robot, &glass, &config);

        let mut regions = surface_chain(1).into_regions();
        regions.extend(surface_chain(0).into_regions());
        let mixed = Chain::goal(regions).unwrap();

        let err = place(&ctx, &mixed).unwrap_err();
        assert!(matches!(
            err,
            HerbError::Manipulator(ManipulatorError::Mismatch {
                position: 1,
                expected: ManipulatorIndex(1),
                found: ManipulatorIndex(0),
            })
        ));
    }

    #[test]
    fn transport_constrains_orientation_only() {
        let glass = glass_at(0.8, -0.2, 0.9);
        let robot = herb_holding(&glass, translation(-0.225, 0.0, 0.08));
        let config = TsrConfig::default();
        let ctx = TsrContext::new(&robot, &glass, &config);

        let chains = transport(&ctx, OrientationTolerance::uniform(0.2)).unwrap();
        assert_eq!(chains.len(), 1);
        assert!(chains[0].flags().constrain);
        let region = &chains[0].regions()[0];
        for axis in [Axis::X, Axis::Y, Axis::Z] {
            assert_eq!(region.bounds().interval(axis), [-100.0, 100.0]);
        }
        for axis in [Axis::Roll, Axis::Pitch, Axis::Yaw] {
            assert_eq!(region.bounds().interval(axis), [-0.2, 0.2]);
        }

        // The current grasp is the nominal pose of the constraint
        let ee = ctx.end_effector().unwrap();
        assert_relative_eq!(
            region.nominal_pose().translation.vector,
            ee.translation.vector,
            epsilon = 1e-12
        );
        assert!(region.contains(&ee, 1e-9));
        let tipped = ee * pose_from_xyz_rpy([0.0; 3], [0.5, 0.0, 0.0]);
        assert!(!region.contains(&tipped, 1e-9));
    }

    #[test]
    fn transport_rejects_negative_tolerance() {
        let glass = glass_at(0.8, -0.2, 0.9);
        let robot = herb_holding(&glass, translation(-0.225, 0.0, 0.08));
        let config = TsrConfig::default();
        let ctx = TsrContext::new(&robot, &glass, &config);
        let tolerance = OrientationTolerance {
            pitch: -0.1,
            ..OrientationTolerance::uniform(0.2)
        };
        assert!(matches!(
            transport(&ctx, tolerance),
            Err(HerbError::Parameter(ParameterError::Negative {
                name: "pitch_epsilon",
                ..
            }))
        ));
    }
}
