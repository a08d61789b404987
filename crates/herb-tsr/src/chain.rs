//! Ordered region chains handed to a planner.
//!
//! Later regions in a chain are composed onto earlier ones, which is how a
//! grasp offset is stacked on top of a placement-pose region.

use serde::Serialize;

use herb_core::error::ConfigError;
use herb_core::robot::ManipulatorIndex;

use crate::region::Region;

/// How a planner should use a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct ChainFlags {
    /// The chain constrains the start configuration.
    pub sample_start: bool,
    /// The chain constrains the goal configuration.
    pub sample_goal: bool,
    /// The chain constrains every waypoint of the trajectory.
    pub constrain: bool,
}

impl ChainFlags {
    pub const GOAL: Self = Self {
        sample_start: false,
        sample_goal: true,
        constrain: false,
    };

    pub const CONSTRAINT: Self = Self {
        sample_start: false,
        sample_goal: false,
        constrain: true,
    };

    pub const START: Self = Self {
        sample_start: true,
        sample_goal: false,
        constrain: false,
    };

    /// Reject flag combinations no planner can act on.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.sample_goal && self.constrain {
            return Err(ConfigError::InconsistentFlags(
                "a chain cannot both sample the goal and constrain the trajectory",
            ));
        }
        if !(self.sample_start || self.sample_goal || self.constrain) {
            return Err(ConfigError::InconsistentFlags(
                "a chain must sample the start, sample the goal, or constrain",
            ));
        }
        Ok(self)
    }
}

/// A non-empty, ordered list of regions plus usage flags.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    regions: Vec<Region>,
    flags: ChainFlags,
}

impl Chain {
    /// Assemble a chain.
    ///
    /// # Errors
    ///
    /// [`ConfigError::EmptyChain`] for an empty region list and
    /// [`ConfigError::InconsistentFlags`] for unusable flags.
    pub fn new(regions: Vec<Region>, flags: ChainFlags) -> Result<Self, ConfigError> {
        let flags = flags.validate()?;
        if regions.is_empty() {
            return Err(ConfigError::EmptyChain);
        }
        Ok(Self { regions, flags })
    }

    /// Goal-sampling chain.
    pub fn goal(regions: Vec<Region>) -> Result<Self, ConfigError> {
        Self::new(regions, ChainFlags::GOAL)
    }

    /// Trajectory-wide constraint chain.
    pub fn constraint(regions: Vec<Region>) -> Result<Self, ConfigError> {
        Self::new(regions, ChainFlags::CONSTRAINT)
    }

    /// Start-sampling chain.
    pub fn start(regions: Vec<Region>) -> Result<Self, ConfigError> {
        Self::new(regions, ChainFlags::START)
    }

    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    pub const fn flags(&self) -> ChainFlags {
        self.flags
    }

    /// Number of regions; never zero.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Distinct manipulators referenced by the chain, in first-use order.
    pub fn manipulators(&self) -> Vec<ManipulatorIndex> {
        let mut seen = Vec::new();
        for region in &self.regions {
            if !seen.contains(&region.manipulator()) {
                seen.push(region.manipulator());
            }
        }
        seen
    }

    pub fn into_regions(self) -> Vec<Region> {
        self.regions
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bounds::BoundsBox;
    use herb_core::pose::{Pose, translation};

    fn region(x: f64, manipulator: usize) -> Region {
        Region::new(
            translation(x, 0.0, 0.0),
            Pose::identity(),
            BoundsBox::zero(),
            ManipulatorIndex(manipulator),
        )
    }

    #[test]
    fn preserves_region_order() {
        let chain = Chain::goal(vec![region(1.0, 0), region(2.0, 0), region(3.0, 0)]).unwrap();
        let xs: Vec<f64> = chain
            .regions()
            .iter()
            .map(|r| r.reference().translation.x)
            .collect();
        assert_eq!(xs, vec![1.0, 2.0, 3.0]);
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn empty_chain_rejected() {
        assert!(matches!(Chain::goal(Vec::new()), Err(ConfigError::EmptyChain)));
    }

    #[test]
    fn goal_and_constrain_are_exclusive() {
        let flags = ChainFlags {
            sample_start: false,
            sample_goal: true,
            constrain: true,
        };
        assert!(matches!(
            Chain::new(vec![region(0.0, 0)], flags),
            Err(ConfigError::InconsistentFlags(_))
        ));
    }

    #[test]
    fn chain_needs_a_role() {
        assert!(matches!(
            Chain::new(vec![region(0.0, 0)], ChainFlags::default()),
            Err(ConfigError::InconsistentFlags(_))
        ));
    }

    #[test]
    fn start_and_constrain_allowed() {
        let flags = ChainFlags {
            sample_start: true,
            sample_goal: false,
            constrain: true,
        };
        assert!(Chain::new(vec![region(0.0, 0)], flags).is_ok());
    }

    #[test]
    fn convenience_constructors_set_flags() {
        assert_eq!(Chain::goal(vec![region(0.0, 0)]).unwrap().flags(), ChainFlags::GOAL);
        assert_eq!(
            Chain::constraint(vec![region(0.0, 0)]).unwrap().flags(),
            ChainFlags::CONSTRAINT
        );
        assert_eq!(Chain::start(vec![region(0.0, 0)]).unwrap().flags(), ChainFlags::START);
    }

    #[test]
    fn manipulators_are_distinct_in_order() {
        let chain = Chain::goal(vec![region(0.0, 1), region(0.0, 0), region(0.0, 1)]).unwrap();
        assert_eq!(
            chain.manipulators(),
            vec![ManipulatorIndex(1), ManipulatorIndex(0)]
        );
    }
}
