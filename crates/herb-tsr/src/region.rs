//! A single Task Space Region.
//!
//! A region admits every end-effector pose of the form
//! `reference ∘ displacement ∘ offset` where `displacement` ranges over the
//! [`BoundsBox`]. Regions are plain values: building one never queries
//! robot or object state.

use herb_core::pose::{Pose, displacement};
use herb_core::robot::ManipulatorIndex;

use crate::bounds::BoundsBox;

/// A frame attached to a robot link, used as a moving reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLink {
    pub body: String,
    pub link: String,
}

/// One bounded region of admissible poses for a single manipulator.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    reference: Pose,
    offset: Pose,
    bounds: BoundsBox,
    manipulator: ManipulatorIndex,
    relative_to: Option<BodyLink>,
}

impl Region {
    /// Region anchored at `reference`, reaching the constrained frame via
    /// `offset`, with deviation limited by `bounds`.
    pub fn new(
        reference: Pose,
        offset: Pose,
        bounds: BoundsBox,
        manipulator: ManipulatorIndex,
    ) -> Self {
        tracing::trace!(%manipulator, ?bounds, "built region");
        Self {
            reference,
            offset,
            bounds,
            manipulator,
            relative_to: None,
        }
    }

    /// Express the reference pose in the frame of a robot link instead of
    /// the world.
    #[must_use]
    pub fn relative_to(mut self, body: impl Into<String>, link: impl Into<String>) -> Self {
        self.relative_to = Some(BodyLink {
            body: body.into(),
            link: link.into(),
        });
        self
    }

    pub const fn reference(&self) -> &Pose {
        &self.reference
    }

    pub const fn offset(&self) -> &Pose {
        &self.offset
    }

    pub const fn bounds(&self) -> &BoundsBox {
        &self.bounds
    }

    pub const fn manipulator(&self) -> ManipulatorIndex {
        self.manipulator
    }

    pub const fn relative_frame(&self) -> Option<&BodyLink> {
        self.relative_to.as_ref()
    }

    /// The constrained pose at zero displacement.
    pub fn nominal_pose(&self) -> Pose {
        self.reference * self.offset
    }

    /// Displacement of `pose` from the region's reference frame, as
    /// `[x, y, z, roll, pitch, yaw]`.
    pub fn displacement_of(&self, pose: &Pose) -> [f64; 6] {
        displacement(&(self.reference.inv_mul(pose) * self.offset.inverse()))
    }

    /// Whether `pose` lies inside the region, within `tolerance`.
    pub fn contains(&self, pose: &Pose, tolerance: f64) -> bool {
        self.bounds.contains(&self.displacement_of(pose), tolerance)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
