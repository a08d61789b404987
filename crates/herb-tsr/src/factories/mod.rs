//! Region factories, grouped by task.
//!
//! Each factory is a plain function of a [`TsrContext`](crate::TsrContext)
//! and its task parameters. Which object kinds a factory serves is decided
//! by the [`TsrRegistry`](crate::TsrRegistry).

pub mod grasp;
pub mod lift;
pub mod place;
pub mod surface;
pub mod tray;

pub use grasp::{grasp, push_grasp};
pub use lift::{DEFAULT_LIFT_DISTANCE, lift};
pub use place::{OrientationTolerance, place, transport};
pub use surface::{given_point_on, point_on};
pub use tray::{HandleSelector, closest_index, dual_arm_lift, handle_grasp, handle_poses};
