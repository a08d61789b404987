//! Task Space Region factories for the HERB robot.
//!
//! A Task Space Region (TSR) bounds the poses an end effector may take
//! relative to a reference frame. Factories turn a robot snapshot and a
//! scene object into ordered TSR chains that a constrained planner can
//! sample goals from or project trajectories onto.
//!
//! # Architecture
//!
//! ```text
//! RobotSnapshot ─┐
//! SceneObject  ──┼─► TsrContext ──► TsrRegistry ──► factory ──► Vec<Chain>
//! TsrConfig    ──┘                   (robot, object, task)
//! ```
//!
//! Factories never mutate the robot. [`TsrRegistry::build_as`] selects a
//! manipulator for one call and restores the previous selection afterwards.

pub mod bounds;
pub mod chain;
pub mod context;
pub mod factories;
pub mod region;
pub mod registry;

pub use bounds::BoundsBox;
pub use chain::{Chain, ChainFlags};
pub use context::TsrContext;
pub use factories::{HandleSelector, OrientationTolerance};
pub use region::{BodyLink, Region};
pub use registry::{FactoryFn, FactoryKey, TaskKind, TaskRequest, TsrRegistry};
