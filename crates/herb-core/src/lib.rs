//! herb-core: poses, robot model, scene, config and errors for HERB task space regions.

pub mod config;
pub mod error;
pub mod pose;
pub mod robot;
pub mod scene;

pub mod prelude {
    pub use crate::config::{SceneConfig, TsrConfig};
    pub use crate::error::{ConfigError, HerbError, ManipulatorError, ParameterError, RegistryError};
    pub use crate::pose::{Axis, Pose, PoseConfig};
    pub use crate::robot::{
        ActiveManipulatorGuard, ManipulatorHandle, ManipulatorIndex, Robot, RobotKind,
        RobotSnapshot,
    };
    pub use crate::scene::{ObjectKind, Scene, SceneObject};
}
