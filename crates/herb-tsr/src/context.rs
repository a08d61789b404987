//! Inputs shared by every factory call.

use herb_core::config::TsrConfig;
use herb_core::error::{ManipulatorError, RegistryError};
use herb_core::pose::Pose;
use herb_core::robot::{ManipulatorHandle, ManipulatorIndex, Robot};
use herb_core::scene::SceneObject;

/// Robot snapshot, target object, manipulator and constants for one
/// factory invocation.
///
/// The manipulator is either set explicitly or falls back to the robot's
/// active manipulator at the moment it is resolved.
#[derive(Clone, Copy)]
pub struct TsrContext<'a> {
    robot: &'a dyn Robot,
    object: &'a SceneObject,
    config: &'a TsrConfig,
    manipulator: Option<ManipulatorIndex>,
}

impl<'a> TsrContext<'a> {
    pub fn new(robot: &'a dyn Robot, object: &'a SceneObject, config: &'a TsrConfig) -> Self {
        Self {
            robot,
            object,
            config,
            manipulator: None,
        }
    }

    /// Target a specific manipulator by index.
    pub fn with_manipulator(mut self, index: ManipulatorIndex) -> Result<Self, ManipulatorError> {
        self.manipulator = Some(self.robot.check_index(index)?);
        Ok(self)
    }

    /// Target the manipulator behind `handle`, which must belong to this
    /// context's robot.
    pub fn with_handle(mut self, handle: &ManipulatorHandle) -> Result<Self, ManipulatorError> {
        self.manipulator = Some(self.robot.check_handle(handle)?);
        Ok(self)
    }

    pub fn robot(&self) -> &'a dyn Robot {
        self.robot
    }

    pub const fn object(&self) -> &'a SceneObject {
        self.object
    }

    pub const fn object_pose(&self) -> &'a Pose {
        &self.object.pose
    }

    pub const fn config(&self) -> &'a TsrConfig {
        self.config
    }

    /// The manipulator this call constrains.
    pub fn manipulator(&self) -> Result<ManipulatorIndex, ManipulatorError> {
        match self.manipulator {
            Some(index) => Ok(index),
            None => {
                let active = self
                    .robot
                    .active_manipulator()
                    .ok_or(ManipulatorError::NoneActive)?;
                self.robot.check_index(active)
            }
        }
    }

    /// Current end-effector pose of [`manipulator`](Self::manipulator).
    pub fn end_effector(&self) -> Result<Pose, ManipulatorError> {
        self.robot.end_effector_transform(self.manipulator()?)
    }

    /// Error for a task this context's object does not support.
    pub(crate) fn unsupported(&self, task: &str) -> RegistryError {
        RegistryError::NoFactory {
            robot: self.robot.kind().to_string(),
            object: self.object.kind.to_string(),
            task: task.to_owned(),
        }
    }
}

impl std::fmt::Debug for TsrContext<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TsrContext")
            .field("robot", &self.robot.name())
            .field("object", &self.object.name)
            .field("manipulator", &self.manipulator)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
