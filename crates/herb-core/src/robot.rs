//! Robot and manipulator model consumed by TSR factories.
//!
//! Factories only ever read from a [`Robot`]: manipulator lookup,
//! end-effector poses, and the currently active manipulator. The one
//! mutation, selecting the active manipulator, goes through
//! [`ActiveManipulatorGuard`] so the previous selection is always restored.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ManipulatorError, RegistryError};
use crate::pose::Pose;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Index of a manipulator on its robot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManipulatorIndex(pub usize);

impl fmt::Display for ManipulatorIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Robot families with registered factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotKind {
    #[default]
    Herb,
}

impl RobotKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Herb => "herb",
        }
    }
}

impl fmt::Display for RobotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RobotKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "herb" => Ok(Self::Herb),
            other => Err(RegistryError::UnknownRobot(other.to_owned())),
        }
    }
}

/// A manipulator reference that remembers which robot it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManipulatorHandle {
    pub robot: String,
    pub name: String,
    pub index: ManipulatorIndex,
}

// ---------------------------------------------------------------------------
// Robot trait
// ---------------------------------------------------------------------------

/// Read access to a robot's manipulators, plus active-manipulator selection.
pub trait Robot {
    /// Robot instance name (used as the body name in relative frames).
    fn name(&self) -> &str;

    fn kind(&self) -> RobotKind;

    fn manipulator_count(&self) -> usize;

    /// Name of the manipulator at `index`.
    fn manipulator_name(&self, index: ManipulatorIndex) -> Result<&str, ManipulatorError>;

    /// Index of the manipulator called `name`.
    fn manipulator_index(&self, name: &str) -> Result<ManipulatorIndex, ManipulatorError>;

    fn active_manipulator(&self) -> Option<ManipulatorIndex>;

    /// Select the active manipulator. Callers should prefer
    /// [`ActiveManipulatorGuard`], which restores the previous selection.
    fn set_active_manipulator(&mut self, index: Option<ManipulatorIndex>);

    /// Current end-effector pose in the world frame.
    fn end_effector_transform(&self, index: ManipulatorIndex) -> Result<Pose, ManipulatorError>;

    /// Name of the end-effector link of a manipulator.
    fn end_effector_link(&self, index: ManipulatorIndex) -> Result<&str, ManipulatorError>;

    /// Look up a manipulator by name and return a handle bound to this robot.
    fn manipulator(&self, name: &str) -> Result<ManipulatorHandle, ManipulatorError> {
        let index = self.manipulator_index(name)?;
        Ok(ManipulatorHandle {
            robot: self.name().to_owned(),
            name: name.to_owned(),
            index,
        })
    }

    /// Validate `index` against this robot.
    fn check_index(&self, index: ManipulatorIndex) -> Result<ManipulatorIndex, ManipulatorError> {
        let count = self.manipulator_count();
        if index.0 < count {
            Ok(index)
        } else {
            Err(ManipulatorError::UnknownIndex { index, count })
        }
    }

    /// Validate a handle: it must come from this robot and still resolve.
    fn check_handle(&self, handle: &ManipulatorHandle) -> Result<ManipulatorIndex, ManipulatorError> {
        if handle.robot != self.name() {
            return Err(ManipulatorError::ForeignRobot {
                manipulator: handle.name.clone(),
                owner: handle.robot.clone(),
                robot: self.name().to_owned(),
            });
        }
        self.check_index(handle.index)
    }
}

// ---------------------------------------------------------------------------
// ActiveManipulatorGuard
// ---------------------------------------------------------------------------

/// Scoped active-manipulator selection.
///
/// Activates a manipulator on construction and restores the previous
/// selection when dropped, including on early returns and unwinding.
pub struct ActiveManipulatorGuard<'a, R: Robot + ?Sized> {
    robot: &'a mut R,
    previous: Option<ManipulatorIndex>,
}

impl<'a, R: Robot + ?Sized> ActiveManipulatorGuard<'a, R> {
    /// Activate `index` on `robot` for the lifetime of the guard.
    pub fn activate(robot: &'a mut R, index: ManipulatorIndex) -> Result<Self, ManipulatorError> {
        robot.check_index(index)?;
        let previous = robot.active_manipulator();
        robot.set_active_manipulator(Some(index));
        tracing::trace!(?previous, active = %index, "activated manipulator");
        Ok(Self { robot, previous })
    }

    /// Selection that will be restored on drop.
    pub const fn previous(&self) -> Option<ManipulatorIndex> {
        self.previous
    }
}

impl<R: Robot + ?Sized> Deref for ActiveManipulatorGuard<'_, R> {
    type Target = R;

    fn deref(&self) -> &R {
        self.robot
    }
}

impl<R: Robot + ?Sized> DerefMut for ActiveManipulatorGuard<'_, R> {
    fn deref_mut(&mut self) -> &mut R {
        self.robot
    }
}

impl<R: Robot + ?Sized> Drop for ActiveManipulatorGuard<'_, R> {
    fn drop(&mut self) {
        self.robot.set_active_manipulator(self.previous);
    }
}

// ---------------------------------------------------------------------------
// RobotSnapshot
// ---------------------------------------------------------------------------

/// State of one manipulator at snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct ManipulatorState {
    pub name: String,
    pub end_effector_link: String,
    pub end_effector: Pose,
}

/// An immutable-by-default snapshot of a robot's manipulators.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotSnapshot {
    name: String,
    kind: RobotKind,
    manipulators: Vec<ManipulatorState>,
    active: Option<ManipulatorIndex>,
}

impl RobotSnapshot {
    pub fn new(name: impl Into<String>, kind: RobotKind) -> Self {
        Self {
            name: name.into(),
            kind,
            manipulators: Vec::new(),
            active: None,
        }
    }

    /// Append a manipulator and return its index.
    pub fn add_manipulator(&mut self, state: ManipulatorState) -> ManipulatorIndex {
        self.manipulators.push(state);
        ManipulatorIndex(self.manipulators.len() - 1)
    }

    /// Builder form of [`add_manipulator`](Self::add_manipulator).
    #[must_use]
    pub fn with_manipulator(
        mut self,
        name: impl Into<String>,
        end_effector_link: impl Into<String>,
        end_effector: Pose,
    ) -> Self {
        self.add_manipulator(ManipulatorState {
            name: name.into(),
            end_effector_link: end_effector_link.into(),
            end_effector,
        });
        self
    }

    /// Builder form of active selection by name.
    pub fn with_active(mut self, name: &str) -> Result<Self, ManipulatorError> {
        let index = self.manipulator_index(name)?;
        self.active = Some(index);
        Ok(self)
    }

    pub fn manipulators(&self) -> &[ManipulatorState] {
        &self.manipulators
    }

    /// Overwrite a manipulator's end-effector pose.
    pub fn set_end_effector(
        &mut self,
        index: ManipulatorIndex,
        pose: Pose,
    ) -> Result<(), ManipulatorError> {
        let count = self.manipulators.len();
        let state = self
            .manipulators
            .get_mut(index.0)
            .ok_or(ManipulatorError::UnknownIndex { index, count })?;
        state.end_effector = pose;
        Ok(())
    }

    fn state(&self, index: ManipulatorIndex) -> Result<&ManipulatorState, ManipulatorError> {
        self.manipulators
            .get(index.0)
            .ok_or(ManipulatorError::UnknownIndex {
                index,
                count: self.manipulators.len(),
            })
    }
}

impl Robot for RobotSnapshot {
    fn name(&self) -> &str {
        &self.name
    }

    fn kind(&self) -> RobotKind {
        self.kind
    }

    fn manipulator_count(&self) -> usize {
        self.manipulators.len()
    }

    fn manipulator_name(&self, index: ManipulatorIndex) -> Result<&str, ManipulatorError> {
        self.state(index).map(|m| m.name.as_str())
    }

    fn manipulator_index(&self, name: &str) -> Result<ManipulatorIndex, ManipulatorError> {
        self.manipulators
            .iter()
            .position(|m| m.name == name)
            .map(ManipulatorIndex)
            .ok_or_else(|| ManipulatorError::UnknownName(name.to_owned()))
    }

    fn active_manipulator(&self) -> Option<ManipulatorIndex> {
        self.active
    }

    fn set_active_manipulator(&mut self, index: Option<ManipulatorIndex>) {
        self.active = index;
    }

    fn end_effector_transform(&self, index: ManipulatorIndex) -> Result<Pose, ManipulatorError> {
        self.state(index).map(|m| m.end_effector)
    }

    fn end_effector_link(&self, index: ManipulatorIndex) -> Result<&str, ManipulatorError> {
        self.state(index).map(|m| m.end_effector_link.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
