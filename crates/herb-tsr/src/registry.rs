//! Typed factory registry keyed by robot, object and task.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use herb_core::config::TsrConfig;
use herb_core::error::{HerbError, ParameterError, RegistryError};
use herb_core::pose::Pose;
use herb_core::robot::{ActiveManipulatorGuard, ManipulatorIndex, Robot, RobotKind};
use herb_core::scene::{ObjectKind, SceneObject};

use crate::chain::Chain;
use crate::context::TsrContext;
use crate::factories::{self, HandleSelector, OrientationTolerance};

// ---------------------------------------------------------------------------
// TaskKind
// ---------------------------------------------------------------------------

/// Named tasks a factory can describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskKind {
    Lift,
    Grasp,
    PushGrasp,
    Place,
    Transport,
    PointOn,
    GivenPointOn,
    HandleGrasp,
}

impl TaskKind {
    pub const ALL: [Self; 8] = [
        Self::Lift,
        Self::Grasp,
        Self::PushGrasp,
        Self::Place,
        Self::Transport,
        Self::PointOn,
        Self::GivenPointOn,
        Self::HandleGrasp,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Lift => "lift",
            Self::Grasp => "grasp",
            Self::PushGrasp => "push_grasp",
            Self::Place => "place",
            Self::Transport => "transport",
            Self::PointOn => "point_on",
            Self::GivenPointOn => "given_point_on",
            Self::HandleGrasp => "handle_grasp",
        }
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|task| task.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownTask(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// TaskRequest
// ---------------------------------------------------------------------------

/// A task together with its parameters.
///
/// `None` parameters take the configured default.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskRequest {
    Lift { distance: f64 },
    Grasp,
    PushGrasp { push_distance: Option<f64> },
    Place { pose_chain: Chain },
    Transport {
        roll: Option<f64>,
        pitch: Option<f64>,
        yaw: Option<f64>,
    },
    PointOn { padding: f64 },
    GivenPointOn { point: Pose },
    HandleGrasp { selector: HandleSelector },
}

impl TaskRequest {
    pub const fn kind(&self) -> TaskKind {
        match self {
            Self::Lift { .. } => TaskKind::Lift,
            Self::Grasp => TaskKind::Grasp,
            Self::PushGrasp { .. } => TaskKind::PushGrasp,
            Self::Place { .. } => TaskKind::Place,
            Self::Transport { .. } => TaskKind::Transport,
            Self::PointOn { .. } => TaskKind::PointOn,
            Self::GivenPointOn { .. } => TaskKind::GivenPointOn,
            Self::HandleGrasp { .. } => TaskKind::HandleGrasp,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FactoryKey {
    pub robot: RobotKind,
    pub object: ObjectKind,
    pub task: TaskKind,
}

impl FactoryKey {
    pub const fn new(robot: RobotKind, object: ObjectKind, task: TaskKind) -> Self {
        Self {
            robot,
            object,
            task,
        }
    }

    /// Parse a key from its three names.
    pub fn parse(robot: &str, object: &str, task: &str) -> Result<Self, RegistryError> {
        Ok(Self::new(robot.parse()?, object.parse()?, task.parse()?))
    }
}

impl fmt::Display for FactoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.robot, self.object, self.task)
    }
}

/// A registered factory.
pub type FactoryFn = fn(&TsrContext<'_>, &TaskRequest) -> Result<Vec<Chain>, HerbError>;

/// Mapping from [`FactoryKey`] to factory.
#[derive(Default, Clone)]
pub struct TsrRegistry {
    factories: HashMap<FactoryKey, FactoryFn>,
}

impl fmt::Debug for TsrRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(self.keys().iter().map(ToString::to_string))
            .finish()
    }
}

impl TsrRegistry {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every HERB factory.
    pub fn herb() -> Self {
        use ObjectKind::{ConferenceTable, FuzeBottle, PlasticGlass, Table, WickerTray};

        let entries: [(ObjectKind, TaskKind, FactoryFn); 14] = [
            (FuzeBottle, TaskKind::Lift, lift_entry),
            (FuzeBottle, TaskKind::Grasp, grasp_entry),
            (FuzeBottle, TaskKind::PushGrasp, push_grasp_entry),
            (PlasticGlass, TaskKind::Lift, lift_entry),
            (PlasticGlass, TaskKind::Grasp, grasp_entry),
            (PlasticGlass, TaskKind::PushGrasp, push_grasp_entry),
            (PlasticGlass, TaskKind::Place, place_entry),
            (PlasticGlass, TaskKind::Transport, transport_entry),
            (ConferenceTable, TaskKind::PointOn, point_on_entry),
            (ConferenceTable, TaskKind::GivenPointOn, given_point_on_entry),
            (Table, TaskKind::GivenPointOn, given_point_on_entry),
            (WickerTray, TaskKind::PointOn, point_on_entry),
            (WickerTray, TaskKind::HandleGrasp, handle_grasp_entry),
            (WickerTray, TaskKind::Lift, dual_arm_lift_entry),
        ];

        let mut registry = Self::new();
        for (object, task, factory) in entries {
            registry
                .factories
                .insert(FactoryKey::new(RobotKind::Herb, object, task), factory);
        }
        registry
    }

    /// Add a factory.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Duplicate`] if `key` is already registered.
    pub fn register(&mut self, key: FactoryKey, factory: FactoryFn) -> Result<(), RegistryError> {
        if self.factories.contains_key(&key) {
            return Err(RegistryError::Duplicate {
                robot: key.robot.to_string(),
                object: key.object.to_string(),
                task: key.task.to_string(),
            });
        }
        self.factories.insert(key, factory);
        Ok(())
    }

    /// Find the factory for `key`.
    pub fn lookup(&self, key: FactoryKey) -> Result<FactoryFn, RegistryError> {
        self.factories
            .get(&key)
            .copied()
            .ok_or_else(|| RegistryError::NoFactory {
                robot: key.robot.to_string(),
                object: key.object.to_string(),
                task: key.task.to_string(),
            })
    }

    pub fn contains(&self, key: FactoryKey) -> bool {
        self.factories.contains_key(&key)
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Registered keys, sorted by name.
    pub fn keys(&self) -> Vec<FactoryKey> {
        let mut keys: Vec<FactoryKey> = self.factories.keys().copied().collect();
        keys.sort_by_key(|k| (k.robot.as_str(), k.object.as_str(), k.task.as_str()));
        keys
    }

    /// Dispatch `request` on the context's robot and object kinds.
    pub fn build(&self, ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
        let key = FactoryKey::new(ctx.robot().kind(), ctx.object().kind, request.kind());
        let factory = self.lookup(key)?;
        tracing::debug!(%key, object = %ctx.object().name, "building TSR chains");
        factory(ctx, request)
    }

    /// Dispatch with `manipulator` made active on `robot` for the duration
    /// of the call. The previous selection is restored afterwards, whether
    /// or not the factory succeeds.
    pub fn build_as(
        &self,
        robot: &mut dyn Robot,
        manipulator: ManipulatorIndex,
        object: &SceneObject,
        config: &TsrConfig,
        request: &TaskRequest,
    ) -> Result<Vec<Chain>, HerbError> {
        let guard = ActiveManipulatorGuard::activate(robot, manipulator)?;
        let ctx = TsrContext::new(&*guard, object, config);
        self.build(&ctx, request)
    }
}

// ---------------------------------------------------------------------------
// Entry adapters
// ---------------------------------------------------------------------------

fn wrong_request(expected: TaskKind, request: &TaskRequest) -> HerbError {
    ParameterError::WrongRequest {
        expected: expected.as_str(),
        got: request.kind().as_str(),
    }
    .into()
}

fn lift_entry(ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::Lift { distance } => factories::lift(ctx, *distance),
        other => Err(wrong_request(TaskKind::Lift, other)),
    }
}

fn dual_arm_lift_entry(
    ctx: &TsrContext<'_>,
    request: &TaskRequest,
) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::Lift { distance } => factories::dual_arm_lift(ctx, *distance),
        other => Err(wrong_request(TaskKind::Lift, other)),
    }
}

fn grasp_entry(ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::Grasp => factories::grasp(ctx, 0.0),
        other => Err(wrong_request(TaskKind::Grasp, other)),
    }
}

fn push_grasp_entry(ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::PushGrasp { push_distance } => factories::push_grasp(ctx, *push_distance),
        other => Err(wrong_request(TaskKind::PushGrasp, other)),
    }
}

fn place_entry(ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::Place { pose_chain } => factories::place(ctx, pose_chain),
        other => Err(wrong_request(TaskKind::Place, other)),
    }
}

fn transport_entry(ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::Transport { roll, pitch, yaw } => {
            let default = ctx.config().transport.epsilon;
            let tolerance = OrientationTolerance {
                roll: roll.unwrap_or(default),
                pitch: pitch.unwrap_or(default),
                yaw: yaw.unwrap_or(default),
            };
            factories::transport(ctx, tolerance)
        }
        other => Err(wrong_request(TaskKind::Transport, other)),
    }
}

fn point_on_entry(ctx: &TsrContext<'_>, request: &TaskRequest) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::PointOn { padding } => factories::point_on(ctx, *padding),
        other => Err(wrong_request(TaskKind::PointOn, other)),
    }
}

fn given_point_on_entry(
    ctx: &TsrContext<'_>,
    request: &TaskRequest,
) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::GivenPointOn { point } => factories::given_point_on(ctx, point),
        other => Err(wrong_request(TaskKind::GivenPointOn, other)),
    }
}

fn handle_grasp_entry(
    ctx: &TsrContext<'_>,
    request: &TaskRequest,
) -> Result<Vec<Chain>, HerbError> {
    match request {
        TaskRequest::HandleGrasp { selector } => factories::handle_grasp(ctx, *selector),
        other => Err(wrong_request(TaskKind::HandleGrasp, other)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
