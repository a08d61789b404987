use std::f64::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::pose::{Axis, PoseConfig};
use crate::robot::{ManipulatorState, RobotKind, RobotSnapshot};
use crate::scene::{ObjectKind, Scene, SceneObject};

// ---------------------------------------------------------------------------
// Serde default functions
// ---------------------------------------------------------------------------

const fn default_lift_epsilon() -> f64 {
    0.05
}
const fn default_grasp_vertical_slack() -> f64 {
    0.02
}
const fn default_ee_to_palm() -> f64 {
    0.18
}
const fn default_push_distance() -> f64 {
    0.1
}
const fn default_release_height() -> f64 {
    0.02
}
const fn default_place_vertical_slack() -> f64 {
    0.04
}
const fn default_transport_reach() -> f64 {
    100.0
}
const fn default_transport_epsilon() -> f64 {
    0.2
}
const fn default_handle_offset() -> f64 {
    0.33
}
const fn default_handle_grasp_height() -> f64 {
    0.33
}
const fn default_handle_slide() -> f64 {
    0.03
}
const fn default_handle_vertical_slack() -> f64 {
    0.01
}
const fn default_handle_yaw_tolerance_deg() -> f64 {
    5.0
}
fn default_left_arm() -> String {
    "left".into()
}
fn default_right_arm() -> String {
    "right".into()
}
fn default_robot_name() -> String {
    "herb".into()
}

// ---------------------------------------------------------------------------
// GraspGeometry
// ---------------------------------------------------------------------------

/// Side-grasp geometry for a cylindrical object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GraspGeometry {
    /// Distance from the end-effector frame to the palm (m).
    #[serde(default = "default_ee_to_palm")]
    pub ee_to_palm: f64,
    /// Object radius plus clearance (m).
    pub margin: f64,
    /// Grasp height above the object origin (m).
    pub height: f64,
    /// Default stand-off used by `push_grasp` (m).
    #[serde(default = "default_push_distance")]
    pub push_distance: f64,
}

impl GraspGeometry {
    pub const FUZE_BOTTLE: Self = Self {
        ee_to_palm: default_ee_to_palm(),
        margin: 0.05,
        height: 0.108,
        push_distance: default_push_distance(),
    };

    pub const PLASTIC_GLASS: Self = Self {
        ee_to_palm: default_ee_to_palm(),
        margin: 0.045,
        height: 0.08,
        push_distance: default_push_distance(),
    };

    /// Stand-off between the end effector and the object origin.
    pub fn offset_distance(&self, push_distance: f64) -> f64 {
        self.ee_to_palm + self.margin + push_distance
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        non_negative(&format!("{name}.ee_to_palm"), self.ee_to_palm)?;
        non_negative(&format!("{name}.margin"), self.margin)?;
        finite(&format!("{name}.height"), self.height)?;
        non_negative(&format!("{name}.push_distance"), self.push_distance)
    }
}

// ---------------------------------------------------------------------------
// SurfaceSpec
// ---------------------------------------------------------------------------

/// A flat surface objects can be placed on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceSpec {
    /// The two in-plane axes of the surface frame.
    pub lateral_axes: [Axis; 2],
    /// Half-extent of the usable area along each lateral axis (m).
    pub half_extents: [f64; 2],
    /// Axis normal to the surface; rotation about it is unconstrained.
    pub normal: Axis,
    /// Allowed deviation along the normal `[min, max]` (m).
    #[serde(default)]
    pub normal_slack: [f64; 2],
    /// Transform from the sampled surface frame to the constrained frame.
    #[serde(default)]
    pub offset: PoseConfig,
}

impl SurfaceSpec {
    /// The conference table: the model's Y axis is the surface normal and
    /// the top sits 0.75 m above the origin.
    pub fn conference_table() -> Self {
        Self {
            lateral_axes: [Axis::X, Axis::Z],
            half_extents: [0.93, 0.38],
            normal: Axis::Y,
            normal_slack: [0.0, 0.0],
            offset: PoseConfig {
                xyz: [0.0, 0.75, 0.0],
                rpy: [-FRAC_PI_2, 0.0, 0.0],
            },
        }
    }

    /// The wicker tray: Z-up, objects rest 4 cm above the tray origin.
    pub fn wicker_tray() -> Self {
        Self {
            lateral_axes: [Axis::X, Axis::Y],
            half_extents: [0.235, 0.33],
            normal: Axis::Z,
            normal_slack: [-0.02, 0.04],
            offset: PoseConfig {
                xyz: [0.0, 0.0, 0.04],
                rpy: [0.0; 3],
            },
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let [a, b] = self.lateral_axes;
        if !a.is_translational() || !b.is_translational() || a == b {
            return Err(invalid(
                &format!("{name}.lateral_axes"),
                "must be two distinct translational axes",
            ));
        }
        if !self.normal.is_translational() || self.normal == a || self.normal == b {
            return Err(invalid(
                &format!("{name}.normal"),
                "must be the remaining translational axis",
            ));
        }
        for extent in self.half_extents {
            non_negative(&format!("{name}.half_extents"), extent)?;
        }
        let [lo, hi] = self.normal_slack;
        if !(lo.is_finite() && hi.is_finite() && lo <= hi) {
            return Err(invalid(&format!("{name}.normal_slack"), "must satisfy min <= max"));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Task-specific sections
// ---------------------------------------------------------------------------

/// Release geometry for placing a held object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaceConfig {
    /// Height above the sampled placement pose at which to let go (m).
    #[serde(default = "default_release_height")]
    pub release_height: f64,
    /// Vertical slack above the release height (m).
    #[serde(default = "default_place_vertical_slack")]
    pub vertical_slack: f64,
}

impl Default for PlaceConfig {
    fn default() -> Self {
        Self {
            release_height: default_release_height(),
            vertical_slack: default_place_vertical_slack(),
        }
    }
}

/// Orientation-keeping transport constraint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Translational half-width; large enough to cover the arm's reach (m).
    #[serde(default = "default_transport_reach")]
    pub reach: f64,
    /// Default roll/pitch/yaw tolerance (rad).
    #[serde(default = "default_transport_epsilon")]
    pub epsilon: f64,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            reach: default_transport_reach(),
            epsilon: default_transport_epsilon(),
        }
    }
}

/// Tray handle positions and grasp tolerances.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HandleGeometry {
    /// Handles sit at `∓offset` along the tray's Y axis (m).
    #[serde(default = "default_handle_offset")]
    pub offset: f64,
    /// End-effector height above the handle frame (m).
    #[serde(default = "default_handle_grasp_height")]
    pub grasp_height: f64,
    /// Allowed slide along the handle (m).
    #[serde(default = "default_handle_slide")]
    pub slide: f64,
    #[serde(default = "default_handle_vertical_slack")]
    pub vertical_slack: f64,
    #[serde(default = "default_handle_yaw_tolerance_deg")]
    pub yaw_tolerance_deg: f64,
}

impl Default for HandleGeometry {
    fn default() -> Self {
        Self {
            offset: default_handle_offset(),
            grasp_height: default_handle_grasp_height(),
            slide: default_handle_slide(),
            vertical_slack: default_handle_vertical_slack(),
            yaw_tolerance_deg: default_handle_yaw_tolerance_deg(),
        }
    }
}

/// Manipulator names used by two-handed tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualArmNames {
    #[serde(default = "default_left_arm")]
    pub left: String,
    #[serde(default = "default_right_arm")]
    pub right: String,
}

impl Default for DualArmNames {
    fn default() -> Self {
        Self {
            left: default_left_arm(),
            right: default_right_arm(),
        }
    }
}

// ---------------------------------------------------------------------------
// TsrConfig
// ---------------------------------------------------------------------------

/// Constants used by the region factories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TsrConfig {
    /// Lateral/rotational tolerance for lifts (m / rad).
    #[serde(default = "default_lift_epsilon")]
    pub lift_epsilon: f64,

    /// Upward slack allowed on side grasps (m).
    #[serde(default = "default_grasp_vertical_slack")]
    pub grasp_vertical_slack: f64,

    #[serde(default = "fuze_bottle_geometry")]
    pub fuze_bottle: GraspGeometry,

    #[serde(default = "plastic_glass_geometry")]
    pub plastic_glass: GraspGeometry,

    #[serde(default)]
    pub place: PlaceConfig,

    #[serde(default)]
    pub transport: TransportConfig,

    #[serde(default = "SurfaceSpec::conference_table")]
    pub conference_table: SurfaceSpec,

    #[serde(default = "SurfaceSpec::wicker_tray")]
    pub wicker_tray: SurfaceSpec,

    #[serde(default)]
    pub tray_handles: HandleGeometry,

    #[serde(default)]
    pub dual_arm: DualArmNames,
}

const fn fuze_bottle_geometry() -> GraspGeometry {
    GraspGeometry::FUZE_BOTTLE
}
const fn plastic_glass_geometry() -> GraspGeometry {
    GraspGeometry::PLASTIC_GLASS
}

impl Default for TsrConfig {
    fn default() -> Self {
        Self {
            lift_epsilon: default_lift_epsilon(),
            grasp_vertical_slack: default_grasp_vertical_slack(),
            fuze_bottle: GraspGeometry::FUZE_BOTTLE,
            plastic_glass: GraspGeometry::PLASTIC_GLASS,
            place: PlaceConfig::default(),
            transport: TransportConfig::default(),
            conference_table: SurfaceSpec::conference_table(),
            wicker_tray: SurfaceSpec::wicker_tray(),
            tray_handles: HandleGeometry::default(),
            dual_arm: DualArmNames::default(),
        }
    }
}

impl TsrConfig {
    /// Validate configuration. Returns Err on invalid values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        non_negative("lift_epsilon", self.lift_epsilon)?;
        non_negative("grasp_vertical_slack", self.grasp_vertical_slack)?;
        self.fuze_bottle.validate("fuze_bottle")?;
        self.plastic_glass.validate("plastic_glass")?;
        finite("place.release_height", self.place.release_height)?;
        non_negative("place.vertical_slack", self.place.vertical_slack)?;
        non_negative("transport.reach", self.transport.reach)?;
        non_negative("transport.epsilon", self.transport.epsilon)?;
        self.conference_table.validate("conference_table")?;
        self.wicker_tray.validate("wicker_tray")?;
        non_negative("tray_handles.slide", self.tray_handles.slide)?;
        non_negative("tray_handles.vertical_slack", self.tray_handles.vertical_slack)?;
        non_negative(
            "tray_handles.yaw_tolerance_deg",
            self.tray_handles.yaw_tolerance_deg,
        )?;
        if self.dual_arm.left == self.dual_arm.right {
            return Err(invalid("dual_arm", "left and right must name different manipulators"));
        }
        Ok(())
    }

    /// Surface geometry for an object kind, if it is a placement surface.
    pub fn surface(&self, kind: ObjectKind) -> Option<&SurfaceSpec> {
        match kind {
            ObjectKind::ConferenceTable | ObjectKind::Table => Some(&self.conference_table),
            ObjectKind::WickerTray => Some(&self.wicker_tray),
            ObjectKind::FuzeBottle | ObjectKind::PlasticGlass => None,
        }
    }

    /// Side-grasp geometry for an object kind, if it can be side-grasped.
    pub fn grasp_geometry(&self, kind: ObjectKind) -> Option<&GraspGeometry> {
        match kind {
            ObjectKind::FuzeBottle => Some(&self.fuze_bottle),
            ObjectKind::PlasticGlass => Some(&self.plastic_glass),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// SceneConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManipulatorConfig {
    pub name: String,
    pub end_effector_link: String,
    #[serde(default)]
    pub end_effector: PoseConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotConfig {
    #[serde(default = "default_robot_name")]
    pub name: String,
    #[serde(default)]
    pub kind: RobotKind,
    pub manipulators: Vec<ManipulatorConfig>,
    /// Name of the active manipulator.
    #[serde(default)]
    pub active: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectConfig {
    pub name: String,
    pub kind: ObjectKind,
    #[serde(default)]
    pub pose: PoseConfig,
}

/// A scene file: robot state, object poses, and factory overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneConfig {
    pub robot: RobotConfig,
    #[serde(default)]
    pub objects: Vec<ObjectConfig>,
    #[serde(default)]
    pub tsr: TsrConfig,
}

impl SceneConfig {
    /// Load from TOML file.
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse from a TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.tsr.validate()?;
        if let Some(active) = &self.robot.active {
            if !self.robot.manipulators.iter().any(|m| &m.name == active) {
                return Err(invalid("robot.active", &format!("no manipulator named '{active}'")));
            }
        }
        for (i, m) in self.robot.manipulators.iter().enumerate() {
            if self.robot.manipulators[..i].iter().any(|o| o.name == m.name) {
                return Err(invalid(
                    "robot.manipulators",
                    &format!("duplicate manipulator '{}'", m.name),
                ));
            }
        }
        for (i, o) in self.objects.iter().enumerate() {
            if self.objects[..i].iter().any(|p| p.name == o.name) {
                return Err(invalid("objects", &format!("duplicate object '{}'", o.name)));
            }
        }
        Ok(())
    }

    /// Build the runtime scene.
    pub fn into_scene(self) -> Result<Scene, ConfigError> {
        self.validate()?;
        let mut robot = RobotSnapshot::new(self.robot.name, self.robot.kind);
        for m in self.robot.manipulators {
            robot.add_manipulator(ManipulatorState {
                name: m.name,
                end_effector_link: m.end_effector_link,
                end_effector: m.end_effector.to_pose(),
            });
        }
        if let Some(active) = self.robot.active {
            robot = robot
                .with_active(&active)
                .map_err(|e| invalid("robot.active", &e.to_string()))?;
        }
        let objects = self
            .objects
            .into_iter()
            .map(|o| SceneObject::new(o.name, o.kind, o.pose.to_pose()))
            .collect();
        Ok(Scene {
            robot,
            objects,
            tsr: self.tsr,
        })
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn invalid(field: &str, message: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_owned(),
        message: message.to_owned(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, "must be finite"))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    finite(field, value)?;
    if value < 0.0 {
        return Err(invalid(field, &format!("must be non-negative, got {value}")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::{ManipulatorIndex, Robot};
    use approx::assert_relative_eq;

    const SCENE: &str = r#"
        [robot]
        name = "herb"
        active = "right"

        [[robot.manipulators]]
        name = "left"
        end_effector_link = "/left/wam7"
        end_effector = { xyz = [0.6, 0.3, 0.9] }

        [[robot.manipulators]]
        name = "right"
        end_effector_link = "/right/wam7"
        end_effector = { xyz = [0.6, -0.3, 0.9], rpy = [0.0, 1.5707963, 0.0] }

        [[objects]]
        name = "glass"
        kind = "plastic_glass"
        pose = { xyz = [0.8, -0.3, 0.75] }

        [[objects]]
        name = "tray"
        kind = "wicker_tray"

        [tsr]
        lift_epsilon = 0.03

        [tsr.plastic_glass]
        margin = 0.05
        height = 0.09
    "#;

    #[test]
    fn default_config_is_valid() {
        TsrConfig::default().validate().unwrap();
    }

    #[test]
    fn default_constants() {
        let config = TsrConfig::default();
        assert_relative_eq!(config.lift_epsilon, 0.05);
        assert_relative_eq!(config.fuze_bottle.offset_distance(0.0), 0.23, epsilon = 1e-12);
        assert_relative_eq!(config.plastic_glass.offset_distance(0.1), 0.325, epsilon = 1e-12);
        assert_relative_eq!(config.transport.reach, 100.0);
        assert_eq!(config.dual_arm.left, "left");
    }

    #[test]
    fn scene_parses_and_builds() {
        let scene = SceneConfig::from_toml_str(SCENE).unwrap().into_scene().unwrap();
        assert_eq!(scene.robot.manipulator_count(), 2);
        assert_eq!(scene.robot.active_manipulator(), Some(ManipulatorIndex(1)));
        assert_eq!(scene.objects.len(), 2);
        assert_relative_eq!(scene.object("glass").unwrap().pose.translation.z, 0.75);

        // Partial overrides keep the remaining defaults
        assert_relative_eq!(scene.tsr.lift_epsilon, 0.03);
        assert_relative_eq!(scene.tsr.grasp_vertical_slack, 0.02);
        assert_relative_eq!(scene.tsr.plastic_glass.ee_to_palm, 0.18);
        assert_relative_eq!(scene.tsr.plastic_glass.height, 0.09);
        assert_eq!(scene.tsr.wicker_tray, SurfaceSpec::wicker_tray());
    }

    #[test]
    fn unknown_active_manipulator_rejected() {
        let toml = r#"
            [robot]
            active = "head"
            [[robot.manipulators]]
            name = "left"
            end_effector_link = "/left/wam7"
        "#;
        let err = SceneConfig::from_toml_str(toml).unwrap_err();
        assert!(err.to_string().contains("robot.active"));
    }

    #[test]
    fn duplicate_objects_rejected() {
        let toml = r#"
            [robot]
            manipulators = []
            [[objects]]
            name = "a"
            kind = "table"
            [[objects]]
            name = "a"
            kind = "wicker_tray"
        "#;
        assert!(matches!(
            SceneConfig::from_toml_str(toml),
            Err(ConfigError::InvalidValue { field, .. }) if field == "objects"
        ));
    }

    #[test]
    fn bad_surface_axes_rejected() {
        let mut config = TsrConfig::default();
        config.wicker_tray.normal = Axis::X;
        assert!(config.validate().is_err());

        let mut config = TsrConfig::default();
        config.conference_table.lateral_axes = [Axis::X, Axis::Yaw];
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_epsilon_rejected() {
        let config = TsrConfig {
            lift_epsilon: -0.01,
            ..TsrConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("lift_epsilon"));
    }

    #[test]
    fn same_dual_arm_names_rejected() {
        let mut config = TsrConfig::default();
        config.dual_arm.right = "left".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = SceneConfig::from_file("/nonexistent/scene.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn surfaces_by_kind() {
        let config = TsrConfig::default();
        assert!(config.surface(ObjectKind::WickerTray).is_some());
        assert!(config.surface(ObjectKind::FuzeBottle).is_none());
        assert!(config.grasp_geometry(ObjectKind::PlasticGlass).is_some());
        assert!(config.grasp_geometry(ObjectKind::Table).is_none());
    }
}
