//! Objects a factory can target, and the loaded scene that holds them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::TsrConfig;
use crate::error::{ConfigError, RegistryError};
use crate::pose::Pose;
use crate::robot::RobotSnapshot;

// ---------------------------------------------------------------------------
// ObjectKind
// ---------------------------------------------------------------------------

/// Object categories with registered factories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    FuzeBottle,
    PlasticGlass,
    ConferenceTable,
    Table,
    WickerTray,
}

impl ObjectKind {
    pub const ALL: [Self; 5] = [
        Self::FuzeBottle,
        Self::PlasticGlass,
        Self::ConferenceTable,
        Self::Table,
        Self::WickerTray,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FuzeBottle => "fuze_bottle",
            Self::PlasticGlass => "plastic_glass",
            Self::ConferenceTable => "conference_table",
            Self::Table => "table",
            Self::WickerTray => "wicker_tray",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ObjectKind {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| RegistryError::UnknownObject(s.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// SceneObject
// ---------------------------------------------------------------------------

/// A named object and its world pose at snapshot time.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub name: String,
    pub kind: ObjectKind,
    pub pose: Pose,
}

impl SceneObject {
    pub fn new(name: impl Into<String>, kind: ObjectKind, pose: Pose) -> Self {
        Self {
            name: name.into(),
            kind,
            pose,
        }
    }
}

// ---------------------------------------------------------------------------
// Scene
// ---------------------------------------------------------------------------

/// A robot snapshot, the objects around it, and the factory configuration.
#[derive(Debug, Clone)]
pub struct Scene {
    pub robot: RobotSnapshot,
    pub objects: Vec<SceneObject>,
    pub tsr: TsrConfig,
}

impl Scene {
    /// Find an object by name.
    pub fn object(&self, name: &str) -> Result<&SceneObject, ConfigError> {
        self.objects
            .iter()
            .find(|o| o.name == name)
            .ok_or_else(|| ConfigError::UnknownObject(name.to_owned()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::robot::RobotKind;

    #[test]
    fn object_kind_roundtrips_through_names() {
        for kind in ObjectKind::ALL {
            assert_eq!(kind.to_string().parse::<ObjectKind>().unwrap(), kind);
        }
    }

    #[test]
    fn unknown_object_kind() {
        assert_eq!(
            "pitcher".parse::<ObjectKind>(),
            Err(RegistryError::UnknownObject("pitcher".into()))
        );
    }

    #[test]
    fn scene_object_lookup() {
        let scene = Scene {
            robot: RobotSnapshot::new("herb", RobotKind::Herb),
            objects: vec![SceneObject::new(
                "glass",
                ObjectKind::PlasticGlass,
                Pose::identity(),
            )],
            tsr: TsrConfig::default(),
        };
        assert_eq!(scene.object("glass").unwrap().kind, ObjectKind::PlasticGlass);
        assert!(matches!(
            scene.object("bowl"),
            Err(ConfigError::UnknownObject(name)) if name == "bowl"
        ));
    }
}
