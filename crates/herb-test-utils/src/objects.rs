//! Scene object fixtures, all axis-aligned with the world.

use herb_core::pose::translation;
use herb_core::scene::{ObjectKind, SceneObject};

pub fn glass_at(x: f64, y: f64, z: f64) -> SceneObject {
    SceneObject::new("glass", ObjectKind::PlasticGlass, translation(x, y, z))
}

pub fn bottle_at(x: f64, y: f64, z: f64) -> SceneObject {
    SceneObject::new("fuze_bottle", ObjectKind::FuzeBottle, translation(x, y, z))
}

pub fn tray_at(x: f64, y: f64, z: f64) -> SceneObject {
    SceneObject::new("tray", ObjectKind::WickerTray, translation(x, y, z))
}

pub fn conference_table_at(x: f64, y: f64, z: f64) -> SceneObject {
    SceneObject::new(
        "conference_table",
        ObjectKind::ConferenceTable,
        translation(x, y, z),
    )
}
