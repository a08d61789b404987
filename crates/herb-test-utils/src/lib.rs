//! Shared test fixtures for HERB TSR crates.
//!
//! Provides robot snapshots in a few canonical configurations, scene
//! objects at given positions, and pose comparison helpers.

pub mod assert;
pub mod objects;
pub mod robots;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use assert::assert_pose_eq;
pub use objects::{bottle_at, conference_table_at, glass_at, tray_at};
pub use robots::{LEFT_LINK, RIGHT_LINK, herb_at_identity, herb_holding, herb_two_arms};
