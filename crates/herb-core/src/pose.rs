//! Rigid-transform helpers shared by every region factory.
//!
//! Poses are [`Isometry3<f64>`]. Factories describe fixed offsets as
//! 3×4 row-major matrices (rotation block plus translation column), which
//! [`pose_from_rows`] validates before converting.

use std::fmt;

use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// A rigid transform in 3D space.
pub type Pose = Isometry3<f64>;

const ORTHONORMAL_TOLERANCE: f64 = 1e-9;

// ---------------------------------------------------------------------------
// Axis
// ---------------------------------------------------------------------------

/// One of the six pose-error coordinates, in bounds-box order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    X,
    Y,
    Z,
    Roll,
    Pitch,
    Yaw,
}

impl Axis {
    /// All axes in bounds-box order.
    pub const ALL: [Self; 6] = [
        Self::X,
        Self::Y,
        Self::Z,
        Self::Roll,
        Self::Pitch,
        Self::Yaw,
    ];

    /// Row of this axis in a bounds box.
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Whether this is one of the three translational axes.
    pub const fn is_translational(self) -> bool {
        matches!(self, Self::X | Self::Y | Self::Z)
    }

    /// The rotational axis that turns about this translational axis.
    pub const fn rotation_about(self) -> Self {
        match self {
            Self::X | Self::Roll => Self::Roll,
            Self::Y | Self::Pitch => Self::Pitch,
            Self::Z | Self::Yaw => Self::Yaw,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
            Self::Roll => "roll",
            Self::Pitch => "pitch",
            Self::Yaw => "yaw",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Construction helpers
// ---------------------------------------------------------------------------

/// Build a pose from the top three rows of a homogeneous matrix.
///
/// # Errors
///
/// Returns [`ConfigError::NonOrthonormalRotation`] if the rotation block is
/// not a proper rotation.
pub fn pose_from_rows(rows: [[f64; 4]; 3]) -> Result<Pose, ConfigError> {
    let rotation = Matrix3::new(
        rows[0][0], rows[0][1], rows[0][2], //
        rows[1][0], rows[1][1], rows[1][2], //
        rows[2][0], rows[2][1], rows[2][2],
    );
    let orthonormal = (rotation.transpose() * rotation - Matrix3::identity()).amax()
        < ORTHONORMAL_TOLERANCE
        && (rotation.determinant() - 1.0).abs() < ORTHONORMAL_TOLERANCE;
    if !orthonormal {
        return Err(ConfigError::NonOrthonormalRotation);
    }
    let rotation = UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(rotation));
    Ok(Isometry3::from_parts(
        Translation3::new(rows[0][3], rows[1][3], rows[2][3]),
        rotation,
    ))
}

/// Pure translation.
pub fn translation(x: f64, y: f64, z: f64) -> Pose {
    Isometry3::translation(x, y, z)
}

/// Pose from translation and extrinsic roll-pitch-yaw.
pub fn pose_from_xyz_rpy(xyz: [f64; 3], rpy: [f64; 3]) -> Pose {
    Isometry3::from_parts(
        Translation3::new(xyz[0], xyz[1], xyz[2]),
        UnitQuaternion::from_euler_angles(rpy[0], rpy[1], rpy[2]),
    )
}

/// Shift a pose along the world Z axis.
pub fn raised(pose: &Pose, dz: f64) -> Pose {
    Translation3::new(0.0, 0.0, dz) * pose
}

/// Pose of `child` expressed in the frame of `parent`: `parent⁻¹ ∘ child`.
pub fn relative(parent: &Pose, child: &Pose) -> Pose {
    parent.inv_mul(child)
}

/// Distance between two poses projected onto the world XY plane.
pub fn planar_distance(a: &Pose, b: &Pose) -> f64 {
    let delta: Vector3<f64> = a.translation.vector - b.translation.vector;
    delta.x.hypot(delta.y)
}

/// Decompose a pose into `[x, y, z, roll, pitch, yaw]`.
pub fn displacement(pose: &Pose) -> [f64; 6] {
    let t = pose.translation.vector;
    let (roll, pitch, yaw) = pose.rotation.euler_angles();
    [t.x, t.y, t.z, roll, pitch, yaw]
}

// ---------------------------------------------------------------------------
// PoseConfig
// ---------------------------------------------------------------------------

/// Serializable pose: translation plus roll-pitch-yaw, as in URDF origins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PoseConfig {
    /// Translation `[x, y, z]` in meters.
    #[serde(default)]
    pub xyz: [f64; 3],
    /// Rotation `[roll, pitch, yaw]` in radians.
    #[serde(default)]
    pub rpy: [f64; 3],
}

impl PoseConfig {
    pub fn to_pose(&self) -> Pose {
        pose_from_xyz_rpy(self.xyz, self.rpy)
    }

    pub fn from_pose(pose: &Pose) -> Self {
        let [x, y, z, roll, pitch, yaw] = displacement(pose);
        Self {
            xyz: [x, y, z],
            rpy: [roll, pitch, yaw],
        }
    }
}

impl From<PoseConfig> for Pose {
    fn from(config: PoseConfig) -> Self {
        config.to_pose()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
