use thiserror::Error;

use crate::pose::Axis;
use crate::robot::ManipulatorIndex;

/// Top-level error type for HERB TSR construction.
#[derive(Debug, Error)]
pub enum HerbError {
    #[error("Manipulator error: {0}")]
    Manipulator(#[from] ManipulatorError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid parameter: {0}")]
    Parameter(#[from] ParameterError),

    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),
}

/// Errors from resolving or matching manipulators.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManipulatorError {
    #[error(
        "Region {position} of the supplied chain targets manipulator {found}, expected {expected}"
    )]
    Mismatch {
        position: usize,
        expected: ManipulatorIndex,
        found: ManipulatorIndex,
    },

    #[error("Manipulator '{manipulator}' belongs to robot '{owner}', not '{robot}'")]
    ForeignRobot {
        manipulator: String,
        owner: String,
        robot: String,
    },

    #[error("Manipulator index {index} out of range (robot has {count})")]
    UnknownIndex { index: ManipulatorIndex, count: usize },

    #[error("No manipulator named '{0}'")]
    UnknownName(String),

    #[error("Robot has no active manipulator")]
    NoneActive,
}

/// Configuration and construction errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Degenerate bounds on {axis}: min {min} > max {max}")]
    DegenerateBounds { axis: Axis, min: f64, max: f64 },

    #[error("Non-finite bound on {axis}")]
    NonFiniteBound { axis: Axis },

    #[error("Chain must contain at least one region")]
    EmptyChain,

    #[error("Inconsistent chain flags: {0}")]
    InconsistentFlags(&'static str),

    #[error("Rotation block is not orthonormal with unit determinant")]
    NonOrthonormalRotation,

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Scene has no object named '{0}'")]
    UnknownObject(String),
}

/// Invalid scalar or request parameters passed to a factory.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParameterError {
    #[error("{name} must be non-negative, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{name} must be finite, got {value}")]
    NonFinite { name: &'static str, value: f64 },

    #[error("Padding {padding} exceeds surface half-extent {extent} on {axis}")]
    PaddingExceedsExtent {
        axis: Axis,
        padding: f64,
        extent: f64,
    },

    #[error("Factory for '{expected}' received a '{got}' request")]
    WrongRequest {
        expected: &'static str,
        got: &'static str,
    },
}

impl ParameterError {
    /// Reject NaN/infinite values.
    pub fn check_finite(name: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::NonFinite { name, value })
        }
    }

    /// Reject negative or non-finite values.
    pub fn check_non_negative(name: &'static str, value: f64) -> Result<f64, Self> {
        let value = Self::check_finite(name, value)?;
        if value < 0.0 {
            Err(Self::Negative { name, value })
        } else {
            Ok(value)
        }
    }
}

/// Factory registry lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("Unknown robot kind: {0}")]
    UnknownRobot(String),

    #[error("Unknown object kind: {0}")]
    UnknownObject(String),

    #[error("Unknown task: {0}")]
    UnknownTask(String),

    #[error("No factory registered for ({robot}, {object}, {task})")]
    NoFactory {
        robot: String,
        object: String,
        task: String,
    },

    #[error("Factory already registered for ({robot}, {object}, {task})")]
    Duplicate {
        robot: String,
        object: String,
        task: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn herb_error_from_manipulator_error() {
        let err = ManipulatorError::NoneActive;
        let herb_err: HerbError = err.into();
        assert!(matches!(herb_err, HerbError::Manipulator(_)));
        assert!(herb_err.to_string().contains("no active manipulator"));
    }

    #[test]
    fn herb_error_from_config_error() {
        let err = ConfigError::EmptyChain;
        let herb_err: HerbError = err.into();
        assert!(matches!(herb_err, HerbError::Config(_)));
    }

    #[test]
    fn config_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let config_err: ConfigError = io_err.into();
        assert!(matches!(config_err, ConfigError::Io(_)));
    }

    #[test]
    fn manipulator_error_display_messages() {
        assert_eq!(
            ManipulatorError::Mismatch {
                position: 1,
                expected: ManipulatorIndex(0),
                found: ManipulatorIndex(1),
            }
            .to_string(),
            "Region 1 of the supplied chain targets manipulator 1, expected 0"
        );
        assert_eq!(
            ManipulatorError::UnknownIndex {
                index: ManipulatorIndex(4),
                count: 2
            }
            .to_string(),
            "Manipulator index 4 out of range (robot has 2)"
        );
        assert_eq!(
            ManipulatorError::UnknownName("head".into()).to_string(),
            "No manipulator named 'head'"
        );
    }

    #[test]
    fn config_error_display_messages() {
        assert_eq!(
            ConfigError::DegenerateBounds {
                axis: Axis::Z,
                min: 0.1,
                max: -0.1
            }
            .to_string(),
            "Degenerate bounds on z: min 0.1 > max -0.1"
        );
        assert_eq!(
            ConfigError::InconsistentFlags("goal and constraint").to_string(),
            "Inconsistent chain flags: goal and constraint"
        );
    }

    #[test]
    fn parameter_checks() {
        assert_eq!(ParameterError::check_non_negative("padding", 0.0), Ok(0.0));
        assert!(matches!(
            ParameterError::check_non_negative("padding", -0.1),
            Err(ParameterError::Negative { name: "padding", .. })
        ));
        assert!(matches!(
            ParameterError::check_finite("distance", f64::NAN),
            Err(ParameterError::NonFinite { .. })
        ));
    }

    #[test]
    fn registry_error_display_messages() {
        assert_eq!(
            RegistryError::NoFactory {
                robot: "herb".into(),
                object: "fuze_bottle".into(),
                task: "place".into()
            }
            .to_string(),
            "No factory registered for (herb, fuze_bottle, place)"
        );
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn error_is_send_sync() {
        assert_send_sync::<HerbError>();
    }
}
