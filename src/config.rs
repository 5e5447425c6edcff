//! Default magnitudes for the bounds of joints that declare none.

#[cfg(feature = "allow_filesystem")]
use std::path::Path;

#[cfg(feature = "allow_filesystem")]
use yaml_rust2::{Yaml, YamlLoader};

#[cfg(feature = "allow_filesystem")]
use crate::conversion_error::ConversionError;

/// Default velocity bound, symmetric. Unbounded (floating point limit) values make
/// the trajectory optimization fail to converge, so a large finite value is used.
pub const DEFAULT_MAX_VELOCITY: f64 = 100.0;

/// Default acceleration bound, symmetric.
pub const DEFAULT_MAX_ACCELERATION: f64 = 100.0;

/// Default jerk bound, symmetric.
pub const DEFAULT_MAX_JERK: f64 = 100.0;

/// Symmetric magnitudes used for velocity, acceleration and jerk entries that
/// have no declared joint bound. Position has no configurable default: it is
/// always the full floating point range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundDefaults {
    pub max_velocity: f64,
    pub max_acceleration: f64,
    pub max_jerk: f64,
}

impl Default for BoundDefaults {
    fn default() -> Self {
        BoundDefaults {
            max_velocity: DEFAULT_MAX_VELOCITY,
            max_acceleration: DEFAULT_MAX_ACCELERATION,
            max_jerk: DEFAULT_MAX_JERK,
        }
    }
}

#[cfg(feature = "allow_filesystem")]
impl BoundDefaults {
    /// Reads defaults from YAML like
    /// ```yaml
    /// default_bounds:
    ///   max_velocity: 3.0
    ///   max_acceleration: 10.0
    ///   max_jerk: 50
    /// ```
    /// Missing keys keep the built-in defaults. Values must be finite and positive.
    pub fn from_yaml(contents: &str) -> Result<Self, ConversionError> {
        let docs = YamlLoader::load_from_str(contents)
            .map_err(|e| ConversionError::ParseError(format!("{}", e)))?;
        let mut defaults = BoundDefaults::default();
        let Some(doc) = docs.first() else {
            return Ok(defaults);
        };
        let section = &doc["default_bounds"];
        if section.is_badvalue() {
            return Err(ConversionError::MissingField("default_bounds".to_string()));
        }

        for (key, slot) in [
            ("max_velocity", &mut defaults.max_velocity),
            ("max_acceleration", &mut defaults.max_acceleration),
            ("max_jerk", &mut defaults.max_jerk),
        ] {
            if let Some(value) = yaml_number(&section[key], key)? {
                if !value.is_finite() || value <= 0.0 {
                    return Err(ConversionError::ParseError(format!(
                        "{} must be finite and positive (got {})", key, value
                    )));
                }
                *slot = value;
            }
        }
        Ok(defaults)
    }

    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConversionError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }
}

/// Reads a YAML scalar as a number. Integers are accepted where reals are expected.
/// Returns `None` for a missing key.
#[cfg(feature = "allow_filesystem")]
pub(crate) fn yaml_number(value: &Yaml, label: &str) -> Result<Option<f64>, ConversionError> {
    match value {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::Integer(i) => Ok(Some(*i as f64)),
        Yaml::Real(_) => value
            .as_f64()
            .map(Some)
            .ok_or_else(|| ConversionError::ParseError(format!("{} is not a number", label))),
        _ => Err(ConversionError::ParseError(format!("{} is not a number", label))),
    }
}
