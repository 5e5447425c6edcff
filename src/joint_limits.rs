//! Supports joint limits from a `joint_limits.yaml` file (optional). These override
//! URDF limits and are the only source of acceleration and jerk limits.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};
use yaml_rust2::{Yaml, YamlLoader};

use crate::config::yaml_number;
use crate::conversion_error::ConversionError;
use crate::joint_model::RobotModel;

/// Applies joint limits from YAML like this:
/// ```yaml
/// joint_limits:
///   shoulder:
///     has_position_limits: true
///     min_position: -2.9
///     max_position: 2.9
///     has_velocity_limits: true
///     max_velocity: 2.175
///     has_acceleration_limits: true
///     max_acceleration: 3.75
///     has_jerk_limits: false
/// ```
/// Velocity, acceleration and jerk limits are symmetric. A `has_*_limits: false` or a
/// missing flag keeps whatever bound the joint already has. Joints the model does not
/// know are skipped. Returns the number of joints updated; joint groups of the model
/// are refreshed to see the new bounds.
pub fn apply_joint_limits(model: &mut RobotModel, contents: &str) -> Result<usize, ConversionError> {
    let docs = YamlLoader::load_from_str(contents)
        .map_err(|e| ConversionError::ParseError(format!("{}", e)))?;
    let Some(doc) = docs.first() else {
        return Ok(0);
    };
    let limits = doc["joint_limits"].as_hash()
        .ok_or_else(|| ConversionError::MissingField("joint_limits".to_string()))?;

    let mut updated = 0;
    for (key, entry) in limits {
        let name = key.as_str()
            .ok_or_else(|| ConversionError::ParseError(format!("joint name {:?} is not a string", key)))?;
        let joint = match model.joint_model_mut(name) {
            Ok(joint) => joint,
            Err(_) => {
                warn!("Limits given for unknown joint {}, ignored", name);
                continue;
            }
        };
        let Some(bounds) = joint.variable_bounds_mut().first_mut() else {
            warn!("Limits given for fixed joint {}, ignored", name);
            continue;
        };

        if flag(entry, "has_position_limits")? {
            let min = required(entry, "min_position", name)?;
            let max = required(entry, "max_position", name)?;
            *bounds = bounds.with_position(min, max);
        }
        if flag(entry, "has_velocity_limits")? {
            let max = required(entry, "max_velocity", name)?;
            *bounds = bounds.with_velocity(-max, max);
        }
        if flag(entry, "has_acceleration_limits")? {
            let max = required(entry, "max_acceleration", name)?;
            *bounds = bounds.with_acceleration(-max, max);
        }
        if flag(entry, "has_jerk_limits")? {
            let max = required(entry, "max_jerk", name)?;
            *bounds = bounds.with_jerk(-max, max);
        }
        debug!("Limits of {}: {:?}", name, bounds);
        updated += 1;
    }
    model.refresh_groups();
    Ok(updated)
}

pub fn apply_joint_limits_file<P: AsRef<Path>>(model: &mut RobotModel, path: P) -> Result<usize> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read joint limits {}", path.display()))?;
    apply_joint_limits(model, &contents)
        .with_context(|| format!("Failed to apply joint limits from {}", path.display()))
}

fn flag(entry: &Yaml, key: &str) -> Result<bool, ConversionError> {
    match &entry[key] {
        Yaml::BadValue | Yaml::Null => Ok(false),
        Yaml::Boolean(value) => Ok(*value),
        _ => Err(ConversionError::ParseError(format!("{} must be true or false", key))),
    }
}

fn required(entry: &Yaml, key: &str, joint: &str) -> Result<f64, ConversionError> {
    yaml_number(&entry[key], key)?
        .ok_or_else(|| ConversionError::MissingField(format!("{} of {}", key, joint)))
}
