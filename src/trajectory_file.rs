//! Supports reading and writing waypoint trajectories as YAML (optional)

use std::fmt::Write as _;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use yaml_rust2::{Yaml, YamlLoader};

use crate::config::yaml_number;
use crate::conversion_error::ConversionError;
use crate::joint_model::RobotModel;
use crate::model_traits::JointGroup;
use crate::robot_state::RobotState;
use crate::robot_trajectory::RobotTrajectory;

/// Reads a waypoint trajectory. YAML like this is supported:
/// ```yaml
/// group: arm
/// joints: [shoulder, elbow]
/// waypoints:
///   - time_from_start: 0.0
///     positions: [0.0, 0.1]
///     velocities: [0.0, 0.0]
///   - time_from_start: 0.5
///     positions: [0.2, 0.3]
/// ```
/// `joints` gives the order of the values and defaults to the group order. Velocities
/// are optional. Times are taken as they are, ordering is not checked here.
pub fn read_trajectory(model: Arc<RobotModel>, contents: &str) -> Result<RobotTrajectory, ConversionError> {
    let docs = YamlLoader::load_from_str(contents)
        .map_err(|e| ConversionError::ParseError(format!("{}", e)))?;
    let doc = docs.first()
        .ok_or_else(|| ConversionError::ParseError("empty trajectory document".to_string()))?;

    let group_name = doc["group"].as_str()
        .ok_or_else(|| ConversionError::MissingField("group".to_string()))?;
    let mut trajectory = RobotTrajectory::new(model.clone(), group_name)?;

    let joint_names: Vec<String> = match doc["joints"].as_vec() {
        Some(names) => names.iter()
            .map(|n| n.as_str().map(str::to_string)
                .ok_or_else(|| ConversionError::ParseError(format!("joint name {:?} is not a string", n))))
            .collect::<Result<_, _>>()?,
        None => trajectory.group().joint_names().into_iter().map(str::to_string).collect(),
    };

    let waypoints = doc["waypoints"].as_vec()
        .ok_or_else(|| ConversionError::MissingField("waypoints".to_string()))?;

    let mut previous_time = 0.0;
    for (i, waypoint) in waypoints.iter().enumerate() {
        let time = yaml_number(&waypoint["time_from_start"], "time_from_start")?
            .ok_or_else(|| ConversionError::MissingField(format!("time_from_start of waypoint {}", i)))?;

        let mut state = RobotState::new(model.clone());
        let positions = numbers(&waypoint["positions"], "positions")?
            .ok_or_else(|| ConversionError::MissingField(format!("positions of waypoint {}", i)))?;
        check_length(&joint_names, &positions)?;
        for (name, value) in joint_names.iter().zip(positions) {
            state.set_variable_position(name, value)?;
        }
        if let Some(velocities) = numbers(&waypoint["velocities"], "velocities")? {
            check_length(&joint_names, &velocities)?;
            for (name, value) in joint_names.iter().zip(velocities) {
                state.set_variable_velocity(name, value)?;
            }
        }

        trajectory.add_suffix_waypoint(Arc::new(state), time - previous_time);
        previous_time = time;
    }
    Ok(trajectory)
}

pub fn read_trajectory_file<P: AsRef<Path>>(model: Arc<RobotModel>, path: P) -> Result<RobotTrajectory> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read trajectory {}", path.display()))?;
    read_trajectory(model, &contents)
        .with_context(|| format!("Failed to interpret trajectory {}", path.display()))
}

/// Writes the trajectory in the format [`read_trajectory`] reads, positions and
/// velocities in group order.
pub fn write_trajectory(trajectory: &RobotTrajectory) -> Result<String, ConversionError> {
    let group = trajectory.group();
    let mut out = String::new();
    // Writing into a String does not fail
    let _ = writeln!(out, "group: {}", group.name());
    let _ = writeln!(out, "joints: [{}]", group.joint_names().join(", "));
    let _ = writeln!(out, "waypoints:");
    for (i, state) in trajectory.waypoints().enumerate() {
        let positions = state.joint_group_positions(group)?;
        let velocities = state.joint_group_velocities(group)?;
        let _ = writeln!(out, "  - time_from_start: {:?}", trajectory.waypoint_duration_from_start(i));
        let _ = writeln!(out, "    positions: [{}]", join(&positions));
        let _ = writeln!(out, "    velocities: [{}]", join(&velocities));
    }
    Ok(out)
}

pub fn write_trajectory_file<P: AsRef<Path>>(trajectory: &RobotTrajectory, path: P) -> Result<()> {
    let path = path.as_ref();
    let contents = write_trajectory(trajectory)?;
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write trajectory {}", path.display()))
}

fn join(values: &[f64]) -> String {
    // {:?} keeps a decimal point so values read back as reals
    values.iter().map(|v| format!("{:?}", v)).collect::<Vec<_>>().join(", ")
}

fn numbers(value: &Yaml, label: &str) -> Result<Option<Vec<f64>>, ConversionError> {
    match value {
        Yaml::BadValue | Yaml::Null => Ok(None),
        Yaml::Array(items) => items.iter()
            .map(|item| yaml_number(item, label)?
                .ok_or_else(|| ConversionError::ParseError(format!("{} contains an empty value", label))))
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        _ => Err(ConversionError::ParseError(format!("{} must be a list of numbers", label))),
    }
}

fn check_length(joint_names: &[String], values: &[f64]) -> Result<(), ConversionError> {
    if joint_names.len() != values.len() {
        return Err(ConversionError::InvalidLength { expected: joint_names.len(), found: values.len() });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint_model::{JointModel, VariableBounds};

    fn model() -> Arc<RobotModel> {
        let mut model = RobotModel::new("test");
        for name in ["shoulder", "elbow"] {
            model.add_joint(JointModel::revolute(name, VariableBounds::default()));
        }
        model.add_group("arm", &["shoulder", "elbow"]).unwrap();
        Arc::new(model)
    }

    const YAML: &str = "
group: arm
joints: [elbow, shoulder]
waypoints:
  - time_from_start: 0
    positions: [0.5, 0.25]
  - time_from_start: 0.5
    positions: [1.0, -0.25]
    velocities: [0.1, 0.2]
";

    #[test]
    fn test_read() {
        let trajectory = read_trajectory(model(), YAML).expect("valid trajectory");
        assert_eq!(trajectory.waypoint_count(), 2);
        assert_eq!(trajectory.waypoint_durations(), &[0.0, 0.5]);
        let second = trajectory.waypoint(1);
        assert_eq!(second.variable_position("elbow").unwrap(), 1.0);
        assert_eq!(second.variable_position("shoulder").unwrap(), -0.25);
        assert_eq!(second.variable_velocity("shoulder").unwrap(), 0.2);
        assert_eq!(trajectory.waypoint(0).variable_velocity("elbow").unwrap(), 0.0);
    }

    #[test]
    fn test_written_trajectory_reads_back() {
        let model = model();
        let trajectory = read_trajectory(model.clone(), YAML).unwrap();
        let written = write_trajectory(&trajectory).unwrap();
        assert!(written.starts_with("group: arm\njoints: [shoulder, elbow]\n"));

        let reread = read_trajectory(model, &written).expect("written trajectory must be readable");
        assert_eq!(reread.waypoint_durations(), trajectory.waypoint_durations());
        assert_eq!(reread.waypoint(1).variable_velocity("elbow").unwrap(), 0.1);
    }

    #[test]
    fn test_wrong_length() {
        let yaml = "group: arm\nwaypoints:\n  - time_from_start: 0.0\n    positions: [1.0]\n";
        assert!(matches!(
            read_trajectory(model(), yaml),
            Err(ConversionError::InvalidLength { expected: 2, found: 1 })
        ));
    }

    #[test]
    fn test_unknown_joint_or_group() {
        let yaml = "group: arm\njoints: [knee, elbow]\nwaypoints:\n  - time_from_start: 0.0\n    positions: [1.0, 2.0]\n";
        assert!(matches!(read_trajectory(model(), yaml), Err(ConversionError::UnknownJoint(_))));
        assert!(matches!(
            read_trajectory(model(), "group: legs\nwaypoints: []\n"),
            Err(ConversionError::UnknownGroup(_))
        ));
    }
}
