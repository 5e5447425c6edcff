//! Helper functions

use crate::bounds::{Bounds, Quantity};
use crate::model_traits::JointGroup;
use crate::robot_trajectory::RobotTrajectory;

/// Replaces every `.stl` and every `.STL` in the path with `.obj`. Other spellings
/// (`.Stl`) are left as they are. Meant for mesh references of plants that only read OBJ.
pub fn replace_stl_with_obj(input: &str) -> String {
    input.replace(".stl", ".obj").replace(".STL", ".obj")
}

/// Print lower and upper bound of every ordinal, one row per bound.
pub fn dump_bounds(quantity: Quantity, bounds: &Bounds) {
    fn row(values: &[f64]) -> String {
        values.iter()
            .map(|&v| {
                if v == f64::MIN {
                    "min".to_string()
                } else if v == f64::MAX {
                    "max".to_string()
                } else {
                    format!("{:5.2}", v)
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
    println!("{} lower: [{}]", quantity.name(), row(bounds.lower.as_slice()));
    println!("{} upper: [{}]", quantity.name(), row(bounds.upper.as_slice()));
}

/// Print time from start, positions and velocities of every waypoint.
pub fn dump_trajectory(trajectory: &RobotTrajectory) {
    if trajectory.is_empty() {
        println!("No waypoints");
    }
    let group = trajectory.group();
    for (i, state) in trajectory.waypoints().enumerate() {
        let mut row_str = String::new();
        for joint in group.active_joints() {
            let position = state.variable_position(joint.name()).unwrap_or(f64::NAN);
            let velocity = state.variable_velocity(joint.name()).unwrap_or(f64::NAN);
            row_str.push_str(&format!("{:5.3}/{:5.3} ", position, velocity));
        }
        println!("{:7.3}: [{}]", trajectory.waypoint_duration_from_start(i), row_str.trim_end());
    }
}
