//! Joint-space conversions between a kinematic robot model, where joints are addressed
//! by name and grouped into joint groups, and a multibody plant used for dynamics and
//! trajectory optimization, where joints are addressed by dense ordinal indices.
//!
//! # Features
//!
//! - Dense position and velocity vectors of a robot state, each joint at the ordinal
//!   the plant assigns to it. Joints missing from the plant are reported, never guessed.
//! - Dense lower/upper bounds for position, velocity, acceleration and jerk. Joints
//!   without declared bounds get finite defaults for the derivatives (unbounded values
//!   make the optimizer fail) and the full floating point range for positions.
//! - Waypoint trajectories to a first order hold through their waypoints, and
//!   continuous trajectories back to waypoints resampled at a fixed time step,
//!   with velocities taken from the trajectory derivative.
//! - Reading the robot model from URDF, joint groups from SRDF and extra joint limits
//!   from `joint_limits.yaml` (feature `allow_filesystem`).
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use drake_joint_conversions::conversions::{to_piecewise_polynomial, to_robot_trajectory};
//! use drake_joint_conversions::joint_model::{JointModel, RobotModel, VariableBounds};
//! use drake_joint_conversions::multibody_plant::MultibodyPlant;
//! use drake_joint_conversions::robot_state::RobotState;
//! use drake_joint_conversions::robot_trajectory::RobotTrajectory;
//!
//! let mut model = RobotModel::new("arm");
//! model.add_joint(JointModel::revolute("shoulder", VariableBounds::default().with_position(-1.0, 1.0)));
//! model.add_joint(JointModel::revolute("elbow", VariableBounds::default()));
//! model.add_group("arm", &["shoulder", "elbow"]).unwrap();
//! let model = Arc::new(model);
//! let plant = MultibodyPlant::from_robot_model(&model);
//!
//! let mut waypoints = RobotTrajectory::new(model.clone(), "arm").unwrap();
//! for (i, duration) in [0.0, 0.5, 0.5].into_iter().enumerate() {
//!     let mut state = RobotState::new(model.clone());
//!     state.set_variable_position("shoulder", 0.1 * i as f64).unwrap();
//!     waypoints.add_suffix_waypoint(Arc::new(state), duration);
//! }
//!
//! let group = model.joint_model_group("arm").unwrap();
//! let continuous = to_piecewise_polynomial(&waypoints, group, &plant).unwrap();
//! let resampled = to_robot_trajectory(&continuous, 0.25, &plant, &model, "arm").unwrap();
//! assert_eq!(resampled.waypoint_count(), 5);
//! ```

pub mod conversion_error;
pub mod model_traits;

pub mod joint_model;
pub mod robot_state;
pub mod robot_trajectory;

pub mod multibody_plant;
pub mod piecewise_polynomial;

pub mod config;
pub mod bounds;
pub mod conversions;

#[path = "utils/utils.rs"]
pub mod utils;

#[cfg(feature = "allow_filesystem")]
pub mod urdf;

#[cfg(feature = "allow_filesystem")]
pub mod srdf;

#[cfg(feature = "allow_filesystem")]
pub mod joint_limits;

#[cfg(feature = "allow_filesystem")]
pub mod trajectory_file;
