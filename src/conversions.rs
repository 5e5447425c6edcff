//! Conversions between named joint-space data (robot states, waypoint trajectories)
//! and the dense, ordinal-indexed vectors and trajectories of a dynamics model.
//!
//! Joint names are translated into ordinals here and only here: callers on the
//! kinematic side never see ordinals, and the dense vectors never carry names.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::conversion_error::ConversionError;
use crate::joint_model::RobotModel;
use crate::model_traits::{DenseVector, DynamicsModel, JointGroup, Trajectory};
use crate::piecewise_polynomial::PiecewisePolynomial;
use crate::robot_state::RobotState;
use crate::robot_trajectory::RobotTrajectory;

/// Ordinal of every active joint of the group, in group order. Fails on the first
/// joint the dynamics model does not know. Resolved anew on every call.
pub fn joint_ordinals<G, M>(group: &G, plant: &M) -> Result<Vec<usize>, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    group.active_joints()
        .iter()
        .map(|joint| plant.joint_ordinal(joint.name()))
        .collect()
}

/// Dense position vector of the plant's size. Entries of the group's joints hold
/// the state's positions; all other entries are zero.
pub fn joint_position_vector<G, M>(state: &RobotState, group: &G, plant: &M) -> Result<DenseVector, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    dense_vector(group, plant.num_positions(), plant, |name| state.variable_position(name))
}

/// Dense velocity vector of the plant's size, see [`joint_position_vector`].
pub fn joint_velocity_vector<G, M>(state: &RobotState, group: &G, plant: &M) -> Result<DenseVector, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    dense_vector(group, plant.num_velocities(), plant, |name| state.variable_velocity(name))
}

fn dense_vector<G, M, F>(group: &G, dimension: usize, plant: &M, read: F) -> Result<DenseVector, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
    F: Fn(&str) -> Result<f64, ConversionError>,
{
    let joints = group.active_joints();
    assert!(
        dimension >= joints.len(),
        "Dynamics model dimension {} is smaller than the {} active joints of group {}",
        dimension, joints.len(), group.name()
    );
    let mut values = DenseVector::zeros(dimension);
    for (joint, ordinal) in joints.iter().zip(joint_ordinals(group, plant)?) {
        values[ordinal] = read(joint.name())?;
    }
    Ok(values)
}

/// Converts a waypoint trajectory into a first order hold through the dense
/// positions of its waypoints, each at its time from start. Break times come
/// from the waypoint durations and are validated by the polynomial, not here.
pub fn to_piecewise_polynomial<G, M>(trajectory: &RobotTrajectory, group: &G, plant: &M)
                                     -> Result<PiecewisePolynomial, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    let mut breaks = Vec::with_capacity(trajectory.waypoint_count());
    let mut samples = Vec::with_capacity(trajectory.waypoint_count());

    let mut time_from_start = 0.0;
    for (state, duration) in trajectory.waypoints().zip(trajectory.waypoint_durations()) {
        time_from_start += duration;
        samples.push(joint_position_vector(state, group, plant)?);
        breaks.push(time_from_start);
    }
    debug!("First order hold through {} waypoints of group {}, {:.3} s",
        samples.len(), group.name(), time_from_start);

    PiecewisePolynomial::first_order_hold(breaks, samples)
}

/// Upper limit on the number of resampled waypoints.
pub const MAX_SAMPLES: usize = 10_000_000;

/// Times at which a trajectory of duration `end_time` is resampled with step
/// `delta_t`: `ceil(end_time / delta_t) + 1` evenly spaced times from 0 to
/// `end_time` inclusive. A zero duration gives the single time 0. A step so
/// small that more than [`MAX_SAMPLES`] times would be needed is rejected.
pub fn sample_times(end_time: f64, delta_t: f64) -> Result<Vec<f64>, ConversionError> {
    if !delta_t.is_finite() || delta_t <= 0.0 {
        return Err(ConversionError::InvalidTimeStep(delta_t));
    }
    let steps = (end_time / delta_t).ceil().max(0.0);
    if steps >= MAX_SAMPLES as f64 {
        return Err(ConversionError::InvalidTimeStep(delta_t));
    }
    let num_points = steps as usize + 1;
    if num_points == 1 {
        return Ok(vec![0.0]);
    }
    let last = (num_points - 1) as f64;
    Ok((0..num_points)
        .map(|i| (i as f64 / last).min(1.0) * end_time)
        .collect())
}

/// Resamples a continuous trajectory every `delta_t` seconds into a new waypoint
/// trajectory for `group` of `robot_model`. Positions are trajectory values and
/// velocities are trajectory derivatives, both read at the joints' ordinals.
/// The last waypoint is at the trajectory's end time.
pub fn to_robot_trajectory<T, M>(trajectory: &T, delta_t: f64, plant: &M,
                                 robot_model: &Arc<RobotModel>, group: &str)
                                 -> Result<RobotTrajectory, ConversionError>
where
    T: Trajectory + ?Sized,
    M: DynamicsModel + ?Sized,
{
    let times = sample_times(trajectory.end_time(), delta_t)?;
    let mut output = RobotTrajectory::new(robot_model.clone(), group)?;

    let joints = output.group().active_joints().to_vec();
    let ordinals = joint_ordinals(output.group(), plant)?;
    for (joint, &ordinal) in joints.iter().zip(&ordinals) {
        assert!(
            ordinal < trajectory.rows(),
            "Trajectory has {} rows, joint {} of group {} is at ordinal {}",
            trajectory.rows(), joint.name(), group, ordinal
        );
    }
    debug!("Resampling {:.3} s trajectory into {} waypoints", trajectory.end_time(), times.len());

    let mut t_prev = 0.0;
    for t in times {
        let positions = trajectory.value(t);
        let velocities = trajectory.eval_derivative(t);
        let mut waypoint = RobotState::new(robot_model.clone());
        for (joint, &ordinal) in joints.iter().zip(&ordinals) {
            waypoint.set_joint_positions(joint, &[positions[ordinal]])?;
            waypoint.set_joint_velocities(joint, &[velocities[ordinal]])?;
        }
        trace!("t = {:.4}, positions = {:?}", t, positions.as_slice());
        output.add_suffix_waypoint(Arc::new(waypoint), t - t_prev);
        t_prev = t;
    }
    Ok(output)
}
