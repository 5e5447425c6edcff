//! Sequence of timed waypoints for one joint group of a robot model.

use std::sync::Arc;

use crate::conversion_error::ConversionError;
use crate::conversions::to_robot_trajectory;
use crate::joint_model::{JointModelGroup, RobotModel};
use crate::model_traits::{DynamicsModel, JointGroup, Trajectory};
use crate::robot_state::RobotState;

/// Waypoint trajectory. Each waypoint stores its duration from the previous
/// waypoint; the first waypoint's duration is its time from the start.
#[derive(Debug, Clone)]
pub struct RobotTrajectory {
    model: Arc<RobotModel>,
    group: JointModelGroup,
    waypoints: Vec<Arc<RobotState>>,
    durations_from_previous: Vec<f64>,
}

impl RobotTrajectory {
    /// Creates an empty trajectory for the given group. The group must exist.
    pub fn new(model: Arc<RobotModel>, group: &str) -> Result<Self, ConversionError> {
        let group = model.joint_model_group(group)?.clone();
        Ok(RobotTrajectory {
            model,
            group,
            waypoints: Vec::new(),
            durations_from_previous: Vec::new(),
        })
    }

    pub fn robot_model(&self) -> &Arc<RobotModel> {
        &self.model
    }

    pub fn group_name(&self) -> &str {
        self.group.name()
    }

    pub fn group(&self) -> &JointModelGroup {
        &self.group
    }

    pub fn add_suffix_waypoint(&mut self, state: Arc<RobotState>, duration_from_previous: f64) {
        self.waypoints.push(state);
        self.durations_from_previous.push(duration_from_previous);
    }

    pub fn clear(&mut self) {
        self.waypoints.clear();
        self.durations_from_previous.clear();
    }

    pub fn waypoint_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn waypoint(&self, index: usize) -> &Arc<RobotState> {
        &self.waypoints[index]
    }

    pub fn waypoints(&self) -> impl Iterator<Item = &Arc<RobotState>> {
        self.waypoints.iter()
    }

    pub fn waypoint_durations(&self) -> &[f64] {
        &self.durations_from_previous
    }

    /// Time from the start of the trajectory to the waypoint at `index`.
    pub fn waypoint_duration_from_start(&self, index: usize) -> f64 {
        let end = index.min(self.durations_from_previous.len().saturating_sub(1));
        self.durations_from_previous.iter().take(end + 1).sum()
    }

    /// Total duration, zero for an empty trajectory.
    pub fn duration(&self) -> f64 {
        self.durations_from_previous.iter().sum()
    }

    /// Clears this trajectory and refills it by resampling `trajectory` every
    /// `delta_t` seconds. On error the trajectory is left unchanged.
    pub fn resample_from<T, M>(&mut self, trajectory: &T, delta_t: f64, plant: &M) -> Result<(), ConversionError>
    where
        T: Trajectory + ?Sized,
        M: DynamicsModel + ?Sized,
    {
        let resampled = to_robot_trajectory(trajectory, delta_t, plant, &self.model, self.group.name())?;
        *self = resampled;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint_model::{JointModel, VariableBounds};

    fn trajectory() -> RobotTrajectory {
        let mut model = RobotModel::new("test");
        model.add_joint(JointModel::revolute("a", VariableBounds::default()));
        model.add_group("arm", &["a"]).unwrap();
        let model = Arc::new(model);
        let mut trajectory = RobotTrajectory::new(model.clone(), "arm").unwrap();
        for duration in [0.0, 0.5, 0.25] {
            trajectory.add_suffix_waypoint(Arc::new(RobotState::new(model.clone())), duration);
        }
        trajectory
    }

    #[test]
    fn test_duration_from_start() {
        let trajectory = trajectory();
        assert_eq!(trajectory.waypoint_count(), 3);
        assert_eq!(trajectory.waypoint_duration_from_start(0), 0.0);
        assert_eq!(trajectory.waypoint_duration_from_start(1), 0.5);
        assert_eq!(trajectory.waypoint_duration_from_start(2), 0.75);
        assert_eq!(trajectory.duration(), 0.75);
    }

    #[test]
    fn test_clear() {
        let mut trajectory = trajectory();
        trajectory.clear();
        assert!(trajectory.is_empty());
        assert_eq!(trajectory.duration(), 0.0);
        assert_eq!(trajectory.group_name(), "arm");
    }

    #[test]
    fn test_unknown_group() {
        let model = Arc::new(RobotModel::new("empty"));
        assert!(matches!(RobotTrajectory::new(model, "arm"), Err(ConversionError::UnknownGroup(_))));
    }
}
