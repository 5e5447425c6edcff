//! Named joint-space state of a robot model.

use std::collections::HashMap;
use std::sync::Arc;

use crate::conversion_error::ConversionError;
use crate::joint_model::{JointModel, RobotModel};
use crate::model_traits::JointGroup;

/// Position and velocity of every active joint of a model, addressed by joint name.
/// Joints that were never set read as zero.
#[derive(Debug, Clone)]
pub struct RobotState {
    model: Arc<RobotModel>,
    positions: HashMap<String, f64>,
    velocities: HashMap<String, f64>,
}

impl RobotState {
    pub fn new(model: Arc<RobotModel>) -> Self {
        let positions = model.active_joint_models().map(|j| (j.name().to_string(), 0.0)).collect();
        let velocities = model.active_joint_models().map(|j| (j.name().to_string(), 0.0)).collect();
        RobotState { model, positions, velocities }
    }

    pub fn robot_model(&self) -> &Arc<RobotModel> {
        &self.model
    }

    pub fn variable_position(&self, joint_name: &str) -> Result<f64, ConversionError> {
        self.positions
            .get(joint_name)
            .copied()
            .ok_or_else(|| ConversionError::UnknownJoint(joint_name.to_string()))
    }

    pub fn variable_velocity(&self, joint_name: &str) -> Result<f64, ConversionError> {
        self.velocities
            .get(joint_name)
            .copied()
            .ok_or_else(|| ConversionError::UnknownJoint(joint_name.to_string()))
    }

    pub fn set_variable_position(&mut self, joint_name: &str, value: f64) -> Result<(), ConversionError> {
        let slot = self.positions
            .get_mut(joint_name)
            .ok_or_else(|| ConversionError::UnknownJoint(joint_name.to_string()))?;
        *slot = value;
        Ok(())
    }

    pub fn set_variable_velocity(&mut self, joint_name: &str, value: f64) -> Result<(), ConversionError> {
        let slot = self.velocities
            .get_mut(joint_name)
            .ok_or_else(|| ConversionError::UnknownJoint(joint_name.to_string()))?;
        *slot = value;
        Ok(())
    }

    /// Sets the position variables of a joint. Single-variable joints read `values[0]`.
    pub fn set_joint_positions(&mut self, joint: &JointModel, values: &[f64]) -> Result<(), ConversionError> {
        match values.first() {
            Some(&value) => self.set_variable_position(joint.name(), value),
            None => Err(ConversionError::MissingField(format!("position of {}", joint.name()))),
        }
    }

    pub fn set_joint_velocities(&mut self, joint: &JointModel, values: &[f64]) -> Result<(), ConversionError> {
        match values.first() {
            Some(&value) => self.set_variable_velocity(joint.name(), value),
            None => Err(ConversionError::MissingField(format!("velocity of {}", joint.name()))),
        }
    }

    /// Positions of the group's active joints, in group order.
    pub fn joint_group_positions<G: JointGroup + ?Sized>(&self, group: &G) -> Result<Vec<f64>, ConversionError> {
        group.active_joints()
            .iter()
            .map(|j| self.variable_position(j.name()))
            .collect()
    }

    pub fn joint_group_velocities<G: JointGroup + ?Sized>(&self, group: &G) -> Result<Vec<f64>, ConversionError> {
        group.active_joints()
            .iter()
            .map(|j| self.variable_velocity(j.name()))
            .collect()
    }

    pub fn set_joint_group_positions<G: JointGroup + ?Sized>(&mut self, group: &G, values: &[f64])
                                                             -> Result<(), ConversionError> {
        let joints = group.active_joints();
        if values.len() != joints.len() {
            return Err(ConversionError::InvalidLength { expected: joints.len(), found: values.len() });
        }
        for (joint, &value) in joints.iter().zip(values) {
            self.set_variable_position(joint.name(), value)?;
        }
        Ok(())
    }

    pub fn set_joint_group_velocities<G: JointGroup + ?Sized>(&mut self, group: &G, values: &[f64])
                                                              -> Result<(), ConversionError> {
        let joints = group.active_joints();
        if values.len() != joints.len() {
            return Err(ConversionError::InvalidLength { expected: joints.len(), found: values.len() });
        }
        for (joint, &value) in joints.iter().zip(values) {
            self.set_variable_velocity(joint.name(), value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint_model::{JointType, VariableBounds};

    fn model() -> Arc<RobotModel> {
        let mut model = RobotModel::new("test");
        model.add_joint(JointModel::revolute("a", VariableBounds::default()));
        model.add_joint(JointModel::new("base", JointType::Fixed, VariableBounds::default()));
        model.add_joint(JointModel::revolute("b", VariableBounds::default()));
        model.add_group("all", &["a", "b"]).unwrap();
        Arc::new(model)
    }

    #[test]
    fn test_new_state_is_zero() {
        let state = RobotState::new(model());
        assert_eq!(state.variable_position("a").unwrap(), 0.0);
        assert_eq!(state.variable_velocity("b").unwrap(), 0.0);
    }

    #[test]
    fn test_fixed_joint_has_no_variable() {
        let state = RobotState::new(model());
        assert!(matches!(state.variable_position("base"), Err(ConversionError::UnknownJoint(_))));
    }

    #[test]
    fn test_group_positions_in_group_order() {
        let model = model();
        let mut state = RobotState::new(model.clone());
        let group = model.joint_model_group("all").unwrap();
        state.set_joint_group_positions(group, &[0.25, -0.5]).unwrap();
        assert_eq!(state.joint_group_positions(group).unwrap(), vec![0.25, -0.5]);
        assert_eq!(state.variable_position("b").unwrap(), -0.5);
    }

    #[test]
    fn test_group_length_mismatch() {
        let model = model();
        let mut state = RobotState::new(model.clone());
        let group = model.joint_model_group("all").unwrap();
        assert!(state.set_joint_group_velocities(group, &[1.0]).is_err());
        assert_eq!(state.variable_velocity("a").unwrap(), 0.0);
    }
}
