//! Ordinal-indexed multibody plant as seen by the conversions: a joint registry
//! mapping every single-DOF joint to its place in the dense state vectors.

use std::collections::HashMap;

use crate::conversion_error::ConversionError;
use crate::joint_model::RobotModel;
use crate::model_traits::DynamicsModel;

#[derive(Debug, Clone, Default)]
pub struct MultibodyPlant {
    joint_names: Vec<String>,
    ordinals: HashMap<String, usize>,
}

impl MultibodyPlant {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every active joint of the model, in model order.
    pub fn from_robot_model(model: &RobotModel) -> Self {
        let mut plant = MultibodyPlant::new();
        for joint in model.active_joint_models() {
            plant.add_joint(joint.name());
        }
        plant
    }

    /// Registers a joint and returns its ordinal. Registering a known name
    /// returns the existing ordinal.
    pub fn add_joint(&mut self, name: &str) -> usize {
        if let Some(&ordinal) = self.ordinals.get(name) {
            return ordinal;
        }
        let ordinal = self.joint_names.len();
        self.joint_names.push(name.to_string());
        self.ordinals.insert(name.to_string(), ordinal);
        ordinal
    }

    pub fn num_joints(&self) -> usize {
        self.joint_names.len()
    }

    /// Name of the joint at the given ordinal.
    pub fn joint_name(&self, ordinal: usize) -> Option<&str> {
        self.joint_names.get(ordinal).map(String::as_str)
    }
}

impl DynamicsModel for MultibodyPlant {
    fn num_positions(&self) -> usize {
        self.joint_names.len()
    }

    fn num_velocities(&self) -> usize {
        self.joint_names.len()
    }

    fn joint_ordinal(&self, name: &str) -> Result<usize, ConversionError> {
        self.ordinals
            .get(name)
            .copied()
            .ok_or_else(|| ConversionError::UnknownJoint(name.to_string()))
    }
}
