//! Kinematic robot model: joints, their declared bounds and named joint groups.

use std::collections::HashMap;

use crate::conversion_error::ConversionError;
use crate::model_traits::JointGroup;

/// Declared bounds of a single joint variable. Each quantity is only in effect
/// when its `*_bounded` flag is set; otherwise min/max values are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VariableBounds {
    pub position_bounded: bool,
    pub min_position: f64,
    pub max_position: f64,

    pub velocity_bounded: bool,
    pub min_velocity: f64,
    pub max_velocity: f64,

    pub acceleration_bounded: bool,
    pub min_acceleration: f64,
    pub max_acceleration: f64,

    pub jerk_bounded: bool,
    pub min_jerk: f64,
    pub max_jerk: f64,
}

impl VariableBounds {
    pub fn with_position(mut self, min: f64, max: f64) -> Self {
        self.position_bounded = true;
        self.min_position = min;
        self.max_position = max;
        self
    }

    pub fn with_velocity(mut self, min: f64, max: f64) -> Self {
        self.velocity_bounded = true;
        self.min_velocity = min;
        self.max_velocity = max;
        self
    }

    pub fn with_acceleration(mut self, min: f64, max: f64) -> Self {
        self.acceleration_bounded = true;
        self.min_acceleration = min;
        self.max_acceleration = max;
        self
    }

    pub fn with_jerk(mut self, min: f64, max: f64) -> Self {
        self.jerk_bounded = true;
        self.min_jerk = min;
        self.max_jerk = max;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointType {
    Revolute,
    Continuous,
    Prismatic,
    Fixed,
}

impl JointType {
    /// Parses the URDF `type` attribute. Joint types with more than one degree of
    /// freedom (floating, planar) are not supported.
    pub fn from_urdf(value: &str) -> Option<JointType> {
        match value {
            "revolute" => Some(JointType::Revolute),
            "continuous" => Some(JointType::Continuous),
            "prismatic" => Some(JointType::Prismatic),
            "fixed" => Some(JointType::Fixed),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != JointType::Fixed
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct JointModel {
    name: String,
    joint_type: JointType,
    /// One entry per joint variable. All supported joints have exactly one.
    variable_bounds: Vec<VariableBounds>,
}

impl JointModel {
    pub fn new(name: impl Into<String>, joint_type: JointType, bounds: VariableBounds) -> Self {
        let variable_bounds = if joint_type.is_active() { vec![bounds] } else { Vec::new() };
        JointModel {
            name: name.into(),
            joint_type,
            variable_bounds,
        }
    }

    pub fn revolute(name: impl Into<String>, bounds: VariableBounds) -> Self {
        JointModel::new(name, JointType::Revolute, bounds)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn joint_type(&self) -> JointType {
        self.joint_type
    }

    pub fn variable_count(&self) -> usize {
        self.variable_bounds.len()
    }

    pub fn variable_bounds(&self) -> &[VariableBounds] {
        &self.variable_bounds
    }

    pub fn variable_bounds_mut(&mut self) -> &mut [VariableBounds] {
        &mut self.variable_bounds
    }
}

/// Named group of active joints. Joint order is the order of declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct JointModelGroup {
    name: String,
    joints: Vec<JointModel>,
}

impl JointModelGroup {
    pub fn joint_names(&self) -> Vec<&str> {
        self.joints.iter().map(|j| j.name()).collect()
    }
}

impl JointGroup for JointModelGroup {
    fn name(&self) -> &str {
        &self.name
    }

    fn active_joints(&self) -> &[JointModel] {
        &self.joints
    }
}

/// Robot model holding all joints and the joint groups defined on them.
#[derive(Debug, Clone, Default)]
pub struct RobotModel {
    name: String,
    joints: Vec<JointModel>,
    joint_index: HashMap<String, usize>,
    groups: Vec<JointModelGroup>,
}

impl RobotModel {
    pub fn new(name: impl Into<String>) -> Self {
        RobotModel {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Adds a joint. A joint with the same name replaces the earlier declaration
    /// but keeps its place in the joint order.
    pub fn add_joint(&mut self, joint: JointModel) {
        match self.joint_index.get(joint.name()) {
            Some(&index) => self.joints[index] = joint,
            None => {
                self.joint_index.insert(joint.name().to_string(), self.joints.len());
                self.joints.push(joint);
            }
        }
    }

    /// Defines a joint group from joint names. Fixed joints are skipped as they
    /// have no variables. Redefining a group replaces it.
    pub fn add_group<S: AsRef<str>>(&mut self, name: &str, joint_names: &[S]) -> Result<(), ConversionError> {
        let mut joints = Vec::with_capacity(joint_names.len());
        for joint_name in joint_names {
            let joint = self.joint_model(joint_name.as_ref())?;
            if joint.joint_type().is_active() {
                joints.push(joint.clone());
            }
        }
        let group = JointModelGroup { name: name.to_string(), joints };
        match self.groups.iter_mut().find(|g| g.name == name) {
            Some(existing) => *existing = group,
            None => self.groups.push(group),
        }
        Ok(())
    }

    pub fn joint_model(&self, name: &str) -> Result<&JointModel, ConversionError> {
        self.joint_index
            .get(name)
            .map(|&index| &self.joints[index])
            .ok_or_else(|| ConversionError::UnknownJoint(name.to_string()))
    }

    pub fn joint_model_mut(&mut self, name: &str) -> Result<&mut JointModel, ConversionError> {
        match self.joint_index.get(name) {
            Some(&index) => Ok(&mut self.joints[index]),
            None => Err(ConversionError::UnknownJoint(name.to_string())),
        }
    }

    pub fn joint_models(&self) -> &[JointModel] {
        &self.joints
    }

    pub fn active_joint_models(&self) -> impl Iterator<Item = &JointModel> {
        self.joints.iter().filter(|j| j.joint_type().is_active())
    }

    pub fn joint_model_group(&self, name: &str) -> Result<&JointModelGroup, ConversionError> {
        self.groups
            .iter()
            .find(|g| g.name == name)
            .ok_or_else(|| ConversionError::UnknownGroup(name.to_string()))
    }

    pub fn joint_model_groups(&self) -> &[JointModelGroup] {
        &self.groups
    }

    /// Re-reads the joints of every group from the model so that bound changes
    /// made after the groups were defined are visible through the groups.
    pub fn refresh_groups(&mut self) {
        for group in &mut self.groups {
            for joint in &mut group.joints {
                if let Some(&index) = self.joint_index.get(joint.name()) {
                    *joint = self.joints[index].clone();
                }
            }
        }
    }
}
