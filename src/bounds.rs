//! Dense lower/upper bound vectors for the dynamics model, built from the
//! bounds the joints of a group declare.

use tracing::debug;

use crate::config::BoundDefaults;
use crate::conversion_error::ConversionError;
use crate::conversions::joint_ordinals;
use crate::joint_model::VariableBounds;
use crate::model_traits::{DenseVector, DynamicsModel, JointGroup};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Quantity {
    Position,
    Velocity,
    Acceleration,
    Jerk,
}

impl Quantity {
    pub const ALL: [Quantity; 4] = [Quantity::Position, Quantity::Velocity, Quantity::Acceleration, Quantity::Jerk];

    /// Size of the bound vectors: positions live in the configuration space,
    /// all derivatives in the tangent space.
    fn dimension<M: DynamicsModel + ?Sized>(&self, plant: &M) -> usize {
        match self {
            Quantity::Position => plant.num_positions(),
            _ => plant.num_velocities(),
        }
    }

    fn default_range(&self, defaults: &BoundDefaults) -> (f64, f64) {
        match self {
            Quantity::Position => (f64::MIN, f64::MAX),
            Quantity::Velocity => (-defaults.max_velocity, defaults.max_velocity),
            Quantity::Acceleration => (-defaults.max_acceleration, defaults.max_acceleration),
            Quantity::Jerk => (-defaults.max_jerk, defaults.max_jerk),
        }
    }

    /// Declared (min, max) for this quantity, if the bound is in effect.
    fn declared(&self, bounds: &VariableBounds) -> Option<(f64, f64)> {
        match self {
            Quantity::Position if bounds.position_bounded => Some((bounds.min_position, bounds.max_position)),
            Quantity::Velocity if bounds.velocity_bounded => Some((bounds.min_velocity, bounds.max_velocity)),
            Quantity::Acceleration if bounds.acceleration_bounded =>
                Some((bounds.min_acceleration, bounds.max_acceleration)),
            Quantity::Jerk if bounds.jerk_bounded => Some((bounds.min_jerk, bounds.max_jerk)),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Quantity::Position => "position",
            Quantity::Velocity => "velocity",
            Quantity::Acceleration => "acceleration",
            Quantity::Jerk => "jerk",
        }
    }
}

/// Lower and upper bound vectors of one quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub lower: DenseVector,
    pub upper: DenseVector,
}

/// Bounds for `quantity` with the built-in default magnitudes.
pub fn extract_bounds<G, M>(group: &G, plant: &M, quantity: Quantity) -> Result<Bounds, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    extract_bounds_with(group, plant, quantity, &BoundDefaults::default())
}

/// Bounds for `quantity`, sized to the full dynamics model. Every entry starts at
/// the default for the quantity; entries of the group's joints that declare a bound
/// are overwritten with it. Only the first variable of each joint is consulted.
pub fn extract_bounds_with<G, M>(group: &G, plant: &M, quantity: Quantity, defaults: &BoundDefaults)
                                 -> Result<Bounds, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    let dimension = quantity.dimension(plant);
    let joints = group.active_joints();
    assert!(
        dimension >= joints.len(),
        "Dynamics model has {} {} entries, fewer than the {} active joints of group {}",
        dimension, quantity.name(), joints.len(), group.name()
    );

    let (default_lower, default_upper) = quantity.default_range(defaults);
    let mut lower = DenseVector::from_element(dimension, default_lower);
    let mut upper = DenseVector::from_element(dimension, default_upper);

    let ordinals = joint_ordinals(group, plant)?;
    for (joint, ordinal) in joints.iter().zip(ordinals) {
        let variable_bounds = joint.variable_bounds();
        if variable_bounds.len() > 1 {
            debug!("Joint {} has {} variables, only the first one is bounded",
                joint.name(), variable_bounds.len());
        }
        let declared = variable_bounds.first().and_then(|b| quantity.declared(b));
        if let Some((min, max)) = declared {
            lower[ordinal] = min;
            upper[ordinal] = max;
        }
    }
    Ok(Bounds { lower, upper })
}

pub fn position_bounds<G, M>(group: &G, plant: &M) -> Result<Bounds, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    extract_bounds(group, plant, Quantity::Position)
}

pub fn velocity_bounds<G, M>(group: &G, plant: &M) -> Result<Bounds, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    extract_bounds(group, plant, Quantity::Velocity)
}

pub fn acceleration_bounds<G, M>(group: &G, plant: &M) -> Result<Bounds, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    extract_bounds(group, plant, Quantity::Acceleration)
}

pub fn jerk_bounds<G, M>(group: &G, plant: &M) -> Result<Bounds, ConversionError>
where
    G: JointGroup + ?Sized,
    M: DynamicsModel + ?Sized,
{
    extract_bounds(group, plant, Quantity::Jerk)
}

/// All four bound pairs at once, as the optimizer consumes them.
#[derive(Debug, Clone, PartialEq)]
pub struct JointLimits {
    pub position: Bounds,
    pub velocity: Bounds,
    pub acceleration: Bounds,
    pub jerk: Bounds,
}

impl JointLimits {
    pub fn extract<G, M>(group: &G, plant: &M, defaults: &BoundDefaults) -> Result<Self, ConversionError>
    where
        G: JointGroup + ?Sized,
        M: DynamicsModel + ?Sized,
    {
        Ok(JointLimits {
            position: extract_bounds_with(group, plant, Quantity::Position, defaults)?,
            velocity: extract_bounds_with(group, plant, Quantity::Velocity, defaults)?,
            acceleration: extract_bounds_with(group, plant, Quantity::Acceleration, defaults)?,
            jerk: extract_bounds_with(group, plant, Quantity::Jerk, defaults)?,
        })
    }

    pub fn get(&self, quantity: Quantity) -> &Bounds {
        match quantity {
            Quantity::Position => &self.position,
            Quantity::Velocity => &self.velocity,
            Quantity::Acceleration => &self.acceleration,
            Quantity::Jerk => &self.jerk,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint_model::{JointModel, RobotModel};
    use crate::multibody_plant::MultibodyPlant;

    /// Plant with the group's joints registered in reverse, plus one extra joint.
    fn setup(bounds: [VariableBounds; 2]) -> (RobotModel, MultibodyPlant) {
        let mut model = RobotModel::new("test");
        model.add_joint(JointModel::revolute("j1", bounds[0]));
        model.add_joint(JointModel::revolute("j2", bounds[1]));
        model.add_group("arm", &["j1", "j2"]).unwrap();

        let mut plant = MultibodyPlant::new();
        plant.add_joint("gripper");
        plant.add_joint("j2");
        plant.add_joint("j1");
        (model, plant)
    }

    #[test]
    fn test_defaults_without_declared_bounds() {
        let (model, plant) = setup([VariableBounds::default(); 2]);
        let group = model.joint_model_group("arm").unwrap();

        let position = position_bounds(group, &plant).unwrap();
        assert!(position.lower.iter().all(|&v| v == f64::MIN));
        assert!(position.upper.iter().all(|&v| v == f64::MAX));

        for quantity in [Quantity::Velocity, Quantity::Acceleration, Quantity::Jerk] {
            let bounds = extract_bounds(group, &plant, quantity).unwrap();
            assert_eq!(bounds.lower.len(), 3);
            assert!(bounds.lower.iter().all(|&v| v == -100.0), "{} lower", quantity.name());
            assert!(bounds.upper.iter().all(|&v| v == 100.0), "{} upper", quantity.name());
        }
    }

    #[test]
    fn test_declared_position_bound_at_resolved_index() {
        let (model, plant) = setup([
            VariableBounds::default().with_position(-1.0, 1.0),
            VariableBounds::default(),
        ]);
        let group = model.joint_model_group("arm").unwrap();
        let bounds = position_bounds(group, &plant).unwrap();

        // j1 is registered third in the plant
        assert_eq!(bounds.lower[2], -1.0);
        assert_eq!(bounds.upper[2], 1.0);
        assert_eq!(bounds.lower[0], f64::MIN);
        assert_eq!(bounds.upper[1], f64::MAX);
    }

    #[test]
    fn test_each_quantity_reads_its_own_flag() {
        let (model, plant) = setup([
            VariableBounds::default().with_velocity(-2.0, 2.0).with_jerk(-500.0, 400.0),
            VariableBounds::default().with_acceleration(-7.0, 8.0),
        ]);
        let group = model.joint_model_group("arm").unwrap();

        let velocity = velocity_bounds(group, &plant).unwrap();
        assert_eq!((velocity.lower[2], velocity.upper[2]), (-2.0, 2.0));
        assert_eq!((velocity.lower[1], velocity.upper[1]), (-100.0, 100.0));

        let acceleration = acceleration_bounds(group, &plant).unwrap();
        assert_eq!((acceleration.lower[1], acceleration.upper[1]), (-7.0, 8.0));
        assert_eq!((acceleration.lower[2], acceleration.upper[2]), (-100.0, 100.0));

        let jerk = jerk_bounds(group, &plant).unwrap();
        assert_eq!((jerk.lower[2], jerk.upper[2]), (-500.0, 400.0));
    }

    #[test]
    fn test_custom_defaults() {
        let (model, plant) = setup([VariableBounds::default(); 2]);
        let group = model.joint_model_group("arm").unwrap();
        let defaults = BoundDefaults { max_velocity: 1.5, max_acceleration: 3.0, max_jerk: 9.0 };
        let limits = JointLimits::extract(group, &plant, &defaults).unwrap();
        assert!(limits.get(Quantity::Velocity).upper.iter().all(|&v| v == 1.5));
        assert!(limits.get(Quantity::Acceleration).lower.iter().all(|&v| v == -3.0));
        assert!(limits.get(Quantity::Jerk).upper.iter().all(|&v| v == 9.0));
        assert!(limits.get(Quantity::Position).upper.iter().all(|&v| v == f64::MAX));
    }

    #[test]
    fn test_joint_missing_from_plant() {
        let (model, _) = setup([VariableBounds::default(); 2]);
        let group = model.joint_model_group("arm").unwrap();
        let mut plant = MultibodyPlant::new();
        plant.add_joint("j1");
        plant.add_joint("other");
        match velocity_bounds(group, &plant) {
            Err(ConversionError::UnknownJoint(name)) => assert_eq!(name, "j2"),
            other => panic!("Expected UnknownJoint, got {:?}", other),
        }
    }

    #[test]
    #[should_panic]
    fn test_plant_smaller_than_group() {
        let (model, _) = setup([VariableBounds::default(); 2]);
        let group = model.joint_model_group("arm").unwrap();
        let mut plant = MultibodyPlant::new();
        plant.add_joint("j1");
        let _ = position_bounds(group, &plant);
    }
}
