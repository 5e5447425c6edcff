//! Traits at the boundary between the named kinematic model and the
//! ordinal-indexed dynamics model.

use nalgebra::DVector;

use crate::conversion_error::ConversionError;
use crate::joint_model::JointModel;

/// Dense vector addressed by the ordinals of the dynamics model.
/// ```
/// use nalgebra::DVector;
/// type DenseVector = DVector<f64>;
///
/// let mut positions = DenseVector::zeros(3);
/// positions[2] = 0.5; // Joint with ordinal 2
/// ```
pub type DenseVector = DVector<f64>;

/// A named, ordered subset of joints moved together.
pub trait JointGroup {
    fn name(&self) -> &str;

    /// Active (non-fixed) joints of this group, in group order.
    fn active_joints(&self) -> &[JointModel];
}

/// Dynamics model that addresses joints by dense ordinal indices. Ordinals are
/// assigned by the implementation and are authoritative.
pub trait DynamicsModel {
    /// Dimension of the position vector.
    fn num_positions(&self) -> usize;

    /// Dimension of the velocity vector (tangent space). Acceleration and jerk
    /// share this dimension.
    fn num_velocities(&self) -> usize;

    /// Ordinal of the joint with the given name. A name the model does not know
    /// is a model mismatch and must be reported, never guessed.
    fn joint_ordinal(&self, name: &str) -> Result<usize, ConversionError>;
}

/// Continuous trajectory over dense position vectors.
pub trait Trajectory {
    fn start_time(&self) -> f64;
    fn end_time(&self) -> f64;

    /// Dimension of the values this trajectory returns.
    fn rows(&self) -> usize;

    fn value(&self, t: f64) -> DenseVector;

    /// First time derivative of the value at `t`.
    fn eval_derivative(&self, t: f64) -> DenseVector;
}
