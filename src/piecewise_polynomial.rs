//! Piecewise polynomial trajectories of order zero and one over dense vectors.

use crate::conversion_error::ConversionError;
use crate::model_traits::{DenseVector, Trajectory};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hold {
    /// Piecewise constant: segment `i` holds `samples[i]`.
    Zero,
    /// Piecewise linear between consecutive samples.
    First,
}

/// Trajectory built from samples at break times. Between breaks the value is
/// held (zero order) or linearly interpolated (first order). Queries outside
/// `[start_time, end_time]` are clamped to the domain.
#[derive(Debug, Clone)]
pub struct PiecewisePolynomial {
    hold: Hold,
    breaks: Vec<f64>,
    samples: Vec<DenseVector>,
}

impl PiecewisePolynomial {
    /// Piecewise linear interpolation through `samples` at `breaks`. The result
    /// passes exactly through every sample at its break time. A single sample
    /// gives a constant trajectory of zero duration.
    pub fn first_order_hold(breaks: Vec<f64>, samples: Vec<DenseVector>) -> Result<Self, ConversionError> {
        Self::validate(&breaks, &samples)?;
        Ok(PiecewisePolynomial { hold: Hold::First, breaks, samples })
    }

    pub fn zero_order_hold(breaks: Vec<f64>, samples: Vec<DenseVector>) -> Result<Self, ConversionError> {
        Self::validate(&breaks, &samples)?;
        Ok(PiecewisePolynomial { hold: Hold::Zero, breaks, samples })
    }

    fn validate(breaks: &[f64], samples: &[DenseVector]) -> Result<(), ConversionError> {
        if samples.is_empty() {
            return Err(ConversionError::InvalidTrajectory("no samples".to_string()));
        }
        if breaks.len() != samples.len() {
            return Err(ConversionError::InvalidTrajectory(format!(
                "{} breaks for {} samples", breaks.len(), samples.len()
            )));
        }
        let rows = samples[0].len();
        if let Some(i) = samples.iter().position(|s| s.len() != rows) {
            return Err(ConversionError::InvalidTrajectory(format!(
                "sample {} has {} rows, expected {}", i, samples[i].len(), rows
            )));
        }
        if let Some(t) = breaks.iter().find(|t| !t.is_finite()) {
            return Err(ConversionError::InvalidTrajectory(format!("break time {} is not finite", t)));
        }
        if let Some(i) = breaks.windows(2).position(|w| w[1] <= w[0]) {
            return Err(ConversionError::InvalidTrajectory(format!(
                "break times must be strictly increasing, got {} then {}", breaks[i], breaks[i + 1]
            )));
        }
        Ok(())
    }

    pub fn hold(&self) -> Hold {
        self.hold
    }

    pub fn breaks(&self) -> &[f64] {
        &self.breaks
    }

    pub fn segment_count(&self) -> usize {
        self.breaks.len().saturating_sub(1)
    }

    /// Segment used for time `t`: the one starting at or before `t`. The last
    /// break belongs to the last segment.
    fn segment_index(&self, t: f64) -> usize {
        let at_or_before = self.breaks.partition_point(|&b| b <= t);
        at_or_before.saturating_sub(1).min(self.segment_count().saturating_sub(1))
    }

    fn clamp(&self, t: f64) -> f64 {
        t.clamp(self.start_time(), self.end_time())
    }

    /// Derivative trajectory. The derivative of a first order hold is a zero
    /// order hold of the segment slopes; the derivative of a zero order hold is zero.
    pub fn derivative(&self) -> PiecewisePolynomial {
        let samples = (0..self.breaks.len())
            .map(|i| self.slope(self.segment_index(self.breaks[i])))
            .collect();
        PiecewisePolynomial { hold: Hold::Zero, breaks: self.breaks.clone(), samples }
    }

    fn slope(&self, segment: usize) -> DenseVector {
        if self.hold == Hold::Zero || self.segment_count() == 0 {
            return DenseVector::zeros(self.rows());
        }
        let h = self.breaks[segment + 1] - self.breaks[segment];
        (&self.samples[segment + 1] - &self.samples[segment]) / h
    }
}

impl Trajectory for PiecewisePolynomial {
    fn start_time(&self) -> f64 {
        self.breaks[0]
    }

    fn end_time(&self) -> f64 {
        self.breaks[self.breaks.len() - 1]
    }

    fn rows(&self) -> usize {
        self.samples[0].len()
    }

    fn value(&self, t: f64) -> DenseVector {
        let t = self.clamp(t);
        if self.segment_count() == 0 {
            return self.samples[0].clone();
        }
        let i = self.segment_index(t);
        match self.hold {
            Hold::Zero => {
                if t >= self.end_time() {
                    self.samples[i + 1].clone()
                } else {
                    self.samples[i].clone()
                }
            }
            Hold::First => {
                // Convex combination is exact at both ends of the segment.
                let u = (t - self.breaks[i]) / (self.breaks[i + 1] - self.breaks[i]);
                &self.samples[i] * (1.0 - u) + &self.samples[i + 1] * u
            }
        }
    }

    fn eval_derivative(&self, t: f64) -> DenseVector {
        self.slope(self.segment_index(self.clamp(t)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn linear() -> PiecewisePolynomial {
        PiecewisePolynomial::first_order_hold(
            vec![0.0, 1.0, 3.0],
            vec![
                DenseVector::from_vec(vec![0.0, 1.0]),
                DenseVector::from_vec(vec![2.0, 1.0]),
                DenseVector::from_vec(vec![0.0, 2.0]),
            ],
        ).expect("valid breaks")
    }

    #[test]
    fn test_passes_through_samples() {
        let pp = linear();
        assert_eq!(pp.value(0.0), DenseVector::from_vec(vec![0.0, 1.0]));
        assert_eq!(pp.value(1.0), DenseVector::from_vec(vec![2.0, 1.0]));
        assert_eq!(pp.value(3.0), DenseVector::from_vec(vec![0.0, 2.0]));
    }

    #[test]
    fn test_interpolates_linearly() {
        let pp = linear();
        let v = pp.value(2.0);
        assert!((v[0] - 1.0).abs() < 1e-12);
        assert!((v[1] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_derivative_uses_segment_starting_at_break() {
        let pp = linear();
        assert_eq!(pp.eval_derivative(0.5), DenseVector::from_vec(vec![2.0, 0.0]));
        assert_eq!(pp.eval_derivative(1.0), DenseVector::from_vec(vec![-1.0, 0.5]));
        // End time belongs to the last segment
        assert_eq!(pp.eval_derivative(3.0), DenseVector::from_vec(vec![-1.0, 0.5]));
    }

    #[test]
    fn test_clamps_outside_domain() {
        let pp = linear();
        assert_eq!(pp.value(-1.0), pp.value(0.0));
        assert_eq!(pp.value(10.0), pp.value(3.0));
    }

    #[test]
    fn test_derivative_trajectory() {
        let d = linear().derivative();
        assert_eq!(d.hold(), Hold::Zero);
        assert_eq!(d.value(0.25), DenseVector::from_vec(vec![2.0, 0.0]));
        assert_eq!(d.value(2.5), DenseVector::from_vec(vec![-1.0, 0.5]));
        assert_eq!(d.eval_derivative(2.5), DenseVector::zeros(2));
    }

    #[test]
    fn test_zero_order_hold() {
        let pp = PiecewisePolynomial::zero_order_hold(
            vec![0.0, 1.0, 2.0],
            vec![
                DenseVector::from_vec(vec![1.0]),
                DenseVector::from_vec(vec![3.0]),
                DenseVector::from_vec(vec![-2.0]),
            ],
        ).expect("valid breaks");
        assert_eq!(pp.hold(), Hold::Zero);
        assert_eq!(pp.value(0.0)[0], 1.0);
        assert_eq!(pp.value(0.99)[0], 1.0);
        assert_eq!(pp.value(1.0)[0], 3.0);
        assert_eq!(pp.value(2.0)[0], -2.0);
        assert_eq!(pp.eval_derivative(0.5)[0], 0.0);
        assert!(PiecewisePolynomial::zero_order_hold(vec![1.0, 1.0], vec![DenseVector::zeros(1); 2]).is_err());
    }

    #[test]
    fn test_single_sample() {
        let pp = PiecewisePolynomial::first_order_hold(vec![0.0], vec![DenseVector::from_vec(vec![4.0])])
            .expect("single sample is valid");
        assert_eq!(pp.end_time(), 0.0);
        assert_eq!(pp.value(0.0)[0], 4.0);
        assert_eq!(pp.eval_derivative(0.0)[0], 0.0);
    }

    #[test]
    fn test_rejects_malformed_input() {
        let s = || DenseVector::zeros(1);
        assert!(PiecewisePolynomial::first_order_hold(vec![], vec![]).is_err());
        assert!(PiecewisePolynomial::first_order_hold(vec![0.0, 1.0], vec![s()]).is_err());
        assert!(PiecewisePolynomial::first_order_hold(vec![0.0, 0.0], vec![s(), s()]).is_err());
        assert!(PiecewisePolynomial::first_order_hold(vec![1.0, 0.5], vec![s(), s()]).is_err());
        assert!(PiecewisePolynomial::first_order_hold(vec![0.0, 1.0], vec![s(), DenseVector::zeros(2)]).is_err());
    }
}
