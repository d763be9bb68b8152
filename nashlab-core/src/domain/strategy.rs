//! Mixed strategies.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Probability vectors must sum to one within this tolerance.
pub const SUM_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StrategyError {
    #[error("strategy vector is empty")]
    Empty,
    #[error("probability {index} is not finite")]
    NonFinite { index: usize },
    #[error("probability {index} is negative ({value})")]
    Negative { index: usize, value: f64 },
    #[error("probabilities sum to {0}, expected 1")]
    BadSum(f64),
}

/// A probability distribution over one player's pure strategies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<f64>", into = "Vec<f64>")]
pub struct StrategyVector(Vec<f64>);

impl StrategyVector {
    /// Validate an explicit probability vector.
    pub fn new(probabilities: Vec<f64>) -> Result<Self, StrategyError> {
        if probabilities.is_empty() {
            return Err(StrategyError::Empty);
        }
        for (index, &value) in probabilities.iter().enumerate() {
            if !value.is_finite() {
                return Err(StrategyError::NonFinite { index });
            }
            if value < 0.0 {
                return Err(StrategyError::Negative { index, value });
            }
        }
        let sum: f64 = probabilities.iter().sum();
        if (sum - 1.0).abs() > SUM_TOLERANCE {
            return Err(StrategyError::BadSum(sum));
        }
        Ok(Self(probabilities))
    }

    /// Normalise raw solver weights into a distribution.
    ///
    /// Components in `[-tolerance, 0)` are clamped to zero. Returns `None`
    /// when a component is more negative than that, any component is not
    /// finite, or the weights sum to (almost) nothing.
    pub fn from_weights(weights: &[f64], tolerance: f64) -> Option<Self> {
        if weights.is_empty() || weights.iter().any(|w| !w.is_finite() || *w < -tolerance) {
            return None;
        }
        // `-0.0` and tiny negatives both become `+0.0`.
        let clamped: Vec<f64> = weights.iter().map(|&w| if w > 0.0 { w } else { 0.0 }).collect();
        let sum: f64 = clamped.iter().sum();
        if sum <= tolerance {
            return None;
        }
        Some(Self(clamped.into_iter().map(|w| w / sum).collect()))
    }

    /// All weight on one pure strategy.
    pub fn pure(len: usize, index: usize) -> Self {
        let mut probabilities = vec![0.0; len];
        probabilities[index] = 1.0;
        Self(probabilities)
    }

    pub fn uniform(len: usize) -> Self {
        Self(vec![1.0 / len as f64; len])
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indices played with probability above `tolerance`.
    pub fn support(&self, tolerance: f64) -> Vec<usize> {
        self.0
            .iter()
            .enumerate()
            .filter(|&(_, &p)| p > tolerance)
            .map(|(i, _)| i)
            .collect()
    }

    /// The pure strategy index, if this vector is (numerically) pure.
    pub fn pure_index(&self, tolerance: f64) -> Option<usize> {
        match self.support(tolerance).as_slice() {
            [index] => Some(*index),
            _ => None,
        }
    }

    /// Component-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }
}

impl TryFrom<Vec<f64>> for StrategyVector {
    type Error = StrategyError;

    fn try_from(probabilities: Vec<f64>) -> Result<Self, Self::Error> {
        Self::new(probabilities)
    }
}

impl From<StrategyVector> for Vec<f64> {
    fn from(strategy: StrategyVector) -> Self {
        strategy.0
    }
}
