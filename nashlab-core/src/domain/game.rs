//! Two-player bimatrix games.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::matrix::{PayoffMatrix, ValidationError};
use super::strategy::StrategyVector;

/// How Player B's payoffs are derived when only Player A's matrix is given.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoffConvention {
    /// B receives exactly what A receives (common-interest game).
    #[default]
    Identical,
    /// B receives the negation of A's payoff.
    ZeroSum,
    /// B faces A's matrix from the column side: B = Aᵀ. Square matrices only.
    Symmetric,
}

impl PayoffConvention {
    pub fn all() -> [Self; 3] {
        [Self::Identical, Self::ZeroSum, Self::Symmetric]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Identical => "identical",
            Self::ZeroSum => "zero_sum",
            Self::Symmetric => "symmetric",
        }
    }

    /// Derive Player B's matrix from Player A's.
    pub fn derive(&self, payoffs_a: &PayoffMatrix) -> Result<PayoffMatrix, ValidationError> {
        match self {
            Self::Identical => Ok(payoffs_a.clone()),
            Self::ZeroSum => Ok(payoffs_a.negated()),
            Self::Symmetric => {
                let (rows, cols) = payoffs_a.shape();
                if rows != cols {
                    return Err(ValidationError::NotSquare { rows, cols });
                }
                Ok(payoffs_a.transposed())
            }
        }
    }
}

impl fmt::Display for PayoffConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PayoffConvention {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "identical" => Ok(Self::Identical),
            "zero_sum" | "zerosum" => Ok(Self::ZeroSum),
            "symmetric" => Ok(Self::Symmetric),
            other => Err(format!(
                "unknown payoff convention '{other}'. Valid: identical, zero_sum, symmetric"
            )),
        }
    }
}

/// Content hash of a game (shape + both payoff matrices).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GameFingerprint(pub String);

impl fmt::Display for GameFingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A bimatrix game: Player A picks a row, Player B picks a column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Game {
    payoffs_a: PayoffMatrix,
    payoffs_b: PayoffMatrix,
}

impl Game {
    /// Both matrices must have the same shape.
    pub fn new(payoffs_a: PayoffMatrix, payoffs_b: PayoffMatrix) -> Result<Self, ValidationError> {
        if payoffs_a.shape() != payoffs_b.shape() {
            let (a_rows, a_cols) = payoffs_a.shape();
            let (b_rows, b_cols) = payoffs_b.shape();
            return Err(ValidationError::ShapeMismatch {
                a_rows,
                a_cols,
                b_rows,
                b_cols,
            });
        }
        Ok(Self { payoffs_a, payoffs_b })
    }

    pub fn from_convention(
        payoffs_a: PayoffMatrix,
        convention: PayoffConvention,
    ) -> Result<Self, ValidationError> {
        let payoffs_b = convention.derive(&payoffs_a)?;
        Self::new(payoffs_a, payoffs_b)
    }

    pub fn payoffs_a(&self) -> &PayoffMatrix {
        &self.payoffs_a
    }

    pub fn payoffs_b(&self) -> &PayoffMatrix {
        &self.payoffs_b
    }

    /// (Player A strategy count, Player B strategy count).
    pub fn shape(&self) -> (usize, usize) {
        self.payoffs_a.shape()
    }

    /// Player A's payoff for each pure row against column mix `y`.
    pub fn row_payoffs(&self, y: &[f64]) -> Vec<f64> {
        self.payoffs_a
            .iter_rows()
            .map(|row| row.iter().zip(y).map(|(a, p)| a * p).sum())
            .collect()
    }

    /// Player B's payoff for each pure column against row mix `x`.
    pub fn column_payoffs(&self, x: &[f64]) -> Vec<f64> {
        let (rows, cols) = self.shape();
        (0..cols)
            .map(|j| (0..rows).map(|i| x[i] * self.payoffs_b.get(i, j)).sum())
            .collect()
    }

    /// Expected payoffs (A, B) of the profile (x, y).
    pub fn expected_payoffs(&self, x: &StrategyVector, y: &StrategyVector) -> (f64, f64) {
        let x = x.probabilities();
        let y = y.probabilities();
        let a: f64 = self.row_payoffs(y).iter().zip(x).map(|(v, p)| v * p).sum();
        let b: f64 = self.column_payoffs(x).iter().zip(y).map(|(v, p)| v * p).sum();
        (a, b)
    }

    /// True when neither player gains more than `tolerance` by deviating to a pure strategy.
    pub fn is_equilibrium(&self, x: &StrategyVector, y: &StrategyVector, tolerance: f64) -> bool {
        let (rows, cols) = self.shape();
        if x.len() != rows || y.len() != cols {
            return false;
        }
        let (value_a, value_b) = self.expected_payoffs(x, y);
        let best_a = max_of(&self.row_payoffs(y.probabilities()));
        let best_b = max_of(&self.column_payoffs(x.probabilities()));
        best_a <= value_a + tolerance && best_b <= value_b + tolerance
    }

    /// Largest absolute payoff across both matrices; 1 for an all-zero game.
    pub fn payoff_scale(&self) -> f64 {
        let scale = self.payoffs_a.max_abs().max(self.payoffs_b.max_abs());
        if scale > 0.0 {
            scale
        } else {
            1.0
        }
    }

    /// The same game with each player's payoffs mapped onto [0, 1].
    ///
    /// A positive affine map of one player's payoffs leaves every best
    /// response unchanged, so both games have the same equilibria. `None` if
    /// a payoff range overflows.
    pub fn unit_range(&self) -> Option<Self> {
        Some(Self {
            payoffs_a: self.payoffs_a.unit_range()?,
            payoffs_b: self.payoffs_b.unit_range()?,
        })
    }

    /// BLAKE3 hash of the canonical JSON form of the game.
    pub fn fingerprint(&self) -> GameFingerprint {
        let canonical = serde_json::json!({
            "a": self.payoffs_a.to_rows(),
            "b": self.payoffs_b.to_rows(),
        });
        let hash = blake3::hash(canonical.to_string().as_bytes());
        GameFingerprint(hash.to_hex().to_string())
    }
}

fn max_of(values: &[f64]) -> f64 {
    values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}
