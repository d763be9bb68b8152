//! PayoffMatrix: a validated, rectangular grid of finite payoffs.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Fewest pure strategies a player may have.
pub const MIN_STRATEGIES: usize = 2;

/// Most pure strategies a player may have.
pub const MAX_STRATEGIES: usize = 5;

/// Input rejected before any solve is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("row count {0} outside [2, 5]")]
    RowCount(usize),
    #[error("column count {0} outside [2, 5]")]
    ColumnCount(usize),
    #[error("expected {expected} rows, found {found}")]
    RowMismatch { expected: usize, found: usize },
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow { row: usize, expected: usize, found: usize },
    #[error("cell R{row}-C{col}: '{value}' is not a number")]
    NonNumeric { row: usize, col: usize, value: String },
    #[error("cell R{row}-C{col}: payoff must be finite")]
    NonFinite { row: usize, col: usize },
    #[error("cell R{row}-C{col} is outside a {rows}x{cols} matrix")]
    CellOutOfRange { row: usize, col: usize, rows: usize, cols: usize },
    #[error("unknown scenario '{key}' (valid: {valid})")]
    UnknownScenario { key: String, valid: String },
    #[error("player B matrix is {b_rows}x{b_cols}, player A matrix is {a_rows}x{a_cols}")]
    ShapeMismatch {
        a_rows: usize,
        a_cols: usize,
        b_rows: usize,
        b_cols: usize,
    },
    #[error("symmetric convention needs a square matrix, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}

/// Check a (rows, cols) pair against the supported strategy-count range.
pub fn validate_dimensions(rows: usize, cols: usize) -> Result<(), ValidationError> {
    if !(MIN_STRATEGIES..=MAX_STRATEGIES).contains(&rows) {
        return Err(ValidationError::RowCount(rows));
    }
    if !(MIN_STRATEGIES..=MAX_STRATEGIES).contains(&cols) {
        return Err(ValidationError::ColumnCount(cols));
    }
    Ok(())
}

/// Payoffs for one player: rows are Player A strategies, columns Player B strategies.
///
/// Stored row-major. Every instance has 2..=5 rows, 2..=5 columns and only
/// finite cells; there is no way to build one that breaks this.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PayoffMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
}

impl PayoffMatrix {
    /// Build from nested rows, validating shape and finiteness.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, ValidationError> {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        validate_dimensions(n_rows, n_cols)?;

        let mut cells = Vec::with_capacity(n_rows * n_cols);
        for (i, row) in rows.iter().enumerate() {
            if row.len() != n_cols {
                return Err(ValidationError::RaggedRow {
                    row: i + 1,
                    expected: n_cols,
                    found: row.len(),
                });
            }
            for (j, &value) in row.iter().enumerate() {
                if !value.is_finite() {
                    return Err(ValidationError::NonFinite { row: i + 1, col: j + 1 });
                }
                cells.push(value);
            }
        }

        Ok(Self {
            rows: n_rows,
            cols: n_cols,
            cells,
        })
    }

    /// All-zero matrix of the given shape.
    pub fn zeros(rows: usize, cols: usize) -> Result<Self, ValidationError> {
        validate_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Payoff at (row, col), zero-based.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.cells[row * self.cols + col]
    }

    pub fn row(&self, row: usize) -> &[f64] {
        &self.cells[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        self.cells.chunks(self.cols)
    }

    pub fn min(&self) -> f64 {
        self.cells.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.cells.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }

    /// Each payoff mapped to `(v - min) / (max - min)`, so the result spans
    /// [0, 1]. A constant matrix maps to all zeros. `None` if the range
    /// overflows.
    pub fn unit_range(&self) -> Option<Self> {
        let min = self.min();
        let spread = self.max() - min;
        let spread = if spread > 0.0 { spread } else { 1.0 };
        let cells: Vec<f64> = self.cells.iter().map(|v| (v - min) / spread).collect();
        cells.iter().all(|v| v.is_finite()).then_some(Self {
            rows: self.rows,
            cols: self.cols,
            cells,
        })
    }

    /// Largest absolute payoff; used to scale numerical tolerances.
    pub fn max_abs(&self) -> f64 {
        self.cells.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    pub fn negated(&self) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            cells: self.cells.iter().map(|v| -v).collect(),
        }
    }

    pub fn transposed(&self) -> Self {
        let mut cells = Vec::with_capacity(self.cells.len());
        for j in 0..self.cols {
            for i in 0..self.rows {
                cells.push(self.get(i, j));
            }
        }
        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.iter_rows().map(<[f64]>::to_vec).collect()
    }

    /// Raw row-major cells.
    pub fn as_slice(&self) -> &[f64] {
        &self.cells
    }
}

impl TryFrom<Vec<Vec<f64>>> for PayoffMatrix {
    type Error = ValidationError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<PayoffMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PayoffMatrix) -> Self {
        matrix.to_rows()
    }
}

impl fmt::Display for PayoffMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:>6}", "")?;
        for j in 0..self.cols {
            write!(f, " {:>8}", format!("C{}", j + 1))?;
        }
        writeln!(f)?;
        for (i, row) in self.iter_rows().enumerate() {
            write!(f, "{:>6}", format!("R{}", i + 1))?;
            for value in row {
                write!(f, " {:>8}", format!("{value:.2}"))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_valid_matrix() {
        let m = PayoffMatrix::new(vec![vec![3.0, 0.0], vec![0.0, 3.0]]).unwrap();
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.get(0, 0), 3.0);
        assert_eq!(m.row(1), &[0.0, 3.0]);
    }

    #[test]
    fn rejects_too_few_rows() {
        let err = PayoffMatrix::new(vec![vec![1.0, 2.0]]).unwrap_err();
        assert_eq!(err, ValidationError::RowCount(1));
    }

    #[test]
    fn rejects_too_many_columns() {
        let err = PayoffMatrix::new(vec![vec![0.0; 6], vec![0.0; 6]]).unwrap_err();
        assert_eq!(err, ValidationError::ColumnCount(6));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = PayoffMatrix::new(vec![vec![1.0, 2.0], vec![1.0]]).unwrap_err();
        assert!(matches!(err, ValidationError::RaggedRow { row: 2, .. }));
    }

    #[test]
    fn rejects_nan_cell() {
        let err = PayoffMatrix::new(vec![vec![1.0, f64::NAN], vec![0.0, 0.0]]).unwrap_err();
        assert_eq!(err, ValidationError::NonFinite { row: 1, col: 2 });
    }

    #[test]
    fn transpose_swaps_shape() {
        let m = PayoffMatrix::new(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let t = m.transposed();
        assert_eq!(t.shape(), (3, 2));
        assert_eq!(t.get(2, 1), 6.0);
        assert_eq!(t.transposed(), m);
    }

    #[test]
    fn serde_round_trips_through_nested_rows() {
        let m = PayoffMatrix::new(vec![vec![1.0, -1.0], vec![-1.0, 1.0]]).unwrap();
        let json = serde_json::to_string(&m).unwrap();
        assert_eq!(json, "[[1.0,-1.0],[-1.0,1.0]]");
        let back: PayoffMatrix = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }

    #[test]
    fn deserialize_rejects_invalid_shape() {
        let result: Result<PayoffMatrix, _> = serde_json::from_str("[[1.0]]");
        assert!(result.is_err());
    }

    #[test]
    fn unit_range_spans_zero_to_one() {
        let m = PayoffMatrix::new(vec![vec![3e-10, 0.0], vec![-1e-10, 1e-10]]).unwrap();
        let u = m.unit_range().unwrap();
        assert_eq!(u.min(), 0.0);
        assert_eq!(u.max(), 1.0);
        assert!((u.get(1, 1) - 0.5).abs() < 1e-12);

        let flat = PayoffMatrix::new(vec![vec![7.0, 7.0], vec![7.0, 7.0]]).unwrap();
        assert_eq!(flat.unit_range().unwrap().max_abs(), 0.0);
    }

    #[test]
    fn unit_range_overflow_is_none() {
        let m = PayoffMatrix::new(vec![vec![f64::MAX, 0.0], vec![0.0, -f64::MAX]]).unwrap();
        assert!(m.unit_range().is_none());
    }
}
