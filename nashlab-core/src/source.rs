//! Matrix source: turns a built-in selection or user-entered cells into a
//! validated payoff matrix plus the scenario name it is reported under.
//!
//! Dimensions are checked before any cell is looked at, so a 1x3 or 6x2
//! request fails without touching the grid.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::catalog;
use crate::domain::{
    validate_dimensions, Game, PayoffConvention, PayoffMatrix, ValidationError,
};

/// Scenario name used for every user-entered matrix.
pub const CUSTOM_SCENARIO_NAME: &str = "Custom Matrix";

/// Step of the cell input grid and of randomly generated payoffs.
pub const CELL_STEP: f64 = 0.5;

/// What the caller asked to solve.
#[derive(Debug, Clone, PartialEq)]
pub enum MatrixRequest {
    BuiltIn { key: String },
    Custom(CustomMatrix),
}

impl MatrixRequest {
    pub fn built_in(key: impl Into<String>) -> Self {
        Self::BuiltIn { key: key.into() }
    }
}

/// A user-entered matrix under construction.
///
/// Cells start at 0.0 and are addressed 0-based; errors name them 1-based
/// (`R1-C1` is the top-left cell).
#[derive(Debug, Clone, PartialEq)]
pub struct CustomMatrix {
    rows: usize,
    cols: usize,
    cells: Vec<f64>,
    payoffs_b: Option<Vec<f64>>,
}

impl CustomMatrix {
    pub fn new(rows: usize, cols: usize) -> Result<Self, ValidationError> {
        validate_dimensions(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            cells: vec![0.0; rows * cols],
            payoffs_b: None,
        })
    }

    /// Parse a full grid of Player A payoffs that must be `rows` x `cols`.
    pub fn from_grid(rows: usize, cols: usize, grid: &str) -> Result<Self, ValidationError> {
        let mut matrix = Self::new(rows, cols)?;
        matrix.cells = parse_grid_with_shape(grid, rows, cols)?;
        Ok(matrix)
    }

    /// Attach an explicit Player B grid of the same shape.
    pub fn with_payoffs_b(mut self, grid: &str) -> Result<Self, ValidationError> {
        self.payoffs_b = Some(parse_grid_with_shape(grid, self.rows, self.cols)?);
        Ok(self)
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        (row < self.rows && col < self.cols).then(|| self.cells[row * self.cols + col])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<(), ValidationError> {
        if row >= self.rows || col >= self.cols {
            return Err(ValidationError::CellOutOfRange {
                row: row + 1,
                col: col + 1,
                rows: self.rows,
                cols: self.cols,
            });
        }
        if !value.is_finite() {
            return Err(ValidationError::NonFinite {
                row: row + 1,
                col: col + 1,
            });
        }
        self.cells[row * self.cols + col] = value;
        Ok(())
    }

    /// Parse `text` and store it at (row, col).
    pub fn set_text(&mut self, row: usize, col: usize, text: &str) -> Result<(), ValidationError> {
        let value = parse_cell(text, row + 1, col + 1)?;
        self.set(row, col, value)
    }

    fn assemble(&self, cells: &[f64]) -> Result<PayoffMatrix, ValidationError> {
        PayoffMatrix::new(cells.chunks(self.cols).map(|r| r.to_vec()).collect())
    }
}

/// A validated matrix and the name it is reported under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcedMatrix {
    pub scenario_name: String,
    pub description: Option<String>,
    pub payoffs_a: PayoffMatrix,
    /// Explicit Player B payoffs; overrides any convention.
    pub payoffs_b: Option<PayoffMatrix>,
}

impl SourcedMatrix {
    /// Pair with Player B's payoffs: the explicit matrix if present, else `convention`.
    pub fn to_game(&self, convention: PayoffConvention) -> Result<Game, ValidationError> {
        match &self.payoffs_b {
            Some(b) => Game::new(self.payoffs_a.clone(), b.clone()),
            None => Game::from_convention(self.payoffs_a.clone(), convention),
        }
    }
}

/// Resolve a request into a validated matrix. No side effects.
pub fn get_matrix(request: &MatrixRequest) -> Result<SourcedMatrix, ValidationError> {
    match request {
        MatrixRequest::BuiltIn { key } => {
            let scenario = catalog::lookup(key)?;
            Ok(SourcedMatrix {
                scenario_name: scenario.name.to_string(),
                description: Some(scenario.description.to_string()),
                payoffs_a: scenario.matrix_a()?,
                payoffs_b: scenario.matrix_b()?,
            })
        }
        MatrixRequest::Custom(custom) => {
            let (rows, cols) = custom.shape();
            validate_dimensions(rows, cols)?;
            Ok(SourcedMatrix {
                scenario_name: CUSTOM_SCENARIO_NAME.to_string(),
                description: None,
                payoffs_a: custom.assemble(&custom.cells)?,
                payoffs_b: custom
                    .payoffs_b
                    .as_deref()
                    .map(|cells| custom.assemble(cells))
                    .transpose()?,
            })
        }
    }
}

/// A custom matrix with payoffs drawn from the input grid in [-10, 10].
pub fn random_matrix(rows: usize, cols: usize, seed: u64) -> Result<CustomMatrix, ValidationError> {
    let mut matrix = CustomMatrix::new(rows, cols)?;
    let mut rng = StdRng::seed_from_u64(seed);
    for cell in matrix.cells.iter_mut() {
        *cell = f64::from(rng.gen_range(-20i32..=20)) * CELL_STEP;
    }
    Ok(matrix)
}

// ─── Text parsing ────────────────────────────────────────────────────

/// Parse one cell. `row` and `col` are 1-based and only used for the error.
pub fn parse_cell(text: &str, row: usize, col: usize) -> Result<f64, ValidationError> {
    let trimmed = text.trim();
    let value: f64 = trimmed.parse().map_err(|_| ValidationError::NonNumeric {
        row,
        col,
        value: trimmed.to_string(),
    })?;
    if !value.is_finite() {
        return Err(ValidationError::NonFinite { row, col });
    }
    Ok(value)
}

/// Parse a grid: rows separated by `;` (or newlines), cells by `,` or whitespace.
///
/// Empty rows are ignored so a trailing `;` is harmless. Rows may differ in
/// length here; shape is checked by the caller.
pub fn parse_grid(text: &str) -> Result<Vec<Vec<f64>>, ValidationError> {
    text.split(|c: char| c == ';' || c == '\n')
        .map(str::trim)
        .filter(|row| !row.is_empty())
        .enumerate()
        .map(|(r, row)| {
            row.split(|c: char| c == ',' || c.is_whitespace())
                .filter(|cell| !cell.is_empty())
                .enumerate()
                .map(|(c, cell)| parse_cell(cell, r + 1, c + 1))
                .collect::<Result<Vec<f64>, _>>()
        })
        .collect()
}

/// Parse a grid that must be exactly `rows` x `cols`, flattened row-major.
fn parse_grid_with_shape(text: &str, rows: usize, cols: usize) -> Result<Vec<f64>, ValidationError> {
    let grid = parse_grid(text)?;
    if grid.len() != rows {
        return Err(ValidationError::RowMismatch {
            expected: rows,
            found: grid.len(),
        });
    }
    for (i, row) in grid.iter().enumerate() {
        if row.len() != cols {
            return Err(ValidationError::RaggedRow {
                row: i + 1,
                expected: cols,
                found: row.len(),
            });
        }
    }
    Ok(grid.into_iter().flatten().collect())
}
