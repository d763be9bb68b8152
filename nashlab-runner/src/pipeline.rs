//! Solve pipeline: wires matrix source, solver and formatter together.
//!
//! Two entry points:
//! - `run()`: builds the solver named by the request or config.
//! - `run_with_solver()`: takes any [`EquilibriumSolver`]; used by tests to
//!   substitute a stub.
//!
//! Nothing here reads global state: every input arrives in the request or
//! the config, and every output leaves in the [`SolveResponse`].

use log::{debug, info};
use thiserror::Error;

use nashlab_core::domain::{
    EnumerationMethod, EquilibriumSet, Game, GameFingerprint, PayoffConvention, ValidationError,
};
use nashlab_core::solver::{build_solver, EquilibriumSolver, SolveOutcome, SolverError, SolverMethod};
use nashlab_core::source::{get_matrix, MatrixRequest};

use crate::config::{ConfigError, NashConfig};
use crate::format::{BarChart, FormattedEquilibrium, ResultFormatter};
use crate::reporting::Report;

/// Shown when enumeration completes without an equilibrium.
pub const NO_EQUILIBRIUM_ADVICE: &str =
    "No equilibrium found. Try adjusting your matrix or switch to a built-in scenario.";

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid input: {0}")]
    Validation(#[from] ValidationError),
    #[error("solver failed: {0}")]
    Solver(#[from] SolverError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// One solve request. `None` fields fall back to the config.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveRequest {
    pub matrix: MatrixRequest,
    pub convention: Option<PayoffConvention>,
    pub method: Option<SolverMethod>,
}

impl SolveRequest {
    pub fn new(matrix: MatrixRequest) -> Self {
        Self {
            matrix,
            convention: None,
            method: None,
        }
    }

    pub fn with_convention(mut self, convention: PayoffConvention) -> Self {
        self.convention = Some(convention);
        self
    }

    pub fn with_method(mut self, method: SolverMethod) -> Self {
        self.method = Some(method);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Solved {
        set: EquilibriumSet,
        equilibria: Vec<FormattedEquilibrium>,
        charts: Vec<BarChart>,
    },
    NoEquilibriumFound {
        advisory: String,
    },
}

/// Everything needed to display a solve and build its report.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveResponse {
    pub scenario_name: String,
    pub description: Option<String>,
    pub convention: PayoffConvention,
    /// Whether Player B's matrix came from the scenario rather than the convention.
    pub explicit_payoffs_b: bool,
    pub game: Game,
    pub fingerprint: GameFingerprint,
    pub outcome: PipelineOutcome,
}

impl SolveResponse {
    /// Formatted equilibria; empty when nothing was found.
    pub fn equilibria(&self) -> &[FormattedEquilibrium] {
        match &self.outcome {
            PipelineOutcome::Solved { equilibria, .. } => equilibria,
            PipelineOutcome::NoEquilibriumFound { .. } => &[],
        }
    }

    pub fn method(&self) -> Option<EnumerationMethod> {
        match &self.outcome {
            PipelineOutcome::Solved { set, .. } => Some(set.method()),
            PipelineOutcome::NoEquilibriumFound { .. } => None,
        }
    }

    /// Report for export; `None` when there is nothing to report.
    pub fn report(&self) -> Option<Report> {
        let method = self.method()?;
        Some(Report::new(
            self.scenario_name.clone(),
            self.fingerprint.clone(),
            method,
            self.equilibria().to_vec(),
        ))
    }
}

pub fn run(request: &SolveRequest, config: &NashConfig) -> Result<SolveResponse, PipelineError> {
    let method = request.method.unwrap_or(config.solver.method);
    let solver = build_solver(method, config.solver_settings()?);
    run_with_solver(request, config, solver.as_ref())
}

pub fn run_with_solver(
    request: &SolveRequest,
    config: &NashConfig,
    solver: &dyn EquilibriumSolver,
) -> Result<SolveResponse, PipelineError> {
    let sourced = get_matrix(&request.matrix)?;
    let convention = request.convention.unwrap_or(config.solver.convention);
    let game = sourced.to_game(convention)?;
    let (rows, cols) = game.shape();
    debug!(
        "solving '{}' ({rows}x{cols}) with {} solver",
        sourced.scenario_name,
        solver.name()
    );

    let formatter = config.formatter();
    let outcome = match solver.solve(&game)? {
        SolveOutcome::Equilibria(set) => solved(set, &formatter),
        SolveOutcome::NoEquilibriumFound => PipelineOutcome::NoEquilibriumFound {
            advisory: NO_EQUILIBRIUM_ADVICE.to_string(),
        },
    };

    let found = match &outcome {
        PipelineOutcome::Solved { equilibria, .. } => equilibria.len(),
        PipelineOutcome::NoEquilibriumFound { .. } => 0,
    };
    info!("{:<32}{:<32}", sourced.scenario_name, format!("{found} equilibria"));

    Ok(SolveResponse {
        explicit_payoffs_b: sourced.payoffs_b.is_some(),
        fingerprint: game.fingerprint(),
        scenario_name: sourced.scenario_name,
        description: sourced.description,
        convention,
        game,
        outcome,
    })
}

fn solved(set: EquilibriumSet, formatter: &ResultFormatter) -> PipelineOutcome {
    let equilibria = formatter.format(&set);
    let charts = equilibria.iter().map(|eq| formatter.chart(eq)).collect();
    PipelineOutcome::Solved {
        set,
        equilibria,
        charts,
    }
}
