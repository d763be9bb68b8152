//! Equilibrium solvers.
//!
//! - [`SupportEnumeration`]: exact for non-degenerate games, fast for small supports.
//! - [`VertexEnumeration`]: labelled vertices of the best-response polytopes;
//!   always finds an extreme equilibrium.
//! - [`FallbackSolver`]: support enumeration first, vertex enumeration when that
//!   comes back empty. This is the default.
//!
//! Every solver returns `Ok(SolveOutcome::NoEquilibriumFound)` rather than an
//! error when enumeration completes without a result; `SolverError` is reserved
//! for numerical failure.

pub mod linalg;
pub mod support;
pub mod vertex;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::domain::{EnumerationMethod, EquilibriumSet, Game};

pub use support::SupportEnumeration;
pub use vertex::VertexEnumeration;

/// Default numerical tolerance for probabilities and labels.
pub const DEFAULT_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    #[error("{method}: payoff range overflows when rescaled")]
    PayoffOverflow { method: EnumerationMethod },
    #[error("{method}: non-finite value in {context}")]
    NonFinite {
        method: EnumerationMethod,
        context: &'static str,
    },
    #[error("invalid solver tolerance {0}")]
    InvalidTolerance(f64),
}

/// Terminal result of a solve that did not fail.
#[derive(Debug, Clone, PartialEq)]
pub enum SolveOutcome {
    Equilibria(EquilibriumSet),
    NoEquilibriumFound,
}

impl SolveOutcome {
    pub fn from_set(set: EquilibriumSet) -> Self {
        if set.is_empty() {
            Self::NoEquilibriumFound
        } else {
            Self::Equilibria(set)
        }
    }

    pub fn equilibria(&self) -> Option<&EquilibriumSet> {
        match self {
            Self::Equilibria(set) => Some(set),
            Self::NoEquilibriumFound => None,
        }
    }
}

/// Anything that can enumerate Nash equilibria of a bimatrix game.
pub trait EquilibriumSolver {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    fn solve(&self, game: &Game) -> Result<SolveOutcome, SolverError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolverSettings {
    pub tolerance: f64,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

impl SolverSettings {
    pub fn new(tolerance: f64) -> Result<Self, SolverError> {
        if !tolerance.is_finite() || tolerance <= 0.0 || tolerance >= 1e-3 {
            return Err(SolverError::InvalidTolerance(tolerance));
        }
        Ok(Self { tolerance })
    }
}

/// Which enumeration strategy to run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Support enumeration, then vertex enumeration if nothing was found.
    #[default]
    Auto,
    Support,
    Vertex,
}

impl SolverMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Support => "support",
            Self::Vertex => "vertex",
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SolverMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "support" => Ok(Self::Support),
            "vertex" => Ok(Self::Vertex),
            other => Err(format!(
                "unknown solver method '{other}'. Valid: auto, support, vertex"
            )),
        }
    }
}

/// Build the solver for a method.
pub fn build_solver(method: SolverMethod, settings: SolverSettings) -> Box<dyn EquilibriumSolver> {
    match method {
        SolverMethod::Auto => Box::new(FallbackSolver::new(settings)),
        SolverMethod::Support => Box::new(SupportEnumeration::new(settings)),
        SolverMethod::Vertex => Box::new(VertexEnumeration::new(settings)),
    }
}

/// Support enumeration with a vertex-enumeration fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackSolver {
    support: SupportEnumeration,
    vertex: VertexEnumeration,
}

impl FallbackSolver {
    pub fn new(settings: SolverSettings) -> Self {
        Self {
            support: SupportEnumeration::new(settings),
            vertex: VertexEnumeration::new(settings),
        }
    }
}

impl EquilibriumSolver for FallbackSolver {
    fn name(&self) -> &'static str {
        "auto"
    }

    fn solve(&self, game: &Game) -> Result<SolveOutcome, SolverError> {
        let (rows, cols) = game.shape();
        let set = self.support.enumerate(game)?;
        if !set.is_empty() {
            info!(
                "{rows}x{cols} game: {} equilibria via {}",
                set.len(),
                set.method()
            );
            return Ok(SolveOutcome::Equilibria(set));
        }

        warn!("{rows}x{cols} game: support enumeration found nothing, trying vertex enumeration");
        let set = self.vertex.enumerate(game)?;
        if set.is_empty() {
            warn!("{rows}x{cols} game: no equilibrium found by either method");
        } else {
            info!(
                "{rows}x{cols} game: {} equilibria via {}",
                set.len(),
                set.method()
            );
        }
        Ok(SolveOutcome::from_set(set))
    }
}
