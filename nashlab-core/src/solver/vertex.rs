//! Vertex enumeration.
//!
//! With both payoff matrices shifted to be strictly positive, the
//! best-response polytopes are
//!
//! - P = { x ∈ Rᵐ : x ≥ 0, Bᵀx ≤ 1 } with labels 0..m for `x_i = 0` and
//!   m+j for `(Bᵀx)_j = 1`;
//! - Q = { y ∈ Rⁿ : Ay ≤ 1, y ≥ 0 } with labels 0..m for `(Ay)_i = 1` and
//!   m+j for `y_j = 0`.
//!
//! A non-origin vertex pair whose labels cover 0..m+n is a Nash equilibrium
//! once both vectors are normalised.

use log::debug;

use super::linalg::{combinations, solve};
use super::{EquilibriumSolver, SolveOutcome, SolverError, SolverSettings};
use crate::domain::{
    EnumerationMethod, Equilibrium, EquilibriumSet, Game, PayoffMatrix, StrategyVector,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct VertexEnumeration {
    settings: SolverSettings,
}

/// Half-space `normal · z ≤ bound`, tagged with its label.
#[derive(Debug, Clone)]
struct Halfspace {
    normal: Vec<f64>,
    bound: f64,
    label: usize,
}

/// A polytope vertex and the bitmask of constraints binding at it.
#[derive(Debug, Clone)]
struct Vertex {
    point: Vec<f64>,
    labels: u32,
}

impl VertexEnumeration {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    pub fn enumerate(&self, game: &Game) -> Result<EquilibriumSet, SolverError> {
        let method = EnumerationMethod::VertexEnumeration;
        let (rows, cols) = game.shape();
        let tol = self.settings.tolerance;

        let unit_game = game
            .unit_range()
            .ok_or(SolverError::PayoffOverflow { method })?;
        let a = shift_positive(unit_game.payoffs_a()).ok_or(SolverError::PayoffOverflow { method })?;
        let b = shift_positive(unit_game.payoffs_b()).ok_or(SolverError::PayoffOverflow { method })?;
        // Shifted payoffs lie in [1, 2].
        let label_tol = tol * a.max_abs().max(b.max_abs());

        // P: x_i >= 0 (label i), (Bᵀx)_j <= 1 (label m + j).
        let mut p_constraints: Vec<Halfspace> = (0..rows)
            .map(|i| Halfspace {
                normal: unit(rows, i, -1.0),
                bound: 0.0,
                label: i,
            })
            .collect();
        p_constraints.extend((0..cols).map(|j| Halfspace {
            normal: (0..rows).map(|i| b.get(i, j)).collect(),
            bound: 1.0,
            label: rows + j,
        }));

        // Q: (Ay)_i <= 1 (label i), y_j >= 0 (label m + j).
        let mut q_constraints: Vec<Halfspace> = (0..rows)
            .map(|i| Halfspace {
                normal: a.row(i).to_vec(),
                bound: 1.0,
                label: i,
            })
            .collect();
        q_constraints.extend((0..cols).map(|j| Halfspace {
            normal: unit(cols, j, -1.0),
            bound: 0.0,
            label: rows + j,
        }));

        let p_vertices = vertices(&p_constraints, rows, label_tol);
        let q_vertices = vertices(&q_constraints, cols, label_tol);
        debug!(
            "vertex enumeration: {} vertices in P, {} in Q",
            p_vertices.len(),
            q_vertices.len()
        );

        let all_labels: u32 = (1u32 << (rows + cols)) - 1;
        let mut found = EquilibriumSet::new(method);
        for xv in p_vertices.iter().filter(|v| !is_origin(&v.point, tol)) {
            for yv in q_vertices.iter().filter(|v| !is_origin(&v.point, tol)) {
                if xv.labels | yv.labels != all_labels {
                    continue;
                }
                let (Some(player_a), Some(player_b)) = (
                    StrategyVector::from_weights(&xv.point, label_tol),
                    StrategyVector::from_weights(&yv.point, label_tol),
                ) else {
                    return Err(SolverError::NonFinite {
                        method,
                        context: "vertex coordinates",
                    });
                };
                let equilibrium = Equilibrium::new(game, player_a, player_b);
                if !equilibrium.payoff_a.is_finite() || !equilibrium.payoff_b.is_finite() {
                    return Err(SolverError::NonFinite {
                        method,
                        context: "expected payoffs",
                    });
                }
                found.insert(equilibrium);
            }
        }

        debug!("vertex enumeration found {} equilibria", found.len());
        Ok(found)
    }
}

impl EquilibriumSolver for VertexEnumeration {
    fn name(&self) -> &'static str {
        "vertex"
    }

    fn solve(&self, game: &Game) -> Result<SolveOutcome, SolverError> {
        Ok(SolveOutcome::from_set(self.enumerate(game)?))
    }
}

/// `m - min(m) + 1`, so every payoff is at least 1. `m` must already be
/// rescaled by [`PayoffMatrix::unit_range`]; shifting raw payoffs would bury
/// small differences under the added constant.
fn shift_positive(m: &PayoffMatrix) -> Option<PayoffMatrix> {
    let shift = 1.0 - m.min();
    let rows: Vec<Vec<f64>> = m
        .iter_rows()
        .map(|row| row.iter().map(|v| v + shift).collect())
        .collect();
    PayoffMatrix::new(rows).ok()
}

fn unit(len: usize, index: usize, value: f64) -> Vec<f64> {
    let mut v = vec![0.0; len];
    v[index] = value;
    v
}

fn is_origin(point: &[f64], tol: f64) -> bool {
    point.iter().all(|v| v.abs() <= tol)
}

/// All vertices of `{ z : normal · z <= bound }` in `dim` dimensions.
///
/// Every choice of `dim` constraints with a unique intersection point is a
/// candidate; it is kept when it satisfies the rest. Labels record every
/// constraint binding at the point, not only the chosen ones, so degenerate
/// vertices carry their full label set.
fn vertices(constraints: &[Halfspace], dim: usize, tol: f64) -> Vec<Vertex> {
    let mut out: Vec<Vertex> = Vec::new();
    for chosen in combinations(constraints.len(), dim) {
        let m: Vec<Vec<f64>> = chosen.iter().map(|&c| constraints[c].normal.clone()).collect();
        let rhs: Vec<f64> = chosen.iter().map(|&c| constraints[c].bound).collect();
        let Some(point) = solve(m, rhs) else {
            continue;
        };

        let mut labels = 0u32;
        let mut feasible = true;
        for c in constraints {
            let lhs: f64 = c.normal.iter().zip(&point).map(|(n, z)| n * z).sum();
            let slack = c.bound - lhs;
            if slack < -tol {
                feasible = false;
                break;
            }
            if slack <= tol {
                labels |= 1 << c.label;
            }
        }
        if !feasible {
            continue;
        }

        let duplicate = out.iter().any(|v| {
            v.point
                .iter()
                .zip(&point)
                .all(|(p, q)| (p - q).abs() <= tol)
        });
        if !duplicate {
            out.push(Vertex { point, labels });
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PayoffConvention;

    fn game(rows: Vec<Vec<f64>>, convention: PayoffConvention) -> Game {
        Game::from_convention(PayoffMatrix::new(rows).unwrap(), convention).unwrap()
    }

    #[test]
    fn matching_pennies_zero_sum() {
        let g = game(vec![vec![1.0, -1.0], vec![-1.0, 1.0]], PayoffConvention::ZeroSum);
        let set = VertexEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.as_slice()[0]
            .player_b
            .approx_eq(&StrategyVector::uniform(2), 1e-9));
    }

    #[test]
    fn coordination_finds_all_three() {
        let g = game(vec![vec![3.0, 0.0], vec![0.0, 3.0]], PayoffConvention::Identical);
        let set = VertexEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&StrategyVector::pure(2, 0), &StrategyVector::pure(2, 0)));
        assert!(set.contains(&StrategyVector::pure(2, 1), &StrategyVector::pure(2, 1)));
        assert!(set.contains(&StrategyVector::uniform(2), &StrategyVector::uniform(2)));
    }

    #[test]
    fn all_zero_game_terminates_with_equilibria() {
        let a = PayoffMatrix::zeros(5, 5).unwrap();
        let g = Game::from_convention(a, PayoffConvention::Identical).unwrap();
        let set = VertexEnumeration::default().enumerate(&g).unwrap();
        assert!(!set.is_empty());
        for eq in &set {
            assert!(g.is_equilibrium(&eq.player_a, &eq.player_b, 1e-9));
        }
    }

    #[test]
    fn rectangular_game() {
        // Player B's middle column is strictly dominated.
        let a = PayoffMatrix::new(vec![vec![2.0, 0.0, 1.0], vec![0.0, 2.0, 1.0]]).unwrap();
        let b = PayoffMatrix::new(vec![vec![0.0, -1.0, 1.0], vec![1.0, -1.0, 0.0]]).unwrap();
        let g = Game::new(a, b).unwrap();
        let set = VertexEnumeration::default().enumerate(&g).unwrap();
        assert!(!set.is_empty());
        for eq in &set {
            assert!(eq.player_b.probabilities()[1] < 1e-9);
            assert!(g.is_equilibrium(&eq.player_a, &eq.player_b, 1e-9));
        }
    }

    #[test]
    fn overflowing_payoffs_are_reported() {
        let a = PayoffMatrix::new(vec![vec![f64::MAX, 0.0], vec![0.0, -f64::MAX]]).unwrap();
        let g = Game::from_convention(a, PayoffConvention::Identical).unwrap();
        assert!(matches!(
            VertexEnumeration::default().enumerate(&g),
            Err(SolverError::PayoffOverflow { .. })
        ));
    }

    #[test]
    fn tiny_payoffs_keep_labels_apart() {
        let g = game(
            vec![vec![3e-10, 0.0], vec![0.0, 3e-10]],
            PayoffConvention::Identical,
        );
        let set = VertexEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 3);
        assert!(set.contains(&StrategyVector::pure(2, 0), &StrategyVector::pure(2, 0)));
        assert!(set.contains(&StrategyVector::pure(2, 1), &StrategyVector::pure(2, 1)));
        assert!(set.contains(&StrategyVector::uniform(2), &StrategyVector::uniform(2)));
        for eq in &set {
            for p in eq.player_a.probabilities().iter().chain(eq.player_b.probabilities()) {
                assert!(p.is_sign_positive(), "{:?}", eq);
            }
        }
    }
}
