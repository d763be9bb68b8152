//! Support enumeration.
//!
//! For every pair of equal-size supports (I, J), solve the indifference
//! conditions: Player A's mix over I must leave Player B indifferent across J,
//! and Player B's mix over J must leave Player A indifferent across I. A pair
//! is kept when both mixes are strictly positive on their supports and no pure
//! strategy outside the support does better.

use log::debug;

use super::linalg::{combinations, solve};
use super::{EquilibriumSolver, SolveOutcome, SolverError, SolverSettings};
use crate::domain::{EnumerationMethod, Equilibrium, EquilibriumSet, Game, StrategyVector};

#[derive(Debug, Clone, Copy, Default)]
pub struct SupportEnumeration {
    settings: SolverSettings,
}

impl SupportEnumeration {
    pub fn new(settings: SolverSettings) -> Self {
        Self { settings }
    }

    /// Run the enumeration and return every equilibrium found, possibly none.
    pub fn enumerate(&self, game: &Game) -> Result<EquilibriumSet, SolverError> {
        let method = EnumerationMethod::SupportEnumeration;
        let (rows, cols) = game.shape();
        let tol = self.settings.tolerance;
        // Indifference and best-response checks run on payoffs rescaled to
        // [0, 1]; reported payoffs come from `game`.
        let unit = game
            .unit_range()
            .ok_or(SolverError::PayoffOverflow { method })?;
        let payoff_tol = tol * unit.payoff_scale();
        let mut found = EquilibriumSet::new(method);
        let mut candidates = 0usize;

        for size in 1..=rows.min(cols) {
            let row_supports = combinations(rows, size);
            let col_supports = combinations(cols, size);
            for row_support in &row_supports {
                for col_support in &col_supports {
                    candidates += 1;
                    // x over I keeps B indifferent on J; y over J keeps A indifferent on I.
                    let Some(x) = indifferent_mix(&unit, row_support, col_support, Side::Row, rows)
                    else {
                        continue;
                    };
                    let Some(y) = indifferent_mix(&unit, row_support, col_support, Side::Column, cols)
                    else {
                        continue;
                    };
                    if !obeys_support(&x, row_support, tol) || !obeys_support(&y, col_support, tol) {
                        continue;
                    }
                    if !is_best_response(&unit.row_payoffs(&y), row_support, payoff_tol)
                        || !is_best_response(&unit.column_payoffs(&x), col_support, payoff_tol)
                    {
                        continue;
                    }

                    let (Some(player_a), Some(player_b)) = (
                        StrategyVector::from_weights(&x, tol),
                        StrategyVector::from_weights(&y, tol),
                    ) else {
                        return Err(SolverError::NonFinite {
                            method,
                            context: "support probabilities",
                        });
                    };
                    let equilibrium = Equilibrium::new(game, player_a, player_b);
                    if !equilibrium.payoff_a.is_finite() || !equilibrium.payoff_b.is_finite() {
                        return Err(SolverError::NonFinite {
                            method,
                            context: "expected payoffs",
                        });
                    }
                    debug!(
                        "support pair {:?} x {:?} is an equilibrium",
                        row_support, col_support
                    );
                    found.insert(equilibrium);
                }
            }
        }

        debug!(
            "support enumeration checked {} support pairs, found {}",
            candidates,
            found.len()
        );
        Ok(found)
    }
}

impl EquilibriumSolver for SupportEnumeration {
    fn name(&self) -> &'static str {
        "support"
    }

    fn solve(&self, game: &Game) -> Result<SolveOutcome, SolverError> {
        Ok(SolveOutcome::from_set(self.enumerate(game)?))
    }
}

#[derive(Debug, Clone, Copy)]
enum Side {
    /// Solve for Player A's mix (over rows) using Player B's payoffs.
    Row,
    /// Solve for Player B's mix (over columns) using Player A's payoffs.
    Column,
}

/// Solve the (k+1)x(k+1) indifference system and expand to a full-length vector.
///
/// Unknowns are the k support probabilities plus the common payoff v:
/// one equation `payoff(p) - v = 0` per opponent support strategy, and
/// `sum(p) = 1`.
fn indifferent_mix(
    game: &Game,
    row_support: &[usize],
    col_support: &[usize],
    side: Side,
    len: usize,
) -> Option<Vec<f64>> {
    let k = row_support.len();
    let (own, opponent) = match side {
        Side::Row => (row_support, col_support),
        Side::Column => (col_support, row_support),
    };
    let payoff = |own_idx: usize, opp_idx: usize| match side {
        Side::Row => game.payoffs_b().get(own_idx, opp_idx),
        Side::Column => game.payoffs_a().get(opp_idx, own_idx),
    };

    let mut m = Vec::with_capacity(k + 1);
    for &o in opponent {
        let mut row: Vec<f64> = own.iter().map(|&s| payoff(s, o)).collect();
        row.push(-1.0);
        m.push(row);
    }
    let mut total = vec![1.0; k];
    total.push(0.0);
    m.push(total);

    let mut b = vec![0.0; k + 1];
    b[k] = 1.0;

    let solution = solve(m, b)?;
    let mut full = vec![0.0; len];
    for (&s, &p) in own.iter().zip(&solution[..k]) {
        full[s] = p;
    }
    Some(full)
}

fn obeys_support(mix: &[f64], support: &[usize], tol: f64) -> bool {
    mix.iter()
        .enumerate()
        .all(|(i, &p)| if support.contains(&i) { p > tol } else { p == 0.0 })
}

/// Every support strategy earns the maximum payoff (within `tol`).
fn is_best_response(payoffs: &[f64], support: &[usize], tol: f64) -> bool {
    let best = payoffs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    support.iter().all(|&i| payoffs[i] >= best - tol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PayoffConvention, PayoffMatrix};

    fn game(rows: Vec<Vec<f64>>, convention: PayoffConvention) -> Game {
        Game::from_convention(PayoffMatrix::new(rows).unwrap(), convention).unwrap()
    }

    #[test]
    fn matching_pennies_zero_sum_has_single_mixed_equilibrium() {
        let g = game(vec![vec![1.0, -1.0], vec![-1.0, 1.0]], PayoffConvention::ZeroSum);
        let set = SupportEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 1);
        let eq = &set.as_slice()[0];
        assert!(eq.player_a.approx_eq(&StrategyVector::uniform(2), 1e-9));
        assert!(eq.player_b.approx_eq(&StrategyVector::uniform(2), 1e-9));
    }

    #[test]
    fn coordination_has_two_pure_and_one_mixed() {
        let g = game(vec![vec![3.0, 0.0], vec![0.0, 3.0]], PayoffConvention::Identical);
        let set = SupportEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 3);
        // Pure supports are enumerated first.
        assert_eq!(set.as_slice()[0].player_a.pure_index(1e-9), Some(0));
        assert_eq!(set.as_slice()[1].player_a.pure_index(1e-9), Some(1));
    }

    #[test]
    fn prisoners_dilemma_defects() {
        let a = PayoffMatrix::new(vec![vec![-1.0, -3.0], vec![0.0, -2.0]]).unwrap();
        let g = Game::new(a.clone(), a.transposed()).unwrap();
        let set = SupportEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0].player_a.pure_index(1e-9), Some(1));
        assert_eq!(set.as_slice()[0].player_b.pure_index(1e-9), Some(1));
    }

    #[test]
    fn rock_paper_scissors_is_uniform() {
        let g = game(
            vec![
                vec![0.0, -1.0, 1.0],
                vec![1.0, 0.0, -1.0],
                vec![-1.0, 1.0, 0.0],
            ],
            PayoffConvention::ZeroSum,
        );
        let set = SupportEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.as_slice()[0]
            .player_a
            .approx_eq(&StrategyVector::uniform(3), 1e-9));
    }

    #[test]
    fn dominated_row_never_in_support() {
        let a = PayoffMatrix::new(vec![vec![3.0, 3.0], vec![1.0, 1.0]]).unwrap();
        let b = PayoffMatrix::new(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let g = Game::new(a, b).unwrap();
        let set = SupportEnumeration::default().enumerate(&g).unwrap();
        assert!(!set.is_empty());
        for eq in &set {
            assert_eq!(eq.player_a.probabilities()[1], 0.0);
        }
    }

    #[test]
    fn tiny_payoffs_reject_mismatched_profiles() {
        let g = game(vec![vec![3e-10, 0.0], vec![0.0, 3e-10]], PayoffConvention::Identical);
        let set = SupportEnumeration::default().enumerate(&g).unwrap();
        assert_eq!(set.len(), 3);
        assert!(!set.contains(&StrategyVector::pure(2, 0), &StrategyVector::pure(2, 1)));
        assert!(!set.contains(&StrategyVector::pure(2, 1), &StrategyVector::pure(2, 0)));
        assert!(set.contains(&StrategyVector::uniform(2), &StrategyVector::uniform(2)));
        // Payoffs are reported on the original scale.
        assert_eq!(set.as_slice()[0].payoff_a, 3e-10);
    }
}
