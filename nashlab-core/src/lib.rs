//! NashLab Core — payoff matrices, scenario catalog, matrix source and
//! equilibrium enumeration.
//!
//! - Domain types (payoff matrices, games, strategy vectors, equilibria)
//! - Built-in scenario catalog
//! - Matrix source: built-in lookup or validated custom entry
//! - Support enumeration with a vertex-enumeration fallback

pub mod catalog;
pub mod domain;
pub mod solver;
pub mod source;

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: request and result types cross thread boundaries.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::PayoffMatrix>();
        require_sync::<domain::PayoffMatrix>();
        require_send::<domain::Game>();
        require_sync::<domain::Game>();
        require_send::<domain::StrategyVector>();
        require_sync::<domain::StrategyVector>();
        require_send::<domain::EquilibriumSet>();
        require_sync::<domain::EquilibriumSet>();

        require_send::<source::MatrixRequest>();
        require_sync::<source::MatrixRequest>();
        require_send::<source::SourcedMatrix>();
        require_sync::<source::SourcedMatrix>();

        require_send::<solver::SolveOutcome>();
        require_sync::<solver::SolveOutcome>();
        require_send::<solver::SolverError>();
        require_sync::<solver::SolverError>();
        require_send::<solver::FallbackSolver>();
        require_sync::<solver::FallbackSolver>();
    }

    /// Every catalog scenario solves to at least one equilibrium under the default solver.
    #[test]
    fn catalog_scenarios_all_solve() {
        use solver::{EquilibriumSolver, FallbackSolver};

        for scenario in catalog::CATALOG {
            let sourced = source::get_matrix(&source::MatrixRequest::built_in(scenario.key)).unwrap();
            let game = sourced.to_game(domain::PayoffConvention::default()).unwrap();
            let outcome = FallbackSolver::default().solve(&game).unwrap();
            let set = outcome.equilibria().unwrap_or_else(|| panic!("{} has none", scenario.key));
            for eq in set {
                assert!(game.is_equilibrium(&eq.player_a, &eq.player_b, 1e-9), "{}", scenario.key);
            }
        }
    }
}
