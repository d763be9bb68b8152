//! Domain types for NashLab

pub mod equilibrium;
pub mod game;
pub mod matrix;
pub mod strategy;

pub use equilibrium::{EnumerationMethod, Equilibrium, EquilibriumSet, DEDUP_TOLERANCE};
pub use game::{Game, GameFingerprint, PayoffConvention};
pub use matrix::{validate_dimensions, PayoffMatrix, ValidationError, MAX_STRATEGIES, MIN_STRATEGIES};
pub use strategy::{StrategyError, StrategyVector, SUM_TOLERANCE};
