//! Equilibria and ordered equilibrium sets.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::game::Game;
use super::strategy::StrategyVector;

/// Equilibria closer than this (max component difference) are the same point.
pub const DEDUP_TOLERANCE: f64 = 1e-6;

/// Which enumeration tier produced an equilibrium set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnumerationMethod {
    SupportEnumeration,
    VertexEnumeration,
}

impl EnumerationMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::SupportEnumeration => "support enumeration",
            Self::VertexEnumeration => "vertex enumeration",
        }
    }
}

impl fmt::Display for EnumerationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A strategy profile from which neither player profits by deviating.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equilibrium {
    pub player_a: StrategyVector,
    pub player_b: StrategyVector,
    /// Expected payoff to Player A under the profile.
    pub payoff_a: f64,
    /// Expected payoff to Player B under the profile.
    pub payoff_b: f64,
}

impl Equilibrium {
    pub fn new(game: &Game, player_a: StrategyVector, player_b: StrategyVector) -> Self {
        let (payoff_a, payoff_b) = game.expected_payoffs(&player_a, &player_b);
        Self {
            player_a,
            player_b,
            payoff_a,
            payoff_b,
        }
    }

    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        self.player_a.approx_eq(&other.player_a, tolerance)
            && self.player_b.approx_eq(&other.player_b, tolerance)
    }
}

/// Equilibria in the order the enumeration produced them, without duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquilibriumSet {
    method: EnumerationMethod,
    equilibria: Vec<Equilibrium>,
}

impl EquilibriumSet {
    pub fn new(method: EnumerationMethod) -> Self {
        Self {
            method,
            equilibria: Vec::new(),
        }
    }

    /// Append unless an equal point (within [`DEDUP_TOLERANCE`]) is already present.
    pub fn insert(&mut self, equilibrium: Equilibrium) -> bool {
        if self.contains(&equilibrium.player_a, &equilibrium.player_b) {
            return false;
        }
        self.equilibria.push(equilibrium);
        true
    }

    pub fn contains(&self, player_a: &StrategyVector, player_b: &StrategyVector) -> bool {
        self.equilibria.iter().any(|e| {
            e.player_a.approx_eq(player_a, DEDUP_TOLERANCE)
                && e.player_b.approx_eq(player_b, DEDUP_TOLERANCE)
        })
    }

    pub fn method(&self) -> EnumerationMethod {
        self.method
    }

    pub fn len(&self) -> usize {
        self.equilibria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equilibria.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Equilibrium> {
        self.equilibria.iter()
    }

    pub fn as_slice(&self) -> &[Equilibrium] {
        &self.equilibria
    }
}

impl<'a> IntoIterator for &'a EquilibriumSet {
    type Item = &'a Equilibrium;
    type IntoIter = std::slice::Iter<'a, Equilibrium>;

    fn into_iter(self) -> Self::IntoIter {
        self.equilibria.iter()
    }
}
