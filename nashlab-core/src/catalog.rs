//! Built-in scenario catalog.
//!
//! Each scenario is a named game with Player A's payoffs and, where the story
//! fixes them, Player B's. Scenarios without an explicit B matrix take B from
//! the caller's [`PayoffConvention`](crate::domain::PayoffConvention).

use crate::domain::{PayoffMatrix, ValidationError};

/// A named built-in game.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    /// Kebab-case lookup key.
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub payoffs_a: &'static [&'static [f64]],
    pub payoffs_b: Option<&'static [&'static [f64]]>,
}

impl Scenario {
    pub fn matrix_a(&self) -> Result<PayoffMatrix, ValidationError> {
        PayoffMatrix::new(to_rows(self.payoffs_a))
    }

    pub fn matrix_b(&self) -> Result<Option<PayoffMatrix>, ValidationError> {
        self.payoffs_b
            .map(|rows| PayoffMatrix::new(to_rows(rows)))
            .transpose()
    }

    /// (rows, cols) of Player A's matrix.
    pub fn shape(&self) -> (usize, usize) {
        (
            self.payoffs_a.len(),
            self.payoffs_a.first().map_or(0, |r| r.len()),
        )
    }

    fn matches(&self, query: &str) -> bool {
        self.key.eq_ignore_ascii_case(query) || self.name.eq_ignore_ascii_case(query)
    }
}

fn to_rows(rows: &[&[f64]]) -> Vec<Vec<f64>> {
    rows.iter().map(|r| r.to_vec()).collect()
}

// ─── Catalog ─────────────────────────────────────────────────────────

pub const CATALOG: &[Scenario] = &[
    Scenario {
        key: "coordination",
        name: "Coordination Game",
        description: "Both sides gain only when they pick the same standard",
        payoffs_a: &[&[3.0, 0.0], &[0.0, 3.0]],
        payoffs_b: None,
    },
    Scenario {
        key: "matching-pennies",
        name: "Matching Pennies",
        description: "A wins on a match, B wins on a mismatch",
        payoffs_a: &[&[1.0, -1.0], &[-1.0, 1.0]],
        payoffs_b: Some(&[&[-1.0, 1.0], &[1.0, -1.0]]),
    },
    Scenario {
        key: "prisoners-dilemma",
        name: "Prisoner's Dilemma",
        description: "Cooperate or defect; defection dominates for both",
        payoffs_a: &[&[-1.0, -3.0], &[0.0, -2.0]],
        payoffs_b: Some(&[&[-1.0, 0.0], &[-3.0, -2.0]]),
    },
    Scenario {
        key: "battle-of-the-sexes",
        name: "Battle of the Sexes",
        description: "Both want to meet but prefer different venues",
        payoffs_a: &[&[3.0, 0.0], &[0.0, 2.0]],
        payoffs_b: Some(&[&[2.0, 0.0], &[0.0, 3.0]]),
    },
    Scenario {
        key: "stag-hunt",
        name: "Stag Hunt",
        description: "Joint venture pays best, going alone is safe",
        payoffs_a: &[&[4.0, 0.0], &[3.0, 3.0]],
        payoffs_b: Some(&[&[4.0, 3.0], &[0.0, 3.0]]),
    },
    Scenario {
        key: "chicken",
        name: "Chicken",
        description: "Hold firm or concede; mutual escalation is a disaster",
        payoffs_a: &[&[0.0, -1.0], &[1.0, -10.0]],
        payoffs_b: Some(&[&[0.0, 1.0], &[-1.0, -10.0]]),
    },
    Scenario {
        key: "rock-paper-scissors",
        name: "Rock Paper Scissors",
        description: "Cyclic dominance, zero-sum",
        payoffs_a: &[&[0.0, -1.0, 1.0], &[1.0, 0.0, -1.0], &[-1.0, 1.0, 0.0]],
        payoffs_b: Some(&[&[0.0, 1.0, -1.0], &[-1.0, 0.0, 1.0], &[1.0, -1.0, 0.0]]),
    },
    Scenario {
        key: "salary-negotiation",
        name: "Salary Negotiation",
        description: "Employer offers low/market/high, candidate accepts, counters or walks",
        payoffs_a: &[&[5.0, 3.0, 0.0], &[4.0, 4.0, 1.0], &[2.0, 2.0, 2.0]],
        payoffs_b: Some(&[&[1.0, 2.0, 0.0], &[3.0, 3.0, 1.0], &[5.0, 4.0, 3.0]]),
    },
    Scenario {
        key: "price-war",
        name: "Price War",
        description: "Two firms choose a high, medium or low price",
        payoffs_a: &[&[6.0, 2.0, 1.0], &[7.0, 4.0, 2.0], &[5.0, 4.0, 3.0]],
        payoffs_b: Some(&[&[6.0, 7.0, 5.0], &[2.0, 4.0, 4.0], &[1.0, 2.0, 3.0]]),
    },
    Scenario {
        key: "supplier-contract",
        name: "Supplier Contract",
        description: "Buyer picks long-term or spot, supplier picks premium, standard or budget",
        payoffs_a: &[&[4.0, 5.0, 2.0], &[3.0, 4.0, 3.0]],
        payoffs_b: Some(&[&[5.0, 3.0, 1.0], &[2.0, 3.0, 4.0]]),
    },
];

/// Find a scenario by key or display name, ignoring case.
pub fn find(query: &str) -> Option<&'static Scenario> {
    let query = query.trim();
    CATALOG.iter().find(|s| s.matches(query))
}

/// Like [`find`], but unknown names are a [`ValidationError`] listing the valid keys.
pub fn lookup(query: &str) -> Result<&'static Scenario, ValidationError> {
    find(query).ok_or_else(|| ValidationError::UnknownScenario {
        key: query.to_string(),
        valid: keys().join(", "),
    })
}

pub fn keys() -> Vec<&'static str> {
    CATALOG.iter().map(|s| s.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_scenario_builds() {
        for scenario in CATALOG {
            let a = scenario.matrix_a().unwrap();
            assert_eq!(a.shape(), scenario.shape(), "{}", scenario.key);
            if let Some(b) = scenario.matrix_b().unwrap() {
                assert_eq!(b.shape(), a.shape(), "{}", scenario.key);
            }
        }
    }

    #[test]
    fn keys_and_names_are_unique() {
        let keys: HashSet<_> = CATALOG.iter().map(|s| s.key).collect();
        let names: HashSet<_> = CATALOG.iter().map(|s| s.name.to_lowercase()).collect();
        assert_eq!(keys.len(), CATALOG.len());
        assert_eq!(names.len(), CATALOG.len());
        assert_eq!(CATALOG.len(), 10);
    }

    #[test]
    fn lookup_by_key_or_name() {
        assert_eq!(find("stag-hunt").unwrap().name, "Stag Hunt");
        assert_eq!(find("  PRISONER'S DILEMMA ").unwrap().key, "prisoners-dilemma");
        assert!(find("poker").is_none());
    }

    #[test]
    fn unknown_scenario_lists_keys() {
        let err = lookup("poker").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("poker"));
        assert!(message.contains("coordination"));
        assert!(message.contains("supplier-contract"));
    }
}
