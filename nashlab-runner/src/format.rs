//! Result formatting: numbered, rounded equilibria and chart-ready bar series.
//!
//! Rounding is for display only: vectors are not renormalised, so a rounded
//! `[0.333, 0.333, 0.333]` is shown as-is.

use serde::{Deserialize, Serialize};

use nashlab_core::domain::{Equilibrium, EquilibriumSet};

/// Decimal places shown for probabilities and payoffs.
pub const DISPLAY_DECIMALS: u32 = 3;

pub const CHART_TITLE: &str = "Strategy Probability Distribution";
pub const CHART_X_LABEL: &str = "Strategies";
pub const CHART_Y_LABEL: &str = "Probability";
pub const PLAYER_A_LABEL: &str = "Player A";
pub const PLAYER_B_LABEL: &str = "Player B";

/// Bars for strategy `i` sit at `i - BAR_OFFSET` (A) and `i + BAR_OFFSET` (B).
pub const BAR_OFFSET: f64 = 0.15;
pub const BAR_WIDTH: f64 = 0.3;

/// One equilibrium ready for display, 1-based in solver order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormattedEquilibrium {
    pub index: usize,
    pub player_a: Vec<f64>,
    pub player_b: Vec<f64>,
    pub payoff_a: f64,
    pub payoff_b: f64,
}

impl FormattedEquilibrium {
    pub fn player_a_text(&self) -> String {
        format_vector(&self.player_a)
    }

    pub fn player_b_text(&self) -> String {
        format_vector(&self.player_b)
    }
}

/// One player's bars.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarSeries {
    pub label: String,
    /// Bar centres on the x axis.
    pub positions: Vec<f64>,
    pub heights: Vec<f64>,
}

/// Grouped bar chart of both players' strategy probabilities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BarChart {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bar_width: f64,
    pub series: Vec<BarSeries>,
}

impl BarChart {
    /// Largest strategy count across both players.
    pub fn strategy_count(&self) -> usize {
        self.series.iter().map(|s| s.heights.len()).max().unwrap_or(0)
    }
}

/// Turns raw equilibria into display rows and charts. Pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultFormatter {
    decimals: u32,
}

impl Default for ResultFormatter {
    fn default() -> Self {
        Self {
            decimals: DISPLAY_DECIMALS,
        }
    }
}

impl ResultFormatter {
    pub fn new(decimals: u32) -> Self {
        Self { decimals }
    }

    pub fn decimals(&self) -> u32 {
        self.decimals
    }

    pub fn format(&self, set: &EquilibriumSet) -> Vec<FormattedEquilibrium> {
        set.iter()
            .enumerate()
            .map(|(i, eq)| self.format_one(i + 1, eq))
            .collect()
    }

    pub fn format_one(&self, index: usize, equilibrium: &Equilibrium) -> FormattedEquilibrium {
        FormattedEquilibrium {
            index,
            player_a: self.round_vector(equilibrium.player_a.probabilities()),
            player_b: self.round_vector(equilibrium.player_b.probabilities()),
            payoff_a: round_to(equilibrium.payoff_a, self.decimals),
            payoff_b: round_to(equilibrium.payoff_b, self.decimals),
        }
    }

    /// Round an already formatted row again; a no-op for this formatter's output.
    pub fn reformat(&self, formatted: &FormattedEquilibrium) -> FormattedEquilibrium {
        FormattedEquilibrium {
            index: formatted.index,
            player_a: self.round_vector(&formatted.player_a),
            player_b: self.round_vector(&formatted.player_b),
            payoff_a: round_to(formatted.payoff_a, self.decimals),
            payoff_b: round_to(formatted.payoff_b, self.decimals),
        }
    }

    pub fn round_vector(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| round_to(v, self.decimals)).collect()
    }

    pub fn chart(&self, formatted: &FormattedEquilibrium) -> BarChart {
        BarChart {
            title: CHART_TITLE.to_string(),
            x_label: CHART_X_LABEL.to_string(),
            y_label: CHART_Y_LABEL.to_string(),
            bar_width: BAR_WIDTH,
            series: vec![
                series(PLAYER_A_LABEL, &formatted.player_a, -BAR_OFFSET),
                series(PLAYER_B_LABEL, &formatted.player_b, BAR_OFFSET),
            ],
        }
    }
}

fn series(label: &str, heights: &[f64], offset: f64) -> BarSeries {
    BarSeries {
        label: label.to_string(),
        positions: (0..heights.len()).map(|i| i as f64 + offset).collect(),
        heights: heights.to_vec(),
    }
}

/// Round half away from zero to `decimals` places. `-0.0` comes back as `0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// `[0.5, 0.5]` style: comma separated, at least one decimal digit.
pub fn format_vector(values: &[f64]) -> String {
    let parts: Vec<String> = values.iter().map(|v| format!("{v:?}")).collect();
    format!("[{}]", parts.join(", "))
}
