//! Terminal rendering of solve responses.

use nashlab_core::domain::Game;
use nashlab_core::source::CustomMatrix;
use nashlab_runner::format::{BarChart, FormattedEquilibrium};
use nashlab_runner::{PipelineOutcome, SolveResponse};

/// Widest bar in the text chart, for probability 1.0.
const BAR_COLUMNS: usize = 40;

pub fn print_response(response: &SolveResponse, chart: bool) {
    println!("{}", response.scenario_name);
    if let Some(description) = &response.description {
        println!("{description}");
    }
    let b_source = if response.explicit_payoffs_b {
        "explicit".to_string()
    } else {
        response.convention.to_string()
    };
    println!("Player B payoffs: {b_source}");
    println!();
    print_game(&response.game);
    println!();

    match &response.outcome {
        PipelineOutcome::Solved {
            set,
            equilibria,
            charts,
        } => {
            println!(
                "{} equilibria ({})",
                equilibria.len(),
                set.method().name()
            );
            for (eq, bars) in equilibria.iter().zip(charts) {
                println!();
                print_equilibrium(eq);
                if chart {
                    print_chart(bars);
                }
            }
        }
        PipelineOutcome::NoEquilibriumFound { advisory } => println!("{advisory}"),
    }
}

/// Bimatrix table: each cell is `a, b`.
fn print_game(game: &Game) {
    let (rows, cols) = game.shape();
    let a = game.payoffs_a();
    let b = game.payoffs_b();

    print!("{:>6}", "");
    for j in 0..cols {
        print!(" {:>14}", format!("B{}", j + 1));
    }
    println!();
    for i in 0..rows {
        print!("{:>6}", format!("A{}", i + 1));
        for j in 0..cols {
            print!(" {:>14}", format!("{}, {}", a.get(i, j), b.get(i, j)));
        }
        println!();
    }
}

fn print_equilibrium(eq: &FormattedEquilibrium) {
    println!("Equilibrium {}:", eq.index);
    println!("  Player A: {}", eq.player_a_text());
    println!("  Player B: {}", eq.player_b_text());
    println!("  Expected payoffs: A {} / B {}", eq.payoff_a, eq.payoff_b);
}

fn print_chart(chart: &BarChart) {
    println!("  {} ({} by {})", chart.title, chart.y_label, chart.x_label);
    for series in &chart.series {
        for (i, &height) in series.heights.iter().enumerate() {
            let width = (height.clamp(0.0, 1.0) * BAR_COLUMNS as f64).round() as usize;
            println!(
                "  {:<9} S{} |{:<w$}| {height}",
                series.label,
                i + 1,
                "#".repeat(width),
                w = BAR_COLUMNS
            );
        }
    }
}

/// Player A cells in `--cells` syntax.
pub fn grid_text(matrix: &CustomMatrix) -> String {
    let (rows, cols) = matrix.shape();
    (0..rows)
        .map(|i| {
            (0..cols)
                .map(|j| matrix.get(i, j).unwrap_or_default().to_string())
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect::<Vec<_>>()
        .join(";")
}
