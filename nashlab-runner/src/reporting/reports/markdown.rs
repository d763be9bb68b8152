//! Markdown report generator.

use crate::reporting::Report;

pub struct MarkdownReportGenerator;

impl MarkdownReportGenerator {
    pub fn generate(&self, report: &Report) -> String {
        let mut out = format!(
            "# {}\n\n\
- Generated: {}\n\
- Method: {}\n\
- Game fingerprint: `{}`\n\
- Equilibria: {}\n",
            report.title(),
            report.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
            report.method,
            report.fingerprint,
            report.equilibria.len()
        );

        for eq in &report.equilibria {
            out.push_str(&format!("\n## Equilibrium {}:\n\n", eq.index));
            out.push_str(&format!("- Player A: `{}`\n", eq.player_a_text()));
            out.push_str(&format!("- Player B: `{}`\n", eq.player_b_text()));
            out.push_str(&format!(
                "- Expected payoffs: A {:?}, B {:?}\n",
                eq.payoff_a, eq.payoff_b
            ));
        }

        if report.equilibria.len() > 1 {
            out.push_str("\n## Summary\n\n");
            out.push_str("| # | Player A | Player B | Payoff A | Payoff B |\n");
            out.push_str("|---|----------|----------|----------|----------|\n");
            for eq in &report.equilibria {
                out.push_str(&format!(
                    "| {} | {} | {} | {:?} | {:?} |\n",
                    eq.index,
                    eq.player_a_text(),
                    eq.player_b_text(),
                    eq.payoff_a,
                    eq.payoff_b
                ));
            }
        }
        out
    }
}
