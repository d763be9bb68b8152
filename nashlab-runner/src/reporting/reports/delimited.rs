//! CSV report generator: one row per (equilibrium, player).

use crate::format::format_vector;

use crate::reporting::{ExportError, Report};

pub struct CsvReportGenerator;

impl CsvReportGenerator {
    pub fn generate(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        wtr.write_record([
            "scenario",
            "equilibrium",
            "player",
            "probabilities",
            "expected_payoff",
        ])?;

        for eq in &report.equilibria {
            let index = eq.index.to_string();
            for (player, probabilities, payoff) in [
                ("A", &eq.player_a, eq.payoff_a),
                ("B", &eq.player_b, eq.payoff_b),
            ] {
                wtr.write_record([
                    report.scenario_name.as_str(),
                    index.as_str(),
                    player,
                    format_vector(probabilities).as_str(),
                    format!("{payoff:?}").as_str(),
                ])?;
            }
        }

        wtr.into_inner()
            .map_err(|err| ExportError::Csv(err.into_error().into()))
    }
}
