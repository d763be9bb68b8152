//! Report export round trips: solve, export in every format, deliver, and
//! read the document back.

use std::fs;

use nashlab_core::source::MatrixRequest;
use nashlab_runner::{run, NashConfig, Report, ReportExporter, ReportFormat, SolveRequest};

fn report_for(key: &str) -> Report {
    let response = run(
        &SolveRequest::new(MatrixRequest::built_in(key)),
        &NashConfig::default(),
    )
    .unwrap();
    response.report().unwrap()
}

#[test]
fn every_format_contains_scenario_and_indices() {
    let report = report_for("battle-of-the-sexes");
    assert_eq!(report.equilibria.len(), 3);

    for format in ReportFormat::all() {
        let transient = ReportExporter::new(format).export(&report).unwrap();
        assert_eq!(transient.file_name(), format!("Battle_of_the_Sexes_Nash.{}", format.extension()));
        assert_eq!(transient.mime_type(), format.mime_type());
        let path = transient.path().to_path_buf();

        let mut bytes = Vec::new();
        transient.deliver(&mut bytes).unwrap();
        assert!(!path.exists(), "{format} transient file left behind");

        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("Battle of the Sexes"), "{format}");
        for eq in &report.equilibria {
            let marker = match format {
                ReportFormat::Json => format!("\"index\": {}", eq.index),
                ReportFormat::Csv => format!(",{},A,", eq.index),
                _ => format!("Equilibrium {}:", eq.index),
            };
            assert!(text.contains(&marker), "{format} missing {marker}");
        }
    }
}

#[test]
fn pdf_is_default_and_readable() {
    let report = report_for("coordination");
    let transient = ReportExporter::default().export(&report).unwrap();
    assert_eq!(transient.file_name(), "Coordination_Game_Nash.pdf");
    assert_eq!(transient.mime_type(), "application/pdf");

    let mut bytes = Vec::new();
    transient.deliver(&mut bytes).unwrap();
    let text = String::from_utf8_lossy(&bytes);
    assert!(text.starts_with("%PDF-1.4"));
    assert!(text.contains("(Nash Equilibrium Report: Coordination Game) Tj"));
    assert!(text.contains("(Equilibrium 1:) Tj"));
    assert!(text.contains("(Equilibrium 3:) Tj"));
    assert!(text.contains("(Player A: [0.5, 0.5]) Tj"));
}

#[test]
fn json_report_round_trips() {
    let report = report_for("chicken");
    let transient = ReportExporter::new(ReportFormat::Json).export(&report).unwrap();
    let mut bytes = Vec::new();
    transient.deliver(&mut bytes).unwrap();
    let back: Report = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(back.scenario_name, report.scenario_name);
    assert_eq!(back.generated_at, report.generated_at);
    assert_eq!(back.fingerprint, report.fingerprint);
    assert_eq!(back.method, report.method);
    assert_eq!(back.equilibria.len(), report.equilibria.len());
    for (got, want) in back.equilibria.iter().zip(&report.equilibria) {
        assert_eq!(got.index, want.index);
        for (g, w) in got.player_a.iter().zip(&want.player_a) {
            assert!((g - w).abs() < 1e-12);
        }
        for (g, w) in got.player_b.iter().zip(&want.player_b) {
            assert!((g - w).abs() < 1e-12);
        }
    }
}

#[test]
fn deliver_to_directory_uses_suggested_name() {
    let dir = tempfile::tempdir().unwrap();
    let report = report_for("stag-hunt");
    let transient = ReportExporter::new(ReportFormat::Markdown).export(&report).unwrap();
    let transient_path = transient.path().to_path_buf();

    let written = transient.deliver_to_path(dir.path()).unwrap();
    assert_eq!(written, dir.path().join("Stag_Hunt_Nash.md"));
    assert!(!transient_path.exists());
    let text = fs::read_to_string(&written).unwrap();
    assert!(text.starts_with("# Nash Equilibrium Report: Stag Hunt"));
}

#[test]
fn unwritable_destination_still_cleans_up() {
    let dir = tempfile::tempdir().unwrap();
    let report = report_for("stag-hunt");
    let transient = ReportExporter::default().export(&report).unwrap();
    let transient_path = transient.path().to_path_buf();

    let missing = dir.path().join("no-such-dir").join("out.pdf");
    assert!(transient.deliver_to_path(&missing).is_err());
    assert!(!transient_path.exists());
}
