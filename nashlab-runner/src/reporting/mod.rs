//! Report model and export pipeline.

pub mod export;
pub mod reports;

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use nashlab_core::domain::{EnumerationMethod, GameFingerprint};

use crate::format::FormattedEquilibrium;

pub use export::{suggested_file_name, ReportExporter, TransientReport};

/// Errors while generating, delivering or cleaning up a report.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to create transient report file: {0}")]
    Create(#[source] std::io::Error),
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to write CSV report: {0}")]
    Csv(#[from] csv::Error),
    #[error("report has no equilibria")]
    Empty,
}

/// Document format of an exported report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Pdf,
    Markdown,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn all() -> [Self; 4] {
        [Self::Pdf, Self::Markdown, Self::Json, Self::Csv]
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Markdown => "md",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Markdown => "text/markdown",
            Self::Json => "application/json",
            Self::Csv => "text/csv",
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "md" | "markdown" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!(
                "unknown report format '{other}'. Valid: pdf, markdown, json, csv"
            )),
        }
    }
}

/// Everything a report document is generated from. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub scenario_name: String,
    pub generated_at: DateTime<Utc>,
    pub fingerprint: GameFingerprint,
    pub method: EnumerationMethod,
    pub equilibria: Vec<FormattedEquilibrium>,
}

impl Report {
    pub fn new(
        scenario_name: impl Into<String>,
        fingerprint: GameFingerprint,
        method: EnumerationMethod,
        equilibria: Vec<FormattedEquilibrium>,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            generated_at: Utc::now(),
            fingerprint,
            method,
            equilibria,
        }
    }

    pub fn title(&self) -> String {
        format!("Nash Equilibrium Report: {}", self.scenario_name)
    }

    /// Plain-text body shared by the text-based formats: one block per
    /// equilibrium, separated by blank lines.
    pub fn body_lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.equilibria.len() * 4);
        for eq in &self.equilibria {
            lines.push(String::new());
            lines.push(format!("Equilibrium {}:", eq.index));
            lines.push(format!("Player A: {}", eq.player_a_text()));
            lines.push(format!("Player B: {}", eq.player_b_text()));
        }
        lines
    }
}
