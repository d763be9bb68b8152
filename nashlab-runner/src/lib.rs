//! NashLab Runner — solve pipeline, result formatting, report export.
//!
//! This crate builds on `nashlab-core` to provide:
//! - TOML configuration with per-field defaults
//! - The request → response solve pipeline
//! - Display formatting and chart-ready bar series
//! - Report export (PDF, Markdown, JSON, CSV) through transient files

pub mod config;
pub mod format;
pub mod pipeline;
pub mod reporting;

pub use config::{ConfigError, NashConfig};
pub use format::{BarChart, BarSeries, FormattedEquilibrium, ResultFormatter};
pub use pipeline::{run, run_with_solver, PipelineError, PipelineOutcome, SolveRequest, SolveResponse};
pub use reporting::{ExportError, Report, ReportExporter, ReportFormat, TransientReport};
