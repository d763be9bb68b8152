//! TOML configuration.
//!
//! Every field has a default, so an empty file (or no file) is a valid
//! configuration. Command-line flags override whatever is loaded here.
//!
//! ```toml
//! [solver]
//! method = "auto"          # auto | support | vertex
//! convention = "identical" # identical | zero_sum | symmetric
//! tolerance = 1e-9
//!
//! [display]
//! decimals = 3
//! chart = true
//!
//! [export]
//! format = "pdf"           # pdf | markdown | json | csv
//! output_dir = "reports"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use nashlab_core::domain::PayoffConvention;
use nashlab_core::solver::{SolverMethod, SolverSettings, DEFAULT_TOLERANCE};

use crate::format::{ResultFormatter, DISPLAY_DECIMALS};
use crate::reporting::ReportFormat;

/// Most decimals the display section accepts.
pub const MAX_DECIMALS: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("solver.tolerance must be in (0, 1e-3), got {0}")]
    Tolerance(f64),
    #[error("display.decimals must be at most 10, got {0}")]
    Decimals(u32),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NashConfig {
    pub solver: SolverSection,
    pub display: DisplaySection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SolverSection {
    pub method: SolverMethod,
    /// How Player B's payoffs are derived when a scenario has no explicit B matrix.
    pub convention: PayoffConvention,
    pub tolerance: f64,
}

impl Default for SolverSection {
    fn default() -> Self {
        Self {
            method: SolverMethod::default(),
            convention: PayoffConvention::default(),
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    pub decimals: u32,
    pub chart: bool,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            decimals: DISPLAY_DECIMALS,
            chart: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSection {
    pub format: ReportFormat,
    /// Directory reports are delivered into when no explicit path is given.
    pub output_dir: Option<PathBuf>,
}

impl NashConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.solver_settings()?;
        if self.display.decimals > MAX_DECIMALS {
            return Err(ConfigError::Decimals(self.display.decimals));
        }
        Ok(())
    }

    pub fn solver_settings(&self) -> Result<SolverSettings, ConfigError> {
        SolverSettings::new(self.solver.tolerance)
            .map_err(|_| ConfigError::Tolerance(self.solver.tolerance))
    }

    pub fn formatter(&self) -> ResultFormatter {
        ResultFormatter::new(self.display.decimals)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
