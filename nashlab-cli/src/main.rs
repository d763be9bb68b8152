//! NashLab CLI — scenario listing, equilibrium solving and report export.
//!
//! Commands:
//! - `scenarios`: list the built-in games
//! - `show`: print one built-in game's payoff matrices
//! - `solve`: solve a built-in or custom game, optionally exporting a report
//! - `random`: generate a seeded random custom game and solve it

mod display;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::debug;

use nashlab_core::catalog::{self, CATALOG};
use nashlab_core::domain::PayoffConvention;
use nashlab_core::solver::SolverMethod;
use nashlab_core::source::{random_matrix, CustomMatrix, MatrixRequest};
use nashlab_runner::{
    run, NashConfig, Report, ReportExporter, ReportFormat, SolveRequest,
};

#[derive(Parser)]
#[command(
    name = "nashlab",
    about = "NashLab CLI — Nash equilibria of two-player bimatrix games"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the built-in scenarios.
    Scenarios,
    /// Print a built-in scenario's payoff matrices.
    Show {
        /// Scenario key or display name (e.g., matching-pennies).
        key: String,

        /// Convention for deriving Player B when the scenario has no B matrix.
        #[arg(long)]
        convention: Option<PayoffConvention>,
    },
    /// Solve a built-in scenario or a custom matrix.
    Solve {
        /// Built-in scenario key. Mutually exclusive with --rows/--cols/--cells.
        #[arg(long)]
        scenario: Option<String>,

        /// Custom matrix row count (2-5).
        #[arg(long)]
        rows: Option<usize>,

        /// Custom matrix column count (2-5).
        #[arg(long)]
        cols: Option<usize>,

        /// Player A payoffs, rows separated by ';' (e.g., "3,0;0,3").
        #[arg(long)]
        cells: Option<String>,

        #[command(flatten)]
        options: SolveOptions,
    },
    /// Generate a random custom matrix on the 0.5 grid and solve it.
    Random {
        /// Row count (2-5).
        #[arg(long)]
        rows: usize,

        /// Column count (2-5).
        #[arg(long)]
        cols: usize,

        /// RNG seed. Random when omitted; the seed used is printed.
        #[arg(long)]
        seed: Option<u64>,

        #[command(flatten)]
        options: SolveOptions,
    },
}

/// Flags shared by every command that solves.
#[derive(Args)]
struct SolveOptions {
    /// Explicit Player B payoffs in the same grid syntax as --cells (custom matrices only).
    #[arg(long)]
    payoffs_b: Option<String>,

    /// Player B convention: identical, zero_sum, symmetric. Overrides the config.
    #[arg(long)]
    convention: Option<PayoffConvention>,

    /// Solver: auto, support, vertex. Overrides the config.
    #[arg(long)]
    method: Option<SolverMethod>,

    /// Skip the text bar charts.
    #[arg(long, default_value_t = false)]
    no_chart: bool,

    /// Export a report to this file or directory.
    #[arg(long)]
    export: Option<PathBuf>,

    /// Report format: pdf, markdown, json, csv. Overrides the config.
    #[arg(long)]
    format: Option<ReportFormat>,

    /// Path to a TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Scenarios => run_scenarios(),
        Commands::Show { key, convention } => run_show(&key, convention),
        Commands::Solve {
            scenario,
            rows,
            cols,
            cells,
            options,
        } => {
            let matrix = solve_target(scenario, rows, cols, cells, options.payoffs_b.as_deref())?;
            run_solve(matrix, &options)
        }
        Commands::Random {
            rows,
            cols,
            seed,
            options,
        } => run_random(rows, cols, seed, &options),
    }
}

fn run_scenarios() -> Result<()> {
    println!("{:<22} {:<24} {:<6} Description", "Key", "Name", "Size");
    println!("{}", "-".repeat(96));
    for scenario in CATALOG {
        let (rows, cols) = scenario.shape();
        println!(
            "{:<22} {:<24} {:<6} {}",
            scenario.key,
            scenario.name,
            format!("{rows}x{cols}"),
            scenario.description
        );
    }
    Ok(())
}

fn run_show(key: &str, convention: Option<PayoffConvention>) -> Result<()> {
    let scenario = catalog::lookup(key)?;
    let convention = convention.unwrap_or_default();
    let payoffs_a = scenario.matrix_a()?;
    let payoffs_b = match scenario.matrix_b()? {
        Some(b) => b,
        None => convention
            .derive(&payoffs_a)
            .with_context(|| format!("cannot derive Player B with the {convention} convention"))?,
    };

    println!("{} ({})", scenario.name, scenario.key);
    println!("{}", scenario.description);
    println!();
    println!("Player A payoffs:");
    print!("{payoffs_a}");
    println!();
    match scenario.payoffs_b {
        Some(_) => println!("Player B payoffs:"),
        None => println!("Player B payoffs ({convention}):"),
    }
    print!("{payoffs_b}");
    Ok(())
}

fn solve_target(
    scenario: Option<String>,
    rows: Option<usize>,
    cols: Option<usize>,
    cells: Option<String>,
    payoffs_b: Option<&str>,
) -> Result<MatrixRequest> {
    let custom_given = rows.is_some() || cols.is_some() || cells.is_some();
    match (scenario, custom_given) {
        (Some(_), true) => bail!("--scenario and --rows/--cols/--cells are mutually exclusive"),
        (Some(key), false) => {
            if payoffs_b.is_some() {
                bail!("--payoffs-b only applies to custom matrices");
            }
            Ok(MatrixRequest::built_in(key))
        }
        (None, true) => {
            let (Some(rows), Some(cols)) = (rows, cols) else {
                bail!("custom matrices need both --rows and --cols");
            };
            let Some(cells) = cells else {
                bail!("custom matrices need --cells");
            };
            let mut custom = CustomMatrix::from_grid(rows, cols, &cells)?;
            if let Some(grid) = payoffs_b {
                custom = custom.with_payoffs_b(grid)?;
            }
            Ok(MatrixRequest::Custom(custom))
        }
        (None, false) => bail!("one of --scenario or --rows/--cols/--cells is required"),
    }
}

fn run_random(rows: usize, cols: usize, seed: Option<u64>, options: &SolveOptions) -> Result<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let mut custom = random_matrix(rows, cols, seed)?;
    if let Some(grid) = options.payoffs_b.as_deref() {
        custom = custom.with_payoffs_b(grid)?;
    }
    println!("Seed: {seed}");
    println!("Cells: {}", display::grid_text(&custom));
    println!();
    run_solve(MatrixRequest::Custom(custom), options)
}

fn run_solve(matrix: MatrixRequest, options: &SolveOptions) -> Result<()> {
    let config = load_config(options.config.as_deref())?;

    let mut request = SolveRequest::new(matrix);
    if let Some(convention) = options.convention {
        request = request.with_convention(convention);
    }
    if let Some(method) = options.method {
        request = request.with_method(method);
    }

    let response = run(&request, &config)?;
    display::print_response(&response, config.display.chart && !options.no_chart);

    let report = response.report();
    let destination = export_destination(
        options.export.as_deref(),
        config.export.output_dir.as_deref(),
        report.is_some(),
    )?;
    if let (Some(report), Some(destination)) = (report, destination) {
        let format = options.format.unwrap_or(config.export.format);
        export_report(&report, format, &destination)?;
    }
    Ok(())
}

/// Where the report goes, if anywhere.
///
/// `--export` wins over `[export] output_dir`. Only an explicit `--export`
/// turns "no equilibrium found" into an error; a configured directory is
/// skipped.
fn export_destination(
    explicit: Option<&Path>,
    configured: Option<&Path>,
    has_report: bool,
) -> Result<Option<PathBuf>> {
    match (explicit, configured) {
        (Some(_), _) if !has_report => bail!("nothing to export: no equilibrium found"),
        (Some(path), _) => Ok(Some(path.to_path_buf())),
        (None, Some(dir)) if has_report => Ok(Some(dir.to_path_buf())),
        (None, Some(dir)) => {
            debug!("no equilibrium found, skipping export to {}", dir.display());
            Ok(None)
        }
        (None, None) => Ok(None),
    }
}

fn load_config(path: Option<&Path>) -> Result<NashConfig> {
    match path {
        Some(path) => NashConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display())),
        None => Ok(NashConfig::default()),
    }
}

fn export_report(report: &Report, format: ReportFormat, destination: &Path) -> Result<()> {
    // A path without an extension is treated as a directory to deliver into.
    if destination.extension().is_none() {
        fs::create_dir_all(destination)
            .with_context(|| format!("creating {}", destination.display()))?;
    }

    let transient = ReportExporter::new(format).export(report)?;
    debug!("transient report at {}", transient.path().display());
    let written = transient
        .deliver_to_path(destination)
        .with_context(|| format!("exporting {format} report"))?;
    println!();
    println!("Report saved to: {}", written.display());
    Ok(())
}
