//! Speedup evaluation binary
//!
//! Reads a tree of benchmark measurements and writes a comparison table and
//! charts into every scenario directory.

use anyhow::{anyhow, Context};
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use speedup_eval::{Config, EvalError, Evaluator, OutputFormat, Reporter};

/// Every scenario written, no file skipped
const EXIT_PASSED: u8 = 0;
/// Usage error, nothing to evaluate, or a fatal error
const EXIT_FATAL: u8 = 1;
/// The run finished but skipped files or failed scenarios
const EXIT_FAILURES: u8 = 2;

#[derive(Parser, Debug)]
#[command(name = "speedup-eval")]
#[command(
    version,
    about = "Compute speedup and efficiency tables from sorting benchmark measurements"
)]
struct Args {
    /// Root directory of the measurements
    dir: Option<PathBuf>,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Skip chart rendering
    #[arg(long)]
    no_charts: bool,

    /// Report format: console, json or json-pretty
    #[arg(short, long, default_value = "console")]
    format: String,

    /// Also write the run report as pretty JSON to this file
    #[arg(short, long)]
    report: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    // stdout carries the report, so logs go to stderr
    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let outcome = run(&args);
    if let Err(e) = &outcome {
        eprintln!("{}", error_message(e));
    }
    ExitCode::from(exit_status(&outcome))
}

/// Run the evaluation; `Ok(passed)` once a report exists.
fn run(args: &Args) -> anyhow::Result<bool> {
    let dir = args.dir.as_ref().ok_or_else(|| {
        anyhow!(
            "Missing measurement directory\n\n{}",
            Args::command().render_usage()
        )
    })?;
    let format: OutputFormat = args.format.parse()?;

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    if args.no_charts {
        config.output.charts = false;
    }

    tracing::info!("Starting speedup-eval v{}", env!("CARGO_PKG_VERSION"));
    let report = Evaluator::new(config).run(dir)?;

    Reporter::new(format).report(&report)?;
    if let Some(path) = &args.report {
        Reporter::new(OutputFormat::JsonPretty)
            .write_to_file(&report, path)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
    }

    Ok(report.passed)
}

fn exit_status(outcome: &anyhow::Result<bool>) -> u8 {
    match outcome {
        Ok(true) => EXIT_PASSED,
        Ok(false) => EXIT_FAILURES,
        Err(_) => EXIT_FATAL,
    }
}

fn error_message(error: &anyhow::Error) -> String {
    match error.downcast_ref::<EvalError>() {
        Some(EvalError::NoInputFiles { .. }) => "No output files found.".to_string(),
        _ => format!("Error: {:#}", error),
    }
}
