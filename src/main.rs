// Ruling Harness - command line entry point

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use ruling_baseline::BaselineComparator;
use ruling_core::LogStreamRef;
use ruling_harness::services::diagnostics::{DiagnosticsCollector, LOGS_NUMBER_LINES};
use ruling_harness::{HarnessConfig, HarnessDriver, RunPlan};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "ruling-harness")]
#[command(about = "Golden-file regression runs for analyzer plugins")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the service, build the fixture project and compare against the baseline
    Run {
        /// TOML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the project key
        #[arg(long)]
        project_key: Option<String>,

        /// Override the project name (fixture directory)
        #[arg(long)]
        project_name: Option<String>,
    },

    /// Compare two artifact trees without a service
    Compare {
        /// Baseline tree
        expected: PathBuf,

        /// Produced tree
        actual: PathBuf,

        /// Project key used in the report
        #[arg(short, long, default_value = "project")]
        key: String,

        /// Write the differences file here
        #[arg(short, long)]
        out: Option<PathBuf>,
    },

    /// Print the tails of a service installation's log files
    DumpLogs {
        /// Service installation directory (containing logs/)
        home: PathBuf,

        /// Lines kept per log file
        #[arg(short, long, default_value_t = LOGS_NUMBER_LINES)]
        lines: usize,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run {
            config,
            project_key,
            project_name,
        } => cmd_run(config.as_deref(), project_key, project_name),
        Commands::Compare {
            expected,
            actual,
            key,
            out,
        } => cmd_compare(&expected, &actual, &key, out.as_deref()),
        Commands::DumpLogs { home, lines } => cmd_dump_logs(&home, lines),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::from(2)
        }
    }
}

fn cmd_run(
    config_path: Option<&Path>,
    project_key: Option<String>,
    project_name: Option<String>,
) -> anyhow::Result<bool> {
    let mut config = HarnessConfig::load(config_path)?;
    if let Some(key) = project_key {
        config.project.key = key;
    }
    if let Some(name) = project_name {
        config.project.name = name;
    }
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("invalid configuration: {}", e))?;

    let plan = RunPlan::from_config(&config)?;
    let mut driver = HarnessDriver::from_config(&config)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let report = runtime.block_on(driver.run(&plan));

    let states: Vec<String> = report.states.iter().map(|s| s.to_string()).collect();
    info!("[Driver] states: {}", states.join(" -> "));

    if let Some(differences) = &report.differences {
        if !differences.is_empty() {
            println!("{}", differences.render());
        }
    }
    match report.into_result() {
        Ok(()) => {
            info!("[Driver] ruling run passed");
            Ok(true)
        }
        Err(e) => {
            error!("[Driver] ruling run failed: {}", e);
            Ok(false)
        }
    }
}

fn cmd_compare(
    expected: &Path,
    actual: &Path,
    key: &str,
    out: Option<&Path>,
) -> anyhow::Result<bool> {
    let comparator = BaselineComparator::new();
    let report = match out {
        Some(path) => comparator.compare_and_persist(key, expected, actual, path)?,
        None => comparator.compare(key, expected, actual)?,
    };

    if report.is_empty() {
        println!("no differences for {}", key);
        return Ok(true);
    }
    print!("{}", report.render());
    println!("{}", report.summary());
    Ok(false)
}

fn cmd_dump_logs(home: &Path, lines: usize) -> anyhow::Result<bool> {
    let refs = LogStreamRef::standard_set(home);
    let dump = DiagnosticsCollector::new().with_max_lines(lines).dump(&refs);
    print!("{}", dump.render());
    for name in &dump.skipped {
        info!("[Diagnostics] {} not present", name);
    }
    Ok(dump.warnings.is_empty())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let log_json = std::env::var("RULING_LOG_JSON")
        .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false);
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}
