use std::error::Error;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reaper::config::ReaperConfig;
use reaper::seed;
use reaper::sweep::{self, OsRemover, SweepOptions, SweepOutcome};

/// CLI arguments for the reaper.
#[derive(Parser, Debug)]
#[command(version, about = "Retires aged, date-addressed storage directories", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to config file (defaults to reaper.toml in the working directory)
    #[arg(short, long, global = true)]
    config: Option<String>,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Walk the storage tree once, removing expired directories (default)
    Sweep {
        /// Log expired directories instead of deleting them
        #[arg(long)]
        dry_run: bool,
    },
    /// Populate the storage tree with synthetic dated directories
    Seed,
    /// Write a commented default configuration file
    Init {
        /// Output file (defaults to reaper.toml)
        #[arg(short, long)]
        output: Option<String>,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "reaper failed");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let command = args.command.unwrap_or(Command::Sweep { dry_run: false });

    if let Command::Init { output, force } = &command {
        return write_default_config(output.as_deref(), *force);
    }

    let config_path = resolve_config_path(args.config.as_deref())?;
    let config = ReaperConfig::from_file(&config_path)?;

    match command {
        Command::Sweep { dry_run } => run_sweep(&config, dry_run),
        Command::Seed => run_seed(&config),
        Command::Init { .. } => unreachable!("handled above"),
    }
}

fn run_sweep(config: &ReaperConfig, dry_run_flag: bool) -> Result<(), Box<dyn Error>> {
    let options = SweepOptions {
        storage_root: config.storage.normalized_root().to_string(),
        timeout: config.sweep.timeout(),
        dry_run: dry_run_flag || config.sweep.dry_run,
    };
    let table = config.retention.table();

    let report = sweep::sweep(&options, &table, Utc::now(), &mut OsRemover)?;
    match report.outcome {
        SweepOutcome::Completed => tracing::info!(
            visited = report.visited,
            kept = report.kept,
            removed = report.removed,
            would_remove = report.would_remove,
            "sweep complete"
        ),
        SweepOutcome::DeadlineExpired => tracing::warn!(
            visited = report.visited,
            kept = report.kept,
            removed = report.removed,
            would_remove = report.would_remove,
            "sweep timed out; remaining directories are left for the next run"
        ),
    }

    Ok(())
}

fn run_seed(config: &ReaperConfig) -> Result<(), Box<dyn Error>> {
    if config.seed.devices.is_empty() {
        return Err("no [[seed.devices]] configured".into());
    }

    let report = seed::seed(Path::new(config.storage.normalized_root()), &config.seed)?;
    tracing::info!(
        root = %config.storage.root,
        dirs = report.dirs_created,
        files = report.files_created,
        "seeding complete"
    );

    Ok(())
}

/// Resolve the config path: an explicit path must exist; otherwise fall back
/// to `reaper.toml` in the working directory.
fn resolve_config_path(explicit: Option<&str>) -> Result<PathBuf, String> {
    if let Some(path) = explicit {
        let path = PathBuf::from(path);
        if !path.exists() {
            return Err(format!("config file not found: {}", path.display()));
        }
        return Ok(path);
    }

    let cwd_config = PathBuf::from("reaper.toml");
    if cwd_config.exists() {
        return Ok(cwd_config);
    }

    Err("no config file found; pass --config or create reaper.toml (see `reaper init`)".into())
}

fn write_default_config(output: Option<&str>, force: bool) -> Result<(), Box<dyn Error>> {
    let path = PathBuf::from(output.unwrap_or("reaper.toml"));
    if path.exists() && !force {
        return Err(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )
        .into());
    }

    std::fs::write(&path, default_config_toml())?;
    tracing::info!(path = %path.display(), "wrote default config");

    Ok(())
}

/// Commented starter configuration written by `reaper init`.
fn default_config_toml() -> &'static str {
    r#"# Reaper configuration

[storage]
# Base path all tenant data lives under.
root = "/var/tmp/reaper"

[sweep]
# Wall-clock budget for one walk, in seconds. A timed-out walk ends cleanly
# and leaves the rest for the next scheduled run.
timeout_secs = 1
# Log expired directories instead of deleting them.
dry_run = false

[retention]
# Days to keep dated directories for tenants without their own period.
default_days = 90

[retention.tenants]
# Per-tenant retention periods, in days.
# 1289 = 30

[seed]
# Synthetic data layout for `reaper seed`.
dirs_per_device = 100
files_per_dir = 50
span_days = 30

# [[seed.devices]]
# tenant = 1289
# number = 2466
# name = "j1_readnews_com"
"#
}
