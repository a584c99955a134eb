//! CLI commands module.

mod check;
mod seed_cmd;

use anyhow::Result;
use clap::builder::RangedU64ValueParser;
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::error::{ConfigError, ErrorReport, WorkerError};
use crate::logging;

pub use check::cmd_check;
pub use seed_cmd::{cmd_seed, draw_in_workers};

#[derive(Parser)]
#[command(name = "simcore", version, about = "simcore — simulation seeds and value checks")]
struct Cli {
    /// Config file (default: ~/.simcore/config.json).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// On failure, also print a JSON error report to stderr (implied by `log.format = "json"`).
    #[arg(long, global = true)]
    json_errors: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print random seeds, one per line.
    Seed {
        /// Number of seeds to print.
        #[arg(short = 'n', long, value_parser = RangedU64ValueParser::<usize>::new().range(1..))]
        count: Option<usize>,

        /// Split the draws across this many worker processes (0 = in-process).
        #[arg(short, long)]
        workers: Option<usize>,

        /// Draw one seed in this process before starting workers.
        #[arg(long)]
        init_parent: bool,
    },

    /// Report whether each value can be interpreted as an integer.
    /// Values are read as JSON when they parse (`1.0`, `null`, `[]`), otherwise as text.
    Check {
        #[arg(required = true, allow_hyphen_values = true)]
        values: Vec<String>,
    },
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_path = cli.config.clone();
    let mut json_errors = cli.json_errors;

    let result = config::load_config(config_path.as_deref()).and_then(|cfg| {
        json_errors |= cfg.log.format.eq_ignore_ascii_case("json");
        logging::init_logging(&cfg)?;
        dispatch(cli.command, &cfg, config_path.as_deref())
    });

    if let Err(err) = &result {
        if json_errors {
            if let Some(json) = error_report(err, config_path.as_deref()).and_then(|r| r.to_json().ok()) {
                eprintln!("{}", json);
            }
        }
    }
    result
}

fn dispatch(command: Commands, cfg: &Config, config_path: Option<&Path>) -> Result<()> {
    match command {
        Commands::Seed { count, workers, init_parent } => {
            cmd_seed(cfg, config_path, count, workers, init_parent)
        }
        Commands::Check { values } => cmd_check(&values),
    }
}

/// Structured report for failures raised as `ConfigError` or `WorkerError`.
pub fn error_report(err: &anyhow::Error, config_path: Option<&Path>) -> Option<ErrorReport> {
    if let Some(e) = err.downcast_ref::<WorkerError>() {
        return Some(e.to_error_report());
    }
    let e = err.downcast_ref::<ConfigError>()?;
    let path = config_path.map(PathBuf::from).unwrap_or_else(config::config_path);
    let mut context = HashMap::new();
    context.insert("config".to_string(), path.display().to_string());
    Some(e.to_error_report(Some(context)))
}
