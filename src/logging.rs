//! Logging initialization and configuration.

use anyhow::Result;
use std::io::IsTerminal;
use tracing_subscriber::fmt::format::Writer;
use tracing_subscriber::fmt::time::{ChronoLocal, ChronoUtc, FormatTime};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracing_subscriber::{Layer, Registry};

use crate::config::{log_dir_path, Config, LogConfig};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Timestamp styles selectable through `log.timestampFormat`.
enum Timestamp {
    Local(ChronoLocal),
    Utc(ChronoUtc),
}

impl Timestamp {
    fn from_config(timestamp_format: &str) -> Self {
        match timestamp_format.to_lowercase().as_str() {
            "rfc3339" => Timestamp::Utc(ChronoUtc::rfc_3339()),
            "utc" => Timestamp::Utc(ChronoUtc::new("%Y-%m-%d %H:%M:%S%.3f".to_string())),
            _ => Timestamp::Local(ChronoLocal::new("%Y-%m-%d %H:%M:%S%.3f".to_string())),
        }
    }
}

impl FormatTime for Timestamp {
    fn format_time(&self, w: &mut Writer<'_>) -> std::fmt::Result {
        match self {
            Timestamp::Local(t) => t.format_time(w),
            Timestamp::Utc(t) => t.format_time(w),
        }
    }
}

/// Initialize the logging system based on configuration.
///
/// Console output goes to stderr; stdout is reserved for command output.
/// `RUST_LOG` takes precedence over `log.level`.
pub fn init_logging(cfg: &Config) -> Result<()> {
    let level = parse_log_level(&cfg.log.level)?;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("simcore={}", level)));

    let mut layers: Vec<BoxedLayer> = vec![build_layer(
        &cfg.log,
        std::io::stderr,
        std::io::stderr().is_terminal(),
    )];

    if cfg.log.file {
        let log_dir = log_dir_path(cfg);
        std::fs::create_dir_all(&log_dir)?;

        // File name: simcore.yyyy-MM-dd.log or simcore.yyyy-MM-dd.json
        let log_file_suffix = match cfg.log.format.to_lowercase().as_str() {
            "json" => "json",
            _ => "log",
        };
        let file_appender = tracing_appender::rolling::RollingFileAppender::builder()
            .rotation(tracing_appender::rolling::Rotation::DAILY)
            .filename_prefix("simcore")
            .filename_suffix(log_file_suffix)
            .build(&log_dir)
            .map_err(|e| anyhow::anyhow!("Failed to create rolling file appender: {}", e))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        layers.push(build_layer(&cfg.log, non_blocking, false));

        // Keep the writer thread alive for the life of the process
        std::mem::forget(guard);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter)
        .try_init()?;

    tracing::debug!(
        level = %cfg.log.level,
        format = %cfg.log.format,
        timestamp_format = %cfg.log.timestamp_format,
        file = cfg.log.file,
        "Logging initialized"
    );

    Ok(())
}

fn build_layer<W>(log: &LogConfig, writer: W, ansi: bool) -> BoxedLayer
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(writer)
        .with_ansi(ansi)
        .with_timer(Timestamp::from_config(&log.timestamp_format))
        .with_target(log.show_target);

    match log.format.to_lowercase().as_str() {
        "json" => layer.json().boxed(),
        "compact" => layer.compact().boxed(),
        "pretty" => layer.pretty().boxed(),
        _ => layer.boxed(),
    }
}

fn parse_log_level(level_str: &str) -> Result<&'static str> {
    match level_str.to_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" => Ok("warn"),
        "error" => Ok("error"),
        _ => anyhow::bail!("Invalid log level: {}", level_str),
    }
}
