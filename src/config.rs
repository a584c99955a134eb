use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, ConfigResult};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];
const LOG_FORMATS: &[&str] = &["text", "compact", "pretty", "json"];
const TIMESTAMP_FORMATS: &[&str] = &["local", "utc", "rfc3339"];

// ---------------------------------------------------------------------------
// Log config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogConfig {
    #[serde(default = "default_level")]
    pub level: String,
    #[serde(default = "default_format")]
    pub format: String,
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
    #[serde(default)]
    pub show_target: bool,
    /// Also write a daily rolling log file under `dir`.
    #[serde(default)]
    pub file: bool,
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

fn default_level() -> String {
    "warn".into()
}
fn default_format() -> String {
    "text".into()
}
fn default_timestamp_format() -> String {
    "local".into()
}
fn default_log_dir() -> String {
    "~/.simcore/logs".into()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            format: default_format(),
            timestamp_format: default_timestamp_format(),
            show_target: false,
            file: false,
            dir: default_log_dir(),
        }
    }
}

// ---------------------------------------------------------------------------
// Seed command defaults
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedConfig {
    /// Seeds printed by `simcore seed` when `--count` is not given.
    #[serde(default = "default_count")]
    pub count: usize,
    /// Worker processes used when `--workers` is not given; 0 draws in-process.
    #[serde(default)]
    pub workers: usize,
}

fn default_count() -> usize {
    1
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            count: default_count(),
            workers: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Root config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub seed: SeedConfig,
}

impl Config {
    /// Reject values the logging layer would not understand.
    pub fn validate(&self) -> ConfigResult<()> {
        check_one_of("log.level", &self.log.level, LOG_LEVELS)?;
        check_one_of("log.format", &self.log.format, LOG_FORMATS)?;
        check_one_of("log.timestampFormat", &self.log.timestamp_format, TIMESTAMP_FORMATS)?;
        if self.seed.count == 0 {
            return Err(ConfigError::InvalidValue(
                "seed.count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> ConfigResult<()> {
    if allowed.contains(&value.to_lowercase().as_str()) {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue(format!(
            "{}: '{}' (expected one of {})",
            field,
            value,
            allowed.join(", ")
        )))
    }
}

// ---------------------------------------------------------------------------
// Paths & loading
// ---------------------------------------------------------------------------

pub fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".simcore")
}

pub fn config_path() -> PathBuf {
    config_dir().join("config.json")
}

pub fn log_dir_path(cfg: &Config) -> PathBuf {
    expand_home(&cfg.log.dir)
}

fn expand_home(raw: &str) -> PathBuf {
    if raw.starts_with('~') {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(raw.trim_start_matches('~').trim_start_matches('/'))
    } else {
        PathBuf::from(raw)
    }
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if p.exists() {
        let text = std::fs::read_to_string(&p)
            .map_err(ConfigError::from)
            .with_context(|| format!("reading config from {}", p.display()))?;
        let cfg: Config = serde_json::from_str(&text)
            .map_err(ConfigError::from)
            .with_context(|| format!("parsing config from {}", p.display()))?;
        cfg.validate()
            .with_context(|| format!("validating config from {}", p.display()))?;
        Ok(cfg)
    } else {
        Ok(Config::default())
    }
}

pub fn save_config(cfg: &Config, path: Option<&Path>) -> Result<()> {
    let p = path.map(PathBuf::from).unwrap_or_else(config_path);

    if let Some(parent) = p.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(cfg)?;
    std::fs::write(&p, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.log.level, "warn");
        assert_eq!(cfg.seed.count, 1);
        assert_eq!(cfg.seed.workers, 0);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let cfg = load_config(Some(&dir.path().join("absent.json"))).unwrap();
        assert_eq!(cfg.log.format, "text");
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"log": {"level": "debug", "showTarget": true}}"#).unwrap();

        let cfg = load_config(Some(&path)).unwrap();
        assert_eq!(cfg.log.level, "debug");
        assert!(cfg.log.show_target);
        assert_eq!(cfg.log.timestamp_format, "local");
        assert_eq!(cfg.seed.count, 1);
    }

    #[test]
    fn test_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("parsing config"));
        assert!(matches!(err.downcast_ref::<ConfigError>(), Some(ConfigError::Json(_))));
    }

    #[test]
    fn test_invalid_level_is_rejected() {
        let mut cfg = Config::default();
        cfg.log.level = "loud".to_string();
        let err = cfg.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(ref msg) if msg.contains("log.level")));
    }

    #[test]
    fn test_zero_count_is_rejected() {
        let mut cfg = Config::default();
        cfg.seed.count = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut cfg = Config::default();
        cfg.log.format = "json".to_string();
        cfg.seed.workers = 4;

        save_config(&cfg, Some(&path)).unwrap();
        let loaded = load_config(Some(&path)).unwrap();
        assert_eq!(loaded.log.format, "json");
        assert_eq!(loaded.seed.workers, 4);
    }

    #[test]
    fn test_relative_log_dir_is_kept() {
        let mut cfg = Config::default();
        cfg.log.dir = "logs/sim".to_string();
        assert_eq!(log_dir_path(&cfg), PathBuf::from("logs/sim"));
    }
}
