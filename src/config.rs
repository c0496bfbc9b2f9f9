//! Run settings.
//!
//! Settings are layered: built-in defaults, then an optional TOML file, then
//! `GOLDEN_HOUR_*` environment variables. Command-line flags are applied on
//! top by the binary.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::types::{Band, Step};

/// Latitudes of the default duration report, a run up the Norwegian coast
/// and back. Repeated entries are kept as separate columns.
pub const DEFAULT_LATITUDES: [f64; 17] = [
    59.91, 59.13, 59.97, 61.9, 63.25, 65.46, 66.74, 67.96, 69.49, 70.51, 70.2, 70.2, 68.55,
    65.32, 62.52, 60.99, 59.91,
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Lower elevation bound of the band, degrees
    pub band_min: f64,

    /// Upper elevation bound of the band, degrees
    pub band_max: f64,

    /// Sampling step in minutes
    pub step_minutes: f64,

    /// Share of the available cores given to the worker pool
    pub worker_fraction: f64,

    /// Directory reports are written to
    pub output_dir: PathBuf,

    /// Year covered by the duration report
    pub year: i32,

    /// Columns of the duration report
    pub latitudes: Vec<f64>,

    /// Number of days the due-east finder returns
    pub due_east_count: usize,

    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            band_min: Band::GOLDEN_HOUR.min(),
            band_max: Band::GOLDEN_HOUR.max(),
            step_minutes: 1.0,
            worker_fraction: 0.8,
            output_dir: PathBuf::from("data_output"),
            year: 2023,
            latitudes: DEFAULT_LATITUDES.to_vec(),
            due_east_count: 6,
            logging: LoggingSettings::default(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: String::from("info"),
            format: String::from("text"),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file; keys missing from the file keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Defaults, overlaid with `path` when given, overlaid with the environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env_with(|key| std::env::var(key).ok());
        Ok(settings)
    }

    /// Override fields from environment-style lookups. Unparsable values are ignored.
    pub fn apply_env_with<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("GOLDEN_HOUR_STEP_MINUTES").and_then(|v| v.parse().ok()) {
            self.step_minutes = v;
        }
        if let Some(v) = lookup("GOLDEN_HOUR_WORKER_FRACTION").and_then(|v| v.parse().ok()) {
            self.worker_fraction = v;
        }
        if let Some(v) = lookup("GOLDEN_HOUR_OUTPUT_DIR") {
            self.output_dir = PathBuf::from(v);
        }
        if let Some(v) = lookup("GOLDEN_HOUR_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = lookup("GOLDEN_HOUR_LOG_FORMAT") {
            self.logging.format = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.band()?;
        self.step()?;
        if !(self.worker_fraction > 0.0 && self.worker_fraction <= 1.0) {
            return Err(Error::InvalidWorkerFraction {
                value: self.worker_fraction,
            }
            .into());
        }
        if self.due_east_count == 0 {
            anyhow::bail!("due_east_count must be greater than 0");
        }
        Ok(())
    }

    pub fn band(&self) -> Result<Band, Error> {
        Band::new(self.band_min, self.band_max)
    }

    pub fn step(&self) -> Result<Step, Error> {
        Step::from_minutes(self.step_minutes)
    }
}
