//! Error types for golden-hour computations and reports.

use std::path::PathBuf;

use chrono::{NaiveDate, NaiveDateTime};
use thiserror::Error;

/// Result type alias for operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the extractor, the accumulator, the batch runner and the
/// table readers/writers.
#[derive(Debug, Error)]
pub enum Error {
    /// Latitude outside [-90, 90] or not a number.
    #[error("invalid latitude {value}° (must be between -90° and +90°)")]
    InvalidLatitude { value: f64 },

    /// Band bounds that are not finite or are out of order.
    #[error("invalid elevation band [{min}, {max}] (bounds must be finite and min <= max)")]
    InvalidBand { min: f64, max: f64 },

    /// Sampling step that is not a positive number of minutes.
    #[error("invalid sampling step {minutes} minutes (must be positive)")]
    InvalidStep { minutes: f64 },

    #[error("{input:?} is not a number")]
    NotANumber { input: String },

    #[error("invalid date {input:?} (expected YYYY-MM-DD)")]
    InvalidDate { input: String },

    #[error("end date {end} is before start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("invalid worker fraction {value} (must be in (0, 1])")]
    InvalidWorkerFraction { value: f64 },

    /// The elevation provider could not produce a position.
    #[error("solar position unavailable at latitude {latitude}° for {instant}: {reason}")]
    Provider {
        latitude: f64,
        instant: NaiveDateTime,
        reason: String,
    },

    #[error("worker pool could not be started: {reason}")]
    WorkerPool { reason: String },

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

impl Error {
    /// True for errors caused by user-supplied values, which callers recover
    /// from at the input boundary by re-prompting or skipping the row.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidLatitude { .. }
                | Self::NotANumber { .. }
                | Self::InvalidBand { .. }
                | Self::InvalidStep { .. }
                | Self::InvalidDate { .. }
                | Self::InvalidDateRange { .. }
                | Self::InvalidWorkerFraction { .. }
        )
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::Csv {
            path: path.into(),
            source,
        }
    }
}
