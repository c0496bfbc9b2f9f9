//! Tabular reports and their CSV form.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use tracing::info;

use crate::error::{Error, Result};
use crate::types::{micros_of, GoldenHourResult, Interval};

pub const DURATION_REPORT_PREFIX: &str = "GH_duration_fullyear";
pub const INTERVAL_REPORT_PREFIX: &str = "golden_hour_by_day";

pub const INTERVAL_HEADER: [&str; 6] = [
    "Date",
    "Latitude",
    "Morning Start",
    "Morning End",
    "Evening Start",
    "Evening End",
];

#[derive(Debug, Clone, PartialEq)]
pub struct DurationRow {
    pub date: NaiveDate,
    /// One cell per report column, in column order.
    pub cells: Vec<TimeDelta>,
}

/// Time inside the band per date (rows) and latitude (columns).
#[derive(Debug, Clone, PartialEq)]
pub struct DurationReport {
    pub latitudes: Vec<f64>,
    pub rows: Vec<DurationRow>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntervalRow {
    pub date: NaiveDate,
    pub latitude: f64,
    pub result: GoldenHourResult,
}

/// Morning and evening windows per requested (date, latitude).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntervalReport {
    pub rows: Vec<IntervalRow>,
}

pub fn latitude_label(latitude: f64) -> String {
    format!("{latitude}\u{00B0}")
}

/// Decimal hours rounded to two places.
pub fn rounded_hours(delta: TimeDelta) -> f64 {
    let hours = micros_of(delta) as f64 / 3_600_000_000.0;
    (hours * 100.0).round() / 100.0
}

fn clock(instant: Option<NaiveDateTime>) -> String {
    instant
        .map(|t| t.format("%H:%M").to_string())
        .unwrap_or_default()
}

fn interval_cells(interval: Option<Interval>) -> [String; 2] {
    [
        clock(interval.map(|i| i.start)),
        clock(interval.map(|i| i.end)),
    ]
}

impl DurationReport {
    pub fn header(&self) -> Vec<String> {
        std::iter::once(String::from("Date"))
            .chain(self.latitudes.iter().map(|lat| latitude_label(*lat)))
            .collect()
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(self.header())?;
        for row in &self.rows {
            let record = std::iter::once(row.date.format("%Y-%m-%d").to_string())
                .chain(row.cells.iter().map(|d| rounded_hours(*d).to_string()));
            csv.write_record(record)?;
        }
        csv.flush()?;
        Ok(())
    }
}

impl IntervalReport {
    pub fn write_csv<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(INTERVAL_HEADER)?;
        for row in &self.rows {
            let [morning_start, morning_end] = interval_cells(row.result.morning);
            let [evening_start, evening_end] = interval_cells(row.result.evening);
            csv.write_record([
                row.date.format("%Y-%m-%d").to_string(),
                row.latitude.to_string(),
                morning_start,
                morning_end,
                evening_start,
                evening_end,
            ])?;
        }
        csv.flush()?;
        Ok(())
    }
}

/// `<prefix>_<YYYYmmddHHMMSS>.csv`
pub fn timestamped_name(prefix: &str, generated_at: NaiveDateTime) -> String {
    format!("{prefix}_{}.csv", generated_at.format("%Y%m%d%H%M%S"))
}

/// Writes reports into one directory under timestamped names. A file only
/// appears under its final name once it has been written completely.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn write_durations(
        &self,
        report: &DurationReport,
        generated_at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(timestamped_name(DURATION_REPORT_PREFIX, generated_at));
        self.write_atomic(&path, |file| report.write_csv(file))?;
        info!(path = %path.display(), rows = report.rows.len(), "duration report written");
        Ok(path)
    }

    pub fn write_intervals(
        &self,
        report: &IntervalReport,
        generated_at: NaiveDateTime,
    ) -> Result<PathBuf> {
        let path = self
            .output_dir
            .join(timestamped_name(INTERVAL_REPORT_PREFIX, generated_at));
        self.write_atomic(&path, |file| report.write_csv(file))?;
        info!(path = %path.display(), rows = report.rows.len(), "interval report written");
        Ok(path)
    }

    fn write_atomic<F>(&self, path: &Path, write: F) -> Result<()>
    where
        F: FnOnce(&mut File) -> csv::Result<()>,
    {
        fs::create_dir_all(&self.output_dir).map_err(|e| Error::io(&self.output_dir, e))?;

        let partial = path.with_extension("csv.partial");
        let mut file = File::create(&partial).map_err(|e| Error::io(&partial, e))?;
        let written = write(&mut file)
            .map_err(|e| Error::csv(path, e))
            .and_then(|()| file.sync_all().map_err(|e| Error::io(&partial, e)));
        drop(file);

        let renamed =
            written.and_then(|()| fs::rename(&partial, path).map_err(|e| Error::io(path, e)));
        if renamed.is_err() {
            let _ = fs::remove_file(&partial);
        }
        renamed
    }
}
