//! Reader for `Date,Latitude` request tables.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::ReaderBuilder;
use tracing::{debug, warn};

use crate::calendar::parse_date;
use crate::error::{Error, Result};
use crate::types::Location;

/// One requested (date, latitude) pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatitudeDate {
    pub date: NaiveDate,
    pub latitude: f64,
}

/// Parse a decimal latitude, dropping a trailing degree sign (also in its
/// latin-1 mis-decoded `Â°` form).
pub fn parse_latitude(input: &str) -> Result<f64> {
    let cleaned = input.trim().trim_end_matches(['\u{00B0}', '\u{00C2}']).trim();
    let value: f64 = cleaned.parse().map_err(|_| Error::NotANumber {
        input: cleaned.to_string(),
    })?;
    Location::new(value).map(|loc| loc.latitude())
}

pub fn read_latitude_dates(path: &Path) -> Result<Vec<LatitudeDate>> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    read_latitude_dates_from(file, path)
}

/// Rows that fail to parse are logged and skipped; the remaining rows are
/// returned in file order. `source` only names the input in diagnostics.
pub fn read_latitude_dates_from<R: Read>(reader: R, source: &Path) -> Result<Vec<LatitudeDate>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for record in reader.records() {
        let record = match record {
            Ok(record) => record,
            Err(e) if e.is_io_error() => return Err(Error::csv(source, e)),
            Err(e) => {
                warn!(source = %source.display(), error = %e, "skipping unreadable row");
                skipped += 1;
                continue;
            }
        };
        let line = record.position().map_or(0, |p| p.line());
        match parse_row(&record) {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!(source = %source.display(), line, error = %e, "skipping malformed row");
                skipped += 1;
            }
        }
    }

    debug!(source = %source.display(), rows = rows.len(), skipped, "request table read");
    Ok(rows)
}

fn parse_row(record: &csv::StringRecord) -> Result<LatitudeDate> {
    let date = parse_date(record.get(0).unwrap_or_default())?;
    let latitude = parse_latitude(record.get(1).unwrap_or_default())?;
    Ok(LatitudeDate { date, latitude })
}
