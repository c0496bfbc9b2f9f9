//! Interactive date-range prompt and the console form of a day's windows.

use std::io::{self, BufRead, Write};

use chrono::NaiveDate;

use crate::calendar::parse_date;
use crate::error::Error;
use crate::input::parse_latitude;
use crate::types::{GoldenHourResult, Interval};

pub const INVALID_DATE_MESSAGE: &str = "Invalid date format. Please use YYYY-MM-DD";
pub const DATE_ORDER_MESSAGE: &str = "End date must be after start date";
pub const LATITUDE_RANGE_MESSAGE: &str = "Latitude must be between -90 and 90 degrees";
pub const LATITUDE_NUMBER_MESSAGE: &str = "Latitude must be a number";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeRequest {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub latitude: f64,
}

fn ask<R: BufRead, W: Write>(input: &mut R, output: &mut W, question: &str) -> io::Result<String> {
    write!(output, "{question}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "input closed before all answers were given",
        ));
    }
    Ok(line.trim().to_string())
}

/// Ask for a start date, an end date and a latitude until each answer is
/// valid. A bad date or an end before the start asks for both dates again.
pub fn prompt_range<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<RangeRequest> {
    let (start, end) = loop {
        let Ok(start) = parse_date(&ask(input, output, "Enter start date  (YYYY-MM-DD): ")?) else {
            writeln!(output, "{INVALID_DATE_MESSAGE}")?;
            continue;
        };
        let Ok(end) = parse_date(&ask(input, output, "Enter end date    (YYYY-MM-DD): ")?) else {
            writeln!(output, "{INVALID_DATE_MESSAGE}")?;
            continue;
        };
        if end < start {
            writeln!(output, "{DATE_ORDER_MESSAGE}")?;
            continue;
        }
        break (start, end);
    };

    let latitude = loop {
        let answer = ask(input, output, "Enter latitude in degrees (47.3456): ")?;
        match parse_latitude(&answer) {
            Ok(latitude) => break latitude,
            Err(Error::NotANumber { .. }) => writeln!(output, "{LATITUDE_NUMBER_MESSAGE}\n")?,
            Err(_) => writeln!(output, "{LATITUDE_RANGE_MESSAGE}\n")?,
        }
    };

    Ok(RangeRequest {
        start,
        end,
        latitude,
    })
}

fn twelve_hour(interval: &Interval) -> String {
    format!(
        "{} to {}",
        interval.start.format("%-I:%M %p"),
        interval.end.format("%-I:%M %p")
    )
}

/// `YYYY-MM-DD: 5:12 AM to 6:20 AM; 7:40 PM to 8:49 PM`, with
/// `No morning golden hour` / `No evening golden hour` for missing windows.
pub fn format_day(date: NaiveDate, result: &GoldenHourResult) -> String {
    let morning = result
        .morning
        .as_ref()
        .map_or_else(|| String::from("No morning golden hour"), twelve_hour);
    let evening = result
        .evening
        .as_ref()
        .map_or_else(|| String::from("No evening golden hour"), twelve_hour);
    format!("{}: {morning}; {evening}", date.format("%Y-%m-%d"))
}
