use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

use crate::error::{Error, Result};

pub fn leap_year(year: i32) -> bool {
    (year % 400 == 0) || (year % 4 == 0 && year % 100 != 0)
}

pub fn days_in_months(year: i32) -> [u32; 12] {
    [
        31,
        if leap_year(year) { 29 } else { 28 },
        31, 30, 31, 30, 31, 31, 30, 31, 30, 31,
    ]
}

pub fn days_in_year(year: i32) -> u32 {
    days_in_months(year).iter().sum()
}

pub fn day_of_year(year: i32, month: u32, day: u32) -> i32 {
    let dim = days_in_months(year);
    let sum: u32 = dim[..(month - 1) as usize].iter().sum();
    (sum + day) as i32
}

/// Every date of `year`, 365 or 366 of them.
pub fn year_dates(year: i32) -> Vec<NaiveDate> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|first| first.iter_days().take(days_in_year(year) as usize).collect())
        .unwrap_or_default()
}

/// Inclusive range of dates. Fails when `end` precedes `start`.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
    if end < start {
        return Err(Error::InvalidDateRange { start, end });
    }
    Ok(start.iter_days().take_while(|d| *d <= end).collect())
}

pub fn parse_date(input: &str) -> Result<NaiveDate> {
    let trimmed = input.trim();
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| Error::InvalidDate {
        input: trimmed.to_string(),
    })
}

/// First and last representable instants of the day.
pub fn day_bounds(date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
    (date.and_time(NaiveTime::MIN), date.and_time(end_of_day_time()))
}

fn end_of_day_time() -> NaiveTime {
    NaiveTime::MIN
        .overflowing_sub_signed(TimeDelta::microseconds(1))
        .0
}

