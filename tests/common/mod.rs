#![allow(dead_code, unused_macros, unused_imports)]

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use golden_hour::{ElevationProvider, Error, Location, Result, SunAngles};

macro_rules! assert_approx {
    ($left:expr, $right:expr, $tol:expr) => {
        let (l, r) = ($left as f64, $right as f64);
        assert!(
            (l - r).abs() <= $tol,
            "assert_approx failed: left={}, right={}, diff={}, tol={}",
            l, r, (l - r).abs(), $tol
        );
    };
}
pub(crate) use assert_approx;

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(date: NaiveDate, hour: u32, minute: u32) -> NaiveDateTime {
    date.and_hms_opt(hour, minute, 0).unwrap()
}

pub fn end_of(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::from_hms_micro_opt(23, 59, 59, 999_999).unwrap())
}

fn minutes_of_day(instant: NaiveDateTime) -> f64 {
    let midnight = instant.date().and_time(NaiveTime::MIN);
    (instant - midnight).num_microseconds().unwrap() as f64 / 60_000_000.0
}

/// Elevation as a function of minutes since midnight, ignoring latitude.
pub struct Profile<F>(pub F);

impl<F> ElevationProvider for Profile<F>
where
    F: Fn(f64) -> f64 + Send + Sync,
{
    fn angles(&self, _location: &Location, instant: NaiveDateTime) -> Result<SunAngles> {
        Ok(SunAngles {
            elevation: (self.0)(minutes_of_day(instant)),
            azimuth: 0.0,
        })
    }
}

/// Wraps a provider and counts the calls made to it.
pub struct Counting<P> {
    pub inner: P,
    pub calls: AtomicUsize,
}

impl<P> Counting<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl<P: ElevationProvider> ElevationProvider for Counting<P> {
    fn angles(&self, location: &Location, instant: NaiveDateTime) -> Result<SunAngles> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.angles(location, instant)
    }
}

/// Fails for one latitude, otherwise reports the sun far below the horizon.
pub struct FailsAt(pub f64);

impl ElevationProvider for FailsAt {
    fn angles(&self, location: &Location, instant: NaiveDateTime) -> Result<SunAngles> {
        if location.latitude() == self.0 {
            return Err(Error::Provider {
                latitude: location.latitude(),
                instant,
                reason: String::from("degenerate location"),
            });
        }
        Ok(SunAngles {
            elevation: -50.0,
            azimuth: 0.0,
        })
    }
}
