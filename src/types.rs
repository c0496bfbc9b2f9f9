use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

use crate::error::{Error, Result};

/// A point on the ground. Longitude is fixed at the prime meridian, so clock
/// times are mean solar times at longitude 0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
}

impl Location {
    pub fn new(latitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(Error::InvalidLatitude { value: latitude });
        }
        Ok(Self { latitude })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        0.0
    }
}

/// Closed elevation range in degrees. Both bounds are inside the band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Band {
    min: f64,
    max: f64,
}

impl Band {
    /// Photographer's golden hour, 4° below to 6° above the horizon.
    pub const GOLDEN_HOUR: Band = Band { min: -4.0, max: 6.0 };
    pub const TWILIGHT: Band = Band { min: -6.0, max: 6.0 };
    /// Sun at or above the geometric horizon.
    pub const ABOVE_HORIZON: Band = Band { min: 0.0, max: 90.0 };

    pub fn new(min: f64, max: f64) -> Result<Self> {
        if !min.is_finite() || !max.is_finite() || min > max {
            return Err(Error::InvalidBand { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn contains(&self, elevation: f64) -> bool {
        self.min <= elevation && elevation <= self.max
    }
}

impl Default for Band {
    fn default() -> Self {
        Self::GOLDEN_HOUR
    }
}

/// Sampling resolution, stored with microsecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Step(TimeDelta);

impl Step {
    pub fn from_minutes(minutes: f64) -> Result<Self> {
        let micros = (minutes * 60_000_000.0).round();
        if !minutes.is_finite() || micros < 1.0 {
            return Err(Error::InvalidStep { minutes });
        }
        Ok(Self(TimeDelta::microseconds(micros as i64)))
    }

    pub fn as_delta(&self) -> TimeDelta {
        self.0
    }

    pub fn minutes(&self) -> f64 {
        micros_of(self.0) as f64 / 60_000_000.0
    }
}

impl Default for Step {
    fn default() -> Self {
        Self(TimeDelta::microseconds(60_000_000))
    }
}

pub(crate) fn micros_of(delta: TimeDelta) -> i64 {
    delta.num_microseconds().unwrap_or(i64::MAX)
}

/// Full output of the bundled solar model for one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarPosition {
    pub day_of_year: i32,
    pub declination: f64,
    pub equation_of_time: f64,
    pub local_solar_time: f64,
    pub hour_angle: f64,
    pub zenith: f64,
    pub altitude: f64,
    pub azimuth: f64,
}

/// The two angles consumers of an [`ElevationProvider`](crate::ElevationProvider) need.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunAngles {
    /// Degrees above (+) or below (-) the horizon.
    pub elevation: f64,
    /// Degrees clockwise from north.
    pub azimuth: f64,
}

impl From<SolarPosition> for SunAngles {
    fn from(pos: SolarPosition) -> Self {
        Self {
            elevation: pos.altitude,
            azimuth: pos.azimuth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossingKind {
    Enter,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub instant: NaiveDateTime,
    pub kind: CrossingKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Interval {
    pub fn length(&self) -> TimeDelta {
        self.end - self.start
    }
}

/// Band entries and exits for one day, alternating and starting with
/// [`CrossingKind::Enter`]. Every entry is paired with an exit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrossingSequence {
    crossings: Vec<Crossing>,
}

impl CrossingSequence {
    pub(crate) fn push(&mut self, instant: NaiveDateTime, kind: CrossingKind) {
        self.crossings.push(Crossing { instant, kind });
    }

    pub fn crossings(&self) -> &[Crossing] {
        &self.crossings
    }

    pub fn len(&self) -> usize {
        self.crossings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crossings.is_empty()
    }

    pub fn instants(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.crossings.iter().map(|c| c.instant)
    }

    /// Every inside-band interval of the day, in time order.
    pub fn intervals(&self) -> Vec<Interval> {
        self.crossings
            .chunks_exact(2)
            .map(|pair| Interval {
                start: pair[0].instant,
                end: pair[1].instant,
            })
            .collect()
    }
}

/// Two-slot view of a day's windows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoldenHourResult {
    pub morning: Option<Interval>,
    pub evening: Option<Interval>,
    /// Intervals beyond the second one, which this view does not carry.
    pub discarded: usize,
}

/// Total time one latitude spent inside the band on one date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DailyDuration {
    pub date: NaiveDate,
    pub latitude: f64,
    pub inside: TimeDelta,
}

impl DailyDuration {
    pub fn minutes(&self) -> f64 {
        micros_of(self.inside) as f64 / 60_000_000.0
    }

    pub fn hours(&self) -> f64 {
        micros_of(self.inside) as f64 / 3_600_000_000.0
    }
}
