//! Days of the year on which the sun rises closest to due east (or sets
//! closest to due west).

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::{day_bounds, year_dates};
use crate::error::Result;
use crate::provider::ElevationProvider;
use crate::types::{Band, CrossingKind, Location, Step};
use crate::window::extract;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HorizonEvent {
    Sunrise,
    Sunset,
}

impl HorizonEvent {
    /// Azimuth of the ideal event: due east for sunrise, due west for sunset.
    pub fn target_azimuth(&self) -> f64 {
        match self {
            Self::Sunrise => 90.0,
            Self::Sunset => 270.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DueEastDay {
    pub date: NaiveDate,
    pub instant: NaiveDateTime,
    pub azimuth: f64,
    /// Absolute distance from the target azimuth, degrees.
    pub deviation: f64,
}

/// Heap entry ordered by deviation, then date, so the heap top is the worst
/// day kept so far.
struct Candidate(DueEastDay);

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .deviation
            .total_cmp(&other.0.deviation)
            .then(self.0.date.cmp(&other.0.date))
    }
}

/// Instant of the day's sunrise or sunset at sampling resolution. `None`
/// when the sun does not cross the horizon that day.
pub fn horizon_event<P>(
    provider: &P,
    date: NaiveDate,
    latitude: f64,
    event: HorizonEvent,
    step: Step,
) -> Result<Option<NaiveDateTime>>
where
    P: ElevationProvider + ?Sized,
{
    let sequence = extract(provider, date, latitude, &Band::ABOVE_HORIZON, step)?;
    let (start, end) = day_bounds(date);
    let mut crossings = sequence.crossings().iter();
    let found = match event {
        HorizonEvent::Sunrise => crossings
            .find(|c| c.kind == CrossingKind::Enter && c.instant != start)
            .map(|c| c.instant),
        HorizonEvent::Sunset => crossings
            .rev()
            .find(|c| c.kind == CrossingKind::Exit && c.instant != end)
            .map(|c| c.instant),
    };
    Ok(found)
}

/// The `count` days of `year` whose sunrise (or sunset) azimuth is closest
/// to the event's target, best first. Days without the event are skipped.
pub fn find_due_east<P>(
    provider: &P,
    latitude: f64,
    year: i32,
    count: usize,
    event: HorizonEvent,
    step: Step,
) -> Result<Vec<DueEastDay>>
where
    P: ElevationProvider + ?Sized,
{
    let location = Location::new(latitude)?;
    if count == 0 {
        return Ok(Vec::new());
    }

    let target = event.target_azimuth();
    let mut heap: BinaryHeap<Candidate> = BinaryHeap::with_capacity(count + 1);
    let mut skipped = 0usize;

    for date in year_dates(year) {
        let Some(instant) = horizon_event(provider, date, latitude, event, step)? else {
            skipped += 1;
            continue;
        };
        let azimuth = provider.azimuth(&location, instant)?;
        heap.push(Candidate(DueEastDay {
            date,
            instant,
            azimuth,
            deviation: (azimuth - target).abs(),
        }));
        if heap.len() > count {
            heap.pop();
        }
    }

    debug!(latitude, year, skipped, "horizon scan finished");
    Ok(heap.into_sorted_vec().into_iter().map(|c| c.0).collect())
}
