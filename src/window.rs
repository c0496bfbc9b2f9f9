//! Extraction of the intervals during which the sampled sun elevation lies
//! inside a band.
//!
//! The day is sampled at a fixed step from midnight up to the last instant
//! of the day. Each sample is classified as inside or outside the band and
//! fed to a two-state machine which records an entry on every
//! outside-to-inside change and an exit on every inside-to-outside change.
//! A day that ends inside the band is closed by an exit at the end of the
//! day, so every entry in the resulting [`CrossingSequence`] has a matching
//! exit. Crossings are reported at the sample where the change was first
//! observed; nothing is interpolated.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::calendar::day_bounds;
use crate::error::Result;
use crate::provider::ElevationProvider;
use crate::types::{Band, CrossingKind, CrossingSequence, GoldenHourResult, Location, Step};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowState {
    Outside,
    Inside,
}

struct WindowTracker {
    state: WindowState,
    sequence: CrossingSequence,
}

impl WindowTracker {
    fn new() -> Self {
        Self {
            state: WindowState::Outside,
            sequence: CrossingSequence::default(),
        }
    }

    fn observe(&mut self, instant: NaiveDateTime, inside: bool) {
        match (self.state, inside) {
            (WindowState::Outside, true) => self.enter_at(instant),
            (WindowState::Inside, false) => self.exit_at(instant),
            _ => {}
        }
    }

    fn enter_at(&mut self, instant: NaiveDateTime) {
        self.sequence.push(instant, CrossingKind::Enter);
        self.state = WindowState::Inside;
    }

    fn exit_at(&mut self, instant: NaiveDateTime) {
        self.sequence.push(instant, CrossingKind::Exit);
        self.state = WindowState::Outside;
    }

    fn end_of_domain(mut self, instant: NaiveDateTime) -> CrossingSequence {
        if self.state == WindowState::Inside {
            self.exit_at(instant);
        }
        self.sequence
    }
}

/// Sample instants covering `date`: midnight, then every `step` while the
/// instant still falls on the same day.
pub fn samples(date: NaiveDate, step: Step) -> impl Iterator<Item = NaiveDateTime> {
    let (start, end) = day_bounds(date);
    let delta = step.as_delta();
    std::iter::successors(Some(start), move |t| t.checked_add_signed(delta))
        .take_while(move |t| *t <= end)
}

/// Entry and exit instants of every window of `date` during which the sun
/// at `latitude` is inside `band`.
pub fn extract<P>(
    provider: &P,
    date: NaiveDate,
    latitude: f64,
    band: &Band,
    step: Step,
) -> Result<CrossingSequence>
where
    P: ElevationProvider + ?Sized,
{
    let location = Location::new(latitude)?;
    let (_, end_of_day) = day_bounds(date);

    let mut tracker = WindowTracker::new();
    for instant in samples(date, step) {
        let elevation = provider.elevation(&location, instant)?;
        tracker.observe(instant, band.contains(elevation));
    }
    Ok(tracker.end_of_domain(end_of_day))
}

/// Morning/evening view of a day's windows: the first interval is the
/// morning, the second the evening, anything further is only counted.
pub fn project(sequence: &CrossingSequence) -> GoldenHourResult {
    let intervals = sequence.intervals();
    GoldenHourResult {
        morning: intervals.first().copied(),
        evening: intervals.get(1).copied(),
        discarded: intervals.len().saturating_sub(2),
    }
}

/// [`extract`] followed by [`project`].
pub fn golden_hours<P>(
    provider: &P,
    date: NaiveDate,
    latitude: f64,
    band: &Band,
    step: Step,
) -> Result<GoldenHourResult>
where
    P: ElevationProvider + ?Sized,
{
    let result = project(&extract(provider, date, latitude, band, step)?);
    if result.discarded > 0 {
        debug!(
            %date,
            latitude,
            discarded = result.discarded,
            "more than two windows in one day; extra windows left out of the morning/evening view"
        );
    }
    Ok(result)
}
