//! Total time per day spent inside a band, by direct accumulation over the
//! samples rather than by pairing crossings.

use chrono::{NaiveDate, TimeDelta};

use crate::calendar::day_bounds;
use crate::error::Result;
use crate::provider::ElevationProvider;
use crate::types::{micros_of, Band, DailyDuration, Location, Step};
use crate::window::samples;

/// Each inside sample contributes one step. The last sample of the day only
/// contributes the time left until midnight, so the total stays within 24
/// hours when the step does not divide the day evenly.
pub fn accumulate<P>(
    provider: &P,
    date: NaiveDate,
    latitude: f64,
    band: &Band,
    step: Step,
) -> Result<DailyDuration>
where
    P: ElevationProvider + ?Sized,
{
    let location = Location::new(latitude)?;
    let (start, end) = day_bounds(date);
    let day_micros = micros_of(end - start) + 1;
    let step_micros = micros_of(step.as_delta());

    let mut inside_micros: i64 = 0;
    for instant in samples(date, step) {
        if band.contains(provider.elevation(&location, instant)?) {
            let remaining = day_micros - micros_of(instant - start);
            inside_micros += step_micros.min(remaining);
        }
    }

    Ok(DailyDuration {
        date,
        latitude,
        inside: TimeDelta::microseconds(inside_micros),
    })
}
