use chrono::NaiveDateTime;

use crate::angles;
use crate::error::{Error, Result};
use crate::types::{Location, SunAngles};

/// Source of sun angles for a location and instant.
///
/// Implementations must be pure: the batch runner calls them from many worker
/// threads at once and expects identical answers for identical inputs.
pub trait ElevationProvider: Send + Sync {
    fn angles(&self, location: &Location, instant: NaiveDateTime) -> Result<SunAngles>;

    fn elevation(&self, location: &Location, instant: NaiveDateTime) -> Result<f64> {
        Ok(self.angles(location, instant)?.elevation)
    }

    fn azimuth(&self, location: &Location, instant: NaiveDateTime) -> Result<f64> {
        Ok(self.angles(location, instant)?.azimuth)
    }
}

/// Provider backed by the geometry in [`angles`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SimpleSolarModel;

impl ElevationProvider for SimpleSolarModel {
    fn angles(&self, location: &Location, instant: NaiveDateTime) -> Result<SunAngles> {
        let pos = angles::solar_position(location.latitude(), location.longitude(), &instant);
        if !pos.altitude.is_finite() || !pos.azimuth.is_finite() {
            return Err(Error::Provider {
                latitude: location.latitude(),
                instant,
                reason: format!(
                    "non-finite angles (elevation {}, azimuth {})",
                    pos.altitude, pos.azimuth
                ),
            });
        }
        Ok(pos.into())
    }
}
