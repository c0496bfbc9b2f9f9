pub mod angles;
pub mod batch;
pub mod calendar;
pub mod config;
pub mod duration;
pub mod error;
pub mod input;
pub mod prompt;
pub mod provider;
pub mod report;
pub mod sunrise;
pub mod types;
pub mod window;

pub use angles::{
    deg_to_rad, equation_of_time, hour_angle, intermediate_angle_b, normalize_angle, rad_to_deg,
    solar_altitude, solar_azimuth, solar_declination, solar_position, solar_zenith_angle,
    utc_lst_correction, DEGREES_PER_HOUR, EARTH_AXIAL_TILT,
};

pub use batch::{merge_series, worker_count, BatchRunner, LatitudeSeries, DEFAULT_WORKER_FRACTION};

pub use calendar::{date_range, day_bounds, day_of_year, days_in_year, leap_year, parse_date, year_dates};

pub use config::{LoggingSettings, Settings, DEFAULT_LATITUDES};

pub use duration::accumulate;

pub use error::{Error, Result};

pub use input::{parse_latitude, read_latitude_dates, read_latitude_dates_from, LatitudeDate};

pub use prompt::{format_day, prompt_range, RangeRequest};

pub use provider::{ElevationProvider, SimpleSolarModel};

pub use report::{
    DurationReport, DurationRow, IntervalReport, IntervalRow, ReportWriter, rounded_hours,
    timestamped_name,
};

pub use sunrise::{find_due_east, horizon_event, DueEastDay, HorizonEvent};

pub use types::{
    Band, Crossing, CrossingKind, CrossingSequence, DailyDuration, GoldenHourResult, Interval,
    Location, SolarPosition, Step, SunAngles,
};

pub use window::{extract, golden_hours, project, samples};
