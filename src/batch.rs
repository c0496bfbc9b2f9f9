//! Fan-out of the extractor and the accumulator over many dates and
//! latitudes.
//!
//! Work runs on a dedicated rayon pool sized to a fraction of the machine.
//! Every unit of work returns its own immutable result; merging into a
//! report happens afterwards on the calling thread, keyed by date and
//! column, so the output never depends on completion order.

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{NaiveDate, TimeDelta};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::Settings;
use crate::duration::accumulate;
use crate::error::{Error, Result};
use crate::input::LatitudeDate;
use crate::provider::ElevationProvider;
use crate::report::{DurationReport, DurationRow, IntervalReport, IntervalRow};
use crate::types::{Band, DailyDuration, GoldenHourResult, Location, Step};
use crate::window::golden_hours;

pub const DEFAULT_WORKER_FRACTION: f64 = 0.8;

/// `max(1, floor(available * fraction))`.
pub fn worker_count(available: usize, fraction: f64) -> usize {
    ((available as f64 * fraction).floor() as usize).max(1)
}

fn available_parallelism() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}

/// One latitude's series, as returned by a worker.
#[derive(Debug, Clone, PartialEq)]
pub struct LatitudeSeries {
    pub column: usize,
    pub latitude: f64,
    pub days: Vec<DailyDuration>,
}

pub struct BatchRunner<P> {
    provider: P,
    band: Band,
    step: Step,
    workers: usize,
}

impl<P: ElevationProvider> BatchRunner<P> {
    pub fn new(provider: P, band: Band, step: Step) -> Self {
        Self {
            provider,
            band,
            step,
            workers: worker_count(available_parallelism(), DEFAULT_WORKER_FRACTION),
        }
    }

    pub fn from_settings(provider: P, settings: &Settings) -> Result<Self> {
        Self::new(provider, settings.band()?, settings.step()?)
            .with_worker_fraction(settings.worker_fraction)
    }

    pub fn with_worker_fraction(mut self, fraction: f64) -> Result<Self> {
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(Error::InvalidWorkerFraction { value: fraction });
        }
        self.workers = worker_count(available_parallelism(), fraction);
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn band(&self) -> &Band {
        &self.band
    }

    pub fn step(&self) -> Step {
        self.step
    }

    fn pool(&self) -> Result<rayon::ThreadPool> {
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("golden-hour-worker-{i}"))
            .build()
            .map_err(|e| Error::WorkerPool {
                reason: e.to_string(),
            })
    }

    /// Daily durations of one latitude over all `dates`.
    pub fn latitude_series(
        &self,
        column: usize,
        latitude: f64,
        dates: &[NaiveDate],
    ) -> Result<LatitudeSeries> {
        let days = dates
            .iter()
            .map(|date| accumulate(&self.provider, *date, latitude, &self.band, self.step))
            .collect::<Result<Vec<_>>>()?;
        debug!(latitude, days = days.len(), "latitude series computed");
        Ok(LatitudeSeries {
            column,
            latitude,
            days,
        })
    }

    /// Duration report with one row per date and one column per entry of
    /// `latitudes`. Each latitude is one unit of work.
    pub fn run_durations(&self, dates: &[NaiveDate], latitudes: &[f64]) -> Result<DurationReport> {
        for latitude in latitudes {
            Location::new(*latitude)?;
        }

        let started = Instant::now();
        info!(
            dates = dates.len(),
            latitudes = latitudes.len(),
            workers = self.workers,
            "computing duration report"
        );

        let series = self.pool()?.install(|| {
            latitudes
                .par_iter()
                .enumerate()
                .map(|(column, latitude)| self.latitude_series(column, *latitude, dates))
                .collect::<Result<Vec<_>>>()
        })?;

        let report = merge_series(dates, latitudes, series);
        info!(rows = report.rows.len(), elapsed = ?started.elapsed(), "duration report computed");
        Ok(report)
    }

    /// Morning/evening windows for each requested row. Rows come back
    /// ordered by date; rows sharing a date keep their request order.
    pub fn run_intervals(&self, requests: &[LatitudeDate]) -> Result<IntervalReport> {
        let started = Instant::now();
        info!(
            requests = requests.len(),
            workers = self.workers,
            "computing interval report"
        );

        let results = self.pool()?.install(|| {
            requests
                .par_iter()
                .enumerate()
                .map(|(index, request)| {
                    self.golden_hours(request.date, request.latitude)
                        .map(|result| (index, request, result))
                })
                .collect::<Result<Vec<_>>>()
        })?;

        let mut keyed: Vec<(NaiveDate, usize, IntervalRow)> = results
            .into_iter()
            .map(|(index, request, result)| {
                let row = IntervalRow {
                    date: request.date,
                    latitude: request.latitude,
                    result,
                };
                (request.date, index, row)
            })
            .collect();
        keyed.sort_by_key(|(date, index, _)| (*date, *index));

        let report = IntervalReport {
            rows: keyed.into_iter().map(|(_, _, row)| row).collect(),
        };
        info!(rows = report.rows.len(), elapsed = ?started.elapsed(), "interval report computed");
        Ok(report)
    }

    /// Windows of one latitude over consecutive dates, computed in order on
    /// the calling thread.
    pub fn run_range(
        &self,
        dates: &[NaiveDate],
        latitude: f64,
    ) -> Result<Vec<(NaiveDate, GoldenHourResult)>> {
        dates
            .iter()
            .map(|date| Ok((*date, self.golden_hours(*date, latitude)?)))
            .collect()
    }

    fn golden_hours(&self, date: NaiveDate, latitude: f64) -> Result<GoldenHourResult> {
        golden_hours(&self.provider, date, latitude, &self.band, self.step)
    }
}

/// Merge per-latitude series into a date-keyed table. Every requested date
/// gets a row and every cell not produced by a worker stays at zero.
pub fn merge_series(
    dates: &[NaiveDate],
    latitudes: &[f64],
    series: Vec<LatitudeSeries>,
) -> DurationReport {
    let empty_row = vec![TimeDelta::zero(); latitudes.len()];
    let mut table: BTreeMap<NaiveDate, Vec<TimeDelta>> = dates
        .iter()
        .map(|date| (*date, empty_row.clone()))
        .collect();

    for s in series {
        for day in s.days {
            let cells = table.entry(day.date).or_insert_with(|| empty_row.clone());
            if let Some(cell) = cells.get_mut(s.column) {
                *cell = day.inside;
            }
        }
    }

    DurationReport {
        latitudes: latitudes.to_vec(),
        rows: table
            .into_iter()
            .map(|(date, cells)| DurationRow { date, cells })
            .collect(),
    }
}
