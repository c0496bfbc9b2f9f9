mod common;

use chrono::TimeDelta;
use common::{at, date, FailsAt, Profile};
use golden_hour::{
    merge_series, worker_count, year_dates, Band, BatchRunner, DailyDuration, Error,
    LatitudeDate, LatitudeSeries, Settings, SimpleSolarModel, Step,
};

fn runner<P: golden_hour::ElevationProvider>(provider: P) -> BatchRunner<P> {
    BatchRunner::new(provider, Band::GOLDEN_HOUR, Step::from_minutes(5.0).unwrap()).with_workers(2)
}

// ── Pool sizing ──

#[test]
fn test_worker_count_is_fraction_of_cores() {
    assert_eq!(worker_count(10, 0.8), 8);
    assert_eq!(worker_count(8, 0.8), 6);
    assert_eq!(worker_count(16, 0.5), 8);
    assert_eq!(worker_count(4, 1.0), 4);
}

#[test]
fn test_worker_count_never_zero() {
    assert_eq!(worker_count(1, 0.8), 1);
    assert_eq!(worker_count(0, 0.8), 1);
}

#[test]
fn test_worker_fraction_validated() {
    let base = || BatchRunner::new(SimpleSolarModel, Band::GOLDEN_HOUR, Step::default());
    assert!(matches!(base().with_worker_fraction(0.0), Err(Error::InvalidWorkerFraction { .. })));
    assert!(matches!(base().with_worker_fraction(1.5), Err(Error::InvalidWorkerFraction { .. })));
    assert!(base().with_worker_fraction(0.5).unwrap().workers() >= 1);
}

#[test]
fn test_from_settings_uses_band_and_step() {
    let settings = Settings {
        band_min: -6.0,
        band_max: 6.0,
        step_minutes: 2.0,
        ..Settings::default()
    };
    let runner = BatchRunner::from_settings(SimpleSolarModel, &settings).unwrap();
    assert_eq!(*runner.band(), Band::TWILIGHT);
    assert_eq!(runner.step(), Step::from_minutes(2.0).unwrap());
}

// ── Reduction ──

#[test]
fn test_merge_orders_rows_by_date_and_fills_gaps() {
    let dates = [date(2023, 1, 3), date(2023, 1, 1), date(2023, 1, 2)];
    let latitudes = [10.0, 20.0];
    let series = vec![
        LatitudeSeries {
            column: 1,
            latitude: 20.0,
            days: vec![DailyDuration {
                date: date(2023, 1, 2),
                latitude: 20.0,
                inside: TimeDelta::minutes(90),
            }],
        },
        LatitudeSeries {
            column: 0,
            latitude: 10.0,
            days: vec![DailyDuration {
                date: date(2023, 1, 3),
                latitude: 10.0,
                inside: TimeDelta::minutes(30),
            }],
        },
    ];

    let report = merge_series(&dates, &latitudes, series);
    let row_dates: Vec<_> = report.rows.iter().map(|r| r.date).collect();
    assert_eq!(row_dates, vec![date(2023, 1, 1), date(2023, 1, 2), date(2023, 1, 3)]);
    assert_eq!(report.rows[0].cells, vec![TimeDelta::zero(), TimeDelta::zero()]);
    assert_eq!(report.rows[1].cells, vec![TimeDelta::zero(), TimeDelta::minutes(90)]);
    assert_eq!(report.rows[2].cells, vec![TimeDelta::minutes(30), TimeDelta::zero()]);
}

// ── Duration runs ──

#[test]
fn test_run_durations_keeps_configured_column_order() {
    let dates = year_dates(2023);
    let latitudes = [60.0, 0.0, -45.0, 60.0];
    let report = runner(SimpleSolarModel).run_durations(&dates, &latitudes).unwrap();

    assert_eq!(report.latitudes, latitudes.to_vec());
    assert_eq!(report.rows.len(), 365);
    assert_eq!(report.rows[0].date, date(2023, 1, 1));
    assert_eq!(report.rows[364].date, date(2023, 12, 31));
    for row in &report.rows {
        assert_eq!(row.cells.len(), 4);
        assert_eq!(row.cells[0], row.cells[3]);
    }
}

#[test]
fn test_run_durations_covers_leap_day() {
    let dates = year_dates(2024);
    let report = runner(SimpleSolarModel).run_durations(&dates, &[30.0]).unwrap();
    assert_eq!(report.rows.len(), 366);
    assert!(report.rows.iter().any(|r| r.date == date(2024, 2, 29)));
}

#[test]
fn test_run_durations_matches_single_thread_result() {
    let dates = year_dates(2023);
    let latitudes = [15.0, 55.0];
    let parallel = runner(SimpleSolarModel).run_durations(&dates, &latitudes).unwrap();
    let serial = runner(SimpleSolarModel)
        .with_workers(1)
        .run_durations(&dates, &latitudes)
        .unwrap();
    assert_eq!(parallel, serial);
}

#[test]
fn test_one_failing_latitude_fails_the_batch() {
    let dates = [date(2023, 6, 21), date(2023, 6, 22)];
    let err = runner(FailsAt(20.0))
        .run_durations(&dates, &[10.0, 20.0, 30.0])
        .unwrap_err();
    assert!(matches!(err, Error::Provider { latitude, .. } if latitude == 20.0));
}

#[test]
fn test_invalid_latitude_fails_before_dispatch() {
    let err = runner(SimpleSolarModel)
        .run_durations(&[date(2023, 6, 21)], &[10.0, -91.0])
        .unwrap_err();
    assert!(matches!(err, Error::InvalidLatitude { .. }));
}

// ── Interval runs ──

#[test]
fn test_run_intervals_sorted_by_date_stable_within_date() {
    let requests = [
        LatitudeDate { date: date(2023, 6, 22), latitude: 45.0 },
        LatitudeDate { date: date(2023, 6, 21), latitude: 50.0 },
        LatitudeDate { date: date(2023, 6, 21), latitude: 40.0 },
    ];
    let report = runner(SimpleSolarModel).run_intervals(&requests).unwrap();
    let keys: Vec<_> = report.rows.iter().map(|r| (r.date, r.latitude)).collect();
    assert_eq!(
        keys,
        vec![
            (date(2023, 6, 21), 50.0),
            (date(2023, 6, 21), 40.0),
            (date(2023, 6, 22), 45.0),
        ]
    );
    assert!(report.rows.iter().all(|r| r.result.morning.is_some() && r.result.evening.is_some()));
}

#[test]
fn test_run_range_in_date_order() {
    let d = date(2023, 3, 1);
    let profile = Profile(|m: f64| m / 10.0 - 60.0);
    let days = runner(profile)
        .run_range(&[d, d.succ_opt().unwrap()], 10.0)
        .unwrap();
    assert_eq!(days.len(), 2);
    assert_eq!(days[0].0, d);
    assert_eq!(days[0].1.morning.unwrap().start, at(d, 9, 20));
    assert_eq!(days[0].1.evening, None);
}

#[test]
fn test_identical_runs_give_identical_reports() {
    let dates = year_dates(2023);
    let latitudes = [59.91, 70.2];
    let first = runner(SimpleSolarModel).run_durations(&dates, &latitudes).unwrap();
    let second = runner(SimpleSolarModel).run_durations(&dates, &latitudes).unwrap();

    let mut a = Vec::new();
    let mut b = Vec::new();
    first.write_csv(&mut a).unwrap();
    second.write_csv(&mut b).unwrap();
    assert_eq!(a, b);
}
