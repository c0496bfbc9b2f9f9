mod common;

use chrono::Datelike;
use common::date;
use golden_hour::{find_due_east, horizon_event, HorizonEvent, SimpleSolarModel, Step};

fn step() -> Step {
    Step::from_minutes(1.0).unwrap()
}

#[test]
fn test_sunrise_and_sunset_found_at_mid_latitude() {
    let d = date(2023, 6, 21);
    let rise = horizon_event(&SimpleSolarModel, d, 45.0, HorizonEvent::Sunrise, step())
        .unwrap()
        .unwrap();
    let set = horizon_event(&SimpleSolarModel, d, 45.0, HorizonEvent::Sunset, step())
        .unwrap()
        .unwrap();
    assert!(rise < set);
    assert_eq!(rise.date(), d);
}

#[test]
fn test_no_sunrise_in_polar_night() {
    let d = date(2023, 12, 21);
    let rise = horizon_event(&SimpleSolarModel, d, 80.0, HorizonEvent::Sunrise, step()).unwrap();
    assert_eq!(rise, None);
}

#[test]
fn test_due_east_days_are_near_equinoxes() {
    let days = find_due_east(&SimpleSolarModel, 40.0, 2023, 6, HorizonEvent::Sunrise, step()).unwrap();
    assert_eq!(days.len(), 6);
    for day in &days {
        assert!(matches!(day.date.month(), 3 | 9), "{}", day.date);
        assert!(day.deviation < 1.0, "{} off by {}", day.date, day.deviation);
        assert!((day.azimuth - 90.0).abs() == day.deviation);
    }
    assert!(days.windows(2).all(|w| w[0].deviation <= w[1].deviation));
}

#[test]
fn test_due_west_sunsets() {
    let days = find_due_east(&SimpleSolarModel, 40.0, 2023, 3, HorizonEvent::Sunset, step()).unwrap();
    assert_eq!(days.len(), 3);
    for day in &days {
        assert!((day.azimuth - 270.0).abs() < 1.0);
    }
}

#[test]
fn test_zero_count_is_empty() {
    let days = find_due_east(&SimpleSolarModel, 40.0, 2023, 0, HorizonEvent::Sunrise, step()).unwrap();
    assert!(days.is_empty());
}

#[test]
fn test_count_larger_than_year_returns_every_day() {
    let coarse = Step::from_minutes(10.0).unwrap();
    let days = find_due_east(&SimpleSolarModel, 10.0, 2024, 400, HorizonEvent::Sunrise, coarse).unwrap();
    assert_eq!(days.len(), 366);
}

#[test]
fn test_invalid_latitude_rejected() {
    assert!(find_due_east(&SimpleSolarModel, -95.0, 2023, 6, HorizonEvent::Sunrise, step()).is_err());
}
