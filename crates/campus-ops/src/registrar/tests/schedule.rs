use chrono::{Duration, Local};

use crate::registrar::domain::CommissionStatus;
use crate::registrar::schedule::{derive_status, derive_status_now};

#[test]
fn unparseable_bounds_yield_invalid_dates() {
    let today = Local::now().date_naive();
    assert_eq!(
        derive_status("not-a-date", "2030-01-01", today),
        CommissionStatus::InvalidDates
    );
    assert_eq!(
        derive_status("2030-01-01", "", today),
        CommissionStatus::InvalidDates
    );
    assert_eq!(
        derive_status("", "", today),
        CommissionStatus::InvalidDates
    );
    assert_eq!(
        derive_status("2030-13-40", "2030-01-01", today),
        CommissionStatus::InvalidDates
    );
}

#[test]
fn interval_position_drives_status() {
    let today = Local::now().date_naive();
    let fmt = |offset: i64| (today + Duration::days(offset)).format("%Y-%m-%d").to_string();

    assert_eq!(
        derive_status(&fmt(-1), &fmt(1), today),
        CommissionStatus::Ongoing
    );
    assert_eq!(
        derive_status(&fmt(1), &fmt(2), today),
        CommissionStatus::Upcoming
    );
    assert_eq!(
        derive_status(&fmt(-2), &fmt(-1), today),
        CommissionStatus::Finished
    );
}

#[test]
fn interval_is_inclusive_on_both_ends() {
    let today = Local::now().date_naive();
    let today_str = today.format("%Y-%m-%d").to_string();
    let later = (today + Duration::days(10)).format("%Y-%m-%d").to_string();
    let earlier = (today - Duration::days(10)).format("%Y-%m-%d").to_string();

    assert_eq!(
        derive_status(&today_str, &later, today),
        CommissionStatus::Ongoing
    );
    assert_eq!(
        derive_status(&earlier, &today_str, today),
        CommissionStatus::Ongoing
    );
}

#[test]
fn wall_clock_variant_agrees_with_injected_today() {
    assert_eq!(
        derive_status_now("2020-01-01", "2040-01-01"),
        CommissionStatus::Ongoing
    );
    assert_eq!(
        derive_status_now("bogus", "2040-01-01"),
        CommissionStatus::InvalidDates
    );
}
