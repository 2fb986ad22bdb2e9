use chrono::{Local, NaiveDate};

use super::domain::CommissionStatus;

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

/// Derives the temporal status of a commission from its raw date bounds.
///
/// Never fails: unparseable bounds yield `InvalidDates`. The interval is
/// inclusive on both ends, so `today == start` and `today == end` both count
/// as Ongoing. The result is recomputed on every read and never persisted.
pub fn derive_status(start: &str, end: &str, today: NaiveDate) -> CommissionStatus {
    let (start, end) = match (parse_date(start), parse_date(end)) {
        (Some(start), Some(end)) => (start, end),
        _ => return CommissionStatus::InvalidDates,
    };

    if today < start {
        CommissionStatus::Upcoming
    } else if today > end {
        CommissionStatus::Finished
    } else {
        CommissionStatus::Ongoing
    }
}

/// Wall-clock variant used on production read paths.
pub fn derive_status_now(start: &str, end: &str) -> CommissionStatus {
    derive_status(start, end, Local::now().date_naive())
}
