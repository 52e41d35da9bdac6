//! Run-window check for scheduled invocations

use chrono::{Datelike, Timelike, Weekday};

/// Whether a run at `now` falls inside the configured window.
///
/// A set `day` must match the weekday exactly; a set `hour` is a lower
/// bound on the hour of the day.
pub fn is_within_window<T>(now: &T, day: Option<Weekday>, hour: Option<u32>) -> bool
where
    T: Datelike + Timelike,
{
    if day.is_some_and(|d| d != now.weekday()) {
        return false;
    }
    if hour.is_some_and(|h| now.hour() < h) {
        return false;
    }
    true
}
