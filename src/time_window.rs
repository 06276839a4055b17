use std::collections::BTreeSet;
use std::fmt;

use chrono::{Datelike, Days, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

/// Calendar month token, rendered as the `YYYY/MM` path segment the archive
/// endpoints use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}/{:02}", self.year, self.month)
    }
}

/// Inclusive `[start, end]` range plus every month it touches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub months: BTreeSet<YearMonth>,
}

impl TimeWindow {
    /// Monday of the previous calendar week (at midnight) through `now`.
    pub fn last_week(now: NaiveDateTime) -> Self {
        let today = now.date();
        let back = u64::from(today.weekday().num_days_from_monday()) + 7;
        let start_day = today.checked_sub_days(Days::new(back)).unwrap_or(today);
        let start = start_day.and_time(NaiveTime::MIN);
        let end = now;

        let months = [YearMonth::of(&start), YearMonth::of(&end), YearMonth::of(&now)]
            .into_iter()
            .collect();

        Self { start, end, months }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        let at = date.and_time(NaiveTime::MIN);
        self.start <= at && at <= self.end
    }

    pub fn label(&self) -> String {
        format!(
            "{} - {}",
            self.start.format("%B %d"),
            self.end.format("%B %d, %Y")
        )
    }
}
