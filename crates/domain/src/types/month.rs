//! Calendar month arithmetic for roster grids

use std::fmt;

use chrono::{Datelike, NaiveDate, TimeZone};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::errors::{Result, RosterError};
use crate::types::event::TimeWindow;

/// A (year, month) pair known to be a valid calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RosterMonth {
    year: i32,
    month: u32,
}

impl RosterMonth {
    /// # Errors
    /// Returns `RosterError::InvalidHeader` when the pair is not a
    /// representable month.
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(RosterError::InvalidHeader(format!("{year}-{month} is not a calendar month")));
        }
        Ok(Self { year, month })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        // validated in `new`
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Weekday index of day 1, Monday = 0.
    pub fn first_weekday(&self) -> u32 {
        self.first_day().weekday().num_days_from_monday()
    }

    /// Following month, rolling December over to January.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    pub fn days_in_month(&self) -> u32 {
        let days = self.next().first_day().signed_duration_since(self.first_day()).num_days();
        u32::try_from(days).unwrap_or(0)
    }

    /// Date of the given 1-based day, if it exists in this month.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Local-day boundaries of the month: first instant of day 1 up to the
    /// first instant of day 1 of the next month, in `tz`.
    ///
    /// # Errors
    /// Returns `RosterError::Internal` if local midnight does not exist in
    /// `tz` (a zone that skips midnight on a DST change).
    pub fn window(&self, tz: Tz) -> Result<TimeWindow> {
        let start = local_midnight(tz, self.first_day())?;
        let end = local_midnight(tz, self.next().first_day())?;
        Ok(TimeWindow { start, end })
    }
}

fn local_midnight(tz: Tz, date: NaiveDate) -> Result<chrono::DateTime<chrono::FixedOffset>> {
    tz.from_local_datetime(&date.and_time(chrono::NaiveTime::MIN))
        .earliest()
        .map(|dt| dt.fixed_offset())
        .ok_or_else(|| RosterError::Internal(format!("no local midnight on {date} in {tz}")))
}

impl fmt::Display for RosterMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}
