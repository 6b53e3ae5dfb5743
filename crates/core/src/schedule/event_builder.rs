//! Event builder - turns per-day shift codes into draft calendar events

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate, TimeZone};
use chrono_tz::Tz;
use rostersync_domain::{
    DraftEvent, EventTiming, Result, RosterError, RosterMonth, ScheduleConfig, ShiftCode,
    ShiftTable,
};

/// Builds one draft event per roster day.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    table: ShiftTable,
    tz: Tz,
    duration: Duration,
}

impl EventBuilder {
    pub fn new(table: ShiftTable, tz: Tz, shift_duration_hours: u32) -> Self {
        Self { table, tz, duration: Duration::hours(i64::from(shift_duration_hours)) }
    }

    /// # Errors
    /// Returns `RosterError::Config` for an unknown time zone.
    pub fn from_config(config: &ScheduleConfig) -> Result<Self> {
        Ok(Self::new(config.shift_table.clone(), config.time_zone()?, config.shift_duration_hours))
    }

    pub fn time_zone(&self) -> Tz {
        self.tz
    }

    /// Map `codes` (index 0 = day 1) to draft events keyed by local start
    /// date.
    ///
    /// # Errors
    /// - `UnknownShiftCode` for a code missing from the table
    /// - `InvalidInput` when there are more codes than days in the month
    pub fn build(
        &self,
        month: RosterMonth,
        codes: &[ShiftCode],
    ) -> Result<BTreeMap<NaiveDate, DraftEvent>> {
        if codes.len() > month.days_in_month() as usize {
            return Err(RosterError::InvalidInput(format!(
                "{} shift codes for {month}, which has {} days",
                codes.len(),
                month.days_in_month()
            )));
        }

        let mut drafts = BTreeMap::new();
        for (day, code) in (1u32..).zip(codes) {
            let date = month
                .day(day)
                .ok_or_else(|| RosterError::Internal(format!("{month} has no day {day}")))?;
            drafts.insert(date, self.draft_for(date, code)?);
        }

        Ok(drafts)
    }

    fn draft_for(&self, date: NaiveDate, code: &ShiftCode) -> Result<DraftEvent> {
        let definition = self
            .table
            .get(code)
            .ok_or_else(|| RosterError::UnknownShiftCode(code.to_string()))?;

        let timing = if definition.all_day {
            let end = date
                .succ_opt()
                .ok_or_else(|| RosterError::Internal(format!("no day after {date}")))?;
            EventTiming::AllDay { start: date, end }
        } else {
            let start = self
                .tz
                .from_local_datetime(&date.and_time(definition.start))
                .earliest()
                .ok_or_else(|| {
                    RosterError::Internal(format!(
                        "{date} {} does not exist in {}",
                        definition.start, self.tz
                    ))
                })?
                .fixed_offset();
            let end = start.checked_add_signed(self.duration).ok_or_else(|| {
                RosterError::Internal(format!("shift starting {start} ends out of range"))
            })?;
            EventTiming::Timed { start, end, time_zone: self.tz.name().to_string() }
        };

        Ok(DraftEvent { summary: code.clone(), timing })
    }
}
