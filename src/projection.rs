use crate::calendar::{BakeryCalendar, ResolvedDay, WeeklySchedule, resolve};
use crate::error::CalendarError;
use crate::overrides::OverrideSet;
use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Resolve `number_of_days` consecutive dates starting at `start`.
pub fn project_schedule(
    start: NaiveDate,
    number_of_days: usize,
    overrides: &OverrideSet,
    schedule: &WeeklySchedule,
) -> Vec<ResolvedDay> {
    (0..number_of_days)
        .map(|offset| resolve(start + Duration::days(offset as i64), overrides, schedule))
        .collect()
}

/// The Monday on or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// The Monday-to-Sunday week containing `date`.
pub fn project_week(date: NaiveDate, calendar: &BakeryCalendar) -> Vec<ResolvedDay> {
    project_schedule(week_start(date), 7, calendar.overrides(), calendar.schedule())
}

/// Month view: whole weeks, Monday first, covering every day of the month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthProjection {
    pub year: i32,
    pub month: u32,
    pub days: Vec<ResolvedDay>,
}

impl MonthProjection {
    /// False for the leading and trailing days borrowed from neighbouring months.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[ResolvedDay]> {
        self.days.chunks(7)
    }
}

pub fn project_month(
    year: i32,
    month: u32,
    calendar: &BakeryCalendar,
) -> Result<MonthProjection, CalendarError> {
    let invalid = || CalendarError::InvalidMonth { year, month };
    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(invalid)?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(invalid)?;
    let last = next_first - Duration::days(1);

    let grid_start = week_start(first);
    let grid_end = week_start(last) + Duration::days(6);
    let len = (grid_end - grid_start).num_days() as usize + 1;

    Ok(MonthProjection {
        year,
        month,
        days: project_schedule(grid_start, len, calendar.overrides(), calendar.schedule()),
    })
}
