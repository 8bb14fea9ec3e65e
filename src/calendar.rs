use crate::error::CalendarError;
use crate::overrides::{CalendarOverride, OverrideSet};
use crate::time_format::{self, hhmm, hhmm_option};
use chrono::{Datelike, Duration, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Lowercase weekday names used as settings-key prefixes, indexed from Sunday.
pub const WEEKDAY_KEYS: [&str; 7] = [
    "sunday",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
];

pub(crate) fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or_default()
}

/// Opening state and hours for one weekday of the default week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayHours {
    pub is_closed: bool,
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
}

impl DayHours {
    pub fn open(open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            is_closed: false,
            open_time,
            close_time,
        }
    }

    /// Closed days keep placeholder hours so an editor has something to pre-fill.
    pub fn closed() -> Self {
        Self {
            is_closed: true,
            open_time: hm(8, 0),
            close_time: hm(19, 0),
        }
    }
}

/// One row of the stored default week (`weekday` 0 = Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekdayEntry {
    pub weekday: u8,
    #[serde(alias = "is_closed")]
    pub is_closed: bool,
    #[serde(with = "hhmm", alias = "open_time")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm", alias = "close_time")]
    pub close_time: NaiveTime,
}

/// The default open/closed state and hours of every weekday.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<WeekdayEntry>", into = "Vec<WeekdayEntry>")]
pub struct WeeklySchedule {
    days: [DayHours; 7],
}

impl Default for WeeklySchedule {
    fn default() -> Self {
        let weekday = DayHours::open(hm(8, 0), hm(19, 30));
        Self {
            days: [
                DayHours::closed(),
                DayHours::closed(),
                weekday,
                weekday,
                weekday,
                weekday,
                DayHours::open(hm(8, 0), hm(19, 0)),
            ],
        }
    }
}

impl WeeklySchedule {
    /// Build from seven entries ordered Sunday first.
    pub fn new(days: [DayHours; 7]) -> Self {
        Self { days }
    }

    /// Same hours on every open day, closed on the listed weekdays.
    pub fn uniform<I>(closed_days: I, open_time: NaiveTime, close_time: NaiveTime) -> Self
    where
        I: IntoIterator<Item = Weekday>,
    {
        let mut days = [DayHours::open(open_time, close_time); 7];
        for day in closed_days {
            let slot = &mut days[day.num_days_from_sunday() as usize];
            slot.is_closed = true;
        }
        Self { days }
    }

    pub fn day(&self, weekday: Weekday) -> &DayHours {
        &self.days[weekday.num_days_from_sunday() as usize]
    }

    pub fn for_date(&self, date: NaiveDate) -> &DayHours {
        self.day(date.weekday())
    }

    pub fn set_day(&mut self, weekday: Weekday, hours: DayHours) {
        self.days[weekday.num_days_from_sunday() as usize] = hours;
    }

    pub fn days(&self) -> &[DayHours; 7] {
        &self.days
    }

    pub fn has_open_day(&self) -> bool {
        self.days.iter().any(|day| !day.is_closed)
    }

    /// Read the storefront settings table (`tuesday_closed`, `tuesday_open`, ...).
    /// Missing keys keep the built-in default for that field.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<Self, CalendarError> {
        let mut schedule = Self::default();
        for (idx, name) in WEEKDAY_KEYS.iter().enumerate() {
            let day = &mut schedule.days[idx];
            if let Some(value) = settings.get(&format!("{name}_closed")) {
                day.is_closed = value.trim() == "true";
            }
            if let Some(value) = settings.get(&format!("{name}_open")) {
                day.open_time = time_format::parse_time(value)?;
            }
            if let Some(value) = settings.get(&format!("{name}_close")) {
                day.close_time = time_format::parse_time(value)?;
            }
        }
        Ok(schedule)
    }

    pub fn to_settings(&self) -> HashMap<String, String> {
        let mut settings = HashMap::with_capacity(21);
        for (name, day) in WEEKDAY_KEYS.iter().zip(self.days.iter()) {
            settings.insert(format!("{name}_closed"), day.is_closed.to_string());
            settings.insert(format!("{name}_open"), time_format::format_time(day.open_time));
            settings.insert(format!("{name}_close"), time_format::format_time(day.close_time));
        }
        settings
    }
}

impl TryFrom<Vec<WeekdayEntry>> for WeeklySchedule {
    type Error = CalendarError;

    fn try_from(entries: Vec<WeekdayEntry>) -> Result<Self, Self::Error> {
        if entries.len() != 7 {
            return Err(CalendarError::InvalidWeeklySchedule(format!(
                "expected 7 weekday entries, got {}",
                entries.len()
            )));
        }
        let mut slots: [Option<DayHours>; 7] = [None; 7];
        for entry in entries {
            let idx = usize::from(entry.weekday);
            if idx > 6 {
                return Err(CalendarError::InvalidWeeklySchedule(format!(
                    "weekday {} out of range 0..6",
                    entry.weekday
                )));
            }
            if slots[idx].is_some() {
                return Err(CalendarError::InvalidWeeklySchedule(format!(
                    "weekday {} listed twice",
                    entry.weekday
                )));
            }
            slots[idx] = Some(DayHours {
                is_closed: entry.is_closed,
                open_time: entry.open_time,
                close_time: entry.close_time,
            });
        }
        let mut days = [DayHours::closed(); 7];
        for (idx, slot) in slots.into_iter().enumerate() {
            // Seven entries with no duplicate and none out of range fill every slot.
            if let Some(hours) = slot {
                days[idx] = hours;
            }
        }
        Ok(Self { days })
    }
}

impl From<WeeklySchedule> for Vec<WeekdayEntry> {
    fn from(schedule: WeeklySchedule) -> Self {
        schedule
            .days
            .iter()
            .enumerate()
            .map(|(idx, day)| WeekdayEntry {
                weekday: idx as u8,
                is_closed: day.is_closed,
                open_time: day.open_time,
                close_time: day.close_time,
            })
            .collect()
    }
}

/// A date after applying its override, if any, on top of the default week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDay {
    pub date: NaiveDate,
    pub is_closed: bool,
    #[serde(default, with = "hhmm_option")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_option")]
    pub close_time: Option<NaiveTime>,
    pub reason: Option<String>,
    /// True iff an override record exists for the date, whatever its values.
    pub is_exception: bool,
    pub is_default_closed: bool,
    pub cutoff_date: Option<NaiveDate>,
}

impl ResolvedDay {
    pub fn is_open(&self) -> bool {
        !self.is_closed
    }

    /// Draft override carrying the resolved values, used to pre-fill the day editor.
    pub fn to_override(&self) -> CalendarOverride {
        CalendarOverride {
            date: self.date,
            is_closed: self.is_closed,
            open_time: self.open_time,
            close_time: self.close_time,
            reason: self.reason.clone(),
            cutoff_date: self.cutoff_date,
        }
    }
}

/// Resolve one date against the override set and the default week.
///
/// Total and side-effect free. An open override with unset hours takes the
/// weekday's default hours.
pub fn resolve(date: NaiveDate, overrides: &OverrideSet, schedule: &WeeklySchedule) -> ResolvedDay {
    let default = schedule.for_date(date);
    match overrides.get(date) {
        Some(ov) => {
            let (open_time, close_time) = if ov.is_closed {
                (None, None)
            } else {
                (
                    Some(ov.open_time.unwrap_or(default.open_time)),
                    Some(ov.close_time.unwrap_or(default.close_time)),
                )
            };
            ResolvedDay {
                date,
                is_closed: ov.is_closed,
                open_time,
                close_time,
                reason: ov.reason.clone(),
                is_exception: true,
                is_default_closed: default.is_closed,
                cutoff_date: ov.cutoff_date,
            }
        }
        None => {
            let (open_time, close_time) = if default.is_closed {
                (None, None)
            } else {
                (Some(default.open_time), Some(default.close_time))
            };
            ResolvedDay {
                date,
                is_closed: default.is_closed,
                open_time,
                close_time,
                reason: None,
                is_exception: false,
                is_default_closed: default.is_closed,
                cutoff_date: None,
            }
        }
    }
}

/// A consistent snapshot of the default week plus the per-date overrides.
///
/// Callers build one per request so that every lookup in a single
/// resolution sees the same data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakeryCalendar {
    schedule: WeeklySchedule,
    #[serde(default)]
    overrides: OverrideSet,
}

impl BakeryCalendar {
    pub fn new(schedule: WeeklySchedule, overrides: OverrideSet) -> Self {
        Self {
            schedule,
            overrides,
        }
    }

    pub fn schedule(&self) -> &WeeklySchedule {
        &self.schedule
    }

    pub fn overrides(&self) -> &OverrideSet {
        &self.overrides
    }

    pub fn set_schedule(&mut self, schedule: WeeklySchedule) {
        self.schedule = schedule;
    }

    /// Insert or replace the override for its date.
    pub fn upsert_override(&mut self, ov: CalendarOverride) -> Option<CalendarOverride> {
        self.overrides.upsert(ov)
    }

    /// Drop the override for `date`, restoring the default for that day.
    pub fn remove_override(&mut self, date: NaiveDate) -> Option<CalendarOverride> {
        self.overrides.remove(date)
    }

    pub fn resolve(&self, date: NaiveDate) -> ResolvedDay {
        resolve(date, &self.overrides, &self.schedule)
    }

    pub fn is_open(&self, date: NaiveDate) -> bool {
        match self.overrides.get(date) {
            Some(ov) => !ov.is_closed,
            None => !self.schedule.for_date(date).is_closed,
        }
    }

    /// Last date that may still differ from the plain weekly pattern when scanning from `from`.
    fn scan_limit(&self, from: NaiveDate) -> NaiveDate {
        let anchor = match self.overrides.last_date() {
            Some(last) if last > from => last,
            _ => from,
        };
        anchor + Duration::days(7)
    }

    /// Find the next open date strictly after `from`.
    ///
    /// Past the last override the calendar repeats weekly, so seven closed
    /// days in a row there mean no open date exists and `None` is returned.
    pub fn next_open_after(&self, from: NaiveDate) -> Option<NaiveDate> {
        let limit = self.scan_limit(from);
        let mut current = from + Duration::days(1);
        while current <= limit {
            if self.is_open(current) {
                return Some(current);
            }
            current = current + Duration::days(1);
        }
        None
    }

    /// Find the date on which `open_days` open days after `from` have been counted.
    /// `from` itself is never counted.
    pub fn find_next_open(&self, from: NaiveDate, open_days: u32) -> Option<NaiveDate> {
        let mut current = from;
        for _ in 0..open_days {
            current = self.next_open_after(current)?;
        }
        Some(current)
    }

    /// Get all open days in a date range (inclusive)
    pub fn open_days_in_range(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;

        while current <= end {
            if self.is_open(current) {
                days.push(current);
            }
            current = current + Duration::days(1);
        }
        days
    }

    /// Count open days in a date range (inclusive)
    pub fn count_open_days(&self, start: NaiveDate, end: NaiveDate) -> usize {
        let mut count = 0;
        let mut current = start;

        while current <= end {
            if self.is_open(current) {
                count += 1;
            }
            current = current + Duration::days(1);
        }
        count
    }
}
