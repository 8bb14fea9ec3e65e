use crate::calendar::WeeklySchedule;
use crate::error::CalendarError;
use crate::time_format::hhmm_option;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An administrator-entered exception to the default week for one date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarOverride {
    pub date: NaiveDate,
    #[serde(alias = "is_closed")]
    pub is_closed: bool,
    /// Only meaningful when open; unset hours fall back to the weekday default.
    #[serde(default, with = "hhmm_option", alias = "open_time")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_option", alias = "close_time")]
    pub close_time: Option<NaiveTime>,
    /// Display only.
    #[serde(default)]
    pub reason: Option<String>,
    /// Orders for `date` are accepted until the end of this day, whatever the lead time.
    #[serde(default, alias = "cutoff_date")]
    pub cutoff_date: Option<NaiveDate>,
}

impl CalendarOverride {
    pub fn closed(date: NaiveDate) -> Self {
        Self {
            date,
            is_closed: true,
            open_time: None,
            close_time: None,
            reason: None,
            cutoff_date: None,
        }
    }

    pub fn open(date: NaiveDate, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            date,
            is_closed: false,
            open_time: Some(open_time),
            close_time: Some(close_time),
            reason: None,
            cutoff_date: None,
        }
    }

    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        self.reason = if reason.trim().is_empty() {
            None
        } else {
            Some(reason)
        };
        self
    }

    pub fn with_cutoff(mut self, cutoff_date: NaiveDate) -> Self {
        self.cutoff_date = Some(cutoff_date);
        self
    }

    /// Last instant at which the deadline extension still holds (23:59:59 on the cutoff date).
    pub fn deadline(&self) -> Option<NaiveDateTime> {
        let end_of_day = NaiveTime::from_hms_opt(23, 59, 59)?;
        self.cutoff_date.map(|cutoff| cutoff.and_time(end_of_day))
    }

    /// Whether the extension applies at `now`. Closed overrides never extend anything.
    pub fn extends_deadline_at(&self, now: NaiveDateTime) -> bool {
        if self.is_closed {
            return false;
        }
        self.deadline().is_some_and(|deadline| now <= deadline)
    }

    /// Advisory check used by the day editor: does this override merely restate the default?
    pub fn matches_default(&self, schedule: &WeeklySchedule) -> bool {
        let default = schedule.for_date(self.date);
        if self.is_closed != default.is_closed {
            return false;
        }
        if self.is_closed {
            return true;
        }
        self.open_time.unwrap_or(default.open_time) == default.open_time
            && self.close_time.unwrap_or(default.close_time) == default.close_time
    }
}

/// Overrides keyed by calendar date; at most one per date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<CalendarOverride>", into = "Vec<CalendarOverride>")]
pub struct OverrideSet {
    by_date: BTreeMap<NaiveDate, CalendarOverride>,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored records, rejecting two records for the same date.
    pub fn from_records<I>(records: I) -> Result<Self, CalendarError>
    where
        I: IntoIterator<Item = CalendarOverride>,
    {
        let mut set = Self::new();
        for record in records {
            let date = record.date;
            if set.by_date.insert(date, record).is_some() {
                return Err(CalendarError::DuplicateOverride(date));
            }
        }
        Ok(set)
    }

    pub fn get(&self, date: NaiveDate) -> Option<&CalendarOverride> {
        self.by_date.get(&date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    pub fn upsert(&mut self, ov: CalendarOverride) -> Option<CalendarOverride> {
        self.by_date.insert(ov.date, ov)
    }

    pub fn remove(&mut self, date: NaiveDate) -> Option<CalendarOverride> {
        self.by_date.remove(&date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.by_date.keys().next_back().copied()
    }

    pub fn len(&self) -> usize {
        self.by_date.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }

    /// Overrides in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = &CalendarOverride> {
        self.by_date.values()
    }

    pub fn to_records(&self) -> Vec<CalendarOverride> {
        self.by_date.values().cloned().collect()
    }
}

impl TryFrom<Vec<CalendarOverride>> for OverrideSet {
    type Error = CalendarError;

    fn try_from(records: Vec<CalendarOverride>) -> Result<Self, Self::Error> {
        Self::from_records(records)
    }
}

impl From<OverrideSet> for Vec<CalendarOverride> {
    fn from(set: OverrideSet) -> Self {
        set.by_date.into_values().collect()
    }
}
