use crate::calendar::{BakeryCalendar, WeeklySchedule};
use crate::error::PersistenceResult;
use crate::overrides::{CalendarOverride, OverrideSet};
use chrono::NaiveDate;

/// Where the default week and the per-date overrides live.
pub trait CalendarStore {
    fn load_schedule(&self) -> PersistenceResult<WeeklySchedule>;
    fn save_schedule(&self, schedule: &WeeklySchedule) -> PersistenceResult<()>;
    fn load_overrides(&self) -> PersistenceResult<OverrideSet>;
    fn upsert_override(&self, ov: &CalendarOverride) -> PersistenceResult<()>;
    /// Returns false when no override existed for `date`.
    fn delete_override(&self, date: NaiveDate) -> PersistenceResult<bool>;

    /// Fetch both halves once, giving the engine a consistent snapshot.
    fn load_calendar(&self) -> PersistenceResult<BakeryCalendar> {
        let schedule = self.load_schedule()?;
        let overrides = self.load_overrides()?;
        Ok(BakeryCalendar::new(schedule, overrides))
    }
}

pub mod file;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::{
    load_calendar_from_json, load_overrides_from_csv, save_calendar_to_json,
    save_overrides_to_csv,
};
