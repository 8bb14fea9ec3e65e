pub mod calendar;
pub mod category;
pub mod config;
pub mod eligibility;
pub mod error;
#[cfg(feature = "http_api")]
pub mod http_api;
pub mod logging;
pub mod overrides;
pub mod persistence;
pub mod projection;
pub mod time_format;

pub use calendar::{BakeryCalendar, DayHours, ResolvedDay, WeekdayEntry, WeeklySchedule, resolve};
pub use category::ProductCategory;
pub use config::{LeadTimes, PickupConfig};
pub use eligibility::{PickupQuote, PickupRules};
pub use error::{CalendarError, PersistenceError, PersistenceResult, PickupError};
pub use overrides::{CalendarOverride, OverrideSet};
#[cfg(feature = "sqlite")]
pub use persistence::sqlite::SqliteCalendarStore;
pub use persistence::{
    CalendarStore, load_calendar_from_json, load_overrides_from_csv, save_calendar_to_json,
    save_overrides_to_csv,
};
pub use projection::{MonthProjection, project_month, project_schedule, project_week, week_start};
