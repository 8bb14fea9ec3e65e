use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while turning storage records into calendar types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("invalid time '{0}' (expected HH:MM)")]
    InvalidTime(String),

    #[error("invalid date '{0}' (expected YYYY-MM-DD)")]
    InvalidDate(String),

    #[error("invalid date-time '{0}' (expected YYYY-MM-DDTHH:MM)")]
    InvalidDateTime(String),

    #[error("invalid weekly schedule: {0}")]
    InvalidWeeklySchedule(String),

    #[error("more than one override for {0}")]
    DuplicateOverride(NaiveDate),

    #[error("invalid month {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Reasons a requested pickup date is refused at order capture.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickupError {
    #[error("pickup date {requested} is not after the order date {today}")]
    NotInFuture {
        requested: NaiveDate,
        today: NaiveDate,
    },

    #[error("the bakery is closed on {0}")]
    Closed(NaiveDate),

    #[error("orders for {requested} closed at the end of {cutoff}")]
    CutoffPassed {
        requested: NaiveDate,
        cutoff: NaiveDate,
    },

    #[error("pickup date {requested} is too early, earliest is {earliest}")]
    TooEarly {
        requested: NaiveDate,
        earliest: NaiveDate,
    },
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "sqlite")]
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Calendar(#[from] CalendarError),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type PersistenceResult<T> = Result<T, PersistenceError>;
