use super::CalendarStore;
use crate::calendar::WeeklySchedule;
use crate::error::PersistenceResult;
use crate::overrides::{CalendarOverride, OverrideSet};
use crate::time_format::{
    format_date, format_time, parse_date, parse_optional_date, parse_optional_time,
};
use chrono::NaiveDate;
use rusqlite::{Connection, params};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;

pub struct SqliteCalendarStore {
    connection: Mutex<Connection>,
}

/// Raw column values of one `calendar_overrides` row.
struct OverrideRow {
    date: String,
    is_closed: bool,
    open_time: Option<String>,
    close_time: Option<String>,
    reason: Option<String>,
    cutoff_date: Option<String>,
}

impl OverrideRow {
    fn into_override(self) -> PersistenceResult<CalendarOverride> {
        Ok(CalendarOverride {
            date: parse_date(&self.date)?,
            is_closed: self.is_closed,
            open_time: parse_optional_time(self.open_time.as_deref().unwrap_or_default())?,
            close_time: parse_optional_time(self.close_time.as_deref().unwrap_or_default())?,
            reason: self.reason.filter(|r| !r.trim().is_empty()),
            cutoff_date: parse_optional_date(self.cutoff_date.as_deref().unwrap_or_default())?,
        })
    }
}

impl SqliteCalendarStore {
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> PersistenceResult<Self> {
        let connection = Connection::open(path)?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub fn in_memory() -> PersistenceResult<Self> {
        let connection = Connection::open_in_memory()?;
        Self::initialize_schema(&connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    fn initialize_schema(connection: &Connection) -> PersistenceResult<()> {
        let ddl = r#"
            CREATE TABLE IF NOT EXISTS settings (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS calendar_overrides (
                date TEXT PRIMARY KEY,
                is_closed INTEGER NOT NULL,
                open_time TEXT,
                close_time TEXT,
                reason TEXT,
                cutoff_date TEXT
            );
        "#;
        connection.execute_batch(ddl)?;
        Ok(())
    }
}

impl CalendarStore for SqliteCalendarStore {
    fn load_schedule(&self) -> PersistenceResult<WeeklySchedule> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare("SELECT key, value FROM settings")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;
        let mut settings = HashMap::new();
        for row in rows {
            let (key, value) = row?;
            settings.insert(key, value);
        }
        Ok(WeeklySchedule::from_settings(&settings)?)
    }

    fn save_schedule(&self, schedule: &WeeklySchedule) -> PersistenceResult<()> {
        let mut conn = self.connection.lock().expect("sqlite mutex poisoned");
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO settings (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            )?;
            for (key, value) in schedule.to_settings() {
                stmt.execute(params![key, value])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_overrides(&self) -> PersistenceResult<OverrideSet> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let mut stmt = conn.prepare(
            "SELECT date, is_closed, open_time, close_time, reason, cutoff_date
             FROM calendar_overrides ORDER BY date ASC",
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(OverrideRow {
                date: row.get(0)?,
                is_closed: row.get(1)?,
                open_time: row.get(2)?,
                close_time: row.get(3)?,
                reason: row.get(4)?,
                cutoff_date: row.get(5)?,
            })
        })?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_override()?);
        }
        debug!(count = records.len(), "loaded calendar overrides");
        Ok(OverrideSet::from_records(records)?)
    }

    fn upsert_override(&self, ov: &CalendarOverride) -> PersistenceResult<()> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        conn.execute(
            "INSERT INTO calendar_overrides
                 (date, is_closed, open_time, close_time, reason, cutoff_date)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(date) DO UPDATE SET
                 is_closed = excluded.is_closed,
                 open_time = excluded.open_time,
                 close_time = excluded.close_time,
                 reason = excluded.reason,
                 cutoff_date = excluded.cutoff_date",
            params![
                format_date(ov.date),
                ov.is_closed,
                ov.open_time.map(format_time),
                ov.close_time.map(format_time),
                ov.reason,
                ov.cutoff_date.map(format_date),
            ],
        )?;
        Ok(())
    }

    fn delete_override(&self, date: NaiveDate) -> PersistenceResult<bool> {
        let conn = self.connection.lock().expect("sqlite mutex poisoned");
        let removed = conn.execute(
            "DELETE FROM calendar_overrides WHERE date = ?1",
            params![format_date(date)],
        )?;
        Ok(removed > 0)
    }
}
