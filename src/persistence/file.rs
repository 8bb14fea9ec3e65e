use crate::calendar::BakeryCalendar;
use crate::error::{PersistenceError, PersistenceResult};
use crate::overrides::{CalendarOverride, OverrideSet};
use crate::time_format::{
    format_date, format_time, parse_date, parse_optional_date, parse_optional_time,
};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use tracing::info;

pub fn save_calendar_to_json<P: AsRef<Path>>(
    calendar: &BakeryCalendar,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path.as_ref())?;
    serde_json::to_writer_pretty(file, calendar)?;
    info!(path = %path.as_ref().display(), overrides = calendar.overrides().len(), "calendar saved");
    Ok(())
}

pub fn load_calendar_from_json<P: AsRef<Path>>(path: P) -> PersistenceResult<BakeryCalendar> {
    let file = File::open(path.as_ref())?;
    let calendar: BakeryCalendar = serde_json::from_reader(file)?;
    info!(path = %path.as_ref().display(), overrides = calendar.overrides().len(), "calendar loaded");
    Ok(calendar)
}

#[derive(Default, Serialize, Deserialize)]
struct OverrideCsvRecord {
    date: String,
    is_closed: String,
    open_time: String,
    close_time: String,
    reason: String,
    cutoff_date: String,
}

impl From<&CalendarOverride> for OverrideCsvRecord {
    fn from(ov: &CalendarOverride) -> Self {
        Self {
            date: format_date(ov.date),
            is_closed: ov.is_closed.to_string(),
            open_time: ov.open_time.map(format_time).unwrap_or_default(),
            close_time: ov.close_time.map(format_time).unwrap_or_default(),
            reason: ov.reason.clone().unwrap_or_default(),
            cutoff_date: ov.cutoff_date.map(format_date).unwrap_or_default(),
        }
    }
}

impl OverrideCsvRecord {
    fn into_override(self) -> PersistenceResult<CalendarOverride> {
        let is_closed = match self.is_closed.trim().to_ascii_lowercase().as_str() {
            "true" => true,
            "false" => false,
            other => {
                return Err(PersistenceError::InvalidData(format!(
                    "invalid is_closed '{other}' for {}",
                    self.date
                )));
            }
        };
        Ok(CalendarOverride {
            date: parse_date(&self.date)?,
            is_closed,
            open_time: parse_optional_time(&self.open_time)?,
            close_time: parse_optional_time(&self.close_time)?,
            reason: if self.reason.trim().is_empty() {
                None
            } else {
                Some(self.reason)
            },
            cutoff_date: parse_optional_date(&self.cutoff_date)?,
        })
    }
}

pub fn save_overrides_to_csv<P: AsRef<Path>>(
    overrides: &OverrideSet,
    path: P,
) -> PersistenceResult<()> {
    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for ov in overrides.iter() {
        writer.serialize(OverrideCsvRecord::from(ov))?;
    }
    writer.flush()?;
    Ok(())
}

pub fn load_overrides_from_csv<P: AsRef<Path>>(path: P) -> PersistenceResult<OverrideSet> {
    let file = File::open(path)?;
    let mut reader = csv::Reader::from_reader(file);
    let mut records = Vec::new();
    for record in reader.deserialize::<OverrideCsvRecord>() {
        records.push(record?.into_override()?);
    }
    Ok(OverrideSet::from_records(records)?)
}
