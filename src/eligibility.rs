use crate::calendar::BakeryCalendar;
use crate::category::ProductCategory;
use crate::config::PickupConfig;
use crate::error::PickupError;
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Earliest pickup answer for one category at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickupQuote {
    pub category: ProductCategory,
    pub now: NaiveDateTime,
    pub base_minimum_date: NaiveDate,
    pub earliest_date: NaiveDate,
}

/// Lead-time and deadline-extension rules for pickup dates.
///
/// Every method is a pure function of the calendar snapshot, the category and
/// the caller-supplied `now`; nothing here reads the clock.
#[derive(Debug, Clone, Default)]
pub struct PickupRules {
    config: PickupConfig,
}

impl PickupRules {
    pub fn new(config: PickupConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PickupConfig {
        &self.config
    }

    /// Where the open-day count starts and whether the before-noon lead time applies.
    ///
    /// An order placed on a closed day is treated as placed before noon on
    /// the next open day.
    fn count_start(&self, calendar: &BakeryCalendar, now: NaiveDateTime) -> (NaiveDate, bool) {
        let today = now.date();
        if calendar.is_open(today) {
            return (today, now.time() <= self.config.noon_cutoff);
        }
        match calendar.next_open_after(today) {
            Some(next) => (next, true),
            None => {
                warn!(%today, "calendar has no open day ahead, counting from today");
                (today, true)
            }
        }
    }

    /// Earliest date allowed by the normal lead-time rule, before any deadline extension.
    pub fn base_minimum_date(
        &self,
        calendar: &BakeryCalendar,
        category: ProductCategory,
        now: NaiveDateTime,
    ) -> NaiveDate {
        let (start, before_noon) = self.count_start(calendar, now);
        let lead = self.config.lead_times.for_category(category, before_noon);
        let base = match calendar.find_next_open(start, lead) {
            Some(date) => date,
            None => {
                warn!(%start, lead, "not enough open days ahead, falling back to calendar days");
                start + Duration::days(i64::from(lead))
            }
        };
        debug!(%category, %now, %start, before_noon, lead, %base, "computed base minimum date");
        base
    }

    /// Whether `date` may be picked given the already computed base minimum date.
    ///
    /// Closed days never qualify. Otherwise a date qualifies when it is on or
    /// after `base_minimum`, or when its override carries a cutoff date that
    /// has not passed yet at `now`.
    pub fn is_selectable(
        &self,
        calendar: &BakeryCalendar,
        date: NaiveDate,
        base_minimum: NaiveDate,
        now: NaiveDateTime,
    ) -> bool {
        if date <= now.date() || !calendar.is_open(date) {
            return false;
        }
        if date >= base_minimum {
            return true;
        }
        calendar
            .overrides()
            .get(date)
            .is_some_and(|ov| ov.extends_deadline_at(now))
    }

    /// First selectable date from tomorrow on, within the configured horizon.
    ///
    /// Falls back to the base minimum date when nothing in the horizon qualifies.
    pub fn earliest_selectable_date(
        &self,
        calendar: &BakeryCalendar,
        category: ProductCategory,
        now: NaiveDateTime,
    ) -> NaiveDate {
        let base = self.base_minimum_date(calendar, category, now);
        let today = now.date();
        for offset in 1..=i64::from(self.config.scan_horizon_days) {
            let candidate = today + Duration::days(offset);
            if self.is_selectable(calendar, candidate, base, now) {
                if candidate < base {
                    debug!(%candidate, %base, "deadline extension opens an earlier date");
                }
                return candidate;
            }
            trace!(%candidate, "not selectable");
        }
        warn!(
            horizon = self.config.scan_horizon_days,
            %base,
            "no selectable date within horizon, using base minimum date"
        );
        base
    }

    pub fn quote(
        &self,
        calendar: &BakeryCalendar,
        category: ProductCategory,
        now: NaiveDateTime,
    ) -> PickupQuote {
        PickupQuote {
            category,
            now,
            base_minimum_date: self.base_minimum_date(calendar, category, now),
            earliest_date: self.earliest_selectable_date(calendar, category, now),
        }
    }

    /// Order-capture check for a customer-chosen date.
    pub fn validate_pickup_date(
        &self,
        calendar: &BakeryCalendar,
        category: ProductCategory,
        requested: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<(), PickupError> {
        let today = now.date();
        if requested <= today {
            return Err(PickupError::NotInFuture { requested, today });
        }
        if !calendar.is_open(requested) {
            return Err(PickupError::Closed(requested));
        }
        let base = self.base_minimum_date(calendar, category, now);
        if requested >= base {
            return Ok(());
        }
        if let Some(ov) = calendar.overrides().get(requested) {
            if let Some(cutoff) = ov.cutoff_date {
                if ov.extends_deadline_at(now) {
                    return Ok(());
                }
                return Err(PickupError::CutoffPassed { requested, cutoff });
            }
        }
        Err(PickupError::TooEarly {
            requested,
            earliest: self.earliest_selectable_date(calendar, category, now),
        })
    }
}
