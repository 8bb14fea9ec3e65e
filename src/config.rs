use crate::calendar::hm;
use crate::category::ProductCategory;
use crate::error::PersistenceResult;
use crate::time_format::hhmm;
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

/// Furthest ahead the storefront lets a customer book, in days from tomorrow.
pub const DEFAULT_SCAN_HORIZON_DAYS: u32 = 60;

/// Lead times, counted in open days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeadTimes {
    pub bread_before_noon: u32,
    pub bread_after_noon: u32,
    pub other_before_noon: u32,
    pub other_after_noon: u32,
}

impl Default for LeadTimes {
    fn default() -> Self {
        Self {
            bread_before_noon: 3,
            bread_after_noon: 4,
            other_before_noon: 1,
            other_after_noon: 2,
        }
    }
}

impl LeadTimes {
    pub fn for_category(&self, category: ProductCategory, before_noon: bool) -> u32 {
        match (category, before_noon) {
            (ProductCategory::Bread, true) => self.bread_before_noon,
            (ProductCategory::Bread, false) => self.bread_after_noon,
            (ProductCategory::Other, true) => self.other_before_noon,
            (ProductCategory::Other, false) => self.other_after_noon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickupConfig {
    pub scan_horizon_days: u32,
    /// Orders placed at or before this time use the before-noon lead time.
    #[serde(with = "hhmm")]
    pub noon_cutoff: NaiveTime,
    pub lead_times: LeadTimes,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            scan_horizon_days: DEFAULT_SCAN_HORIZON_DAYS,
            noon_cutoff: hm(12, 0),
            lead_times: LeadTimes::default(),
        }
    }
}

impl PickupConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PersistenceResult<Self> {
        let file = File::open(path)?;
        let config = serde_json::from_reader(file)?;
        Ok(config)
    }

    pub fn save_to_json_file<P: AsRef<Path>>(&self, path: P) -> PersistenceResult<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}
