use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ai::AiProviderConfig;
use crate::errors::Result;

/// Settings key for the calendar timezone (IANA name).
pub const TIMEZONE_KEY: &str = "TIMEZONE";
/// Settings key for the daily report schedule (`HH:MM`).
pub const SCHEDULE_DAILY_KEY: &str = "schedule_daily";
/// Settings key for the weekly report schedule.
pub const SCHEDULE_WEEKLY_KEY: &str = "schedule_weekly";

/// Raw key/value view of every stored setting, unknown keys included.
pub type SettingsMap = BTreeMap<String, String>;

/// Typed view over the known settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub timezone: Option<String>,
    pub schedule_daily: Option<String>,
    pub schedule_weekly: Option<String>,
    pub ai_provider: AiProviderConfig,
}

impl AppSettings {
    pub fn from_map(settings: &SettingsMap) -> Result<Self> {
        let get = |key: &str| settings.get(key).filter(|v| !v.trim().is_empty()).cloned();
        Ok(Self {
            timezone: get(TIMEZONE_KEY),
            schedule_daily: get(SCHEDULE_DAILY_KEY),
            schedule_weekly: get(SCHEDULE_WEEKLY_KEY),
            ai_provider: AiProviderConfig::from_settings(settings)?,
        })
    }
}
