//! Repository traits for settings.

use async_trait::async_trait;

use super::SettingsMap;
use crate::errors::Result;

/// Repository trait for managing application settings.
#[async_trait]
pub trait SettingsRepositoryTrait: Send + Sync {
    /// Get all settings.
    fn get_settings(&self) -> Result<SettingsMap>;

    /// Get a single setting value by key. Missing keys yield `DatabaseError::NotFound`.
    fn get_setting(&self, setting_key: &str) -> Result<String>;

    /// Insert or replace a single setting.
    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()>;

    /// Insert or replace multiple settings in one write.
    async fn update_settings(&self, new_settings: &SettingsMap) -> Result<()>;
}
