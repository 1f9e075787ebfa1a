use super::{AppSettings, SettingsMap, SettingsRepositoryTrait};
use crate::ai::AiProviderConfig;
use crate::errors::{DatabaseError, Error, Result, ValidationError};
use async_trait::async_trait;
use log::debug;
use std::sync::Arc;

// Define the trait for SettingsService
#[async_trait]
pub trait SettingsServiceTrait: Send + Sync {
    fn get_settings(&self) -> Result<SettingsMap>;

    fn get_app_settings(&self) -> Result<AppSettings>;

    fn get_ai_provider_config(&self) -> Result<AiProviderConfig>;

    /// Get a single setting value by key. Returns None if not found.
    fn get_setting_value(&self, key: &str) -> Result<Option<String>>;

    /// Set a single setting value by key.
    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()>;

    /// Set several settings at once. Keys not mentioned are left alone.
    async fn update_settings(&self, new_settings: &SettingsMap) -> Result<()>;
}

pub struct SettingsService {
    settings_repository: Arc<dyn SettingsRepositoryTrait>,
}

impl SettingsService {
    pub fn new(settings_repository: Arc<dyn SettingsRepositoryTrait>) -> Self {
        SettingsService {
            settings_repository,
        }
    }
}

fn validate_key(key: &str) -> Result<()> {
    if key.trim().is_empty() {
        return Err(ValidationError::MissingField("key".to_string()).into());
    }
    Ok(())
}

impl SettingsService {
    /// Rejects a change that would leave the known settings unreadable, such
    /// as an unsupported AI provider, before anything is written.
    fn validate_merged(&self, changes: &SettingsMap) -> Result<()> {
        let mut merged = self.settings_repository.get_settings()?;
        merged.extend(changes.clone());
        AppSettings::from_map(&merged).map(|_| ())
    }
}

// Implement the trait for SettingsService
#[async_trait]
impl SettingsServiceTrait for SettingsService {
    fn get_settings(&self) -> Result<SettingsMap> {
        self.settings_repository.get_settings()
    }

    fn get_app_settings(&self) -> Result<AppSettings> {
        AppSettings::from_map(&self.settings_repository.get_settings()?)
    }

    fn get_ai_provider_config(&self) -> Result<AiProviderConfig> {
        AiProviderConfig::from_settings(&self.settings_repository.get_settings()?)
    }

    fn get_setting_value(&self, key: &str) -> Result<Option<String>> {
        match self.settings_repository.get_setting(key) {
            Ok(value) => Ok(Some(value)),
            Err(Error::Database(DatabaseError::NotFound(_))) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn set_setting_value(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.validate_merged(&SettingsMap::from([(key.to_string(), value.to_string())]))?;
        debug!("Updating setting {}", key);
        self.settings_repository.update_setting(key, value).await
    }

    async fn update_settings(&self, new_settings: &SettingsMap) -> Result<()> {
        for key in new_settings.keys() {
            validate_key(key)?;
        }
        self.validate_merged(new_settings)?;
        debug!("Updating {} settings", new_settings.len());
        self.settings_repository.update_settings(new_settings).await
    }
}
