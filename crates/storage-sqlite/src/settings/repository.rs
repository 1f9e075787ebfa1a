use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::SettingDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{IntoCore, StorageError};
use crate::schema::settings;
use leverfolio_core::errors::{DatabaseError, Result};
use leverfolio_core::settings::{SettingsMap, SettingsRepositoryTrait};

pub struct SettingsRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl SettingsRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        SettingsRepository { pool, writer }
    }
}

#[async_trait]
impl SettingsRepositoryTrait for SettingsRepository {
    fn get_settings(&self) -> Result<SettingsMap> {
        let mut conn = get_connection(&self.pool)?;
        let all_settings = settings::table
            .select((settings::key, settings::value))
            .load::<(String, String)>(&mut conn)
            .into_core()?;
        Ok(all_settings.into_iter().collect())
    }

    fn get_setting(&self, setting_key: &str) -> Result<String> {
        let mut conn = get_connection(&self.pool)?;
        settings::table
            .find(setting_key)
            .select(settings::value)
            .first::<String>(&mut conn)
            .optional()
            .into_core()?
            .ok_or_else(|| DatabaseError::NotFound(format!("Setting {}", setting_key)).into())
    }

    async fn update_setting(&self, setting_key: &str, setting_value: &str) -> Result<()> {
        let row = SettingDB {
            key: setting_key.to_string(),
            value: setting_value.to_string(),
        };
        self.writer
            .exec(move |conn| {
                diesel::replace_into(settings::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }

    async fn update_settings(&self, new_settings: &SettingsMap) -> Result<()> {
        let rows: Vec<SettingDB> = new_settings
            .iter()
            .map(|(k, v)| SettingDB {
                key: k.clone(),
                value: v.clone(),
            })
            .collect();
        self.writer
            .exec(move |conn| {
                for row in &rows {
                    diesel::replace_into(settings::table)
                        .values(row)
                        .execute(conn)
                        .map_err(StorageError::from)?;
                }
                Ok(())
            })
            .await
    }
}
