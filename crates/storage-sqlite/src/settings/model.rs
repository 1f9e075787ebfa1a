//! Database model for settings.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// Database model for a settings key-value pair
#[derive(Queryable, Selectable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(primary_key(key))]
#[serde(rename_all = "camelCase")]
pub struct SettingDB {
    pub key: String,
    pub value: String,
}
