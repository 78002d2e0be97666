//! Database model for keyed store entries.

use diesel::prelude::*;

/// One row of `app_store`; the value is an opaque JSON document.
#[derive(Queryable, Insertable, Debug, Clone)]
#[diesel(table_name = crate::schema::app_store)]
pub struct AppStoreEntryDB {
    pub store_key: String,
    pub store_value: String,
    pub updated_at: String,
}

impl AppStoreEntryDB {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            store_key: key.to_string(),
            store_value: value.to_string(),
            updated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
