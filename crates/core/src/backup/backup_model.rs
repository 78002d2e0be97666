use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Current snapshot layout version
pub const BACKUP_FORMAT_VERSION: u32 = 1;

/// Every keyed-store entry at one point in time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BackupSnapshot {
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    /// Store key -> decoded JSON document
    pub entries: BTreeMap<String, Value>,
}

fn default_format_version() -> u32 {
    BACKUP_FORMAT_VERSION
}

/// Name under which a snapshot for `date` is kept remotely.
pub fn backup_name_for(date: NaiveDate) -> String {
    format!("fundpilot-backup-{}.json", date.format("%Y-%m-%d"))
}

/// Outcome of restoring a snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RestoreSummary {
    pub restored_keys: Vec<String>,
}
