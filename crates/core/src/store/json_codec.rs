use log::error;
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::KeyValueStoreTrait;
use crate::errors::{PersistenceError, Result};

/// Loads and decodes the JSON document stored under `key`.
///
/// A missing key yields `Ok(None)`. A present but undecodable value is a
/// [`PersistenceError::Malformed`]; it is never replaced by a default.
pub fn load_json<T: DeserializeOwned>(
    store: &dyn KeyValueStoreTrait,
    key: &str,
) -> Result<Option<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw).map(Some).map_err(|e| {
        error!("Stored value for '{}' is malformed: {}", key, e);
        PersistenceError::Malformed {
            key: key.to_string(),
            reason: e.to_string(),
        }
        .into()
    })
}

/// Encodes `value` as JSON and stores it under `key`.
pub async fn save_json<T: Serialize + Sync + ?Sized>(
    store: &dyn KeyValueStoreTrait,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value).map_err(|e| PersistenceError::Encoding {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    store.set(key, &raw).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::store::InMemoryStore;

    #[test]
    fn test_missing_key_is_none() {
        let store = InMemoryStore::new();
        let value: Option<Vec<String>> = load_json(&store, "absent").unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn test_malformed_value_is_reported() {
        let store = InMemoryStore::with_entries([("fund_transactions", "{not json")]);
        let result: Result<Option<Vec<String>>> = load_json(&store, "fund_transactions");
        match result {
            Err(Error::Persistence(PersistenceError::Malformed { key, .. })) => {
                assert_eq!(key, "fund_transactions")
            }
            other => panic!("expected malformed error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_shape_is_reported() {
        let store = InMemoryStore::with_entries([("fund_nav_cache", "[1, 2, 3]")]);
        let result: Result<Option<std::collections::HashMap<String, String>>> =
            load_json(&store, "fund_nav_cache");
        assert!(matches!(
            result,
            Err(Error::Persistence(PersistenceError::Malformed { .. }))
        ));
    }

    #[tokio::test]
    async fn test_save_then_load() {
        let store = InMemoryStore::new();
        save_json(&store, "k", &vec!["a".to_string()]).await.unwrap();
        let value: Option<Vec<String>> = load_json(&store, "k").unwrap();
        assert_eq!(value, Some(vec!["a".to_string()]));
    }
}
