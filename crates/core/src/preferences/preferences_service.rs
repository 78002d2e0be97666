use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use crate::constants::store_keys;
use crate::errors::Result;
use crate::preferences::StrategyPreferences;
use crate::store::{load_json, save_json, KeyValueStoreTrait};

#[async_trait]
pub trait PreferencesServiceTrait: Send + Sync {
    /// Stored preferences, or defaults when none were saved yet.
    fn get_preferences(&self) -> Result<StrategyPreferences>;

    async fn update_preferences(&self, preferences: StrategyPreferences) -> Result<StrategyPreferences>;
}

pub struct PreferencesService {
    store: Arc<dyn KeyValueStoreTrait>,
}

impl PreferencesService {
    pub fn new(store: Arc<dyn KeyValueStoreTrait>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl PreferencesServiceTrait for PreferencesService {
    fn get_preferences(&self) -> Result<StrategyPreferences> {
        Ok(load_json(self.store.as_ref(), store_keys::PREFERENCES)?.unwrap_or_default())
    }

    async fn update_preferences(&self, preferences: StrategyPreferences) -> Result<StrategyPreferences> {
        preferences.validate()?;
        save_json(self.store.as_ref(), store_keys::PREFERENCES, &preferences).await?;
        debug!("Updated strategy preferences");
        Ok(preferences)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::store::InMemoryStore;
    use crate::transactions::Category;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults_when_missing() {
        let service = PreferencesService::new(Arc::new(InMemoryStore::new()));
        let prefs = service.get_preferences().unwrap();
        assert_eq!(prefs.default_budget, dec!(200));
        assert_eq!(prefs.boosted_budget, dec!(300));
    }

    #[test]
    fn test_partial_document_fills_defaults() {
        let store = InMemoryStore::with_entries([(
            store_keys::PREFERENCES,
            r#"{"preferredInstruments":{"gold":"000216"}}"#,
        )]);
        let prefs = PreferencesService::new(Arc::new(store)).get_preferences().unwrap();
        assert_eq!(prefs.preferred_instruments[&Category::Gold], "000216");
        assert_eq!(prefs.default_budget, dec!(200));
    }

    #[test]
    fn test_malformed_preferences_are_an_error() {
        let store = InMemoryStore::with_entries([(store_keys::PREFERENCES, "[]")]);
        let result = PreferencesService::new(Arc::new(store)).get_preferences();
        assert!(matches!(result, Err(Error::Persistence(_))));
    }

    #[tokio::test]
    async fn test_update_validates_and_persists() {
        let service = PreferencesService::new(Arc::new(InMemoryStore::new()));
        let mut prefs = StrategyPreferences::default();
        prefs.default_budget = dec!(500);
        prefs
            .preferred_instruments
            .insert(Category::Equity, "110022".to_string());
        service.update_preferences(prefs.clone()).await.unwrap();
        assert_eq!(service.get_preferences().unwrap(), prefs);

        prefs.boosted_budget = dec!(0);
        assert!(service.update_preferences(prefs).await.is_err());
    }
}
