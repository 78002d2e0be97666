use std::path::Path;
use std::sync::Arc;

use chrono_tz::Tz;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use fundpilot_core::{
    backup::{BackupService, BackupServiceTrait},
    market_data::{PriceProvider, PriceService, PriceServiceTrait},
    portfolio::{HoldingsService, HoldingsServiceTrait},
    preferences::{PreferencesService, PreferencesServiceTrait},
    store::KeyValueStoreTrait,
    strategy::{StrategyService, StrategyServiceTrait},
    transactions::{LedgerService, LedgerServiceTrait},
};
use fundpilot_market_data::{FundDataProvider, FundDataProviderConfig};
use fundpilot_storage_sqlite::{db, SqliteStore};

pub struct AppState {
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub price_service: Arc<dyn PriceServiceTrait>,
    pub holdings_service: Arc<dyn HoldingsServiceTrait>,
    pub preferences_service: Arc<dyn PreferencesServiceTrait>,
    pub strategy_service: Arc<dyn StrategyServiceTrait>,
    pub backup_service: Arc<dyn BackupServiceTrait>,
    /// Timezone that defines "today" for plans and weekly performance
    pub market_timezone: Tz,
}

pub fn init_tracing(log_format: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if log_format.eq_ignore_ascii_case("json") {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

/// Wires every service over one keyed store and one price provider.
pub fn build_services(
    store: Arc<dyn KeyValueStoreTrait>,
    provider: Arc<dyn PriceProvider>,
    market_timezone: Tz,
) -> Arc<AppState> {
    let ledger_service: Arc<dyn LedgerServiceTrait> = Arc::new(LedgerService::new(store.clone()));
    let price_service: Arc<dyn PriceServiceTrait> =
        Arc::new(PriceService::new(provider, store.clone()));

    match price_service.load_cache() {
        Ok(count) => tracing::info!("Loaded cached price history for {} instruments", count),
        Err(e) => tracing::warn!("Starting with an empty price cache: {}", e),
    }

    let preferences_service: Arc<dyn PreferencesServiceTrait> =
        Arc::new(PreferencesService::new(store.clone()));
    let holdings_service: Arc<dyn HoldingsServiceTrait> = Arc::new(HoldingsService::new(
        ledger_service.clone(),
        price_service.clone(),
    ));
    let strategy_service: Arc<dyn StrategyServiceTrait> = Arc::new(StrategyService::new(
        ledger_service.clone(),
        price_service.clone(),
        preferences_service.clone(),
    ));
    let backup_service: Arc<dyn BackupServiceTrait> = Arc::new(BackupService::new(store));

    Arc::new(AppState {
        ledger_service,
        price_service,
        holdings_service,
        preferences_service,
        strategy_service,
        backup_service,
        market_timezone,
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    // Keep the storage crate on the configured file
    std::env::set_var("DATABASE_URL", &config.db_path);
    let data_dir = Path::new(&config.db_path)
        .parent()
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| ".".to_string());
    let db_path = db::init(&data_dir)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());
    let store: Arc<dyn KeyValueStoreTrait> = Arc::new(SqliteStore::new(pool, writer));

    let mut provider_config = FundDataProviderConfig {
        timeout: config.request_timeout,
        market_timezone: config.market_timezone,
        ..FundDataProviderConfig::default()
    };
    if let Some(url) = &config.history_base_url {
        provider_config.history_base_url = url.clone();
    }
    if let Some(url) = &config.realtime_base_url {
        provider_config.realtime_base_url = url.clone();
    }
    let provider: Arc<dyn PriceProvider> = Arc::new(FundDataProvider::new(provider_config));

    Ok(build_services(store, provider, config.market_timezone))
}
