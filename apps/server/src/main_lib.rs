use std::sync::Arc;

use chrono_tz::Tz;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{Config, PriceSource};
use leverfolio_core::{
    ledger::{LedgerService, LedgerServiceTrait},
    portfolio::{PortfolioService, PortfolioServiceTrait},
    quotes::{MarketDataPriceProvider, PriceProviderTrait, StaticPriceProvider},
    recommendations::{RecommendationService, RecommendationServiceTrait},
    settings::{SettingsRepositoryTrait, SettingsService, SettingsServiceTrait, TIMEZONE_KEY},
    utils::time_utils::resolve_timezone,
};
use leverfolio_market_data::YahooProvider;
use leverfolio_storage_sqlite::{
    db, DailySnapshotRepository, LedgerRepository, RecommendationRepository, SettingsRepository,
};

pub struct AppState {
    pub ledger_service: Arc<dyn LedgerServiceTrait>,
    pub portfolio_service: Arc<dyn PortfolioServiceTrait>,
    pub settings_service: Arc<dyn SettingsServiceTrait>,
    pub recommendation_service: Arc<dyn RecommendationServiceTrait>,
    pub timezone: Tz,
}

pub fn init_tracing() {
    let log_format = std::env::var("LF_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
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

fn price_provider_for(config: &Config) -> anyhow::Result<Arc<dyn PriceProviderTrait>> {
    Ok(match config.price_source {
        PriceSource::Yahoo => {
            let yahoo = YahooProvider::new().map_err(anyhow::Error::new)?;
            Arc::new(MarketDataPriceProvider::new(Arc::new(yahoo)))
        }
        PriceSource::None => Arc::new(StaticPriceProvider::empty()),
    })
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let prices = price_provider_for(config)?;
    build_state_with_prices(config, prices).await
}

/// Wires every repository and service against the database at `config.db_path`.
///
/// A `TIMEZONE` value stored in settings takes precedence over `LF_TIMEZONE`.
pub async fn build_state_with_prices(
    config: &Config,
    price_provider: Arc<dyn PriceProviderTrait>,
) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer((*pool).clone());

    let settings_repo = Arc::new(SettingsRepository::new(pool.clone(), writer.clone()));
    let stored_timezone = settings_repo
        .get_settings()?
        .get(TIMEZONE_KEY)
        .filter(|v| !v.trim().is_empty())
        .cloned();
    let timezone = resolve_timezone(Some(
        stored_timezone.as_deref().unwrap_or(config.timezone.as_str()),
    ));
    tracing::info!("Calendar timezone: {}", timezone);

    let ledger_repo = Arc::new(LedgerRepository::new(pool.clone(), writer.clone()));
    let snapshot_repo = Arc::new(DailySnapshotRepository::new(pool.clone(), writer.clone()));
    let recommendation_repo = Arc::new(RecommendationRepository::new(pool.clone(), writer));

    let ledger_service = Arc::new(LedgerService::new(ledger_repo.clone(), timezone));
    let portfolio_service = Arc::new(PortfolioService::new(
        ledger_repo,
        snapshot_repo,
        price_provider.clone(),
        timezone,
    ));
    let settings_service = Arc::new(SettingsService::new(settings_repo));
    let recommendation_service = Arc::new(RecommendationService::new(
        recommendation_repo,
        price_provider,
        timezone,
    ));

    Ok(Arc::new(AppState {
        ledger_service,
        portfolio_service,
        settings_service,
        recommendation_service,
        timezone,
    }))
}
