use std::sync::Arc;

use currex_core::currencies::{parse_currency_catalog, CurrencyService, CurrencyServiceTrait};
use currex_core::fx::{ExchangeRate, ExchangeRateService, ExchangeRateServiceTrait};
use currex_core::updater::{
    ApplyFn, RateFetcher, RateSourceRepositoryTrait, RatesUpdater, SourceSchema, UpdaterRegistry,
};
use currex_core::{ErrorKind, Result};
use currex_storage_sqlite::{
    currencies::CurrencyRepository, db, fx::ExchangeRateRepository,
    rate_sources::RateSourceRepository,
};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::Config;
use crate::feed::JsonFeedFetcher;

pub struct AppState {
    pub currency_service: Arc<dyn CurrencyServiceTrait>,
    pub rate_service: Arc<dyn ExchangeRateServiceTrait>,
    pub registry: UpdaterRegistry,
    pub soft_failure_kind: ErrorKind,
    pub commit_stamp: bool,
    pub check_interval: std::time::Duration,
}

pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry
            .with(fmt::layer().json().with_current_span(false))
            .init();
    } else {
        registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init();
    }
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_path = db::init(&config.db_path)?;
    tracing::info!("Database path in use: {}", db_path);

    let pool = db::create_pool(&db_path)?;
    db::run_migrations(&pool)?;

    let currency_repository = Arc::new(CurrencyRepository::new(pool.clone()));
    let rate_repository = Arc::new(ExchangeRateRepository::new(pool.clone()));
    let source_repository = Arc::new(RateSourceRepository::new(
        pool.clone(),
        SourceSchema::default(),
    )?);

    let currency_service = Arc::new(CurrencyService::new(currency_repository.clone()));
    let rate_service = Arc::new(ExchangeRateService::new(
        currency_repository,
        rate_repository,
    ));

    if let Some(catalog_path) = &config.seed_catalog {
        let payload = std::fs::read_to_string(catalog_path)?;
        let catalog = parse_currency_catalog(&payload)?;
        let inserted = currency_service.seed_currencies(&catalog)?;
        tracing::info!(
            "Seeded {} of {} catalog currencies from {}",
            inserted,
            catalog.len(),
            catalog_path.display()
        );
    }

    if let Some(feed_path) = &config.feed_path {
        register_feed(
            source_repository.as_ref(),
            feed_path,
            config.feed_days_valid,
        )?;
    }

    let fetcher: Arc<dyn RateFetcher> = Arc::new(JsonFeedFetcher::new(config.feed_timeout));
    let mut registry = UpdaterRegistry::new();
    for source_id in source_repository.source_ids()? {
        registry.register(RatesUpdater::new(
            source_id,
            source_repository.clone(),
            fetcher.clone(),
            upsert_rate(rate_service.clone()),
        )?)?;
    }

    Ok(Arc::new(AppState {
        currency_service,
        rate_service,
        registry,
        soft_failure_kind: config.soft_failure_kind,
        commit_stamp: config.commit_stamp,
        check_interval: config.check_interval,
    }))
}

/// Adds `feed_path` as a rate source unless a source already points at it.
fn register_feed(
    sources: &dyn RateSourceRepositoryTrait,
    feed_path: &str,
    days_valid: i32,
) -> Result<i32> {
    for source_id in sources.source_ids()? {
        if sources.get_source_path(source_id)?.as_deref() == Some(feed_path) {
            return Ok(source_id);
        }
    }
    let source = sources.add_source(feed_path, days_valid)?;
    tracing::info!(
        "Registered rate source {} for {}",
        source.source_id,
        feed_path
    );
    Ok(source.source_id)
}

/// Applies fetched rates as updates, inserting pairs the store has not seen yet.
fn upsert_rate(rates: Arc<dyn ExchangeRateServiceTrait>) -> ApplyFn {
    Arc::new(move |rate: &ExchangeRate| match rates.update_rate(rate) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NoRecordToModify => rates.add_rate(rate).map(|_| ()),
        Err(e) => Err(e),
    })
}
