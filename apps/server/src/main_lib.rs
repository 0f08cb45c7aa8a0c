use std::sync::Arc;
use std::time::Instant;

use crate::config::{Config, LogFormat};
use quotes_core::quotes::{QuoteService, QuoteServiceTrait};
use quotes_storage_sqlite::{db, QuoteRepository};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

pub struct AppState {
    pub quote_service: Arc<dyn QuoteServiceTrait + Send + Sync>,
    /// Process start, reported as uptime by the health endpoint.
    pub started_at: Instant,
}

impl AppState {
    pub fn new(quote_service: Arc<dyn QuoteServiceTrait + Send + Sync>) -> Self {
        Self {
            quote_service,
            started_at: Instant::now(),
        }
    }
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_current_span(false))
            .init(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(true).with_line_number(true))
            .init(),
    }
}

pub async fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let db_url = db::init(&config.database_url)?;
    tracing::info!("Database path in use: {}", db_url);

    let pool = db::create_pool(&db_url, &config.pool)?;
    db::run_migrations(&pool)?;
    let writer = db::spawn_writer(&db_url)?;
    tracing::info!(
        max_open = config.pool.max_open,
        max_idle = config.pool.max_idle,
        "Database connection pool ready"
    );

    let quote_repository = Arc::new(QuoteRepository::new(pool, writer));
    let quote_service: Arc<dyn QuoteServiceTrait + Send + Sync> =
        Arc::new(QuoteService::new(quote_repository));

    Ok(Arc::new(AppState::new(quote_service)))
}
