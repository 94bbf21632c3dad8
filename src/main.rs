use std::sync::Arc;

use actix_web::{App, HttpServer};
use anyhow::Context;
use hotel_api::app::{self, AppState};
use hotel_api::config::{AppConfig, Config, StoreBackend};
use hotel_api::middleware::RequestIdLogger;
use hotel_api::records::{InMemoryRecordStore, OdooRecordStore, RecordStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(app: &AppConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("hotel_api={},actix_web=info", app.log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if app.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Logging is configured from here on; earlier errors only reach stderr
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            return Err(e).context("Failed to load configuration");
        }
    };
    init_tracing(&config.app);

    if let Some(reason) = &config.cors_fallback {
        tracing::error!(error = %reason, "Invalid CORS configuration, using defaults");
    }

    config
        .validate()
        .context("Configuration validation failed")?;

    tracing::info!("Starting hotel booking API");
    tracing::info!("Environment: {}", config.app.env);
    tracing::info!("Server binding to: {}", config.server.bind_address());

    let clock = config.store.clock();
    let store: Arc<dyn RecordStore> = match config.store.backend {
        StoreBackend::Odoo => {
            tracing::info!(
                url = %config.store.odoo.url,
                database = %config.store.odoo.database,
                "Using Odoo record store"
            );
            Arc::new(
                OdooRecordStore::new(config.store.odoo.clone(), clock)
                    .context("Failed to build Odoo client")?,
            )
        }
        StoreBackend::Memory => {
            tracing::warn!("Using seeded in-memory record store; data is not persisted");
            Arc::new(InMemoryRecordStore::seeded(clock))
        }
    };

    if let Err(e) = store.ping().await {
        tracing::warn!("Record store is not reachable yet: {}", e);
    }

    let state = AppState::from_config(&config, store);
    let bind_address = config.server.bind_address();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdLogger)
            .configure(app::configure(state.clone()))
    })
    .workers(config.server.workers)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}
