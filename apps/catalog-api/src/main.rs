//! Catalog API - REST server over a database- or cache-backed product catalog

use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use std::time::Duration;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::{Config, SourceMode};
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    // Connect whichever backing service the selected source mode needs
    let (mongo, redis) = match config.catalog.source {
        SourceMode::Database => {
            let mongo_cfg = config
                .mongodb
                .clone()
                .ok_or_else(|| eyre::eyre!("database mode requires MongoDB configuration"))?;

            info!("Connecting to MongoDB at {}", mongo_cfg.url());
            let client = database::mongodb::connect_from_config_with_retry(&mongo_cfg, None).await?;
            info!(
                "Successfully connected to MongoDB database: {}",
                mongo_cfg.database()
            );

            (Some(client), None)
        }
        SourceMode::Cache => {
            let redis_cfg = config
                .redis
                .clone()
                .ok_or_else(|| eyre::eyre!("cache mode requires Redis configuration"))?;

            info!("Connecting to Redis at {}", redis_cfg.url());
            let conn = database::redis::connect_from_config_with_retry(redis_cfg, None).await?;

            (None, Some(conn))
        }
    };

    // Initialize the application state
    let state = AppState {
        config: config.clone(),
        mongo,
        redis,
    };

    // Build REST router
    let api_routes = api::routes(&state).await?;
    let router = axum_helpers::create_router::<openapi::ApiDoc>(api_routes).await?;
    let app = router.merge(health_router(config.app.clone()));

    info!(
        "Starting Catalog API in {} mode on port {}",
        config.catalog.source, config.server.port
    );

    // Run REST server with graceful shutdown
    create_production_app(app, &config.server, Duration::from_secs(30), async move {
        info!("Shutting down: closing backing connections");
        drop(state.mongo);
        drop(state.redis);
        info!("Backing connections closed");
    })
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Catalog API shutdown complete");
    Ok(())
}
