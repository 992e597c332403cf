// Main entry point for the harvester server

use std::sync::Arc;

use anyhow::{Context, Result};
use harvester_core::kernel::{
    DataForSeoProvider, HttpWebhookClient, LocalRawStore, PostgresSourceSet, ServerDeps,
};
use harvester_core::{server::build_app, Config};
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,harvester_core=debug,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting DataForSEO harvester");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        connector = %config.connector_name,
        raw_store_root = %config.raw_store_root.display(),
        "Configuration loaded"
    );

    // Connect to database
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let server_deps = ServerDeps::new(
        Arc::new(PostgresSourceSet::new(pool.clone())),
        Arc::new(LocalRawStore::new(config.raw_store_root.clone())),
        Arc::new(DataForSeoProvider::new(
            config.dataforseo_login.clone(),
            config.dataforseo_password.clone(),
            config.dataforseo_base_url.clone(),
        )),
        Arc::new(HttpWebhookClient::new()),
    )
    .with_connector_name(config.connector_name.clone());

    // Build application
    let app = build_app(Arc::new(server_deps), Some(pool));

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
