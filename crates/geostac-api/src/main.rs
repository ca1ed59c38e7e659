use std::sync::Arc;

use anyhow::Context;
use geostac_api::config::ApiConfig;
use geostac_api::router::{cors_layer, create_router};
use geostac_api::state::AppState;
use geostac_stac::{StacClient, StacConfig};
use geostac_store::{FieldStore, MemoryFieldStore, PostgresConfig, PostgresStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "geostac_api=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ApiConfig::from_env();
    let catalog_config = config.catalog_config().context("Invalid catalog configuration")?;

    tracing::info!(
        port = config.port,
        catalog_url = %catalog_config.catalog_url.value,
        collection = %catalog_config.collection.value,
        max_cloud_cover = catalog_config.max_cloud_cover.value,
        "Starting GeoSTAC API server"
    );

    let store: Arc<dyn FieldStore> = match &config.database_url {
        Some(database_url) => {
            tracing::info!("DATABASE_URL found, connecting to PostgreSQL...");
            let store = init_postgres_storage(database_url).await.context(
                "Failed to initialise PostgreSQL storage. \
                 Ensure PostgreSQL with PostGIS is running and DATABASE_URL is correct",
            )?;
            Arc::new(store)
        }
        None => {
            tracing::info!("Using in-memory storage (set DATABASE_URL for PostgreSQL)");
            Arc::new(MemoryFieldStore::new())
        }
    };

    let catalog = StacClient::new(StacConfig::from_layered(&catalog_config))
        .context("Failed to create imagery catalog client")?;

    let state = Arc::new(AppState::new(store, Arc::new(catalog)));
    let app = create_router(state).layer(cors_layer(&config.cors_origin)?);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("Listening on {}", addr);
    tracing::info!("CORS enabled for {}", config.cors_origin);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

/// Connect to PostgreSQL and bring the schema up to date
async fn init_postgres_storage(database_url: &str) -> anyhow::Result<PostgresStore> {
    let config = PostgresConfig::new(database_url).context("Invalid DATABASE_URL")?;
    let store = PostgresStore::connect(config).await?;
    store.create_schema().await?;
    Ok(store)
}
