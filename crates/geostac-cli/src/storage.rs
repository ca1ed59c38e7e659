use crate::cli::StorageBackend;
use anyhow::{Context, Result};
use geostac_store::{FieldStore, MemoryFieldStore, PostgresConfig, PostgresStore};
use std::sync::Arc;

/// Parse database URL to extract connection details for error messages
fn parse_database_url(url: &str) -> (String, String, String) {
    let authority = url.split('@').nth(1).and_then(|s| s.split('/').next());

    let host = authority
        .and_then(|s| s.split(':').next())
        .unwrap_or("localhost")
        .to_string();

    let port = authority
        .and_then(|s| s.split(':').nth(1))
        .unwrap_or("5432")
        .to_string();

    let database = url
        .split('/')
        .next_back()
        .and_then(|s| s.split('?').next())
        .unwrap_or("geostac")
        .to_string();

    (host, port, database)
}

/// Open the selected field store
pub async fn open(backend: StorageBackend) -> Result<Arc<dyn FieldStore>> {
    match backend {
        StorageBackend::Memory => {
            tracing::debug!("Using in-memory field store");
            Ok(Arc::new(MemoryFieldStore::new()))
        }
        StorageBackend::Postgres => Ok(Arc::new(open_postgres().await?)),
    }
}

/// Connect to PostgreSQL using DATABASE_URL
pub async fn open_postgres() -> Result<PostgresStore> {
    let config = PostgresConfig::from_env().context(
        "Failed to load PostgreSQL configuration. Set DATABASE_URL environment variable.",
    )?;

    PostgresStore::connect(config.clone()).await.map_err(|e| {
        let (host, port, database) = parse_database_url(&config.database_url);

        anyhow::anyhow!(
            "Failed to connect to PostgreSQL\n\n\
                Connection details:\n\
                  Host: {}\n\
                  Port: {}\n\
                  Database: {}\n\n\
                Remediation:\n\
                  1. Ensure PostgreSQL with PostGIS is running\n\
                  2. Check DATABASE_URL environment variable\n\
                  3. Verify credentials and database exists\n\
                  4. Create the table: geostac db init --storage postgres\n\n\
                Error: {}",
            host,
            port,
            database,
            e
        )
    })
}
