use crate::cli::{DbArgs, DbCommand, StorageBackend};
use crate::output::OutputWriter;
use crate::output_types::{HealthOutput, MigrationOutput, SchemaOutput};
use crate::storage;
use anyhow::{bail, Context, Result};

/// Execute database management commands
pub async fn execute(args: &DbArgs, backend: StorageBackend, output: &OutputWriter) -> Result<()> {
    match args.command {
        DbCommand::Init => execute_init(backend, output).await,
        DbCommand::Drop => execute_drop(backend, output).await,
        DbCommand::Health => execute_health(backend, output).await,
    }
}

fn backend_name(backend: StorageBackend) -> String {
    match backend {
        StorageBackend::Memory => "memory".to_string(),
        StorageBackend::Postgres => "postgres".to_string(),
    }
}

async fn execute_init(backend: StorageBackend, output: &OutputWriter) -> Result<()> {
    let migrations = match backend {
        StorageBackend::Memory => {
            output.warning("The in-memory store is discarded when this command exits");
            let store = storage::open(backend).await?;
            store.create_schema().await.context("Failed to create field table")?;
            Vec::new()
        }
        StorageBackend::Postgres => {
            let store = storage::open_postgres().await?;
            geostac_store::FieldStore::create_schema(&store)
                .await
                .context("Failed to create field table")?;

            store
                .migration_status()
                .await
                .context("Failed to read migration status")?
                .into_iter()
                .map(|m| MigrationOutput {
                    version: m.version,
                    description: m.description,
                    applied: m.applied,
                })
                .collect()
        }
    };

    if output.is_json() {
        output.result(SchemaOutput {
            backend: backend_name(backend),
            action: "created",
            migrations,
        })?;
    } else {
        output.success("Field table ready");
        if !migrations.is_empty() {
            output.section("Migrations");
            output.table(migrations, ())?;
        }
    }

    Ok(())
}

async fn execute_drop(backend: StorageBackend, output: &OutputWriter) -> Result<()> {
    let store = storage::open(backend).await?;
    store.drop_schema().await.context("Failed to drop field table")?;

    if output.is_json() {
        output.result(SchemaOutput {
            backend: backend_name(backend),
            action: "dropped",
            migrations: Vec::new(),
        })?;
    } else {
        output.success("Field table dropped");
    }

    Ok(())
}

async fn execute_health(backend: StorageBackend, output: &OutputWriter) -> Result<()> {
    let store = storage::open(backend).await?;
    let database = store.health_check().await;

    if output.is_json() {
        output.result(HealthOutput { backend: backend_name(backend), database })?;
    } else {
        output.kv("Backend", backend_name(backend));
        output.kv("Database", if database { "ok" } else { "unavailable" });
    }

    if !database {
        bail!("Field store health check failed");
    }

    Ok(())
}
