//! PostgreSQL/PostGIS storage adapter implementation

pub mod config;
pub mod migrations;
pub mod transaction;

pub use config::{ConfigError, PoolConfig, PostgresConfig};
pub use migrations::{MigrationError, MigrationManager, MigrationStatus};
pub use transaction::{Transaction, TransactionManager};

use async_trait::async_trait;
use geostac_core::error::{GeostacError, Result};
use geostac_core::models::{Field, FieldId, Imagery, Insertion, NewField};
use geostac_geo::codec::canonical_wkt;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::ports::FieldStore;

const FIELD_COLUMNS: &str = "id, name, ST_AsText(geom) AS geom, image_url, image_date";

/// Row shape shared by every field query
type FieldRow = (i32, String, String, Option<String>, Option<String>);

fn field_from_row((id, name, geom, image_url, image_date): FieldRow) -> Result<Field> {
    let geom = canonical_wkt(&geom).map_err(|e| {
        GeostacError::Store(format!("Stored geometry of field {} is unreadable: {}", id, e))
    })?;

    Ok(Field {
        id: FieldId(i64::from(id)),
        name,
        geom,
        imagery: Imagery::from_columns(image_url, image_date),
    })
}

fn store_error(action: &str, e: sqlx::Error) -> GeostacError {
    GeostacError::Store(format!("Failed to {}: {}", action, e))
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::Database(db) if db.is_unique_violation())
}

/// PostgreSQL storage adapter
pub struct PostgresStore {
    pool: PgPool,
    transactions: TransactionManager,
}

impl PostgresStore {
    /// Connect to the database described by `config`
    pub async fn connect(config: PostgresConfig) -> Result<Self> {
        config.validate().map_err(|e| GeostacError::ConfigInvalid {
            key: "database_url".to_string(),
            reason: e.to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .min_connections(config.pool.min_connections)
            .max_connections(config.pool.max_connections)
            .acquire_timeout(config.pool.acquire_timeout)
            .idle_timeout(config.pool.idle_timeout)
            .max_lifetime(config.pool.max_lifetime)
            .connect(&config.database_url)
            .await
            .map_err(|e| store_error("connect to database", e))?;

        // Test connection by executing a simple query
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .map_err(|e| store_error("verify database connection", e))?;

        tracing::info!(
            max_connections = config.pool.max_connections,
            "Connected to PostgreSQL"
        );

        let transactions = TransactionManager::new(pool.clone(), config.transaction_timeout);
        Ok(Self { pool, transactions })
    }

    /// Status of every embedded migration
    pub async fn migration_status(&self) -> Result<Vec<MigrationStatus>> {
        MigrationManager::new(self.pool.clone())
            .check_status()
            .await
            .map_err(|e| GeostacError::Store(format!("Failed to check migration status: {}", e)))
    }
}

#[async_trait]
impl FieldStore for PostgresStore {
    async fn find_exact(&self, wkt: &str) -> Result<Option<Field>> {
        let sql = format!(
            "SELECT {} FROM geo_fields WHERE ST_Equals(geom, ST_GeomFromText($1)) \
             ORDER BY id LIMIT 1",
            FIELD_COLUMNS
        );

        let row: Option<FieldRow> = sqlx::query_as(&sql)
            .bind(wkt)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("look up field by geometry", e))?;

        row.map(field_from_row).transpose()
    }

    async fn insert(&self, field: &NewField) -> Result<Insertion> {
        let sql = format!(
            "INSERT INTO geo_fields (name, geom, image_url, image_date) \
             VALUES ($1, ST_GeomFromText($2), $3, $4) RETURNING {}",
            FIELD_COLUMNS
        );

        let mut tx = self.transactions.begin().await?;
        let result: std::result::Result<FieldRow, sqlx::Error> = sqlx::query_as(&sql)
            .bind(&field.name)
            .bind(&field.geom)
            .bind(field.imagery.as_ref().map(|i| i.url.as_str()))
            .bind(field.imagery.as_ref().map(|i| i.date.as_str()))
            .fetch_one(tx.connection()?)
            .await;

        match result {
            Ok(row) => {
                tx.commit().await?;
                Ok(Insertion::Inserted(field_from_row(row)?))
            }
            Err(e) if is_unique_violation(&e) => {
                tx.rollback().await?;
                tracing::debug!(name = %field.name, "Duplicate field name, insert rolled back");
                Ok(Insertion::Conflict { name: field.name.clone() })
            }
            Err(e) => {
                tx.rollback().await?;
                Err(store_error("insert field", e))
            }
        }
    }

    async fn update_imagery(&self, id: FieldId, imagery: &Imagery) -> Result<Field> {
        let sql = format!(
            "UPDATE geo_fields SET image_url = $1, image_date = $2 WHERE id = $3 RETURNING {}",
            FIELD_COLUMNS
        );
        let row_id = i32::try_from(id.0)
            .map_err(|_| GeostacError::Store(format!("Field id {} is out of range", id)))?;

        let mut tx = self.transactions.begin().await?;
        let row: Option<FieldRow> = sqlx::query_as(&sql)
            .bind(&imagery.url)
            .bind(&imagery.date)
            .bind(row_id)
            .fetch_optional(tx.connection()?)
            .await
            .map_err(|e| store_error("update field imagery", e))?;

        let Some(row) = row else {
            tx.rollback().await?;
            return Err(GeostacError::Store(format!("Field {} not found", id)));
        };

        tx.commit().await?;
        field_from_row(row)
    }

    async fn list_all(&self) -> Result<Vec<Field>> {
        let sql = format!("SELECT {} FROM geo_fields ORDER BY id", FIELD_COLUMNS);

        let rows: Vec<FieldRow> = sqlx::query_as(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("list fields", e))?;

        rows.into_iter().map(field_from_row).collect()
    }

    async fn find_intersecting(&self, wkt: &str) -> Result<Vec<Field>> {
        let sql = format!(
            "SELECT {} FROM geo_fields WHERE ST_Intersects(geom, ST_GeomFromText($1)) ORDER BY id",
            FIELD_COLUMNS
        );

        let rows: Vec<FieldRow> = sqlx::query_as(&sql)
            .bind(wkt)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| store_error("query intersecting fields", e))?;

        rows.into_iter().map(field_from_row).collect()
    }

    async fn create_schema(&self) -> Result<()> {
        MigrationManager::new(self.pool.clone())
            .run_migrations()
            .await
            .map_err(|e| GeostacError::Store(format!("Failed to create schema: {}", e)))?;
        tracing::info!("Field schema is up to date");
        Ok(())
    }

    async fn drop_schema(&self) -> Result<()> {
        MigrationManager::new(self.pool.clone())
            .undo_all()
            .await
            .map_err(|e| GeostacError::Store(format!("Failed to drop schema: {}", e)))?;
        tracing::info!("Field schema dropped");
        Ok(())
    }

    async fn health_check(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                false
            }
        }
    }
}
