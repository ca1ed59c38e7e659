use geostac_core::error::{GeostacError, Result};
use sqlx::{PgConnection, PgPool, Postgres, Transaction as SqlxTransaction};
use std::time::Duration;
use tokio::time::timeout;

/// A single-write transaction with bounded commit and rollback
pub struct Transaction {
    inner: Option<SqlxTransaction<'static, Postgres>>,
    timeout_duration: Duration,
}

impl Transaction {
    /// Connection to run statements on within this transaction
    pub fn connection(&mut self) -> Result<&mut PgConnection> {
        self.inner
            .as_deref_mut()
            .ok_or_else(|| GeostacError::Store("Transaction already completed".to_string()))
    }

    /// Commit the transaction, making all changes permanent
    pub async fn commit(mut self) -> Result<()> {
        let tx = self
            .inner
            .take()
            .ok_or_else(|| GeostacError::Store("Transaction already completed".to_string()))?;

        match timeout(self.timeout_duration, tx.commit()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(GeostacError::Store(format!("Failed to commit transaction: {}", e))),
            Err(_) => Err(GeostacError::Store(format!(
                "Transaction commit timeout after {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }

    /// Rollback the transaction, discarding all changes
    pub async fn rollback(mut self) -> Result<()> {
        let tx = self
            .inner
            .take()
            .ok_or_else(|| GeostacError::Store("Transaction already completed".to_string()))?;

        match timeout(self.timeout_duration, tx.rollback()).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => {
                Err(GeostacError::Store(format!("Failed to rollback transaction: {}", e)))
            }
            Err(_) => Err(GeostacError::Store(format!(
                "Transaction rollback timeout after {}s",
                self.timeout_duration.as_secs()
            ))),
        }
    }
}

/// Begins transactions on the store's pool with a fixed timeout
pub struct TransactionManager {
    pool: PgPool,
    default_timeout: Duration,
}

impl TransactionManager {
    /// Create a new transaction manager
    pub fn new(pool: PgPool, default_timeout: Duration) -> Self {
        Self { pool, default_timeout }
    }

    /// Begin a new transaction with the default timeout
    pub async fn begin(&self) -> Result<Transaction> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| GeostacError::Store(format!("Failed to begin transaction: {}", e)))?;

        Ok(Transaction { inner: Some(tx), timeout_duration: self.default_timeout })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_transaction_manager_creation() {
        let pool = PgPool::connect_lazy("postgresql://localhost/test_geo_stac_db").unwrap();
        let manager = TransactionManager::new(pool, Duration::from_secs(30));
        assert_eq!(manager.default_timeout, Duration::from_secs(30));
    }
}
