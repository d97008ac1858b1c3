//! Batch statement execution.
//!
//! Each batch statement is wrapped in the dialect's atomic block so the
//! engine applies all of its rows or none, then run under the per-batch
//! timeout. Failures are returned as-is; nothing is retried.

use std::time::{Duration, Instant};

use tokio::time::timeout;
use tracing::{debug, error};

use crate::batch::BatchStatement;
use crate::core::traits::{Connection, Dialect};
use crate::error::{BulkCopyError, Result};

/// Runs finished batch statements against a connection.
pub struct Executor<'d> {
    dialect: &'d dyn Dialect,
    timeout: Duration,
}

impl<'d> Executor<'d> {
    pub fn new(dialect: &'d dyn Dialect, timeout: Duration) -> Self {
        Self { dialect, timeout }
    }

    /// Configured per-batch timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Execute one batch atomically.
    ///
    /// `batch_no` is only used for diagnostics.
    pub async fn execute<C>(&self, conn: &mut C, batch: &BatchStatement, batch_no: u64) -> Result<u64>
    where
        C: Connection + ?Sized,
    {
        let sql = self.dialect.wrap_atomic_block(&batch.sql);
        let started = Instant::now();

        let outcome = match timeout(self.timeout, conn.execute(&sql, self.timeout)).await {
            Ok(result) => result,
            Err(_) => Err(BulkCopyError::Timeout(self.timeout)),
        };

        match outcome {
            Ok(affected) => {
                debug!(
                    "Batch {}: {} rows, {} bytes in {:?}",
                    batch_no,
                    batch.rows,
                    sql.len(),
                    started.elapsed()
                );
                Ok(affected)
            }
            Err(e) => {
                error!(
                    "Batch {} of {} rows ({} bytes) failed: {}",
                    batch_no,
                    batch.rows,
                    sql.len(),
                    e
                );
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::SqlValue;
    use crate::dialect::FirebirdDialect;
    use async_trait::async_trait;

    #[derive(Default)]
    struct ScriptedConnection {
        executed: Vec<String>,
        fail_with: Option<String>,
        hang: bool,
    }

    #[async_trait]
    impl Connection for ScriptedConnection {
        fn is_open(&self) -> bool {
            true
        }

        async fn open(&mut self) -> Result<()> {
            Ok(())
        }

        async fn close(&mut self) -> Result<()> {
            Ok(())
        }

        async fn query(&mut self, _sql: &str) -> Result<Vec<Vec<SqlValue<'static>>>> {
            Ok(Vec::new())
        }

        async fn execute(&mut self, sql: &str, _timeout: Duration) -> Result<u64> {
            self.executed.push(sql.to_string());
            if self.hang {
                std::future::pending::<()>().await;
            }
            match &self.fail_with {
                Some(msg) => Err(BulkCopyError::engine(msg.clone(), "execute")),
                None => Ok(1),
            }
        }
    }

    fn batch() -> BatchStatement {
        BatchStatement {
            sql: "INSERT INTO D(A) SELECT 1 FROM RDB$DATABASE".to_string(),
            rows: 1,
        }
    }

    #[tokio::test]
    async fn test_wraps_in_execute_block() {
        let dialect = FirebirdDialect::new();
        let executor = Executor::new(&dialect, Duration::from_secs(60));
        let mut conn = ScriptedConnection::default();

        executor.execute(&mut conn, &batch(), 1).await.unwrap();

        assert_eq!(
            conn.executed,
            vec!["EXECUTE BLOCK AS BEGIN INSERT INTO D(A) SELECT 1 FROM RDB$DATABASE; END"]
        );
    }

    #[tokio::test]
    async fn test_engine_error_is_returned_without_retry() {
        let dialect = FirebirdDialect::new();
        let executor = Executor::new(&dialect, Duration::from_secs(60));
        let mut conn = ScriptedConnection {
            fail_with: Some("violation of PRIMARY or UNIQUE KEY".to_string()),
            ..Default::default()
        };

        let err = executor.execute(&mut conn, &batch(), 1).await.unwrap_err();
        assert!(matches!(err, BulkCopyError::Engine { .. }));
        assert_eq!(conn.executed.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout() {
        let dialect = FirebirdDialect::new();
        let executor = Executor::new(&dialect, Duration::from_secs(60));
        let mut conn = ScriptedConnection {
            hang: true,
            ..Default::default()
        };

        let err = executor.execute(&mut conn, &batch(), 7).await.unwrap_err();
        assert!(matches!(err, BulkCopyError::Timeout(d) if d == Duration::from_secs(60)));
        assert!(err.is_engine_failure());
    }
}
