//! Configuration validation.

use super::{BulkCopyConfig, ENGINE_MAX_STATEMENT_BYTES};
use crate::error::{BulkCopyError, Result};

/// Validate the configuration.
pub fn validate(config: &BulkCopyConfig) -> Result<()> {
    if config.batch_size == 0 {
        return Err(BulkCopyError::Config(
            "batch_size must be at least 1".into(),
        ));
    }

    if config.max_statement_bytes == 0 {
        return Err(BulkCopyError::Config(
            "max_statement_bytes must be at least 1".into(),
        ));
    }
    if config.max_statement_bytes > ENGINE_MAX_STATEMENT_BYTES {
        return Err(BulkCopyError::Config(format!(
            "max_statement_bytes must not exceed {}, got {}",
            ENGINE_MAX_STATEMENT_BYTES, config.max_statement_bytes
        )));
    }

    if config.timeout_secs == 0 {
        return Err(BulkCopyError::Config(
            "timeout_secs must be at least 1".into(),
        ));
    }

    Ok(())
}
