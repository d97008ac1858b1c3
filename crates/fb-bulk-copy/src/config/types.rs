//! Configuration type definitions.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default rows per batch statement.
pub const DEFAULT_BATCH_SIZE: usize = 1_000;

/// Default statement size ceiling, kept under Firebird's 64 KiB statement limit.
pub const DEFAULT_MAX_STATEMENT_BYTES: usize = 60_000;

/// Firebird rejects statements longer than this.
pub const ENGINE_MAX_STATEMENT_BYTES: usize = 65_535;

/// Default per-batch execution timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Bulk copy behavior configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulkCopyConfig {
    /// Rows per batch statement (default: 1000).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Byte ceiling for the accumulated insert statement (default: 60000).
    #[serde(default = "default_max_statement_bytes")]
    pub max_statement_bytes: usize,

    /// Seconds to wait for one batch to execute (default: 60).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Close the source cursor once it is exhausted (default: true).
    ///
    /// Disable this when the cursor yields more than one result set and
    /// the caller wants to keep reading after the copy.
    #[serde(default = "default_true")]
    pub close_source: bool,

    /// Double-quote column and table names in generated statements (default: false).
    #[serde(default)]
    pub quote_identifiers: bool,

    /// What to do with destination columns whose type has no literal encoding.
    #[serde(default)]
    pub unmapped_columns: UnmappedColumnPolicy,
}

impl Default for BulkCopyConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            max_statement_bytes: DEFAULT_MAX_STATEMENT_BYTES,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            close_source: true,
            quote_identifiers: false,
            unmapped_columns: UnmappedColumnPolicy::default(),
        }
    }
}

impl BulkCopyConfig {
    /// Per-batch execution timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_max_statement_bytes(mut self, bytes: usize) -> Self {
        self.max_statement_bytes = bytes;
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_close_source(mut self, close: bool) -> Self {
        self.close_source = close;
        self
    }

    pub fn with_quote_identifiers(mut self, quote: bool) -> Self {
        self.quote_identifiers = quote;
        self
    }

    pub fn with_unmapped_columns(mut self, policy: UnmappedColumnPolicy) -> Self {
        self.unmapped_columns = policy;
        self
    }
}

/// Handling of destination columns the type resolver cannot classify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedColumnPolicy {
    /// Leave the column out of the schema; inserts never mention it.
    #[default]
    Skip,

    /// Refuse the destination table.
    Fail,
}

// Default value functions for serde
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

fn default_max_statement_bytes() -> usize {
    DEFAULT_MAX_STATEMENT_BYTES
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}
