//! # fb-bulk-copy
//!
//! Bulk loading into Firebird without a native bulk-insert protocol.
//!
//! Rows read from any source cursor are rendered as SQL literals and packed
//! into multi-row statements of the form
//!
//! ```sql
//! EXECUTE BLOCK AS BEGIN
//!   INSERT INTO T(A,B) SELECT 1,'x' FROM RDB$DATABASE
//!                      UNION ALL SELECT 2,NULL FROM RDB$DATABASE;
//! END
//! ```
//!
//! which Firebird executes atomically, one batch at a time:
//!
//! - **Schema resolution** from the system catalog, once per destination table
//! - **Literal serialization** by column kind, with quote escaping and hex blobs
//! - **Batching** bounded by row count and statement size
//! - **Sequential execution** with a per-batch timeout
//!
//! ## Example
//!
//! ```rust,no_run
//! use fb_bulk_copy::{BulkCopy, BulkCopyConfig, Connection, RowSource};
//!
//! async fn load<C: Connection, R: RowSource>(conn: &mut C, rows: &mut R) -> fb_bulk_copy::Result<()> {
//!     let config = BulkCopyConfig::load("bulk_copy.yaml")?;
//!     let mut copy = BulkCopy::new(conn, config).await?;
//!     copy.set_destination_table("CUSTOMERS").await?;
//!     let stats = copy.write_to_server(rows).await?;
//!     println!("Copied {} rows in {} batches", stats.rows, stats.batches);
//!     copy.close().await
//! }
//! ```

pub mod batch;
pub mod config;
pub mod core;
pub mod dialect;
pub mod error;
pub mod executor;
pub mod orchestrator;
pub mod serialize;
pub mod typemap;

// Re-exports for convenient access
pub use batch::{BatchBuilder, BatchStatement};
pub use config::{BulkCopyConfig, UnmappedColumnPolicy};
pub use crate::core::{
    CatalogColumn, Column, ColumnKind, Connection, Connector, Dialect, RowSource, Schema,
    SourceRow, SqlValue,
};
pub use dialect::FirebirdDialect;
pub use error::{BulkCopyError, Result};
pub use executor::Executor;
pub use orchestrator::{BulkCopy, CopyState, CopyStats};
pub use serialize::{CellRef, ValueSerializer};
pub use typemap::ColumnTypeResolver;
