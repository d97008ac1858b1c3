//! SQL dialects for destination engines.
//!
//! Each dialect implements [`Dialect`](crate::core::Dialect) and supplies the
//! literal forms, execution-block wrapper and catalog query the batching
//! engine needs.
//!
//! # Available Dialects
//!
//! - [`FirebirdDialect`]: Firebird 2.5+ (`EXECUTE BLOCK`, `RDB$DATABASE`)

mod firebird;

pub use firebird::FirebirdDialect;
