//! Core abstractions shared by the bulk copy components.
//!
//! - [`schema`]: column kinds and the resolved destination schema
//! - [`value`]: cell values handed over by source cursors
//! - [`traits`]: connection, cursor and dialect seams
//!
//! Drivers for a concrete engine implement [`Connection`], [`Connector`] and
//! [`RowSource`]; the batching engine is written only against these traits.

pub mod schema;
pub mod traits;
pub mod value;

pub use schema::{CatalogColumn, Column, ColumnKind, Schema};
pub use traits::{Connection, Connector, Dialect, RowSource};
pub use value::{SourceRow, SqlValue};
