//! Error types for the bulk copy library.

use std::time::Duration;

use thiserror::Error;

/// Main error type for bulk copy operations.
#[derive(Error, Debug)]
pub enum BulkCopyError {
    /// A required argument was absent or empty (e.g. no destination table).
    #[error("Invalid argument: {0}")]
    Argument(String),

    /// Destination table resolved to zero columns.
    #[error("{0} could not be found in the database")]
    TableNotFound(String),

    /// A cell could not be rendered as a literal for its column kind.
    #[error(
        "Invalid value for column [{column}] in table [{table}]: '{value}' ({reason})"
    )]
    ValueFormat {
        table: String,
        column: String,
        value: String,
        reason: String,
    },

    /// Catalog reported a column type with no literal encoding.
    #[error("Column [{column}] in table [{table}] has unsupported type {type_name}")]
    UnsupportedColumnType {
        table: String,
        column: String,
        type_name: String,
    },

    /// The source cursor does not carry a destination column.
    #[error("Source row has no column named [{column}] (destination table [{table}])")]
    SourceColumnMissing { table: String, column: String },

    /// Destination engine rejected a statement.
    #[error("Engine error: {message}\n  Context: {context}")]
    Engine { message: String, context: String },

    /// A batch did not complete within the configured timeout.
    #[error("Batch execution timed out after {0:?}")]
    Timeout(Duration),

    /// Source cursor failed while reading.
    #[error("Source error: {0}")]
    Source(String),

    /// Connection could not be opened or closed.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Configuration error (invalid YAML, out-of-range values, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization/deserialization error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl BulkCopyError {
    /// Create an Engine error with context about where it occurred
    pub fn engine(message: impl Into<String>, context: impl Into<String>) -> Self {
        BulkCopyError::Engine {
            message: message.into(),
            context: context.into(),
        }
    }

    /// Create a ValueFormat error
    pub fn value_format(
        table: impl Into<String>,
        column: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BulkCopyError::ValueFormat {
            table: table.into(),
            column: column.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// True for failures reported while the engine ran a batch.
    pub fn is_engine_failure(&self) -> bool {
        matches!(self, BulkCopyError::Engine { .. } | BulkCopyError::Timeout(_))
    }

    /// Format error with full details including error chain
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {}\n", self);

        let mut source = std::error::Error::source(self);
        let mut depth = 1;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {}: {}", depth, err));
            source = err.source();
            depth += 1;
        }

        output
    }
}

/// Result type alias for bulk copy operations.
pub type Result<T> = std::result::Result<T, BulkCopyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_not_found_message() {
        let err = BulkCopyError::TableNotFound("D".to_string());
        assert_eq!(err.to_string(), "D could not be found in the database");
    }

    #[test]
    fn test_value_format_names_column_and_table() {
        let err = BulkCopyError::value_format("D", "CREATED", "not-a-date", "unrecognized date");
        let msg = err.to_string();
        assert!(msg.contains("[CREATED]"));
        assert!(msg.contains("[D]"));
        assert!(msg.contains("not-a-date"));
    }

    #[test]
    fn test_engine_failure_grouping() {
        assert!(BulkCopyError::engine("deadlock", "batch 3").is_engine_failure());
        assert!(BulkCopyError::Timeout(Duration::from_secs(60)).is_engine_failure());
        assert!(!BulkCopyError::Argument("x".into()).is_engine_failure());
    }

    #[test]
    fn test_format_detailed_includes_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "config.yaml");
        let err = BulkCopyError::from(io);
        let detailed = err.format_detailed();
        assert!(detailed.starts_with("Error: IO error: config.yaml"));
    }
}
