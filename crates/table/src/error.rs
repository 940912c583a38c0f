use bom_graph::RollupError;
use thiserror::Error;

/// Result type for table operations
pub type Result<T> = std::result::Result<T, TableError>;

/// Errors that can occur while reading, reshaping or rolling up a table
#[derive(Error, Debug)]
pub enum TableError {
    /// Column name not present in the table
    #[error("Table does not contain column '{0}'")]
    UnknownColumn(String),

    /// Key retention left nothing behind
    #[error("No column names were selected")]
    NoColumnsSelected,

    /// Row record is not a JSON object
    #[error("Record {row} is not a JSON object")]
    InvalidRecord { row: usize },

    /// Row has a different number of cells than the table has columns
    #[error("Row {row} has {found} cells, expected {expected}")]
    RowArity {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Cell holds a value of the wrong kind
    #[error("Invalid value in row {row}, column '{column}': {reason}")]
    InvalidCell {
        row: usize,
        column: String,
        reason: String,
    },

    /// Node id collides with the root sentinel
    #[error("Row {row} uses the root sentinel {sentinel} as its id")]
    SentinelId { row: usize, sentinel: i64 },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Rollup rejected the node set
    #[error(transparent)]
    Rollup(#[from] RollupError),

    /// IO error occurred
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TableError {
    /// Create an unknown column error
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    /// Create an invalid cell error
    pub fn invalid_cell(row: usize, column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidCell {
            row,
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
