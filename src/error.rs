use thiserror::Error;

/// Failure while loading the observation table. Always fatal for the load
/// that raised it; the engine itself never errors once a table exists.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unsupported file extension: .{0}")]
    UnsupportedExtension(String),

    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("row {row}: cannot parse '{value}' in column '{column}' as a timestamp")]
    InvalidTimestamp {
        row: usize,
        column: &'static str,
        value: String,
    },

    #[error("row {row}: cannot parse '{value}' as a size in KB")]
    InvalidSize { row: usize, value: String },

    #[error("row {row}: null value in column '{column}'")]
    NullValue { row: usize, column: &'static str },

    #[error("column '{column}' has unsupported type {data_type}")]
    UnexpectedColumnType {
        column: &'static str,
        data_type: String,
    },

    #[error("expected a top-level JSON array of records")]
    NotAnArray,

    #[error("row {0} is not a JSON object")]
    NotAnObject(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}
