//! Error types for reading and flattening JSON-stat documents.
//!
//! [`JsonStatError`] covers every failure of the library API. The
//! binaries wrap it in `anyhow` and add context about the file being read.

use thiserror::Error;

/// Errors raised while parsing, querying or flattening a dataset.
#[derive(Debug, Error)]
pub enum JsonStatError {
    /// The value count does not match the dimension sizes, or the
    /// dimension list itself is unusable.
    #[error("malformed dataset '{dataset}': {message}")]
    MalformedDataset { dataset: String, message: String },

    /// The document does not follow the JSON-stat layout.
    #[error("malformed json-stat: {0}")]
    MalformedJson(String),

    /// A dimension id or label that the dataset does not have.
    #[error("dataset '{dataset}': unknown dimension '{dimension}', known dimensions are: {known}")]
    UnknownDimension {
        dataset: String,
        dimension: String,
        known: String,
    },

    /// A category index or label that the dimension does not have.
    #[error("dimension '{dimension}': no category with index or label '{category}'")]
    UnknownCategory { dimension: String, category: String },

    /// No dataset matches the selector.
    #[error("unknown dataset '{0}'")]
    UnknownDataset(String),

    /// The requested dimension order is not a permutation of the dimensions.
    #[error("invalid dimension order: {0}")]
    InvalidOrder(String),

    /// Two table columns share a name, so keyed output would lose one.
    #[error("column '{0}' appears more than once in the table header")]
    DuplicateColumn(String),

    /// An output format name that is not supported.
    #[error("unknown output format '{0}', expected 'csv' or 'jsonl'")]
    UnknownFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("JSON error: {0}")]
    SimdJson(#[from] simd_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl JsonStatError {
    pub(crate) fn malformed_dataset(dataset: &str, message: impl Into<String>) -> Self {
        JsonStatError::MalformedDataset {
            dataset: dataset.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn malformed_json(message: impl Into<String>) -> Self {
        JsonStatError::MalformedJson(message.into())
    }
}

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, JsonStatError>;
