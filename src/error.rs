//! Error types for table view operations.

use thiserror::Error;

/// Errors reported synchronously by the table view and its loaders.
///
/// Stale selection ids, empty filter results and page indexes past the end are
/// not errors: the view corrects those on its own.
#[derive(Debug, Error)]
pub enum ViewError {
    /// Sort requested on a column that is unknown or not sortable.
    #[error("invalid column '{key}': unknown or not sortable")]
    InvalidColumn { key: String },

    /// A numeric argument outside its valid domain (e.g. page size of zero).
    #[error("invalid argument {name}={value}: must be positive")]
    InvalidArgument { name: &'static str, value: i64 },

    /// Negative page index.
    #[error("page index {index} is out of range")]
    OutOfRange { index: i64 },

    /// A record without a usable identifier field.
    #[error("record has no usable '{field}' identifier")]
    MissingId { field: String },

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ViewError>;
