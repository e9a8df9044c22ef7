// error.rs - Errors raised by the CRUD collaborators.
//
// Only collaborator failures (network, storage, decoding) are errors.
// Rejected transitions and invalid category drafts are returned as
// values by the services.

use thiserror::Error;

/// Errors that can occur while talking to a content backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request could not be sent or its body could not be read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server returned {status}: {detail}")]
    Status { status: u16, detail: String },

    /// The write would break the category taxonomy (duplicate slug,
    /// deleting a parent). The REST backend reports these as `Status`.
    #[error("category integrity: {0}")]
    Integrity(#[from] bc_taxonomy::TaxonomyError),

    /// The requested record does not exist.
    #[error("{resource} {id} not found")]
    NotFound { resource: String, id: i64 },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize a record.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// The console configuration could not be read.
    #[error("invalid configuration in {path}: {source}")]
    ConfigError {
        path: String,
        source: toml::de::Error,
    },
}

impl ApiError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        ApiError::IoError {
            path: path.display().to_string(),
            source,
        }
    }
}
