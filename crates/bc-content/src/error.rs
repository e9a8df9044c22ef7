// error.rs - Error types for the content lifecycle subsystem.

use thiserror::Error;

use crate::status::EntityKind;

/// Errors that can occur while handling publishable content.
///
/// Rejected transitions and unmet publish rules are not errors; they are
/// reported through [`crate::TransitionVerdict`] and
/// [`crate::ReadinessReport`].
#[derive(Debug, Error)]
pub enum ContentError {
    /// A status string is not part of the entity's alphabet.
    #[error("unknown {kind} status '{value}'")]
    UnknownStatus { kind: EntityKind, value: String },

    /// A file I/O operation failed.
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: String,
        source: std::io::Error,
    },

    /// Failed to serialize/deserialize content data.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}
