//! Error types for dialect operations.

use thiserror::Error;

use crate::field::FieldKind;

/// Errors returned by dialect operations.
#[derive(Debug, Error)]
pub enum DialectError {
    /// The field's kind has no column type in this dialect.
    #[error("invalid sql type {type_name} ({kind}) for {dialect}")]
    UnsupportedType {
        /// Declared name of the field's type.
        type_name: String,
        /// Semantic kind of the field.
        kind: FieldKind,
        /// Name of the dialect that rejected it.
        dialect: &'static str,
    },

    /// A database operation was requested before a handle was attached.
    #[error("no database handle attached to dialect '{0}'")]
    NoHandle(&'static str),

    /// Error reported by the underlying database handle.
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// No dialect is registered under the given name.
    #[error("unknown dialect: {0}")]
    UnknownDialect(String),
}

/// Result type alias for dialect operations.
pub type Result<T> = std::result::Result<T, DialectError>;
