//! Error types for the persistence layer.

use thiserror::Error;

/// Database operation result type.
pub type Result<T> = std::result::Result<T, DbError>;

/// Database errors. Never retried here; retry policy belongs to callers.
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLx error (connection, query, etc.)
    #[error("Database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// IO error (file system operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Constraint violation (unique, foreign key, etc.)
    #[error("Constraint violation: {0}")]
    Constraint(String),

    /// A step of the submission write pipeline failed
    #[error("{step} insert failed: {source}")]
    Insert {
        step: String,
        #[source]
        source: sqlx::Error,
    },

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DbError {
    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a constraint error.
    pub fn constraint(msg: impl Into<String>) -> Self {
        Self::Constraint(msg.into())
    }

    /// Wrap a write-step failure, folding database-reported unique/FK
    /// violations into `Constraint` so callers can tell client-caused
    /// failures from connectivity loss.
    pub(crate) fn insert(step: impl Into<String>, source: sqlx::Error) -> Self {
        if is_constraint_violation(&source) {
            return Self::Constraint(format!("{}: {}", step.into(), source));
        }
        Self::Insert {
            step: step.into(),
            source,
        }
    }

    /// Whether the error reports a constraint violation.
    pub fn is_constraint(&self) -> bool {
        matches!(self, Self::Constraint(_))
    }
}

fn is_constraint_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => !matches!(db.kind(), sqlx::error::ErrorKind::Other),
        _ => false,
    }
}
