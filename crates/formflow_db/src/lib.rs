//! SQLite persistence layer for Formflow.
//!
//! This crate is the single source of truth for database access. Every
//! interface (CLI, service layer, tests) goes through [`FormflowDb`]
//! rather than issuing raw queries.
//!
//! # Usage
//!
//! ```rust,ignore
//! use formflow_db::{FormflowDb, Result};
//!
//! let db = FormflowDb::open("~/.formflow/formflow.sqlite3").await?;
//!
//! let form = db.form_by_ref("customer-feedback").await?;
//! let questions = db.questions_by_form(form.id).await?;
//! let submission = db.insert_submission(&header, &validated).await?;
//! ```

mod error;
mod schema;

// Method implementations organized by domain
mod forms;
mod questions;
mod submissions;

pub use error::{DbError, Result};

use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::path::Path;
use tracing::info;

/// Unified database handle for all Formflow operations.
#[derive(Clone)]
pub struct FormflowDb {
    pool: SqlitePool,
}

impl FormflowDb {
    /// Open or create a database at the given path.
    ///
    /// Creates all tables if they don't exist.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let url = format!("sqlite:{}?mode=rwc", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        let db = Self { pool };

        db.ensure_schema().await?;

        info!(path = %path.display(), "Database opened");

        Ok(db)
    }

    /// Open an existing database (fails if not exists).
    pub async fn open_existing(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(DbError::NotFound(format!(
                "Database not found: {}",
                path.display()
            )));
        }

        let url = format!("sqlite:{}?mode=rw", path.display());

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&url)
            .await?;

        Ok(Self { pool })
    }

    /// Get the underlying connection pool (escape hatch for complex queries).
    ///
    /// Prefer using the typed methods instead.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection.
    pub async fn close(self) {
        self.pool.close().await;
    }
}

// Timestamp utilities
impl FormflowDb {
    /// Current time as milliseconds since Unix epoch.
    pub fn now_millis() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    /// Convert milliseconds to DateTime.
    pub fn millis_to_datetime(millis: i64) -> chrono::DateTime<chrono::Utc> {
        chrono::DateTime::from_timestamp_millis(millis).unwrap_or_else(chrono::Utc::now)
    }
}
