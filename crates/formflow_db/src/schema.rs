//! Database schema creation for all Formflow tables.
//!
//! All CREATE TABLE statements live here - single source of truth.

use crate::error::Result;
use crate::FormflowDb;
use tracing::info;

impl FormflowDb {
    /// Ensure all tables exist.
    pub(crate) async fn ensure_schema(&self) -> Result<()> {
        // Enable WAL mode for better concurrent access
        sqlx::query("PRAGMA journal_mode=WAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA synchronous=NORMAL")
            .execute(&self.pool)
            .await?;
        sqlx::query("PRAGMA foreign_keys=ON")
            .execute(&self.pool)
            .await?;

        self.create_form_tables().await?;
        self.create_submission_tables().await?;

        info!("Database schema verified");
        Ok(())
    }

    /// Create form and question tables.
    async fn create_form_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS forms (
                id TEXT PRIMARY KEY,
                author_id TEXT NOT NULL,
                slug TEXT NOT NULL UNIQUE,
                title TEXT NOT NULL,
                description TEXT,
                status TEXT NOT NULL DEFAULT 'open',
                created_at INTEGER NOT NULL,
                modified_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        // choices holds a JSON string array, NULL for basic questions
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS questions (
                id TEXT PRIMARY KEY,
                form_id TEXT NOT NULL REFERENCES forms(id),
                question_text TEXT NOT NULL,
                kind TEXT NOT NULL,
                position INTEGER NOT NULL,
                required INTEGER NOT NULL DEFAULT 0,
                choices TEXT,
                allow_multiple INTEGER NOT NULL DEFAULT 0,
                created_at INTEGER NOT NULL,
                UNIQUE(form_id, position)
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_questions_form ON questions(form_id)")
            .execute(&self.pool)
            .await?;
        sqlx::query("CREATE INDEX IF NOT EXISTS idx_forms_slug ON forms(slug)")
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Create submission tables (filled forms and their answers).
    async fn create_submission_tables(&self) -> Result<()> {
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS filled_forms (
                id TEXT PRIMARY KEY,
                form_id TEXT NOT NULL REFERENCES forms(id),
                name TEXT,
                email TEXT,
                client_ip TEXT,
                created_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        // Exactly one of answer / selected_choices is populated per row
        sqlx::query(
            r#"CREATE TABLE IF NOT EXISTS filled_form_answers (
                id TEXT PRIMARY KEY,
                filled_form_id TEXT NOT NULL REFERENCES filled_forms(id),
                question_id TEXT NOT NULL REFERENCES questions(id),
                answer TEXT,
                selected_choices TEXT,
                created_at INTEGER NOT NULL
            )"#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_filled_forms_form ON filled_forms(form_id)",
        )
        .execute(&self.pool)
        .await?;
        sqlx::query(
            "CREATE INDEX IF NOT EXISTS idx_answers_filled_form ON filled_form_answers(filled_form_id)",
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
