//! Form operations (the FormLookup collaborator surface).

use crate::error::{DbError, Result};
use crate::FormflowDb;
use formflow_core::{Form, FormStatus};
use sqlx::Row;
use uuid::Uuid;

impl FormflowDb {
    /// Insert a new form. Slug collisions surface as a constraint error.
    pub async fn create_form(&self, form: &Form) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO forms (id, author_id, slug, title, description, status, created_at, modified_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(form.id)
        .bind(form.author_id)
        .bind(&form.slug)
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.status.as_str())
        .bind(form.created_at.timestamp_millis())
        .bind(form.modified_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::insert(format!("form '{}'", form.slug), e))?;

        Ok(())
    }

    /// Get a form by ID.
    pub async fn form_by_id(&self, id: Uuid) -> Result<Option<Form>> {
        let row = sqlx::query(
            "SELECT id, author_id, slug, title, description, status, created_at, modified_at FROM forms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_form(&row)?)),
            None => Ok(None),
        }
    }

    /// Get a form by slug.
    pub async fn form_by_slug(&self, slug: &str) -> Result<Option<Form>> {
        let row = sqlx::query(
            "SELECT id, author_id, slug, title, description, status, created_at, modified_at FROM forms WHERE slug = ?",
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_form(&row)?)),
            None => Ok(None),
        }
    }

    /// Resolve a form by external reference: a Uuid first, a slug otherwise.
    pub async fn form_by_ref(&self, form_ref: &str) -> Result<Option<Form>> {
        if let Ok(id) = Uuid::parse_str(form_ref) {
            if let Some(form) = self.form_by_id(id).await? {
                return Ok(Some(form));
            }
        }
        self.form_by_slug(form_ref).await
    }

    /// List all forms, oldest first.
    pub async fn list_forms(&self) -> Result<Vec<Form>> {
        let rows = sqlx::query(
            "SELECT id, author_id, slug, title, description, status, created_at, modified_at FROM forms ORDER BY created_at",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_form(row)).collect()
    }

    /// Flip a form's lifecycle status.
    pub async fn set_form_status(&self, id: Uuid, status: FormStatus) -> Result<()> {
        let result = sqlx::query("UPDATE forms SET status = ?, modified_at = ? WHERE id = ?")
            .bind(status.as_str())
            .bind(Self::now_millis())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found(format!("form {id}")));
        }
        Ok(())
    }

    fn row_to_form(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Form> {
        let status_str: String = row.get("status");
        let status = FormStatus::parse(&status_str)
            .ok_or_else(|| DbError::constraint(format!("unknown form status: {status_str}")))?;

        Ok(Form {
            id: row.get("id"),
            author_id: row.get("author_id"),
            slug: row.get("slug"),
            title: row.get("title"),
            description: row.get("description"),
            status,
            created_at: Self::millis_to_datetime(row.get("created_at")),
            modified_at: Self::millis_to_datetime(row.get("modified_at")),
        })
    }
}
