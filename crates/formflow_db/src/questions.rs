//! Question operations (the SchemaLookup collaborator surface).

use crate::error::{DbError, Result};
use crate::FormflowDb;
use formflow_core::{Question, QuestionKind};
use sqlx::Row;
use uuid::Uuid;

impl FormflowDb {
    /// Insert a new question.
    ///
    /// Multiple-choice questions must carry at least two choices; that is
    /// checked here before touching the database.
    pub async fn create_question(&self, question: &Question) -> Result<()> {
        let (choices_json, allow_multiple) = match &question.kind {
            QuestionKind::Basic => (None, false),
            QuestionKind::MultipleChoice {
                choices,
                allow_multiple,
            } => {
                if choices.len() < 2 {
                    return Err(DbError::constraint(format!(
                        "multiple choice question '{}' needs at least 2 choices",
                        question.text
                    )));
                }
                (Some(serde_json::to_string(choices)?), *allow_multiple)
            }
        };

        sqlx::query(
            r#"
            INSERT INTO questions (id, form_id, question_text, kind, position, required, choices, allow_multiple, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(question.id)
        .bind(question.form_id)
        .bind(&question.text)
        .bind(question.kind.as_str())
        .bind(question.position)
        .bind(question.required)
        .bind(choices_json)
        .bind(allow_multiple)
        .bind(question.created_at.timestamp_millis())
        .execute(&self.pool)
        .await
        .map_err(|e| DbError::insert(format!("question at position {}", question.position), e))?;

        Ok(())
    }

    /// Get a question by ID.
    pub async fn question_by_id(&self, id: Uuid) -> Result<Option<Question>> {
        let row = sqlx::query(
            "SELECT id, form_id, question_text, kind, position, required, choices, allow_multiple, created_at FROM questions WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(self.row_to_question(&row)?)),
            None => Ok(None),
        }
    }

    /// The form's authoritative question schema, in ascending position order.
    pub async fn questions_by_form(&self, form_id: Uuid) -> Result<Vec<Question>> {
        let rows = sqlx::query(
            "SELECT id, form_id, question_text, kind, position, required, choices, allow_multiple, created_at FROM questions WHERE form_id = ? ORDER BY position",
        )
        .bind(form_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_question(row)).collect()
    }

    fn row_to_question(&self, row: &sqlx::sqlite::SqliteRow) -> Result<Question> {
        let kind_str: String = row.get("kind");
        let kind = match kind_str.as_str() {
            "basic" => QuestionKind::Basic,
            "multiple_choice" => {
                let choices_json: Option<String> = row.get("choices");
                let choices = match choices_json {
                    Some(json) => serde_json::from_str(&json)?,
                    None => Vec::new(),
                };
                QuestionKind::MultipleChoice {
                    choices,
                    allow_multiple: row.get("allow_multiple"),
                }
            }
            other => {
                return Err(DbError::constraint(format!("unknown question kind: {other}")));
            }
        };

        Ok(Question {
            id: row.get("id"),
            form_id: row.get("form_id"),
            text: row.get("question_text"),
            position: row.get("position"),
            required: row.get("required"),
            kind,
            created_at: Self::millis_to_datetime(row.get("created_at")),
        })
    }
}
