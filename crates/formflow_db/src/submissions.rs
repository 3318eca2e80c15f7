//! Submission operations: the transactional write path and its readers.
//!
//! A submission is one `filled_forms` header row plus N
//! `filled_form_answers` child rows. The write commits all of them or none
//! of them; readers never observe a partial submission.

use crate::error::{DbError, Result};
use crate::FormflowDb;
use formflow_core::{AnswerValue, FilledForm, FilledFormAnswer, NewSubmission, ValidatedAnswerSet};
use sqlx::Row;
use tracing::debug;
use uuid::Uuid;

impl FormflowDb {
    /// Atomically persist a submission header and its validated answers.
    ///
    /// Answer rows are written in question-position order. Any failure
    /// aborts the transaction; the rollback happens on every exit path
    /// because an uncommitted transaction rolls back when dropped, so no
    /// orphaned header is ever visible to readers.
    pub async fn insert_submission(
        &self,
        header: &NewSubmission,
        answers: &ValidatedAnswerSet,
    ) -> Result<FilledForm> {
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO filled_forms (id, form_id, name, email, client_ip, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(header.id)
        .bind(header.form_id)
        .bind(&header.name)
        .bind(&header.email)
        .bind(&header.client_ip)
        .bind(header.created_at.timestamp_millis())
        .execute(&mut *tx)
        .await
        .map_err(|e| DbError::insert("filled form header", e))?;

        let created_at = header.created_at.timestamp_millis();
        for answer in answers.answers() {
            let (text, choices_json) = match &answer.value {
                AnswerValue::Text(text) => (Some(text.as_str()), None),
                AnswerValue::Choices(choices) => (None, Some(serde_json::to_string(choices)?)),
            };

            sqlx::query(
                r#"
                INSERT INTO filled_form_answers (id, filled_form_id, question_id, answer, selected_choices, created_at)
                VALUES (?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(header.id)
            .bind(answer.question_id)
            .bind(text)
            .bind(choices_json)
            .bind(created_at)
            .execute(&mut *tx)
            .await
            .map_err(|e| DbError::insert(format!("answer for question {}", answer.question_id), e))?;
        }

        tx.commit().await?;
        debug!(submission = %header.id, answers = answers.len(), "Submission persisted");

        self.submission_by_id(header.id)
            .await?
            .ok_or_else(|| DbError::not_found(format!("submission {} after commit", header.id)))
    }

    /// Load one submission with its answers, ordered by question position.
    pub async fn submission_by_id(&self, id: Uuid) -> Result<Option<FilledForm>> {
        let row = sqlx::query(
            "SELECT id, form_id, name, email, client_ip, created_at FROM filled_forms WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut submission = self.row_to_filled_form(&row)?;
        submission.answers = self.answers_by_submission(id).await?;
        Ok(Some(submission))
    }

    /// List a form's submissions, newest first.
    ///
    /// With `detailed` unset only the headers are loaded; answers stay
    /// empty for cheap listing.
    pub async fn submissions_by_form(
        &self,
        form_id: Uuid,
        detailed: bool,
    ) -> Result<Vec<FilledForm>> {
        let rows = sqlx::query(
            "SELECT id, form_id, name, email, client_ip, created_at FROM filled_forms WHERE form_id = ? ORDER BY created_at DESC, id",
        )
        .bind(form_id)
        .fetch_all(&self.pool)
        .await?;

        let mut submissions = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut submission = self.row_to_filled_form(row)?;
            if detailed {
                submission.answers = self.answers_by_submission(submission.id).await?;
            }
            submissions.push(submission);
        }

        Ok(submissions)
    }

    /// Number of submissions recorded against a form.
    pub async fn submission_count(&self, form_id: Uuid) -> Result<u64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM filled_forms WHERE form_id = ?")
                .bind(form_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }

    /// Delete a submission and its answers in one transaction.
    ///
    /// The answer rows never outlive their header; both go together.
    pub async fn delete_submission(&self, id: Uuid) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM filled_form_answers WHERE filled_form_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let result = sqlx::query("DELETE FROM filled_forms WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Err(DbError::not_found(format!("submission {id}")));
        }

        tx.commit().await?;
        Ok(())
    }

    async fn answers_by_submission(&self, filled_form_id: Uuid) -> Result<Vec<FilledFormAnswer>> {
        let rows = sqlx::query(
            r#"
            SELECT a.id, a.filled_form_id, a.question_id, a.answer, a.selected_choices, a.created_at
            FROM filled_form_answers a
            INNER JOIN questions q ON q.id = a.question_id
            WHERE a.filled_form_id = ?
            ORDER BY q.position
            "#,
        )
        .bind(filled_form_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| self.row_to_answer(row)).collect()
    }

    fn row_to_filled_form(&self, row: &sqlx::sqlite::SqliteRow) -> Result<FilledForm> {
        Ok(FilledForm {
            id: row.get("id"),
            form_id: row.get("form_id"),
            name: row.get("name"),
            email: row.get("email"),
            client_ip: row.get("client_ip"),
            created_at: Self::millis_to_datetime(row.get("created_at")),
            answers: Vec::new(),
        })
    }

    fn row_to_answer(&self, row: &sqlx::sqlite::SqliteRow) -> Result<FilledFormAnswer> {
        let text: Option<String> = row.get("answer");
        let choices_json: Option<String> = row.get("selected_choices");

        let value = match (text, choices_json) {
            (Some(text), None) => AnswerValue::Text(text),
            (None, Some(json)) => AnswerValue::Choices(serde_json::from_str(&json)?),
            (text, choices) => {
                return Err(DbError::constraint(format!(
                    "answer row must populate exactly one of text/choices (text: {}, choices: {})",
                    text.is_some(),
                    choices.is_some()
                )));
            }
        };

        Ok(FilledFormAnswer {
            id: row.get("id"),
            filled_form_id: row.get("filled_form_id"),
            question_id: row.get("question_id"),
            value,
            created_at: Self::millis_to_datetime(row.get("created_at")),
        })
    }
}
