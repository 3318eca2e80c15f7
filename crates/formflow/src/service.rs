//! Submission orchestration.
//!
//! `SubmissionService` ties the pipeline together: resolve the form, gate
//! on its lifecycle status, validate the answers against the question
//! schema, and hand the validated set to the transactional store. Every
//! failure is a typed [`SubmissionError`]; validation rejections keep
//! their original reason.

use std::net::IpAddr;

use formflow_core::{validate_submission, FilledForm, NewSubmission, RejectionReason, SubmissionInput};
use formflow_db::{DbError, FormflowDb};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Failures of the submission pipeline.
///
/// The first four are client-caused and terminal; `Storage` is
/// system-caused and surfaced as-is — retry policy, if any, belongs to the
/// caller.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("form not found: {0}")]
    FormNotFound(String),

    #[error("form '{0}' is not accepting submissions")]
    FormClosed(String),

    #[error("invalid client IP address: {0}")]
    InvalidClientIp(String),

    #[error(transparent)]
    Rejected(#[from] RejectionReason),

    #[error("submission not found: {0}")]
    SubmissionNotFound(Uuid),

    #[error(transparent)]
    Storage(#[from] DbError),
}

/// Orchestrates validation and persistence of public form submissions.
pub struct SubmissionService {
    db: FormflowDb,
}

impl SubmissionService {
    pub fn new(db: FormflowDb) -> Self {
        Self { db }
    }

    /// The underlying database handle.
    pub fn db(&self) -> &FormflowDb {
        &self.db
    }

    /// Accept a candidate submission against the form referenced by slug
    /// or id.
    ///
    /// A closed form is rejected before the validator or the store are
    /// ever reached. The question schema is read once and the answers are
    /// validated against that snapshot; a concurrent schema edit can race
    /// it, in which case foreign keys still fail the write and roll the
    /// whole submission back.
    ///
    /// Two identical calls create two distinct submissions; there is no
    /// deduplication.
    pub async fn submit(
        &self,
        form_ref: &str,
        input: SubmissionInput,
        client_ip: Option<&str>,
    ) -> Result<FilledForm, SubmissionError> {
        let form = self
            .db
            .form_by_ref(form_ref)
            .await?
            .ok_or_else(|| SubmissionError::FormNotFound(form_ref.to_string()))?;

        if !form.is_open() {
            return Err(SubmissionError::FormClosed(form.slug));
        }

        let client_ip = match client_ip {
            Some(ip) => {
                if ip.parse::<IpAddr>().is_err() {
                    return Err(SubmissionError::InvalidClientIp(ip.to_string()));
                }
                Some(ip.to_string())
            }
            None => None,
        };

        let schema = self.db.questions_by_form(form.id).await?;
        let validated = match validate_submission(&schema, &input.answers) {
            Ok(validated) => validated,
            Err(reason) => {
                warn!(form = %form.slug, %reason, "Submission rejected");
                return Err(reason.into());
            }
        };

        let header = NewSubmission::new(form.id, input.name, input.email, client_ip);
        let persisted = self.db.insert_submission(&header, &validated).await?;

        info!(
            form = %form.slug,
            submission = %persisted.id,
            answers = persisted.answers.len(),
            "Submission accepted"
        );
        Ok(persisted)
    }

    /// Load one submission with its answers.
    pub async fn submission(&self, id: Uuid) -> Result<FilledForm, SubmissionError> {
        self.db
            .submission_by_id(id)
            .await?
            .ok_or(SubmissionError::SubmissionNotFound(id))
    }

    /// List the submissions of a form, newest first.
    pub async fn list_submissions(
        &self,
        form_ref: &str,
        detailed: bool,
    ) -> Result<Vec<FilledForm>, SubmissionError> {
        let form = self
            .db
            .form_by_ref(form_ref)
            .await?
            .ok_or_else(|| SubmissionError::FormNotFound(form_ref.to_string()))?;

        Ok(self.db.submissions_by_form(form.id, detailed).await?)
    }

    /// Delete a submission and its answers.
    pub async fn delete_submission(&self, id: Uuid) -> Result<(), SubmissionError> {
        match self.db.delete_submission(id).await {
            Ok(()) => Ok(()),
            Err(DbError::NotFound(_)) => Err(SubmissionError::SubmissionNotFound(id)),
            Err(err) => Err(err.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use formflow_core::{Form, FormStatus, Question, RawAnswer};
    use tempfile::TempDir;

    async fn service_with_form() -> (TempDir, SubmissionService, Form, Question) {
        let tmp = TempDir::new().unwrap();
        let db = FormflowDb::open(tmp.path().join("test.db")).await.unwrap();

        let form = Form::new(Uuid::new_v4(), "survey", "Survey", None);
        db.create_form(&form).await.unwrap();
        let question = Question::basic(form.id, "Name?", 1, true);
        db.create_question(&question).await.unwrap();

        (tmp, SubmissionService::new(db), form, question)
    }

    fn input_answering(question: &Question, text: &str) -> SubmissionInput {
        SubmissionInput {
            name: None,
            email: None,
            answers: vec![RawAnswer {
                question_id: question.id,
                text: Some(text.to_string()),
                selected_choices: Vec::new(),
            }],
        }
    }

    #[tokio::test]
    async fn test_submit_by_slug_and_by_id() {
        let (_tmp, service, form, question) = service_with_form().await;

        let by_slug = service
            .submit("survey", input_answering(&question, "Ada"), None)
            .await
            .unwrap();
        assert_eq!(by_slug.answers.len(), 1);

        let by_id = service
            .submit(&form.id.to_string(), input_answering(&question, "Grace"), None)
            .await
            .unwrap();
        assert_ne!(by_slug.id, by_id.id);
    }

    #[tokio::test]
    async fn test_unknown_form_ref() {
        let (_tmp, service, _form, question) = service_with_form().await;

        let err = service
            .submit("no-such-form", input_answering(&question, "x"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::FormNotFound(_)));
    }

    #[tokio::test]
    async fn test_closed_form_is_rejected_before_validation() {
        let (_tmp, service, form, _question) = service_with_form().await;
        service
            .db()
            .set_form_status(form.id, FormStatus::Closed)
            .await
            .unwrap();

        // Even an invalid payload reports the closed form, not a
        // validation failure, and nothing is written.
        let bad_input = SubmissionInput {
            answers: vec![RawAnswer {
                question_id: Uuid::new_v4(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = service.submit("survey", bad_input, None).await.unwrap_err();
        assert!(matches!(err, SubmissionError::FormClosed(_)));

        assert_eq!(service.db().submission_count(form.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejection_keeps_reason() {
        let (_tmp, service, form, _question) = service_with_form().await;

        let err = service
            .submit("survey", SubmissionInput::default(), None)
            .await
            .unwrap_err();
        match err {
            SubmissionError::Rejected(RejectionReason::RequiredAnswerMissing { .. }) => {}
            other => panic!("expected required-answer rejection, got: {other}"),
        }
        assert_eq!(service.db().submission_count(form.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_invalid_client_ip() {
        let (_tmp, service, _form, question) = service_with_form().await;

        let err = service
            .submit("survey", input_answering(&question, "Ada"), Some("not-an-ip"))
            .await
            .unwrap_err();
        assert!(matches!(err, SubmissionError::InvalidClientIp(_)));

        let ok = service
            .submit("survey", input_answering(&question, "Ada"), Some("2001:db8::1"))
            .await
            .unwrap();
        assert_eq!(ok.client_ip.as_deref(), Some("2001:db8::1"));
    }

    #[tokio::test]
    async fn test_submission_lookup_and_delete() {
        let (_tmp, service, _form, question) = service_with_form().await;

        let written = service
            .submit("survey", input_answering(&question, "Ada"), None)
            .await
            .unwrap();

        let loaded = service.submission(written.id).await.unwrap();
        assert_eq!(loaded.answers.len(), 1);

        service.delete_submission(written.id).await.unwrap();
        let err = service.submission(written.id).await.unwrap_err();
        assert!(matches!(err, SubmissionError::SubmissionNotFound(_)));
    }

    #[tokio::test]
    async fn test_list_submissions_detail_flag() {
        let (_tmp, service, _form, question) = service_with_form().await;

        service
            .submit("survey", input_answering(&question, "Ada"), None)
            .await
            .unwrap();

        let summaries = service.list_submissions("survey", false).await.unwrap();
        assert_eq!(summaries.len(), 1);
        assert!(summaries[0].answers.is_empty());

        let detailed = service.list_submissions("survey", true).await.unwrap();
        assert_eq!(detailed[0].answers.len(), 1);
    }
}
