//! Integration tests for the submission write/read pipeline, in particular
//! the all-or-nothing transaction guarantee.

use formflow_core::{validate_submission, AnswerValue, Form, NewSubmission, Question, RawAnswer};
use formflow_db::{DbError, FormflowDb};
use tempfile::TempDir;
use uuid::Uuid;

struct Fixture {
    _tmp: TempDir,
    db: FormflowDb,
    form: Form,
    q_name: Question,
    q_color: Question,
}

async fn fixture() -> Fixture {
    let tmp = TempDir::new().unwrap();
    let db = FormflowDb::open(tmp.path().join("test.db")).await.unwrap();

    let form = Form::new(Uuid::new_v4(), "customer-feedback", "Customer feedback", None);
    db.create_form(&form).await.unwrap();

    let q_name = Question::basic(form.id, "Your name?", 1, true);
    let q_color = Question::multiple_choice(
        form.id,
        "Favorite color?",
        2,
        false,
        vec!["Red".into(), "Blue".into()],
        false,
    );
    db.create_question(&q_name).await.unwrap();
    db.create_question(&q_color).await.unwrap();

    Fixture {
        _tmp: tmp,
        db,
        form,
        q_name,
        q_color,
    }
}

fn answers_for(fx: &Fixture) -> Vec<RawAnswer> {
    vec![
        RawAnswer {
            question_id: fx.q_name.id,
            text: Some("Ada".into()),
            selected_choices: Vec::new(),
        },
        RawAnswer {
            question_id: fx.q_color.id,
            text: None,
            selected_choices: vec!["Red".into()],
        },
    ]
}

#[tokio::test]
async fn test_write_then_read_returns_full_aggregate() {
    let fx = fixture().await;

    let schema = fx.db.questions_by_form(fx.form.id).await.unwrap();
    let validated = validate_submission(&schema, &answers_for(&fx)).unwrap();
    assert_eq!(validated.len(), 2);

    let header = NewSubmission::new(
        fx.form.id,
        Some("Ada".into()),
        Some("ada@example.com".into()),
        Some("203.0.113.7".into()),
    );
    let written = fx.db.insert_submission(&header, &validated).await.unwrap();
    assert_eq!(written.answers.len(), 2);

    let reloaded = fx.db.submission_by_id(header.id).await.unwrap().unwrap();
    assert_eq!(reloaded.answers.len(), validated.len());
    // Answers come back in question position order
    assert_eq!(reloaded.answers[0].question_id, fx.q_name.id);
    assert_eq!(reloaded.answers[0].value, AnswerValue::Text("Ada".into()));
    assert_eq!(reloaded.answers[1].question_id, fx.q_color.id);
    assert_eq!(
        reloaded.answers[1].value,
        AnswerValue::Choices(vec!["Red".into()])
    );
    assert_eq!(reloaded.client_ip.as_deref(), Some("203.0.113.7"));
}

#[tokio::test]
async fn test_failed_answer_insert_leaves_no_orphan_header() {
    let fx = fixture().await;

    let schema = fx.db.questions_by_form(fx.form.id).await.unwrap();
    let validated = validate_submission(&schema, &answers_for(&fx)).unwrap();

    // Pull the second question out from under the submission so its answer
    // insert hits a foreign key violation after the header and the first
    // answer were already written inside the transaction.
    sqlx::query("DELETE FROM questions WHERE id = ?")
        .bind(fx.q_color.id)
        .execute(fx.db.pool())
        .await
        .unwrap();

    let header = NewSubmission::new(fx.form.id, None, None, None);
    let err = fx.db.insert_submission(&header, &validated).await.unwrap_err();
    assert!(
        matches!(err, DbError::Constraint(_)),
        "expected constraint violation, got: {err}"
    );

    // The whole transaction rolled back: no header, no answers.
    assert!(fx.db.submission_by_id(header.id).await.unwrap().is_none());
    assert_eq!(fx.db.submission_count(fx.form.id).await.unwrap(), 0);

    let orphan_answers: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM filled_form_answers WHERE filled_form_id = ?")
            .bind(header.id)
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
    assert_eq!(orphan_answers, 0);
}

#[tokio::test]
async fn test_listing_summary_vs_detailed() {
    let fx = fixture().await;

    let schema = fx.db.questions_by_form(fx.form.id).await.unwrap();
    for name in ["first", "second"] {
        let validated = validate_submission(&schema, &answers_for(&fx)).unwrap();
        let header = NewSubmission::new(fx.form.id, Some(name.into()), None, None);
        fx.db.insert_submission(&header, &validated).await.unwrap();
    }

    let summaries = fx.db.submissions_by_form(fx.form.id, false).await.unwrap();
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.answers.is_empty()));

    let detailed = fx.db.submissions_by_form(fx.form.id, true).await.unwrap();
    assert_eq!(detailed.len(), 2);
    assert!(detailed.iter().all(|s| s.answers.len() == 2));

    assert_eq!(fx.db.submission_count(fx.form.id).await.unwrap(), 2);
}

#[tokio::test]
async fn test_delete_removes_header_and_answers() {
    let fx = fixture().await;

    let schema = fx.db.questions_by_form(fx.form.id).await.unwrap();
    let validated = validate_submission(&schema, &answers_for(&fx)).unwrap();
    let header = NewSubmission::new(fx.form.id, None, None, None);
    fx.db.insert_submission(&header, &validated).await.unwrap();

    fx.db.delete_submission(header.id).await.unwrap();

    assert!(fx.db.submission_by_id(header.id).await.unwrap().is_none());
    let remaining: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM filled_form_answers WHERE filled_form_id = ?")
            .bind(header.id)
            .fetch_one(fx.db.pool())
            .await
            .unwrap();
    assert_eq!(remaining, 0);

    let missing = fx.db.delete_submission(header.id).await;
    assert!(matches!(missing, Err(DbError::NotFound(_))));
}

#[tokio::test]
async fn test_two_identical_submissions_create_two_rows() {
    // Deliberately no deduplication: the same payload twice is two
    // independent submissions.
    let fx = fixture().await;

    let schema = fx.db.questions_by_form(fx.form.id).await.unwrap();
    for _ in 0..2 {
        let validated = validate_submission(&schema, &answers_for(&fx)).unwrap();
        let header = NewSubmission::new(fx.form.id, Some("Ada".into()), None, None);
        fx.db.insert_submission(&header, &validated).await.unwrap();
    }

    assert_eq!(fx.db.submission_count(fx.form.id).await.unwrap(), 2);
}
