//! Domain types shared by all Formflow layers.
//!
//! These types are the single source of truth. The persistence layer and
//! the CLI both consume them; neither defines its own parallel entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Forms
// ============================================================================

/// Lifecycle status of a form. Submissions are accepted only while `Open`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStatus {
    Open,
    Closed,
}

impl FormStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "open" => Some(Self::Open),
            "closed" => Some(Self::Closed),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, owned collection of ordered questions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Form {
    /// Unique identifier
    pub id: Uuid,
    /// Identity of the owning user (resolved by the auth collaborator)
    pub author_id: Uuid,
    /// URL-friendly reference, unique across forms
    pub slug: String,
    /// Display title
    pub title: String,
    pub description: Option<String>,
    pub status: FormStatus,
    pub created_at: DateTime<Utc>,
    pub modified_at: DateTime<Utc>,
}

impl Form {
    /// Create a new open form with a fresh identifier.
    pub fn new(author_id: Uuid, slug: &str, title: &str, description: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id,
            slug: slug.to_string(),
            title: title.to_string(),
            description,
            status: FormStatus::Open,
            created_at: now,
            modified_at: now,
        }
    }

    pub fn is_open(&self) -> bool {
        self.status == FormStatus::Open
    }
}

// ============================================================================
// Questions
// ============================================================================

/// Type-specific question payload.
///
/// Multiple-choice constraints travel with the variant, so validator
/// branches are exhaustive rather than keyed off a string column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    /// Free-text answer
    Basic,
    /// Selection from a fixed set of labels
    #[serde(rename_all = "camelCase")]
    MultipleChoice {
        choices: Vec<String>,
        #[serde(default)]
        allow_multiple: bool,
    },
}

impl QuestionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::MultipleChoice { .. } => "multiple_choice",
        }
    }

    pub fn is_multiple_choice(&self) -> bool {
        matches!(self, Self::MultipleChoice { .. })
    }
}

/// One form field, validated in ascending `position` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique identifier
    pub id: Uuid,
    /// Owning form
    pub form_id: Uuid,
    /// Display text
    pub text: String,
    /// Ordinal position, unique within the form
    pub position: i32,
    /// Whether a submission must answer this question
    pub required: bool,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub created_at: DateTime<Utc>,
}

impl Question {
    /// Create a free-text question.
    pub fn basic(form_id: Uuid, text: &str, position: i32, required: bool) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id,
            text: text.to_string(),
            position,
            required,
            kind: QuestionKind::Basic,
            created_at: Utc::now(),
        }
    }

    /// Create a multiple-choice question.
    pub fn multiple_choice(
        form_id: Uuid,
        text: &str,
        position: i32,
        required: bool,
        choices: Vec<String>,
        allow_multiple: bool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id,
            text: text.to_string(),
            position,
            required,
            kind: QuestionKind::MultipleChoice {
                choices,
                allow_multiple,
            },
            created_at: Utc::now(),
        }
    }
}

// ============================================================================
// Submission input (untrusted)
// ============================================================================

/// One caller-supplied answer, keyed by question identity. Untrusted until
/// it has passed validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAnswer {
    pub question_id: Uuid,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub selected_choices: Vec<String>,
}

/// A complete candidate submission as received from a caller.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionInput {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub answers: Vec<RawAnswer>,
}

// ============================================================================
// Validated answers
// ============================================================================

/// Normalized answer content. Exactly one representation per answer; the
/// cross-populated field of a raw answer never survives validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerValue {
    Text(String),
    Choices(Vec<String>),
}

impl AnswerValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Choices(_) => None,
        }
    }

    pub fn as_choices(&self) -> Option<&[String]> {
        match self {
            Self::Text(_) => None,
            Self::Choices(choices) => Some(choices),
        }
    }
}

/// One accepted answer, pinned to its question's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswer {
    pub question_id: Uuid,
    pub position: i32,
    pub value: AnswerValue,
}

/// The validator's output: accepted answers in ascending question-position
/// order. Only the validator constructs this.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedAnswerSet {
    answers: Vec<ValidatedAnswer>,
}

impl ValidatedAnswerSet {
    pub(crate) fn new(answers: Vec<ValidatedAnswer>) -> Self {
        Self { answers }
    }

    pub fn answers(&self) -> &[ValidatedAnswer] {
        &self.answers
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }
}

// ============================================================================
// Persisted submissions
// ============================================================================

/// Header fields for a submission about to be written.
#[derive(Debug, Clone)]
pub struct NewSubmission {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub client_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewSubmission {
    pub fn new(
        form_id: Uuid,
        name: Option<String>,
        email: Option<String>,
        client_ip: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            form_id,
            name,
            email,
            client_ip,
            created_at: Utc::now(),
        }
    }
}

/// One respondent's persisted submission against a form. Owns its answer
/// rows; they are created and deleted together.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledForm {
    pub id: Uuid,
    pub form_id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub client_ip: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Ordered by the owning question's position. Empty in summary
    /// listings.
    #[serde(default)]
    pub answers: Vec<FilledFormAnswer>,
}

/// One persisted answer within a submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilledFormAnswer {
    pub id: Uuid,
    pub filled_form_id: Uuid,
    pub question_id: Uuid,
    pub value: AnswerValue,
    pub created_at: DateTime<Utc>,
}
