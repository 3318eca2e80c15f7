//! Submission validation.
//!
//! Pure decision logic: given a form's question schema and a caller's raw
//! answers, either produce a normalized [`ValidatedAnswerSet`] or reject
//! with a single [`RejectionReason`]. Evaluation is driven by the schema in
//! ascending position order, never by the client-supplied answer order, so
//! the outcome is identical under any permutation of the input.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::types::{AnswerValue, Question, QuestionKind, RawAnswer, ValidatedAnswer, ValidatedAnswerSet};

/// Why a submission was rejected. Terminal, client-caused; never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectionReason {
    /// A question was referenced by more than one answer
    #[error("question {question_id} was answered more than once")]
    DuplicateAnswer { question_id: Uuid },

    /// An answer references a question outside the target form
    #[error("answer references unknown question {question_id}")]
    UnknownQuestion { question_id: Uuid },

    /// More than one choice selected where the question allows one
    #[error("multiple selections are not allowed for question {question_id}")]
    MultipleSelectionNotAllowed { question_id: Uuid },

    /// A selected label is not among the question's allowed choices
    #[error("invalid choice '{label}' for question {question_id}")]
    InvalidChoice { question_id: Uuid, label: String },

    /// A required question has no answer content
    #[error("an answer is required for question {question_id}")]
    RequiredAnswerMissing { question_id: Uuid },
}

impl RejectionReason {
    /// The question the rejection refers to.
    pub fn question_id(&self) -> Uuid {
        match self {
            Self::DuplicateAnswer { question_id }
            | Self::UnknownQuestion { question_id }
            | Self::MultipleSelectionNotAllowed { question_id }
            | Self::InvalidChoice { question_id, .. }
            | Self::RequiredAnswerMissing { question_id } => *question_id,
        }
    }
}

/// Validate a candidate submission against the authoritative question
/// schema of its target form.
///
/// `schema` must be the complete question list for the form; this function
/// never queries storage. Fails fast with the first violated rule:
/// duplicates, then unknown questions, then choice constraints over the
/// schema in position order, then required-answer checks in the same
/// order. On success the accepted answers are copied out and normalized so
/// basic questions carry only text and multiple-choice questions carry
/// only their selection.
pub fn validate_submission(
    schema: &[Question],
    answers: &[RawAnswer],
) -> Result<ValidatedAnswerSet, RejectionReason> {
    let by_question: HashMap<Uuid, &Question> = schema.iter().map(|q| (q.id, q)).collect();

    // Index answers by question. Ties in duplicate/unknown reporting are
    // broken by Uuid order so the outcome does not depend on input order.
    let mut submitted: HashMap<Uuid, &RawAnswer> = HashMap::with_capacity(answers.len());
    let mut duplicates: Vec<Uuid> = Vec::new();
    for answer in answers {
        if submitted.insert(answer.question_id, answer).is_some() {
            duplicates.push(answer.question_id);
        }
    }
    if let Some(question_id) = duplicates.into_iter().min() {
        return Err(RejectionReason::DuplicateAnswer { question_id });
    }

    if let Some(question_id) = submitted
        .keys()
        .filter(|id| !by_question.contains_key(*id))
        .min()
        .copied()
    {
        return Err(RejectionReason::UnknownQuestion { question_id });
    }

    let mut ordered: Vec<&Question> = schema.iter().collect();
    ordered.sort_by_key(|q| q.position);

    // Choice constraints for every multiple-choice question with a
    // non-empty selection.
    for question in &ordered {
        let QuestionKind::MultipleChoice {
            choices,
            allow_multiple,
        } = &question.kind
        else {
            continue;
        };
        let Some(answer) = submitted.get(&question.id) else {
            continue;
        };
        if answer.selected_choices.is_empty() {
            continue;
        }

        if !*allow_multiple && answer.selected_choices.len() > 1 {
            return Err(RejectionReason::MultipleSelectionNotAllowed {
                question_id: question.id,
            });
        }
        for label in &answer.selected_choices {
            if !choices.contains(label) {
                return Err(RejectionReason::InvalidChoice {
                    question_id: question.id,
                    label: label.clone(),
                });
            }
        }
    }

    // Required questions must have answer content.
    for question in &ordered {
        if question.required && !has_content(submitted.get(&question.id).copied()) {
            return Err(RejectionReason::RequiredAnswerMissing {
                question_id: question.id,
            });
        }
    }

    // Defensive copy, normalized per question kind. Entries left with no
    // content are omitted; there is nothing to persist for them.
    let mut validated = Vec::new();
    for question in &ordered {
        let Some(answer) = submitted.get(&question.id) else {
            continue;
        };
        let value = match &question.kind {
            QuestionKind::Basic => match answer.text.as_deref() {
                Some(text) if !text.is_empty() => AnswerValue::Text(text.to_string()),
                _ => continue,
            },
            QuestionKind::MultipleChoice { .. } => {
                if answer.selected_choices.is_empty() {
                    continue;
                }
                AnswerValue::Choices(answer.selected_choices.clone())
            }
        };
        validated.push(ValidatedAnswer {
            question_id: question.id,
            position: question.position,
            value,
        });
    }

    Ok(ValidatedAnswerSet::new(validated))
}

fn has_content(answer: Option<&RawAnswer>) -> bool {
    match answer {
        Some(a) => {
            a.text.as_deref().map_or(false, |t| !t.is_empty()) || !a.selected_choices.is_empty()
        }
        None => false,
    }
}
