//! Core domain model and submission validation for Formflow.
//!
//! This crate holds the pure parts of the system: the form/question/answer
//! types and the validator that decides whether a candidate submission is
//! acceptable against a form's question schema. Nothing in here performs
//! I/O; persistence lives in `formflow_db`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use formflow_core::{validate_submission, Question, RawAnswer};
//!
//! let validated = validate_submission(&questions, &input.answers)?;
//! ```

mod types;
mod validate;

pub use types::*;
pub use validate::{validate_submission, RejectionReason};
