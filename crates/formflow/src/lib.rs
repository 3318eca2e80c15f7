//! Formflow service layer.
//!
//! Orchestrates the submission pipeline on top of `formflow_core`
//! (validation) and `formflow_db` (persistence). The CLI binary and any
//! future front end consume [`service::SubmissionService`]; nothing here
//! knows about HTTP or terminals.

pub mod config;
pub mod service;

pub use service::{SubmissionError, SubmissionService};
