//! CLI command implementations for the formflow binary.

pub mod forms;
pub mod output;
pub mod questions;
pub mod submissions;

use anyhow::{bail, Result};
use formflow_core::Form;
use formflow_db::FormflowDb;

/// Resolve a form by slug or id, failing with a user-facing message.
pub async fn resolve_form(db: &FormflowDb, form_ref: &str) -> Result<Form> {
    match db.form_by_ref(form_ref).await? {
        Some(form) => Ok(form),
        None => bail!("form not found: {form_ref}"),
    }
}
