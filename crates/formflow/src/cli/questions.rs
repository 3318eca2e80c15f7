//! Question management commands.

use anyhow::{bail, Result};
use clap::Subcommand;
use formflow::SubmissionService;
use formflow_core::{Question, QuestionKind};

use super::output::print_table;
use super::resolve_form;

#[derive(Subcommand, Debug)]
pub enum QuestionCommand {
    /// Append a question to a form
    Add {
        /// Form slug or id
        form_ref: String,

        /// Display text
        #[arg(long)]
        text: String,

        /// Ordinal position; appended after the last question when omitted
        #[arg(long)]
        position: Option<i32>,

        /// Require an answer in every submission
        #[arg(long)]
        required: bool,

        /// Allowed choice label; give two or more to make the question
        /// multiple choice
        #[arg(long = "choice")]
        choices: Vec<String>,

        /// Allow selecting more than one choice
        #[arg(long)]
        multiple: bool,
    },
}

pub async fn run(service: &SubmissionService, command: QuestionCommand) -> Result<()> {
    let db = service.db();

    match command {
        QuestionCommand::Add {
            form_ref,
            text,
            position,
            required,
            choices,
            multiple,
        } => {
            let form = resolve_form(db, &form_ref).await?;

            let position = match position {
                Some(position) => position,
                None => {
                    let schema = db.questions_by_form(form.id).await?;
                    schema.last().map(|q| q.position + 1).unwrap_or(1)
                }
            };

            let question = if choices.is_empty() {
                Question::basic(form.id, &text, position, required)
            } else if choices.len() < 2 {
                bail!("a multiple choice question needs at least two --choice flags");
            } else {
                Question::multiple_choice(form.id, &text, position, required, choices, multiple)
            };

            db.create_question(&question).await?;
            println!(
                "Added {} question at position {} ({})",
                question.kind.as_str(),
                question.position,
                question.id
            );
        }
    }

    Ok(())
}

pub async fn run_list(service: &SubmissionService, form_ref: &str) -> Result<()> {
    let db = service.db();
    let form = resolve_form(db, form_ref).await?;
    let schema = db.questions_by_form(form.id).await?;

    if schema.is_empty() {
        println!("Form '{}' has no questions yet", form.slug);
        return Ok(());
    }

    let rows = schema
        .iter()
        .map(|q| {
            let constraints = match &q.kind {
                QuestionKind::Basic => String::new(),
                QuestionKind::MultipleChoice {
                    choices,
                    allow_multiple,
                } => {
                    if *allow_multiple {
                        format!("{} (multiple)", choices.join(", "))
                    } else {
                        choices.join(", ")
                    }
                }
            };
            vec![
                q.position.to_string(),
                q.text.clone(),
                q.kind.as_str().to_string(),
                if q.required { "yes".into() } else { "no".into() },
                constraints,
                q.id.to_string(),
            ]
        })
        .collect();
    print_table(&["POS", "TEXT", "TYPE", "REQUIRED", "CHOICES", "ID"], rows);

    Ok(())
}
