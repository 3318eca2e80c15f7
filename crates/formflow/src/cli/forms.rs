//! Form management commands.

use anyhow::Result;
use clap::Subcommand;
use formflow::SubmissionService;
use formflow_core::{Form, FormStatus};
use uuid::Uuid;

use super::output::{format_time, print_table};
use super::resolve_form;

#[derive(Subcommand, Debug)]
pub enum FormCommand {
    /// Create a new form (accepts submissions immediately)
    Create {
        /// URL-friendly unique reference
        #[arg(long)]
        slug: String,

        #[arg(long)]
        title: String,

        #[arg(long)]
        description: Option<String>,

        /// Owner identity; a fresh one is generated when omitted
        #[arg(long)]
        author: Option<Uuid>,
    },

    /// List all forms
    List,

    /// Stop accepting submissions
    Close {
        /// Form slug or id
        form_ref: String,
    },

    /// Resume accepting submissions
    Open {
        /// Form slug or id
        form_ref: String,
    },
}

pub async fn run(service: &SubmissionService, command: FormCommand) -> Result<()> {
    let db = service.db();

    match command {
        FormCommand::Create {
            slug,
            title,
            description,
            author,
        } => {
            let author_id = author.unwrap_or_else(Uuid::new_v4);
            let form = Form::new(author_id, &slug, &title, description);
            db.create_form(&form).await?;
            println!("Created form '{}' ({})", form.slug, form.id);
        }
        FormCommand::List => {
            let forms = db.list_forms().await?;
            if forms.is_empty() {
                println!("No forms yet");
                return Ok(());
            }
            let rows = forms
                .iter()
                .map(|f| {
                    vec![
                        f.slug.clone(),
                        f.title.clone(),
                        f.status.to_string(),
                        f.id.to_string(),
                        format_time(f.created_at),
                    ]
                })
                .collect();
            print_table(&["SLUG", "TITLE", "STATUS", "ID", "CREATED"], rows);
        }
        FormCommand::Close { form_ref } => {
            let form = resolve_form(db, &form_ref).await?;
            db.set_form_status(form.id, FormStatus::Closed).await?;
            println!("Form '{}' is now closed", form.slug);
        }
        FormCommand::Open { form_ref } => {
            let form = resolve_form(db, &form_ref).await?;
            db.set_form_status(form.id, FormStatus::Open).await?;
            println!("Form '{}' is now open", form.slug);
        }
    }

    Ok(())
}
