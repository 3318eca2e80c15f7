//! Submission commands: submit, list, show, delete.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use formflow::SubmissionService;
use formflow_core::{FilledForm, SubmissionInput};
use uuid::Uuid;

use super::output::{format_answer, format_time, print_table};

#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Form slug or id
    pub form_ref: String,

    /// Path of a JSON document carrying the answers (and optionally
    /// name/email)
    #[arg(long)]
    pub answers: PathBuf,

    /// Respondent name (overrides the document)
    #[arg(long)]
    pub name: Option<String>,

    /// Respondent email (overrides the document)
    #[arg(long)]
    pub email: Option<String>,

    /// Client IP to record with the submission
    #[arg(long)]
    pub ip: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum SubmissionCommand {
    /// Show one submission with its answers
    Show { id: Uuid },

    /// Delete a submission and its answers
    Delete { id: Uuid },
}

pub async fn run_submit(service: &SubmissionService, args: SubmitArgs) -> Result<()> {
    let raw = std::fs::read_to_string(&args.answers)
        .with_context(|| format!("Failed to read answers: {}", args.answers.display()))?;
    let mut input: SubmissionInput = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse answers: {}", args.answers.display()))?;

    if args.name.is_some() {
        input.name = args.name;
    }
    if args.email.is_some() {
        input.email = args.email;
    }

    let submission = service
        .submit(&args.form_ref, input, args.ip.as_deref())
        .await?;
    println!(
        "Accepted submission {} ({} answers)",
        submission.id,
        submission.answers.len()
    );

    Ok(())
}

pub async fn run_list(service: &SubmissionService, form_ref: &str, detailed: bool) -> Result<()> {
    let submissions = service.list_submissions(form_ref, detailed).await?;

    if submissions.is_empty() {
        println!("No submissions yet");
        return Ok(());
    }

    if !detailed {
        let rows = submissions
            .iter()
            .map(|s| {
                vec![
                    s.id.to_string(),
                    s.name.clone().unwrap_or_default(),
                    s.email.clone().unwrap_or_default(),
                    format_time(s.created_at),
                ]
            })
            .collect();
        print_table(&["ID", "NAME", "EMAIL", "CREATED"], rows);
        return Ok(());
    }

    for submission in &submissions {
        print_submission(submission);
        println!();
    }

    Ok(())
}

pub async fn run(service: &SubmissionService, command: SubmissionCommand) -> Result<()> {
    match command {
        SubmissionCommand::Show { id } => {
            let submission = service.submission(id).await?;
            print_submission(&submission);
        }
        SubmissionCommand::Delete { id } => {
            service.delete_submission(id).await?;
            println!("Deleted submission {id}");
        }
    }

    Ok(())
}

fn print_submission(submission: &FilledForm) {
    println!(
        "Submission {} ({})",
        submission.id,
        format_time(submission.created_at)
    );
    if let Some(name) = &submission.name {
        println!("  name:  {name}");
    }
    if let Some(email) = &submission.email {
        println!("  email: {email}");
    }
    if let Some(ip) = &submission.client_ip {
        println!("  ip:    {ip}");
    }
    for answer in &submission.answers {
        println!("  {} -> {}", answer.question_id, format_answer(&answer.value));
    }
}
