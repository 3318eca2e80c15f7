//! Formflow command line interface.
//!
//! Thin front end over the service layer: manage forms and questions,
//! accept submissions from JSON documents, and inspect what was collected.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use formflow::config::Config;
use formflow::SubmissionService;
use formflow_db::FormflowDb;

mod cli;

#[derive(Parser, Debug)]
#[command(name = "formflow", about = "Form builder backend")]
struct Cli {
    /// Enable verbose logging (info/debug to stderr)
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Override the database path
    #[arg(long, global = true, env = "FORMFLOW_DATABASE")]
    database: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage forms
    #[command(subcommand)]
    Form(cli::forms::FormCommand),

    /// Manage questions on a form
    #[command(subcommand)]
    Question(cli::questions::QuestionCommand),

    /// List a form's questions in display order
    Questions {
        /// Form slug or id
        form_ref: String,
    },

    /// Submit answers to a form from a JSON document
    Submit(cli::submissions::SubmitArgs),

    /// List a form's submissions, newest first
    Submissions {
        /// Form slug or id
        form_ref: String,

        /// Load every answer instead of header lines only
        #[arg(long)]
        detailed: bool,
    },

    /// Inspect or delete a single submission
    #[command(subcommand)]
    Submission(cli::submissions::SubmissionCommand),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _guard = formflow_logging::init_logging("formflow", cli.verbose)?;

    let config = Config::load()?;
    let database = cli.database.unwrap_or(config.database_path);
    let db = FormflowDb::open(&database).await?;
    let service = SubmissionService::new(db);

    match cli.command {
        Commands::Form(command) => cli::forms::run(&service, command).await,
        Commands::Question(command) => cli::questions::run(&service, command).await,
        Commands::Questions { form_ref } => cli::questions::run_list(&service, &form_ref).await,
        Commands::Submit(args) => cli::submissions::run_submit(&service, args).await,
        Commands::Submissions { form_ref, detailed } => {
            cli::submissions::run_list(&service, &form_ref, detailed).await
        }
        Commands::Submission(command) => cli::submissions::run(&service, command).await,
    }
}
