//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod run;
mod status;
mod submit;

pub use run::PollArgs;
pub use status::SubmissionArgs;

use anyhow::Result;
use clap::Subcommand;
use colored::*;
use relay_core::domain::outcome::Outcome;
use relay_core::domain::submission::Submission;
use relay_core::state::SubmissionState;
use serde::Serialize;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Trigger a job for a change
    Submit {
        /// Job to trigger
        #[arg(long)]
        job: String,

        /// Change/pull request number
        #[arg(long)]
        request: u64,

        /// Target branch
        #[arg(long)]
        branch: String,
    },
    /// Check whether a submission is still waiting in the queue
    Queued {
        #[command(flatten)]
        submission: SubmissionArgs,
    },
    /// Resolve the current outcome of a submission
    Status {
        #[command(flatten)]
        submission: SubmissionArgs,
    },
    /// Trigger a job and wait for it to finish
    Run {
        /// Job to trigger
        #[arg(long)]
        job: String,

        /// Change/pull request number
        #[arg(long)]
        request: u64,

        /// Target branch
        #[arg(long)]
        branch: String,

        #[command(flatten)]
        poll: PollArgs,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    let client = config.build_client()?;

    match command {
        Commands::Submit {
            job,
            request,
            branch,
        } => submit::submit(&client, config, job, request, branch).await,
        Commands::Queued { submission } => status::queued(&client, config, submission).await,
        Commands::Status { submission } => status::status(&client, config, submission).await,
        Commands::Run {
            job,
            request,
            branch,
            poll,
        } => run::run(&client, config, job, request, branch, poll).await,
    }
}

// =============================================================================
// Output
// =============================================================================

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_submission(submission: &Submission) {
    if submission.is_simulated() {
        println!("{}", "Dry run: nothing was triggered.".yellow());
        return;
    }

    println!(
        "{} {} for request {}",
        "Triggered".green().bold(),
        submission.job_name().bold(),
        submission.request_id()
    );
    println!("  {}  {}", "Token:".dimmed(), submission.token());
    if let Some(location) = submission.accepted_location() {
        println!("  {}  {}", "Queue:".dimmed(), location);
    }
    if let Some(id) = submission.queue_item_id() {
        println!("  {}   {}", "Item:".dimmed(), id);
    }
}

fn print_outcome(outcome: &Outcome) {
    match outcome {
        Outcome::Running { build_number } => {
            println!("{} (build #{})", "Running".cyan().bold(), build_number);
        }
        Outcome::Finished {
            build_number,
            result,
            ..
        } => {
            let label = if outcome.succeeded() {
                result.as_str().green().bold()
            } else {
                result.as_str().red().bold()
            };
            match build_number {
                Some(number) => println!("{} (build #{})", label, number),
                None => println!("{}", label),
            }
            if !outcome.result_location().is_empty() {
                println!("  {}  {}", "Logs:".dimmed(), outcome.result_location());
            }
        }
    }
}

fn print_state(state: &SubmissionState) {
    let label = match state {
        SubmissionState::Completed { outcome } if outcome.succeeded() => state.label().green(),
        SubmissionState::Completed { .. } => state.label().red(),
        SubmissionState::Unknown => state.label().yellow(),
        _ => state.label().cyan(),
    };
    match state {
        SubmissionState::Running { build_number } => {
            println!("{} {} (build #{})", "→".dimmed(), label, build_number)
        }
        _ => println!("{} {}", "→".dimmed(), label),
    }
}
