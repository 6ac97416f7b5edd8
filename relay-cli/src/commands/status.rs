//! Queue and status command handlers

use anyhow::{Context, Result};
use clap::Args;
use colored::*;
use relay_client::TriggerClient;
use relay_core::domain::submission::Submission;
use relay_core::token::Token;

use super::{print_json, print_outcome};
use crate::config::Config;

/// Identifies an earlier submission
#[derive(Debug, Clone, Args)]
pub struct SubmissionArgs {
    /// Job that was triggered
    #[arg(long)]
    pub job: String,

    /// Change/pull request number
    #[arg(long)]
    pub request: u64,

    /// Correlation token printed by `submit`
    #[arg(long)]
    pub token: String,
}

impl From<SubmissionArgs> for Submission {
    fn from(args: SubmissionArgs) -> Self {
        Submission::new(args.job, args.request, Token::from(args.token), None)
    }
}

pub async fn queued(client: &TriggerClient, config: &Config, args: SubmissionArgs) -> Result<()> {
    let submission = Submission::from(args);
    let queued = client
        .is_queued(&submission)
        .await
        .context("Failed to read the build queue")?;

    if config.json {
        return print_json(&serde_json::json!({
            "token": submission.token(),
            "queued": queued,
        }));
    }

    if queued {
        println!("{} {}", submission.token(), "is queued".cyan());
    } else {
        println!("{} {}", submission.token(), "is not queued".dimmed());
    }
    Ok(())
}

pub async fn status(client: &TriggerClient, config: &Config, args: SubmissionArgs) -> Result<()> {
    let submission = Submission::from(args);

    match client.resolve(&submission).await {
        Ok(outcome) if config.json => print_json(&outcome),
        Ok(outcome) => {
            print_outcome(&outcome);
            Ok(())
        }
        Err(e) if e.is_not_found() => {
            if config.json {
                print_json(&serde_json::json!({
                    "token": submission.token(),
                    "state": "unknown",
                }))
            } else {
                let message = format!(
                    "{} is not in the build history yet; try again shortly",
                    submission.token()
                );
                println!("{}", message.yellow());
                Ok(())
            }
        }
        Err(e) => Err(e).context("Failed to resolve build status"),
    }
}
