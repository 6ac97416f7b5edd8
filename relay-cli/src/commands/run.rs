//! Run command handler
//!
//! Triggers a job once, then polls until it finishes.

use anyhow::{Context, Result, bail};
use clap::Args;
use relay_client::{SubmitRequest, TriggerClient};
use std::time::Duration;
use tracing::info;

use super::{print_json, print_outcome, print_state, print_submission};
use crate::config::Config;
use crate::watch::{PollPolicy, watch};

/// Polling flags
#[derive(Debug, Clone, Args)]
pub struct PollArgs {
    /// Seconds between polls
    #[arg(long, default_value_t = 10)]
    pub interval: u64,

    /// Polls tolerated while the build is missing from the history
    #[arg(long, default_value_t = 30)]
    pub not_found_limit: u32,

    /// Consecutive transport failures tolerated
    #[arg(long, default_value_t = 5)]
    pub retries: u32,

    /// Give up after this many minutes (0 waits forever)
    #[arg(long, default_value_t = 240)]
    pub max_wait: u64,
}

impl From<PollArgs> for PollPolicy {
    fn from(args: PollArgs) -> Self {
        Self {
            interval: Duration::from_secs(args.interval.max(1)),
            not_found_limit: args.not_found_limit,
            transient_error_limit: args.retries,
            deadline: (args.max_wait > 0)
                .then(|| Duration::from_secs(args.max_wait.saturating_mul(60))),
            ..PollPolicy::default()
        }
    }
}

pub async fn run(
    client: &TriggerClient,
    config: &Config,
    job: String,
    request: u64,
    branch: String,
    poll: PollArgs,
) -> Result<()> {
    let policy = PollPolicy::from(poll);

    let submission = client
        .submit(&SubmitRequest::new(job, request, branch))
        .await
        .context("Failed to trigger job")?;

    if !config.json {
        print_submission(&submission);
    }
    info!(
        "Waiting for {} (poll every {:?})",
        submission.token(),
        policy.interval
    );

    let json = config.json;
    let outcome = watch(client, &submission, &policy, |state| {
        if !json {
            print_state(state);
        }
    })
    .await?;

    if json {
        print_json(&serde_json::json!({
            "submission": submission,
            "outcome": outcome,
        }))?;
    } else {
        print_outcome(&outcome);
    }

    if !outcome.succeeded() {
        bail!(
            "{} finished without success: {}",
            submission.token(),
            outcome.result_location()
        );
    }
    Ok(())
}
