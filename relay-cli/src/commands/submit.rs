//! Submit command handler

use anyhow::{Context, Result};
use relay_client::{SubmitRequest, TriggerClient};

use super::{print_json, print_submission};
use crate::config::Config;

pub async fn submit(
    client: &TriggerClient,
    config: &Config,
    job: String,
    request: u64,
    branch: String,
) -> Result<()> {
    let submission = client
        .submit(&SubmitRequest::new(job, request, branch))
        .await
        .context("Failed to trigger job")?;

    if config.json {
        print_json(&submission)
    } else {
        print_submission(&submission);
        Ok(())
    }
}
