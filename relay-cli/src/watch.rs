//! Polling loop
//!
//! Drives a submission from trigger to a terminal outcome by probing the
//! queue and history until the build finishes or the policy gives up.

use anyhow::{Result, bail};
use relay_client::TriggerClient;
use relay_core::domain::outcome::Outcome;
use relay_core::domain::submission::Submission;
use relay_core::state::{Observation, SubmissionState};
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, warn};

/// When to poll and when to stop
#[derive(Debug, Clone)]
pub struct PollPolicy {
    /// Pause between polls
    pub interval: Duration,

    /// Consecutive "not found" polls tolerated before giving up
    pub not_found_limit: u32,

    /// Consecutive transport failures tolerated before giving up
    pub transient_error_limit: u32,

    /// Cap on the backoff after transport failures
    pub max_backoff: Duration,

    /// Total time to wait for a terminal outcome
    pub deadline: Option<Duration>,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            not_found_limit: 30,
            transient_error_limit: 5,
            max_backoff: Duration::from_secs(120),
            deadline: Some(Duration::from_secs(4 * 60 * 60)),
        }
    }
}

impl PollPolicy {
    /// Delay after the `failures`-th consecutive transport failure
    pub fn backoff(&self, failures: u32) -> Duration {
        let factor = 2u32.saturating_pow(failures.saturating_sub(1));
        self.interval.saturating_mul(factor).min(self.max_backoff)
    }
}

/// One poll: queue first, history only when the token is no longer queued
async fn probe(
    client: &TriggerClient,
    submission: &Submission,
) -> relay_client::Result<Observation> {
    if client.is_queued(submission).await? {
        return Ok(Observation::Queued);
    }

    match client.resolve(submission).await {
        Ok(outcome) => Ok(Observation::Found(outcome)),
        Err(e) if e.is_not_found() => Ok(Observation::NotFound),
        Err(e) => Err(e),
    }
}

/// Polls until the submission's build finishes
///
/// `on_change` sees every state transition, including the terminal one.
pub async fn watch<F>(
    client: &TriggerClient,
    submission: &Submission,
    policy: &PollPolicy,
    mut on_change: F,
) -> Result<Outcome>
where
    F: FnMut(&SubmissionState),
{
    let started = Instant::now();
    let mut state = SubmissionState::Submitted;
    let mut not_found = 0u32;
    let mut failures = 0u32;

    loop {
        let delay = match probe(client, submission).await {
            Ok(observation) => {
                failures = 0;
                if observation == Observation::NotFound {
                    not_found += 1;
                    if not_found > policy.not_found_limit {
                        bail!(
                            "build {} still not listed after {} polls",
                            submission.token(),
                            not_found
                        );
                    }
                } else {
                    not_found = 0;
                }

                let next = state.observe(observation);
                if next != state {
                    debug!("{}: {} -> {}", submission.token(), state.label(), next.label());
                    on_change(&next);
                    state = next;
                }

                if let Some(outcome) = state.outcome() {
                    return Ok(outcome.clone());
                }

                policy.interval
            }
            Err(e) if e.is_transient() => {
                failures += 1;
                if failures > policy.transient_error_limit {
                    return Err(anyhow::Error::new(e).context(format!(
                        "giving up on {} after {} consecutive failures",
                        submission.token(),
                        failures
                    )));
                }

                let delay = policy.backoff(failures);
                warn!(
                    "Poll failed ({}/{}): {}; retrying in {:?}",
                    failures, policy.transient_error_limit, e, delay
                );
                delay
            }
            Err(e) => return Err(e.into()),
        };

        if let Some(deadline) = policy.deadline {
            let wake = started.elapsed().checked_add(delay);
            if wake.is_none_or(|wake| wake > deadline) {
                bail!(
                    "gave up waiting for {} after {:?} ({})",
                    submission.token(),
                    deadline,
                    state.label()
                );
            }
        }

        tokio::time::sleep(delay).await;
    }
}
