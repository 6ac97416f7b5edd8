//! Queue listing endpoint

use relay_core::correlation::queue_contains;
use relay_core::domain::submission::Submission;
use relay_core::dto::remote::QueueListing;
use tracing::debug;

use crate::TriggerClient;
use crate::error::Result;
use crate::transport::HttpRequest;

impl TriggerClient {
    // =============================================================================
    // Queue
    // =============================================================================

    /// Whether the submission is still waiting in the server's queue
    ///
    /// `false` only means "not queued": the build may be running, finished,
    /// or not yet visible. Use [`TriggerClient::resolve`] to tell them apart.
    /// Always `false` in simulation mode.
    pub async fn is_queued(&self, submission: &Submission) -> Result<bool> {
        if self.is_simulated() {
            return Ok(false);
        }

        Self::ensure_trackable(submission)?;

        let response = self.send(HttpRequest::get("/queue/api/json")).await?;
        let listing: QueueListing = Self::decode(&response)?;
        let items = listing.into_items();

        let queued = queue_contains(&items, submission.token());
        debug!(
            "Queue has {} item(s); {} queued: {}",
            items.len(),
            submission.token(),
            queued
        );

        Ok(queued)
    }
}
