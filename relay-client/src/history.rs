//! Build history endpoint

use relay_core::correlation::{TokenMatch, find_by_token, resolve_outcome};
use relay_core::domain::outcome::Outcome;
use relay_core::domain::submission::Submission;
use relay_core::dto::remote::BuildHistory;
use tracing::{debug, warn};

use crate::TriggerClient;
use crate::error::{ClientError, Result};
use crate::transport::HttpRequest;

/// Tree filter limiting the history response to what correlation reads
pub const HISTORY_TREE: &str = "builds[number,result,actions[parameters[name,value]]]";

impl TriggerClient {
    // =============================================================================
    // History
    // =============================================================================

    /// Current outcome of the submission's build
    ///
    /// # Errors
    /// - [`ClientError::BuildNotFound`] while the history does not list the
    ///   build yet. Expected right after a trigger; poll again.
    /// - [`ClientError::AmbiguousBuild`] if several builds carry the token.
    ///
    /// In simulation mode, a finished success without a result URL.
    pub async fn resolve(&self, submission: &Submission) -> Result<Outcome> {
        if self.is_simulated() {
            return Ok(Outcome::simulated());
        }

        Self::ensure_trackable(submission)?;

        let request = HttpRequest::get(format!("/job/{}/api/json", submission.job_name()))
            .query("tree", HISTORY_TREE);
        let response = self.send(request).await?;
        let history: BuildHistory = Self::decode(&response)?;
        let records = history.into_records();

        let token = submission.token();
        match find_by_token(&records, token) {
            TokenMatch::None => {
                debug!(
                    "{} not in {} build(s) of {}",
                    token,
                    records.len(),
                    submission.job_name()
                );
                Err(ClientError::BuildNotFound {
                    token: token.clone(),
                })
            }
            TokenMatch::Many(matches) => {
                warn!(
                    "Token {} matched {} builds of {}",
                    token,
                    matches,
                    submission.job_name()
                );
                Err(ClientError::AmbiguousBuild {
                    token: token.clone(),
                    matches,
                })
            }
            TokenMatch::One(record) => {
                let outcome = resolve_outcome(record, submission, &self.config.result_base_url);
                debug!(
                    "{} is build #{} of {}: {:?}",
                    token,
                    record.number,
                    submission.job_name(),
                    outcome
                );
                Ok(outcome)
            }
        }
    }
}
