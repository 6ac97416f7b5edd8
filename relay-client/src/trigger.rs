//! Job trigger endpoint

use relay_core::domain::submission::Submission;
use relay_core::token::{TOKEN_PARAMETER, Token};
use tracing::{debug, info};

use crate::TriggerClient;
use crate::error::{ClientError, Result};
use crate::transport::HttpRequest;

/// Build parameter carrying the change/pull request number
pub const REQUEST_ID_PARAMETER: &str = "ghprbPullId";

/// Build parameter carrying the target branch
pub const BRANCH_PARAMETER: &str = "ghprbTargetBranch";

/// Which job to start, and for which change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    pub job_name: String,
    pub request_id: u64,
    pub branch: String,
}

impl SubmitRequest {
    pub fn new(job_name: impl Into<String>, request_id: u64, branch: impl Into<String>) -> Self {
        Self {
            job_name: job_name.into(),
            request_id,
            branch: branch.into(),
        }
    }

    fn validate(&self) -> Result<()> {
        if self.job_name.is_empty() {
            return Err(ClientError::InvalidRequest(
                "job name cannot be empty".to_string(),
            ));
        }
        if self.job_name.contains('/') {
            return Err(ClientError::InvalidRequest(format!(
                "job name '{}' must not contain '/'",
                self.job_name
            )));
        }
        if self.branch.is_empty() {
            return Err(ClientError::InvalidRequest(
                "branch cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl TriggerClient {
    // =============================================================================
    // Trigger
    // =============================================================================

    /// Start a build of `req.job_name` carrying a fresh correlation token
    ///
    /// This is the only call that makes the server do work. It is never
    /// retried here: a retry after an ambiguous failure could start a second
    /// build, so the caller decides.
    ///
    /// # Returns
    /// The submission to poll with [`TriggerClient::is_queued`] and
    /// [`TriggerClient::resolve`]. In simulation mode, the empty submission.
    pub async fn submit(&self, req: &SubmitRequest) -> Result<Submission> {
        if self.is_simulated() {
            debug!(
                "Simulation mode: not triggering {} for request {}",
                req.job_name, req.request_id
            );
            return Ok(Submission::default());
        }

        req.validate()?;

        let token = Token::generate(self.tokens.as_ref(), &req.job_name, req.request_id);
        let request = HttpRequest::post(format!("/job/{}/buildWithParameters", req.job_name))
            .query(REQUEST_ID_PARAMETER, req.request_id.to_string())
            .query(BRANCH_PARAMETER, req.branch.as_str())
            .query(TOKEN_PARAMETER, token.as_str());

        let response = self.send(request).await?;

        if response.status != 201 {
            return Err(ClientError::unexpected_status(
                response.status,
                response.text(),
            ));
        }

        let location = response.location.ok_or(ClientError::MissingLocation)?;

        info!(
            "Triggered {} for request {} on {} (token {}, location {})",
            req.job_name, req.request_id, req.branch, token, location
        );

        Ok(Submission::new(
            req.job_name.clone(),
            req.request_id,
            token,
            Some(location),
        ))
    }
}
