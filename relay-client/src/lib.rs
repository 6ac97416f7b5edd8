//! Relay HTTP Client
//!
//! Triggers jobs on a Jenkins-style build server and tracks them through the
//! server's queue and build history.
//!
//! The server's trigger response carries no build handle, so every trigger
//! embeds a correlation token as a build parameter. Later calls find the
//! build again by scanning queue and history listings for that token.
//!
//! # Example
//!
//! ```no_run
//! use relay_client::{ClientConfig, SubmitRequest, TriggerClient};
//!
//! # async fn example() -> relay_client::Result<()> {
//! let config = ClientConfig::new("https://jenkins.example.com")
//!     .with_credentials("bot", "api-token");
//! let client = TriggerClient::new(config)?;
//!
//! let submission = client
//!     .submit(&SubmitRequest::new("pull-unit", 42, "main"))
//!     .await?;
//!
//! match client.resolve(&submission).await {
//!     Ok(outcome) if outcome.is_running() => println!("still running"),
//!     Ok(outcome) => println!("finished: {}", outcome.result_location()),
//!     Err(e) if e.is_not_found() => println!("not listed yet, poll again"),
//!     Err(e) => return Err(e),
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
mod history;
mod queue;
pub mod transport;
mod trigger;

#[cfg(test)]
mod testing;

// Re-export commonly used types
pub use config::{ClientConfig, Credentials};
pub use error::{ClientError, Result};
pub use history::HISTORY_TREE;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, Method, Transport, TransportError};
pub use trigger::{BRANCH_PARAMETER, REQUEST_ID_PARAMETER, SubmitRequest};

use relay_core::domain::submission::Submission;
use relay_core::token::{RandomTokenSource, TokenSource};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Client for the trigger / queue / history protocol
///
/// Cheap to clone. Holds no mutable state, so one client can poll many
/// submissions concurrently, including several submissions of the same job.
#[derive(Clone)]
pub struct TriggerClient {
    config: Arc<ClientConfig>,
    transport: Arc<dyn Transport>,
    tokens: Arc<dyn TokenSource>,
    timeout: Duration,
}

impl TriggerClient {
    /// Create a client that talks to `config.base_url` over HTTP
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(config.base_url.clone(), config.credentials.clone());
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Result<Self> {
        config.validate()?;
        let timeout = config.request_timeout;
        Ok(Self {
            config: Arc::new(config),
            transport,
            tokens: Arc::new(RandomTokenSource),
            timeout,
        })
    }

    /// Replace the randomness behind correlation tokens
    pub fn with_token_source(mut self, tokens: Arc<dyn TokenSource>) -> Self {
        self.tokens = tokens;
        self
    }

    /// Copy of this client whose requests use `timeout` as their deadline
    pub fn with_timeout(&self, timeout: Duration) -> Self {
        Self {
            timeout,
            ..self.clone()
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn is_simulated(&self) -> bool {
        self.config.simulate
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    // =============================================================================
    // Request Helpers
    // =============================================================================

    /// Send one request, bounded by the client's deadline
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        match tokio::time::timeout(self.timeout, self.transport.execute(request)).await {
            Ok(response) => Ok(response?),
            Err(_) => Err(ClientError::Timeout(self.timeout)),
        }
    }

    /// Check for a 2xx status and decode the JSON body
    fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
        if !response.is_success() {
            return Err(ClientError::unexpected_status(
                response.status,
                response.text(),
            ));
        }

        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Reject submissions that cannot be correlated
    fn ensure_trackable(submission: &Submission) -> Result<()> {
        if submission.token().is_empty() {
            return Err(ClientError::InvalidRequest(
                "submission has no correlation token".to_string(),
            ));
        }
        if submission.job_name().is_empty() {
            return Err(ClientError::InvalidRequest(
                "submission has no job name".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for TriggerClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TriggerClient")
            .field("config", &self.config)
            .field("timeout", &self.timeout)
            .finish()
    }
}
