//! Client configuration
//!
//! Captured once when the client is built and never mutated afterwards, so
//! clones of the client can be shared freely across concurrent polls.

use reqwest::Url;
use std::fmt;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Log viewer prefix used for result URLs unless configured otherwise
pub const DEFAULT_RESULT_BASE_URL: &str =
    "https://k8s-gubernator.appspot.com/build/kubernetes-jenkins/pr-logs/pull";

/// Upper bound on a single request when the caller does not pick one
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// User name and API token sent as HTTP basic auth
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub api_token: String,
}

impl Credentials {
    pub fn new(user: impl Into<String>, api_token: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            api_token: api_token.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("api_token", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Build server base URL (e.g., "https://jenkins.example.com")
    pub base_url: String,

    pub credentials: Option<Credentials>,

    /// Return canned results without touching the network
    pub simulate: bool,

    /// Deadline applied to every request
    pub request_timeout: Duration,

    /// Prefix of the log viewer URLs attached to finished outcomes
    pub result_base_url: String,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            credentials: None,
            simulate: false,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            result_base_url: DEFAULT_RESULT_BASE_URL.to_string(),
        }
    }

    /// Dry-run configuration: every operation returns its canned result
    pub fn simulated(base_url: impl Into<String>) -> Self {
        Self {
            simulate: true,
            ..Self::new(base_url)
        }
    }

    pub fn with_credentials(
        mut self,
        user: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials::new(user, api_token));
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_result_base_url(mut self, url: impl Into<String>) -> Self {
        self.result_base_url = url.into();
        self
    }

    /// Validates the configuration
    ///
    /// The base URL is only checked when requests will actually be sent.
    pub fn validate(&self) -> Result<()> {
        if !self.simulate {
            if self.base_url.is_empty() {
                return Err(ClientError::InvalidConfig(
                    "base_url cannot be empty".to_string(),
                ));
            }

            if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
                return Err(ClientError::InvalidConfig(
                    "base_url must start with http:// or https://".to_string(),
                ));
            }

            if let Err(e) = Url::parse(&self.base_url) {
                return Err(ClientError::InvalidConfig(format!(
                    "base_url is not a valid URL: {}",
                    e
                )));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        if self.result_base_url.is_empty() {
            return Err(ClientError::InvalidConfig(
                "result_base_url cannot be empty".to_string(),
            ));
        }

        if let Some(creds) = &self.credentials {
            if creds.user.is_empty() {
                return Err(ClientError::InvalidConfig(
                    "credentials need a non-empty user".to_string(),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::new("https://ci.example.com");
        assert!(!config.simulate);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
        assert_eq!(config.result_base_url, DEFAULT_RESULT_BASE_URL);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::new("ci.example.com");
        assert!(config.validate().is_err());

        config.base_url = "http://ci.example.com".to_string();
        assert!(config.validate().is_ok());

        let config = config.with_request_timeout(Duration::ZERO);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unparseable_base_url_is_rejected() {
        for url in ["http://[bad-host", "https://", "http://ci.example.com:99999"] {
            let err = ClientConfig::new(url).validate().unwrap_err();
            assert!(
                matches!(err, ClientError::InvalidConfig(_)),
                "{} was accepted",
                url
            );
        }
    }

    #[test]
    fn test_simulated_skips_url_check() {
        let config = ClientConfig::simulated("");
        assert!(config.simulate);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_credentials_are_redacted() {
        let config =
            ClientConfig::new("https://ci.example.com").with_credentials("bot", "hunter2");
        let printed = format!("{:?}", config);
        assert!(printed.contains("bot"));
        assert!(!printed.contains("hunter2"));
        assert!(config.validate().is_ok());
    }
}
