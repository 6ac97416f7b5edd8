//! Configuration module
//!
//! Turns global command-line flags (with environment fallbacks) into the
//! client configuration.

use anyhow::{Context, Result, bail};
use clap::Args;
use relay_client::config::DEFAULT_RESULT_BASE_URL;
use relay_client::{ClientConfig, TriggerClient};
use std::time::Duration;

/// Flags shared by every command
#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Build server URL
    #[arg(
        long,
        global = true,
        env = "RELAY_BASE_URL",
        default_value = "http://localhost:8080"
    )]
    pub base_url: String,

    /// User for basic auth
    #[arg(long, global = true, env = "RELAY_USER")]
    pub user: Option<String>,

    /// API token for basic auth
    #[arg(long, global = true, env = "RELAY_API_TOKEN", hide_env_values = true)]
    pub api_token: Option<String>,

    /// Print what would happen without contacting the build server
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Per-request timeout in seconds
    #[arg(long, global = true, env = "RELAY_TIMEOUT", default_value_t = 30)]
    pub timeout: u64,

    /// Prefix of result (log viewer) URLs
    #[arg(
        long,
        global = true,
        env = "RELAY_RESULT_BASE_URL",
        default_value = DEFAULT_RESULT_BASE_URL
    )]
    pub result_base_url: String,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,
}

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub client: ClientConfig,
    /// Emit JSON instead of colored text
    pub json: bool,
}

impl Config {
    pub fn from_args(args: GlobalArgs) -> Result<Self> {
        let client = if args.dry_run {
            ClientConfig::simulated(args.base_url)
        } else {
            ClientConfig::new(args.base_url)
        };

        let client = match (args.user, args.api_token) {
            (Some(user), Some(token)) => client.with_credentials(user, token),
            (None, None) => client,
            _ => bail!("--user and --api-token must be given together"),
        };

        let client = client
            .with_request_timeout(Duration::from_secs(args.timeout))
            .with_result_base_url(args.result_base_url);

        client.validate().context("Invalid client configuration")?;

        Ok(Self {
            client,
            json: args.json,
        })
    }

    pub fn build_client(&self) -> Result<TriggerClient> {
        TriggerClient::new(self.client.clone()).context("Failed to create build server client")
    }
}
