//! Correlation tokens
//!
//! The build server does not hand back a build handle when a job is
//! triggered. Instead every trigger carries a token as the `buildId`
//! parameter, and later lookups find the build by scanning parameters for it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Name of the build parameter that carries the token
pub const TOKEN_PARAMETER: &str = "buildId";

/// Opaque correlation value embedded in a triggered build's parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    /// Generates a token of the form `<job>-<request>-<n>`
    ///
    /// Uniqueness comes from `source`; the job name and request id only make
    /// the token readable in the build server's UI.
    pub fn generate(source: &dyn TokenSource, job_name: &str, request_id: u64) -> Self {
        Self(format!("{}-{}-{}", job_name, request_id, source.next_value()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for Token {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for Token {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Source of the varying part of a token
///
/// Only needs to avoid collisions among submissions that are alive in the
/// build server's queue and history at the same time. It does not need to be
/// unpredictable.
pub trait TokenSource: Send + Sync {
    fn next_value(&self) -> u64;
}

/// Draws token values from the thread-local RNG
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTokenSource;

impl TokenSource for RandomTokenSource {
    fn next_value(&self) -> u64 {
        rand::random()
    }
}

/// Hands out consecutive values, for deterministic tokens in tests
#[derive(Debug, Default)]
pub struct SequentialTokenSource {
    next: AtomicU64,
}

impl SequentialTokenSource {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl TokenSource for SequentialTokenSource {
    fn next_value(&self) -> u64 {
        self.next.fetch_add(1, Ordering::Relaxed)
    }
}

impl<F> TokenSource for F
where
    F: Fn() -> u64 + Send + Sync,
{
    fn next_value(&self) -> u64 {
        self()
    }
}
