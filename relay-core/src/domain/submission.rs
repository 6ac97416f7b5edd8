//! Submission domain type

use serde::{Deserialize, Serialize};

use crate::token::Token;

/// One triggered job, tracked by its correlation token
///
/// Created once when the trigger is accepted and never modified afterwards.
/// The empty value (`Submission::default()`) is what simulation mode hands out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    job_name: String,
    request_id: u64,
    token: Token,
    accepted_location: Option<String>,
}

impl Submission {
    pub fn new(
        job_name: impl Into<String>,
        request_id: u64,
        token: Token,
        accepted_location: Option<String>,
    ) -> Self {
        Self {
            job_name: job_name.into(),
            request_id,
            token,
            accepted_location,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    /// The change or pull request number this build is for
    pub fn request_id(&self) -> u64 {
        self.request_id
    }

    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Location header returned when the trigger was accepted
    pub fn accepted_location(&self) -> Option<&str> {
        self.accepted_location.as_deref()
    }

    /// True for the empty submission produced in simulation mode
    pub fn is_simulated(&self) -> bool {
        self.token.is_empty()
    }

    /// Queue item number parsed from a `.../queue/item/<n>/` location
    pub fn queue_item_id(&self) -> Option<u64> {
        let location = self.accepted_location.as_deref()?;
        let mut segments = location.trim_end_matches('/').rsplit('/');
        let id = segments.next()?.parse().ok()?;
        (segments.next()? == "item").then_some(id)
    }
}
