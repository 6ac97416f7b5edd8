//! Submission state machine
//!
//! Nothing is persisted between polls. A caller keeps the last state and
//! folds each fresh observation into it:
//!
//! ```text
//! Submitted -> Queued -> Running -> Completed
//!      \______________/
//! any non-terminal state -> Unknown when history has no match
//! ```

use serde::{Deserialize, Serialize};

use crate::domain::outcome::Outcome;

/// What one poll of the build server showed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// The token is still in the pending queue
    Queued,
    /// Neither queue nor history know the token yet
    NotFound,
    /// History has the build
    Found(Outcome),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SubmissionState {
    Submitted,
    Queued,
    Running { build_number: u64 },
    Completed { outcome: Outcome },
    /// History lagging behind the trigger; retry
    Unknown,
}

impl SubmissionState {
    /// Next state after `observation`; `Completed` absorbs everything
    pub fn observe(&self, observation: Observation) -> SubmissionState {
        if self.is_terminal() {
            return self.clone();
        }

        match observation {
            Observation::Queued => SubmissionState::Queued,
            Observation::NotFound => SubmissionState::Unknown,
            Observation::Found(Outcome::Running { build_number }) => {
                SubmissionState::Running { build_number }
            }
            Observation::Found(outcome) => SubmissionState::Completed { outcome },
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, SubmissionState::Completed { .. })
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        match self {
            SubmissionState::Completed { outcome } => Some(outcome),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SubmissionState::Submitted => "submitted",
            SubmissionState::Queued => "queued",
            SubmissionState::Running { .. } => "running",
            SubmissionState::Completed { outcome } if outcome.succeeded() => "succeeded",
            SubmissionState::Completed { .. } => "failed",
            SubmissionState::Unknown => "unknown",
        }
    }
}
