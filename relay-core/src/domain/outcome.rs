//! Resolved status of a submission

use serde::{Deserialize, Serialize};
use std::fmt;

/// Result string reported by the build server for a finished build
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildResult {
    Success,
    Failure,
    Unstable,
    Aborted,
    NotBuilt,
    Other(String),
}

impl BuildResult {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Unstable => "UNSTABLE",
            Self::Aborted => "ABORTED",
            Self::NotBuilt => "NOT_BUILT",
            Self::Other(raw) => raw,
        }
    }

    /// Only `SUCCESS` counts; unstable builds are failures
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl From<&str> for BuildResult {
    fn from(raw: &str) -> Self {
        match raw {
            "SUCCESS" => Self::Success,
            "FAILURE" => Self::Failure,
            "UNSTABLE" => Self::Unstable,
            "ABORTED" => Self::Aborted,
            "NOT_BUILT" => Self::NotBuilt,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for BuildResult {
    fn from(raw: String) -> Self {
        Self::from(raw.as_str())
    }
}

impl From<BuildResult> for String {
    fn from(result: BuildResult) -> Self {
        result.as_str().to_string()
    }
}

impl fmt::Display for BuildResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a submission at one point in time
///
/// Every resolve produces a fresh value. A running build can never report
/// success because only [`Outcome::Finished`] carries a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Outcome {
    Running {
        build_number: u64,
    },
    Finished {
        /// Unset for simulated outcomes
        build_number: Option<u64>,
        result: BuildResult,
        /// Log viewer URL for the finished build
        result_url: Option<String>,
    },
}

impl Outcome {
    /// Canned terminal success returned in simulation mode
    pub fn simulated() -> Self {
        Self::Finished {
            build_number: None,
            result: BuildResult::Success,
            result_url: None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    pub fn is_finished(&self) -> bool {
        !self.is_running()
    }

    /// Always false while running
    pub fn succeeded(&self) -> bool {
        match self {
            Self::Running { .. } => false,
            Self::Finished { result, .. } => result.is_success(),
        }
    }

    pub fn build_number(&self) -> Option<u64> {
        match self {
            Self::Running { build_number } => Some(*build_number),
            Self::Finished { build_number, .. } => *build_number,
        }
    }

    /// Result URL, or an empty string while running or when none was built
    pub fn result_location(&self) -> &str {
        match self {
            Self::Finished {
                result_url: Some(url),
                ..
            } => url,
            _ => "",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_running_never_succeeds() {
        let outcome = Outcome::Running { build_number: 3 };
        assert!(outcome.is_running());
        assert!(!outcome.succeeded());
        assert_eq!(outcome.result_location(), "");
    }

    #[test]
    fn test_unstable_is_not_success() {
        let outcome = Outcome::Finished {
            build_number: Some(5),
            result: BuildResult::from("UNSTABLE"),
            result_url: Some("https://logs/1/unit/5/".to_string()),
        };
        assert!(outcome.is_finished());
        assert!(!outcome.succeeded());
        assert_eq!(outcome.result_location(), "https://logs/1/unit/5/");
    }

    #[test]
    fn test_simulated_outcome() {
        let outcome = Outcome::simulated();
        assert!(outcome.succeeded());
        assert_eq!(outcome.build_number(), None);
        assert_eq!(outcome.result_location(), "");
    }

    #[test]
    fn test_unknown_result_is_preserved() {
        let result = BuildResult::from("CANCELLED_BY_ROBOT");
        assert_eq!(result, BuildResult::Other("CANCELLED_BY_ROBOT".to_string()));
        assert_eq!(result.to_string(), "CANCELLED_BY_ROBOT");
    }

    #[test]
    fn test_outcome_serializes_with_state_tag() {
        let outcome = Outcome::Finished {
            build_number: Some(7),
            result: BuildResult::Success,
            result_url: None,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["state"], "finished");
        assert_eq!(json["result"], "SUCCESS");
    }
}
