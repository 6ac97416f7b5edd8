//! Build and queue records
//!
//! Typed views of the build server's history and queue listings, with every
//! action's parameters flattened into one list of name/value pairs per record.

use serde::{Deserialize, Serialize};

use crate::token::{TOKEN_PARAMETER, Token};

/// Parameters attached to a queued item or a build
///
/// A record may carry several parameters actions, so one name can appear more
/// than once. Every occurrence is kept in listing order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterSet(Vec<(String, String)>);

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// First value listed under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values(name).next()
    }

    /// Every value listed under `name`
    pub fn values<'a, 'n>(&'a self, name: &'n str) -> impl Iterator<Item = &'a str> + use<'a, 'n> {
        self.0
            .iter()
            .filter(move |(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when any token parameter equals `token`
    pub fn carries_token(&self, token: &Token) -> bool {
        self.values(TOKEN_PARAMETER).any(|value| value == token.as_str())
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterSet
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One entry of a job's build history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub number: u64,
    /// Unset while the build is still running
    pub result: Option<String>,
    pub parameters: ParameterSet,
}

/// One entry of the build server's pending queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub id: Option<u64>,
    pub parameters: ParameterSet,
}
