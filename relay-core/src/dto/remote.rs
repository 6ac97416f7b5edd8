//! Queue and build-history payloads
//!
//! Both listings nest parameters two levels deep: each item or build has a
//! list of actions, and only some actions carry a `parameters` list. Actions
//! without parameters (causes, SCM data, ...) decode to an empty list.

use serde::{Deserialize, Serialize};

use crate::domain::build::{BuildRecord, ParameterSet, QueueItem};

/// Single `{ "name": .., "value": .. }` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteParameter {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl RemoteParameter {
    /// Value rendered as a string; booleans and numbers keep their JSON text
    pub fn value_string(&self) -> String {
        match &self.value {
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Null => String::new(),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RemoteAction {
    #[serde(default)]
    pub parameters: Vec<RemoteParameter>,
}

/// Response of the queue listing endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueListing {
    #[serde(default)]
    pub items: Vec<RemoteQueueItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteQueueItem {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub actions: Vec<RemoteAction>,
}

/// Response of a job's history endpoint
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BuildHistory {
    #[serde(default)]
    pub builds: Vec<RemoteBuild>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteBuild {
    pub number: u64,
    #[serde(default)]
    pub result: Option<String>,
    #[serde(default)]
    pub actions: Vec<RemoteAction>,
}

fn flatten(actions: Vec<RemoteAction>) -> ParameterSet {
    actions
        .into_iter()
        .flat_map(|action| action.parameters)
        .map(|param| {
            let value = param.value_string();
            (param.name, value)
        })
        .collect()
}

impl From<RemoteQueueItem> for QueueItem {
    fn from(item: RemoteQueueItem) -> Self {
        Self {
            id: item.id,
            parameters: flatten(item.actions),
        }
    }
}

impl From<RemoteBuild> for BuildRecord {
    fn from(build: RemoteBuild) -> Self {
        Self {
            number: build.number,
            result: build.result,
            parameters: flatten(build.actions),
        }
    }
}

impl QueueListing {
    pub fn into_items(self) -> Vec<QueueItem> {
        self.items.into_iter().map(QueueItem::from).collect()
    }
}

impl BuildHistory {
    /// Records in the order the server listed them
    pub fn into_records(self) -> Vec<BuildRecord> {
        self.builds.into_iter().map(BuildRecord::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::{TokenMatch, find_by_token, queue_contains};
    use crate::token::Token;
    use serde_json::json;

    #[test]
    fn test_decode_queue_with_mixed_actions() {
        let listing: QueueListing = serde_json::from_value(json!({
            "_class": "hudson.model.Queue",
            "items": [{
                "id": 311,
                "actions": [
                    { "_class": "hudson.model.CauseAction" },
                    { "parameters": [
                        { "name": "ghprbPullId", "value": "42" },
                        { "name": "buildId", "value": "e2e-42-1" }
                    ]}
                ]
            }]
        }))
        .unwrap();

        let items = listing.into_items();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].id, Some(311));
        assert_eq!(items[0].parameters.get("buildId"), Some("e2e-42-1"));
        assert_eq!(items[0].parameters.len(), 2);
    }

    #[test]
    fn test_decode_history_keeps_order_and_missing_result() {
        let history: BuildHistory = serde_json::from_value(json!({
            "builds": [
                { "number": 12, "result": null, "actions": [] },
                { "number": 11, "result": "FAILURE", "actions": [{}] }
            ]
        }))
        .unwrap();

        let records = history.into_records();
        assert_eq!(records[0].number, 12);
        assert_eq!(records[0].result, None);
        assert_eq!(records[1].result.as_deref(), Some("FAILURE"));
        assert!(records[1].parameters.is_empty());
    }

    #[test]
    fn test_non_string_values_keep_json_text() {
        let param: RemoteParameter =
            serde_json::from_value(json!({ "name": "skipTests", "value": true })).unwrap();
        assert_eq!(param.value_string(), "true");

        let param: RemoteParameter = serde_json::from_value(json!({ "name": "empty" })).unwrap();
        assert_eq!(param.value_string(), "");
    }

    #[test]
    fn test_repeated_parameters_actions_keep_every_token() {
        let listing: QueueListing = serde_json::from_value(json!({
            "items": [{
                "id": 5,
                "actions": [
                    { "parameters": [{ "name": "buildId", "value": "e2e-42-7" }] },
                    { "parameters": [{ "name": "buildId", "value": "other" }] }
                ]
            }]
        }))
        .unwrap();
        let items = listing.into_items();
        assert!(queue_contains(&items, &Token::from("e2e-42-7")));
        assert!(queue_contains(&items, &Token::from("other")));

        let history: BuildHistory = serde_json::from_value(json!({
            "builds": [{
                "number": 8,
                "result": "SUCCESS",
                "actions": [
                    { "parameters": [{ "name": "buildId", "value": "e2e-42-7" }] },
                    {},
                    { "parameters": [{ "name": "buildId", "value": "other" }] }
                ]
            }]
        }))
        .unwrap();
        let records = history.into_records();
        match find_by_token(&records, &Token::from("e2e-42-7")) {
            TokenMatch::One(found) => assert_eq!(found.number, 8),
            other => panic!("expected one match, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_body_object_decodes() {
        let history: BuildHistory = serde_json::from_value(json!({})).unwrap();
        assert!(history.into_records().is_empty());
    }
}
