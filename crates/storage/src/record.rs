use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::StoreError;

// ──────────────────────────────────────────────
// Status enums
// ──────────────────────────────────────────────

/// Lifecycle state of an idea.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdeaStatus {
    Pending,
    InProgress,
    Completed,
    Failed,
}

impl IdeaStatus {
    pub const ALL: [IdeaStatus; 4] = [
        IdeaStatus::Pending,
        IdeaStatus::InProgress,
        IdeaStatus::Completed,
        IdeaStatus::Failed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            IdeaStatus::Pending => "pending",
            IdeaStatus::InProgress => "in_progress",
            IdeaStatus::Completed => "completed",
            IdeaStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for IdeaStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IdeaStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IdeaStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "unknown idea status '{}' (expected pending, in_progress, completed or failed)",
                    s
                )
            })
    }
}

/// Lifecycle state of an execution. Starts `InProgress` and moves once to a
/// terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionStatus {
    InProgress,
    Success,
    Failed,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::InProgress => "in_progress",
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, ExecutionStatus::InProgress)
    }
}

impl fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ──────────────────────────────────────────────
// Ideas
// ──────────────────────────────────────────────

/// A persisted idea.
///
/// Fields this crate does not know about (cost, target users, project URL
/// and so on) are kept in `extra` and written back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdeaRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub idea_type: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub status: IdeaStatus,
    #[serde(default)]
    pub score: f64,
    pub created_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Caller-supplied fields for [`crate::AssetPool::add_idea`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewIdea {
    pub name: String,
    pub description: String,
    pub idea_type: String,
    pub tags: Vec<String>,
    pub extra: BTreeMap<String, Value>,
}

/// Keys the store assigns itself; never taken from caller fields.
const ASSIGNED_KEYS: [&str; 6] = ["id", "status", "score", "created_at", "updated_at", "notes"];

impl NewIdea {
    pub fn new(name: impl Into<String>) -> Self {
        NewIdea {
            name: name.into(),
            ..NewIdea::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_type(mut self, idea_type: impl Into<String>) -> Self {
        self.idea_type = idea_type.into();
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }

    /// Build from a loose JSON object such as a serialized idea candidate.
    ///
    /// `name`, `description`, `type` and `tags` map onto the typed fields;
    /// store-assigned keys are dropped and everything else lands in `extra`.
    pub fn from_fields(mut fields: Map<String, Value>) -> Self {
        let mut take_string = |key: &str| match fields.remove(key) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };
        let name = take_string("name");
        let description = take_string("description");
        let idea_type = take_string("type");

        let tags = match fields.remove("tags") {
            Some(Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match v {
                    Value::String(s) => Some(s),
                    _ => None,
                })
                .collect(),
            _ => Vec::new(),
        };

        for key in ASSIGNED_KEYS {
            fields.remove(key);
        }

        NewIdea {
            name,
            description,
            idea_type,
            tags,
            extra: fields.into_iter().collect(),
        }
    }

    /// [`NewIdea::from_fields`] over any value that serializes to a JSON
    /// object.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, StoreError> {
        serde_json::to_value(value)
            .and_then(serde_json::from_value::<Map<String, Value>>)
            .map(NewIdea::from_fields)
            .map_err(StoreError::IdeaFields)
    }
}

// ──────────────────────────────────────────────
// Executions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepEntry {
    pub step: String,
    pub status: String,
    pub timestamp: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub log: String,
    pub timestamp: String,
}

/// A tracked attempt at carrying out an idea.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: String,
    pub idea_id: String,
    pub started_at: String,
    pub status: ExecutionStatus,
    #[serde(default)]
    pub steps: Vec<StepEntry>,
    #[serde(default)]
    pub logs: Vec<LogEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ──────────────────────────────────────────────
// Revenue
// ──────────────────────────────────────────────

/// Income attributed to an idea. Never modified after creation.
///
/// `amount` is written as a decimal string so it reloads exactly; plain
/// JSON numbers are still accepted when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    pub id: String,
    pub idea_id: String,
    #[serde(serialize_with = "rust_decimal::serde::str::serialize")]
    pub amount: Decimal,
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub recorded_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn idea_status_parses() {
        assert_eq!("in_progress".parse::<IdeaStatus>(), Ok(IdeaStatus::InProgress));
        assert!("done".parse::<IdeaStatus>().is_err());
    }

    #[test]
    fn idea_record_keeps_unknown_fields() {
        let raw = json!({
            "id": "idea-20250101120000",
            "name": "Deploy",
            "description": "d",
            "type": "deployment_service",
            "tags": ["ai"],
            "status": "pending",
            "score": 0,
            "created_at": "2025-01-01T12:00:00.000000Z",
            "cost": 500,
            "target_users": ["sellers"]
        });
        let record: IdeaRecord = serde_json::from_value(raw).unwrap();
        assert_eq!(record.extra["cost"], json!(500));
        let back = serde_json::to_value(&record).unwrap();
        assert_eq!(back["target_users"], json!(["sellers"]));
        assert_eq!(back["type"], json!("deployment_service"));
        assert!(back.get("updated_at").is_none());
    }

    #[test]
    fn new_idea_from_fields_splits_known_keys() {
        let fields = json!({
            "name": "n",
            "type": "training",
            "tags": ["a", 1, "b"],
            "status": "completed",
            "expected_income": 3000
        });
        let Value::Object(map) = fields else {
            unreachable!()
        };
        let idea = NewIdea::from_fields(map);
        assert_eq!(idea.name, "n");
        assert_eq!(idea.idea_type, "training");
        assert_eq!(idea.tags, vec!["a", "b"]);
        assert!(!idea.extra.contains_key("status"));
        assert_eq!(idea.extra["expected_income"], json!(3000));
    }

    #[test]
    fn new_idea_from_serialize_needs_an_object() {
        #[derive(Serialize)]
        struct Candidate {
            name: &'static str,
            cost: u32,
        }
        let idea = NewIdea::from_serialize(&Candidate {
            name: "n",
            cost: 500,
        })
        .unwrap();
        assert_eq!(idea.name, "n");
        assert_eq!(idea.extra["cost"], json!(500));

        assert!(matches!(
            NewIdea::from_serialize(&["not", "an", "object"]),
            Err(StoreError::IdeaFields(_))
        ));
    }

    #[test]
    fn revenue_amount_is_written_as_exact_string() {
        let record = RevenueRecord {
            id: "rev-1".to_string(),
            idea_id: "idea-1".to_string(),
            amount: Decimal::new(1234567890123456789, 5),
            source: "fiverr".to_string(),
            notes: None,
            recorded_at: "2025-01-01T00:00:00.000000Z".to_string(),
        };
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["amount"], json!("12345678901234.56789"));
        let back: RevenueRecord = serde_json::from_value(value).unwrap();
        assert_eq!(back.amount, record.amount);
    }

    #[test]
    fn revenue_amount_accepts_json_number() {
        let back: RevenueRecord = serde_json::from_value(json!({
            "id": "rev-1",
            "idea_id": "idea-1",
            "amount": 125,
            "source": "fiverr",
            "recorded_at": "2025-01-01T00:00:00.000000Z"
        }))
        .unwrap();
        assert_eq!(back.amount, Decimal::new(125, 0));
    }
}
