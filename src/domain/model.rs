use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Field order is insertion order, so exported rows follow the mapping.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl Record {
    pub fn from_object(obj: serde_json::Map<String, serde_json::Value>) -> Self {
        Self { data: obj }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(self.data.clone())
    }
}

/// How one source field lands in the target table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub transform: Option<FieldTransform>,
    #[serde(default)]
    pub required: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldTransform {
    Uppercase,
    Lowercase,
    Trim,
    ToNumber,
    ToString,
    ToBoolean,
    DateFormat { from: String, to: String },
    Default { value: serde_json::Value },
    Lookup {
        table: HashMap<String, serde_json::Value>,
        #[serde(default)]
        fallback: Option<serde_json::Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    Contains,
    StartsWith,
    IsNull,
    IsNotNull,
    Matches,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub op: FilterOp,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    #[default]
    All,
    Any,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncMapping {
    pub name: String,
    pub source_table: String,
    pub target_table: String,
    pub field_mappings: Vec<FieldMapping>,
    #[serde(default)]
    pub filters: Vec<FilterCondition>,
    #[serde(default)]
    pub filter_mode: FilterMode,
    #[serde(default)]
    pub include_unmapped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordFailure {
    pub index: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct SyncOutcome {
    pub transformed: Vec<Record>,
    pub skipped: usize,
    pub failures: Vec<RecordFailure>,
}

impl SyncOutcome {
    pub fn processed(&self) -> usize {
        self.transformed.len() + self.skipped + self.failures.len()
    }
}
