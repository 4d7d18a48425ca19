use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Handle of a long-running operation,
/// `projects/<p>/locations/<l>/datasets/<d>/operations/<id>`.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct OperationName(pub String);

impl Display for OperationName {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        write!(formatter, "{}", self.0)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct OperationError {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl Display for OperationError {
    fn fmt(&self, formatter: &mut Formatter) -> FmtResult {
        write!(formatter, "code {}: {}", self.code, self.message)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ProgressCounter {
    #[serde(default, deserialize_with = "deserialize_count")]
    pub success: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub failure: u64,
    #[serde(default, deserialize_with = "deserialize_count")]
    pub pending: u64,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OperationMetadata {
    #[serde(default)]
    pub api_method_name: Option<String>,
    #[serde(default)]
    pub create_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub logs_url: Option<String>,
    #[serde(default)]
    pub counter: Option<ProgressCounter>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Operation {
    pub name: OperationName,
    #[serde(default)]
    pub done: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OperationError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<OperationMetadata>,
}

/// State of an operation as of the latest fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationStatus {
    Pending,
    Succeeded,
    Failed(OperationError),
}

impl Operation {
    pub fn status(&self) -> OperationStatus {
        match (self.done, &self.error) {
            (false, _) => OperationStatus::Pending,
            (true, Some(error)) => OperationStatus::Failed(error.clone()),
            (true, None) => OperationStatus::Succeeded,
        }
    }

    pub fn counter(&self) -> Option<&ProgressCounter> {
        self.metadata
            .as_ref()
            .and_then(|metadata| metadata.counter.as_ref())
    }
}

// Counters are int64 values, which the service encodes as JSON strings.
fn deserialize_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Number(u64),
        Text(String),
    }

    match Count::deserialize(deserializer)? {
        Count::Number(count) => Ok(count),
        Count::Text(text) => text.parse().map_err(serde::de::Error::custom),
    }
}
