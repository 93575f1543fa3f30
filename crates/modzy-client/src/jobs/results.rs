//! Results of a job, decoded per source key.
//!
//! Each record has six fields every engine reports and whatever the model itself
//! produced. The six are named fields of [`JobResult`]; everything else is
//! captured by the flattened [`JobResult::data`] map, so the set of excluded keys
//! is exactly the set of named fields.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::time::ModzyTime;

/// One record of a job's results or failures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobResult {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub engine: String,
    #[serde(default)]
    pub start_time: ModzyTime,
    #[serde(default)]
    pub update_time: ModzyTime,
    #[serde(default)]
    pub end_time: ModzyTime,
    #[serde(default)]
    pub elapsed_time: i64,
    /// Model output, keyed by output field name.
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl JobResult {
    /// Message of a failed record.
    pub fn error(&self) -> Option<&str> {
        self.data.get("error").and_then(Value::as_str)
    }

    /// Output field decoded into a concrete type.
    pub fn output<T: serde::de::DeserializeOwned>(
        &self,
        field: &str,
    ) -> Option<Result<T, serde_json::Error>> {
        self.data
            .get(field)
            .map(|value| serde_json::from_value(value.clone()))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobResults {
    pub job_identifier: String,
    pub account_identifier: String,
    pub total: u32,
    pub completed: u32,
    pub failed: u32,
    pub finished: bool,
    pub submitted_by_key: String,
    pub explained: bool,
    pub submitted_at: ModzyTime,
    pub initial_queue_time: i64,
    pub total_queue_time: i64,
    pub average_model_latency: f64,
    pub total_model_latency: f64,
    pub elapsed_time: i64,
    pub starting_result_summarizing: ModzyTime,
    pub result_summarizing: i64,
    pub input_size: i64,
    /// Successful records by source key.
    pub results: BTreeMap<String, JobResult>,
    /// Failed records by source key.
    pub failures: BTreeMap<String, JobResult>,
}
