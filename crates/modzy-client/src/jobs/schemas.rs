use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::time::ModzyTime;

/// Server-side state of a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
pub enum JobStatus {
    #[serde(rename = "SUBMITTED")]
    #[strum(serialize = "SUBMITTED")]
    Submitted,
    #[serde(rename = "IN_PROGRESS")]
    #[strum(serialize = "IN_PROGRESS")]
    InProgress,
    #[serde(rename = "COMPLETED")]
    #[strum(serialize = "COMPLETED")]
    Completed,
    #[serde(rename = "CANCELED")]
    #[strum(serialize = "CANCELED")]
    Canceled,
    #[serde(rename = "TIMEDOUT")]
    #[strum(serialize = "TIMEDOUT")]
    TimedOut,
    /// Any status this client does not know. Never terminal, so a wait keeps polling.
    #[serde(rename = "UNKNOWN")]
    #[serde(other)]
    #[strum(serialize = "UNKNOWN")]
    Unknown,
}

impl JobStatus {
    /// No further transition happens once a job reaches one of these.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Canceled | JobStatus::TimedOut
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobModel {
    pub identifier: String,
    pub version: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobUser {
    pub identifier: String,
    pub external_identifier: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobTeam {
    pub identifier: String,
}

/// Status and bookkeeping of one job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobDetails {
    pub job_identifier: String,
    pub status: JobStatus,
    #[serde(default)]
    pub submitted_by: String,
    #[serde(default)]
    pub account_identifier: String,
    #[serde(default)]
    pub model: JobModel,
    #[serde(default)]
    pub explain: bool,
    #[serde(default)]
    pub created_at: ModzyTime,
    #[serde(default)]
    pub updated_at: ModzyTime,
    #[serde(default)]
    pub submitted_at: ModzyTime,
    #[serde(default)]
    pub total: u32,
    #[serde(default)]
    pub pending: u32,
    #[serde(default)]
    pub completed: u32,
    #[serde(default)]
    pub failed: u32,
    #[serde(default)]
    pub elapsed_time: u64,
    #[serde(default)]
    pub queue_time: u64,
    #[serde(default)]
    pub user: Option<JobUser>,
    #[serde(default)]
    pub team: Option<JobTeam>,
}

/// Acknowledgment of a submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitJobResponse {
    pub job_identifier: String,
    #[serde(default)]
    pub submitted_by: String,
    #[serde(default)]
    pub account_identifier: String,
    #[serde(default)]
    pub model: JobModel,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub submitted_jobs: Option<serde_json::Value>,
}

/// Limits that apply to job inputs on this platform instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JobFeatures {
    /// Human size string such as `"1M"`.
    pub input_chunk_maximum_size: String,
    pub maximum_input_chunks: u32,
    pub maximum_inputs_per_job: u32,
}
