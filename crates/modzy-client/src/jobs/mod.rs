//! Job submission, completion polling and results.

mod actions;
mod client;
pub mod envelope;
mod history;
pub mod poller;
mod results;
mod schemas;

pub use actions::JobActions;
pub use client::{JobsClient, SubmittedJob};
pub use envelope::{JdbcInput, S3Credentials, SubmitJobOptions, parse_size};
pub use history::{HistoryStatus, ListJobsHistoryInput, ListJobsHistoryOutput};
pub use poller::{CompletionPoller, MIN_POLL_INTERVAL};
pub use results::{JobResult, JobResults};
pub use schemas::{
    JobDetails, JobFeatures, JobModel, JobStatus, JobTeam, JobUser, SubmitJobResponse,
};
