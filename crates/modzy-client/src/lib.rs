//! Client for the Modzy machine-learning inference platform.
//!
//! Jobs are submitted through [`JobsClient`], reached from [`Modzy::jobs`]. Each
//! submission returns [`JobActions`] bound to the new job, used to wait for it and
//! fetch its results. Every operation takes a [`CancellationToken`].

pub mod cancellation;
pub mod error;
pub mod inputs;
pub mod jobs;
mod modzy;
pub mod time;

#[cfg(test)]
mod testing;

pub use cancellation::CancellationToken;
pub use error::{InputError, ModzyError, Result};
pub use inputs::{EmbeddedInput, FileInput, InputSource, JobInputs, S3Input, S3Key, TextInput};
pub use jobs::{
    JdbcInput, JobActions, JobDetails, JobResult, JobResults, JobStatus, JobsClient,
    S3Credentials, SubmitJobOptions, SubmittedJob,
};
pub use modzy::Modzy;
pub use time::{ModzyDate, ModzyTime, TimeParseError};

pub use modzy_api;
