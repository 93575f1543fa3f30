use modzy_api::{Client, ClientConfig};

use crate::error::Result;
use crate::jobs::JobsClient;

/// Entry point of the SDK, holding the authenticated transport.
///
/// ```no_run
/// use std::time::Duration;
/// use modzy_client::{CancellationToken, JobInputs, Modzy, SubmitJobOptions, TextInput};
///
/// # fn main() -> modzy_client::Result<()> {
/// let modzy = Modzy::from_env()?;
/// let token = CancellationToken::new();
/// let inputs = JobInputs::new().with("my-input", "input.txt", TextInput::text("Hello"));
///
/// let submitted = modzy.jobs().submit_job_text(
///     &token,
///     &SubmitJobOptions::new("ed542963de", "1.0.1"),
///     inputs,
/// )?;
/// submitted.job.wait_for_completion(&token, Duration::from_secs(5))?;
/// let results = submitted.job.get_results(&token)?;
/// println!("{:?}", results.results["my-input"].data);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Modzy {
    jobs: JobsClient<Client>,
}

impl Modzy {
    pub fn new(config: ClientConfig) -> Result<Self> {
        Ok(Self {
            jobs: JobsClient::new(Client::new(config)?),
        })
    }

    /// Configured from `MODZY_API_KEY` and `MODZY_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    pub fn jobs(&self) -> &JobsClient<Client> {
        &self.jobs
    }

    /// Transport for endpoints without a dedicated wrapper.
    pub fn client(&self) -> &Client {
        self.jobs.requestor()
    }
}
