use std::fmt::{Debug, Formatter};
use std::time::Duration;

use modzy_api::Requestor;

use crate::cancellation::CancellationToken;
use crate::error::Result;
use crate::jobs::client::JobsClient;
use crate::jobs::results::JobResults;
use crate::jobs::schemas::JobDetails;

/// Operations on one job, bound to its identifier.
pub struct JobActions<'a, R: Requestor> {
    client: &'a JobsClient<R>,
    job_identifier: String,
}

impl<'a, R: Requestor> JobActions<'a, R> {
    pub fn new(client: &'a JobsClient<R>, job_identifier: impl Into<String>) -> Self {
        Self {
            client,
            job_identifier: job_identifier.into(),
        }
    }

    pub fn job_identifier(&self) -> &str {
        &self.job_identifier
    }

    pub fn get_details(&self, token: &CancellationToken) -> Result<JobDetails> {
        self.client.get_job_details(token, &self.job_identifier)
    }

    pub fn wait_for_completion(
        &self,
        token: &CancellationToken,
        interval: Duration,
    ) -> Result<JobDetails> {
        self.client
            .wait_for_job_completion(token, &self.job_identifier, interval)
    }

    pub fn cancel(&self, token: &CancellationToken) -> Result<JobDetails> {
        self.client.cancel_job(token, &self.job_identifier)
    }

    pub fn get_results(&self, token: &CancellationToken) -> Result<JobResults> {
        self.client.get_job_results(token, &self.job_identifier)
    }
}

impl<R: Requestor> Debug for JobActions<'_, R> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobActions")
            .field("job_identifier", &self.job_identifier)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeRequestor;
    use serde_json::json;

    #[test]
    fn actions_target_their_job() -> anyhow::Result<()> {
        let client = JobsClient::new(
            FakeRequestor::new()
                .reply(json!({"jobIdentifier": "job-9", "status": "IN_PROGRESS"}))
                .reply(json!({"jobIdentifier": "job-9", "status": "COMPLETED"}))
                .reply(json!({"jobIdentifier": "job-9", "finished": true}))
                .reply(json!({"jobIdentifier": "job-9", "status": "COMPLETED"})),
        )
        .with_poll_floor(Duration::from_millis(1));
        let token = CancellationToken::new();
        let job = client.job("job-9");

        job.get_details(&token)?;
        let done = job.wait_for_completion(&token, Duration::ZERO)?;
        assert!(done.status.is_terminal());
        assert!(job.get_results(&token)?.finished);
        job.cancel(&token)?;

        assert_eq!(
            client.requestor().paths(),
            vec![
                "GET jobs/job-9",
                "GET jobs/job-9",
                "GET results/job-9",
                "DELETE jobs/job-9"
            ]
        );
        assert_eq!(format!("{job:?}"), r#"JobActions { job_identifier: "job-9" }"#);
        Ok(())
    }
}
