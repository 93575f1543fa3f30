//! Waiting for a job to reach a terminal status.
//!
//! The poller sleeps on a timer raced against the caller's cancellation token and
//! fetches the job details once per tick. There is no retry limit and no backoff:
//! the wait only ends on a terminal status, on a fetch error, or when the caller
//! cancels.

use std::time::Duration;

use crossbeam::channel;
use crossbeam::select;

use crate::cancellation::CancellationToken;
use crate::error::{ModzyError, Result};
use crate::jobs::schemas::JobDetails;

/// Shortest interval between two status fetches.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionPoller {
    interval: Duration,
}

impl CompletionPoller {
    /// Poller fetching every `interval`, raised to [`MIN_POLL_INTERVAL`] when shorter.
    pub fn new(interval: Duration) -> Self {
        Self::with_floor(interval, MIN_POLL_INTERVAL)
    }

    pub(crate) fn with_floor(interval: Duration, floor: Duration) -> Self {
        Self {
            interval: interval.max(floor),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Calls `fetch` once per tick until it returns terminal details, which are
    /// returned as is.
    pub fn poll_until_terminal<F>(
        &self,
        token: &CancellationToken,
        mut fetch: F,
    ) -> Result<JobDetails>
    where
        F: FnMut() -> Result<JobDetails>,
    {
        loop {
            if token.is_cancelled() {
                return Err(ModzyError::Cancelled);
            }

            select! {
                recv(token.signal()) -> _ => return Err(ModzyError::Cancelled),
                recv(channel::after(self.interval)) -> _ => {
                    let details = fetch()?;
                    log::debug!("Job {} is {}", details.job_identifier, details.status);
                    if details.status.is_terminal() {
                        return Ok(details);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::schemas::JobStatus;
    use modzy_api::{ClientError, StatusCode};
    use std::cell::Cell;
    use std::thread;
    use std::time::Instant;

    fn details(status: &str) -> JobDetails {
        serde_json::from_value(serde_json::json!({
            "jobIdentifier": "job-1",
            "status": status,
            "total": 3
        }))
        .unwrap()
    }

    fn fast() -> CompletionPoller {
        CompletionPoller::with_floor(Duration::ZERO, Duration::from_millis(1))
    }

    #[test]
    fn interval_is_clamped_to_floor() {
        assert_eq!(CompletionPoller::new(Duration::ZERO).interval(), MIN_POLL_INTERVAL);
        assert_eq!(
            CompletionPoller::new(Duration::from_millis(4999)).interval(),
            MIN_POLL_INTERVAL
        );
        assert_eq!(
            CompletionPoller::new(Duration::from_secs(12)).interval(),
            Duration::from_secs(12)
        );
    }

    #[test]
    fn returns_first_terminal_details_unmodified() {
        let statuses = ["SUBMITTED", "IN_PROGRESS", "COMPLETED", "IN_PROGRESS"];
        let calls = Cell::new(0);

        let result = fast()
            .poll_until_terminal(&CancellationToken::new(), || {
                let status = statuses[calls.get()];
                calls.set(calls.get() + 1);
                Ok(details(status))
            })
            .unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(result, details("COMPLETED"));
    }

    #[test]
    fn canceled_and_timed_out_are_terminal() {
        for status in ["CANCELED", "TIMEDOUT"] {
            let result = fast()
                .poll_until_terminal(&CancellationToken::new(), || Ok(details(status)))
                .unwrap();
            assert!(result.status.is_terminal());
            assert_ne!(result.status, JobStatus::Completed);
        }
    }

    #[test]
    fn already_cancelled_token_never_fetches() {
        let token = CancellationToken::new();
        token.cancel();
        let calls = Cell::new(0);

        let err = fast()
            .poll_until_terminal(&token, || {
                calls.set(calls.get() + 1);
                Ok(details("COMPLETED"))
            })
            .unwrap_err();

        assert!(err.is_cancelled());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn cancellation_interrupts_the_wait() {
        let token = CancellationToken::new();
        let canceller = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            canceller.cancel();
        });

        let started = Instant::now();
        let err = CompletionPoller::new(Duration::from_secs(60))
            .poll_until_terminal(&token, || Ok(details("COMPLETED")))
            .unwrap_err();
        handle.join().unwrap();

        assert!(err.is_cancelled());
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn fetch_error_aborts() {
        let calls = Cell::new(0);
        let err = fast()
            .poll_until_terminal(&CancellationToken::new(), || {
                calls.set(calls.get() + 1);
                Err(ClientError::from_status(StatusCode::NOT_FOUND, "no such job").into())
            })
            .unwrap_err();

        assert_eq!(calls.get(), 1);
        assert_eq!(err.cause(), Some(modzy_api::ErrorCause::NotFound));
    }
}
