use std::io::Read;
use std::time::Duration;

use modzy_api::{ApiPath, MultipartPart, Requestor};
use serde_json::Value;

use crate::cancellation::CancellationToken;
use crate::error::{InputError, ModzyError, Result};
use crate::inputs::{EmbeddedInput, FileInput, JobInputs, S3Input, TextInput};
use crate::jobs::actions::JobActions;
use crate::jobs::envelope::{
    InputBlock, JdbcInput, S3Credentials, SubmissionEnvelope, SubmitJobOptions, parse_size,
};
use crate::jobs::history::{ListJobsHistoryInput, ListJobsHistoryOutput};
use crate::jobs::poller::{CompletionPoller, MIN_POLL_INTERVAL};
use crate::jobs::results::JobResults;
use crate::jobs::schemas::{JobDetails, JobFeatures, SubmitJobResponse};

/// Multipart field carrying each uploaded chunk.
const CHUNK_FIELD: &str = "input";
/// Upper bound of the buffer reserved up front for one chunk.
const CHUNK_BUFFER_CAPACITY: usize = 64 * 1024;

/// Acknowledgment of a submission, bound to the submitted job.
#[derive(Debug)]
pub struct SubmittedJob<'a, R: Requestor> {
    pub response: SubmitJobResponse,
    pub job: JobActions<'a, R>,
}

/// Job operations of the platform, written against any [`Requestor`].
///
/// Every operation takes the caller's [`CancellationToken`]. Operations other than
/// [`JobsClient::wait_for_job_completion`] check it once before their first request.
#[derive(Debug)]
pub struct JobsClient<R: Requestor> {
    requestor: R,
    poll_floor: Duration,
}

impl<R: Requestor> JobsClient<R> {
    pub fn new(requestor: R) -> Self {
        Self {
            requestor,
            poll_floor: MIN_POLL_INTERVAL,
        }
    }

    #[cfg(test)]
    pub(crate) fn with_poll_floor(mut self, floor: Duration) -> Self {
        self.poll_floor = floor;
        self
    }

    pub fn requestor(&self) -> &R {
        &self.requestor
    }

    /// Actions on an existing job.
    pub fn job(&self, job_identifier: impl Into<String>) -> JobActions<'_, R> {
        JobActions::new(self, job_identifier)
    }

    pub fn submit_job_text(
        &self,
        token: &CancellationToken,
        options: &SubmitJobOptions,
        inputs: JobInputs<TextInput>,
    ) -> Result<SubmittedJob<'_, R>> {
        ensure_active(token)?;
        let sources = inputs.try_map(TextInput::resolve)?;
        self.submit(options, InputBlock::Text { sources })
    }

    /// Submits inputs inline as `data:` URIs. Every input is read and encoded
    /// before anything is sent.
    pub fn submit_job_embedded(
        &self,
        token: &CancellationToken,
        options: &SubmitJobOptions,
        inputs: JobInputs<EmbeddedInput>,
    ) -> Result<SubmittedJob<'_, R>> {
        ensure_active(token)?;
        let sources = inputs.try_map(EmbeddedInput::resolve)?;
        self.submit(options, InputBlock::Embedded { sources })
    }

    pub fn submit_job_s3(
        &self,
        token: &CancellationToken,
        options: &SubmitJobOptions,
        credentials: &S3Credentials,
        inputs: JobInputs<S3Input>,
    ) -> Result<SubmittedJob<'_, R>> {
        ensure_active(token)?;
        let sources = inputs.try_map(S3Input::resolve)?;
        self.submit(options, InputBlock::aws_s3(credentials, sources))
    }

    pub fn submit_job_jdbc(
        &self,
        token: &CancellationToken,
        options: &SubmitJobOptions,
        jdbc: &JdbcInput,
    ) -> Result<SubmittedJob<'_, R>> {
        ensure_active(token)?;
        self.submit(options, InputBlock::jdbc(jdbc))
    }

    /// Opens a `file` job, uploads every input in chunks and closes the job.
    ///
    /// `chunk_size` of `None` or zero uses the platform's maximum chunk size. If any
    /// upload or the close fails the job is cancelled, best effort, and that error
    /// returned.
    pub fn submit_job_file(
        &self,
        token: &CancellationToken,
        options: &SubmitJobOptions,
        inputs: JobInputs<FileInput>,
        chunk_size: Option<usize>,
    ) -> Result<SubmittedJob<'_, R>> {
        ensure_active(token)?;
        let streams = inputs.try_map(|input| {
            let file_name = input.file_name();
            input.open().map(|reader| (file_name, reader))
        })?;

        let chunk_size = match chunk_size {
            Some(size) if size > 0 => size,
            _ => parse_size(&self.get_job_features(token)?.input_chunk_maximum_size)?,
        };

        let submitted = self.submit(options, InputBlock::File)?;
        let job_identifier = submitted.response.job_identifier.clone();

        for (source_key, fields) in streams {
            for (field, (file_name, reader)) in fields {
                let uploaded = self.upload_chunks(
                    token,
                    &job_identifier,
                    &source_key,
                    &field,
                    &file_name,
                    reader,
                    chunk_size,
                );
                if let Err(error) = uploaded {
                    self.abandon(&job_identifier);
                    return Err(error);
                }
            }
        }

        let close = job_path(&job_identifier).segment("close");
        if let Err(error) = self.requestor.post::<_, Value>(&close, &serde_json::Map::new()) {
            self.abandon(&job_identifier);
            return Err(error.into());
        }
        log::info!("Closed file job {job_identifier}");

        Ok(submitted)
    }

    pub fn get_job_details(
        &self,
        token: &CancellationToken,
        job_identifier: &str,
    ) -> Result<JobDetails> {
        ensure_active(token)?;
        Ok(self.requestor.get(&job_path(job_identifier))?)
    }

    /// Blocks until the job reaches a terminal status, checking every `interval`
    /// (at least every [`MIN_POLL_INTERVAL`]).
    pub fn wait_for_job_completion(
        &self,
        token: &CancellationToken,
        job_identifier: &str,
        interval: Duration,
    ) -> Result<JobDetails> {
        CompletionPoller::with_floor(interval, self.poll_floor).poll_until_terminal(token, || {
            Ok(self.requestor.get(&job_path(job_identifier))?)
        })
    }

    pub fn cancel_job(
        &self,
        token: &CancellationToken,
        job_identifier: &str,
    ) -> Result<JobDetails> {
        ensure_active(token)?;
        log::info!("Cancelling job {job_identifier}");
        Ok(self.requestor.delete(&job_path(job_identifier))?)
    }

    /// Results so far. Before the job is terminal these are partial.
    pub fn get_job_results(
        &self,
        token: &CancellationToken,
        job_identifier: &str,
    ) -> Result<JobResults> {
        ensure_active(token)?;
        Ok(self.requestor.get(&ApiPath::new("results").segment(job_identifier))?)
    }

    pub fn list_jobs_history(
        &self,
        token: &CancellationToken,
        input: &ListJobsHistoryInput,
    ) -> Result<ListJobsHistoryOutput> {
        ensure_active(token)?;
        let (jobs, links): (Vec<JobDetails>, _) =
            self.requestor.list(&ApiPath::from("jobs/history"), &input.paging)?;
        let next_page = input
            .paging
            .next_page(&links, jobs.len())
            .map(|paging| ListJobsHistoryInput { paging });
        Ok(ListJobsHistoryOutput { jobs, next_page })
    }

    pub fn get_job_features(&self, token: &CancellationToken) -> Result<JobFeatures> {
        ensure_active(token)?;
        Ok(self.requestor.get(&ApiPath::from("jobs/features"))?)
    }

    fn submit<'b>(
        &self,
        options: &'b SubmitJobOptions,
        input: InputBlock<'b>,
    ) -> Result<SubmittedJob<'_, R>> {
        let envelope = SubmissionEnvelope::new(options, input);
        let kind = envelope.kind();
        let body = envelope.to_value()?;
        let response: SubmitJobResponse = self.requestor.post(&ApiPath::new("jobs"), &body)?;
        log::info!(
            "Submitted {kind} job {} for model {}@{}",
            response.job_identifier,
            options.model_identifier,
            options.model_version
        );

        let job = self.job(response.job_identifier.clone());
        Ok(SubmittedJob { response, job })
    }

    #[allow(clippy::too_many_arguments)]
    fn upload_chunks(
        &self,
        token: &CancellationToken,
        job_identifier: &str,
        source_key: &str,
        field: &str,
        file_name: &str,
        mut reader: Box<dyn Read + Send>,
        chunk_size: usize,
    ) -> Result<()> {
        let path = job_path(job_identifier).segment(source_key).segment(field);
        let mut uploaded = 0usize;
        loop {
            ensure_active(token)?;
            let chunk = read_chunk(&mut reader, chunk_size).map_err(|source| InputError::Read {
                context: format!("{source_key}/{field}"),
                source,
            })?;
            // An empty input still gets one (empty) chunk so the field exists.
            if chunk.is_empty() && uploaded > 0 {
                break;
            }
            let last = chunk.len() < chunk_size;
            let part = MultipartPart::new(CHUNK_FIELD.to_string(), file_name.to_string(), chunk);
            let _: Value = self.requestor.post_multipart(&path, part)?;
            uploaded += 1;
            if last {
                break;
            }
        }
        log::debug!("Uploaded {uploaded} chunk(s) to {path}");
        Ok(())
    }

    fn abandon(&self, job_identifier: &str) {
        if let Err(error) = self.requestor.delete::<Value>(&job_path(job_identifier)) {
            log::warn!("Failed to cancel job {job_identifier} after a failed submission: {error}");
        }
    }
}

fn job_path(job_identifier: &str) -> ApiPath {
    ApiPath::new("jobs").segment(job_identifier)
}

fn ensure_active(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        return Err(ModzyError::Cancelled);
    }
    Ok(())
}

/// Reads until `chunk_size` bytes are buffered or the stream ends.
fn read_chunk(reader: &mut dyn Read, chunk_size: usize) -> std::io::Result<Vec<u8>> {
    let mut chunk = Vec::with_capacity(chunk_size.min(CHUNK_BUFFER_CAPACITY));
    reader.take(chunk_size as u64).read_to_end(&mut chunk)?;
    Ok(chunk)
}
