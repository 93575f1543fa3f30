//! Wire body of a job submission.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::time::Duration;

use serde::Serialize;

use crate::error::{ModzyError, Result};
use crate::inputs::S3Key;

pub type ResolvedSources<T> = BTreeMap<String, BTreeMap<String, T>>;

/// Model and execution settings shared by every kind of job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitJobOptions {
    pub model_identifier: String,
    pub model_version: String,
    pub explain: bool,
    /// Sent as whole milliseconds. Zero lets the platform apply its default.
    pub timeout: Duration,
}

impl SubmitJobOptions {
    pub fn new(model_identifier: impl Into<String>, model_version: impl Into<String>) -> Self {
        Self {
            model_identifier: model_identifier.into(),
            model_version: model_version.into(),
            explain: false,
            timeout: Duration::ZERO,
        }
    }

    pub fn with_explain(mut self, explain: bool) -> Self {
        self.explain = explain;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Access to the bucket read by an `aws-s3` job.
#[derive(Clone, PartialEq, Eq)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
}

impl S3Credentials {
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        region: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            region: region.into(),
        }
    }
}

impl Debug for S3Credentials {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Credentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"***")
            .field("region", &self.region)
            .finish()
    }
}

/// Query whose rows are the inputs of a `jdbc` job.
#[derive(Clone, PartialEq, Eq)]
pub struct JdbcInput {
    pub url: String,
    pub username: String,
    pub password: String,
    pub driver: String,
    pub query: String,
}

impl JdbcInput {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        driver: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
            driver: driver.into(),
            query: query.into(),
        }
    }
}

impl Debug for JdbcInput {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JdbcInput")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &"***")
            .field("driver", &self.driver)
            .field("query", &self.query)
            .finish()
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ModelRef<'a> {
    identifier: &'a str,
    version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub(crate) enum InputBlock<'a> {
    #[serde(rename = "text")]
    Text { sources: ResolvedSources<String> },
    #[serde(rename = "embedded")]
    Embedded { sources: ResolvedSources<String> },
    #[serde(rename = "aws-s3")]
    AwsS3 {
        #[serde(rename = "accessKeyID")]
        access_key_id: &'a str,
        #[serde(rename = "secretAccessKey")]
        secret_access_key: &'a str,
        region: &'a str,
        sources: ResolvedSources<S3Key>,
    },
    #[serde(rename = "jdbc")]
    Jdbc {
        url: &'a str,
        username: &'a str,
        password: &'a str,
        driver: &'a str,
        query: &'a str,
    },
    #[serde(rename = "file")]
    File,
}

impl<'a> InputBlock<'a> {
    pub(crate) fn aws_s3(credentials: &'a S3Credentials, sources: ResolvedSources<S3Key>) -> Self {
        InputBlock::AwsS3 {
            access_key_id: &credentials.access_key_id,
            secret_access_key: &credentials.secret_access_key,
            region: &credentials.region,
            sources,
        }
    }

    pub(crate) fn jdbc(input: &'a JdbcInput) -> Self {
        InputBlock::Jdbc {
            url: &input.url,
            username: &input.username,
            password: &input.password,
            driver: &input.driver,
            query: &input.query,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            InputBlock::Text { .. } => "text",
            InputBlock::Embedded { .. } => "embedded",
            InputBlock::AwsS3 { .. } => "aws-s3",
            InputBlock::Jdbc { .. } => "jdbc",
            InputBlock::File => "file",
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionEnvelope<'a> {
    model: ModelRef<'a>,
    explain: bool,
    #[serde(skip_serializing_if = "is_zero")]
    timeout: u64,
    input: InputBlock<'a>,
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}

impl<'a> SubmissionEnvelope<'a> {
    pub(crate) fn new(options: &'a SubmitJobOptions, input: InputBlock<'a>) -> Self {
        Self {
            model: ModelRef {
                identifier: &options.model_identifier,
                version: &options.model_version,
            },
            explain: options.explain,
            timeout: u64::try_from(options.timeout.as_millis()).unwrap_or(u64::MAX),
            input,
        }
    }

    pub(crate) fn kind(&self) -> &'static str {
        self.input.kind()
    }

    /// JSON form of the envelope.
    pub(crate) fn to_value(&self) -> Result<serde_json::Value> {
        serde_json::to_value(self).map_err(ModzyError::Encoding)
    }
}

/// Parses a human size such as `"1M"`, `"512K"` or `"1MiB"` into bytes.
///
/// SI units multiply by 1000, IEC units (`Ki`, `Mi`, ...) by 1024. A bare number
/// is a byte count.
pub fn parse_size(input: &str) -> Result<usize> {
    let trimmed = input.trim();
    let split = trimmed
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(trimmed.len());
    let (number, unit) = trimmed.split_at(split);

    let invalid = || ModzyError::InvalidChunkSize(input.to_string());
    let value: f64 = number.parse().map_err(|_| invalid())?;
    let multiplier: f64 = match unit.trim().to_ascii_lowercase().as_str() {
        "" | "b" => 1.0,
        "k" | "kb" => 1e3,
        "m" | "mb" => 1e6,
        "g" | "gb" => 1e9,
        "ki" | "kib" => 1024.0,
        "mi" | "mib" => 1024.0 * 1024.0,
        "gi" | "gib" => 1024.0 * 1024.0 * 1024.0,
        _ => return Err(invalid()),
    };

    let bytes = (value * multiplier).floor();
    if bytes < 1.0 {
        return Err(invalid());
    }
    Ok(bytes as usize)
}
