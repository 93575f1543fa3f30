use reqwest::StatusCode;
use serde::Deserialize;
use std::fmt::{Display, Formatter};
use strum::Display;
use thiserror::Error;

/// Stable classification of an HTTP error returned by the platform, so callers
/// can branch on it without matching on messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
#[non_exhaustive]
pub enum ErrorCause {
    BadRequest,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServer,
    Unknown,
}

impl From<StatusCode> for ErrorCause {
    fn from(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST => ErrorCause::BadRequest,
            StatusCode::UNAUTHORIZED => ErrorCause::Unauthorized,
            StatusCode::FORBIDDEN => ErrorCause::Forbidden,
            StatusCode::NOT_FOUND => ErrorCause::NotFound,
            StatusCode::INTERNAL_SERVER_ERROR => ErrorCause::InternalServer,
            _ => ErrorCause::Unknown,
        }
    }
}

/// Error body sent by the platform alongside any status >= 400.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiErrorBody {
    pub status_code: u16,
    pub status: String,
    pub message: String,
    pub report_error_url: String,
}

impl Display for ApiErrorBody {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.report_error_url.is_empty() {
            write!(f, " (report: {})", self.report_error_url)?;
        }
        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Api error {status}: {body}")]
    ApiError {
        status: StatusCode,
        body: ApiErrorBody,
    },
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
    #[error("Unknown Error: {0}")]
    UnknownError(String),
}

impl ClientError {
    /// Builds an api error from a status and the raw response text. A body that is
    /// not the platform's error shape is kept as the message.
    pub fn from_status(status: StatusCode, text: &str) -> Self {
        let mut body = serde_json::from_str::<ApiErrorBody>(text).unwrap_or_else(|_| ApiErrorBody {
            message: text.to_string(),
            ..Default::default()
        });
        if body.status_code == 0 {
            body.status_code = status.as_u16();
        }
        if body.message.is_empty() {
            body.message = status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string();
        }
        ClientError::ApiError { status, body }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ClientError::ApiError { status, .. } => Some(*status),
            ClientError::Transport(e) => e.status(),
            _ => None,
        }
    }

    /// Classification of an http error, `None` for anything that did not come back
    /// from the platform as an error status.
    pub fn cause(&self) -> Option<ErrorCause> {
        match self {
            ClientError::ApiError { status, .. } => Some(ErrorCause::from(*status)),
            _ => None,
        }
    }

    pub fn report_error_url(&self) -> Option<&str> {
        match self {
            ClientError::ApiError { body, .. } if !body.report_error_url.is_empty() => {
                Some(&body.report_error_url)
            }
            _ => None,
        }
    }

    pub fn is_login_error(&self) -> bool {
        matches!(
            self.cause(),
            Some(ErrorCause::Unauthorized | ErrorCause::Forbidden)
        )
    }
}
