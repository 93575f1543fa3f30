use std::path::PathBuf;

use modzy_api::{ClientError, ErrorCause};
use thiserror::Error;

/// Failure to produce the bytes of a job input.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Cannot open input file {path}: {source}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Cannot read input {context}: {source}")]
    Read {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ModzyError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error("Operation was cancelled")]
    Cancelled,
    #[error("Invalid chunk size: {0}")]
    InvalidChunkSize(String),
    #[error("Cannot encode job submission: {0}")]
    Encoding(#[source] serde_json::Error),
    #[error("Missing configuration: {0}")]
    Configuration(#[from] std::env::VarError),
}

impl ModzyError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ModzyError::Cancelled)
    }

    /// Classification of a platform http error, if this is one.
    pub fn cause(&self) -> Option<ErrorCause> {
        match self {
            ModzyError::Client(e) => e.cause(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ModzyError>;
