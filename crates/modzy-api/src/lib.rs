//! HTTP transport for the Modzy platform.
//!
//! [`Client`] implements [`Requestor`], the request-execution interface the job
//! client is written against.

pub mod client;
pub mod config;
pub mod credentials;
pub mod error;
pub mod paging;
pub mod path;
pub mod requestor;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use credentials::ModzyCredentials;
pub use error::{ApiErrorBody, ClientError, ErrorCause};
pub use paging::{Filter, FilterKind, Links, PagingInput, SortDirection};
pub use path::ApiPath;
pub use requestor::{MultipartPart, Requestor};

pub use reqwest::StatusCode;
