use derive_new::new;
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::paging::{Links, PagingInput};
use crate::path::ApiPath;

/// One part of a multipart form upload.
#[derive(Debug, Clone, new)]
pub struct MultipartPart {
    /// Form field name
    pub field: String,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Request execution used by the job client.
///
/// Paths are relative to the configured endpoint. Every method decodes the JSON
/// body into `R`, or returns [`ClientError::ApiError`] when the platform answers
/// with a status >= 400.
pub trait Requestor {
    fn get<R>(&self, path: &ApiPath) -> Result<R, ClientError>
    where
        R: DeserializeOwned;

    fn post<T, R>(&self, path: &ApiPath, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned;

    fn patch<T, R>(&self, path: &ApiPath, body: &T) -> Result<R, ClientError>
    where
        T: Serialize + ?Sized,
        R: DeserializeOwned;

    fn delete<R>(&self, path: &ApiPath) -> Result<R, ClientError>
    where
        R: DeserializeOwned;

    /// GET with the paging parameters appended to the query string.
    fn list<R>(&self, path: &ApiPath, paging: &PagingInput) -> Result<(R, Links), ClientError>
    where
        R: DeserializeOwned;

    fn post_multipart<R>(&self, path: &ApiPath, part: MultipartPart) -> Result<R, ClientError>
    where
        R: DeserializeOwned;
}
