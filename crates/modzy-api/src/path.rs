use std::fmt::{Display, Formatter};

use reqwest::Url;

use crate::error::ClientError;

/// Path of an api resource, relative to the configured endpoint.
///
/// Each segment is percent-encoded on its own when the request url is built, so a
/// segment containing `/`, `?` or `#` stays inside that segment.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiPath {
    segments: Vec<String>,
}

impl ApiPath {
    pub fn new(segment: impl Into<String>) -> Self {
        Self {
            segments: vec![segment.into()],
        }
    }

    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Appends the segments to `base`. Empty, `.` and `..` segments are rejected
    /// since they cannot address a single resource.
    pub fn resolve(&self, base: &Url) -> Result<Url, ClientError> {
        let mut url = base.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| ClientError::InvalidUrl(format!("{base} cannot be a base url")))?;
            path.pop_if_empty();
            for segment in &self.segments {
                if matches!(segment.as_str(), "" | "." | "..") {
                    return Err(ClientError::InvalidUrl(format!(
                        "invalid path segment {segment:?} in {self}"
                    )));
                }
                path.push(segment);
            }
        }
        Ok(url)
    }
}

/// Splits a fixed path on `/`.
impl From<&str> for ApiPath {
    fn from(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
        }
    }
}

impl Display for ApiPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}
