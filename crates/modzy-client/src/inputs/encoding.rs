use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use serde::Serialize;

use crate::error::InputError;
use crate::inputs::fs::FileSystem;
use crate::inputs::mime::{FALLBACK_MIME_TYPE, mime_type_for};
use crate::inputs::source::InputSource;

/// Input of a `text` job. Resolves to the literal string sent in the envelope.
#[derive(Debug)]
pub struct TextInput(InputSource);

impl TextInput {
    pub fn text(text: impl Into<String>) -> Self {
        Self(InputSource::from(text.into()))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self(InputSource::file(path))
    }

    pub fn file_in(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self(InputSource::file_in(fs, path))
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self(InputSource::reader(reader))
    }

    pub fn resolve(self) -> Result<String, InputError> {
        let context = self.0.describe();
        let bytes = self.0.read_all()?;
        String::from_utf8(bytes).map_err(|e| InputError::Read {
            context,
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })
    }
}

/// Input of an `embedded` job, sent inline as a base64 `data:` URI.
///
/// The whole source is read into memory when resolved.
#[derive(Debug)]
pub struct EmbeddedInput {
    source: InputSource,
    mime_type: String,
}

impl EmbeddedInput {
    pub fn new(source: InputSource, mime_type: impl Into<String>) -> Self {
        Self {
            source,
            mime_type: mime_type.into(),
        }
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self::new(InputSource::bytes(bytes), mime_type)
    }

    pub fn text(text: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self::new(InputSource::from(text.into()), mime_type)
    }

    pub fn reader(reader: impl Read + Send + 'static, mime_type: impl Into<String>) -> Self {
        Self::new(InputSource::reader(reader), mime_type)
    }

    /// A file whose media type is guessed from its extension.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_type_for(&path);
        Self::new(InputSource::file(path), mime_type)
    }

    pub fn file_in(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mime_type = mime_type_for(&path);
        Self::new(InputSource::file_in(fs, path), mime_type)
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Reads the source and encodes it as `data:<mime>;base64,<payload>`.
    pub fn resolve(self) -> Result<String, InputError> {
        let mime_type = if self.mime_type.is_empty() {
            FALLBACK_MIME_TYPE.to_string()
        } else {
            self.mime_type
        };
        let bytes = self.source.read_all()?;
        Ok(format!(
            "data:{};base64,{}",
            mime_type,
            BASE64_STANDARD.encode(bytes)
        ))
    }
}

/// Input of a `file` job, uploaded in chunks after the job is opened.
#[derive(Debug)]
pub struct FileInput(InputSource);

impl FileInput {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self(InputSource::file(path))
    }

    pub fn file_in(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        Self(InputSource::file_in(fs, path))
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        Self(InputSource::reader(reader))
    }

    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(InputSource::bytes(bytes))
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self(InputSource::from(text.into()))
    }

    pub fn file_name(&self) -> String {
        self.0.file_name()
    }

    /// Opens the whole, unsplit stream.
    pub fn open(self) -> Result<Box<dyn Read + Send>, InputError> {
        self.0.open()
    }
}

/// Location of an object in S3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct S3Key {
    pub bucket: String,
    pub key: String,
}

/// Input of an `aws-s3` job: a reference to an object the platform reads itself.
pub struct S3Input(Box<dyn FnOnce() -> Result<S3Key, InputError> + Send>);

impl S3Input {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        let key = S3Key {
            bucket: bucket.into(),
            key: key.into(),
        };
        Self(Box::new(move || Ok(key)))
    }

    /// A reference computed when the job is submitted.
    pub fn from_fn(f: impl FnOnce() -> Result<S3Key, InputError> + Send + 'static) -> Self {
        Self(Box::new(f))
    }

    pub fn resolve(self) -> Result<S3Key, InputError> {
        (self.0)()
    }
}

impl std::fmt::Debug for S3Input {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("S3Input")
    }
}
