use std::fmt::{Debug, Formatter};
use std::io::{Cursor, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::error::InputError;
use crate::inputs::fs::{FileSystem, OsFileSystem};

/// Where the bytes of one input field come from.
///
/// Building a source never touches the filesystem; the file is opened by
/// [`InputSource::open`], which consumes the source. The returned reader owns the
/// handle, so it is closed whenever the reader is dropped.
pub enum InputSource {
    Bytes(Vec<u8>),
    Reader(Box<dyn Read + Send>),
    File {
        path: PathBuf,
        fs: Arc<dyn FileSystem>,
    },
}

impl InputSource {
    pub fn bytes(bytes: impl Into<Vec<u8>>) -> Self {
        InputSource::Bytes(bytes.into())
    }

    pub fn reader(reader: impl Read + Send + 'static) -> Self {
        InputSource::Reader(Box::new(reader))
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::file_in(Arc::new(OsFileSystem), path)
    }

    pub fn file_in(fs: Arc<dyn FileSystem>, path: impl Into<PathBuf>) -> Self {
        InputSource::File {
            path: path.into(),
            fs,
        }
    }

    pub fn open(self) -> Result<Box<dyn Read + Send>, InputError> {
        match self {
            InputSource::Bytes(bytes) => Ok(Box::new(Cursor::new(bytes))),
            InputSource::Reader(reader) => Ok(reader),
            InputSource::File { path, fs } => fs
                .open(&path)
                .map_err(|source| InputError::FileOpen { path, source }),
        }
    }

    /// Reads the whole source into memory.
    pub fn read_all(self) -> Result<Vec<u8>, InputError> {
        let context = self.describe();
        let mut reader = self.open()?;
        let mut buffer = Vec::new();
        reader
            .read_to_end(&mut buffer)
            .map_err(|source| InputError::Read { context, source })?;
        Ok(buffer)
    }

    /// Name sent with uploaded chunks.
    pub fn file_name(&self) -> String {
        match self {
            InputSource::File { path, .. } => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| "input".to_string()),
            _ => "input".to_string(),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            InputSource::Bytes(bytes) => format!("bytes ({} bytes)", bytes.len()),
            InputSource::Reader(_) => "reader".to_string(),
            InputSource::File { path, .. } => format!("file {}", path.display()),
        }
    }
}

impl Debug for InputSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "InputSource({})", self.describe())
    }
}

impl From<Vec<u8>> for InputSource {
    fn from(bytes: Vec<u8>) -> Self {
        InputSource::Bytes(bytes)
    }
}

impl From<String> for InputSource {
    fn from(text: String) -> Self {
        InputSource::Bytes(text.into_bytes())
    }
}

impl From<&str> for InputSource {
    fn from(text: &str) -> Self {
        InputSource::Bytes(text.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inputs::fs::MemoryFileSystem;
    use std::io;

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("disk on fire"))
        }
    }

    #[test]
    fn missing_file_fails_on_open_not_on_construction() {
        let source = InputSource::file("/definitely/not/here.bin");
        let err = source.open().err().expect("open should fail");
        assert!(matches!(err, InputError::FileOpen { .. }));
        assert!(err.to_string().contains("/definitely/not/here.bin"));
    }

    #[test]
    fn memory_filesystem_is_used_for_file_sources() {
        let fs = Arc::new(MemoryFileSystem::new().with_file("in/a.txt", "hello"));
        let source = InputSource::file_in(fs, "in/a.txt");
        assert_eq!(source.file_name(), "a.txt");
        assert_eq!(source.read_all().unwrap(), b"hello");
    }

    #[test]
    fn read_errors_carry_context() {
        let err = InputSource::reader(FailingReader).read_all().unwrap_err();
        assert!(matches!(err, InputError::Read { .. }));
        assert!(err.to_string().contains("reader"));
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn bytes_and_text_sources() {
        assert_eq!(InputSource::from("abc").read_all().unwrap(), b"abc");
        assert_eq!(InputSource::bytes(vec![1, 2]).read_all().unwrap(), vec![1, 2]);
        assert_eq!(InputSource::bytes(vec![1, 2]).file_name(), "input");
    }
}
