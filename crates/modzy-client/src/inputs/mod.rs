//! Job inputs and how each family of job encodes them.

mod encoding;
pub mod fs;
pub mod mime;
mod source;

use std::collections::BTreeMap;

pub use encoding::{EmbeddedInput, FileInput, S3Input, S3Key, TextInput};
pub use fs::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use source::InputSource;

/// Inputs of a job, grouped by source key then by the model's input field name.
///
/// Each source key is one independent inference request within the job. Keys are
/// kept sorted so submissions are deterministic.
#[derive(Debug)]
pub struct JobInputs<T> {
    sources: BTreeMap<String, BTreeMap<String, T>>,
}

impl<T> Default for JobInputs<T> {
    fn default() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }
}

impl<T> JobInputs<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(
        mut self,
        source_key: impl Into<String>,
        field: impl Into<String>,
        input: T,
    ) -> Self {
        self.insert(source_key, field, input);
        self
    }

    /// Adds an input, replacing any previous input for the same source and field.
    pub fn insert(&mut self, source_key: impl Into<String>, field: impl Into<String>, input: T) {
        self.sources
            .entry(source_key.into())
            .or_default()
            .insert(field.into(), input);
    }

    /// Number of source keys.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source_keys(&self) -> impl Iterator<Item = &str> {
        self.sources.keys().map(String::as_str)
    }

    /// Converts every input, stopping at the first failure.
    pub fn try_map<U, E>(
        self,
        mut f: impl FnMut(T) -> Result<U, E>,
    ) -> Result<BTreeMap<String, BTreeMap<String, U>>, E> {
        let mut resolved = BTreeMap::new();
        for (source_key, fields) in self.sources {
            let mut resolved_fields = BTreeMap::new();
            for (field, input) in fields {
                resolved_fields.insert(field, f(input)?);
            }
            resolved.insert(source_key, resolved_fields);
        }
        Ok(resolved)
    }
}

impl<T> IntoIterator for JobInputs<T> {
    type Item = (String, BTreeMap<String, T>);
    type IntoIter = std::collections::btree_map::IntoIter<String, BTreeMap<String, T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.sources.into_iter()
    }
}

impl<T> From<BTreeMap<String, BTreeMap<String, T>>> for JobInputs<T> {
    fn from(sources: BTreeMap<String, BTreeMap<String, T>>) -> Self {
        Self { sources }
    }
}
