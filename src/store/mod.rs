//! Link store: the YAML document of record for the collection.
//!
//! All I/O goes through the `FileSystem` port. Layout:
//!
//! ```yaml
//! categories:
//!   - { id: dev, name: Development }
//! links:
//!   - { id: gh, title: GitHub, url: "https://github.com", category_id: dev }
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::collection::{ensure_unique_ids, DuplicateIdError};
use crate::model::{Category, LinkRecord};
use crate::ports::filesystem::FileSystem;
use crate::ports::sink::{CollectionSink, CommitError};

/// Everything persisted in the store file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDocument {
    /// Known categories, in display order.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// The ordered collection.
    #[serde(default)]
    pub links: Vec<LinkRecord>,
}

impl LinkDocument {
    /// Display name for a category id, falling back to the id itself.
    #[must_use]
    pub fn category_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.categories.iter().find(|c| c.id == id).map_or(id, |c| c.name.as_str())
    }
}

/// Failures reading or writing the store file.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The file could not be read or written.
    #[error("{action} {}: {source}", .path.display())]
    Io {
        /// What was being attempted.
        action: &'static str,
        /// Store file path.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error,
    },
    /// The file is not a valid link document.
    #[error("invalid link document {}: {source}", .path.display())]
    Parse {
        /// Store file path.
        path: PathBuf,
        /// YAML error.
        #[source]
        source: serde_yaml::Error,
    },
    /// The document could not be serialized.
    #[error("failed to serialize link document: {0}")]
    Serialize(#[source] serde_yaml::Error),
    /// The collection breaks the unique-id invariant.
    #[error(transparent)]
    Duplicate(#[from] DuplicateIdError),
}

impl From<StoreError> for CommitError {
    fn from(err: StoreError) -> Self {
        CommitError(err.to_string())
    }
}

/// File-backed collection store.
pub struct LinkStore<'a> {
    fs: &'a dyn FileSystem,
    path: PathBuf,
}

impl<'a> LinkStore<'a> {
    /// Creates a store for the document at `path`.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, path: &Path) -> Self {
        Self { fs, path: path.to_path_buf() }
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the document; a missing file is an empty document.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or repeats a link id.
    pub fn load(&self) -> Result<LinkDocument, StoreError> {
        if !self.fs.exists(&self.path) {
            return Ok(LinkDocument::default());
        }
        let contents = self.fs.read_to_string(&self.path).map_err(|source| StoreError::Io {
            action: "failed to read",
            path: self.path.clone(),
            source,
        })?;
        let document: LinkDocument = serde_yaml::from_str(&contents)
            .map_err(|source| StoreError::Parse { path: self.path.clone(), source })?;
        ensure_unique_ids(&document.links)?;
        Ok(document)
    }

    /// Writes the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the links repeat an id or the write fails.
    pub fn save(&self, document: &LinkDocument) -> Result<(), StoreError> {
        ensure_unique_ids(&document.links)?;
        let yaml = serde_yaml::to_string(document).map_err(StoreError::Serialize)?;
        self.fs.write(&self.path, &yaml).map_err(|source| StoreError::Io {
            action: "failed to write",
            path: self.path.clone(),
            source,
        })
    }
}

impl CollectionSink for LinkStore<'_> {
    fn commit(&self, links: &[LinkRecord]) -> Result<(), CommitError> {
        let mut document = self.load()?;
        document.links = links.to_vec();
        self.save(&document)?;
        debug!(path = %self.path.display(), count = links.len(), "collection committed");
        Ok(())
    }
}
