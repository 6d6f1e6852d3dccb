//! Opaque byte stores.
//!
//! A blob store holds exactly one document and replaces it whole on every
//! save. There is no partial update and no locking; one session owns the
//! store at a time.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::PersistError;

/// A single-document byte store.
pub trait BlobStore {
    /// Read the stored document, or `None` if nothing has been saved yet.
    fn load(&self) -> Result<Option<Vec<u8>>, PersistError>;

    /// Replace the stored document.
    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistError>;
}

// ---------------------------------------------------------------------------
// FileBlobStore
// ---------------------------------------------------------------------------

/// A blob stored in one file.
///
/// Saves write a sibling `.tmp` file and rename it over the target, so a
/// reader sees either the old document or the new one.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    path: PathBuf,
}

impl FileBlobStore {
    /// Bind to `path`. The file need not exist yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The file this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> PersistError {
        PersistError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl BlobStore for FileBlobStore {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(Self::io_error(&self.path, e)),
        }
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }
        let temp = self.temp_path();
        fs::write(&temp, bytes).map_err(|e| Self::io_error(&temp, e))?;
        fs::rename(&temp, &self.path).map_err(|e| Self::io_error(&self.path, e))?;
        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "blob saved");
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// MemoryBlobStore
// ---------------------------------------------------------------------------

/// A blob held in memory, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryBlobStore {
    bytes: Option<Vec<u8>>,
}

impl MemoryBlobStore {
    /// An empty store.
    pub const fn new() -> Self {
        Self { bytes: None }
    }

    /// A store pre-loaded with `bytes`.
    pub fn with_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: Some(bytes.into()),
        }
    }

    /// The current contents.
    pub fn bytes(&self) -> Option<&[u8]> {
        self.bytes.as_deref()
    }
}

impl BlobStore for MemoryBlobStore {
    fn load(&self) -> Result<Option<Vec<u8>>, PersistError> {
        Ok(self.bytes.clone())
    }

    fn save(&mut self, bytes: &[u8]) -> Result<(), PersistError> {
        self.bytes = Some(bytes.to_vec());
        Ok(())
    }
}
