//! Persistence for the store document.
//!
//! The orchestrator only needs `load` and `save`; where the document lives
//! is up to the `DocumentStore` implementation.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::document::Document;
use crate::errors::{KeepSafeError, Result};

/// Read/write access to a single persisted document.
pub trait DocumentStore {
    /// Returns `true` if a document is present.
    fn exists(&self) -> bool;

    /// Load the document, failing with `NotInitialized` if there is none.
    fn load(&self) -> Result<Document>;

    /// Replace the stored document.
    fn save(&mut self, document: &Document) -> Result<()>;
}

/// A document stored as a JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    path: PathBuf,
}

impl FileDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path to the document file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for FileDocumentStore {
    fn exists(&self) -> bool {
        self.path.exists()
    }

    fn load(&self) -> Result<Document> {
        if !self.path.exists() {
            return Err(KeepSafeError::NotInitialized(
                self.path.display().to_string(),
            ));
        }

        let text = fs::read_to_string(&self.path)?;
        let document = Document::from_json(&text)?;
        tracing::debug!(path = %self.path.display(), secrets = document.secrets.len(), "loaded document");
        Ok(document)
    }

    /// Write the document **atomically**: write a temp file in the same
    /// directory, then rename it over the target so readers never see a
    /// half-written document.
    fn save(&mut self, document: &Document) -> Result<()> {
        let json = document.to_json()?;

        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        if !parent.exists() {
            fs::create_dir_all(parent)?;
        }

        let tmp_path = parent.join(format!(
            ".{}.tmp",
            self.path.file_name().unwrap_or_default().to_string_lossy()
        ));

        let written = write_owner_only(&tmp_path, json.as_bytes())
            .and_then(|()| fs::rename(&tmp_path, &self.path));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e.into());
        }

        tracing::debug!(path = %self.path.display(), secrets = document.secrets.len(), "saved document");
        Ok(())
    }
}

/// Create `path` fresh with owner-only permissions and write `bytes` to it.
///
/// A stale file from an interrupted save is removed first, so the mode is
/// always applied at creation.
fn write_owner_only(path: &Path, bytes: &[u8]) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => return Err(e),
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// A document held in memory, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    document: Option<Document>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently stored document, if any.
    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// Mutable access to the stored document, bypassing the store's checks.
    pub fn document_mut(&mut self) -> Option<&mut Document> {
        self.document.as_mut()
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn exists(&self) -> bool {
        self.document.is_some()
    }

    fn load(&self) -> Result<Document> {
        self.document
            .clone()
            .ok_or_else(|| KeepSafeError::NotInitialized("in-memory store".into()))
    }

    fn save(&mut self, document: &Document) -> Result<()> {
        self.document = Some(document.clone());
        Ok(())
    }
}
