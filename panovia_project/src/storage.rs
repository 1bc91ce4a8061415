//! Persistence collaborator contract. Storage failures are never fatal:
//! callers log them and keep the in-memory registry authoritative for the
//! rest of the session.

use crate::record::ProjectRecord;
use indexmap::IndexMap;
use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid project data: {0}")]
    InvalidData(#[from] serde_json::Error),
}

/// Durable home for the project map. Both directions are fallible.
pub trait ProjectStore {
    fn load_all(&self) -> Result<IndexMap<String, ProjectRecord>, StorageError>;
    fn save_all(&self, projects: &IndexMap<String, ProjectRecord>) -> Result<(), StorageError>;
}

/// JSON file on disk, one document holding the whole project map.
/// A missing file reads as an empty map.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }
}

impl ProjectStore for JsonFileStore {
    fn load_all(&self) -> Result<IndexMap<String, ProjectRecord>, StorageError> {
        if !self.path.exists() {
            return Ok(IndexMap::new());
        }
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    fn save_all(&self, projects: &IndexMap<String, ProjectRecord>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(projects)?;
        fs::write(&self.path, raw)?;
        Ok(())
    }
}

/// In-memory store used by tests and previews.
#[derive(Default)]
pub struct MemoryStore {
    projects: RefCell<IndexMap<String, ProjectRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProjectStore for MemoryStore {
    fn load_all(&self) -> Result<IndexMap<String, ProjectRecord>, StorageError> {
        Ok(self.projects.borrow().clone())
    }

    fn save_all(&self, projects: &IndexMap<String, ProjectRecord>) -> Result<(), StorageError> {
        *self.projects.borrow_mut() = projects.clone();
        Ok(())
    }
}
