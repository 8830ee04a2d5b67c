//! ResourceProvider trait for loading markup documents and their companions.
//!
//! The engine never touches the filesystem directly: documents, included
//! documents, scripts and resource bundles are all fetched through a
//! provider, addressed by slash-separated paths.

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, RwLock};
use thiserror::Error;

/// Error type for resource loading operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResourceError {
    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Failed to load resource '{path}': {message}")]
    LoadFailed { path: String, message: String },

    #[error("Invalid resource format in '{path}': {message}")]
    InvalidFormat { path: String, message: String },

    #[error("I/O error: {0}")]
    Io(String),
}

impl ResourceError {
    pub fn invalid_format(path: impl Into<String>, message: impl Into<String>) -> Self {
        ResourceError::InvalidFormat {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ResourceError::NotFound(_))
    }
}

impl From<std::io::Error> for ResourceError {
    fn from(err: std::io::Error) -> Self {
        ResourceError::Io(err.to_string())
    }
}

/// Shared resource data type (reference-counted bytes).
pub type SharedResourceData = Arc<Vec<u8>>;

/// A source of document bytes.
///
/// # Implementations
///
/// - `FilesystemResourceProvider` (in `wtkx-resource`): a directory tree
/// - [`InMemoryResourceProvider`]: pre-populated memory, used by tests and
///   embedded documents
pub trait ResourceProvider: Send + Sync + Debug {
    /// Load a resource by its path.
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError>;

    /// Check if a resource exists.
    fn exists(&self, path: &str) -> bool;

    /// Root that relative paths are resolved against, if any.
    fn base_path(&self) -> Option<&str> {
        None
    }

    /// Human-readable name for logging.
    fn name(&self) -> &'static str;
}

/// A provider backed by a map of paths to bytes.
#[derive(Debug, Default)]
pub struct InMemoryResourceProvider {
    resources: RwLock<HashMap<String, SharedResourceData>>,
}

impl InMemoryResourceProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `path`, replacing any previous entry.
    ///
    /// # Errors
    ///
    /// Returns `ResourceError::LoadFailed` if the internal lock is poisoned.
    pub fn add(&self, path: impl Into<String>, data: Vec<u8>) -> Result<(), ResourceError> {
        let path = path.into();
        let mut resources = self.resources.write().map_err(|_| ResourceError::LoadFailed {
            path: path.clone(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources.insert(path, Arc::new(data));
        Ok(())
    }

    /// Store a UTF-8 document under `path`.
    pub fn add_str(&self, path: impl Into<String>, text: &str) -> Result<(), ResourceError> {
        self.add(path, text.as_bytes().to_vec())
    }

    /// Builder-style variant of [`add_str`](Self::add_str) for test setup.
    pub fn with_str(self, path: impl Into<String>, text: &str) -> Result<Self, ResourceError> {
        self.add_str(path, text)?;
        Ok(self)
    }

    /// Returns `None` if the lock is poisoned or the resource doesn't exist.
    pub fn remove(&self, path: &str) -> Option<SharedResourceData> {
        self.resources.write().ok()?.remove(path)
    }

    pub fn clear(&self) {
        if let Ok(mut resources) = self.resources.write() {
            resources.clear();
        }
    }

    /// Returns 0 if the lock is poisoned.
    pub fn len(&self) -> usize {
        self.resources.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ResourceProvider for InMemoryResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let resources = self.resources.read().map_err(|_| ResourceError::LoadFailed {
            path: path.to_string(),
            message: "resource store lock poisoned".to_string(),
        })?;
        resources
            .get(path)
            .cloned()
            .ok_or_else(|| ResourceError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> bool {
        self.resources
            .read()
            .map(|r| r.contains_key(path))
            .unwrap_or(false)
    }

    fn name(&self) -> &'static str {
        "InMemoryResourceProvider"
    }
}
