//! Filesystem-backed document provider.
//!
//! Paths handed to the provider are the slash-separated locations the engine
//! computes for documents and includes. They are resolved under a root
//! directory and must stay inside it.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use wtkx_traits::{ResourceError, ResourceProvider, SharedResourceData};

/// Loads documents relative to a root directory.
///
/// Absolute paths and paths that climb out of the root with `..` are
/// reported as `NotFound`.
#[derive(Debug)]
pub struct FilesystemResourceProvider {
    root: PathBuf,
    root_str: Option<String>,
    canonical_root: Option<PathBuf>,
}

impl FilesystemResourceProvider {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        let root = root.as_ref().to_path_buf();
        let canonical_root = root.canonicalize().ok();
        let root_str = root.to_str().map(str::to_string);
        Self {
            root,
            root_str,
            canonical_root,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let relative = Path::new(path.trim_start_matches("./"));
        if relative.is_absolute() {
            return None;
        }
        if relative
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
        {
            return None;
        }

        let full = self.root.join(relative);
        match (full.canonicalize(), &self.canonical_root) {
            (Ok(canonical), Some(root)) if canonical.starts_with(root) => Some(canonical),
            (Ok(_), Some(_)) => None,
            _ => Some(full),
        }
    }
}

impl ResourceProvider for FilesystemResourceProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        let full = self
            .resolve(path)
            .ok_or_else(|| ResourceError::NotFound(format!("{} (outside document root)", path)))?;

        log::debug!("Loading '{}' from {}", path, full.display());
        std::fs::read(&full).map(Arc::new).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ResourceError::NotFound(path.to_string())
            } else {
                ResourceError::LoadFailed {
                    path: path.to_string(),
                    message: e.to_string(),
                }
            }
        })
    }

    fn exists(&self, path: &str) -> bool {
        self.resolve(path).map(|p| p.is_file()).unwrap_or(false)
    }

    fn base_path(&self) -> Option<&str> {
        self.root_str.as_deref()
    }

    fn name(&self) -> &'static str {
        "FilesystemResourceProvider"
    }
}
