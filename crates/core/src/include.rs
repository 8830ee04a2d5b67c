//! Location arithmetic and the include cycle guard.

use std::path::Path;

use crate::error::SerializationError;

pub const MAX_INCLUDE_DEPTH: usize = 64;

/// Resolve `href` against the document at `base`.
///
/// Absolute paths and URLs with a scheme are returned unchanged. Relative
/// references resolve against the directory of `base`.
pub fn resolve_uri(href: &str, base: Option<&str>) -> String {
    if href.starts_with('/') || href.contains("://") {
        return href.to_string();
    }

    match base {
        Some(base) => {
            let base_dir = Path::new(base).parent().unwrap_or(Path::new(""));
            let resolved = base_dir.join(href);
            normalize_path(&resolved.to_string_lossy())
        }
        None => normalize_path(href),
    }
}

pub fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            _ => parts.push(part),
        }
    }
    if path.starts_with('/') {
        format!("/{}", parts.join("/"))
    } else {
        parts.join("/")
    }
}

/// File extension of a location, without the dot.
pub fn extension(location: &str) -> Option<&str> {
    let name = location.rsplit('/').next()?;
    name.rsplit_once('.').map(|(_, ext)| ext).filter(|e| !e.is_empty())
}

/// Tracks the chain of documents currently being read.
#[derive(Debug, Default)]
pub(crate) struct IncludeGuard {
    active: Vec<String>,
    depth: usize,
}

impl IncludeGuard {
    pub(crate) fn enter(&mut self, location: Option<&str>) -> Result<(), SerializationError> {
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(SerializationError::IncludeDepth(MAX_INCLUDE_DEPTH));
        }
        if let Some(location) = location {
            if self.active.iter().any(|l| l == location) {
                let mut chain = self.active.clone();
                chain.push(location.to_string());
                return Err(SerializationError::CyclicInclude(chain.join(" -> ")));
            }
            self.active.push(location.to_string());
        }
        self.depth += 1;
        Ok(())
    }

    pub(crate) fn leave(&mut self, location: Option<&str>) {
        if location.is_some() {
            self.active.pop();
        }
        self.depth = self.depth.saturating_sub(1);
    }
}
