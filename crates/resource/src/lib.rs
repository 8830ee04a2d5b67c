//! Resource implementations for the WTKX markup engine.
//!
//! ## Available Implementations
//!
//! - [`FilesystemResourceProvider`]: loads documents from a directory tree
//! - [`JsonResourceBundleLoader`]: JSON resource bundles with locale overlays
//!
//! The in-memory provider from `wtkx-traits` is re-exported for convenience.

mod filesystem;
mod json_bundle;

pub use filesystem::FilesystemResourceProvider;
pub use json_bundle::{JsonResourceBundle, JsonResourceBundleLoader};

pub use wtkx_traits::InMemoryResourceProvider;
