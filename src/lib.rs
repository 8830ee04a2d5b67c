//! # wtkx
//!
//! Builds live object graphs from WTKX markup documents.
//!
//! A document is plain XML. Each typed element names a registered type,
//! its attributes set properties, and nested elements fill properties or
//! containers. `wtkx:id` names objects for later lookup, `wtkx:include`
//! splices in other documents, and `wtkx:script` hands code to a pluggable
//! script engine.
//!
//! ```no_run
//! use std::sync::Arc;
//! use wtkx::{FilesystemResourceProvider, Serializer};
//!
//! let serializer = Serializer::builder()
//!     .with_documents(Arc::new(FilesystemResourceProvider::new("ui")))
//!     .build();
//! let document = serializer.read("main.wtkx")?;
//! println!("{}", wtkx::dump::to_json_pretty(document.root()));
//! # Ok::<(), wtkx::SerializationError>(())
//! ```

pub mod dump;
pub mod error;

pub use error::CliError;

pub use wtkx_core::*;
pub use wtkx_resource::{FilesystemResourceProvider, JsonResourceBundle, JsonResourceBundleLoader};
