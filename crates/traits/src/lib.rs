pub mod bundle;
pub mod resource;
pub mod script;

pub use bundle::{InMemoryResourceBundle, ResourceBundle, ResourceBundleLoader};
pub use resource::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
pub use script::{ScriptEngine, ScriptError};
