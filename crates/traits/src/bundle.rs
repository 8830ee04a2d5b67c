//! Localized string tables consulted by the `%key` attribute form.

use std::collections::HashMap;
use std::fmt::Debug;
use std::rc::Rc;

use wtkx_types::{Locale, Value};

use crate::resource::ResourceError;

/// A resource bundle bound to one base name and locale.
pub trait ResourceBundle: Debug {
    /// The base name the bundle was loaded for, e.g. `demo.ui.MainWindow`.
    fn base_name(&self) -> &str;

    /// Look up `key`. Dotted keys address nested groups.
    fn get(&self, key: &str) -> Option<Value>;
}

/// Produces resource bundles by base name and locale.
pub trait ResourceBundleLoader: Debug {
    /// # Errors
    ///
    /// Returns `ResourceError::NotFound` when no bundle exists for
    /// `base_name`; other variants mean the bundle exists but is unusable.
    fn load(
        &self,
        base_name: &str,
        locale: Option<&Locale>,
    ) -> Result<Rc<dyn ResourceBundle>, ResourceError>;
}

/// A flat key/value bundle.
#[derive(Debug, Default, Clone)]
pub struct InMemoryResourceBundle {
    base_name: String,
    entries: HashMap<String, Value>,
}

impl InMemoryResourceBundle {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            entries: HashMap::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.entries.insert(key.into(), value.into());
    }
}

impl ResourceBundle for InMemoryResourceBundle {
    fn base_name(&self) -> &str {
        &self.base_name
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }
}
