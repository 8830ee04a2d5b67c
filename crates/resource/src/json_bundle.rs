//! JSON resource bundles.
//!
//! A bundle with base name `demo.ui.MainWindow` lives in
//! `demo/ui/MainWindow.json`. Locale-specific files (`MainWindow_fr.json`,
//! `MainWindow_fr_CA.json`) are layered on top, the most specific winning.

use std::rc::Rc;
use std::sync::Arc;

use serde_json::{Map, Value as JsonValue};
use wtkx_traits::{ResourceBundle, ResourceBundleLoader, ResourceError, ResourceProvider};
use wtkx_types::{Locale, Value};

#[derive(Debug, Clone)]
pub struct JsonResourceBundle {
    base_name: String,
    root: Map<String, JsonValue>,
}

impl JsonResourceBundle {
    pub fn from_map(base_name: impl Into<String>, root: Map<String, JsonValue>) -> Self {
        Self {
            base_name: base_name.into(),
            root,
        }
    }

    fn lookup(&self, key: &str) -> Option<&JsonValue> {
        if let Some(v) = self.root.get(key) {
            return Some(v);
        }
        let mut segments = key.split('.');
        let first = segments.next()?;
        segments.try_fold(self.root.get(first)?, |node, segment| node.get(segment))
    }
}

impl ResourceBundle for JsonResourceBundle {
    fn base_name(&self) -> &str {
        &self.base_name
    }

    fn get(&self, key: &str) -> Option<Value> {
        match self.lookup(key)? {
            JsonValue::Null => Some(Value::Null),
            JsonValue::Bool(b) => Some(Value::Boolean(*b)),
            JsonValue::Number(n) => n
                .as_i64()
                .map(Value::Long)
                .or_else(|| n.as_f64().map(Value::Double)),
            JsonValue::String(s) => Some(Value::String(s.clone())),
            JsonValue::Array(_) | JsonValue::Object(_) => None,
        }
    }
}

/// Loads [`JsonResourceBundle`]s through a [`ResourceProvider`].
#[derive(Debug, Clone)]
pub struct JsonResourceBundleLoader {
    provider: Arc<dyn ResourceProvider>,
}

impl JsonResourceBundleLoader {
    pub fn new(provider: Arc<dyn ResourceProvider>) -> Self {
        Self { provider }
    }

    fn read_object(&self, path: &str) -> Result<Option<Map<String, JsonValue>>, ResourceError> {
        let bytes = match self.provider.load(path) {
            Ok(bytes) => bytes,
            Err(e) if e.is_not_found() => return Ok(None),
            Err(e) => return Err(e),
        };
        match serde_json::from_slice::<JsonValue>(&bytes) {
            Ok(JsonValue::Object(map)) => Ok(Some(map)),
            Ok(_) => Err(ResourceError::invalid_format(path, "expected a JSON object")),
            Err(e) => Err(ResourceError::invalid_format(path, e.to_string())),
        }
    }
}

impl ResourceBundleLoader for JsonResourceBundleLoader {
    fn load(
        &self,
        base_name: &str,
        locale: Option<&Locale>,
    ) -> Result<Rc<dyn ResourceBundle>, ResourceError> {
        let stem = base_name.replace('.', "/");
        let mut suffixes = vec![String::new()];
        if let Some(locale) = locale {
            suffixes.extend(locale.candidates());
        }

        let mut merged: Option<Map<String, JsonValue>> = None;
        for suffix in suffixes {
            let path = format!("{}{}.json", stem, suffix);
            if let Some(layer) = self.read_object(&path)? {
                log::debug!("Loaded resource layer '{}'", path);
                match merged.as_mut() {
                    Some(base) => merge(base, layer),
                    None => merged = Some(layer),
                }
            }
        }

        let root = merged.ok_or_else(|| ResourceError::NotFound(format!("{}.json", stem)))?;
        Ok(Rc::new(JsonResourceBundle::from_map(base_name, root)))
    }
}

fn merge(base: &mut Map<String, JsonValue>, overlay: Map<String, JsonValue>) {
    for (key, value) in overlay {
        if let JsonValue::Object(nested) = value {
            if let Some(JsonValue::Object(existing)) = base.get_mut(&key) {
                merge(existing, nested);
                continue;
            }
            base.insert(key, JsonValue::Object(nested));
        } else {
            base.insert(key, value);
        }
    }
}
