//! The per-document registry of identified objects.
//!
//! Every `wtkx:id` in a document binds a value here. An included document
//! brings its own registry, which is nested under the include's id so that
//! `detail.okButton` addresses `okButton` inside the include bound as
//! `detail`.

use std::collections::HashMap;

use wtkx_types::{Dictionary, Value};

#[derive(Debug, Default, Clone)]
pub struct NamedObjects {
    values: HashMap<String, Value>,
    includes: HashMap<String, NamedObjects>,
}

impl NamedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a dotted path. Every segment but the last names a nested
    /// include registry.
    pub fn get(&self, path: &str) -> Option<Value> {
        let (registry, id) = self.walk(path)?;
        registry.values.get(id).cloned()
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.walk(path)
            .map(|(registry, id)| registry.values.contains_key(id))
            .unwrap_or(false)
    }

    /// Bind `id` in this registry, returning the value it replaced.
    pub fn put(&mut self, id: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(id.into(), value)
    }

    /// Bind the root of an included document together with its registry.
    pub fn bind_include(&mut self, id: impl Into<String>, value: Value, registry: NamedObjects) {
        let id = id.into();
        self.values.insert(id.clone(), value);
        self.includes.insert(id, registry);
    }

    /// The registry of the include bound as `id`.
    pub fn child(&self, id: &str) -> Option<&NamedObjects> {
        self.includes.get(id)
    }

    pub fn remove(&mut self, id: &str) -> Option<Value> {
        self.includes.remove(id);
        self.values.remove(id)
    }

    /// Identifiers bound directly in this registry.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn walk<'a>(&self, path: &'a str) -> Option<(&NamedObjects, &'a str)> {
        let mut segments: Vec<&str> = path.split('.').collect();
        let id = segments.pop()?;
        let registry = segments
            .into_iter()
            .try_fold(self, |registry, segment| registry.includes.get(segment))?;
        Some((registry, id))
    }
}

impl Dictionary for NamedObjects {
    fn get(&self, key: &str) -> Option<Value> {
        NamedObjects::get(self, key)
    }

    fn put(&mut self, key: &str, value: Value) -> Option<Value> {
        NamedObjects::put(self, key, value)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        NamedObjects::remove(self, key)
    }

    fn contains_key(&self, key: &str) -> bool {
        NamedObjects::contains_key(self, key)
    }

    fn keys(&self) -> Vec<String> {
        self.values.keys().cloned().collect()
    }
}
