//! Builtin container types registered under `wtkx.collections`.

use indexmap::IndexMap;
use wtkx_types::{Dictionary, MarkupObject, PropertyError, Sequence, Value};

/// An insertion-ordered string map. Every attribute and property element
/// becomes an entry.
#[derive(Debug, Default)]
pub struct MapObject {
    entries: IndexMap<String, Value>,
}

impl MapObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Dictionary for MapObject {
    fn get(&self, key: &str) -> Option<Value> {
        self.entries.get(key).cloned()
    }

    fn put(&mut self, key: &str, value: Value) -> Option<Value> {
        self.entries.insert(key.to_string(), value)
    }

    fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }
}

impl MarkupObject for MapObject {
    fn type_name(&self) -> &str {
        "HashMap"
    }

    fn as_dictionary(&self) -> Option<&dyn Dictionary> {
        Some(self)
    }

    fn as_dictionary_mut(&mut self) -> Option<&mut dyn Dictionary> {
        Some(self)
    }
}

/// An ordered list collecting nested objects and text runs.
#[derive(Debug, Default)]
pub struct ListObject {
    items: Vec<Value>,
}

impl ListObject {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }
}

impl Sequence for ListObject {
    fn add(&mut self, item: Value) -> Result<(), PropertyError> {
        self.items.push(item);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.items.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.items.len()
    }
}

impl MarkupObject for ListObject {
    fn type_name(&self) -> &str {
        "ArrayList"
    }

    fn as_sequence(&self) -> Option<&dyn Sequence> {
        Some(self)
    }

    fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        Some(self)
    }
}
