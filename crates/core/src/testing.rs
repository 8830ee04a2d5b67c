//! Fixture types shared by the unit tests of this crate.

use std::rc::Rc;
use std::sync::Arc;

use wtkx_traits::{InMemoryResourceProvider, ScriptEngine, ScriptError};
use wtkx_types::{
    Bean, Dictionary, ListenerList, MarkupObject, ObjectRef, PropertyDescriptor, PropertyError,
    Sequence, Value, ValueType,
};

use crate::serializer::{Serializer, SerializerBuilder};
use crate::types::TypeRegistry;

#[derive(Debug, Default)]
pub struct Style {
    pub color: Option<String>,
    pub size: i32,
}

const STYLE_SCHEMA: &[PropertyDescriptor] = &[
    PropertyDescriptor::writable("color", ValueType::String),
    PropertyDescriptor::writable("size", ValueType::Int),
];

impl Bean for Style {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        STYLE_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "color" => Some(self.color.clone().map(Value::String).unwrap_or_default()),
            "size" => Some(Value::Int(self.size)),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "color" => self.color = value.as_str().map(str::to_string),
            "size" => {
                self.size = value
                    .as_i32()
                    .ok_or_else(|| PropertyError::mismatch("size", "int", value.type_label()))?
            }
            other => return Err(PropertyError::unknown("Style", other)),
        }
        Ok(())
    }
}

impl MarkupObject for Style {
    fn type_name(&self) -> &str {
        "Style"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }
}

/// A bean with one property of every interesting kind.
#[derive(Debug)]
pub struct Foo {
    pub bar: Option<String>,
    pub count: Value,
    pub enabled: bool,
    pub icon: Option<String>,
    pub child: Value,
    pub style: ObjectRef,
    pub listeners: ObjectRef,
}

impl Default for Foo {
    fn default() -> Self {
        Self {
            bar: None,
            count: Value::Null,
            enabled: false,
            icon: None,
            child: Value::Null,
            style: ObjectRef::new(Style::default()),
            listeners: ObjectRef::new(ListenerList::new()),
        }
    }
}

const FOO_SCHEMA: &[PropertyDescriptor] = &[
    PropertyDescriptor::writable("bar", ValueType::String),
    PropertyDescriptor::writable("count", ValueType::Int),
    PropertyDescriptor::writable("enabled", ValueType::Boolean),
    PropertyDescriptor::writable("icon", ValueType::Url),
    PropertyDescriptor::writable("child", ValueType::Object),
    PropertyDescriptor::read_only("style"),
    PropertyDescriptor::listeners("listeners"),
];

impl Bean for Foo {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        FOO_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "bar" => Some(self.bar.clone().map(Value::String).unwrap_or_default()),
            "count" => Some(self.count.clone()),
            "enabled" => Some(Value::Boolean(self.enabled)),
            "icon" => Some(self.icon.clone().map(Value::Url).unwrap_or_default()),
            "child" => Some(self.child.clone()),
            "style" => Some(Value::Object(self.style.clone())),
            "listeners" => Some(Value::Object(self.listeners.clone())),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "bar" => self.bar = value.as_str().map(str::to_string),
            "count" => self.count = value,
            "enabled" => {
                self.enabled = value
                    .as_bool()
                    .ok_or_else(|| PropertyError::mismatch("enabled", "boolean", value.type_label()))?
            }
            "icon" => self.icon = value.as_str().map(str::to_string),
            "child" => self.child = value,
            "style" | "listeners" => return Err(PropertyError::read_only("Foo", name)),
            other => return Err(PropertyError::unknown("Foo", other)),
        }
        Ok(())
    }
}

impl MarkupObject for Foo {
    fn type_name(&self) -> &str {
        "Foo"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }
}

/// A titled container of child objects.
#[derive(Debug, Default)]
pub struct Panel {
    pub title: Option<String>,
    pub children: Vec<Value>,
}

const PANEL_SCHEMA: &[PropertyDescriptor] =
    &[PropertyDescriptor::writable("title", ValueType::String)];

impl Bean for Panel {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        PANEL_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "title" => Some(self.title.clone().map(Value::String).unwrap_or_default()),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "title" => self.title = value.as_str().map(str::to_string),
            other => return Err(PropertyError::unknown("Panel", other)),
        }
        Ok(())
    }
}

impl Sequence for Panel {
    fn add(&mut self, item: Value) -> Result<(), PropertyError> {
        self.children.push(item);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.children.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.children.len()
    }
}

impl MarkupObject for Panel {
    fn type_name(&self) -> &str {
        "Panel"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }

    fn as_sequence(&self) -> Option<&dyn Sequence> {
        Some(self)
    }

    fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        Some(self)
    }
}

/// A bean whose read-only composite is missing.
#[derive(Debug, Default)]
pub struct Hollow;

const HOLLOW_SCHEMA: &[PropertyDescriptor] = &[PropertyDescriptor::read_only("skin")];

impl Bean for Hollow {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        HOLLOW_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        (name == "skin").then_some(Value::Null)
    }

    fn set(&mut self, name: &str, _value: Value) -> Result<(), PropertyError> {
        Err(PropertyError::read_only("Hollow", name))
    }
}

impl MarkupObject for Hollow {
    fn type_name(&self) -> &str {
        "Hollow"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }
}

/// A listener with no properties.
#[derive(Debug, Default)]
pub struct Handler;

impl MarkupObject for Handler {
    fn type_name(&self) -> &str {
        "Handler"
    }
}

pub fn fixture_types() -> TypeRegistry {
    let mut types = TypeRegistry::with_builtins();
    types
        .register::<Foo>("demo.Foo")
        .register::<Panel>("demo.Panel")
        .register::<Hollow>("demo.Hollow")
        .register::<Handler>("demo.Handler");
    types
}

/// Script engine for the `test` language. Each line is `name=value`,
/// `name=$other` (copies a binding) or `fail`.
#[derive(Debug)]
pub struct LineScript;

impl ScriptEngine for LineScript {
    fn language(&self) -> &str {
        "test"
    }

    fn extensions(&self) -> &[&str] {
        &["tst"]
    }

    fn eval(&self, script: &str, bindings: &mut dyn Dictionary) -> Result<(), ScriptError> {
        for line in script.lines().map(str::trim).filter(|l| !l.is_empty()) {
            if line == "fail" {
                return Err(ScriptError::evaluation("asked to fail"));
            }
            let (name, value) = line
                .split_once('=')
                .ok_or_else(|| ScriptError::evaluation(format!("bad line '{}'", line)))?;
            let value = match value.strip_prefix('$') {
                Some(other) => bindings.get(other).unwrap_or_default(),
                None => Value::from(value),
            };
            bindings.put(name, value);
        }
        Ok(())
    }
}

pub fn provider(files: &[(&str, &str)]) -> Arc<InMemoryResourceProvider> {
    let provider = InMemoryResourceProvider::new();
    for (path, text) in files {
        provider
            .add_str(*path, text)
            .expect("in-memory provider accepts documents");
    }
    Arc::new(provider)
}

pub fn builder_with(files: &[(&str, &str)]) -> SerializerBuilder {
    let _ = env_logger::builder().is_test(true).try_init();
    Serializer::builder()
        .with_types(fixture_types())
        .with_documents(provider(files))
        .with_script_engine(Rc::new(LineScript))
}

pub fn serializer_with(files: &[(&str, &str)]) -> Serializer {
    builder_with(files).build()
}
