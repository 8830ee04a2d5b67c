//! Type resolution for typed-object tags and attached properties.
//!
//! A tag `<Button>` in namespace `demo.widgets` resolves to the factory
//! registered as `demo.widgets.Button`. Attached properties are registered
//! against an owner class and a property name.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use wtkx_types::{MarkupObject, ObjectRef, PropertyDescriptor, PropertyError, Value};

use crate::collections::{ListObject, MapObject};
use crate::error::SerializationError;

pub const BUILTIN_NAMESPACE: &str = "wtkx.collections";

pub type Factory = Rc<dyn Fn() -> Result<ObjectRef, String>>;
pub type AttachedGetter = Rc<dyn Fn(&ObjectRef) -> Value>;
pub type AttachedSetter = Rc<dyn Fn(&ObjectRef, Value) -> Result<(), PropertyError>>;

/// Accessor pair for a property owned by another type.
#[derive(Clone)]
pub struct AttachedProperty {
    pub descriptor: PropertyDescriptor,
    getter: AttachedGetter,
    setter: AttachedSetter,
}

impl AttachedProperty {
    pub fn get(&self, target: &ObjectRef) -> Value {
        (self.getter)(target)
    }

    pub fn set(&self, target: &ObjectRef, value: Value) -> Result<(), PropertyError> {
        (self.setter)(target, value)
    }
}

impl fmt::Debug for AttachedProperty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AttachedProperty")
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

#[derive(Clone, Default)]
pub struct TypeRegistry {
    factories: HashMap<String, Factory>,
    attached: HashMap<(String, String), AttachedProperty>,
}

impl fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        types.sort_unstable();
        f.debug_struct("TypeRegistry")
            .field("types", &types)
            .field("attached", &self.attached.len())
            .finish()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry pre-populated with the `wtkx.collections` types.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry
            .register::<MapObject>(&format!("{}.HashMap", BUILTIN_NAMESPACE))
            .register::<ListObject>(&format!("{}.ArrayList", BUILTIN_NAMESPACE));
        registry
    }

    /// Register a default-constructible type under its qualified name.
    pub fn register<T: MarkupObject + Default>(&mut self, qualified_name: &str) -> &mut Self {
        self.register_with(qualified_name, || Ok(ObjectRef::new(T::default())))
    }

    /// Register a custom factory. A factory returning `Err` marks the type
    /// as known but not instantiable.
    pub fn register_with<F>(&mut self, qualified_name: &str, factory: F) -> &mut Self
    where
        F: Fn() -> Result<ObjectRef, String> + 'static,
    {
        self.factories
            .insert(qualified_name.to_string(), Rc::new(factory));
        self
    }

    pub fn register_attached<G, S>(
        &mut self,
        class: &str,
        descriptor: PropertyDescriptor,
        getter: G,
        setter: S,
    ) -> &mut Self
    where
        G: Fn(&ObjectRef) -> Value + 'static,
        S: Fn(&ObjectRef, Value) -> Result<(), PropertyError> + 'static,
    {
        self.attached.insert(
            (class.to_string(), descriptor.name.to_string()),
            AttachedProperty {
                descriptor,
                getter: Rc::new(getter),
                setter: Rc::new(setter),
            },
        );
        self
    }

    pub fn contains(&self, qualified_name: &str) -> bool {
        self.factories.contains_key(qualified_name)
    }

    pub fn resolve(&self, namespace: &str, tag: &str) -> Option<&Factory> {
        self.factories.get(&qualified_name(namespace, tag))
    }

    pub fn instantiate(&self, namespace: &str, tag: &str) -> Result<ObjectRef, SerializationError> {
        let type_name = qualified_name(namespace, tag);
        let factory = self
            .factories
            .get(&type_name)
            .ok_or_else(|| SerializationError::UnknownType(type_name.clone()))?;
        factory()
            .map_err(|message| SerializationError::NotInstantiable { type_name, message })
    }

    pub fn attached(&self, class: &str, property: &str) -> Option<&AttachedProperty> {
        self.attached.get(&(class.to_string(), property.to_string()))
    }
}

pub fn qualified_name(namespace: &str, tag: &str) -> String {
    format!("{}.{}", namespace, tag)
}
