//! # wtkx-core
//!
//! Reads WTKX markup into live object graphs.
//!
//! - **parser**: namespace-aware XML event driver
//! - **serializer**: the element stack machine that turns events into objects
//! - **resolve**: attribute value resolution (`@` URLs, `%` resources, `$` references)
//! - **named_objects**: the id registry of a document and its includes
//! - **types**: tag name to factory mapping, attached properties
//! - **include**: location resolution and the include cycle guard
//! - **script**: script engine lookup
//! - **bind**: runtime binding of loaded documents into host objects
//!
//! All I/O goes through the `ResourceProvider` and `ResourceBundleLoader`
//! traits, so the crate itself never touches the filesystem.

pub use wtkx_traits as traits;
pub use wtkx_types as values;

pub mod bind;
pub mod collections;
pub mod error;
pub mod include;
pub mod named_objects;
pub mod parser;
pub mod resolve;
pub mod script;
pub mod serializer;
pub mod types;

#[cfg(test)]
mod testing;

pub use bind::{Bindable, Binder, BindPoint, BindingClass, FieldBinding, LoadPoint, Visibility};
pub use collections::{ListObject, MapObject};
pub use error::{BindError, Location, SerializationError};
pub use include::{MAX_INCLUDE_DEPTH, resolve_uri};
pub use named_objects::NamedObjects;
pub use resolve::{ValueResolver, coerce};
pub use script::ScriptEngines;
pub use serializer::{Document, Serializer, SerializerBuilder};
pub use types::{AttachedProperty, BUILTIN_NAMESPACE, TypeRegistry};

pub use wtkx_traits::{
    InMemoryResourceBundle, InMemoryResourceProvider, ResourceBundle, ResourceBundleLoader,
    ResourceError, ResourceProvider, ScriptEngine, ScriptError,
};
pub use wtkx_types::{
    Bean, Dictionary, ListenerList, Locale, MarkupObject, ObjectRef, PropertyAccess,
    PropertyDescriptor, PropertyError, PropertyKind, Sequence, Value, ValueType,
};
