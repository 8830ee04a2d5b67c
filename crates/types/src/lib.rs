//! Foundation types for the WTKX markup engine.
//!
//! Markup documents describe graphs of objects whose concrete Rust types are
//! only known to the application. This crate defines the dynamic surface the
//! engine talks to instead of reflection:
//!
//! - [`Value`]: a resolved attribute or property value
//! - [`ObjectRef`]: a shared handle to a constructed object
//! - [`MarkupObject`]: the trait every constructible type implements
//! - [`PropertyAccess`], [`Bean`], [`Dictionary`]: the two ways an object
//!   exposes properties
//! - [`Sequence`], [`ListenerList`]: container capabilities
//! - [`Locale`]: the locale tag used to select resource bundles

pub mod error;
pub mod locale;
pub mod object;
pub mod property;
pub mod value;

pub use error::PropertyError;
pub use locale::Locale;
pub use object::{
    AsAny, Bean, Dictionary, ListenerList, MarkupObject, ObjectRef, PropertyAccess, Sequence,
};
pub use property::{PropertyDescriptor, PropertyKind, ValueType};
pub use value::Value;
