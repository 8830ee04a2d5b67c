//! Static property metadata.
//!
//! A type describes its properties once, as a `&'static [PropertyDescriptor]`
//! table, so the engine never has to rediscover how a property behaves while
//! applying attributes.

use std::fmt;

/// How the engine treats a property when it appears in markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Assigned through `Bean::set`.
    Writable,
    /// Pre-existing object owned by the parent; markup mutates it in place.
    ReadOnlyComposite,
    /// A `ListenerList` receiving objects looked up by id.
    ListenerList,
    /// Set through an external owner type, keyed by the target object.
    Attached,
}

/// The declared type of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    Boolean,
    Char,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    String,
    Url,
    Object,
    /// Untyped; the raw string or a sigil resolution is passed through.
    Any,
}

impl ValueType {
    /// True for the kinds that get a type-specific parse instead of sigil resolution.
    pub fn is_primitive(self) -> bool {
        matches!(
            self,
            ValueType::Boolean
                | ValueType::Char
                | ValueType::Byte
                | ValueType::Short
                | ValueType::Int
                | ValueType::Long
                | ValueType::Float
                | ValueType::Double
        )
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Boolean => "boolean",
            ValueType::Char => "char",
            ValueType::Byte => "byte",
            ValueType::Short => "short",
            ValueType::Int => "int",
            ValueType::Long => "long",
            ValueType::Float => "float",
            ValueType::Double => "double",
            ValueType::String => "string",
            ValueType::Url => "url",
            ValueType::Object => "object",
            ValueType::Any => "any",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub kind: PropertyKind,
    pub value_type: ValueType,
}

impl PropertyDescriptor {
    pub const fn writable(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            kind: PropertyKind::Writable,
            value_type,
        }
    }

    pub const fn read_only(name: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::ReadOnlyComposite,
            value_type: ValueType::Object,
        }
    }

    pub const fn listeners(name: &'static str) -> Self {
        Self {
            name,
            kind: PropertyKind::ListenerList,
            value_type: ValueType::Object,
        }
    }

    pub const fn attached(name: &'static str, value_type: ValueType) -> Self {
        Self {
            name,
            kind: PropertyKind::Attached,
            value_type,
        }
    }
}
