//! Attribute value resolution.
//!
//! A raw attribute string is either coerced to a primitive, when the target
//! property declares one, or checked for a leading sigil:
//!
//! | Prefix | Meaning                                     |
//! |--------|---------------------------------------------|
//! | `@`    | URL relative to the current document        |
//! | `%`    | key in the active resource bundle           |
//! | `$`    | id (or dotted path) in the named objects    |
//!
//! Doubling the sigil escapes it: `@@home` is the literal string `@home`.

use wtkx_traits::ResourceBundle;
use wtkx_types::{Value, ValueType};

use crate::error::SerializationError;
use crate::include::resolve_uri;
use crate::named_objects::NamedObjects;

pub const URL_PREFIX: char = '@';
pub const RESOURCE_KEY_PREFIX: char = '%';
pub const OBJECT_REFERENCE_PREFIX: char = '$';

fn is_sigil(c: char) -> bool {
    matches!(c, URL_PREFIX | RESOURCE_KEY_PREFIX | OBJECT_REFERENCE_PREFIX)
}

/// Resolves raw attribute strings in the context of one document.
#[derive(Debug, Clone, Copy)]
pub struct ValueResolver<'a> {
    location: Option<&'a str>,
    resources: Option<&'a dyn ResourceBundle>,
    named_objects: &'a NamedObjects,
}

impl<'a> ValueResolver<'a> {
    pub fn new(named_objects: &'a NamedObjects) -> Self {
        Self {
            location: None,
            resources: None,
            named_objects,
        }
    }

    pub fn with_location(mut self, location: Option<&'a str>) -> Self {
        self.location = location;
        self
    }

    pub fn with_resources(mut self, resources: Option<&'a dyn ResourceBundle>) -> Self {
        self.resources = resources;
        self
    }

    /// Resolve `raw` for a property of type `target`.
    ///
    /// Primitive targets are coerced and never see sigils; a value that
    /// fails to coerce is passed through as a string. Untyped and object
    /// targets go through sigil dispatch.
    pub fn resolve(&self, raw: &str, target: Option<ValueType>) -> Result<Value, SerializationError> {
        match target {
            Some(t) if t.is_primitive() => Ok(coerce(raw, t)),
            _ => self.resolve_reference(raw),
        }
    }

    fn resolve_reference(&self, raw: &str) -> Result<Value, SerializationError> {
        let Some(sigil) = raw.chars().next().filter(|c| is_sigil(*c)) else {
            return Ok(Value::String(raw.to_string()));
        };
        let rest = &raw[sigil.len_utf8()..];
        if rest.is_empty() {
            return Ok(Value::String(raw.to_string()));
        }
        if rest.starts_with(sigil) {
            return Ok(Value::String(rest.to_string()));
        }

        match sigil {
            URL_PREFIX => {
                let location = self
                    .location
                    .ok_or_else(|| SerializationError::NoBaseLocation(raw.to_string()))?;
                Ok(Value::Url(resolve_uri(rest, Some(location))))
            }
            RESOURCE_KEY_PREFIX => {
                let resources = self
                    .resources
                    .ok_or_else(|| SerializationError::MissingResources(rest.to_string()))?;
                Ok(resources.get(rest).unwrap_or_else(|| {
                    log::warn!(
                        "Resource key '{}' not found in bundle '{}'",
                        rest,
                        resources.base_name()
                    );
                    Value::Null
                }))
            }
            _ => Ok(self.named_objects.get(rest).unwrap_or_else(|| {
                log::debug!("Reference '${}' is not bound", rest);
                Value::Null
            })),
        }
    }
}

/// Convert `raw` to a primitive of type `target`.
///
/// Booleans accept `true`/`false` in any case, chars accept exactly one
/// character, numbers are parsed after trimming. Anything else, including
/// non-primitive targets, yields the raw string with a doubled leading sigil
/// collapsed.
pub fn coerce(raw: &str, target: ValueType) -> Value {
    let trimmed = raw.trim();
    let parsed = match target {
        ValueType::Boolean => {
            if trimmed.eq_ignore_ascii_case("true") {
                Some(Value::Boolean(true))
            } else if trimmed.eq_ignore_ascii_case("false") {
                Some(Value::Boolean(false))
            } else {
                None
            }
        }
        ValueType::Char => {
            let mut chars = raw.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Some(Value::Char(c)),
                _ => None,
            }
        }
        ValueType::Byte => trimmed.parse().ok().map(Value::Byte),
        ValueType::Short => trimmed.parse().ok().map(Value::Short),
        ValueType::Int => trimmed.parse().ok().map(Value::Int),
        ValueType::Long => trimmed.parse().ok().map(Value::Long),
        ValueType::Float => trimmed.parse().ok().map(Value::Float),
        ValueType::Double => trimmed.parse().ok().map(Value::Double),
        _ => None,
    };

    parsed.unwrap_or_else(|| {
        if target.is_primitive() {
            log::debug!("'{}' is not a valid {}; passing it through as a string", raw, target);
        }
        Value::String(unescape_sigil(raw).to_string())
    })
}

fn unescape_sigil(raw: &str) -> &str {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) if a == b && is_sigil(a) => &raw[a.len_utf8()..],
        _ => raw,
    }
}
