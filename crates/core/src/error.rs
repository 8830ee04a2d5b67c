//! Error types for reading documents and binding them to host objects.

use thiserror::Error;
use wtkx_traits::{ResourceError, ScriptError};
use wtkx_types::PropertyError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    pub line: usize,
    pub col: usize,
}

impl Location {
    /// Line and column of byte offset `pos` in `source`.
    pub fn from_offset(source: &str, pos: usize) -> Self {
        let mut pos = pos.min(source.len());
        while !source.is_char_boundary(pos) {
            pos -= 1;
        }
        let prefix = &source[..pos];
        let line = prefix.matches('\n').count() + 1;
        let col = prefix.rfind('\n').map_or(pos + 1, |nl| pos - nl);
        Location { line, col }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.col)
    }
}

impl From<(usize, usize)> for Location {
    fn from((line, col): (usize, usize)) -> Self {
        Location { line, col }
    }
}

#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("Quick-XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("Malformed escape sequence: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("UTF-8 string error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Document structure error at {location}: {message}")]
    Structure { message: String, location: Location },

    #[error("Unknown type '{0}'")]
    UnknownType(String),

    #[error("Type '{type_name}' cannot be instantiated: {message}")]
    NotInstantiable { type_name: String, message: String },

    #[error("Unknown attached property '{property}' on '{class}'")]
    UnknownAttachedProperty { class: String, property: String },

    #[error("Resource key '{0}' used but no resource bundle is bound")]
    MissingResources(String),

    #[error("Resource bundle '{0}' requested but no bundle loader is configured")]
    NoBundleLoader(String),

    #[error("URL '{0}' cannot be resolved without a document location")]
    NoBaseLocation(String),

    #[error("'{0}' is not a valid ID value")]
    UnknownId(String),

    #[error("'{id}' is not a listener: {found}")]
    NotAListener { id: String, found: String },

    #[error("No script engine for '{0}'")]
    NoScriptEngine(String),

    #[error("Circular include detected: {0}")]
    CyclicInclude(String),

    #[error("Include depth limit ({0}) exceeded")]
    IncludeDepth(usize),

    #[error("Include of '{src}' failed: {source}")]
    Include {
        src: String,
        #[source]
        source: Box<SerializationError>,
    },

    #[error("Property error: {0}")]
    Property(#[from] PropertyError),

    #[error("Resource error: {0}")]
    Resource(#[from] ResourceError),

    #[error("Script error: {0}")]
    Script(#[from] ScriptError),
}

impl SerializationError {
    pub fn structure(message: impl Into<String>, location: Location) -> Self {
        SerializationError::Structure {
            message: message.into(),
            location,
        }
    }

    /// The innermost error, looking through include wrappers.
    pub fn root_cause(&self) -> &SerializationError {
        match self {
            SerializationError::Include { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Errors raised while binding loaded documents into a host object.
#[derive(Error, Debug)]
pub enum BindError {
    #[error("Field '{class}.{field}' declares both load and bind metadata")]
    ConflictingBinding { class: String, field: String },

    #[error("Field '{class}.{field}' is not writable")]
    ImmutableField { class: String, field: String },

    #[error("Property '{property}' used by '{class}.{field}' has not been loaded")]
    UnloadedProperty {
        class: String,
        field: String,
        property: String,
    },

    #[error("Property '{property}' used by '{class}.{field}' is private to an ancestor")]
    InaccessibleProperty {
        class: String,
        field: String,
        property: String,
    },

    #[error("'{id}' is not a valid ID value in property '{property}'")]
    MissingId { property: String, id: String },

    #[error("Resource bundle '{base_name}' is not available: {source}")]
    MissingResources {
        base_name: String,
        #[source]
        source: ResourceError,
    },

    #[error("No resource bundle loader configured for '{0}'")]
    NoBundleLoader(String),

    #[error("Invalid locale '{locale}': {source}")]
    InvalidLocale {
        locale: String,
        #[source]
        source: PropertyError,
    },

    #[error("Failed to load '{document}' into '{class}.{field}': {source}")]
    Load {
        class: String,
        field: String,
        document: String,
        #[source]
        source: SerializationError,
    },

    #[error("Failed to assign '{class}.{field}': {source}")]
    Field {
        class: String,
        field: String,
        #[source]
        source: PropertyError,
    },
}
