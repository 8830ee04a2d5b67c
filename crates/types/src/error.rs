use thiserror::Error;

/// Errors raised while reading or writing a property of a markup object.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    #[error("'{type_name}' has no property named '{property}'")]
    Unknown { type_name: String, property: String },

    #[error("Property '{property}' of '{type_name}' is read-only")]
    ReadOnly { type_name: String, property: String },

    #[error("Property '{property}' expects {expected}, got {found}")]
    TypeMismatch {
        property: String,
        expected: String,
        found: String,
    },

    #[error("Property '{0}' does not accept null")]
    Null(String),

    #[error("'{0}' does not support this operation")]
    Unsupported(String),
}

impl PropertyError {
    pub fn unknown(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::Unknown {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn read_only(type_name: impl Into<String>, property: impl Into<String>) -> Self {
        Self::ReadOnly {
            type_name: type_name.into(),
            property: property.into(),
        }
    }

    pub fn mismatch(
        property: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeMismatch {
            property: property.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }
}
