//! The script hook.
//!
//! A `<wtkx:script>` element hands its body to a [`ScriptEngine`] together
//! with the live named-object registry of the document being read. Whatever
//! the script stores in `bindings` becomes addressable from the rest of the
//! document through `$id` references.

use std::fmt::Debug;

use thiserror::Error;
use wtkx_types::Dictionary;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScriptError {
    #[error("Script evaluation failed: {0}")]
    Evaluation(String),

    #[error("Unsupported script construct: {0}")]
    Unsupported(String),
}

impl ScriptError {
    pub fn evaluation(msg: impl Into<String>) -> Self {
        Self::Evaluation(msg.into())
    }
}

pub trait ScriptEngine: Debug {
    /// Language name matched against the `language` attribute.
    fn language(&self) -> &str;

    /// File extensions (without the dot) this engine evaluates.
    fn extensions(&self) -> &[&str];

    fn eval(&self, script: &str, bindings: &mut dyn Dictionary) -> Result<(), ScriptError>;
}
