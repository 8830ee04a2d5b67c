//! Dispatch of `wtkx:script` bodies to registered engines.

use std::rc::Rc;

use wtkx_traits::ScriptEngine;

#[derive(Debug, Default, Clone)]
pub struct ScriptEngines {
    engines: Vec<Rc<dyn ScriptEngine>>,
}

impl ScriptEngines {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later registrations shadow earlier ones for the same language.
    pub fn register(&mut self, engine: Rc<dyn ScriptEngine>) {
        log::debug!("Registered script engine '{}'", engine.language());
        self.engines.push(engine);
    }

    pub fn by_language(&self, language: &str) -> Option<&Rc<dyn ScriptEngine>> {
        self.engines
            .iter()
            .rev()
            .find(|e| e.language().eq_ignore_ascii_case(language))
    }

    pub fn by_extension(&self, extension: &str) -> Option<&Rc<dyn ScriptEngine>> {
        self.engines.iter().rev().find(|e| {
            e.extensions()
                .iter()
                .any(|ext| ext.eq_ignore_ascii_case(extension))
        })
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wtkx_traits::ScriptError;
    use wtkx_types::Dictionary;

    #[derive(Debug)]
    struct Echo(&'static str);

    impl ScriptEngine for Echo {
        fn language(&self) -> &str {
            self.0
        }

        fn extensions(&self) -> &[&str] {
            &["echo", "ec"]
        }

        fn eval(&self, _script: &str, _bindings: &mut dyn Dictionary) -> Result<(), ScriptError> {
            Ok(())
        }
    }

    #[test]
    fn test_lookup_by_language_and_extension() {
        let mut engines = ScriptEngines::new();
        assert!(engines.is_empty());
        engines.register(Rc::new(Echo("echo")));

        assert!(engines.by_language("ECHO").is_some());
        assert!(engines.by_language("python").is_none());
        assert!(engines.by_extension("ec").is_some());
        assert!(engines.by_extension("py").is_none());
    }

    #[test]
    fn test_later_registration_wins() {
        let mut engines = ScriptEngines::new();
        engines.register(Rc::new(Echo("echo")));
        engines.register(Rc::new(Echo("Echo")));
        assert_eq!(engines.by_language("echo").unwrap().language(), "Echo");
    }
}
