pub mod fixtures;

use std::rc::Rc;
use std::sync::Arc;
use wtkx::{
    InMemoryResourceProvider, JsonResourceBundleLoader, ObjectRef, Serializer, SerializerBuilder,
    Value,
};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Opening attributes shared by test documents.
pub const HEAD: &str = r#"xmlns="demo.ui" xmlns:wtkx="urn:wtkx""#;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn documents(files: &[(&str, &str)]) -> Arc<InMemoryResourceProvider> {
    let provider = InMemoryResourceProvider::new();
    for (path, text) in files {
        provider
            .add_str(*path, text)
            .expect("in-memory provider accepts documents");
    }
    Arc::new(provider)
}

/// Widget types, in-memory documents and JSON bundles read from the same files.
pub fn builder(files: &[(&str, &str)]) -> SerializerBuilder {
    init_logging();
    let provider = documents(files);
    Serializer::builder()
        .with_types(fixtures::widget_types())
        .with_documents(provider.clone())
        .with_bundle_loader(Rc::new(JsonResourceBundleLoader::new(provider)))
}

pub fn serializer(files: &[(&str, &str)]) -> Serializer {
    builder(files).build()
}

pub fn object(value: Option<Value>) -> ObjectRef {
    value
        .and_then(Value::into_object)
        .expect("value is an object")
}
