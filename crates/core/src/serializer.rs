//! The element stack machine.
//!
//! A [`Serializer`] holds the configuration shared by every document it
//! reads: the type registry, where documents come from, the resource bundle
//! in effect, the bundle loader and locale used by includes that name their
//! own resources, and the script engines. Each `read*` call builds a fresh
//! [`DocumentBuilder`] owning the per-document state (base location, named
//! objects, element stack), so one serializer can read any number of
//! documents.

use std::rc::Rc;
use std::sync::Arc;

use wtkx_traits::{
    InMemoryResourceProvider, ResourceBundle, ResourceBundleLoader, ResourceProvider, ScriptEngine,
};
use wtkx_types::{Locale, ObjectRef, PropertyAccess, PropertyError, PropertyKind, Value};

use crate::error::{Location, SerializationError};
use crate::include::{IncludeGuard, extension, resolve_uri};
use crate::named_objects::NamedObjects;
use crate::parser::{Attribute, MarkupBuilder, QualifiedName, parse_document};
use crate::resolve::{ValueResolver, coerce};
use crate::script::ScriptEngines;
use crate::types::{TypeRegistry, qualified_name};

/// Prefix of the control tags and attributes.
pub const WTKX_PREFIX: &str = "wtkx";
pub const ID_ATTRIBUTE: &str = "id";
pub const INCLUDE_TAG: &str = "include";
pub const INCLUDE_SRC_ATTRIBUTE: &str = "src";
pub const INCLUDE_RESOURCES_ATTRIBUTE: &str = "resources";
pub const SCRIPT_TAG: &str = "script";
pub const SCRIPT_SRC_ATTRIBUTE: &str = "src";
pub const SCRIPT_LANGUAGE_ATTRIBUTE: &str = "language";

#[derive(Debug)]
struct Environment {
    types: Rc<TypeRegistry>,
    documents: Arc<dyn ResourceProvider>,
    bundles: Option<Rc<dyn ResourceBundleLoader>>,
    scripts: ScriptEngines,
    locale: Option<Locale>,
}

/// Reads markup documents into object graphs.
#[derive(Debug, Clone)]
pub struct Serializer {
    env: Rc<Environment>,
    resources: Option<Rc<dyn ResourceBundle>>,
}

pub struct SerializerBuilder {
    types: Rc<TypeRegistry>,
    documents: Arc<dyn ResourceProvider>,
    resources: Option<Rc<dyn ResourceBundle>>,
    bundles: Option<Rc<dyn ResourceBundleLoader>>,
    scripts: ScriptEngines,
    locale: Option<Locale>,
}

impl Default for SerializerBuilder {
    fn default() -> Self {
        Self {
            types: Rc::new(TypeRegistry::with_builtins()),
            documents: Arc::new(InMemoryResourceProvider::new()),
            resources: None,
            bundles: None,
            scripts: ScriptEngines::new(),
            locale: None,
        }
    }
}

impl SerializerBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_types(mut self, types: TypeRegistry) -> Self {
        self.types = Rc::new(types);
        self
    }

    pub fn with_shared_types(mut self, types: Rc<TypeRegistry>) -> Self {
        self.types = types;
        self
    }

    /// Where documents, included documents and script files are loaded from.
    pub fn with_documents(mut self, documents: Arc<dyn ResourceProvider>) -> Self {
        self.documents = documents;
        self
    }

    /// The bundle `%key` attributes are resolved against.
    pub fn with_resources(mut self, resources: Rc<dyn ResourceBundle>) -> Self {
        self.resources = Some(resources);
        self
    }

    pub fn with_bundle_loader(mut self, loader: Rc<dyn ResourceBundleLoader>) -> Self {
        self.bundles = Some(loader);
        self
    }

    pub fn with_locale(mut self, locale: Locale) -> Self {
        self.locale = Some(locale);
        self
    }

    pub fn with_script_engine(mut self, engine: Rc<dyn ScriptEngine>) -> Self {
        self.scripts.register(engine);
        self
    }

    pub fn build(self) -> Serializer {
        Serializer {
            env: Rc::new(Environment {
                types: self.types,
                documents: self.documents,
                bundles: self.bundles,
                scripts: self.scripts,
                locale: self.locale,
            }),
            resources: self.resources,
        }
    }
}

impl Serializer {
    pub fn builder() -> SerializerBuilder {
        SerializerBuilder::new()
    }

    pub fn types(&self) -> &TypeRegistry {
        &self.env.types
    }

    pub fn resources(&self) -> Option<&Rc<dyn ResourceBundle>> {
        self.resources.as_ref()
    }

    pub fn locale(&self) -> Option<&Locale> {
        self.env.locale.as_ref()
    }

    pub fn documents(&self) -> &Arc<dyn ResourceProvider> {
        &self.env.documents
    }

    /// A serializer sharing this configuration but resolving `%key`
    /// attributes against `resources`.
    pub fn with_resources(&self, resources: Option<Rc<dyn ResourceBundle>>) -> Serializer {
        Serializer {
            env: Rc::clone(&self.env),
            resources,
        }
    }

    /// Load a bundle through the configured loader, using `locale` or the
    /// configured default.
    pub fn load_bundle(
        &self,
        base_name: &str,
        locale: Option<&Locale>,
    ) -> Result<Rc<dyn ResourceBundle>, SerializationError> {
        let loader = self
            .env
            .bundles
            .as_ref()
            .ok_or_else(|| SerializationError::NoBundleLoader(base_name.to_string()))?;
        Ok(loader.load(base_name, locale.or(self.env.locale.as_ref()))?)
    }

    pub(crate) fn bundle_loader(&self) -> Option<&Rc<dyn ResourceBundleLoader>> {
        self.env.bundles.as_ref()
    }

    /// Read the document at `location`. Relative URLs and includes in the
    /// document resolve against it.
    pub fn read(&self, location: &str) -> Result<Document, SerializationError> {
        let mut guard = IncludeGuard::default();
        self.read_nested(location, &mut guard)
    }

    /// Read a document that has no location. `@` URLs fail; includes are
    /// resolved from the root of the document provider.
    pub fn read_str(&self, source: &str) -> Result<Document, SerializationError> {
        self.read_bytes(source.as_bytes(), None)
    }

    pub fn read_bytes(
        &self,
        bytes: &[u8],
        location: Option<&str>,
    ) -> Result<Document, SerializationError> {
        let mut guard = IncludeGuard::default();
        guard.enter(location)?;
        let result = self.parse(bytes, location, &mut guard);
        guard.leave(location);
        result
    }

    pub(crate) fn read_nested(
        &self,
        location: &str,
        guard: &mut IncludeGuard,
    ) -> Result<Document, SerializationError> {
        guard.enter(Some(location))?;
        let result = self
            .env
            .documents
            .load(location)
            .map_err(SerializationError::from)
            .and_then(|bytes| self.parse(&bytes, Some(location), guard));
        guard.leave(Some(location));
        result
    }

    fn parse(
        &self,
        bytes: &[u8],
        location: Option<&str>,
        guard: &mut IncludeGuard,
    ) -> Result<Document, SerializationError> {
        let source = std::str::from_utf8(bytes)?;
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        log::debug!("Reading document {}", location.unwrap_or("<memory>"));

        let mut builder = DocumentBuilder::new(self, guard, location);
        parse_document(source, &mut builder)?;
        builder.finish(Location::from_offset(source, source.len()))
    }
}

/// The result of reading one document.
#[derive(Debug)]
pub struct Document {
    root: Value,
    named_objects: NamedObjects,
    location: Option<String>,
}

impl Document {
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// Look up a named object by id or dotted include path.
    pub fn get(&self, path: &str) -> Option<Value> {
        self.named_objects.get(path)
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.named_objects.contains_key(path)
    }

    pub fn named_objects(&self) -> &NamedObjects {
        &self.named_objects
    }

    pub fn location(&self) -> Option<&str> {
        self.location.as_deref()
    }

    pub fn into_parts(self) -> (Value, NamedObjects, Option<String>) {
        (self.root, self.named_objects, self.location)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ElementKind {
    Instance,
    Include,
    Script,
    ReadOnlyProperty,
    WritableProperty,
}

#[derive(Debug)]
struct InlineScript {
    language: String,
    body: String,
}

#[derive(Debug)]
struct Element {
    kind: ElementKind,
    name: QualifiedName,
    id: Option<String>,
    attributes: Vec<Attribute>,
    value: Value,
    include_registry: Option<NamedObjects>,
    script: Option<InlineScript>,
    location: Location,
}

impl Element {
    fn new(kind: ElementKind, name: QualifiedName, value: Value, location: Location) -> Self {
        Self {
            kind,
            name,
            id: None,
            attributes: Vec::new(),
            value,
            include_registry: None,
            script: None,
            location,
        }
    }

    fn with_attributes(mut self, id: Option<String>, attributes: Vec<Attribute>) -> Self {
        self.id = id;
        self.attributes = attributes;
        self
    }

    fn is_object_holder(&self) -> bool {
        matches!(
            self.kind,
            ElementKind::Instance | ElementKind::Include | ElementKind::ReadOnlyProperty
        )
    }
}

/// Per-document state of one read.
struct DocumentBuilder<'a> {
    serializer: &'a Serializer,
    guard: &'a mut IncludeGuard,
    location: Option<&'a str>,
    named_objects: NamedObjects,
    stack: Vec<Element>,
    root: Option<Value>,
}

impl<'a> DocumentBuilder<'a> {
    fn new(serializer: &'a Serializer, guard: &'a mut IncludeGuard, location: Option<&'a str>) -> Self {
        Self {
            serializer,
            guard,
            location,
            named_objects: NamedObjects::new(),
            stack: Vec::new(),
            root: None,
        }
    }

    fn finish(self, end: Location) -> Result<Document, SerializationError> {
        if let Some(open) = self.stack.last() {
            return Err(SerializationError::structure(
                format!("Unexpected end of document inside <{}>", open.name),
                end,
            ));
        }
        let root = self
            .root
            .ok_or_else(|| SerializationError::structure("Document has no root element", end))?;
        log::info!(
            "Read {} with {} named object(s)",
            self.location.unwrap_or("<memory>"),
            self.named_objects.len()
        );
        Ok(Document {
            root,
            named_objects: self.named_objects,
            location: self.location.map(str::to_string),
        })
    }

    fn resolver(&self) -> ValueResolver<'_> {
        ValueResolver::new(&self.named_objects)
            .with_location(self.location)
            .with_resources(self.serializer.resources.as_deref())
    }

    /// Split `wtkx:id` off the attribute list.
    fn take_id(
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(Option<String>, Vec<Attribute>), SerializationError> {
        let mut id = None;
        let mut rest = Vec::with_capacity(attributes.len());
        for attribute in attributes {
            if !attribute.name.has_prefix(WTKX_PREFIX) {
                rest.push(attribute);
            } else if attribute.name.local == ID_ATTRIBUTE {
                id = Some(attribute.value);
            } else {
                return Err(SerializationError::structure(
                    format!("Unknown control attribute '{}'", attribute.name),
                    location,
                ));
            }
        }
        Ok((id, rest))
    }

    fn start_instance(
        &mut self,
        name: QualifiedName,
        id: Option<String>,
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(), SerializationError> {
        let namespace = name.namespace.as_deref().ok_or_else(|| {
            SerializationError::structure(
                format!("Typed element <{}> has no namespace", name),
                location,
            )
        })?;
        let object = self.serializer.types().instantiate(namespace, &name.local)?;
        log::debug!("Instantiated {}.{}", namespace, name.local);

        self.stack.push(
            Element::new(ElementKind::Instance, name, Value::Object(object), location)
                .with_attributes(id, attributes),
        );
        Ok(())
    }

    fn start_property(
        &mut self,
        name: QualifiedName,
        id: Option<String>,
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(), SerializationError> {
        let object = match self.stack.last() {
            Some(parent) if parent.is_object_holder() => parent.value.as_object().cloned(),
            _ => None,
        }
        .ok_or_else(|| {
            SerializationError::structure(
                format!("Property element <{}> must be nested in an object element", name),
                location,
            )
        })?;

        let existing = {
            let mut target = object.borrow_mut();
            let found = match PropertyAccess::of(&mut *target) {
                Some(access) => match access.descriptor(&name.local) {
                    Some(d)
                        if matches!(
                            d.kind,
                            PropertyKind::ReadOnlyComposite | PropertyKind::ListenerList
                        ) =>
                    {
                        Some(access.get(&name.local).unwrap_or_default())
                    }
                    _ => None,
                },
                None => None,
            };
            found
        };

        match existing {
            Some(Value::Object(composite)) => {
                log::trace!("Entering read-only property <{}>", name);
                self.stack.push(
                    Element::new(
                        ElementKind::ReadOnlyProperty,
                        name,
                        Value::Object(composite),
                        location,
                    )
                    .with_attributes(id, attributes),
                );
                Ok(())
            }
            Some(_) => Err(SerializationError::structure(
                format!(
                    "Read-only property '{}' of '{}' is null",
                    name.local,
                    object.type_name()
                ),
                location,
            )),
            None if id.is_some() || !attributes.is_empty() => Err(SerializationError::structure(
                format!("Writable property element <{}> cannot have attributes", name),
                location,
            )),
            None => {
                self.stack.push(Element::new(
                    ElementKind::WritableProperty,
                    name,
                    Value::Null,
                    location,
                ));
                Ok(())
            }
        }
    }

    fn start_include(
        &mut self,
        name: QualifiedName,
        id: Option<String>,
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(), SerializationError> {
        let mut src = None;
        let mut resources = None;
        let mut passthrough = Vec::new();
        for attribute in attributes {
            if attribute.name.prefix.is_none() {
                match attribute.name.local.as_str() {
                    INCLUDE_SRC_ATTRIBUTE => {
                        src = Some(attribute.value);
                        continue;
                    }
                    INCLUDE_RESOURCES_ATTRIBUTE => {
                        resources = Some(attribute.value);
                        continue;
                    }
                    _ => {}
                }
            }
            passthrough.push(attribute);
        }

        let src = src.ok_or_else(|| {
            SerializationError::structure(
                format!("<{}> requires a '{}' attribute", name, INCLUDE_SRC_ATTRIBUTE),
                location,
            )
        })?;
        let path = resolve_uri(&src, self.location);

        let serializer = match resources {
            Some(base_name) => {
                let bundle = self.serializer.load_bundle(&base_name, None)?;
                self.serializer.with_resources(Some(bundle))
            }
            None => self.serializer.clone(),
        };

        log::debug!("Including '{}'", path);
        let document = serializer
            .read_nested(&path, self.guard)
            .map_err(|e| match e {
                e @ (SerializationError::CyclicInclude(_) | SerializationError::IncludeDepth(_)) => e,
                other => SerializationError::Include {
                    src: path.clone(),
                    source: Box::new(other),
                },
            })?;
        let (root, registry, _) = document.into_parts();

        let mut element =
            Element::new(ElementKind::Include, name, root, location).with_attributes(id, passthrough);
        element.include_registry = Some(registry);
        self.stack.push(element);
        Ok(())
    }

    fn start_script(
        &mut self,
        name: QualifiedName,
        id: Option<String>,
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(), SerializationError> {
        if id.is_some() {
            return Err(SerializationError::structure(
                format!("<{}> cannot declare an id", name),
                location,
            ));
        }

        let mut src = None;
        let mut language = None;
        for attribute in attributes {
            match (attribute.name.prefix.is_none(), attribute.name.local.as_str()) {
                (true, SCRIPT_SRC_ATTRIBUTE) => src = Some(attribute.value),
                (true, SCRIPT_LANGUAGE_ATTRIBUTE) => language = Some(attribute.value),
                _ => {
                    return Err(SerializationError::structure(
                        format!("Unknown attribute '{}' on <{}>", attribute.name, name),
                        location,
                    ));
                }
            }
        }

        let mut element = Element::new(ElementKind::Script, name, Value::Null, location);
        match src {
            Some(src) => {
                let path = resolve_uri(&src, self.location);
                let key = match language {
                    Some(language) => language,
                    None => extension(&path)
                        .map(str::to_string)
                        .ok_or_else(|| SerializationError::NoScriptEngine(path.clone()))?,
                };
                let bytes = self.serializer.documents().load(&path)?;
                let body = std::str::from_utf8(&bytes)?;
                log::debug!("Evaluating script '{}'", path);
                self.eval(&key, body)?;
            }
            None => {
                let language = language.ok_or_else(|| {
                    SerializationError::structure(
                        format!(
                            "Inline <{}> requires a '{}' attribute",
                            element.name, SCRIPT_LANGUAGE_ATTRIBUTE
                        ),
                        location,
                    )
                })?;
                element.script = Some(InlineScript {
                    language,
                    body: String::new(),
                });
            }
        }
        self.stack.push(element);
        Ok(())
    }

    /// Evaluate `body` with the engine registered for `key`, a language name
    /// or a file extension.
    fn eval(&mut self, key: &str, body: &str) -> Result<(), SerializationError> {
        let serializer = self.serializer;
        let scripts = &serializer.env.scripts;
        let engine = scripts
            .by_language(key)
            .or_else(|| scripts.by_extension(key))
            .ok_or_else(|| SerializationError::NoScriptEngine(key.to_string()))?;
        engine.eval(body, &mut self.named_objects)?;
        Ok(())
    }

    fn close_object(&mut self, mut element: Element) -> Result<Value, SerializationError> {
        self.apply_attributes(&element)?;

        if let Some(id) = element.id.take() {
            log::trace!("Binding id '{}'", id);
            match element.include_registry.take() {
                Some(registry) => {
                    self.named_objects
                        .bind_include(id, element.value.clone(), registry)
                }
                None => {
                    self.named_objects.put(id, element.value.clone());
                }
            }
        }

        if element.kind != ElementKind::ReadOnlyProperty {
            self.attach_to_parent(&element.value, element.location)?;
        }
        Ok(element.value)
    }

    fn attach_to_parent(&mut self, value: &Value, location: Location) -> Result<(), SerializationError> {
        let Some(parent) = self.stack.last_mut() else {
            return Ok(());
        };

        match parent.kind {
            ElementKind::WritableProperty => {
                parent.value = value.clone();
                Ok(())
            }
            ElementKind::Script => Err(SerializationError::structure(
                "Objects cannot be nested in a script element",
                location,
            )),
            _ => {
                let Some(target) = parent.value.as_object() else {
                    return Err(SerializationError::structure(
                        format!("<{}> has no object to add children to", parent.name),
                        location,
                    ));
                };
                let mut target = target.borrow_mut();
                if let Some(sequence) = target.as_sequence_mut() {
                    sequence.add(value.clone())?;
                    return Ok(());
                }
                if let Some(listeners) = target.as_listener_list_mut() {
                    let listener = value.as_object().cloned().ok_or_else(|| {
                        SerializationError::NotAListener {
                            id: parent.name.to_string(),
                            found: value.type_label(),
                        }
                    })?;
                    listeners.add(listener);
                    return Ok(());
                }
                Err(SerializationError::structure(
                    format!("'{}' cannot contain child objects", target.type_name()),
                    location,
                ))
            }
        }
    }

    fn close_property(&mut self, element: Element) -> Result<(), SerializationError> {
        let object = self
            .stack
            .last()
            .and_then(|parent| parent.value.as_object().cloned())
            .ok_or_else(|| {
                SerializationError::structure(
                    format!("Property element <{}> has no enclosing object", element.name),
                    element.location,
                )
            })?;

        let name = element.name.local.as_str();
        let mut target = object.borrow_mut();
        let type_name = target.type_name().to_string();
        let mut access = PropertyAccess::of(&mut *target)
            .ok_or_else(|| PropertyError::Unsupported(type_name.clone()))?;

        let descriptor = access.descriptor(name);
        if let Some(d) = descriptor
            && d.kind != PropertyKind::Writable
        {
            return Err(PropertyError::read_only(type_name, name).into());
        }

        let value = match (element.value, descriptor) {
            (Value::String(text), Some(d)) => coerce(&text, d.value_type),
            (value, _) => value,
        };
        log::trace!("{}.{} = {}", type_name, name, value);
        access.put(name, value)?;
        Ok(())
    }

    fn apply_attributes(&self, element: &Element) -> Result<(), SerializationError> {
        if element.attributes.is_empty() {
            return Ok(());
        }
        let object = element.value.as_object().ok_or_else(|| {
            SerializationError::structure(
                format!("Attributes of <{}> cannot be applied to a null value", element.name),
                element.location,
            )
        })?;

        for attribute in &element.attributes {
            if attribute.name.local.starts_with(char::is_uppercase) {
                self.apply_attached(object, element, attribute)?;
            } else {
                self.apply_property(object, attribute)?;
            }
        }
        Ok(())
    }

    fn apply_attached(
        &self,
        object: &ObjectRef,
        element: &Element,
        attribute: &Attribute,
    ) -> Result<(), SerializationError> {
        let (owner, property) = attribute.name.local.rsplit_once('.').ok_or_else(|| {
            SerializationError::structure(
                format!(
                    "Attached property '{}' must be written as Owner.property",
                    attribute.name
                ),
                element.location,
            )
        })?;
        let namespace = attribute
            .name
            .namespace
            .as_deref()
            .or(element.name.namespace.as_deref())
            .ok_or_else(|| {
                SerializationError::structure(
                    format!("Attached property '{}' has no namespace", attribute.name),
                    element.location,
                )
            })?;

        let class = qualified_name(namespace, owner);
        let attached = self
            .serializer
            .types()
            .attached(&class, property)
            .ok_or_else(|| SerializationError::UnknownAttachedProperty {
                class: class.clone(),
                property: property.to_string(),
            })?;

        let value = self
            .resolver()
            .resolve(&attribute.value, Some(attached.descriptor.value_type))?;
        log::trace!("{}.{} = {} on {}", class, property, value, object.type_name());
        attached.set(object, value)?;
        Ok(())
    }

    fn apply_property(&self, object: &ObjectRef, attribute: &Attribute) -> Result<(), SerializationError> {
        let name = attribute.name.local.as_str();
        let descriptor = {
            let mut target = object.borrow_mut();
            let type_name = target.type_name().to_string();
            let access = PropertyAccess::of(&mut *target)
                .ok_or(PropertyError::Unsupported(type_name))?;
            access.descriptor(name)
        };

        match descriptor.map(|d| d.kind) {
            Some(PropertyKind::ListenerList) => self.add_listeners(object, name, &attribute.value),
            Some(PropertyKind::ReadOnlyComposite) => {
                Err(PropertyError::read_only(object.type_name(), name).into())
            }
            _ => {
                let value = self
                    .resolver()
                    .resolve(&attribute.value, descriptor.map(|d| d.value_type))?;
                let mut target = object.borrow_mut();
                let type_name = target.type_name().to_string();
                log::trace!("{}.{} = {}", type_name, name, value);
                let mut access = PropertyAccess::of(&mut *target)
                    .ok_or(PropertyError::Unsupported(type_name))?;
                access.put(name, value)?;
                Ok(())
            }
        }
    }

    fn add_listeners(&self, object: &ObjectRef, property: &str, raw: &str) -> Result<(), SerializationError> {
        let list = {
            let mut target = object.borrow_mut();
            PropertyAccess::of(&mut *target).and_then(|access| access.get(property))
        }
        .and_then(Value::into_object)
        .ok_or_else(|| PropertyError::Null(property.to_string()))?;

        let list_type = list.type_name();
        for id in raw.split(',').map(str::trim).filter(|id| !id.is_empty()) {
            let listener = match self.named_objects.get(id) {
                Some(Value::Object(listener)) => listener,
                Some(other) => {
                    return Err(SerializationError::NotAListener {
                        id: id.to_string(),
                        found: other.type_label(),
                    });
                }
                None => return Err(SerializationError::UnknownId(id.to_string())),
            };
            let mut target = list.borrow_mut();
            let listeners = target
                .as_listener_list_mut()
                .ok_or_else(|| PropertyError::mismatch(property, "listener list", list_type.clone()))?;
            listeners.add(listener);
        }
        Ok(())
    }
}

impl MarkupBuilder for DocumentBuilder<'_> {
    fn start_element(
        &mut self,
        name: QualifiedName,
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(), SerializationError> {
        let (id, attributes) = Self::take_id(attributes, location)?;

        if name.has_prefix(WTKX_PREFIX) {
            return match name.local.as_str() {
                INCLUDE_TAG => self.start_include(name, id, attributes, location),
                SCRIPT_TAG => self.start_script(name, id, attributes, location),
                _ => Err(SerializationError::structure(
                    format!("Unknown control tag <{}>", name),
                    location,
                )),
            };
        }

        if name.local.starts_with(char::is_uppercase) {
            self.start_instance(name, id, attributes, location)
        } else {
            self.start_property(name, id, attributes, location)
        }
    }

    fn end_element(&mut self, location: Location) -> Result<(), SerializationError> {
        let mut element = self
            .stack
            .pop()
            .ok_or_else(|| SerializationError::structure("Unbalanced end tag", location))?;

        let kind = element.kind;
        let value = match kind {
            ElementKind::WritableProperty => {
                return self.close_property(element);
            }
            ElementKind::Script => {
                if let Some(script) = element.script.take() {
                    log::debug!("Evaluating inline {} script", script.language);
                    self.eval(&script.language, &script.body)?;
                }
                Value::Null
            }
            ElementKind::Instance | ElementKind::Include | ElementKind::ReadOnlyProperty => {
                self.close_object(element)?
            }
        };

        if self.stack.is_empty() {
            self.root = Some(value);
        }
        Ok(())
    }

    fn text(&mut self, text: &str, _location: Location) -> Result<(), SerializationError> {
        let Some(element) = self.stack.last_mut() else {
            return Ok(());
        };

        if element.kind == ElementKind::Script {
            if let Some(script) = element.script.as_mut() {
                script.body.push_str(text);
            }
            return Ok(());
        }
        if text.trim().is_empty() {
            return Ok(());
        }

        match element.kind {
            ElementKind::WritableProperty => {
                element.value = Value::String(text.to_string());
            }
            ElementKind::Instance => {
                if let Some(object) = element.value.as_object() {
                    let mut target = object.borrow_mut();
                    if let Some(sequence) = target.as_sequence_mut() {
                        sequence.add(Value::String(text.to_string()))?;
                    } else {
                        log::trace!("Ignoring text inside <{}>", element.name);
                    }
                }
            }
            _ => log::trace!("Ignoring text inside <{}>", element.name),
        }
        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.root.is_some()
    }
}
