//! Runtime data binding.
//!
//! A host type describes, per field, either a *load* (read this document
//! and store its root in the field) or a *bind* (pull a named object out of
//! a document loaded into another field). [`Binder::bind`] walks the host's
//! classes from the topmost ancestor down, so a derived class can bind
//! objects out of documents its ancestors loaded.
//!
//! Binding is not transactional. When a field fails, every field assigned
//! before it keeps its value.

use std::collections::HashMap;
use std::rc::Rc;

use wtkx_traits::ResourceBundle;
use wtkx_types::{Locale, PropertyError, Value};

use crate::error::BindError;
use crate::include::resolve_uri;
use crate::named_objects::NamedObjects;
use crate::serializer::Serializer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    /// Only the declaring class may bind out of this field's document.
    Private,
    /// Subclasses may bind out of this field's document.
    #[default]
    Protected,
    Public,
}

/// "Read this document into the field."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadPoint {
    /// Document name, relative to the declaring class's package directory.
    pub document: String,
    /// Resource bundle base name. Defaults to the declaring class name.
    pub resources: Option<String>,
    /// Locale tag such as `fr_CA`; defaults to the serializer's locale.
    pub locale: Option<String>,
}

/// "Assign the object named `id` from the document loaded into `property`."
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindPoint {
    pub property: String,
    /// Defaults to the field name.
    pub id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldBinding {
    pub name: String,
    pub visibility: Visibility,
    pub writable: bool,
    pub load: Option<LoadPoint>,
    pub bind: Option<BindPoint>,
}

impl FieldBinding {
    fn plain(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::default(),
            writable: true,
            load: None,
            bind: None,
        }
    }

    pub fn load(name: impl Into<String>, document: impl Into<String>) -> Self {
        let mut field = Self::plain(name);
        field.load = Some(LoadPoint {
            document: document.into(),
            resources: None,
            locale: None,
        });
        field
    }

    pub fn bind(name: impl Into<String>, property: impl Into<String>) -> Self {
        let mut field = Self::plain(name);
        field.bind = Some(BindPoint {
            property: property.into(),
            id: None,
        });
        field
    }

    /// Explicit id for a bind field.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        if let Some(bind) = self.bind.as_mut() {
            bind.id = Some(id.into());
        }
        self
    }

    pub fn with_resources(mut self, base_name: impl Into<String>) -> Self {
        if let Some(load) = self.load.as_mut() {
            load.resources = Some(base_name.into());
        }
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        if let Some(load) = self.load.as_mut() {
            load.locale = Some(locale.into());
        }
        self
    }

    pub fn with_visibility(mut self, visibility: Visibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn read_only(mut self) -> Self {
        self.writable = false;
        self
    }
}

/// Binding metadata of one class in a host's hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingClass {
    /// Fully qualified class name, e.g. `demo.ui.MainWindow`.
    pub name: String,
    pub fields: Vec<FieldBinding>,
}

impl BindingClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldBinding) -> Self {
        self.fields.push(field);
        self
    }

    /// The class name as a document location, `demo/ui/MainWindow`.
    /// Load documents resolve against its directory.
    pub fn location(&self) -> String {
        self.name.replace('.', "/")
    }
}

/// Implemented by host types that receive loaded documents.
pub trait Bindable {
    /// Binding metadata, topmost ancestor first, most derived class last.
    fn binding_classes(&self) -> Vec<BindingClass>;

    fn set_field(&mut self, class: &str, field: &str, value: Value) -> Result<(), PropertyError>;
}

#[derive(Debug, Clone)]
pub struct Binder {
    serializer: Serializer,
}

/// A loaded field's registry, as seen by descendant classes.
struct Retained {
    visibility: Visibility,
    registry: NamedObjects,
}

impl Binder {
    pub fn new(serializer: Serializer) -> Self {
        Self { serializer }
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn bind(&self, host: &mut dyn Bindable) -> Result<(), BindError> {
        let mut inherited: HashMap<String, Retained> = HashMap::new();

        for class in host.binding_classes() {
            log::debug!("Binding class {}", class.name);

            let mut own: HashMap<String, Retained> = HashMap::new();
            for field in &class.fields {
                if let Some(load) = &field.load {
                    check_field(&class, field)?;
                    let registry = self.load_field(host, &class, field, load)?;
                    own.insert(
                        field.name.clone(),
                        Retained {
                            visibility: field.visibility,
                            registry,
                        },
                    );
                }
            }

            for field in &class.fields {
                if let Some(bind) = &field.bind {
                    check_field(&class, field)?;
                    let source = source_of(&class, field, bind, &own, &inherited)?;
                    let id = bind.id.as_deref().unwrap_or(&field.name);
                    let value = source.registry.get(id).ok_or_else(|| BindError::MissingId {
                        property: bind.property.clone(),
                        id: id.to_string(),
                    })?;
                    log::trace!("{}.{} <- {}.{}", class.name, field.name, bind.property, id);
                    assign(host, &class, field, value)?;
                }
            }

            inherited.extend(own);
        }
        Ok(())
    }

    fn load_field(
        &self,
        host: &mut dyn Bindable,
        class: &BindingClass,
        field: &FieldBinding,
        load: &LoadPoint,
    ) -> Result<NamedObjects, BindError> {
        let locale = load
            .locale
            .as_deref()
            .map(|tag| {
                tag.parse::<Locale>().map_err(|source| BindError::InvalidLocale {
                    locale: tag.to_string(),
                    source,
                })
            })
            .transpose()?;
        let resources = self.resources_for(class, load, locale.as_ref())?;

        let location = resolve_uri(&load.document, Some(&class.location()));
        log::debug!("Loading '{}' into {}.{}", location, class.name, field.name);
        let document = self
            .serializer
            .with_resources(resources)
            .read(&location)
            .map_err(|source| BindError::Load {
                class: class.name.clone(),
                field: field.name.clone(),
                document: location.clone(),
                source,
            })?;

        let (root, registry, _) = document.into_parts();
        assign(host, class, field, root)?;
        Ok(registry)
    }

    /// An explicit bundle must exist. The default bundle, named after the
    /// class, is optional.
    fn resources_for(
        &self,
        class: &BindingClass,
        load: &LoadPoint,
        locale: Option<&Locale>,
    ) -> Result<Option<Rc<dyn ResourceBundle>>, BindError> {
        let loader = self.serializer.bundle_loader();

        if let Some(base_name) = &load.resources {
            let loader = loader.ok_or_else(|| BindError::NoBundleLoader(base_name.clone()))?;
            let locale = locale.or(self.serializer.locale());
            return loader
                .load(base_name, locale)
                .map(Some)
                .map_err(|source| BindError::MissingResources {
                    base_name: base_name.clone(),
                    source,
                });
        }

        let Some(loader) = loader else {
            return Ok(self.serializer.resources().cloned());
        };
        match loader.load(&class.name, locale.or(self.serializer.locale())) {
            Ok(bundle) => Ok(Some(bundle)),
            Err(e) if e.is_not_found() => {
                log::warn!("No default resource bundle for {}", class.name);
                Ok(self.serializer.resources().cloned())
            }
            Err(source) => Err(BindError::MissingResources {
                base_name: class.name.clone(),
                source,
            }),
        }
    }
}

/// Reject a field's metadata before its document is read.
fn check_field(class: &BindingClass, field: &FieldBinding) -> Result<(), BindError> {
    if field.load.is_some() && field.bind.is_some() {
        return Err(BindError::ConflictingBinding {
            class: class.name.clone(),
            field: field.name.clone(),
        });
    }
    if !field.writable {
        return Err(BindError::ImmutableField {
            class: class.name.clone(),
            field: field.name.clone(),
        });
    }
    Ok(())
}

/// The registry a bind field reads from: this class's loads first, then
/// non-private loads of its ancestors.
fn source_of<'a>(
    class: &BindingClass,
    field: &FieldBinding,
    bind: &BindPoint,
    own: &'a HashMap<String, Retained>,
    inherited: &'a HashMap<String, Retained>,
) -> Result<&'a Retained, BindError> {
    if let Some(retained) = own.get(&bind.property) {
        return Ok(retained);
    }
    match inherited.get(&bind.property) {
        Some(retained) if retained.visibility != Visibility::Private => Ok(retained),
        Some(_) => Err(BindError::InaccessibleProperty {
            class: class.name.clone(),
            field: field.name.clone(),
            property: bind.property.clone(),
        }),
        None => Err(BindError::UnloadedProperty {
            class: class.name.clone(),
            field: field.name.clone(),
            property: bind.property.clone(),
        }),
    }
}

fn assign(
    host: &mut dyn Bindable,
    class: &BindingClass,
    field: &FieldBinding,
    value: Value,
) -> Result<(), BindError> {
    host.set_field(&class.name, &field.name, value)
        .map_err(|source| BindError::Field {
            class: class.name.clone(),
            field: field.name.clone(),
            source,
        })
}
