//! The dynamic object model.
//!
//! Every type that can appear as a tag in a markup document implements
//! [`MarkupObject`] and advertises which capabilities it has. The engine only
//! ever sees objects through an [`ObjectRef`].

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use crate::error::PropertyError;
use crate::property::PropertyDescriptor;
use crate::value::Value;

/// Upcast to `Any`, implemented for every sized `'static` type.
pub trait AsAny {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A type the engine can construct, configure and link into a graph.
///
/// Capability accessors default to `None`; a type overrides the ones it
/// supports. A type that exposes both a dictionary and a bean is treated as
/// a dictionary.
pub trait MarkupObject: AsAny + fmt::Debug + 'static {
    fn type_name(&self) -> &str;

    fn as_bean(&self) -> Option<&dyn Bean> {
        None
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        None
    }

    fn as_dictionary(&self) -> Option<&dyn Dictionary> {
        None
    }

    fn as_dictionary_mut(&mut self) -> Option<&mut dyn Dictionary> {
        None
    }

    fn as_sequence(&self) -> Option<&dyn Sequence> {
        None
    }

    fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        None
    }

    fn as_listener_list(&self) -> Option<&ListenerList> {
        None
    }

    fn as_listener_list_mut(&mut self) -> Option<&mut ListenerList> {
        None
    }
}

/// A structured property set described by a static schema.
pub trait Bean {
    fn schema(&self) -> &'static [PropertyDescriptor];

    fn property(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.schema().iter().find(|p| p.name == name)
    }

    fn get(&self, name: &str) -> Option<Value>;

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError>;
}

/// A string-keyed container accepting arbitrary keys.
pub trait Dictionary {
    fn get(&self, key: &str) -> Option<Value>;

    /// Stores `value`, returning the previous value under `key`.
    fn put(&mut self, key: &str, value: Value) -> Option<Value>;

    fn remove(&mut self, key: &str) -> Option<Value>;

    fn contains_key(&self, key: &str) -> bool;

    fn keys(&self) -> Vec<String>;
}

/// An ordered, appendable collection.
pub trait Sequence {
    fn add(&mut self, item: Value) -> Result<(), PropertyError>;

    fn get(&self, index: usize) -> Option<Value>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Shared handle to a constructed object.
///
/// Cloning the handle shares the object; equality is identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<RefCell<dyn MarkupObject>>);

impl ObjectRef {
    pub fn new<T: MarkupObject>(object: T) -> Self {
        ObjectRef(Rc::new(RefCell::new(object)))
    }

    /// Panics if the object is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, dyn MarkupObject> {
        self.0.borrow()
    }

    /// Panics if the object is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, dyn MarkupObject> {
        self.0.borrow_mut()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn type_name(&self) -> String {
        match self.0.try_borrow() {
            Ok(o) => o.type_name().to_string(),
            Err(_) => "<borrowed>".to_string(),
        }
    }

    pub fn is<T: MarkupObject>(&self) -> bool {
        (*self.0.borrow()).as_any().is::<T>()
    }

    pub fn downcast_ref<T: MarkupObject>(&self) -> Option<Ref<'_, T>> {
        Ref::filter_map(self.0.borrow(), |o| o.as_any().downcast_ref::<T>()).ok()
    }

    pub fn downcast_mut<T: MarkupObject>(&self) -> Option<RefMut<'_, T>> {
        RefMut::filter_map(self.0.borrow_mut(), |o| o.as_any_mut().downcast_mut::<T>()).ok()
    }
}

impl PartialEq for ObjectRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(o) => fmt::Debug::fmt(&*o, f),
            Err(_) => write!(f, "ObjectRef(<borrowed>)"),
        }
    }
}

/// The property capability of one object, chosen once per object.
pub enum PropertyAccess<'a> {
    Dictionary(&'a mut dyn Dictionary),
    Bean(&'a mut dyn Bean),
}

impl<'a> PropertyAccess<'a> {
    pub fn of(object: &'a mut dyn MarkupObject) -> Option<Self> {
        if object.as_dictionary().is_some() {
            object.as_dictionary_mut().map(PropertyAccess::Dictionary)
        } else {
            object.as_bean_mut().map(PropertyAccess::Bean)
        }
    }

    /// Declared metadata for `name`. Dictionaries accept any key untyped.
    pub fn descriptor(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        match self {
            PropertyAccess::Dictionary(_) => None,
            PropertyAccess::Bean(bean) => bean.property(name),
        }
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        match self {
            PropertyAccess::Dictionary(d) => d.get(name),
            PropertyAccess::Bean(b) => b.get(name),
        }
    }

    pub fn put(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match self {
            PropertyAccess::Dictionary(d) => {
                d.put(name, value);
                Ok(())
            }
            PropertyAccess::Bean(b) => b.set(name, value),
        }
    }
}

/// Ordered list of listener objects.
#[derive(Debug, Default)]
pub struct ListenerList {
    listeners: Vec<ObjectRef>,
}

impl ListenerList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: ObjectRef) {
        self.listeners.push(listener);
    }

    pub fn remove(&mut self, listener: &ObjectRef) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| !l.ptr_eq(listener));
        self.listeners.len() != before
    }

    pub fn get(&self, index: usize) -> Option<&ObjectRef> {
        self.listeners.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectRef> {
        self.listeners.iter()
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl MarkupObject for ListenerList {
    fn type_name(&self) -> &str {
        "ListenerList"
    }

    fn as_listener_list(&self) -> Option<&ListenerList> {
        Some(self)
    }

    fn as_listener_list_mut(&mut self) -> Option<&mut ListenerList> {
        Some(self)
    }
}
