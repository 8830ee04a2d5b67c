//! A small widget set used by the integration tests.

use wtkx::{
    Bean, ListenerList, MarkupObject, ObjectRef, PropertyDescriptor, PropertyError, Sequence,
    TypeRegistry, Value, ValueType,
};

pub const UI: &str = "demo.ui";

#[derive(Debug, Default)]
pub struct Window {
    pub title: Option<String>,
    pub content: Value,
    pub maximized: bool,
}

const WINDOW_SCHEMA: &[PropertyDescriptor] = &[
    PropertyDescriptor::writable("title", ValueType::String),
    PropertyDescriptor::writable("content", ValueType::Object),
    PropertyDescriptor::writable("maximized", ValueType::Boolean),
];

impl Bean for Window {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        WINDOW_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "title" => Some(self.title.clone().map(Value::String).unwrap_or_default()),
            "content" => Some(self.content.clone()),
            "maximized" => Some(Value::Boolean(self.maximized)),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "title" => self.title = value.as_str().map(str::to_string),
            "content" => self.content = value,
            "maximized" => {
                self.maximized = value
                    .as_bool()
                    .ok_or_else(|| PropertyError::mismatch(name, "boolean", value.type_label()))?
            }
            other => return Err(PropertyError::unknown("Window", other)),
        }
        Ok(())
    }
}

impl MarkupObject for Window {
    fn type_name(&self) -> &str {
        "Window"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }
}

#[derive(Debug, Default)]
pub struct BoxPane {
    pub spacing: i32,
    pub children: Vec<Value>,
}

const BOX_PANE_SCHEMA: &[PropertyDescriptor] =
    &[PropertyDescriptor::writable("spacing", ValueType::Int)];

impl Bean for BoxPane {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        BOX_PANE_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        (name == "spacing").then_some(Value::Int(self.spacing))
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "spacing" => {
                self.spacing = value
                    .as_i32()
                    .ok_or_else(|| PropertyError::mismatch(name, "int", value.type_label()))?
            }
            other => return Err(PropertyError::unknown("BoxPane", other)),
        }
        Ok(())
    }
}

impl Sequence for BoxPane {
    fn add(&mut self, item: Value) -> Result<(), PropertyError> {
        self.children.push(item);
        Ok(())
    }

    fn get(&self, index: usize) -> Option<Value> {
        self.children.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.children.len()
    }
}

impl MarkupObject for BoxPane {
    fn type_name(&self) -> &str {
        "BoxPane"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }

    fn as_sequence(&self) -> Option<&dyn Sequence> {
        Some(self)
    }

    fn as_sequence_mut(&mut self) -> Option<&mut dyn Sequence> {
        Some(self)
    }
}

#[derive(Debug, Default)]
pub struct Label {
    pub text: Option<String>,
}

const LABEL_SCHEMA: &[PropertyDescriptor] =
    &[PropertyDescriptor::writable("text", ValueType::String)];

impl Bean for Label {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        LABEL_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        (name == "text").then(|| self.text.clone().map(Value::String).unwrap_or_default())
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "text" => self.text = value.as_str().map(str::to_string),
            other => return Err(PropertyError::unknown("Label", other)),
        }
        Ok(())
    }
}

impl MarkupObject for Label {
    fn type_name(&self) -> &str {
        "Label"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }
}

#[derive(Debug)]
pub struct PushButton {
    pub label: Option<String>,
    pub icon: Option<String>,
    pub press_listeners: ObjectRef,
}

impl Default for PushButton {
    fn default() -> Self {
        Self {
            label: None,
            icon: None,
            press_listeners: ObjectRef::new(ListenerList::new()),
        }
    }
}

const PUSH_BUTTON_SCHEMA: &[PropertyDescriptor] = &[
    PropertyDescriptor::writable("label", ValueType::String),
    PropertyDescriptor::writable("icon", ValueType::Url),
    PropertyDescriptor::listeners("buttonPressListeners"),
];

impl Bean for PushButton {
    fn schema(&self) -> &'static [PropertyDescriptor] {
        PUSH_BUTTON_SCHEMA
    }

    fn get(&self, name: &str) -> Option<Value> {
        match name {
            "label" => Some(self.label.clone().map(Value::String).unwrap_or_default()),
            "icon" => Some(self.icon.clone().map(Value::Url).unwrap_or_default()),
            "buttonPressListeners" => Some(Value::Object(self.press_listeners.clone())),
            _ => None,
        }
    }

    fn set(&mut self, name: &str, value: Value) -> Result<(), PropertyError> {
        match name {
            "label" => self.label = value.as_str().map(str::to_string),
            "icon" => self.icon = value.as_str().map(str::to_string),
            "buttonPressListeners" => return Err(PropertyError::read_only("PushButton", name)),
            other => return Err(PropertyError::unknown("PushButton", other)),
        }
        Ok(())
    }
}

impl MarkupObject for PushButton {
    fn type_name(&self) -> &str {
        "PushButton"
    }

    fn as_bean(&self) -> Option<&dyn Bean> {
        Some(self)
    }

    fn as_bean_mut(&mut self) -> Option<&mut dyn Bean> {
        Some(self)
    }
}

/// Listener with no properties.
#[derive(Debug, Default)]
pub struct PressHandler;

impl MarkupObject for PressHandler {
    fn type_name(&self) -> &str {
        "PressHandler"
    }
}

pub fn widget_types() -> TypeRegistry {
    let mut types = TypeRegistry::with_builtins();
    types
        .register::<Window>("demo.ui.Window")
        .register::<BoxPane>("demo.ui.BoxPane")
        .register::<Label>("demo.ui.Label")
        .register::<PushButton>("demo.ui.PushButton")
        .register::<PressHandler>("demo.ui.PressHandler");
    types
}
