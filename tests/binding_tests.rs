mod common;

use common::fixtures::{BoxPane, Label, PushButton, Window};
use common::{TestResult, serializer};
use wtkx::{
    BindError, Bindable, Binder, BindingClass, FieldBinding, ObjectRef, PropertyError, Value,
    Visibility,
};

const MAIN_WINDOW: &str = r#"<Window xmlns="demo.ui" xmlns:wtkx="urn:wtkx" title="%title">
    <content>
        <BoxPane wtkx:id="buttons">
            <PushButton wtkx:id="okButton" label="%ok"/>
            <PushButton wtkx:id="cancelButton" label="Cancel"/>
        </BoxPane>
    </content>
</Window>"#;

const STATUS_BAR: &str = r#"<Label xmlns="demo.ui" xmlns:wtkx="urn:wtkx" wtkx:id="status" text="Ready"/>"#;

fn files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("app/main_window.wtkx", MAIN_WINDOW),
        ("app/status_bar.wtkx", STATUS_BAR),
        ("app/MainWindow.json", r#"{"title": "Application", "ok": "OK"}"#),
        ("app/MainWindow_de.json", r#"{"ok": "Einverstanden"}"#),
    ]
}

/// A window base class and a subclass that adds a status bar.
#[derive(Default)]
struct ApplicationWindow {
    window: Option<ObjectRef>,
    ok_button: Option<ObjectRef>,
    status_bar: Option<ObjectRef>,
    status: Option<ObjectRef>,
    cancel: Option<ObjectRef>,
    base_visibility: Visibility,
}

impl Bindable for ApplicationWindow {
    fn binding_classes(&self) -> Vec<BindingClass> {
        vec![
            BindingClass::new("app.MainWindow")
                .field(
                    FieldBinding::load("window", "main_window.wtkx")
                        .with_visibility(self.base_visibility),
                )
                .field(FieldBinding::bind("okButton", "window")),
            BindingClass::new("app.StatusWindow")
                .field(FieldBinding::load("statusBar", "status_bar.wtkx"))
                .field(FieldBinding::bind("status", "statusBar"))
                .field(FieldBinding::bind("cancel", "window").with_id("cancelButton")),
        ]
    }

    fn set_field(&mut self, class: &str, field: &str, value: Value) -> Result<(), PropertyError> {
        let slot = match (class, field) {
            ("app.MainWindow", "window") => &mut self.window,
            ("app.MainWindow", "okButton") => &mut self.ok_button,
            ("app.StatusWindow", "statusBar") => &mut self.status_bar,
            ("app.StatusWindow", "status") => &mut self.status,
            ("app.StatusWindow", "cancel") => &mut self.cancel,
            _ => return Err(PropertyError::unknown(class, field)),
        };
        *slot = value.into_object();
        Ok(())
    }
}

fn label_of(button: &Option<ObjectRef>) -> Option<String> {
    button.as_ref()?.downcast_ref::<PushButton>()?.label.clone()
}

#[test]
fn test_subclass_binds_from_inherited_document() -> TestResult {
    let binder = Binder::new(serializer(&files()));
    let mut host = ApplicationWindow::default();
    binder.bind(&mut host)?;

    let window = host.window.clone().ok_or("window loaded")?;
    let window = window.downcast_ref::<Window>().ok_or("window type")?;
    assert_eq!(window.title.as_deref(), Some("Application"));

    let buttons = window.content.as_object().ok_or("content")?.clone();
    let buttons = buttons.downcast_ref::<BoxPane>().ok_or("buttons")?;
    assert_eq!(buttons.children[0], Value::Object(host.ok_button.clone().ok_or("ok")?));
    assert_eq!(buttons.children[1], Value::Object(host.cancel.clone().ok_or("cancel")?));
    assert_eq!(label_of(&host.ok_button).as_deref(), Some("OK"));

    let status = host.status.clone().ok_or("status")?;
    assert!(status.ptr_eq(host.status_bar.as_ref().ok_or("status bar")?));
    assert_eq!(status.downcast_ref::<Label>().ok_or("label")?.text.as_deref(), Some("Ready"));
    Ok(())
}

#[test]
fn test_private_base_document_is_hidden_from_subclass() {
    let binder = Binder::new(serializer(&files()));
    let mut host = ApplicationWindow {
        base_visibility: Visibility::Private,
        ..ApplicationWindow::default()
    };

    match binder.bind(&mut host) {
        Err(BindError::InaccessibleProperty { class, property, .. }) => {
            assert_eq!(class, "app.StatusWindow");
            assert_eq!(property, "window");
        }
        other => panic!("expected an inaccessible property, got {other:?}"),
    }
    // Fields assigned before the rejected bind keep their values.
    assert!(host.window.is_some());
    assert!(host.ok_button.is_some());
    assert!(host.status_bar.is_some());
    assert!(host.status.is_some());
    assert!(host.cancel.is_none());
}

#[test]
fn test_default_locale_selects_bundle_overlay() -> TestResult {
    let serializer = common::builder(&files())
        .with_locale("de".parse()?)
        .build();
    let mut host = ApplicationWindow::default();
    Binder::new(serializer).bind(&mut host)?;

    assert_eq!(label_of(&host.ok_button).as_deref(), Some("Einverstanden"));
    Ok(())
}
