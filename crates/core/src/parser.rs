//! A "dumb" XML driver that reads a markup document and notifies a builder of events.
//!
//! The driver resolves namespace prefixes against the `xmlns` declarations in
//! scope, unescapes attribute values and text, and coalesces text that
//! quick-xml splits around entity references. It knows nothing about what
//! the elements mean.

use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Location, SerializationError};

/// An element or attribute name with its prefix resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualifiedName {
    pub prefix: Option<String>,
    pub local: String,
    /// The namespace URI bound to the prefix (or the default namespace for
    /// unprefixed elements). Unprefixed attributes have no namespace.
    pub namespace: Option<String>,
}

impl QualifiedName {
    pub fn has_prefix(&self, prefix: &str) -> bool {
        self.prefix.as_deref() == Some(prefix)
    }
}

impl std::fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: QualifiedName,
    pub value: String,
}

/// Receives the events of one document, in document order.
pub trait MarkupBuilder {
    fn start_element(
        &mut self,
        name: QualifiedName,
        attributes: Vec<Attribute>,
        location: Location,
    ) -> Result<(), SerializationError>;

    fn end_element(&mut self, location: Location) -> Result<(), SerializationError>;

    /// Character data, including whitespace-only runs.
    fn text(&mut self, text: &str, location: Location) -> Result<(), SerializationError>;

    /// Once true, the driver stops reading.
    fn is_finished(&self) -> bool {
        false
    }
}

/// Drives the parsing process, calling builder methods for each significant XML event.
pub fn parse_document(
    source: &str,
    builder: &mut impl MarkupBuilder,
) -> Result<(), SerializationError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(false);
    let mut buf = Vec::new();
    let mut scopes = NamespaceScopes::default();
    let mut text = PendingText::default();

    loop {
        let pos = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                text.flush(source, builder)?;
                let (name, attributes) = scopes.open(&e)?;
                builder.start_element(name, attributes, Location::from_offset(source, pos))?;
            }
            Event::Empty(e) => {
                text.flush(source, builder)?;
                let location = Location::from_offset(source, pos);
                let (name, attributes) = scopes.open(&e)?;
                builder.start_element(name, attributes, location)?;
                builder.end_element(location)?;
                scopes.close();
            }
            Event::End(_) => {
                text.flush(source, builder)?;
                builder.end_element(Location::from_offset(source, pos))?;
                scopes.close();
            }
            Event::Text(e) => {
                let raw_text = std::str::from_utf8(e.as_ref())?;
                text.push(&unescape(raw_text)?, pos);
            }
            Event::CData(e) => {
                text.push(std::str::from_utf8(e.as_ref())?, pos);
            }
            Event::GeneralRef(e) => {
                let entity = std::str::from_utf8(e.as_ref())?;
                text.push(&unescape(&format!("&{};", entity))?, pos);
            }
            Event::Eof => {
                text.flush(source, builder)?;
                break;
            }
            _ => (),
        }
        buf.clear();

        if builder.is_finished() {
            break;
        }
    }

    Ok(())
}

#[derive(Debug, Default)]
struct PendingText {
    content: String,
    start: usize,
}

impl PendingText {
    fn push(&mut self, text: &str, pos: usize) {
        if self.content.is_empty() {
            self.start = pos;
        }
        self.content.push_str(text);
    }

    fn flush(
        &mut self,
        source: &str,
        builder: &mut impl MarkupBuilder,
    ) -> Result<(), SerializationError> {
        if self.content.is_empty() {
            return Ok(());
        }
        let content = std::mem::take(&mut self.content);
        builder.text(&content, Location::from_offset(source, self.start))
    }
}

/// `xmlns` declarations, one frame per open element.
#[derive(Debug, Default)]
struct NamespaceScopes {
    frames: Vec<Vec<(Option<String>, String)>>,
}

impl NamespaceScopes {
    fn open(
        &mut self,
        e: &BytesStart<'_>,
    ) -> Result<(QualifiedName, Vec<Attribute>), SerializationError> {
        let mut frame = Vec::new();
        let mut raw_attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let value = unescape(std::str::from_utf8(&attr.value)?)?.into_owned();
            if key == "xmlns" {
                frame.push((None, value));
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                frame.push((Some(prefix.to_string()), value));
            } else {
                raw_attributes.push((key.to_string(), value));
            }
        }
        self.frames.push(frame);

        let name_binding = e.name();
        let element = std::str::from_utf8(name_binding.as_ref())?;
        let name = self.qualify(element, true);
        let attributes = raw_attributes
            .into_iter()
            .map(|(key, value)| Attribute {
                name: self.qualify(&key, false),
                value,
            })
            .collect();
        Ok((name, attributes))
    }

    fn close(&mut self) {
        self.frames.pop();
    }

    fn lookup(&self, prefix: Option<&str>) -> Option<&str> {
        self.frames
            .iter()
            .rev()
            .flat_map(|frame| frame.iter().rev())
            .find(|(p, _)| p.as_deref() == prefix)
            .map(|(_, uri)| uri.as_str())
            .filter(|uri| !uri.is_empty())
    }

    fn qualify(&self, raw: &str, is_element: bool) -> QualifiedName {
        match raw.split_once(':') {
            Some((prefix, local)) => QualifiedName {
                namespace: self.lookup(Some(prefix)).map(str::to_string),
                prefix: Some(prefix.to_string()),
                local: local.to_string(),
            },
            None => QualifiedName {
                namespace: if is_element {
                    self.lookup(None).map(str::to_string)
                } else {
                    None
                },
                prefix: None,
                local: raw.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq)]
    enum Recorded {
        Start(QualifiedName, Vec<Attribute>, Location),
        End,
        Text(String),
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<Recorded>,
        stop_after_first_end: bool,
    }

    impl MarkupBuilder for Recorder {
        fn start_element(
            &mut self,
            name: QualifiedName,
            attributes: Vec<Attribute>,
            location: Location,
        ) -> Result<(), SerializationError> {
            self.events.push(Recorded::Start(name, attributes, location));
            Ok(())
        }

        fn end_element(&mut self, _location: Location) -> Result<(), SerializationError> {
            self.events.push(Recorded::End);
            Ok(())
        }

        fn text(&mut self, text: &str, _location: Location) -> Result<(), SerializationError> {
            self.events.push(Recorded::Text(text.to_string()));
            Ok(())
        }

        fn is_finished(&self) -> bool {
            self.stop_after_first_end && self.events.contains(&Recorded::End)
        }
    }

    fn start_name(event: &Recorded) -> &QualifiedName {
        match event {
            Recorded::Start(name, _, _) => name,
            other => panic!("expected a start event, got {other:?}"),
        }
    }

    #[test]
    fn test_namespaces_resolve_per_scope() {
        let source = r#"<d:Window xmlns:d="demo.ui" xmlns:wtkx="urn:wtkx" xmlns="demo.default">
    <Label d:Grid.row="1" text="hi" wtkx:id="label"/>
</d:Window>"#;
        let mut recorder = Recorder::default();
        parse_document(source, &mut recorder).unwrap();

        let window = start_name(&recorder.events[0]);
        assert_eq!(window.namespace.as_deref(), Some("demo.ui"));
        assert_eq!(window.local, "Window");

        let Recorded::Start(label, attributes, location) = &recorder.events[2] else {
            panic!("expected label start");
        };
        assert_eq!(label.namespace.as_deref(), Some("demo.default"));
        assert_eq!(location.line, 2);
        assert_eq!(attributes.len(), 3);
        assert_eq!(attributes[0].name.namespace.as_deref(), Some("demo.ui"));
        assert_eq!(attributes[0].name.local, "Grid.row");
        assert_eq!(attributes[1].name.namespace, None);
        assert!(attributes[2].name.has_prefix("wtkx"));
        assert_eq!(attributes[2].value, "label");
    }

    #[test]
    fn test_empty_element_is_start_and_end() {
        let mut recorder = Recorder::default();
        parse_document("<a><b/></a>", &mut recorder).unwrap();
        assert!(matches!(recorder.events[1], Recorded::Start(..)));
        assert_eq!(recorder.events[2], Recorded::End);
        assert_eq!(recorder.events[3], Recorded::End);
    }

    #[test]
    fn test_text_is_unescaped_and_coalesced() {
        let mut recorder = Recorder::default();
        parse_document("<a>x &lt; y &amp;&#65;<![CDATA[<raw>]]></a>", &mut recorder).unwrap();
        assert_eq!(recorder.events[1], Recorded::Text("x < y &A<raw>".to_string()));
    }

    #[test]
    fn test_attribute_values_are_unescaped() {
        let mut recorder = Recorder::default();
        parse_document(r#"<a title="Tom &amp; Jerry"/>"#, &mut recorder).unwrap();
        let Recorded::Start(_, attributes, _) = &recorder.events[0] else {
            panic!("expected start");
        };
        assert_eq!(attributes[0].value, "Tom & Jerry");
    }

    #[test]
    fn test_undeclared_prefix_has_no_namespace() {
        let mut recorder = Recorder::default();
        parse_document("<wtkx:include src='a.wtkx'/>", &mut recorder).unwrap();
        let name = start_name(&recorder.events[0]);
        assert!(name.has_prefix("wtkx"));
        assert_eq!(name.namespace, None);
        assert_eq!(name.to_string(), "wtkx:include");
    }

    #[test]
    fn test_stops_when_builder_is_finished() {
        let mut recorder = Recorder {
            stop_after_first_end: true,
            ..Recorder::default()
        };
        parse_document("<a/><trailing/>", &mut recorder).unwrap();
        assert_eq!(recorder.events.len(), 2);
    }

    #[test]
    fn test_mismatched_end_tag_is_an_error() {
        let mut recorder = Recorder::default();
        let err = parse_document("<a><b></a>", &mut recorder).unwrap_err();
        assert!(matches!(err, SerializationError::Xml(_)));
    }
}
