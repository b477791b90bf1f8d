//! XML reader that builds [`Node`] trees.

use crate::name::XML_NAMESPACE;
use crate::{Error, Node, QualifiedName, Result};
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesCData, BytesEnd, BytesStart, BytesText, Event};

/// Parse XML from a string, producing the root [`Node`].
///
/// Namespace declarations (`xmlns`, `xmlns:p`) are resolved into each
/// element's [`QualifiedName`] and are also kept as ordinary attributes so the
/// document can be written back unchanged. Comments, processing instructions,
/// and DOCTYPE declarations are skipped. Whitespace-only text is dropped unless
/// it is all an element holds; other text and CDATA sections are concatenated
/// into the element's text.
///
/// # Example
///
/// ```rust
/// use cfgmodel_tree::parse;
///
/// let root = parse(r#"<composite xmlns="urn:test" name="orders">
///   <component name="OrderService"/>
/// </composite>"#).unwrap();
///
/// assert_eq!(root.qualified_name().to_string(), "{urn:test}composite");
/// assert_eq!(root.attribute("name").as_deref(), Some("orders"));
/// assert_eq!(root.children()[0].qualified_name().namespace(), Some("urn:test"));
/// ```
///
/// # Errors
///
/// Returns an error if the XML is malformed, a prefix is unbound, or the
/// document does not have exactly one root element.
pub fn parse(content: &str) -> Result<Node> {
    let mut parser = XmlParser::new(content);
    parser.parse()
}

/// Namespace bindings in effect for one element; the empty key is the default namespace.
type Scope = IndexMap<String, String>;

/// Internal parser state.
struct XmlParser<'a> {
    reader: Reader<&'a [u8]>,

    /// Stack of open elements with the namespace scope each one introduced
    /// and the whitespace-only text seen directly inside it.
    stack: Vec<(Node, Scope, String)>,
}

impl<'a> XmlParser<'a> {
    fn new(source: &'a str) -> Self {
        let mut reader = Reader::from_str(source);
        reader.config_mut().trim_text_start = false;
        reader.config_mut().trim_text_end = false;

        Self {
            reader,
            stack: Vec::new(),
        }
    }

    fn parse(&mut self) -> Result<Node> {
        let mut root: Option<Node> = None;

        loop {
            match self.reader.read_event() {
                Ok(Event::Start(e)) => {
                    let (node, scope) = self.open_element(&e)?;
                    self.stack.push((node, scope, String::new()));
                }
                Ok(Event::End(e)) => {
                    let node = self.handle_end(&e)?;
                    self.place(node, &mut root)?;
                }
                Ok(Event::Empty(e)) => {
                    let (node, _) = self.open_element(&e)?;
                    self.place(node, &mut root)?;
                }
                Ok(Event::Text(e)) => {
                    self.handle_text(&e)?;
                }
                Ok(Event::CData(e)) => {
                    self.handle_cdata(&e);
                }
                Ok(Event::Comment(_) | Event::PI(_) | Event::Decl(_)) => {
                    // Skip comments, processing instructions, and XML declarations
                }
                Ok(Event::DocType(_)) => {}
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(Error::XmlSyntax {
                        message: e.to_string(),
                        position: Some(self.reader.error_position()),
                    });
                }
            }
        }

        if let Some((node, _, _)) = self.stack.last() {
            return Err(Error::UnexpectedEof {
                expected: format!("closing tag </{}>", node.qualified_name().markup_name()),
            });
        }

        root.ok_or(Error::EmptyDocument)
    }

    /// Attach a finished element to the open parent, or make it the root.
    fn place(&mut self, node: Node, root: &mut Option<Node>) -> Result<()> {
        match self.stack.last() {
            Some((parent, _, _)) => parent.append_child(&node),
            None if root.is_some() => Err(Error::MultipleRoots),
            None => {
                *root = Some(node);
                Ok(())
            }
        }
    }

    fn open_element(&self, e: &BytesStart<'_>) -> Result<(Node, Scope)> {
        let mut attributes = Vec::new();
        let mut scope = Scope::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map_err(|err| Error::XmlSyntax {
                    message: format!("Invalid attribute value: {}", err),
                    position: Some(self.reader.buffer_position()),
                })?
                .into_owned();

            if key == "xmlns" {
                scope.insert(String::new(), value.clone());
            } else if let Some(prefix) = key.strip_prefix("xmlns:") {
                scope.insert(prefix.to_string(), value.clone());
            }
            attributes.push((key, value));
        }

        let full_name = String::from_utf8_lossy(e.name().as_ref()).to_string();
        let (prefix, local) = match full_name.split_once(':') {
            Some((prefix, local)) => (Some(prefix), local),
            None => (None, full_name.as_str()),
        };
        let namespace = self.lookup_namespace(prefix.unwrap_or(""), &scope);
        if let (Some(prefix), None) = (prefix, &namespace) {
            return Err(Error::UnboundPrefix {
                prefix: prefix.to_string(),
            });
        }

        let name = QualifiedName::new(namespace.as_deref(), local)?.with_prefix(prefix);
        let node = Node::new(name);
        for (key, value) in &attributes {
            node.set_attribute(key, Some(value));
        }
        Ok((node, scope))
    }

    /// Resolve a prefix against the element's own declarations, then its ancestors'.
    fn lookup_namespace(&self, prefix: &str, own: &Scope) -> Option<String> {
        if prefix == "xml" {
            return Some(XML_NAMESPACE.to_string());
        }
        std::iter::once(own)
            .chain(self.stack.iter().rev().map(|(_, scope, _)| scope))
            .find_map(|scope| scope.get(prefix))
            .filter(|uri| !uri.is_empty())
            .cloned()
    }

    fn handle_end(&mut self, e: &BytesEnd<'_>) -> Result<Node> {
        let end_name = String::from_utf8_lossy(e.name().as_ref()).to_string();

        let (node, _, whitespace) = self.stack.pop().ok_or_else(|| Error::XmlSyntax {
            message: format!("Unexpected closing tag </{}>", end_name),
            position: Some(self.reader.buffer_position()),
        })?;

        let expected = node.qualified_name().markup_name();
        if expected != end_name {
            return Err(Error::MismatchedEndTag {
                expected,
                found: end_name,
            });
        }
        // Whitespace is only content when it is all the element holds.
        if !whitespace.is_empty() && node.child_count() == 0 && node.text().is_none() {
            node.set_text(Some(&whitespace));
        }
        Ok(node)
    }

    fn handle_text(&mut self, e: &BytesText<'_>) -> Result<()> {
        let text = e.unescape().map_err(|err| Error::XmlSyntax {
            message: format!("Invalid text content: {}", err),
            position: Some(self.reader.buffer_position()),
        })?;
        if text.trim().is_empty() {
            if let Some((_, _, whitespace)) = self.stack.last_mut() {
                whitespace.push_str(&text);
            }
            return Ok(());
        }
        self.append_text(&text);
        Ok(())
    }

    fn handle_cdata(&mut self, e: &BytesCData<'_>) {
        let text = String::from_utf8_lossy(e.as_ref()).to_string();
        self.append_text(&text);
    }

    fn append_text(&mut self, text: &str) {
        if let Some((node, _, _)) = self.stack.last() {
            let combined = match node.text() {
                Some(existing) => existing + text,
                None => text.to_string(),
            };
            node.set_text(Some(&combined));
        }
    }
}
