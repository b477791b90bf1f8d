//! XML writer for [`Node`] trees.

use crate::{Error, Node, Result};
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use std::io;

/// Serialize a tree to a compact XML string (no declaration, no indentation).
///
/// Namespace declarations are written as they appear in each element's
/// attributes. When an element's namespace is not already in scope (for
/// example, a node built programmatically), the missing `xmlns` declaration is
/// added so the document reads back with the same qualified names.
///
/// ```rust
/// use cfgmodel_tree::{Node, QualifiedName, write};
///
/// let root = Node::new(QualifiedName::new(Some("urn:test"), "composite").unwrap());
/// root.set_attribute("name", Some("orders"));
/// assert_eq!(
///     write(&root).unwrap(),
///     r#"<composite name="orders" xmlns="urn:test"/>"#
/// );
/// ```
pub fn write(node: &Node) -> Result<String> {
    let mut buffer = Vec::new();
    write_to(node, &mut buffer, None)?;
    String::from_utf8(buffer).map_err(|e| Error::Write {
        message: e.to_string(),
    })
}

/// Serialize a tree with each element on its own line, indented by `indent` spaces.
pub fn write_pretty(node: &Node, indent: usize) -> Result<String> {
    let mut buffer = Vec::new();
    write_to(node, &mut buffer, Some(indent))?;
    String::from_utf8(buffer).map_err(|e| Error::Write {
        message: e.to_string(),
    })
}

/// Serialize a tree into any [`io::Write`] sink.
pub fn write_to<W: io::Write>(node: &Node, sink: W, indent: Option<usize>) -> Result<()> {
    let mut writer = match indent {
        Some(size) => Writer::new_with_indent(sink, b' ', size),
        None => Writer::new(sink),
    };
    let mut scopes: Vec<Vec<(String, String)>> = Vec::new();
    write_element(&mut writer, node, &mut scopes)
}

fn write_element<W: io::Write>(
    writer: &mut Writer<W>,
    node: &Node,
    scopes: &mut Vec<Vec<(String, String)>>,
) -> Result<()> {
    let name = node.qualified_name();
    let markup = name.markup_name();
    let mut attributes = node.attributes();

    let mut declared: Vec<(String, String)> = attributes
        .iter()
        .filter_map(|(key, value)| {
            if key == "xmlns" {
                Some((String::new(), value.clone()))
            } else {
                key.strip_prefix("xmlns:")
                    .map(|prefix| (prefix.to_string(), value.clone()))
            }
        })
        .collect();

    // Declare the element's namespace if nothing in scope binds it. A
    // declaration on the element itself that disagrees with its qualified
    // name is overwritten, never repeated.
    let prefix = name.prefix().unwrap_or("");
    let wanted = name.namespace().unwrap_or("");
    let in_scope = lookup(prefix, &declared, scopes).unwrap_or("");
    if in_scope != wanted {
        let key = if prefix.is_empty() {
            "xmlns".to_string()
        } else {
            format!("xmlns:{}", prefix)
        };
        match attributes.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, value)) => *value = wanted.to_string(),
            None => attributes.push((key, wanted.to_string())),
        }
        declared.retain(|(p, _)| p != prefix);
        declared.push((prefix.to_string(), wanted.to_string()));
    }

    let mut start = BytesStart::new(markup.as_str());
    for (key, value) in &attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    let children = node.children();
    let text = node.text();
    if children.is_empty() && text.is_none() {
        emit(writer, Event::Empty(start))?;
        return Ok(());
    }

    emit(writer, Event::Start(start))?;
    if let Some(text) = &text {
        emit(writer, Event::Text(BytesText::new(text)))?;
    }
    scopes.push(declared);
    for child in &children {
        write_element(writer, child, scopes)?;
    }
    scopes.pop();
    emit(writer, Event::End(BytesEnd::new(markup.as_str())))
}

fn lookup<'s>(
    prefix: &str,
    own: &'s [(String, String)],
    scopes: &'s [Vec<(String, String)>],
) -> Option<&'s str> {
    std::iter::once(own)
        .chain(scopes.iter().rev().map(Vec::as_slice))
        .find_map(|scope| scope.iter().rev().find(|(p, _)| p == prefix))
        .map(|(_, uri)| uri.as_str())
}

fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event).map_err(|e| Error::Write {
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QualifiedName, parse};

    #[test]
    fn test_write_empty_element() {
        let root = Node::new(QualifiedName::local("root").unwrap());
        assert_eq!(write(&root).unwrap(), "<root/>");
    }

    #[test]
    fn test_write_escapes_text_and_attributes() {
        let root = Node::new(QualifiedName::local("property").unwrap());
        root.set_attribute("name", Some("a\"b"));
        root.set_text(Some("x < y & z"));
        insta::assert_snapshot!(
            write(&root).unwrap(),
            @r#"<property name="a&quot;b">x &lt; y &amp; z</property>"#
        );
    }

    #[test]
    fn test_write_preserves_parsed_document() {
        let source = r#"<sca:composite xmlns:sca="urn:sca" name="c"><sca:component name="a"><sca:reference name="r" requires="x y"/></sca:component></sca:composite>"#;
        let root = parse(source).unwrap();
        assert_eq!(write(&root).unwrap(), source);
    }

    #[test]
    fn test_write_declares_missing_child_namespace() {
        let root = parse(r#"<composite xmlns="urn:sca"/>"#).unwrap();
        let child = Node::new(QualifiedName::new(Some("urn:java"), "interface.java").unwrap());
        root.append_child(&child).unwrap();
        let same_ns = Node::new(QualifiedName::new(Some("urn:sca"), "component").unwrap());
        root.append_child(&same_ns).unwrap();

        insta::assert_snapshot!(
            write(&root).unwrap(),
            @r#"<composite xmlns="urn:sca"><interface.java xmlns="urn:java"/><component/></composite>"#
        );
    }

    #[test]
    fn test_written_document_reads_back() {
        let root = Node::new(QualifiedName::new(Some("urn:sca"), "composite").unwrap());
        let component = Node::new(QualifiedName::new(Some("urn:sca"), "component").unwrap());
        component.set_attribute("name", Some("OrderService"));
        root.append_child(&component).unwrap();

        let reread = parse(&write(&root).unwrap()).unwrap();
        let child = reread.child(0).unwrap();
        assert_eq!(child.qualified_name(), component.qualified_name());
        assert_eq!(child.attribute("name").as_deref(), Some("OrderService"));
    }

    #[test]
    fn test_stale_default_declaration_is_overwritten() {
        let root = Node::new(QualifiedName::local("root").unwrap());
        root.set_attribute("xmlns", Some("urn:x"));
        let written = write(&root).unwrap();
        assert_eq!(written, r#"<root xmlns=""/>"#);
        assert_eq!(parse(&written).unwrap().qualified_name(), root.qualified_name());
    }

    #[test]
    fn test_rewritten_declaration_reads_back() {
        let root = parse(r#"<composite xmlns="urn:sca" name="c"><component/></composite>"#).unwrap();
        root.set_attribute("xmlns", Some("urn:other"));

        let written = write(&root).unwrap();
        assert_eq!(
            written,
            r#"<composite xmlns="urn:sca" name="c"><component/></composite>"#
        );
        let reread = parse(&written).unwrap();
        assert_eq!(reread.qualified_name(), root.qualified_name());
        assert_eq!(
            reread.child(0).unwrap().qualified_name(),
            root.child(0).unwrap().qualified_name()
        );
    }

    #[test]
    fn test_stale_prefixed_declaration_is_overwritten() {
        let root = parse(r#"<sca:composite xmlns:sca="urn:sca"/>"#).unwrap();
        root.set_attribute("xmlns:sca", Some("urn:other"));
        let written = write(&root).unwrap();
        assert_eq!(written, r#"<sca:composite xmlns:sca="urn:sca"/>"#);
        assert!(parse(&written).is_ok());
    }

    #[test]
    fn test_write_pretty_puts_children_on_lines() {
        let root = parse("<a><b/><c/></a>").unwrap();
        let pretty = write_pretty(&root, 2).unwrap();
        let lines: Vec<_> = pretty.lines().collect();
        assert_eq!(lines, vec!["<a>", "  <b/>", "  <c/>", "</a>"]);
    }
}
