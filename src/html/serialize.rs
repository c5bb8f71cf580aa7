//! HTML generation from document nodes

use crate::dom::{Document, NodeId, NodeKind};

use super::ast::is_void_element;

/// Serialize a node and its subtree
///
/// Document and fragment nodes serialize as the concatenation of their
/// children.
pub fn outer_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

/// Serialize only the children of a node
pub fn inner_html(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    for child in doc.children(node) {
        write_node(doc, *child, &mut out);
    }
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.kind(node) {
        NodeKind::Document | NodeKind::Fragment => {
            for child in doc.children(node) {
                write_node(doc, *child, out);
            }
        }
        NodeKind::Text(text) => out.push_str(&escape_text(text)),
        NodeKind::Comment(comment) => {
            out.push_str("<!--");
            out.push_str(comment);
            out.push_str("-->");
        }
        NodeKind::Element(element) => {
            out.push('<');
            out.push_str(element.tag_name());
            for (name, value) in element.attributes() {
                out.push(' ');
                out.push_str(name);
                if !value.is_empty() {
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(value));
                    out.push('"');
                }
            }
            out.push('>');

            if is_void_element(element.tag_name()) {
                return;
            }
            for child in doc.children(node) {
                write_node(doc, *child, out);
            }
            out.push_str("</");
            out.push_str(element.tag_name());
            out.push('>');
        }
    }
}

/// Escape text content
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a double-quoted attribute value
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn test_escape_attribute() {
        assert_eq!(
            escape_attribute(r#"<p class="x">"#),
            "&lt;p class=&quot;x&quot;&gt;"
        );
    }

    #[test]
    fn test_serialize_parsed_page() {
        let doc = Document::parse(r#"<form><input name="a" required><!--c--><p>x &amp; y</p></form>"#)
            .expect("Should parse");
        insta::assert_snapshot!(
            outer_html(&doc, doc.root()),
            @r#"<form><input name="a" required><!--c--><p>x &amp; y</p></form>"#
        );
    }

    #[test]
    fn test_prototype_attribute_is_reescaped() {
        let doc = Document::parse(r#"<div data-prototype="&lt;p&gt;__name__&lt;/p&gt;"></div>"#)
            .expect("Should parse");
        assert_eq!(
            outer_html(&doc, doc.root()),
            r#"<div data-prototype="&lt;p&gt;__name__&lt;/p&gt;"></div>"#
        );
    }
}
