//! Markup tree produced by the grammar

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Check whether a (lowercase) tag name is a void element
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(node: T, span: Span) -> Self {
        Self { node, span }
    }
}

/// A single `name="value"` pair on a start tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// An opening tag as seen by the lexer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartTag {
    /// Lowercase tag name
    pub name: String,
    /// Attributes in source order; later duplicates are dropped
    pub attributes: Vec<Attribute>,
    /// Written as `<tag ... />`
    pub self_closing: bool,
}

impl StartTag {
    /// Whether the grammar expects content and a matching end tag
    pub fn takes_children(&self) -> bool {
        !self.self_closing && !is_void_element(&self.name)
    }
}

/// A parsed markup node
#[derive(Debug, Clone, PartialEq)]
pub enum Markup {
    Element {
        tag: StartTag,
        children: Vec<Spanned<Markup>>,
    },
    Text(String),
    Comment(String),
}

impl Markup {
    /// Text consisting only of whitespace
    pub fn is_blank_text(&self) -> bool {
        matches!(self, Markup::Text(t) if t.trim().is_empty())
    }
}

/// Top-level sequence of markup nodes
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Fragment {
    pub nodes: Vec<Spanned<Markup>>,
}

impl Fragment {
    /// Top-level nodes other than whitespace-only text
    pub fn significant_nodes(&self) -> impl Iterator<Item = &Spanned<Markup>> {
        self.nodes.iter().filter(|n| !n.node.is_blank_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements() {
        assert!(is_void_element("input"));
        assert!(is_void_element("br"));
        assert!(!is_void_element("div"));
    }

    #[test]
    fn test_self_closing_takes_no_children() {
        let tag = StartTag {
            name: "span".to_string(),
            attributes: vec![],
            self_closing: true,
        };
        assert!(!tag.takes_children());
    }

    #[test]
    fn test_significant_nodes_skip_whitespace() {
        let fragment = Fragment {
            nodes: vec![
                Spanned::new(Markup::Text("\n  ".to_string()), 0..3),
                Spanned::new(Markup::Comment("c".to_string()), 3..11),
            ],
        };
        assert_eq!(fragment.significant_nodes().count(), 1);
    }
}
