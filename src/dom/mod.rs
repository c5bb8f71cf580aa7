//! Headless document model
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`]. Detaching a node only unlinks it from its parent: the node and
//! its subtree stay in the arena and remain inspectable, which is what lets a
//! removal hook look at an entry after it has left the tree.

mod error;
pub mod selector;

use std::fmt;

pub use error::{DomError, SelectorError};
pub use selector::Selector;

use crate::html::{self, Markup, Spanned};
use crate::ParseError;

/// Handle to a node in a [`Document`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    /// Parentless container for parsed template content
    Fragment,
    Element(Element),
    Text(String),
    Comment(String),
}

/// An element with its attributes in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag_name: String,
    attributes: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into().to_ascii_lowercase(),
            attributes: Vec::new(),
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(n, _)| n == name)
    }

    /// Set an attribute, keeping its position if it already exists
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((name, value)),
        }
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let pos = self.attributes.iter().position(|(n, _)| n == name)?;
        Some(self.attributes.remove(pos).1)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn has_class(&self, class_name: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_ascii_whitespace().any(|c| c == class_name))
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

/// Features the hosting environment provides
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HostCapabilities {
    /// Markup can be parsed into inert template content
    pub inert_templates: bool,
}

impl Default for HostCapabilities {
    fn default() -> Self {
        Self {
            inert_templates: true,
        }
    }
}

impl HostCapabilities {
    /// A host without inert template parsing
    pub fn without_templates() -> Self {
        Self {
            inert_templates: false,
        }
    }
}

/// An arena-backed document tree
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    capabilities: HostCapabilities,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document with default capabilities
    pub fn new() -> Self {
        Self::with_capabilities(HostCapabilities::default())
    }

    pub fn with_capabilities(capabilities: HostCapabilities) -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Document,
            }],
            root: NodeId(0),
            capabilities,
        }
    }

    /// Parse a page into a new document
    pub fn parse(source: &str) -> Result<Self, Vec<ParseError>> {
        Self::parse_with_capabilities(source, HostCapabilities::default())
    }

    pub fn parse_with_capabilities(
        source: &str,
        capabilities: HostCapabilities,
    ) -> Result<Self, Vec<ParseError>> {
        let fragment = html::parse(source)?;
        let mut doc = Self::with_capabilities(capabilities);
        let root = doc.root;
        doc.build(root, fragment.nodes);
        Ok(doc)
    }

    pub fn capabilities(&self) -> HostCapabilities {
        self.capabilities
    }

    pub fn supports_templates(&self) -> bool {
        self.capabilities.inert_templates
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever allocated, attached or not
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            kind,
        });
        id
    }

    /// Create a detached element
    pub fn create_element(&mut self, tag_name: &str) -> NodeId {
        self.alloc(NodeKind::Element(Element::new(tag_name)))
    }

    /// Create a detached text node
    pub fn create_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Text(text.into()))
    }

    pub fn create_comment(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Comment(text.into()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.alloc(NodeKind::Fragment)
    }

    /// Parse markup into a new detached fragment
    ///
    /// Nothing in the fragment is connected to the document tree until it is
    /// inserted.
    pub fn parse_fragment(&mut self, source: &str) -> Result<NodeId, Vec<ParseError>> {
        let fragment = html::parse(source)?;
        let id = self.create_fragment();
        self.build(id, fragment.nodes);
        Ok(id)
    }

    fn build(&mut self, parent: NodeId, nodes: Vec<Spanned<Markup>>) {
        for spanned in nodes {
            let child = match spanned.node {
                Markup::Text(text) => self.create_text(text),
                Markup::Comment(text) => self.create_comment(text),
                Markup::Element { tag, children } => {
                    let mut element = Element::new(tag.name);
                    for attr in tag.attributes {
                        element.set_attr(attr.name, attr.value);
                    }
                    let id = self.alloc(NodeKind::Element(element));
                    self.build(id, children);
                    id
                }
            };
            self.link(parent, child, None);
        }
    }

    pub fn kind(&self, node: NodeId) -> &NodeKind {
        &self.nodes[node.0].kind
    }

    pub fn element(&self, node: NodeId) -> Option<&Element> {
        match &self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn element_mut(&mut self, node: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[node.0].kind {
            NodeKind::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut_or_err(&mut self, node: NodeId) -> Result<&mut Element, DomError> {
        self.element_mut(node)
            .ok_or(DomError::NotAnElement { node })
    }

    pub fn is_element(&self, node: NodeId) -> bool {
        self.element(node).is_some()
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|e| e.tag_name())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node.0].parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.nodes[node.0].children
    }

    /// Element children only, in order
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes[node.0]
            .children
            .iter()
            .copied()
            .filter(|c| self.is_element(*c))
            .collect()
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node).and_then(|e| e.attr(name))
    }

    pub fn has_attr(&self, node: NodeId, name: &str) -> bool {
        self.element(node).map(|e| e.has_attr(name)).unwrap_or(false)
    }

    pub fn set_attr(
        &mut self,
        node: NodeId,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), DomError> {
        self.element_mut_or_err(node)?.set_attr(name, value);
        Ok(())
    }

    pub fn remove_attr(&mut self, node: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self.element_mut_or_err(node)?.remove_attr(name))
    }

    pub fn is_disabled(&self, node: NodeId) -> bool {
        self.has_attr(node, "disabled")
    }

    /// Toggle the boolean `disabled` attribute
    pub fn set_disabled(&mut self, node: NodeId, disabled: bool) -> Result<(), DomError> {
        let element = self.element_mut_or_err(node)?;
        if disabled {
            element.set_attr("disabled", "");
        } else {
            element.remove_attr("disabled");
        }
        Ok(())
    }

    /// Concatenated text of the node and its descendants
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.nodes[node.0].kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Comment(_) => String::new(),
            _ => self.nodes[node.0]
                .children
                .iter()
                .map(|c| self.text_content(*c))
                .collect(),
        }
    }

    /// Whether `node` is `ancestor` or lies inside it
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(current) = cursor {
            if current == ancestor {
                return true;
            }
            cursor = self.parent(current);
        }
        false
    }

    /// Whether the node is connected to the document root
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.contains(self.root, node)
    }

    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        let parent = self.parent(node)?;
        let siblings = &self.nodes[parent.0].children;
        let pos = siblings.iter().position(|c| *c == node)?;
        siblings.get(pos + 1).copied()
    }

    /// All descendants in document order, excluding the node itself
    pub fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.nodes[node.0].children.iter().rev().copied().collect();
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.nodes[current.0].children.iter().rev().copied());
        }
        out
    }

    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        self.insert_before(parent, child, None)
    }

    /// Insert `child` into `parent` before `reference`, or at the end
    ///
    /// The child is first detached from wherever it was. Inserting a fragment
    /// moves the fragment's children and leaves it empty.
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        child: NodeId,
        reference: Option<NodeId>,
    ) -> Result<(), DomError> {
        self.check_insertable(parent, child)?;
        if let Some(reference) = reference {
            if self.parent(reference) != Some(parent) {
                return Err(DomError::NotAChild {
                    parent,
                    node: reference,
                });
            }
        }
        let reference = if reference == Some(child) {
            self.next_sibling(child)
        } else {
            reference
        };

        let moved = if matches!(self.kind(child), NodeKind::Fragment) {
            let children = std::mem::take(&mut self.nodes[child.0].children);
            for c in &children {
                self.nodes[c.0].parent = None;
            }
            children
        } else {
            self.detach(child);
            vec![child]
        };

        for node in moved {
            // Each node lands right before the reference, after the ones already moved
            let anchor = reference.map(|r| {
                let siblings = &self.nodes[parent.0].children;
                siblings.iter().position(|c| *c == r).unwrap_or(siblings.len())
            });
            self.link(parent, node, anchor);
        }
        Ok(())
    }

    fn link(&mut self, parent: NodeId, child: NodeId, position: Option<usize>) {
        self.nodes[child.0].parent = Some(parent);
        let siblings = &mut self.nodes[parent.0].children;
        match position {
            Some(pos) if pos <= siblings.len() => siblings.insert(pos, child),
            _ => siblings.push(child),
        }
    }

    fn check_insertable(&self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        let reason = match (self.kind(parent), self.kind(child)) {
            (NodeKind::Text(_) | NodeKind::Comment(_), _) => Some("parent cannot have children"),
            (_, NodeKind::Document) => Some("a document cannot be inserted"),
            _ if self.contains(child, parent) => Some("node would contain itself"),
            _ => None,
        };
        match reason {
            Some(reason) => Err(DomError::HierarchyRequest {
                parent,
                child,
                reason,
            }),
            None => Ok(()),
        }
    }

    /// Unlink a node from its parent; the subtree stays intact
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != node);
        }
    }

    /// Copy a node, and with `deep` its whole subtree, as a detached node
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> NodeId {
        let kind = match &self.nodes[node.0].kind {
            NodeKind::Document => NodeKind::Fragment,
            other => other.clone(),
        };
        let copy = self.alloc(kind);
        if deep {
            let children = self.nodes[node.0].children.clone();
            for child in children {
                let child_copy = self.clone_node(child, true);
                self.link(copy, child_copy, None);
            }
        }
        copy
    }

    /// Descendants of `scope` matching the selector, in document order
    pub fn query_selector_all(&self, scope: NodeId, selector: &Selector) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|n| selector.matches(self, *n))
            .collect()
    }

    pub fn query_selector(&self, scope: NodeId, selector: &Selector) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|n| selector.matches(self, *n))
    }

    /// Serialize a node and its subtree
    pub fn outer_html(&self, node: NodeId) -> String {
        html::outer_html(self, node)
    }

    pub fn inner_html(&self, node: NodeId) -> String {
        html::inner_html(self, node)
    }

    /// Serialize the whole document
    pub fn to_html(&self) -> String {
        html::outer_html(self, self.root)
    }
}
