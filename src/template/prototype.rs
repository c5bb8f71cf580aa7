//! Entry prototypes: validated markup that is instantiated once per entry

use thiserror::Error;

use crate::dom::{Document, NodeId, NodeKind};
use crate::html::{self, Fragment, Markup};
use crate::ParseError;

use super::placeholder::PlaceholderTemplate;

/// Errors raised while validating or instantiating a prototype
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrototypeError {
    /// The rendered prototype is not well-formed markup
    #[error("invalid prototype markup: {}", format_parse_errors(.errors))]
    Markup {
        markup: String,
        errors: Vec<ParseError>,
    },

    /// The rendered prototype does not have exactly one root element
    #[error(
        "prototype must contain exactly one top-level element, found {elements} element(s) and {other} other node(s)"
    )]
    TopLevel { elements: usize, other: usize },

    /// The root element is a void element, so nothing can be appended to it
    #[error("prototype root <{tag}> is a void element and cannot hold a remove control")]
    VoidRoot { tag: String },
}

impl PrototypeError {
    /// Render markup errors with source context
    pub fn report(&self) -> String {
        match self {
            PrototypeError::Markup { markup, errors } => errors
                .iter()
                .map(|e| e.format(markup, "prototype"))
                .collect::<Vec<_>>()
                .join("\n"),
            other => other.to_string(),
        }
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Check the single-root rule on a parsed fragment, returning the root's tag name
fn check_single_root(fragment: &Fragment) -> Result<String, PrototypeError> {
    let (elements, other) =
        fragment
            .significant_nodes()
            .fold((0, 0), |(elements, other), node| match node.node {
                Markup::Element { .. } => (elements + 1, other),
                _ => (elements, other + 1),
            });
    let root = fragment.significant_nodes().find_map(|node| match &node.node {
        Markup::Element { tag, .. } => Some(tag.name.clone()),
        _ => None,
    });
    match root {
        Some(name) if elements == 1 && other == 0 => Ok(name),
        _ => Err(PrototypeError::TopLevel { elements, other }),
    }
}

/// Markup for one entry with its placeholder holes
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    markup: String,
    template: PlaceholderTemplate,
    root_tag: String,
}

impl Prototype {
    /// Parse and validate a prototype
    ///
    /// Validation renders the prototype for index 0 and requires the trimmed
    /// result to be well-formed with exactly one top-level element. Holes only
    /// ever expand to digits and the new-entry label, so the shape does not
    /// depend on the index.
    pub fn parse(markup: &str) -> Result<Self, PrototypeError> {
        let template = PlaceholderTemplate::parse(markup);
        let sample = template.render(0);
        let sample = sample.trim();
        let fragment = html::parse(sample).map_err(|errors| PrototypeError::Markup {
            markup: sample.to_string(),
            errors,
        })?;
        let root_tag = check_single_root(&fragment)?;

        Ok(Self {
            markup: markup.to_string(),
            template,
            root_tag,
        })
    }

    /// Lowercase tag name of the root element
    pub fn root_tag(&self) -> &str {
        &self.root_tag
    }

    /// Require a root element that can take appended children
    pub fn check_holds_children(&self) -> Result<(), PrototypeError> {
        if html::is_void_element(&self.root_tag) {
            return Err(PrototypeError::VoidRoot {
                tag: self.root_tag.clone(),
            });
        }
        Ok(())
    }

    /// The prototype as written, holes included
    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn template(&self) -> &PlaceholderTemplate {
        &self.template
    }

    /// Markup for the entry at `index`, trimmed
    pub fn render(&self, index: usize) -> String {
        self.template.render(index).trim().to_string()
    }

    /// Build the entry at `index` as a detached element
    ///
    /// The markup is parsed into an inert fragment first; the single root
    /// element is then taken out of it and returned without a parent.
    pub fn instantiate(&self, doc: &mut Document, index: usize) -> Result<NodeId, PrototypeError> {
        let rendered = self.render(index);
        let fragment = doc
            .parse_fragment(&rendered)
            .map_err(|errors| PrototypeError::Markup {
                markup: rendered.clone(),
                errors,
            })?;

        let significant: Vec<NodeId> = doc
            .children(fragment)
            .iter()
            .copied()
            .filter(|n| !matches!(doc.kind(*n), NodeKind::Text(t) if t.trim().is_empty()))
            .collect();
        let elements = significant.iter().filter(|n| doc.is_element(**n)).count();

        match significant.as_slice() {
            [root] if elements == 1 => {
                doc.detach(*root);
                Ok(*root)
            }
            _ => Err(PrototypeError::TopLevel {
                elements,
                other: significant.len() - elements,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_instantiate_substitutes_index() {
        let prototype = Prototype::parse(
            r#"  <div class="entry"><label>__name__label__</label><input name="f[__name__]"></div>
"#,
        )
        .expect("Should parse");

        let mut doc = Document::new();
        let entry = prototype.instantiate(&mut doc, 4).expect("Should instantiate");

        assert_eq!(doc.parent(entry), None);
        assert_eq!(
            doc.outer_html(entry),
            r#"<div class="entry"><label>!New! 4</label><input name="f[4]"></div>"#
        );
    }

    #[test]
    fn test_render_is_trimmed() {
        let prototype = Prototype::parse("\n <p>__name__</p> \n").unwrap();
        assert_eq!(prototype.render(1), "<p>1</p>");
        assert_eq!(prototype.markup(), "\n <p>__name__</p> \n");
    }

    #[test]
    fn test_empty_prototype_rejected() {
        assert_eq!(
            Prototype::parse("   "),
            Err(PrototypeError::TopLevel {
                elements: 0,
                other: 0
            })
        );
    }

    #[test]
    fn test_multiple_roots_rejected() {
        assert_eq!(
            Prototype::parse("<p>a</p>\n<p>b</p>"),
            Err(PrototypeError::TopLevel {
                elements: 2,
                other: 0
            })
        );
    }

    #[test]
    fn test_text_only_rejected() {
        assert_eq!(
            Prototype::parse("just text"),
            Err(PrototypeError::TopLevel {
                elements: 0,
                other: 1
            })
        );
    }

    #[test]
    fn test_void_root_cannot_hold_children() {
        let prototype = Prototype::parse(r#"<input name="tags[__name__]">"#).expect("Should parse");
        assert_eq!(prototype.root_tag(), "input");
        assert_eq!(
            prototype.check_holds_children(),
            Err(PrototypeError::VoidRoot {
                tag: "input".to_string()
            })
        );

        let prototype = Prototype::parse("<div/>").expect("Should parse");
        assert_eq!(prototype.check_holds_children(), Ok(()));
    }

    #[test]
    fn test_malformed_markup_reported() {
        let err = Prototype::parse("<div><span></div>").unwrap_err();
        assert!(matches!(err, PrototypeError::Markup { .. }));
        assert!(err.report().contains("prototype"));
    }
}
