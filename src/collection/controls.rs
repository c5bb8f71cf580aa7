//! Generated add and remove buttons

use crate::config::Lang;
use crate::dom::{Document, DomError, NodeId};

use super::action::EntryAction;

/// Marker attribute carried by every generated control
pub const ACTION_ATTR: &str = "data-entry-action";

/// Per-container overrides for the add control
pub const ADD_LABEL_ATTR: &str = "data-entry-add-label";
pub const ADD_CLASS_ATTR: &str = "data-entry-add-class";

/// Per-container overrides for remove controls
pub const REMOVE_LABEL_ATTR: &str = "data-entry-remove-label";
pub const REMOVE_CLASS_ATTR: &str = "data-entry-remove-class";

pub const DEFAULT_ADD_CLASS: &str = "btn btn-primary btn-sm mt-2";
pub const DEFAULT_REMOVE_CLASS: &str = "btn btn-danger btn-sm";

/// Create a detached `<button type="button">` carrying the action marker
pub fn button(
    doc: &mut Document,
    label: &str,
    action: EntryAction,
    class: &str,
) -> Result<NodeId, DomError> {
    let button = doc.create_element("button");
    doc.set_attr(button, "type", "button")?;
    doc.set_attr(button, "class", class)?;
    doc.set_attr(button, ACTION_ATTR, action.as_str())?;
    let text = doc.create_text(label);
    doc.append_child(button, text)?;
    Ok(button)
}

/// Whether `node` is a generated control for `action`
pub fn is_control(doc: &Document, node: NodeId, action: EntryAction) -> bool {
    doc.attr(node, ACTION_ATTR) == Some(action.as_str())
}

/// Label and class a container asks for on one kind of control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlStyle {
    pub label: String,
    pub class: String,
}

impl ControlStyle {
    /// Read the container's override attributes, falling back to defaults
    ///
    /// The label is the configured word followed by a space and the custom
    /// label, so a container without a custom label yields e.g. `"Add "`.
    /// An empty class attribute counts as absent.
    pub fn for_action(doc: &Document, container: NodeId, action: EntryAction, lang: &Lang) -> Self {
        let (label_attr, class_attr, word, default_class) = match action {
            EntryAction::Add => (ADD_LABEL_ATTR, ADD_CLASS_ATTR, &lang.add, DEFAULT_ADD_CLASS),
            EntryAction::Remove => (
                REMOVE_LABEL_ATTR,
                REMOVE_CLASS_ATTR,
                &lang.remove,
                DEFAULT_REMOVE_CLASS,
            ),
        };

        let custom = doc.attr(container, label_attr).unwrap_or_default();
        let class = doc
            .attr(container, class_attr)
            .filter(|c| !c.is_empty())
            .unwrap_or(default_class);

        Self {
            label: format!("{} {}", word, custom),
            class: class.to_string(),
        }
    }

    pub fn build(&self, doc: &mut Document, action: EntryAction) -> Result<NodeId, DomError> {
        button(doc, &self.label, action, &self.class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn container(doc: &mut Document, attrs: &[(&str, &str)]) -> NodeId {
        let node = doc.create_element("div");
        for (name, value) in attrs {
            doc.set_attr(node, name, *value).unwrap();
        }
        node
    }

    #[test]
    fn test_button_markup() {
        let mut doc = Document::new();
        let node = button(&mut doc, "Add ", EntryAction::Add, "btn").unwrap();
        assert_eq!(
            doc.outer_html(node),
            r#"<button type="button" class="btn" data-entry-action="add">Add </button>"#
        );
        assert!(is_control(&doc, node, EntryAction::Add));
        assert!(!is_control(&doc, node, EntryAction::Remove));
    }

    #[test]
    fn test_default_style() {
        let mut doc = Document::new();
        let c = container(&mut doc, &[]);
        let style = ControlStyle::for_action(&doc, c, EntryAction::Add, &Lang::default());
        assert_eq!(style.label, "Add ");
        assert_eq!(style.class, DEFAULT_ADD_CLASS);

        let style = ControlStyle::for_action(&doc, c, EntryAction::Remove, &Lang::default());
        assert_eq!(style.label, "Remove ");
        assert_eq!(style.class, DEFAULT_REMOVE_CLASS);
    }

    #[test]
    fn test_container_overrides() {
        let mut doc = Document::new();
        let c = container(
            &mut doc,
            &[
                (ADD_LABEL_ATTR, "a tag"),
                (ADD_CLASS_ATTR, "btn-add"),
                (REMOVE_LABEL_ATTR, "this tag"),
                (REMOVE_CLASS_ATTR, ""),
            ],
        );
        let lang = Lang {
            add: "Ajouter".to_string(),
            remove: "Supprimer".to_string(),
        };

        let add = ControlStyle::for_action(&doc, c, EntryAction::Add, &lang);
        assert_eq!(add.label, "Ajouter a tag");
        assert_eq!(add.class, "btn-add");

        let remove = ControlStyle::for_action(&doc, c, EntryAction::Remove, &lang);
        assert_eq!(remove.label, "Supprimer this tag");
        assert_eq!(remove.class, DEFAULT_REMOVE_CLASS);
    }
}
