//! Collection setup and click handling

use tracing::{debug, error, trace, warn};

use crate::config::CollectionsConfig;
use crate::dom::{Document, DomError, NodeId, Selector};
use crate::template::Prototype;

use super::action::EntryAction;
use super::controls::{is_control, ControlStyle, ACTION_ATTR};
use super::error::CollectionError;
use super::hooks::HookPhase;
use super::state::CollectionState;

/// Attribute holding the entry prototype markup
pub const PROTOTYPE_ATTR: &str = "data-prototype";

/// Attribute mirroring the next entry index
pub const ENTRY_INDEX_ATTR: &str = "data-entry-index";

/// Why an add was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// The collection already holds `max_elements` entries
    AtCapacity,
    /// The add control carries the `disabled` attribute
    ControlDisabled,
}

/// Result of dispatching a click
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The target is not a control of any managed collection
    Ignored,
    Added { entry: NodeId, index: usize },
    Removed { entry: NodeId },
    Rejected(RejectReason),
}

/// One managed container
#[derive(Debug, Clone)]
pub struct Collection {
    container: NodeId,
    prototype: Prototype,
    add_control: NodeId,
    remove_style: ControlStyle,
    state: CollectionState,
}

impl Collection {
    pub fn container(&self) -> NodeId {
        self.container
    }

    pub fn prototype(&self) -> &Prototype {
        &self.prototype
    }

    /// The add control created at setup
    pub fn add_control(&self) -> NodeId {
        self.add_control
    }

    pub fn state(&self) -> &CollectionState {
        &self.state
    }

    pub fn entries(&self) -> &[NodeId] {
        self.state.entries()
    }

    pub fn next_index(&self) -> usize {
        self.state.next_index()
    }

    /// The remove control inside `entry`, if it has one
    pub fn remove_control(&self, doc: &Document, entry: NodeId) -> Option<NodeId> {
        doc.element_children(entry)
            .into_iter()
            .rev()
            .find(|c| is_control(doc, *c, EntryAction::Remove))
    }

    fn sync_index(&self, doc: &mut Document) -> Result<(), DomError> {
        doc.set_attr(
            self.container,
            ENTRY_INDEX_ATTR,
            self.state.next_index().to_string(),
        )
    }
}

/// The set of collections managed in one document
///
/// The manager owns the configuration (hooks included) and the per-container
/// state. It never holds the document: every operation borrows it, so the
/// caller stays free to inspect or edit the tree between clicks.
#[derive(Debug)]
pub struct Collections {
    config: CollectionsConfig,
    collections: Vec<Collection>,
}

impl Collections {
    /// Find every container matching the configured selector and set it up
    ///
    /// All containers are validated before any of them is modified, so a
    /// failure leaves the document untouched. On a host without template
    /// support the problem is logged and an empty manager is returned.
    pub fn init(doc: &mut Document, config: CollectionsConfig) -> Result<Self, CollectionError> {
        let mut manager = Self {
            config,
            collections: Vec::new(),
        };

        if !doc.supports_templates() {
            error!("HTML templates are not supported by this host; collections are left unmanaged");
            return Ok(manager);
        }

        let selector = Selector::parse(&manager.config.collections_selector)?;
        let containers = doc.query_selector_all(doc.root(), &selector);
        if containers.is_empty() {
            debug!(selector = selector.as_str(), "no collection containers found");
            return Ok(manager);
        }

        // Entries are taken before any setup: a container nested as an entry of
        // another receives that collection's remove control
        let manage_remove = manager.config.manage_remove_entry;
        let validated = containers
            .iter()
            .map(|container| validate_container(doc, *container, manage_remove))
            .collect::<Result<Vec<_>, _>>()?;

        for (container, (prototype, entries)) in containers.into_iter().zip(validated) {
            let collection = manager.setup(doc, container, prototype, entries)?;
            manager.collections.push(collection);
        }

        debug!(count = manager.collections.len(), "collections initialized");
        Ok(manager)
    }

    fn setup(
        &self,
        doc: &mut Document,
        container: NodeId,
        prototype: Prototype,
        entries: Vec<NodeId>,
    ) -> Result<Collection, CollectionError> {
        let state = CollectionState::new(entries);
        doc.set_attr(container, ENTRY_INDEX_ATTR, state.next_index().to_string())?;

        let lang = &self.config.lang;
        let add_control =
            ControlStyle::for_action(doc, container, EntryAction::Add, lang).build(doc, EntryAction::Add)?;
        if state.is_at_capacity(self.config.max_elements) {
            doc.set_disabled(add_control, true)?;
        }
        doc.append_child(container, add_control)?;

        let remove_style = ControlStyle::for_action(doc, container, EntryAction::Remove, lang);
        if self.config.manage_remove_entry && !state.is_empty() {
            let template = remove_style.build(doc, EntryAction::Remove)?;
            for entry in state.entries() {
                let control = doc.clone_node(template, true);
                doc.append_child(*entry, control)?;
            }
        }

        trace!(%container, entries = state.len(), next_index = state.next_index(), "collection set up");
        Ok(Collection {
            container,
            prototype,
            add_control,
            remove_style,
            state,
        })
    }

    pub fn config(&self) -> &CollectionsConfig {
        &self.config
    }

    pub fn collections(&self) -> &[Collection] {
        &self.collections
    }

    /// The collection managing `container`
    pub fn collection(&self, container: NodeId) -> Option<&Collection> {
        self.collections.iter().find(|c| c.container == container)
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    /// Dispatch a click on `target`
    ///
    /// An add click belongs to the nearest managed container enclosing the
    /// target. A remove click belongs to the collection holding the target's
    /// parent as an entry, which matters when that entry is itself a
    /// container. Targets without a recognized action marker are ignored.
    pub fn click(&mut self, doc: &mut Document, target: NodeId) -> Result<ClickOutcome, CollectionError> {
        let Some(marker) = doc.attr(target, ACTION_ATTR) else {
            return Ok(ClickOutcome::Ignored);
        };
        let action = match marker.parse::<EntryAction>() {
            Ok(action) => action,
            Err(reason) => {
                trace!(%target, %reason, "ignoring click");
                return Ok(ClickOutcome::Ignored);
            }
        };

        match action {
            EntryAction::Add => match self.owning_collection(doc, target) {
                Some(position) => self.add_entry(doc, position, target),
                None => Ok(ClickOutcome::Ignored),
            },
            EntryAction::Remove => {
                let owner = doc
                    .parent(target)
                    .and_then(|entry| self.entry_owner(entry).map(|position| (position, entry)));
                match owner {
                    Some((position, entry)) => self.remove_entry(doc, position, entry),
                    None => Ok(ClickOutcome::Ignored),
                }
            }
        }
    }

    /// Click the add control of the collection managing `container`
    pub fn add(&mut self, doc: &mut Document, container: NodeId) -> Result<ClickOutcome, CollectionError> {
        match self.collection(container) {
            Some(collection) => {
                let control = collection.add_control;
                self.click(doc, control)
            }
            None => Ok(ClickOutcome::Ignored),
        }
    }

    /// Click the remove control inside `entry`
    pub fn remove(&mut self, doc: &mut Document, entry: NodeId) -> Result<ClickOutcome, CollectionError> {
        let control = self
            .entry_owner(entry)
            .and_then(|position| self.collections[position].remove_control(doc, entry));
        match control {
            Some(control) => self.click(doc, control),
            None => Ok(ClickOutcome::Ignored),
        }
    }

    fn owning_collection(&self, doc: &Document, target: NodeId) -> Option<usize> {
        let mut cursor = Some(target);
        while let Some(node) = cursor {
            if let Some(position) = self.collections.iter().position(|c| c.container == node) {
                return Some(position);
            }
            cursor = doc.parent(node);
        }
        None
    }

    fn entry_owner(&self, entry: NodeId) -> Option<usize> {
        self.collections.iter().position(|c| c.state.contains(entry))
    }

    /// Every add button owned by the collection at `position`, including
    /// ones copied by the caller but not those of nested collections
    fn add_controls(&self, doc: &Document, position: usize) -> Vec<NodeId> {
        doc.descendants(self.collections[position].container)
            .into_iter()
            .filter(|n| doc.tag_name(*n) == Some("button") && is_control(doc, *n, EntryAction::Add))
            .filter(|n| self.owning_collection(doc, *n) == Some(position))
            .collect()
    }

    fn add_entry(
        &mut self,
        doc: &mut Document,
        position: usize,
        add_control: NodeId,
    ) -> Result<ClickOutcome, CollectionError> {
        let max = self.config.max_elements;
        let manage_remove = self.config.manage_remove_entry;
        let collection = &mut self.collections[position];
        let container = collection.container;

        if doc.is_disabled(add_control) {
            debug!(%container, "add control is disabled");
            return Ok(ClickOutcome::Rejected(RejectReason::ControlDisabled));
        }
        if collection.state.is_at_capacity(max) {
            warn!(%container, next_index = collection.state.next_index(), "collection is full");
            return Ok(ClickOutcome::Rejected(RejectReason::AtCapacity));
        }

        let index = collection.state.begin_add();
        collection.sync_index(doc)?;

        let built = build_entry(doc, collection, index, manage_remove);
        let entry = match built {
            Ok(entry) => entry,
            Err(err) => {
                collection.state.cancel_add();
                collection.sync_index(doc)?;
                return Err(err);
            }
        };

        if let Err(source) = self.config.hooks.run(HookPhase::AfterAdd, doc, container, entry) {
            collection.state.cancel_add();
            collection.sync_index(doc)?;
            warn!(%container, index, "after-add hook failed; entry discarded");
            return Err(CollectionError::Hook {
                phase: HookPhase::AfterAdd,
                source,
            });
        }

        let full = max.map(|m| m.get() == index + 1).unwrap_or(false);
        doc.set_disabled(add_control, full)?;
        match doc.parent(add_control) {
            Some(parent) => doc.insert_before(parent, entry, Some(add_control))?,
            None => doc.append_child(container, entry)?,
        }
        collection.state.push_entry(entry);

        debug!(%container, %entry, index, "entry added");
        Ok(ClickOutcome::Added { entry, index })
    }

    fn remove_entry(
        &mut self,
        doc: &mut Document,
        position: usize,
        entry: NodeId,
    ) -> Result<ClickOutcome, CollectionError> {
        let max = self.config.max_elements;
        let collection = &mut self.collections[position];
        let container = collection.container;

        let remaining = collection.state.remove_entry(entry);
        collection.sync_index(doc)?;
        doc.detach(entry);

        if max.map(|m| remaining < m.get()).unwrap_or(true) {
            for control in self.add_controls(doc, position) {
                doc.set_disabled(control, false)?;
            }
        }

        debug!(%container, %entry, next_index = remaining, "entry removed");
        self.config
            .hooks
            .run(HookPhase::AfterRemove, doc, container, entry)
            .map_err(|source| CollectionError::Hook {
                phase: HookPhase::AfterRemove,
                source,
            })?;

        Ok(ClickOutcome::Removed { entry })
    }
}

/// Read and check a container's prototype and take its current entries,
/// without modifying anything
fn validate_container(
    doc: &Document,
    container: NodeId,
    manage_remove: bool,
) -> Result<(Prototype, Vec<NodeId>), CollectionError> {
    let markup = doc
        .attr(container, PROTOTYPE_ATTR)
        .ok_or(CollectionError::MissingPrototype { container })?;
    let prototype =
        Prototype::parse(markup).map_err(|source| CollectionError::Prototype { container, source })?;
    if manage_remove {
        prototype
            .check_holds_children()
            .map_err(|source| CollectionError::Prototype { container, source })?;
    }

    let has_controls = doc
        .descendants(container)
        .into_iter()
        .any(|n| doc.has_attr(n, ACTION_ATTR));
    if has_controls {
        return Err(CollectionError::ControlsPresent { container });
    }
    Ok((prototype, doc.element_children(container)))
}

/// Instantiate the entry for `index` with its remove control, still detached
fn build_entry(
    doc: &mut Document,
    collection: &Collection,
    index: usize,
    manage_remove: bool,
) -> Result<NodeId, CollectionError> {
    let entry = collection
        .prototype
        .instantiate(doc, index)
        .map_err(|source| CollectionError::Prototype {
            container: collection.container,
            source,
        })?;
    if manage_remove {
        let control = collection.remove_style.build(doc, EntryAction::Remove)?;
        doc.append_child(entry, control)?;
    }
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const PAGE: &str = r#"<form><div id="items" data-prototype="<p>__name__label__ <input name=&quot;i[__name__]&quot;></p>"></div></form>"#;

    fn setup(config: CollectionsConfig) -> (Document, Collections, NodeId) {
        let mut doc = Document::parse(PAGE).expect("Should parse");
        let manager = Collections::init(&mut doc, config).expect("Should init");
        let container = manager.collections()[0].container();
        (doc, manager, container)
    }

    #[test]
    fn test_setup_appends_add_control() {
        let (doc, manager, container) = setup(CollectionsConfig::default());
        assert_eq!(manager.len(), 1);
        assert_eq!(doc.attr(container, ENTRY_INDEX_ATTR), Some("0"));
        let children = doc.element_children(container);
        assert_eq!(children, vec![manager.collections()[0].add_control()]);
    }

    #[test]
    fn test_add_inserts_before_control() {
        let (mut doc, mut manager, container) = setup(CollectionsConfig::default());
        let outcome = manager.add(&mut doc, container).unwrap();
        let ClickOutcome::Added { entry, index } = outcome else {
            panic!("expected an add, got {:?}", outcome);
        };
        assert_eq!(index, 0);
        assert_eq!(
            doc.outer_html(entry),
            r#"<p>!New! 0 <input name="i[0]"><button type="button" class="btn btn-danger btn-sm" data-entry-action="remove">Remove </button></p>"#
        );
        assert_eq!(doc.next_sibling(entry), Some(manager.collections()[0].add_control()));
        assert_eq!(doc.attr(container, ENTRY_INDEX_ATTR), Some("1"));
    }

    #[test]
    fn test_click_outside_is_ignored() {
        let (mut doc, mut manager, _) = setup(CollectionsConfig::default());
        let root = doc.root();
        assert_eq!(manager.click(&mut doc, root).unwrap(), ClickOutcome::Ignored);
    }

    #[test]
    fn test_remove_detached_entry_is_ignored() {
        let (mut doc, mut manager, container) = setup(CollectionsConfig::default());
        let ClickOutcome::Added { entry, .. } = manager.add(&mut doc, container).unwrap() else {
            panic!("expected an add");
        };
        let control = manager.collections()[0].remove_control(&doc, entry).unwrap();
        assert_eq!(
            manager.click(&mut doc, control).unwrap(),
            ClickOutcome::Removed { entry }
        );
        assert_eq!(manager.click(&mut doc, control).unwrap(), ClickOutcome::Ignored);
        assert_eq!(manager.collections()[0].next_index(), 0);
    }

    #[test]
    fn test_missing_prototype_on_custom_selector() {
        let mut doc = Document::parse(r#"<div class="c"></div>"#).unwrap();
        let config = CollectionsConfig::default().with_selector(".c");
        let err = Collections::init(&mut doc, config).unwrap_err();
        assert!(matches!(err, CollectionError::MissingPrototype { .. }));
    }

    #[test]
    fn test_invalid_selector() {
        let mut doc = Document::parse(PAGE).unwrap();
        let config = CollectionsConfig::default().with_selector("");
        let err = Collections::init(&mut doc, config).unwrap_err();
        assert!(matches!(err, CollectionError::Selector(_)));
    }
}
