//! Caller-supplied callbacks run after an entry is added or removed

use std::fmt;

use crate::dom::{Document, NodeId};

/// Error a hook may return to abort the operation it observes
pub type HookError = Box<dyn std::error::Error + Send + Sync>;

/// Callback receiving the document, the container and the entry
pub type EntryHook = Box<dyn FnMut(&mut Document, NodeId, NodeId) -> Result<(), HookError>>;

/// Which hook failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HookPhase {
    AfterAdd,
    AfterRemove,
}

impl fmt::Display for HookPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookPhase::AfterAdd => write!(f, "after-add"),
            HookPhase::AfterRemove => write!(f, "after-remove"),
        }
    }
}

/// The optional `after_add` / `after_remove` pair
#[derive(Default)]
pub struct Hooks {
    after_add: Option<EntryHook>,
    after_remove: Option<EntryHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("after_add", &self.after_add.is_some())
            .field("after_remove", &self.after_remove.is_some())
            .finish()
    }
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `hook` with the new entry before it is inserted
    ///
    /// The entry already carries its remove control, so the hook sees the
    /// final structure.
    pub fn with_after_add<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Document, NodeId, NodeId) -> Result<(), HookError> + 'static,
    {
        self.after_add = Some(Box::new(hook));
        self
    }

    /// Run `hook` with the entry after it has been detached
    pub fn with_after_remove<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Document, NodeId, NodeId) -> Result<(), HookError> + 'static,
    {
        self.after_remove = Some(Box::new(hook));
        self
    }

    pub fn has_after_add(&self) -> bool {
        self.after_add.is_some()
    }

    pub fn has_after_remove(&self) -> bool {
        self.after_remove.is_some()
    }

    pub(crate) fn run(
        &mut self,
        phase: HookPhase,
        doc: &mut Document,
        container: NodeId,
        entry: NodeId,
    ) -> Result<(), HookError> {
        let hook = match phase {
            HookPhase::AfterAdd => self.after_add.as_mut(),
            HookPhase::AfterRemove => self.after_remove.as_mut(),
        };
        match hook {
            Some(hook) => hook(doc, container, entry),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_missing_hook_is_noop() {
        let mut hooks = Hooks::new();
        let mut doc = Document::new();
        let root = doc.root();
        assert!(hooks.run(HookPhase::AfterAdd, &mut doc, root, root).is_ok());
        assert!(!hooks.has_after_add());
    }

    #[test]
    fn test_hook_receives_arguments() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut hooks = Hooks::new().with_after_remove(move |_, container, entry| {
            sink.borrow_mut().push((container, entry));
            Ok(())
        });

        let mut doc = Document::new();
        let container = doc.create_element("div");
        let entry = doc.create_element("p");
        hooks
            .run(HookPhase::AfterRemove, &mut doc, container, entry)
            .unwrap();

        assert_eq!(seen.borrow().as_slice(), &[(container, entry)]);
        assert!(hooks.has_after_remove());
    }

    #[test]
    fn test_debug_shows_presence() {
        let hooks = Hooks::new().with_after_add(|_, _, _| Ok(()));
        assert_eq!(
            format!("{:?}", hooks),
            "Hooks { after_add: true, after_remove: false }"
        );
    }
}
