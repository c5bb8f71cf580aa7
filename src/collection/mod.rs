//! Dynamic form collections
//!
//! A collection is a container element holding a list of entries plus an
//! add button. Each entry may carry a remove button. Entries are built from
//! the container's `data-prototype` markup.
//!
//! ```text
//! <div data-prototype="..." data-entry-index="2">
//!     <div>entry 0 <button data-entry-action="remove">Remove </button></div>
//!     <div>entry 1 <button data-entry-action="remove">Remove </button></div>
//!     <button data-entry-action="add">Add </button>
//! </div>
//! ```
//!
//! Clicks are dispatched through [`Collections::click`], which plays the role
//! of a single listener installed on each container.

mod action;
mod controller;
mod controls;
mod error;
mod hooks;
mod state;

pub use action::EntryAction;
pub use controller::{
    ClickOutcome, Collection, Collections, RejectReason, ENTRY_INDEX_ATTR, PROTOTYPE_ATTR,
};
pub use controls::{
    button, is_control, ControlStyle, ACTION_ATTR, ADD_CLASS_ATTR, ADD_LABEL_ATTR,
    DEFAULT_ADD_CLASS, DEFAULT_REMOVE_CLASS, REMOVE_CLASS_ATTR, REMOVE_LABEL_ATTR,
};
pub use error::CollectionError;
pub use hooks::{EntryHook, HookError, HookPhase, Hooks};
pub use state::CollectionState;
