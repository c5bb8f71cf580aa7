//! Entry templates
//!
//! A collection container carries the markup for one entry in its
//! `data-prototype` attribute. Two placeholder tokens may appear in it:
//!
//! ```text
//! <div>
//!     <label>__name__label__</label>
//!     <input name="order[items][__name__][sku]">
//! </div>
//! ```
//!
//! Instantiating the prototype for index `3` replaces `__name__label__` with
//! `!New! 3` and `__name__` with `3`, then parses the result into a detached
//! element.

mod placeholder;
mod prototype;

pub use placeholder::{
    Placeholder, PlaceholderTemplate, Segment, LABEL_PLACEHOLDER, NAME_PLACEHOLDER,
    NEW_ENTRY_MARKER,
};
pub use prototype::{Prototype, PrototypeError};
