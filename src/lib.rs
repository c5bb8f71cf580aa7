//! Form Collections - add and remove repeated form entries in an HTML document
//!
//! This library provides a headless document model, an HTML fragment parser,
//! and a collection engine that manages containers of structurally identical
//! entries built from a `data-prototype` template.
//!
//! # Example
//!
//! ```rust
//! use form_collections::{ClickOutcome, CollectionsConfig, Page};
//!
//! let mut page = Page::load(
//!     r#"<form><div data-prototype="<p>__name__label__</p>"></div></form>"#,
//!     CollectionsConfig::default(),
//! )
//! .unwrap();
//!
//! let container = page.collections.collections()[0].container();
//! let outcome = page.collections.add(&mut page.document, container).unwrap();
//! assert!(matches!(outcome, ClickOutcome::Added { index: 0, .. }));
//! assert!(page.to_html().contains("<p>!New! 0"));
//! ```

pub mod collection;
pub mod config;
pub mod dom;
pub mod error;
pub mod html;
pub mod template;

pub use collection::{
    ClickOutcome, Collection, CollectionError, CollectionState, Collections, EntryAction,
    HookError, HookPhase, Hooks, RejectReason,
};
pub use config::{CollectionsConfig, ConfigError, Lang};
pub use dom::{Document, DomError, HostCapabilities, NodeId, NodeKind, Selector, SelectorError};
pub use error::ParseError;
pub use template::{Prototype, PrototypeError};

use thiserror::Error;

/// Errors that can occur while loading a page
#[derive(Debug, Error)]
pub enum PageError {
    /// Error while parsing the page markup
    #[error("parse errors: {}", format_parse_errors(.0))]
    Parse(Vec<ParseError>),

    /// Error while setting up collections
    #[error("collection error: {0}")]
    Collection(#[from] CollectionError),
}

impl From<Vec<ParseError>> for PageError {
    fn from(errors: Vec<ParseError>) -> Self {
        PageError::Parse(errors)
    }
}

fn format_parse_errors(errors: &[ParseError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// A parsed document together with its managed collections
#[derive(Debug)]
pub struct Page {
    pub document: Document,
    pub collections: Collections,
}

impl Page {
    /// Parse `source` and initialize collections in it
    pub fn load(source: &str, config: CollectionsConfig) -> Result<Self, PageError> {
        Self::load_with_capabilities(source, HostCapabilities::default(), config)
    }

    /// Like [`Page::load`], on a host with the given capabilities
    pub fn load_with_capabilities(
        source: &str,
        capabilities: HostCapabilities,
        config: CollectionsConfig,
    ) -> Result<Self, PageError> {
        let mut document = Document::parse_with_capabilities(source, capabilities)?;
        let collections = Collections::init(&mut document, config)?;
        Ok(Self {
            document,
            collections,
        })
    }

    /// Dispatch a click on `target`
    pub fn click(&mut self, target: NodeId) -> Result<ClickOutcome, CollectionError> {
        self.collections.click(&mut self.document, target)
    }

    /// Serialize the current document
    pub fn to_html(&self) -> String {
        self.document.to_html()
    }
}
