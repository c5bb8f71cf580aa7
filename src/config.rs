//! Configuration for collection management
//!
//! Settings can be built in code or loaded from TOML:
//!
//! ```toml
//! collections_selector = "form .collection"
//! manage_remove_entry = true
//! max_elements = 5
//!
//! [lang]
//! add = "Ajouter"
//! remove = "Supprimer"
//! ```

use std::num::NonZeroUsize;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::collection::{HookError, Hooks};
use crate::dom::{Document, NodeId};

/// Containers a default configuration manages
pub const DEFAULT_COLLECTIONS_SELECTOR: &str = "form div[data-prototype]";

/// Errors that can occur when loading configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Words used on the generated buttons
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Lang {
    pub add: String,
    pub remove: String,
}

impl Default for Lang {
    fn default() -> Self {
        Self {
            add: "Add".to_string(),
            remove: "Remove".to_string(),
        }
    }
}

/// TOML structure for deserializing configuration
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    collections_selector: Option<String>,
    manage_remove_entry: Option<bool>,
    max_elements: Option<NonZeroUsize>,
    lang: Option<Lang>,
}

/// Configuration options for [`Collections::init`](crate::Collections::init)
#[derive(Debug)]
pub struct CollectionsConfig {
    /// Selector for collection containers
    pub collections_selector: String,

    /// Whether entries get a remove button
    pub manage_remove_entry: bool,

    /// Button labels
    pub lang: Lang,

    /// Upper bound on entries per collection; `None` means unlimited
    pub max_elements: Option<NonZeroUsize>,

    /// Callbacks run after adds and removes
    pub hooks: Hooks,
}

impl Default for CollectionsConfig {
    fn default() -> Self {
        Self {
            collections_selector: DEFAULT_COLLECTIONS_SELECTOR.to_string(),
            manage_remove_entry: true,
            lang: Lang::default(),
            max_elements: None,
            hooks: Hooks::default(),
        }
    }
}

impl CollectionsConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string; missing keys keep defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let defaults = Self::default();

        Ok(Self {
            collections_selector: parsed
                .collections_selector
                .unwrap_or(defaults.collections_selector),
            manage_remove_entry: parsed
                .manage_remove_entry
                .unwrap_or(defaults.manage_remove_entry),
            lang: parsed.lang.unwrap_or(defaults.lang),
            max_elements: parsed.max_elements,
            hooks: defaults.hooks,
        })
    }

    /// Set the container selector
    pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
        self.collections_selector = selector.into();
        self
    }

    /// Set whether remove buttons are managed
    pub fn with_manage_remove_entry(mut self, manage: bool) -> Self {
        self.manage_remove_entry = manage;
        self
    }

    /// Set the button labels
    pub fn with_lang(mut self, add: impl Into<String>, remove: impl Into<String>) -> Self {
        self.lang = Lang {
            add: add.into(),
            remove: remove.into(),
        };
        self
    }

    /// Cap the number of entries; `0` removes the cap
    pub fn with_max_elements(mut self, max: usize) -> Self {
        self.max_elements = NonZeroUsize::new(max);
        self
    }

    /// Set the hook run after an entry is built
    pub fn with_after_add<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Document, NodeId, NodeId) -> Result<(), HookError> + 'static,
    {
        self.hooks = self.hooks.with_after_add(hook);
        self
    }

    /// Set the hook run after an entry is removed
    pub fn with_after_remove<F>(mut self, hook: F) -> Self
    where
        F: FnMut(&mut Document, NodeId, NodeId) -> Result<(), HookError> + 'static,
    {
        self.hooks = self.hooks.with_after_remove(hook);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = CollectionsConfig::default();
        assert_eq!(config.collections_selector, "form div[data-prototype]");
        assert!(config.manage_remove_entry);
        assert_eq!(config.lang.add, "Add");
        assert_eq!(config.lang.remove, "Remove");
        assert_eq!(config.max_elements, None);
        assert!(!config.hooks.has_after_add());
        assert!(!config.hooks.has_after_remove());
    }

    #[test]
    fn test_builder_pattern() {
        let config = CollectionsConfig::new()
            .with_selector(".collection")
            .with_manage_remove_entry(false)
            .with_lang("Ajouter", "Supprimer")
            .with_max_elements(3)
            .with_after_add(|_, _, _| Ok(()));

        assert_eq!(config.collections_selector, ".collection");
        assert!(!config.manage_remove_entry);
        assert_eq!(config.lang.add, "Ajouter");
        assert_eq!(config.max_elements, NonZeroUsize::new(3));
        assert!(config.hooks.has_after_add());
    }

    #[test]
    fn test_zero_max_elements_is_unlimited() {
        let config = CollectionsConfig::new().with_max_elements(0);
        assert_eq!(config.max_elements, None);
    }

    #[test]
    fn test_parse_toml() {
        let toml_str = r#"
collections_selector = "form .collection"
max_elements = 5

[lang]
add = "Ajouter"
"#;
        let config = CollectionsConfig::from_str(toml_str).expect("Should parse");
        assert_eq!(config.collections_selector, "form .collection");
        assert!(config.manage_remove_entry);
        assert_eq!(config.max_elements, NonZeroUsize::new(5));
        assert_eq!(config.lang.add, "Ajouter");
        assert_eq!(config.lang.remove, "Remove");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CollectionsConfig::from_str("").expect("Should parse");
        assert_eq!(config.collections_selector, DEFAULT_COLLECTIONS_SELECTOR);
        assert_eq!(config.lang, Lang::default());
    }

    #[test]
    fn test_zero_max_elements_rejected_in_toml() {
        let result = CollectionsConfig::from_str("max_elements = 0");
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = CollectionsConfig::from_str("maxElements = 2");
        assert!(result.is_err());
    }
}
