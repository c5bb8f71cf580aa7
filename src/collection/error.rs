use thiserror::Error;

use crate::dom::{DomError, NodeId, SelectorError};
use crate::template::PrototypeError;

use super::hooks::{HookError, HookPhase};

/// Errors from setting up or operating collections
#[derive(Debug, Error)]
pub enum CollectionError {
    #[error("invalid collections selector: {0}")]
    Selector(#[from] SelectorError),

    #[error("collection container {container} has no data-prototype attribute")]
    MissingPrototype { container: NodeId },

    #[error("invalid prototype on collection container {container}: {source}")]
    Prototype {
        container: NodeId,
        #[source]
        source: PrototypeError,
    },

    /// The container already holds generated controls, e.g. from an earlier setup
    #[error("collection container {container} already has entry controls")]
    ControlsPresent { container: NodeId },

    #[error("document error: {0}")]
    Dom(#[from] DomError),

    #[error("{phase} hook failed: {source}")]
    Hook {
        phase: HookPhase,
        #[source]
        source: HookError,
    },
}
