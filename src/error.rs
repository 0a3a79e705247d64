//! Error taxonomy for the Agora core (spec §7).
//!
//! A single [`CoreError`] enum covers the four failure classes and a
//! crate-wide [`Result`] alias threads it through every layer. Validation,
//! NotFound, and PreconditionFailed propagate unchanged; StoreFailure is the
//! only class re-wrapped with added context (the failing operation + node
//! type) while preserving the underlying `anyhow::Error` source chain.

use crate::neo4j::models::NodeType;
use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

/// The four failure classes every service operation can surface.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input rejected before any store access (empty required text, >3
    /// categories, empty id/user, out-of-range composition size, duplicate
    /// word).
    #[error("validation error: {0}")]
    Validation(String),

    /// An id did not resolve. Carries the node type and id so callers can
    /// map to the right client-facing status.
    #[error("{node_type} not found: {id}")]
    NotFound { node_type: NodeType, id: String },

    /// A required precondition was not met (content vote on an
    /// inclusion-only type, vote on a node that hasn't passed inclusion,
    /// dependent creation under an unqualified parent, ineligible
    /// category/keyword). The message always names the unmet condition.
    #[error("precondition failed: {0}")]
    PreconditionFailed(String),

    /// Any unexpected error from the underlying store, wrapped with a stable
    /// prefix identifying the failing operation and type name. The source
    /// chain is preserved, never swallowed.
    #[error("store failure during {op} ({node_type}): {source}")]
    Store {
        op: &'static str,
        node_type: NodeType,
        #[source]
        source: anyhow::Error,
    },
}

impl CoreError {
    /// Build a [`CoreError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }

    /// Build a [`CoreError::PreconditionFailed`].
    pub fn precondition(msg: impl Into<String>) -> Self {
        CoreError::PreconditionFailed(msg.into())
    }

    /// Build a [`CoreError::NotFound`] for the given node type and id.
    pub fn not_found(node_type: NodeType, id: impl Into<String>) -> Self {
        CoreError::NotFound {
            node_type,
            id: id.into(),
        }
    }

    /// Wrap a store-boundary error with the operation and node type.
    pub fn store(op: &'static str, node_type: NodeType, source: anyhow::Error) -> Self {
        CoreError::Store {
            op,
            node_type,
            source,
        }
    }
}
