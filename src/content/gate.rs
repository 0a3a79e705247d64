//! Dependent-creation gate: a child type may only be created beneath a
//! parent that has passed inclusion.
//!
//! The parent's net inclusion count is re-read at call time, never cached —
//! its vote state can change between reads.

use super::policy;
use crate::error::{CoreError, Result};
use crate::neo4j::models::NodeType;
use crate::neo4j::traits::GraphStore;

/// Check that the parent exists and has passed inclusion. Returns the
/// parent's current net inclusion count on success.
pub async fn ensure_parent_accepted(
    store: &dyn GraphStore,
    parent_type: NodeType,
    parent_id: &str,
) -> Result<i64> {
    if parent_id.trim().is_empty() {
        return Err(CoreError::validation("parent id must not be empty"));
    }

    let net = store
        .inclusion_net(parent_type, parent_id)
        .await
        .map_err(|e| CoreError::store("inclusion_net", parent_type, e))?
        .ok_or_else(|| CoreError::not_found(parent_type, parent_id))?;

    if policy::dependent_creation_allowed(net) {
        Ok(net)
    } else {
        Err(CoreError::precondition(format!(
            "{parent_type} {parent_id} has not passed inclusion (net {net}); \
             dependent creation requires a net-positive parent"
        )))
    }
}
