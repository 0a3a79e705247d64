//! Eligibility policy: pure predicates over denormalized vote counters.
//!
//! No side effects. Callers read the node's current counters and apply
//! these before allowing an operation.

use crate::neo4j::models::NodeType;

/// Net inclusion votes a node must exceed to count as part of the graph.
pub const INCLUSION_THRESHOLD: i64 = 0;
/// Net inclusion votes a word must exceed to compose a category.
pub const CATEGORY_COMPOSITION_THRESHOLD: i64 = 0;
/// Net inclusion votes a word must exceed before new definitions attach.
pub const DEFINITION_CREATION_THRESHOLD: i64 = 0;

/// Whether the community has accepted this node into the graph.
pub fn has_passed_inclusion(inclusion_net: i64) -> bool {
    inclusion_net > INCLUSION_THRESHOLD
}

/// Content (quality) voting unlocks only for types that support it, and
/// only once inclusion has passed.
pub fn content_voting_allowed(node_type: NodeType, inclusion_net: i64) -> bool {
    node_type.supports_content_voting() && has_passed_inclusion(inclusion_net)
}

/// Whether a child node may be created beneath a parent with this net
/// inclusion count.
pub fn dependent_creation_allowed(parent_inclusion_net: i64) -> bool {
    parent_inclusion_net > 0
}
