//! GraphStore trait definition
//!
//! Abstract interface for all graph store operations the core needs,
//! mirroring the public async methods of `Neo4jClient`. Enables testing
//! with the in-memory mock and future backend swaps.
//!
//! Methods return `anyhow::Result`; the service layer re-wraps failures
//! into the `CoreError` taxonomy with operation context.

use crate::collaborators::KeywordWithFrequency;
use crate::neo4j::models::*;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GraphStore: Send + Sync {
    // ========================================================================
    // Content node lifecycle
    // ========================================================================

    /// Create a content node with the given properties and return the
    /// stored record.
    async fn create_content(
        &self,
        node_type: NodeType,
        props: Vec<(String, FieldValue)>,
    ) -> Result<RawContentRecord>;

    /// Fetch a content node by id.
    async fn get_content(&self, node_type: NodeType, id: &str)
        -> Result<Option<RawContentRecord>>;

    /// Apply a simple field-set update and return the updated record.
    /// `None` when the id does not resolve.
    async fn update_content(
        &self,
        node_type: NodeType,
        id: &str,
        set: Vec<(String, FieldValue)>,
    ) -> Result<Option<RawContentRecord>>;

    /// Detach-delete a content node together with everything it exclusively
    /// owns (votes, tag and category edges, discussion and comments), but
    /// never nodes it merely references. Returns whether a node was deleted.
    async fn delete_content(&self, node_type: NodeType, id: &str) -> Result<bool>;

    // ========================================================================
    // Vote ledger
    // ========================================================================

    /// Upsert a (node, user, kind) vote and recount the denormalized
    /// counters in the same write. `None` when the node does not exist.
    async fn cast_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
        positive: bool,
    ) -> Result<Option<VoteTotals>>;

    /// Delete a (node, user, kind) vote if present and recount. Removing a
    /// vote that does not exist is a no-op. `None` when the node is missing.
    async fn remove_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<Option<VoteTotals>>;

    /// A user's personal statuses plus aggregates. `None` when the node is
    /// missing.
    async fn get_vote_status(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
    ) -> Result<Option<UserVoteStatus>>;

    /// Aggregate counters only. `None` when the node is missing.
    async fn get_vote_totals(&self, node_type: NodeType, id: &str) -> Result<Option<VoteTotals>>;

    // ========================================================================
    // Keyword tagging
    // ========================================================================

    /// Of the given word texts, the ones that exist as Word nodes and have
    /// passed their own inclusion threshold.
    async fn accepted_words(&self, words: &[String]) -> Result<Vec<String>>;

    /// Whether a Word node with this text exists, accepted or not.
    async fn word_exists(&self, word: &str) -> Result<bool>;

    /// Remove all tag edges owned by the node and all shared-tag edges in
    /// which it is an endpoint (the update-path replace step).
    async fn clear_tag_edges(&self, node_type: NodeType, id: &str) -> Result<()>;

    /// Create (or overwrite) the node's tag edge for one keyword.
    async fn create_tag_edge(
        &self,
        node_type: NodeType,
        id: &str,
        keyword: &KeywordWithFrequency,
    ) -> Result<()>;

    /// Every other node of the same type tagging `word`, with its tag-edge
    /// frequency.
    async fn nodes_tagging_word(
        &self,
        node_type: NodeType,
        word: &str,
        exclude_id: &str,
    ) -> Result<Vec<TaggedPeer>>;

    /// Add `strength` to the (pair, word) shared-tag edge, creating it when
    /// absent. The pair is undirected. Returns the accumulated strength.
    async fn accumulate_shared_tag(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
        strength: f64,
    ) -> Result<f64>;

    /// Current strength of the (pair, word) shared-tag edge, if any.
    async fn shared_tag_strength(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
    ) -> Result<Option<f64>>;

    /// All shared-tag edges incident to a node, strongest first.
    async fn related_by_tags(&self, node_type: NodeType, id: &str) -> Result<Vec<SharedTagLink>>;

    // ========================================================================
    // Categories
    // ========================================================================

    /// Of the given category ids, the ones that exist and have passed
    /// inclusion.
    async fn accepted_categories(&self, ids: &[String]) -> Result<Vec<String>>;

    /// Replace the node's category edge set: prior edges are cleared before
    /// the new ones are created.
    async fn replace_category_edges(
        &self,
        node_type: NodeType,
        id: &str,
        category_ids: &[String],
    ) -> Result<()>;

    /// Category ids currently attached to a node.
    async fn node_categories(&self, node_type: NodeType, id: &str) -> Result<Vec<String>>;

    /// Link a category to the accepted words it is composed of.
    async fn link_composed_words(&self, category_id: &str, words: &[String]) -> Result<()>;

    /// Word texts a category is composed of.
    async fn category_words(&self, category_id: &str) -> Result<Vec<String>>;

    // ========================================================================
    // Cross-type reads and links
    // ========================================================================

    /// A node's current net inclusion votes. `None` when the node is
    /// missing. Read at call time by the dependent-creation gate.
    async fn inclusion_net(&self, node_type: NodeType, id: &str) -> Result<Option<i64>>;

    /// Link a dependent child to its parent (answer→question,
    /// definition→word).
    async fn link_parent(
        &self,
        child_type: NodeType,
        child_id: &str,
        parent_type: NodeType,
        parent_id: &str,
    ) -> Result<()>;
}
