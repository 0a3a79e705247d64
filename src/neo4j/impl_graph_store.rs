//! `GraphStore` implementation for `Neo4jClient`.
//!
//! Every method simply delegates to the corresponding inherent method on
//! `Neo4jClient`.

use async_trait::async_trait;

use super::client::Neo4jClient;
use super::models::*;
use super::traits::GraphStore;
use crate::collaborators::KeywordWithFrequency;

#[async_trait]
impl GraphStore for Neo4jClient {
    // ========================================================================
    // Content node lifecycle
    // ========================================================================

    async fn create_content(
        &self,
        node_type: NodeType,
        props: Vec<(String, FieldValue)>,
    ) -> anyhow::Result<RawContentRecord> {
        self.create_content(node_type, props).await
    }

    async fn get_content(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> anyhow::Result<Option<RawContentRecord>> {
        self.get_content(node_type, id).await
    }

    async fn update_content(
        &self,
        node_type: NodeType,
        id: &str,
        set: Vec<(String, FieldValue)>,
    ) -> anyhow::Result<Option<RawContentRecord>> {
        self.update_content(node_type, id, set).await
    }

    async fn delete_content(&self, node_type: NodeType, id: &str) -> anyhow::Result<bool> {
        self.delete_content(node_type, id).await
    }

    // ========================================================================
    // Vote ledger
    // ========================================================================

    async fn cast_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
        positive: bool,
    ) -> anyhow::Result<Option<VoteTotals>> {
        self.cast_vote(node_type, id, user_id, kind, positive).await
    }

    async fn remove_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> anyhow::Result<Option<VoteTotals>> {
        self.remove_vote(node_type, id, user_id, kind).await
    }

    async fn get_vote_status(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
    ) -> anyhow::Result<Option<UserVoteStatus>> {
        self.get_vote_status(node_type, id, user_id).await
    }

    async fn get_vote_totals(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> anyhow::Result<Option<VoteTotals>> {
        self.get_vote_totals(node_type, id).await
    }

    // ========================================================================
    // Keyword tagging
    // ========================================================================

    async fn accepted_words(&self, words: &[String]) -> anyhow::Result<Vec<String>> {
        self.accepted_words(words).await
    }

    async fn word_exists(&self, word: &str) -> anyhow::Result<bool> {
        self.word_exists(word).await
    }

    async fn clear_tag_edges(&self, node_type: NodeType, id: &str) -> anyhow::Result<()> {
        self.clear_tag_edges(node_type, id).await
    }

    async fn create_tag_edge(
        &self,
        node_type: NodeType,
        id: &str,
        keyword: &KeywordWithFrequency,
    ) -> anyhow::Result<()> {
        self.create_tag_edge(node_type, id, keyword).await
    }

    async fn nodes_tagging_word(
        &self,
        node_type: NodeType,
        word: &str,
        exclude_id: &str,
    ) -> anyhow::Result<Vec<TaggedPeer>> {
        self.nodes_tagging_word(node_type, word, exclude_id).await
    }

    async fn accumulate_shared_tag(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
        strength: f64,
    ) -> anyhow::Result<f64> {
        self.accumulate_shared_tag(node_type, a, b, word, strength)
            .await
    }

    async fn shared_tag_strength(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
    ) -> anyhow::Result<Option<f64>> {
        self.shared_tag_strength(node_type, a, b, word).await
    }

    async fn related_by_tags(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> anyhow::Result<Vec<SharedTagLink>> {
        self.related_by_tags(node_type, id).await
    }

    // ========================================================================
    // Categories
    // ========================================================================

    async fn accepted_categories(&self, ids: &[String]) -> anyhow::Result<Vec<String>> {
        self.accepted_categories(ids).await
    }

    async fn replace_category_edges(
        &self,
        node_type: NodeType,
        id: &str,
        category_ids: &[String],
    ) -> anyhow::Result<()> {
        self.replace_category_edges(node_type, id, category_ids)
            .await
    }

    async fn node_categories(&self, node_type: NodeType, id: &str) -> anyhow::Result<Vec<String>> {
        self.node_categories(node_type, id).await
    }

    async fn link_composed_words(
        &self,
        category_id: &str,
        words: &[String],
    ) -> anyhow::Result<()> {
        self.link_composed_words(category_id, words).await
    }

    async fn category_words(&self, category_id: &str) -> anyhow::Result<Vec<String>> {
        self.category_words(category_id).await
    }

    // ========================================================================
    // Cross-type reads and links
    // ========================================================================

    async fn inclusion_net(&self, node_type: NodeType, id: &str) -> anyhow::Result<Option<i64>> {
        self.inclusion_net(node_type, id).await
    }

    async fn link_parent(
        &self,
        child_type: NodeType,
        child_id: &str,
        parent_type: NodeType,
        parent_id: &str,
    ) -> anyhow::Result<()> {
        self.link_parent(child_type, child_id, parent_type, parent_id)
            .await
    }
}
