//! Tag propagation: direct keyword edges plus accumulating shared-tag
//! edges between same-type nodes.
//!
//! The keyword set is validated as a whole before anything is written — a
//! size-match guard between the requested and accepted word sets makes the
//! operation all-or-nothing. Strength on an existing (pair, word) edge
//! accumulates across propagation events; it only resets when the edge
//! itself is cleared through the replace path.

use crate::collaborators::KeywordWithFrequency;
use crate::error::{CoreError, Result};
use crate::neo4j::models::{NodeType, SharedTagLink};
use crate::neo4j::traits::GraphStore;
use std::collections::HashSet;
use std::sync::Arc;

pub struct TagPropagator {
    store: Arc<dyn GraphStore>,
}

impl TagPropagator {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Check that every keyword resolves to an accepted word. One miss
    /// aborts the whole set.
    pub async fn validate(
        &self,
        node_type: NodeType,
        keywords: &[KeywordWithFrequency],
    ) -> Result<()> {
        ensure_no_duplicates(keywords)?;
        if keywords.is_empty() {
            return Ok(());
        }

        let words: Vec<String> = keywords.iter().map(|k| k.word.clone()).collect();
        let accepted = self
            .store
            .accepted_words(&words)
            .await
            .map_err(|e| CoreError::store("accepted_words", node_type, e))?;

        if accepted.len() != words.len() {
            let missing: Vec<String> = words
                .iter()
                .filter(|w| !accepted.contains(w))
                .cloned()
                .collect();
            return Err(CoreError::precondition(format!(
                "keywords not accepted into the graph: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Create tag edges for `id` and propagate shared-tag strength to every
    /// other same-type node sharing a keyword. `replace` clears the node's
    /// existing tag and shared-tag edges first (the update path); creation
    /// passes `false`.
    pub async fn apply(
        &self,
        node_type: NodeType,
        id: &str,
        keywords: &[KeywordWithFrequency],
        replace: bool,
    ) -> Result<()> {
        self.validate(node_type, keywords).await?;

        if replace {
            self.store
                .clear_tag_edges(node_type, id)
                .await
                .map_err(|e| CoreError::store("clear_tag_edges", node_type, e))?;
        }

        for keyword in keywords {
            self.store
                .create_tag_edge(node_type, id, keyword)
                .await
                .map_err(|e| CoreError::store("create_tag_edge", node_type, e))?;

            let peers = self
                .store
                .nodes_tagging_word(node_type, &keyword.word, id)
                .await
                .map_err(|e| CoreError::store("nodes_tagging_word", node_type, e))?;
            tracing::debug!(
                node_type = %node_type,
                id,
                word = %keyword.word,
                fan_out = peers.len(),
                "propagating shared tags"
            );

            for peer in peers {
                let strength = keyword.frequency * peer.frequency;
                self.store
                    .accumulate_shared_tag(node_type, id, &peer.id, &keyword.word, strength)
                    .await
                    .map_err(|e| CoreError::store("accumulate_shared_tag", node_type, e))?;
            }
        }
        Ok(())
    }

    /// Shared-tag neighbors of a node, strongest first.
    pub async fn related(&self, node_type: NodeType, id: &str) -> Result<Vec<SharedTagLink>> {
        self.store
            .related_by_tags(node_type, id)
            .await
            .map_err(|e| CoreError::store("related_by_tags", node_type, e))
    }
}

fn ensure_no_duplicates(keywords: &[KeywordWithFrequency]) -> Result<()> {
    let mut seen = HashSet::new();
    for keyword in keywords {
        if !seen.insert(keyword.word.as_str()) {
            return Err(CoreError::validation(format!(
                "duplicate keyword `{}` in request",
                keyword.word
            )));
        }
    }
    Ok(())
}
