//! Category attachment and composition validation.
//!
//! Attachment replaces the node's category edge set, never merges into it.
//! Both attachment and composition use the same all-or-nothing size-match
//! guard: the accepted set must equal the requested set or nothing is
//! written.

use crate::error::{CoreError, Result};
use crate::neo4j::models::NodeType;
use crate::neo4j::traits::GraphStore;
use std::collections::HashSet;
use std::sync::Arc;

/// Maximum categories attachable to a single content node.
pub const MAX_NODE_CATEGORIES: usize = 3;
/// A category is composed of between 1 and this many accepted words.
pub const MAX_CATEGORY_WORDS: usize = 5;

pub struct CategoryBinder {
    store: Arc<dyn GraphStore>,
}

impl CategoryBinder {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Validation half of [`attach`](Self::attach), for callers that must
    /// guard before creating the node the edges will hang off.
    pub async fn validate(&self, category_ids: &[String]) -> Result<()> {
        if category_ids.len() > MAX_NODE_CATEGORIES {
            return Err(CoreError::validation(format!(
                "a node can have at most {MAX_NODE_CATEGORIES} categories (got {})",
                category_ids.len()
            )));
        }
        ensure_unique(category_ids, "category id")?;
        if category_ids.is_empty() {
            return Ok(());
        }

        let matched = self
            .store
            .accepted_categories(category_ids)
            .await
            .map_err(|e| CoreError::store("accepted_categories", NodeType::Category, e))?;

        if matched.len() != category_ids.len() {
            let missing: Vec<String> = category_ids
                .iter()
                .filter(|id| !matched.contains(id))
                .cloned()
                .collect();
            return Err(CoreError::precondition(format!(
                "categories not accepted into the graph: {}",
                missing.join(", ")
            )));
        }
        Ok(())
    }

    /// Replace the node's category edge set with the given (validated)
    /// categories. Prior edges are cleared first.
    pub async fn attach(
        &self,
        node_type: NodeType,
        id: &str,
        category_ids: &[String],
    ) -> Result<()> {
        self.validate(category_ids).await?;
        self.store
            .replace_category_edges(node_type, id, category_ids)
            .await
            .map_err(|e| CoreError::store("replace_category_edges", node_type, e))?;
        tracing::info!(
            node_type = %node_type,
            id,
            categories = category_ids.len(),
            "replaced category edges"
        );
        Ok(())
    }

    /// Category ids currently attached to a node.
    pub async fn categories_of(&self, node_type: NodeType, id: &str) -> Result<Vec<String>> {
        self.store
            .node_categories(node_type, id)
            .await
            .map_err(|e| CoreError::store("node_categories", node_type, e))
    }

    /// Validate a category's composed word set: 1–5 words, lowercased, each
    /// accepted into the graph. Returns the normalized words.
    pub async fn validate_composition(&self, words: &[String]) -> Result<Vec<String>> {
        if words.is_empty() || words.len() > MAX_CATEGORY_WORDS {
            return Err(CoreError::validation(format!(
                "a category is composed of 1 to {MAX_CATEGORY_WORDS} words (got {})",
                words.len()
            )));
        }

        let normalized: Vec<String> = words.iter().map(|w| w.trim().to_lowercase()).collect();
        if normalized.iter().any(|w| w.is_empty()) {
            return Err(CoreError::validation("composed words must not be empty"));
        }
        ensure_unique(&normalized, "composed word")?;

        let matched = self
            .store
            .accepted_words(&normalized)
            .await
            .map_err(|e| CoreError::store("accepted_words", NodeType::Category, e))?;

        if matched.len() != normalized.len() {
            let missing: Vec<String> = normalized
                .iter()
                .filter(|w| !matched.contains(w))
                .cloned()
                .collect();
            return Err(CoreError::precondition(format!(
                "composed words not accepted into the graph: {}",
                missing.join(", ")
            )));
        }
        Ok(normalized)
    }
}

fn ensure_unique(items: &[String], what: &str) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.as_str()) {
            return Err(CoreError::validation(format!(
                "duplicate {what} `{item}` in request"
            )));
        }
    }
    Ok(())
}
