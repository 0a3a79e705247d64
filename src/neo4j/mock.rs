//! In-memory mock implementation of GraphStore for testing.
//!
//! Mirrors the Cypher semantics of `Neo4jClient` using
//! `tokio::sync::RwLock<HashMap<K, V>>` collections: vote counters are
//! recounted from the vote rows on every mutation, shared-tag pairs are
//! canonicalized so either endpoint lands on the same edge, and category
//! edge sets are replaced, not merged. Conditionally compiled with
//! `#[cfg(test)]`.

use crate::collaborators::KeywordWithFrequency;
use crate::neo4j::models::*;
use crate::neo4j::traits::GraphStore;
use anyhow::{bail, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

type NodeKey = (NodeType, String);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoteKey {
    pub node_type: NodeType,
    pub node_id: String,
    pub user_id: String,
    pub kind: VoteKind,
}

#[derive(Debug, Clone)]
pub struct StoredTagEdge {
    pub word: String,
    pub frequency: f64,
    pub source: String,
}

/// Shared-tag edge key with the endpoint pair in canonical (sorted) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SharedTagKey {
    pub node_type: NodeType,
    pub a: String,
    pub b: String,
    pub word: String,
}

impl SharedTagKey {
    fn new(node_type: NodeType, x: &str, y: &str, word: &str) -> Self {
        let (a, b) = if x <= y { (x, y) } else { (y, x) };
        Self {
            node_type,
            a: a.to_string(),
            b: b.to_string(),
            word: word.to_string(),
        }
    }
}

/// In-memory mock implementation of GraphStore for testing.
#[derive(Default)]
pub struct MockGraphStore {
    pub nodes: RwLock<HashMap<NodeKey, HashMap<String, FieldValue>>>,
    pub votes: RwLock<HashMap<VoteKey, VoteStatus>>,
    pub tag_edges: RwLock<HashMap<NodeKey, Vec<StoredTagEdge>>>,
    pub shared_tags: RwLock<HashMap<SharedTagKey, f64>>,
    pub category_edges: RwLock<HashMap<NodeKey, Vec<String>>>,
    pub composed_words: RwLock<HashMap<String, Vec<String>>>,
    pub parent_links: RwLock<HashMap<NodeKey, NodeKey>>,
}

impl MockGraphStore {
    /// Create a new empty MockGraphStore.
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // Builder / seeding methods for tests
    // ========================================================================

    /// Seed an already-accepted word (inclusion 1/0/1). Returns the store so
    /// seeds can be chained.
    pub async fn with_accepted_word(self, word: &str) -> Self {
        let mut props = base_props(&Uuid::new_v4().to_string());
        props.insert("word".into(), FieldValue::Str(word.to_string()));
        props.insert("inclusion_positive".into(), FieldValue::Int(1));
        props.insert("inclusion_net".into(), FieldValue::Int(1));
        self.nodes
            .write()
            .await
            .insert((NodeType::Word, props_id(&props)), props);
        self
    }

    /// Seed an already-accepted category with a fixed id.
    pub async fn with_accepted_category(self, id: &str, name: &str) -> Self {
        let mut props = base_props(id);
        props.insert("name".into(), FieldValue::Str(name.to_string()));
        props.insert("inclusion_positive".into(), FieldValue::Int(1));
        props.insert("inclusion_net".into(), FieldValue::Int(1));
        self.nodes
            .write()
            .await
            .insert((NodeType::Category, id.to_string()), props);
        self
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Recount both counters from the vote rows and write them onto the
    /// node, mirroring the single-statement recount in the Cypher path.
    async fn recount(&self, node_type: NodeType, id: &str) -> Option<VoteTotals> {
        let totals = {
            let votes = self.votes.read().await;
            let mut totals = VoteTotals::default();
            for (key, status) in votes.iter() {
                if key.node_type != node_type || key.node_id != id {
                    continue;
                }
                match (key.kind, status) {
                    (VoteKind::Inclusion, VoteStatus::Agree) => totals.inclusion_positive += 1,
                    (VoteKind::Inclusion, VoteStatus::Disagree) => totals.inclusion_negative += 1,
                    (VoteKind::Content, VoteStatus::Agree) => totals.content_positive += 1,
                    (VoteKind::Content, VoteStatus::Disagree) => totals.content_negative += 1,
                }
            }
            totals.inclusion_net = totals.inclusion_positive - totals.inclusion_negative;
            totals.content_net = totals.content_positive - totals.content_negative;
            totals
        };

        let mut nodes = self.nodes.write().await;
        let props = nodes.get_mut(&(node_type, id.to_string()))?;
        props.insert(
            "inclusion_positive".into(),
            FieldValue::Int(totals.inclusion_positive),
        );
        props.insert(
            "inclusion_negative".into(),
            FieldValue::Int(totals.inclusion_negative),
        );
        props.insert("inclusion_net".into(), FieldValue::Int(totals.inclusion_net));
        props.insert(
            "content_positive".into(),
            FieldValue::Int(totals.content_positive),
        );
        props.insert(
            "content_negative".into(),
            FieldValue::Int(totals.content_negative),
        );
        props.insert("content_net".into(), FieldValue::Int(totals.content_net));
        Some(totals)
    }

    async fn node_exists(&self, node_type: NodeType, id: &str) -> bool {
        self.nodes
            .read()
            .await
            .contains_key(&(node_type, id.to_string()))
    }
}

fn base_props(id: &str) -> HashMap<String, FieldValue> {
    let mut props = HashMap::new();
    props.insert("id".into(), FieldValue::Str(id.to_string()));
    props.insert("created_by".into(), FieldValue::Str("seed".into()));
    props.insert("public_credit".into(), FieldValue::Bool(false));
    props.insert(
        "created_at".into(),
        FieldValue::Str(chrono::Utc::now().to_rfc3339()),
    );
    for counter in [
        "inclusion_positive",
        "inclusion_negative",
        "inclusion_net",
        "content_positive",
        "content_negative",
        "content_net",
    ] {
        props.insert(counter.into(), FieldValue::Int(0));
    }
    props
}

fn props_id(props: &HashMap<String, FieldValue>) -> String {
    match props.get("id") {
        Some(FieldValue::Str(s)) => s.clone(),
        _ => String::new(),
    }
}

fn record_from(props: &HashMap<String, FieldValue>) -> RawContentRecord {
    RawContentRecord {
        props: props.clone(),
    }
}

// ============================================================================
// GraphStore trait implementation
// ============================================================================

#[async_trait]
impl GraphStore for MockGraphStore {
    async fn create_content(
        &self,
        node_type: NodeType,
        props: Vec<(String, FieldValue)>,
    ) -> Result<RawContentRecord> {
        let map: HashMap<String, FieldValue> = props
            .into_iter()
            .filter(|(_, v)| !matches!(v, FieldValue::Null))
            .collect();
        let id = props_id(&map);
        self.nodes
            .write()
            .await
            .insert((node_type, id), map.clone());
        Ok(record_from(&map))
    }

    async fn get_content(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> Result<Option<RawContentRecord>> {
        Ok(self
            .nodes
            .read()
            .await
            .get(&(node_type, id.to_string()))
            .map(record_from))
    }

    async fn update_content(
        &self,
        node_type: NodeType,
        id: &str,
        set: Vec<(String, FieldValue)>,
    ) -> Result<Option<RawContentRecord>> {
        let mut nodes = self.nodes.write().await;
        match nodes.get_mut(&(node_type, id.to_string())) {
            Some(props) => {
                for (k, v) in set {
                    if !matches!(v, FieldValue::Null) {
                        props.insert(k, v);
                    }
                }
                Ok(Some(record_from(props)))
            }
            None => Ok(None),
        }
    }

    async fn delete_content(&self, node_type: NodeType, id: &str) -> Result<bool> {
        let key = (node_type, id.to_string());
        let existed = self.nodes.write().await.remove(&key).is_some();
        if !existed {
            return Ok(false);
        }

        self.votes
            .write()
            .await
            .retain(|k, _| !(k.node_type == node_type && k.node_id == id));
        self.tag_edges.write().await.remove(&key);
        self.shared_tags
            .write()
            .await
            .retain(|k, _| !(k.node_type == node_type && (k.a == id || k.b == id)));
        self.category_edges.write().await.remove(&key);
        self.parent_links.write().await.remove(&key);
        if node_type == NodeType::Category {
            self.composed_words.write().await.remove(id);
        }
        Ok(true)
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
    ) -> Result<Option<VoteTotals>> {
        if !self.node_exists(node_type, id).await {
            return Ok(None);
        }
        self.votes.write().await.insert(
            VoteKey {
                node_type,
                node_id: id.to_string(),
                user_id: user_id.to_string(),
                kind,
            },
            VoteStatus::from_positive(positive),
        );
        Ok(self.recount(node_type, id).await)
    }

    async fn remove_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<Option<VoteTotals>> {
        if !self.node_exists(node_type, id).await {
            return Ok(None);
        }
        self.votes.write().await.remove(&VoteKey {
            node_type,
            node_id: id.to_string(),
            user_id: user_id.to_string(),
            kind,
        });
        Ok(self.recount(node_type, id).await)
    }

    async fn get_vote_status(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
    ) -> Result<Option<UserVoteStatus>> {
        let totals = match self.get_vote_totals(node_type, id).await? {
            Some(t) => t,
            None => return Ok(None),
        };
        let votes = self.votes.read().await;
        let status_of = |kind: VoteKind| {
            votes
                .get(&VoteKey {
                    node_type,
                    node_id: id.to_string(),
                    user_id: user_id.to_string(),
                    kind,
                })
                .copied()
        };
        Ok(Some(UserVoteStatus {
            inclusion: status_of(VoteKind::Inclusion),
            content: status_of(VoteKind::Content),
            totals,
        }))
    }

    async fn get_vote_totals(&self, node_type: NodeType, id: &str) -> Result<Option<VoteTotals>> {
        Ok(self
            .nodes
            .read()
            .await
            .get(&(node_type, id.to_string()))
            .map(|props| record_from(props).vote_totals()))
    }

    // ========================================================================
    // Keyword tagging
    // ========================================================================

    async fn accepted_words(&self, words: &[String]) -> Result<Vec<String>> {
        let nodes = self.nodes.read().await;
        let mut accepted = Vec::new();
        for word in words {
            let hit = nodes.iter().any(|((t, _), props)| {
                *t == NodeType::Word
                    && props.get("word") == Some(&FieldValue::Str(word.clone()))
                    && record_from(props).int("inclusion_net") > 0
            });
            if hit {
                accepted.push(word.clone());
            }
        }
        Ok(accepted)
    }

    async fn word_exists(&self, word: &str) -> Result<bool> {
        let nodes = self.nodes.read().await;
        Ok(nodes.iter().any(|((t, _), props)| {
            *t == NodeType::Word && props.get("word") == Some(&FieldValue::Str(word.to_string()))
        }))
    }

    async fn clear_tag_edges(&self, node_type: NodeType, id: &str) -> Result<()> {
        self.tag_edges
            .write()
            .await
            .remove(&(node_type, id.to_string()));
        self.shared_tags
            .write()
            .await
            .retain(|k, _| !(k.node_type == node_type && (k.a == id || k.b == id)));
        Ok(())
    }

    async fn create_tag_edge(
        &self,
        node_type: NodeType,
        id: &str,
        keyword: &KeywordWithFrequency,
    ) -> Result<()> {
        let mut edges = self.tag_edges.write().await;
        let entry = edges.entry((node_type, id.to_string())).or_default();
        entry.retain(|e| e.word != keyword.word);
        entry.push(StoredTagEdge {
            word: keyword.word.clone(),
            frequency: keyword.frequency,
            source: keyword.source.as_str().to_string(),
        });
        Ok(())
    }

    async fn nodes_tagging_word(
        &self,
        node_type: NodeType,
        word: &str,
        exclude_id: &str,
    ) -> Result<Vec<TaggedPeer>> {
        let edges = self.tag_edges.read().await;
        let mut peers = Vec::new();
        for ((t, node_id), node_edges) in edges.iter() {
            if *t != node_type || node_id == exclude_id {
                continue;
            }
            if let Some(edge) = node_edges.iter().find(|e| e.word == word) {
                peers.push(TaggedPeer {
                    id: node_id.clone(),
                    frequency: edge.frequency,
                });
            }
        }
        Ok(peers)
    }

    async fn accumulate_shared_tag(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
        strength: f64,
    ) -> Result<f64> {
        let mut shared = self.shared_tags.write().await;
        let entry = shared
            .entry(SharedTagKey::new(node_type, a, b, word))
            .or_insert(0.0);
        *entry += strength;
        Ok(*entry)
    }

    async fn shared_tag_strength(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
    ) -> Result<Option<f64>> {
        Ok(self
            .shared_tags
            .read()
            .await
            .get(&SharedTagKey::new(node_type, a, b, word))
            .copied())
    }

    async fn related_by_tags(&self, node_type: NodeType, id: &str) -> Result<Vec<SharedTagLink>> {
        let shared = self.shared_tags.read().await;
        let mut links: Vec<SharedTagLink> = shared
            .iter()
            .filter(|(k, _)| k.node_type == node_type && (k.a == id || k.b == id))
            .map(|(k, strength)| SharedTagLink {
                peer_id: if k.a == id { k.b.clone() } else { k.a.clone() },
                word: k.word.clone(),
                strength: *strength,
            })
            .collect();
        links.sort_by(|x, y| y.strength.total_cmp(&x.strength));
        Ok(links)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    async fn accepted_categories(&self, ids: &[String]) -> Result<Vec<String>> {
        let nodes = self.nodes.read().await;
        let mut matched = Vec::new();
        for id in ids {
            if let Some(props) = nodes.get(&(NodeType::Category, id.clone())) {
                if record_from(props).int("inclusion_net") > 0 {
                    matched.push(id.clone());
                }
            }
        }
        Ok(matched)
    }

    async fn replace_category_edges(
        &self,
        node_type: NodeType,
        id: &str,
        category_ids: &[String],
    ) -> Result<()> {
        self.category_edges
            .write()
            .await
            .insert((node_type, id.to_string()), category_ids.to_vec());
        Ok(())
    }

    async fn node_categories(&self, node_type: NodeType, id: &str) -> Result<Vec<String>> {
        Ok(self
            .category_edges
            .read()
            .await
            .get(&(node_type, id.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    async fn link_composed_words(&self, category_id: &str, words: &[String]) -> Result<()> {
        let mut composed = self.composed_words.write().await;
        let entry = composed.entry(category_id.to_string()).or_default();
        for word in words {
            if !entry.contains(word) {
                entry.push(word.clone());
            }
        }
        Ok(())
    }

    async fn category_words(&self, category_id: &str) -> Result<Vec<String>> {
        let mut words = self
            .composed_words
            .read()
            .await
            .get(category_id)
            .cloned()
            .unwrap_or_default();
        words.sort();
        Ok(words)
    }

    // ========================================================================
    // Cross-type reads and links
    // ========================================================================

    async fn inclusion_net(&self, node_type: NodeType, id: &str) -> Result<Option<i64>> {
        Ok(self
            .nodes
            .read()
            .await
            .get(&(node_type, id.to_string()))
            .map(|props| record_from(props).int("inclusion_net")))
    }

    async fn link_parent(
        &self,
        child_type: NodeType,
        child_id: &str,
        parent_type: NodeType,
        parent_id: &str,
    ) -> Result<()> {
        if NodeType::parent_rel(child_type, parent_type).is_none() {
            bail!("no parent relationship from {child_type} to {parent_type}");
        }
        self.parent_links.write().await.insert(
            (child_type, child_id.to_string()),
            (parent_type, parent_id.to_string()),
        );
        Ok(())
    }
}
