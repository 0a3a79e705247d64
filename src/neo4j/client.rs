//! Neo4j client for the community knowledge graph.
//!
//! Every operation is a single parameterized Cypher statement, so each
//! write commits atomically. Vote mutations recount the denormalized
//! counters in the same statement that touches the vote edge, which keeps
//! the counters a pure function of the vote rows.

use super::models::*;
use crate::collaborators::KeywordWithFrequency;
use anyhow::{Context, Result};
use neo4rs::{query, Graph, Query};
use std::sync::Arc;

/// Client for Neo4j operations
pub struct Neo4jClient {
    graph: Arc<Graph>,
}

/// Property vocabulary of content nodes, used when mapping a bolt node back
/// into a [`RawContentRecord`]. Adding a content type with new payload
/// fields means extending these lists.
const STRING_PROPS: &[&str] = &[
    "id",
    "created_by",
    "created_at",
    "updated_at",
    "word",
    "definition_text",
    "statement",
    "question_text",
    "answer_text",
    "name",
];
const INT_PROPS: &[&str] = &[
    "inclusion_positive",
    "inclusion_negative",
    "inclusion_net",
    "content_positive",
    "content_negative",
    "content_net",
];
const BOOL_PROPS: &[&str] = &["public_credit", "visible"];

/// Map a bolt node into the normalized record shape. Integers that arrive
/// as floats are collapsed to plain integers by the record accessors.
fn node_to_record(node: &neo4rs::Node) -> RawContentRecord {
    let mut record = RawContentRecord::new();
    for key in STRING_PROPS {
        if let Ok(v) = node.get::<String>(key) {
            record.set(*key, FieldValue::Str(v));
        }
    }
    for key in INT_PROPS {
        if let Ok(v) = node.get::<i64>(key) {
            record.set(*key, FieldValue::Int(v));
        } else if let Ok(v) = node.get::<f64>(key) {
            record.set(*key, FieldValue::Float(v));
        }
    }
    for key in BOOL_PROPS {
        if let Ok(v) = node.get::<bool>(key) {
            record.set(*key, FieldValue::Bool(v));
        }
    }
    record
}

fn apply_param(q: Query, key: &str, value: &FieldValue) -> Query {
    match value {
        FieldValue::Str(s) => q.param(key, s.clone()),
        FieldValue::Int(i) => q.param(key, *i),
        FieldValue::Float(f) => q.param(key, *f),
        FieldValue::Bool(b) => q.param(key, *b),
        FieldValue::Null => q,
    }
}

/// Cypher fragment that recounts both vote counters from the live edges and
/// writes them back onto `n`. Expects `n` in scope; leaves totals bound.
const RECOUNT_VOTES: &str = r#"
    WITH n
    OPTIONAL MATCH (:User)-[iv:VOTED_ON {kind: 'INCLUSION'}]->(n)
    WITH n,
         count(CASE WHEN iv.status = 'agree' THEN 1 END) AS ip,
         count(CASE WHEN iv.status = 'disagree' THEN 1 END) AS ineg
    OPTIONAL MATCH (:User)-[cv:VOTED_ON {kind: 'CONTENT'}]->(n)
    WITH n, ip, ineg,
         count(CASE WHEN cv.status = 'agree' THEN 1 END) AS cp,
         count(CASE WHEN cv.status = 'disagree' THEN 1 END) AS cneg
    SET n.inclusion_positive = ip,
        n.inclusion_negative = ineg,
        n.inclusion_net = ip - ineg,
        n.content_positive = cp,
        n.content_negative = cneg,
        n.content_net = cp - cneg
    RETURN n.inclusion_positive AS inclusion_positive,
           n.inclusion_negative AS inclusion_negative,
           n.inclusion_net AS inclusion_net,
           n.content_positive AS content_positive,
           n.content_negative AS content_negative,
           n.content_net AS content_net
"#;

fn row_to_totals(row: &neo4rs::Row) -> Result<VoteTotals> {
    Ok(VoteTotals {
        inclusion_positive: row.get("inclusion_positive")?,
        inclusion_negative: row.get("inclusion_negative")?,
        inclusion_net: row.get("inclusion_net")?,
        content_positive: row.get("content_positive")?,
        content_negative: row.get("content_negative")?,
        content_net: row.get("content_net")?,
    })
}

impl Neo4jClient {
    /// Create a new Neo4j client
    pub async fn new(uri: &str, user: &str, password: &str) -> Result<Self> {
        let graph = Graph::new(uri, user, password)
            .await
            .context("Failed to connect to Neo4j")?;

        let client = Self {
            graph: Arc::new(graph),
        };

        client.init_schema().await?;

        Ok(client)
    }

    /// Initialize the graph schema with constraints and indexes
    async fn init_schema(&self) -> Result<()> {
        let constraints = vec![
            "CREATE CONSTRAINT word_id IF NOT EXISTS FOR (w:Word) REQUIRE w.id IS UNIQUE",
            "CREATE CONSTRAINT word_text IF NOT EXISTS FOR (w:Word) REQUIRE w.word IS UNIQUE",
            "CREATE CONSTRAINT definition_id IF NOT EXISTS FOR (d:Definition) REQUIRE d.id IS UNIQUE",
            "CREATE CONSTRAINT statement_id IF NOT EXISTS FOR (s:Statement) REQUIRE s.id IS UNIQUE",
            "CREATE CONSTRAINT open_question_id IF NOT EXISTS FOR (q:OpenQuestion) REQUIRE q.id IS UNIQUE",
            "CREATE CONSTRAINT answer_id IF NOT EXISTS FOR (a:Answer) REQUIRE a.id IS UNIQUE",
            "CREATE CONSTRAINT category_id IF NOT EXISTS FOR (c:Category) REQUIRE c.id IS UNIQUE",
            "CREATE CONSTRAINT user_id IF NOT EXISTS FOR (u:User) REQUIRE u.id IS UNIQUE",
        ];

        let indexes = vec![
            "CREATE INDEX word_inclusion_net IF NOT EXISTS FOR (w:Word) ON (w.inclusion_net)",
            "CREATE INDEX category_inclusion_net IF NOT EXISTS FOR (c:Category) ON (c.inclusion_net)",
            "CREATE INDEX category_name IF NOT EXISTS FOR (c:Category) ON (c.name)",
            "CREATE INDEX statement_created_by IF NOT EXISTS FOR (s:Statement) ON (s.created_by)",
        ];

        for constraint in constraints {
            if let Err(e) = self.graph.run(query(constraint)).await {
                tracing::warn!("Constraint may already exist: {}", e);
            }
        }

        for index in indexes {
            if let Err(e) = self.graph.run(query(index)).await {
                tracing::warn!("Index may already exist: {}", e);
            }
        }

        Ok(())
    }

    // ========================================================================
    // Content node lifecycle
    // ========================================================================

    /// Create a content node and return the stored record.
    pub async fn create_content(
        &self,
        node_type: NodeType,
        props: Vec<(String, FieldValue)>,
    ) -> Result<RawContentRecord> {
        let props: Vec<_> = props
            .into_iter()
            .filter(|(_, v)| !matches!(v, FieldValue::Null))
            .collect();
        let assignments = props
            .iter()
            .map(|(k, _)| format!("{k}: ${k}"))
            .collect::<Vec<_>>()
            .join(", ");
        let cypher = format!(
            "CREATE (n:{} {{{assignments}}}) RETURN n",
            node_type.label()
        );

        let mut q = query(&cypher);
        for (k, v) in &props {
            q = apply_param(q, k, v);
        }

        let mut result = self.graph.execute(q).await?;
        let row = result
            .next()
            .await?
            .context("create returned no row")?;
        let node: neo4rs::Node = row.get("n")?;
        Ok(node_to_record(&node))
    }

    /// Fetch a content node by id.
    pub async fn get_content(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> Result<Option<RawContentRecord>> {
        let cypher = format!("MATCH (n:{} {{id: $id}}) RETURN n", node_type.label());
        let q = query(&cypher).param("id", id);

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            Ok(Some(node_to_record(&node)))
        } else {
            Ok(None)
        }
    }

    /// Apply a simple field-set update.
    pub async fn update_content(
        &self,
        node_type: NodeType,
        id: &str,
        set: Vec<(String, FieldValue)>,
    ) -> Result<Option<RawContentRecord>> {
        let set: Vec<_> = set
            .into_iter()
            .filter(|(_, v)| !matches!(v, FieldValue::Null))
            .collect();
        if set.is_empty() {
            return self.get_content(node_type, id).await;
        }

        let set_clauses = set
            .iter()
            .map(|(k, _)| format!("n.{k} = ${k}"))
            .collect::<Vec<_>>()
            .join(", ");
        let cypher = format!(
            "MATCH (n:{} {{id: $id}}) SET {set_clauses} RETURN n",
            node_type.label()
        );

        let mut q = query(&cypher).param("id", id);
        for (k, v) in &set {
            q = apply_param(q, k, v);
        }

        let mut result = self.graph.execute(q).await?;
        if let Some(row) = result.next().await? {
            let node: neo4rs::Node = row.get("n")?;
            Ok(Some(node_to_record(&node)))
        } else {
            Ok(None)
        }
    }

    /// Detach-delete a node and everything it exclusively owns. Owned
    /// discussion and comment nodes go with it; referenced nodes (words,
    /// categories, parents) only lose their edges.
    pub async fn delete_content(&self, node_type: NodeType, id: &str) -> Result<bool> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            OPTIONAL MATCH (n)-[:HAS_DISCUSSION]->(d:Discussion)
            OPTIONAL MATCH (d)-[:HAS_COMMENT]->(c:Comment)
            DETACH DELETE c, d, n
            RETURN 1 AS deleted
            "#,
            node_type.label()
        );
        let q = query(&cypher).param("id", id);

        let mut result = self.graph.execute(q).await?;
        Ok(result.next().await?.is_some())
    }

    // ========================================================================
    // Vote ledger
    // ========================================================================

    /// Upsert a vote edge and recount counters in one statement.
    pub async fn cast_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
        positive: bool,
    ) -> Result<Option<VoteTotals>> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            MERGE (u:User {{id: $user_id}})
            MERGE (u)-[v:VOTED_ON {{kind: $kind}}]->(n)
            SET v.status = $status
            {RECOUNT_VOTES}
            "#,
            node_type.label()
        );
        let q = query(&cypher)
            .param("id", id)
            .param("user_id", user_id)
            .param("kind", kind.as_str())
            .param("status", VoteStatus::from_positive(positive).as_str());

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(row_to_totals(&row)?)),
            None => Ok(None),
        }
    }

    /// Delete a vote edge if present and recount. No-op when absent.
    pub async fn remove_vote(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<Option<VoteTotals>> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            OPTIONAL MATCH (:User {{id: $user_id}})-[v:VOTED_ON {{kind: $kind}}]->(n)
            DELETE v
            {RECOUNT_VOTES}
            "#,
            node_type.label()
        );
        let q = query(&cypher)
            .param("id", id)
            .param("user_id", user_id)
            .param("kind", kind.as_str());

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(row_to_totals(&row)?)),
            None => Ok(None),
        }
    }

    /// A user's personal statuses plus the aggregates.
    pub async fn get_vote_status(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
    ) -> Result<Option<UserVoteStatus>> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            OPTIONAL MATCH (:User {{id: $user_id}})-[iv:VOTED_ON {{kind: 'INCLUSION'}}]->(n)
            OPTIONAL MATCH (:User {{id: $user_id}})-[cv:VOTED_ON {{kind: 'CONTENT'}}]->(n)
            RETURN iv.status AS inclusion_status,
                   cv.status AS content_status,
                   coalesce(n.inclusion_positive, 0) AS inclusion_positive,
                   coalesce(n.inclusion_negative, 0) AS inclusion_negative,
                   coalesce(n.inclusion_net, 0) AS inclusion_net,
                   coalesce(n.content_positive, 0) AS content_positive,
                   coalesce(n.content_negative, 0) AS content_negative,
                   coalesce(n.content_net, 0) AS content_net
            "#,
            node_type.label()
        );
        let q = query(&cypher).param("id", id).param("user_id", user_id);

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => {
                let inclusion = row
                    .get::<String>("inclusion_status")
                    .ok()
                    .and_then(|s| VoteStatus::parse(&s));
                let content = row
                    .get::<String>("content_status")
                    .ok()
                    .and_then(|s| VoteStatus::parse(&s));
                Ok(Some(UserVoteStatus {
                    inclusion,
                    content,
                    totals: row_to_totals(&row)?,
                }))
            }
            None => Ok(None),
        }
    }

    /// Aggregate counters only.
    pub async fn get_vote_totals(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> Result<Option<VoteTotals>> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            RETURN coalesce(n.inclusion_positive, 0) AS inclusion_positive,
                   coalesce(n.inclusion_negative, 0) AS inclusion_negative,
                   coalesce(n.inclusion_net, 0) AS inclusion_net,
                   coalesce(n.content_positive, 0) AS content_positive,
                   coalesce(n.content_negative, 0) AS content_negative,
                   coalesce(n.content_net, 0) AS content_net
            "#,
            node_type.label()
        );
        let q = query(&cypher).param("id", id);

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(row_to_totals(&row)?)),
            None => Ok(None),
        }
    }

    // ========================================================================
    // Keyword tagging
    // ========================================================================

    /// Word texts that exist and have passed inclusion.
    pub async fn accepted_words(&self, words: &[String]) -> Result<Vec<String>> {
        let q = query(
            r#"
            MATCH (w:Word)
            WHERE w.word IN $words AND w.inclusion_net > 0
            RETURN w.word AS word
            "#,
        )
        .param("words", words.to_vec());

        let mut result = self.graph.execute(q).await?;
        let mut accepted = Vec::new();
        while let Some(row) = result.next().await? {
            accepted.push(row.get("word")?);
        }
        Ok(accepted)
    }

    /// Whether a Word node with this text exists.
    pub async fn word_exists(&self, word: &str) -> Result<bool> {
        let q = query("MATCH (w:Word {word: $word}) RETURN count(w) AS total").param("word", word);

        let mut result = self.graph.execute(q).await?;
        let total: i64 = match result.next().await? {
            Some(row) => row.get("total")?,
            None => 0,
        };
        Ok(total > 0)
    }

    /// Clear the node's tag edges and every shared-tag edge it is part of.
    pub async fn clear_tag_edges(&self, node_type: NodeType, id: &str) -> Result<()> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            OPTIONAL MATCH (n)-[t:TAGGED]->(:Word)
            DELETE t
            WITH DISTINCT n
            OPTIONAL MATCH (n)-[st:SHARED_TAG]-()
            DELETE st
            "#,
            node_type.label()
        );
        self.graph.run(query(&cypher).param("id", id)).await?;
        Ok(())
    }

    /// Create or overwrite the node's tag edge for one keyword.
    pub async fn create_tag_edge(
        &self,
        node_type: NodeType,
        id: &str,
        keyword: &KeywordWithFrequency,
    ) -> Result<()> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            MATCH (w:Word {{word: $word}})
            MERGE (n)-[t:TAGGED]->(w)
            SET t.frequency = $frequency, t.source = $source
            "#,
            node_type.label()
        );
        let q = query(&cypher)
            .param("id", id)
            .param("word", keyword.word.clone())
            .param("frequency", keyword.frequency)
            .param("source", keyword.source.as_str());
        self.graph.run(q).await?;
        Ok(())
    }

    /// Other same-type nodes tagging `word`.
    pub async fn nodes_tagging_word(
        &self,
        node_type: NodeType,
        word: &str,
        exclude_id: &str,
    ) -> Result<Vec<TaggedPeer>> {
        let cypher = format!(
            r#"
            MATCH (peer:{})-[t:TAGGED]->(:Word {{word: $word}})
            WHERE peer.id <> $exclude_id
            RETURN peer.id AS id, t.frequency AS frequency
            "#,
            node_type.label()
        );
        let q = query(&cypher)
            .param("word", word)
            .param("exclude_id", exclude_id);

        let mut result = self.graph.execute(q).await?;
        let mut peers = Vec::new();
        while let Some(row) = result.next().await? {
            peers.push(TaggedPeer {
                id: row.get("id")?,
                frequency: row.get("frequency")?,
            });
        }
        Ok(peers)
    }

    /// Accumulate strength on the undirected (pair, word) shared-tag edge.
    pub async fn accumulate_shared_tag(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
        strength: f64,
    ) -> Result<f64> {
        let label = node_type.label();
        let cypher = format!(
            r#"
            MATCH (a:{label} {{id: $a}})
            MATCH (b:{label} {{id: $b}})
            MERGE (a)-[st:SHARED_TAG {{word: $word}}]-(b)
            ON CREATE SET st.strength = $strength
            ON MATCH SET st.strength = st.strength + $strength
            RETURN st.strength AS strength
            "#
        );
        let q = query(&cypher)
            .param("a", a)
            .param("b", b)
            .param("word", word)
            .param("strength", strength);

        let mut result = self.graph.execute(q).await?;
        let row = result
            .next()
            .await?
            .context("shared-tag merge returned no row")?;
        Ok(row.get("strength")?)
    }

    /// Current strength of the (pair, word) shared-tag edge.
    pub async fn shared_tag_strength(
        &self,
        node_type: NodeType,
        a: &str,
        b: &str,
        word: &str,
    ) -> Result<Option<f64>> {
        let label = node_type.label();
        let cypher = format!(
            r#"
            MATCH (a:{label} {{id: $a}})-[st:SHARED_TAG {{word: $word}}]-(b:{label} {{id: $b}})
            RETURN st.strength AS strength
            "#
        );
        let q = query(&cypher).param("a", a).param("b", b).param("word", word);

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(row.get("strength")?)),
            None => Ok(None),
        }
    }

    /// Shared-tag neighbors, strongest first.
    pub async fn related_by_tags(
        &self,
        node_type: NodeType,
        id: &str,
    ) -> Result<Vec<SharedTagLink>> {
        let label = node_type.label();
        let cypher = format!(
            r#"
            MATCH (n:{label} {{id: $id}})-[st:SHARED_TAG]-(peer:{label})
            RETURN peer.id AS peer_id, st.word AS word, st.strength AS strength
            ORDER BY st.strength DESC
            "#
        );
        let q = query(&cypher).param("id", id);

        let mut result = self.graph.execute(q).await?;
        let mut links = Vec::new();
        while let Some(row) = result.next().await? {
            links.push(SharedTagLink {
                peer_id: row.get("peer_id")?,
                word: row.get("word")?,
                strength: row.get("strength")?,
            });
        }
        Ok(links)
    }

    // ========================================================================
    // Categories
    // ========================================================================

    /// Category ids that exist and have passed inclusion.
    pub async fn accepted_categories(&self, ids: &[String]) -> Result<Vec<String>> {
        let q = query(
            r#"
            MATCH (c:Category)
            WHERE c.id IN $ids AND c.inclusion_net > 0
            RETURN c.id AS id
            "#,
        )
        .param("ids", ids.to_vec());

        let mut result = self.graph.execute(q).await?;
        let mut matched = Vec::new();
        while let Some(row) = result.next().await? {
            matched.push(row.get("id")?);
        }
        Ok(matched)
    }

    /// Replace the node's category edge set.
    pub async fn replace_category_edges(
        &self,
        node_type: NodeType,
        id: &str,
        category_ids: &[String],
    ) -> Result<()> {
        let cypher = format!(
            r#"
            MATCH (n:{} {{id: $id}})
            OPTIONAL MATCH (n)-[old:CATEGORIZED_AS]->(:Category)
            DELETE old
            WITH DISTINCT n
            MATCH (c:Category)
            WHERE c.id IN $ids
            CREATE (n)-[:CATEGORIZED_AS]->(c)
            "#,
            node_type.label()
        );
        let q = query(&cypher)
            .param("id", id)
            .param("ids", category_ids.to_vec());
        self.graph.run(q).await?;
        Ok(())
    }

    /// Category ids attached to a node.
    pub async fn node_categories(&self, node_type: NodeType, id: &str) -> Result<Vec<String>> {
        let cypher = format!(
            "MATCH (n:{} {{id: $id}})-[:CATEGORIZED_AS]->(c:Category) RETURN c.id AS id",
            node_type.label()
        );
        let q = query(&cypher).param("id", id);

        let mut result = self.graph.execute(q).await?;
        let mut ids = Vec::new();
        while let Some(row) = result.next().await? {
            ids.push(row.get("id")?);
        }
        Ok(ids)
    }

    /// Link a category to its composed words.
    pub async fn link_composed_words(&self, category_id: &str, words: &[String]) -> Result<()> {
        let q = query(
            r#"
            MATCH (c:Category {id: $id})
            MATCH (w:Word)
            WHERE w.word IN $words
            MERGE (c)-[:COMPOSED_OF]->(w)
            "#,
        )
        .param("id", category_id)
        .param("words", words.to_vec());
        self.graph.run(q).await?;
        Ok(())
    }

    /// Word texts a category is composed of.
    pub async fn category_words(&self, category_id: &str) -> Result<Vec<String>> {
        let q = query(
            r#"
            MATCH (c:Category {id: $id})-[:COMPOSED_OF]->(w:Word)
            RETURN w.word AS word
            ORDER BY w.word
            "#,
        )
        .param("id", category_id);

        let mut result = self.graph.execute(q).await?;
        let mut words = Vec::new();
        while let Some(row) = result.next().await? {
            words.push(row.get("word")?);
        }
        Ok(words)
    }

    // ========================================================================
    // Cross-type reads and links
    // ========================================================================

    /// Net inclusion votes for a node, read at call time.
    pub async fn inclusion_net(&self, node_type: NodeType, id: &str) -> Result<Option<i64>> {
        let cypher = format!(
            "MATCH (n:{} {{id: $id}}) RETURN coalesce(n.inclusion_net, 0) AS net",
            node_type.label()
        );
        let q = query(&cypher).param("id", id);

        let mut result = self.graph.execute(q).await?;
        match result.next().await? {
            Some(row) => Ok(Some(row.get("net")?)),
            None => Ok(None),
        }
    }

    /// Link a dependent child to its parent.
    pub async fn link_parent(
        &self,
        child_type: NodeType,
        child_id: &str,
        parent_type: NodeType,
        parent_id: &str,
    ) -> Result<()> {
        let rel = NodeType::parent_rel(child_type, parent_type).with_context(|| {
            format!("no parent relationship from {child_type} to {parent_type}")
        })?;
        let cypher = format!(
            r#"
            MATCH (child:{} {{id: $child_id}})
            MATCH (parent:{} {{id: $parent_id}})
            MERGE (child)-[:{rel}]->(parent)
            "#,
            child_type.label(),
            parent_type.label()
        );
        let q = query(&cypher)
            .param("child_id", child_id)
            .param("parent_id", parent_id);
        self.graph.run(q).await?;
        Ok(())
    }
}
