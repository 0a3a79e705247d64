//! Graph models shared by the Neo4j client and the in-memory mock.
//!
//! Everything read back from the store passes through [`RawContentRecord`],
//! which normalizes bolt integers and floats into plain `i64`/`f64` at the
//! boundary so business logic never sees driver value types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

// ============================================================================
// Content node types
// ============================================================================

/// The content types stored in the graph. Each maps to one node label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Word,
    Definition,
    Statement,
    OpenQuestion,
    Answer,
    Category,
}

impl NodeType {
    /// Neo4j node label for this type.
    pub fn label(self) -> &'static str {
        match self {
            NodeType::Word => "Word",
            NodeType::Definition => "Definition",
            NodeType::Statement => "Statement",
            NodeType::OpenQuestion => "OpenQuestion",
            NodeType::Answer => "Answer",
            NodeType::Category => "Category",
        }
    }

    /// Whether this type carries the secondary quality vote. Words, open
    /// questions, and categories are inclusion-only; their content counters
    /// stay pinned at zero.
    pub fn supports_content_voting(self) -> bool {
        matches!(
            self,
            NodeType::Definition | NodeType::Statement | NodeType::Answer
        )
    }

    /// Relationship type linking a dependent child to its parent, when the
    /// pair is one of the supported dependent-creation shapes.
    pub fn parent_rel(child: NodeType, parent: NodeType) -> Option<&'static str> {
        match (child, parent) {
            (NodeType::Answer, NodeType::OpenQuestion) => Some("ANSWERS"),
            (NodeType::Definition, NodeType::Word) => Some("DEFINES"),
            _ => None,
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Word => "word",
            NodeType::Definition => "definition",
            NodeType::Statement => "statement",
            NodeType::OpenQuestion => "open question",
            NodeType::Answer => "answer",
            NodeType::Category => "category",
        };
        write!(f, "{name}")
    }
}

// ============================================================================
// Votes
// ============================================================================

/// The two independent vote phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VoteKind {
    Inclusion,
    Content,
}

impl VoteKind {
    /// Wire value stored on the `VOTED_ON` relationship.
    pub fn as_str(self) -> &'static str {
        match self {
            VoteKind::Inclusion => "INCLUSION",
            VoteKind::Content => "CONTENT",
        }
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single user's stance on one vote kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Agree,
    Disagree,
}

impl VoteStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            VoteStatus::Agree => "agree",
            VoteStatus::Disagree => "disagree",
        }
    }

    pub fn from_positive(positive: bool) -> Self {
        if positive {
            VoteStatus::Agree
        } else {
            VoteStatus::Disagree
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "agree" => Some(VoteStatus::Agree),
            "disagree" => Some(VoteStatus::Disagree),
            _ => None,
        }
    }
}

/// Denormalized per-node vote counters, maintained by the ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteTotals {
    pub inclusion_positive: i64,
    pub inclusion_negative: i64,
    pub inclusion_net: i64,
    pub content_positive: i64,
    pub content_negative: i64,
    pub content_net: i64,
}

/// A user's personal vote statuses plus the public aggregates. For anonymous
/// callers both statuses are `None` and only the totals are meaningful.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserVoteStatus {
    pub inclusion: Option<VoteStatus>,
    pub content: Option<VoteStatus>,
    pub totals: VoteTotals,
}

// ============================================================================
// Store boundary values
// ============================================================================

/// A single property value, already normalized from the driver's bolt types.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::Str(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::Str(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Int(v)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Bool(v)
    }
}

/// A content node's property map as read from the store.
#[derive(Debug, Clone, Default)]
pub struct RawContentRecord {
    pub props: HashMap<String, FieldValue>,
}

impl RawContentRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: FieldValue) {
        self.props.insert(key.into(), value);
    }

    pub fn str(&self, key: &str) -> Option<&str> {
        match self.props.get(key) {
            Some(FieldValue::Str(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Integer read; wide/boxed representations collapse to a plain `i64`
    /// and missing or null properties read as zero.
    pub fn int(&self, key: &str) -> i64 {
        match self.props.get(key) {
            Some(FieldValue::Int(v)) => *v,
            Some(FieldValue::Float(v)) => *v as i64,
            _ => 0,
        }
    }

    pub fn float(&self, key: &str) -> f64 {
        match self.props.get(key) {
            Some(FieldValue::Float(v)) => *v,
            Some(FieldValue::Int(v)) => *v as f64,
            _ => 0.0,
        }
    }

    pub fn bool_opt(&self, key: &str) -> Option<bool> {
        match self.props.get(key) {
            Some(FieldValue::Bool(v)) => Some(*v),
            _ => None,
        }
    }

    /// RFC 3339 timestamp read.
    pub fn datetime(&self, key: &str) -> Option<DateTime<Utc>> {
        self.str(key)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// The six denormalized vote counters.
    pub fn vote_totals(&self) -> VoteTotals {
        VoteTotals {
            inclusion_positive: self.int("inclusion_positive"),
            inclusion_negative: self.int("inclusion_negative"),
            inclusion_net: self.int("inclusion_net"),
            content_positive: self.int("content_positive"),
            content_negative: self.int("content_negative"),
            content_net: self.int("content_net"),
        }
    }
}

// ============================================================================
// Tag propagation records
// ============================================================================

/// Another node of the same type tagging a given word, with the frequency
/// carried on its tag edge.
#[derive(Debug, Clone, PartialEq)]
pub struct TaggedPeer {
    pub id: String,
    pub frequency: f64,
}

/// One shared-tag edge incident to a node, as returned by the
/// related-content read path.
#[derive(Debug, Clone, PartialEq)]
pub struct SharedTagLink {
    pub peer_id: String,
    pub word: String,
    pub strength: f64,
}
