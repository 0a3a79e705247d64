//! The polymorphic content contract: per-type override points and the
//! shared node envelope.
//!
//! A content type supplies exactly three policy points — its content-voting
//! flag, the mapping from a raw store record to its typed payload, and the
//! set clauses for a simple-field update — and inherits the whole lifecycle
//! from [`super::service::ContentService`].

use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, NodeType, RawContentRecord, VoteTotals};
use chrono::{DateTime, Utc};
use std::fmt;

/// Canonical shape shared by every content node, generic over the per-type
/// payload.
#[derive(Debug, Clone)]
pub struct ContentNode<D> {
    pub id: String,
    pub node_type: NodeType,
    pub created_by: String,
    pub public_credit: bool,
    /// `None` means the author never toggled visibility; treated as visible.
    pub visibility: Option<bool>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub votes: VoteTotals,
    pub data: D,
}

impl<D> ContentNode<D> {
    pub fn is_visible(&self) -> bool {
        self.visibility.unwrap_or(true)
    }

    pub fn has_passed_inclusion(&self) -> bool {
        super::policy::has_passed_inclusion(self.votes.inclusion_net)
    }
}

/// Per-type override points. Everything else is inherited.
pub trait ContentSchema: Send + Sync + 'static {
    /// Typed payload stored alongside the shared envelope fields.
    type Data: Clone + fmt::Debug + Send + Sync;
    /// Partial-update shape accepted by `update`.
    type Patch: Send + Sync;

    fn node_type() -> NodeType;

    /// Whether this type carries the secondary quality vote.
    fn supports_content_voting() -> bool {
        Self::node_type().supports_content_voting()
    }

    /// Map the payload fields out of a raw store record.
    fn map_data(record: &RawContentRecord) -> Result<Self::Data>;

    /// Payload properties written at creation.
    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)>;

    /// SET clauses for a simple-field update. Identifier and structural
    /// fields (keywords, category ids, parent links) never appear here;
    /// those go through the dedicated relationship-rewrite paths.
    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)>;
}

/// Map a full record (envelope + payload) into a typed node.
pub fn map_record<T: ContentSchema>(record: &RawContentRecord) -> Result<ContentNode<T::Data>> {
    Ok(ContentNode {
        id: require_str::<T>(record, "id")?,
        node_type: T::node_type(),
        created_by: require_str::<T>(record, "created_by")?,
        public_credit: record.bool_opt("public_credit").unwrap_or(false),
        visibility: record.bool_opt("visible"),
        created_at: record
            .datetime("created_at")
            .ok_or_else(|| malformed::<T>("created_at"))?,
        updated_at: record.datetime("updated_at"),
        votes: record.vote_totals(),
        data: T::map_data(record)?,
    })
}

/// Fetch a required string payload field, erroring as a store-boundary
/// failure when the record is malformed.
pub fn require_str<T: ContentSchema>(record: &RawContentRecord, field: &str) -> Result<String> {
    record
        .str(field)
        .map(|s| s.to_string())
        .ok_or_else(|| malformed::<T>(field))
}

fn malformed<T: ContentSchema>(field: &str) -> CoreError {
    CoreError::store(
        "map_fields",
        T::node_type(),
        anyhow::anyhow!("record is missing property `{field}`"),
    )
}
