//! Generic content lifecycle, implemented once and specialized per type
//! through [`ContentSchema`].

use super::policy;
use super::schema::{map_record, ContentNode, ContentSchema};
use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, UserVoteStatus, VoteKind, VoteTotals};
use crate::neo4j::traits::GraphStore;
use crate::voting::VoteLedger;
use chrono::Utc;
use std::marker::PhantomData;
use std::sync::Arc;
use uuid::Uuid;

/// The shared node lifecycle for one content type.
pub struct ContentService<T: ContentSchema> {
    store: Arc<dyn GraphStore>,
    ledger: VoteLedger,
    _schema: PhantomData<T>,
}

impl<T: ContentSchema> ContentService<T> {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            ledger: VoteLedger::new(store.clone()),
            store,
            _schema: PhantomData,
        }
    }

    /// Write a new node: envelope fields, zeroed counters, and the type
    /// payload. Used by the type-specific creation flows after their own
    /// validation has run.
    pub(crate) async fn create_node(
        &self,
        created_by: &str,
        public_credit: bool,
        data: &T::Data,
    ) -> Result<ContentNode<T::Data>> {
        let id = Uuid::new_v4().to_string();
        let mut props: Vec<(String, FieldValue)> = vec![
            ("id".into(), FieldValue::Str(id.clone())),
            ("created_by".into(), FieldValue::Str(created_by.to_string())),
            ("public_credit".into(), FieldValue::Bool(public_credit)),
            (
                "created_at".into(),
                FieldValue::Str(Utc::now().to_rfc3339()),
            ),
            ("inclusion_positive".into(), FieldValue::Int(0)),
            ("inclusion_negative".into(), FieldValue::Int(0)),
            ("inclusion_net".into(), FieldValue::Int(0)),
            ("content_positive".into(), FieldValue::Int(0)),
            ("content_negative".into(), FieldValue::Int(0)),
            ("content_net".into(), FieldValue::Int(0)),
        ];
        props.extend(T::data_props(data));

        let record = self
            .store
            .create_content(T::node_type(), props)
            .await
            .map_err(|e| CoreError::store("create", T::node_type(), e))?;
        let node = map_record::<T>(&record)?;
        tracing::info!(node_type = %T::node_type(), id = %node.id, "created content node");
        Ok(node)
    }

    pub async fn get(&self, id: &str) -> Result<ContentNode<T::Data>> {
        ensure_id(id)?;
        let record = self
            .store
            .get_content(T::node_type(), id)
            .await
            .map_err(|e| CoreError::store("get", T::node_type(), e))?
            .ok_or_else(|| CoreError::not_found(T::node_type(), id))?;
        map_record::<T>(&record)
    }

    /// Simple-field update. Structural fields (keywords, categories,
    /// parents) are rewritten through their dedicated paths, never here.
    pub async fn update(&self, id: &str, patch: &T::Patch) -> Result<ContentNode<T::Data>> {
        ensure_id(id)?;
        let mut set = T::patch_props(patch);
        set.push((
            "updated_at".into(),
            FieldValue::Str(Utc::now().to_rfc3339()),
        ));

        let record = self
            .store
            .update_content(T::node_type(), id, set)
            .await
            .map_err(|e| CoreError::store("update", T::node_type(), e))?
            .ok_or_else(|| CoreError::not_found(T::node_type(), id))?;
        map_record::<T>(&record)
    }

    /// Delete the node and everything it exclusively owns. Deleting a
    /// missing id is NotFound, not a silent success.
    pub async fn delete(&self, id: &str) -> Result<()> {
        ensure_id(id)?;
        self.get(id).await?;

        let deleted = self
            .store
            .delete_content(T::node_type(), id)
            .await
            .map_err(|e| CoreError::store("delete", T::node_type(), e))?;
        if !deleted {
            return Err(CoreError::not_found(T::node_type(), id));
        }
        tracing::info!(node_type = %T::node_type(), id, "deleted content node");
        Ok(())
    }

    // ========================================================================
    // Voting
    // ========================================================================

    pub async fn vote_inclusion(
        &self,
        id: &str,
        user_id: &str,
        positive: bool,
    ) -> Result<VoteTotals> {
        self.ledger
            .cast(T::node_type(), id, user_id, VoteKind::Inclusion, positive)
            .await
    }

    /// Content-quality vote. Fails fast with a type-named error on
    /// inclusion-only types regardless of vote counts, and on supported
    /// types until inclusion has passed.
    pub async fn vote_content(
        &self,
        id: &str,
        user_id: &str,
        positive: bool,
    ) -> Result<VoteTotals> {
        if !T::supports_content_voting() {
            return Err(CoreError::precondition(format!(
                "{} does not support content voting",
                T::node_type()
            )));
        }

        let totals = self.ledger.totals(T::node_type(), id).await?;
        if !policy::content_voting_allowed(T::node_type(), totals.inclusion_net) {
            return Err(CoreError::precondition(format!(
                "{} {id} has not passed inclusion (net {}); content voting is locked",
                T::node_type(),
                totals.inclusion_net
            )));
        }

        self.ledger
            .cast(T::node_type(), id, user_id, VoteKind::Content, positive)
            .await
    }

    /// Personal vote statuses plus aggregates; an absent user yields
    /// aggregates only.
    pub async fn vote_status(&self, id: &str, user_id: Option<&str>) -> Result<UserVoteStatus> {
        self.ledger.status(T::node_type(), id, user_id).await
    }

    pub async fn remove_vote(&self, id: &str, user_id: &str, kind: VoteKind) -> Result<VoteTotals> {
        self.ledger.remove(T::node_type(), id, user_id, kind).await
    }

    pub async fn votes(&self, id: &str) -> Result<VoteTotals> {
        self.ledger.totals(T::node_type(), id).await
    }

    // ========================================================================
    // Visibility
    // ========================================================================

    pub async fn set_visibility(&self, id: &str, visible: bool) -> Result<ContentNode<T::Data>> {
        ensure_id(id)?;
        let set = vec![
            ("visible".into(), FieldValue::Bool(visible)),
            (
                "updated_at".into(),
                FieldValue::Str(Utc::now().to_rfc3339()),
            ),
        ];
        let record = self
            .store
            .update_content(T::node_type(), id, set)
            .await
            .map_err(|e| CoreError::store("set_visibility", T::node_type(), e))?
            .ok_or_else(|| CoreError::not_found(T::node_type(), id))?;
        map_record::<T>(&record)
    }

    /// Defaults to visible when the author never toggled it.
    pub async fn get_visibility(&self, id: &str) -> Result<bool> {
        Ok(self.get(id).await?.is_visible())
    }
}

fn ensure_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        Err(CoreError::validation("node id must not be empty"))
    } else {
        Ok(())
    }
}
