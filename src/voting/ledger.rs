//! Vote ledger: at most one live vote per (node, user, kind), with
//! denormalized counters kept consistent by the store's recount-on-write.
//!
//! The upsert/flip/no-op semantics live in the store statement itself (the
//! counters are recomputed from the vote rows in the same write), so
//! repeated identical casts are idempotent and a flip moves both counters
//! by exactly one.

use crate::error::{CoreError, Result};
use crate::neo4j::models::{NodeType, UserVoteStatus, VoteKind, VoteTotals};
use crate::neo4j::traits::GraphStore;
use std::sync::Arc;

pub struct VoteLedger {
    store: Arc<dyn GraphStore>,
}

impl VoteLedger {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }

    /// Upsert a vote. Creates, flips, or no-ops depending on the prior vote
    /// for this (node, user, kind).
    pub async fn cast(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
        positive: bool,
    ) -> Result<VoteTotals> {
        ensure_id(id)?;
        ensure_user(user_id)?;

        let totals = self
            .store
            .cast_vote(node_type, id, user_id, kind, positive)
            .await
            .map_err(|e| CoreError::store("cast_vote", node_type, e))?
            .ok_or_else(|| CoreError::not_found(node_type, id))?;
        tracing::info!(node_type = %node_type, id, kind = %kind, positive, "vote cast");
        Ok(totals)
    }

    /// Delete a vote and decrement the counter it contributed to. Removing
    /// a vote that does not exist is a no-op, not an error.
    pub async fn remove(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: &str,
        kind: VoteKind,
    ) -> Result<VoteTotals> {
        ensure_id(id)?;
        ensure_user(user_id)?;

        let totals = self
            .store
            .remove_vote(node_type, id, user_id, kind)
            .await
            .map_err(|e| CoreError::store("remove_vote", node_type, e))?
            .ok_or_else(|| CoreError::not_found(node_type, id))?;
        tracing::info!(node_type = %node_type, id, kind = %kind, "vote removed");
        Ok(totals)
    }

    /// Personal statuses plus aggregates. With an empty or absent user this
    /// returns aggregate counters only — the public vote-count display.
    pub async fn status(
        &self,
        node_type: NodeType,
        id: &str,
        user_id: Option<&str>,
    ) -> Result<UserVoteStatus> {
        ensure_id(id)?;

        match user_id.map(str::trim).filter(|u| !u.is_empty()) {
            Some(user) => self
                .store
                .get_vote_status(node_type, id, user)
                .await
                .map_err(|e| CoreError::store("get_vote_status", node_type, e))?
                .ok_or_else(|| CoreError::not_found(node_type, id)),
            None => {
                let totals = self.totals(node_type, id).await?;
                Ok(UserVoteStatus {
                    inclusion: None,
                    content: None,
                    totals,
                })
            }
        }
    }

    /// Aggregate counters.
    pub async fn totals(&self, node_type: NodeType, id: &str) -> Result<VoteTotals> {
        ensure_id(id)?;
        self.store
            .get_vote_totals(node_type, id)
            .await
            .map_err(|e| CoreError::store("get_vote_totals", node_type, e))?
            .ok_or_else(|| CoreError::not_found(node_type, id))
    }
}

fn ensure_id(id: &str) -> Result<()> {
    if id.trim().is_empty() {
        Err(CoreError::validation("node id must not be empty"))
    } else {
        Ok(())
    }
}

fn ensure_user(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        Err(CoreError::validation("user id must not be empty"))
    } else {
        Ok(())
    }
}
