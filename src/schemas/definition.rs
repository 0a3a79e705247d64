//! Definitions attach beneath words. Creation is gated on the parent word
//! having passed inclusion; the definitions themselves carry both vote
//! phases.

use crate::content::gate;
use crate::content::schema::{require_str, ContentNode, ContentSchema};
use crate::content::service::ContentService;
use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, NodeType, RawContentRecord};
use crate::neo4j::traits::GraphStore;
use std::sync::Arc;

use super::ensure_text;

#[derive(Debug, Clone)]
pub struct DefinitionData {
    pub definition_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct DefinitionPatch {
    pub definition_text: Option<String>,
    pub public_credit: Option<bool>,
}

pub struct DefinitionSchema;

impl ContentSchema for DefinitionSchema {
    type Data = DefinitionData;
    type Patch = DefinitionPatch;

    fn node_type() -> NodeType {
        NodeType::Definition
    }

    fn map_data(record: &RawContentRecord) -> Result<Self::Data> {
        Ok(DefinitionData {
            definition_text: require_str::<Self>(record, "definition_text")?,
        })
    }

    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)> {
        vec![(
            "definition_text".into(),
            FieldValue::Str(data.definition_text.clone()),
        )]
    }

    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)> {
        let mut set = Vec::new();
        if let Some(text) = &patch.definition_text {
            set.push(("definition_text".into(), FieldValue::Str(text.clone())));
        }
        if let Some(public_credit) = patch.public_credit {
            set.push(("public_credit".into(), FieldValue::Bool(public_credit)));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct CreateDefinitionRequest {
    pub word_id: String,
    pub definition_text: String,
    pub created_by: String,
    pub public_credit: bool,
}

pub struct DefinitionService {
    pub nodes: ContentService<DefinitionSchema>,
    store: Arc<dyn GraphStore>,
}

impl DefinitionService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            nodes: ContentService::new(store.clone()),
            store,
        }
    }

    /// Create a definition beneath a word. The parent word's inclusion
    /// state is re-read at call time.
    pub async fn create(
        &self,
        req: CreateDefinitionRequest,
    ) -> Result<ContentNode<DefinitionData>> {
        let text = ensure_text(&req.definition_text, "definition text")?;
        ensure_text(&req.created_by, "created_by")?;

        gate::ensure_parent_accepted(self.store.as_ref(), NodeType::Word, &req.word_id).await?;

        let node = self
            .nodes
            .create_node(&req.created_by, req.public_credit, &DefinitionData {
                definition_text: text,
            })
            .await?;
        self.store
            .link_parent(NodeType::Definition, &node.id, NodeType::Word, &req.word_id)
            .await
            .map_err(|e| CoreError::store("link_parent", NodeType::Definition, e))?;
        Ok(node)
    }
}
