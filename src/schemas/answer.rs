//! Answers attach beneath open questions that have passed inclusion.

use crate::categories::CategoryBinder;
use crate::collaborators::{KeywordExtractor, KeywordWithFrequency};
use crate::content::gate;
use crate::content::schema::{require_str, ContentNode, ContentSchema};
use crate::content::service::ContentService;
use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, NodeType, RawContentRecord};
use crate::neo4j::traits::GraphStore;
use crate::tagging::TagPropagator;
use std::sync::Arc;

use super::ensure_text;

#[derive(Debug, Clone)]
pub struct AnswerData {
    pub answer_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerPatch {
    pub answer_text: Option<String>,
    pub public_credit: Option<bool>,
}

pub struct AnswerSchema;

impl ContentSchema for AnswerSchema {
    type Data = AnswerData;
    type Patch = AnswerPatch;

    fn node_type() -> NodeType {
        NodeType::Answer
    }

    fn map_data(record: &RawContentRecord) -> Result<Self::Data> {
        Ok(AnswerData {
            answer_text: require_str::<Self>(record, "answer_text")?,
        })
    }

    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)> {
        vec![(
            "answer_text".into(),
            FieldValue::Str(data.answer_text.clone()),
        )]
    }

    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)> {
        let mut set = Vec::new();
        if let Some(text) = &patch.answer_text {
            set.push(("answer_text".into(), FieldValue::Str(text.clone())));
        }
        if let Some(public_credit) = patch.public_credit {
            set.push(("public_credit".into(), FieldValue::Bool(public_credit)));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct CreateAnswerRequest {
    pub question_id: String,
    pub answer_text: String,
    pub created_by: String,
    pub public_credit: bool,
    pub keywords: Option<Vec<KeywordWithFrequency>>,
    pub category_ids: Vec<String>,
}

pub struct AnswerService {
    pub nodes: ContentService<AnswerSchema>,
    tags: TagPropagator,
    categories: CategoryBinder,
    extractor: Arc<dyn KeywordExtractor>,
    store: Arc<dyn GraphStore>,
}

impl AnswerService {
    pub fn new(store: Arc<dyn GraphStore>, extractor: Arc<dyn KeywordExtractor>) -> Self {
        Self {
            nodes: ContentService::new(store.clone()),
            tags: TagPropagator::new(store.clone()),
            categories: CategoryBinder::new(store.clone()),
            extractor,
            store,
        }
    }

    /// Create an answer beneath a question. The parent's inclusion state is
    /// re-read at call time; a parent that has not passed inclusion rejects
    /// the creation.
    pub async fn create(&self, req: CreateAnswerRequest) -> Result<ContentNode<AnswerData>> {
        let text = ensure_text(&req.answer_text, "answer text")?;
        ensure_text(&req.created_by, "created_by")?;

        gate::ensure_parent_accepted(
            self.store.as_ref(),
            NodeType::OpenQuestion,
            &req.question_id,
        )
        .await?;
        self.categories.validate(&req.category_ids).await?;

        let keywords = match req.keywords {
            Some(keywords) => keywords,
            None => self
                .extractor
                .extract(&text, None)
                .await
                .map_err(|e| CoreError::store("extract_keywords", NodeType::Answer, e))?,
        };
        self.tags.validate(NodeType::Answer, &keywords).await?;

        let node = self
            .nodes
            .create_node(&req.created_by, req.public_credit, &AnswerData {
                answer_text: text,
            })
            .await?;
        self.store
            .link_parent(
                NodeType::Answer,
                &node.id,
                NodeType::OpenQuestion,
                &req.question_id,
            )
            .await
            .map_err(|e| CoreError::store("link_parent", NodeType::Answer, e))?;
        self.tags
            .apply(NodeType::Answer, &node.id, &keywords, false)
            .await?;
        self.categories
            .attach(NodeType::Answer, &node.id, &req.category_ids)
            .await?;
        Ok(node)
    }
}
