//! Open questions: inclusion-only prompts that answers attach beneath.

use crate::categories::CategoryBinder;
use crate::collaborators::{KeywordExtractor, KeywordWithFrequency};
use crate::content::schema::{require_str, ContentNode, ContentSchema};
use crate::content::service::ContentService;
use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, NodeType, RawContentRecord, SharedTagLink};
use crate::neo4j::traits::GraphStore;
use crate::tagging::TagPropagator;
use std::sync::Arc;

use super::ensure_text;

#[derive(Debug, Clone)]
pub struct QuestionData {
    pub question_text: String,
}

#[derive(Debug, Clone, Default)]
pub struct QuestionPatch {
    pub question_text: Option<String>,
    pub public_credit: Option<bool>,
}

pub struct QuestionSchema;

impl ContentSchema for QuestionSchema {
    type Data = QuestionData;
    type Patch = QuestionPatch;

    fn node_type() -> NodeType {
        NodeType::OpenQuestion
    }

    fn map_data(record: &RawContentRecord) -> Result<Self::Data> {
        Ok(QuestionData {
            question_text: require_str::<Self>(record, "question_text")?,
        })
    }

    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)> {
        vec![(
            "question_text".into(),
            FieldValue::Str(data.question_text.clone()),
        )]
    }

    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)> {
        let mut set = Vec::new();
        if let Some(text) = &patch.question_text {
            set.push(("question_text".into(), FieldValue::Str(text.clone())));
        }
        if let Some(public_credit) = patch.public_credit {
            set.push(("public_credit".into(), FieldValue::Bool(public_credit)));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct CreateQuestionRequest {
    pub question_text: String,
    pub created_by: String,
    pub public_credit: bool,
    pub keywords: Option<Vec<KeywordWithFrequency>>,
    pub category_ids: Vec<String>,
}

pub struct QuestionService {
    pub nodes: ContentService<QuestionSchema>,
    tags: TagPropagator,
    categories: CategoryBinder,
    extractor: Arc<dyn KeywordExtractor>,
}

impl QuestionService {
    pub fn new(store: Arc<dyn GraphStore>, extractor: Arc<dyn KeywordExtractor>) -> Self {
        Self {
            nodes: ContentService::new(store.clone()),
            tags: TagPropagator::new(store.clone()),
            categories: CategoryBinder::new(store),
            extractor,
        }
    }

    pub async fn create(&self, req: CreateQuestionRequest) -> Result<ContentNode<QuestionData>> {
        let text = ensure_text(&req.question_text, "question text")?;
        ensure_text(&req.created_by, "created_by")?;
        self.categories.validate(&req.category_ids).await?;

        let keywords = match req.keywords {
            Some(keywords) => keywords,
            None => self
                .extractor
                .extract(&text, None)
                .await
                .map_err(|e| CoreError::store("extract_keywords", NodeType::OpenQuestion, e))?,
        };
        self.tags
            .validate(NodeType::OpenQuestion, &keywords)
            .await?;

        let node = self
            .nodes
            .create_node(&req.created_by, req.public_credit, &QuestionData {
                question_text: text,
            })
            .await?;
        self.tags
            .apply(NodeType::OpenQuestion, &node.id, &keywords, false)
            .await?;
        self.categories
            .attach(NodeType::OpenQuestion, &node.id, &req.category_ids)
            .await?;
        Ok(node)
    }

    pub async fn related(&self, id: &str) -> Result<Vec<SharedTagLink>> {
        self.tags.related(NodeType::OpenQuestion, id).await
    }
}
