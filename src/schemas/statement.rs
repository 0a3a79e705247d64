//! Statements: free-standing claims with keywords, categories, and both
//! vote phases.

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
pub struct StatementData {
    pub statement: String,
}

#[derive(Debug, Clone, Default)]
pub struct StatementPatch {
    pub statement: Option<String>,
    pub public_credit: Option<bool>,
}

pub struct StatementSchema;

impl ContentSchema for StatementSchema {
    type Data = StatementData;
    type Patch = StatementPatch;

    fn node_type() -> NodeType {
        NodeType::Statement
    }

    fn map_data(record: &RawContentRecord) -> Result<Self::Data> {
        Ok(StatementData {
            statement: require_str::<Self>(record, "statement")?,
        })
    }

    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)> {
        vec![("statement".into(), FieldValue::Str(data.statement.clone()))]
    }

    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)> {
        let mut set = Vec::new();
        if let Some(text) = &patch.statement {
            set.push(("statement".into(), FieldValue::Str(text.clone())));
        }
        if let Some(public_credit) = patch.public_credit {
            set.push(("public_credit".into(), FieldValue::Bool(public_credit)));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct CreateStatementRequest {
    pub statement: String,
    pub created_by: String,
    pub public_credit: bool,
    /// Author-supplied keywords; when absent the extraction service runs on
    /// the statement text.
    pub keywords: Option<Vec<KeywordWithFrequency>>,
    pub category_ids: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateStatementRequest {
    pub statement: Option<String>,
    pub public_credit: Option<bool>,
    /// `Some` re-runs tag propagation with replacement.
    pub keywords: Option<Vec<KeywordWithFrequency>>,
    /// `Some` replaces the category edge set.
    pub category_ids: Option<Vec<String>>,
}

pub struct StatementService {
    pub nodes: ContentService<StatementSchema>,
    tags: TagPropagator,
    categories: CategoryBinder,
    extractor: Arc<dyn KeywordExtractor>,
}

impl StatementService {
    pub fn new(store: Arc<dyn GraphStore>, extractor: Arc<dyn KeywordExtractor>) -> Self {
        Self {
            nodes: ContentService::new(store.clone()),
            tags: TagPropagator::new(store.clone()),
            categories: CategoryBinder::new(store),
            extractor,
        }
    }

    /// Create a statement. Keyword and category sets are validated in full
    /// before the node is written, so a partial match aborts the entire
    /// creation.
    pub async fn create(&self, req: CreateStatementRequest) -> Result<ContentNode<StatementData>> {
        let text = ensure_text(&req.statement, "statement text")?;
        ensure_text(&req.created_by, "created_by")?;
        self.categories.validate(&req.category_ids).await?;

        let keywords = self.resolve_keywords(&text, req.keywords).await?;
        self.tags
            .validate(NodeType::Statement, &keywords)
            .await?;

        let node = self
            .nodes
            .create_node(&req.created_by, req.public_credit, &StatementData {
                statement: text,
            })
            .await?;
        self.tags
            .apply(NodeType::Statement, &node.id, &keywords, false)
            .await?;
        self.categories
            .attach(NodeType::Statement, &node.id, &req.category_ids)
            .await?;
        Ok(node)
    }

    /// Update simple fields, and rewrite keyword/category relationships
    /// when the request carries them.
    pub async fn update(
        &self,
        id: &str,
        req: UpdateStatementRequest,
    ) -> Result<ContentNode<StatementData>> {
        self.nodes
            .update(
                id,
                &StatementPatch {
                    statement: req.statement,
                    public_credit: req.public_credit,
                },
            )
            .await?;

        if let Some(keywords) = &req.keywords {
            self.tags
                .apply(NodeType::Statement, id, keywords, true)
                .await?;
        }
        if let Some(category_ids) = &req.category_ids {
            self.categories
                .attach(NodeType::Statement, id, category_ids)
                .await?;
        }
        self.nodes.get(id).await
    }

    /// Other statements sharing tagged keywords, strongest overlap first.
    pub async fn related(&self, id: &str) -> Result<Vec<SharedTagLink>> {
        self.tags.related(NodeType::Statement, id).await
    }

    pub async fn categories_of(&self, id: &str) -> Result<Vec<String>> {
        self.categories.categories_of(NodeType::Statement, id).await
    }

    async fn resolve_keywords(
        &self,
        text: &str,
        supplied: Option<Vec<KeywordWithFrequency>>,
    ) -> Result<Vec<KeywordWithFrequency>> {
        match supplied {
            Some(keywords) => Ok(keywords),
            None => self
                .extractor
                .extract(text, None)
                .await
                .map_err(|e| CoreError::store("extract_keywords", NodeType::Statement, e)),
        }
    }
}
