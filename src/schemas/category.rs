//! Categories: inclusion-only nodes composed of 1–5 accepted words.

use crate::categories::CategoryBinder;
use crate::content::schema::{require_str, ContentNode, ContentSchema};
use crate::content::service::ContentService;
use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, NodeType, RawContentRecord};
use crate::neo4j::traits::GraphStore;
use std::sync::Arc;

use super::ensure_text;

#[derive(Debug, Clone)]
pub struct CategoryData {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub public_credit: Option<bool>,
}

pub struct CategorySchema;

impl ContentSchema for CategorySchema {
    type Data = CategoryData;
    type Patch = CategoryPatch;

    fn node_type() -> NodeType {
        NodeType::Category
    }

    fn map_data(record: &RawContentRecord) -> Result<Self::Data> {
        Ok(CategoryData {
            name: require_str::<Self>(record, "name")?,
        })
    }

    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)> {
        vec![("name".into(), FieldValue::Str(data.name.clone()))]
    }

    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)> {
        let mut set = Vec::new();
        if let Some(name) = &patch.name {
            set.push(("name".into(), FieldValue::Str(name.clone())));
        }
        if let Some(public_credit) = patch.public_credit {
            set.push(("public_credit".into(), FieldValue::Bool(public_credit)));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct CreateCategoryRequest {
    pub name: String,
    /// Word texts the category is composed of (1–5, each already accepted).
    pub words: Vec<String>,
    pub created_by: String,
    pub public_credit: bool,
}

pub struct CategoryService {
    pub nodes: ContentService<CategorySchema>,
    binder: CategoryBinder,
    store: Arc<dyn GraphStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self {
            nodes: ContentService::new(store.clone()),
            binder: CategoryBinder::new(store.clone()),
            store,
        }
    }

    /// Create a category. The whole composed word set is validated before
    /// the node is written — a partial match aborts the entire creation.
    pub async fn create(&self, req: CreateCategoryRequest) -> Result<ContentNode<CategoryData>> {
        let name = ensure_text(&req.name, "category name")?;
        ensure_text(&req.created_by, "created_by")?;

        let words = self.binder.validate_composition(&req.words).await?;

        let node = self
            .nodes
            .create_node(&req.created_by, req.public_credit, &CategoryData { name })
            .await?;
        self.store
            .link_composed_words(&node.id, &words)
            .await
            .map_err(|e| CoreError::store("link_composed_words", NodeType::Category, e))?;
        Ok(node)
    }

    /// Word texts this category is composed of.
    pub async fn composed_words(&self, id: &str) -> Result<Vec<String>> {
        self.nodes.get(id).await?;
        self.store
            .category_words(id)
            .await
            .map_err(|e| CoreError::store("category_words", NodeType::Category, e))
    }
}
