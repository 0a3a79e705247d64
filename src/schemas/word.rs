//! Words: the graph's vocabulary. Inclusion-only voting; accepted words
//! double as the keyword nodes the tag propagation engine links against.

use crate::collaborators::DictionaryClient;
use crate::content::schema::{require_str, ContentNode, ContentSchema};
use crate::content::service::ContentService;
use crate::error::{CoreError, Result};
use crate::neo4j::models::{FieldValue, NodeType, RawContentRecord};
use crate::neo4j::traits::GraphStore;
use std::sync::Arc;

use super::definition::{DefinitionData, DefinitionSchema};
use super::ensure_text;

#[derive(Debug, Clone)]
pub struct WordData {
    pub word: String,
}

/// Simple-field update surface. The word text itself is identity and never
/// patched.
#[derive(Debug, Clone, Default)]
pub struct WordPatch {
    pub public_credit: Option<bool>,
}

pub struct WordSchema;

impl ContentSchema for WordSchema {
    type Data = WordData;
    type Patch = WordPatch;

    fn node_type() -> NodeType {
        NodeType::Word
    }

    fn map_data(record: &RawContentRecord) -> Result<Self::Data> {
        Ok(WordData {
            word: require_str::<Self>(record, "word")?,
        })
    }

    fn data_props(data: &Self::Data) -> Vec<(String, FieldValue)> {
        vec![("word".into(), FieldValue::Str(data.word.clone()))]
    }

    fn patch_props(patch: &Self::Patch) -> Vec<(String, FieldValue)> {
        let mut set = Vec::new();
        if let Some(public_credit) = patch.public_credit {
            set.push(("public_credit".into(), FieldValue::Bool(public_credit)));
        }
        set
    }
}

#[derive(Debug, Clone)]
pub struct CreateWordRequest {
    pub word: String,
    pub created_by: String,
    pub public_credit: bool,
}

pub struct WordService {
    pub nodes: ContentService<WordSchema>,
    definitions: ContentService<DefinitionSchema>,
    store: Arc<dyn GraphStore>,
    dictionary: Option<Arc<dyn DictionaryClient>>,
}

impl WordService {
    pub fn new(store: Arc<dyn GraphStore>, dictionary: Option<Arc<dyn DictionaryClient>>) -> Self {
        Self {
            nodes: ContentService::new(store.clone()),
            definitions: ContentService::new(store.clone()),
            store,
            dictionary,
        }
    }

    /// Create a word. The text is normalized to lowercase and must be new
    /// to the graph. When a dictionary client is configured and has an
    /// entry, the word's initial definition is created in the same flow —
    /// initial definitions ride on word creation and skip the
    /// definition-creation gate; later definitions do not.
    pub async fn create(&self, req: CreateWordRequest) -> Result<ContentNode<WordData>> {
        let word = ensure_text(&req.word, "word text")?.to_lowercase();
        ensure_text(&req.created_by, "created_by")?;

        let exists = self
            .store
            .word_exists(&word)
            .await
            .map_err(|e| CoreError::store("word_exists", NodeType::Word, e))?;
        if exists {
            return Err(CoreError::validation(format!(
                "word `{word}` already exists"
            )));
        }

        let node = self
            .nodes
            .create_node(&req.created_by, req.public_credit, &WordData { word: word.clone() })
            .await?;

        if let Some(dictionary) = &self.dictionary {
            match dictionary.lookup(&word).await {
                Ok(Some(text)) => {
                    let definition = self
                        .definitions
                        .create_node(&req.created_by, false, &DefinitionData {
                            definition_text: text,
                        })
                        .await?;
                    self.store
                        .link_parent(
                            NodeType::Definition,
                            &definition.id,
                            NodeType::Word,
                            &node.id,
                        )
                        .await
                        .map_err(|e| CoreError::store("link_parent", NodeType::Definition, e))?;
                }
                Ok(None) => {}
                Err(e) => {
                    tracing::warn!(
                        word = %word,
                        error = %e,
                        "dictionary lookup failed; word created without initial definition"
                    );
                }
            }
        }

        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neo4j::mock::MockGraphStore;
    use crate::test_helpers::StubDictionary;

    fn request(word: &str) -> CreateWordRequest {
        CreateWordRequest {
            word: word.to_string(),
            created_by: "alice".to_string(),
            public_credit: true,
        }
    }

    #[tokio::test]
    async fn create_normalizes_to_lowercase() {
        let store = Arc::new(MockGraphStore::new());
        let words = WordService::new(store, None);

        let node = words.create(request("  Agora ")).await.unwrap();
        assert_eq!(node.data.word, "agora");
        assert_eq!(node.votes.inclusion_net, 0);
    }

    #[tokio::test]
    async fn duplicate_word_is_rejected() {
        let store = Arc::new(MockGraphStore::new());
        let words = WordService::new(store, None);

        words.create(request("agora")).await.unwrap();
        let err = words.create(request("AGORA")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }

    #[tokio::test]
    async fn empty_word_rejected_before_store_access() {
        let store = Arc::new(MockGraphStore::new());
        let words = WordService::new(store.clone(), None);

        let err = words.create(request("   ")).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
        assert!(store.nodes.read().await.is_empty());
    }

    #[tokio::test]
    async fn content_voting_always_fails_for_words() {
        let store = Arc::new(MockGraphStore::new());
        let words = WordService::new(store, None);
        let node = words.create(request("agora")).await.unwrap();

        // Even with inclusion passed, words stay inclusion-only.
        words.nodes.vote_inclusion(&node.id, "bob", true).await.unwrap();
        let err = words
            .nodes
            .vote_content(&node.id, "bob", true)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::PreconditionFailed(_)));
        assert!(err.to_string().contains("word does not support content voting"));
    }

    #[tokio::test]
    async fn dictionary_backfills_initial_definition() {
        let store = Arc::new(MockGraphStore::new());
        let dictionary = Arc::new(StubDictionary::with("agora", "a public open space"));
        let words = WordService::new(store.clone(), Some(dictionary));

        let node = words.create(request("agora")).await.unwrap();

        let nodes = store.nodes.read().await;
        let definition = nodes
            .iter()
            .find(|((t, _), _)| *t == NodeType::Definition)
            .expect("initial definition should exist");
        assert_eq!(
            definition.1.get("definition_text"),
            Some(&FieldValue::Str("a public open space".into()))
        );
        drop(nodes);

        let links = store.parent_links.read().await;
        let (parent_type, parent_id) = links
            .values()
            .next()
            .expect("definition should link to its word");
        assert_eq!(*parent_type, NodeType::Word);
        assert_eq!(parent_id, &node.id);
    }

    #[tokio::test]
    async fn missing_dictionary_entry_creates_no_definition() {
        let store = Arc::new(MockGraphStore::new());
        let dictionary = Arc::new(StubDictionary::default());
        let words = WordService::new(store.clone(), Some(dictionary));

        words.create(request("agora")).await.unwrap();
        let nodes = store.nodes.read().await;
        assert!(!nodes.iter().any(|((t, _), _)| *t == NodeType::Definition));
    }
}
