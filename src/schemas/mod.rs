//! Type-specific content services.
//!
//! Each service composes the shared pieces — the generic content contract,
//! the vote ledger, tag propagation, category attachment, and the
//! dependent-creation gate — into the public operations for one content
//! type. Callers go through these services, never through the ledger or
//! propagation engine directly.

pub mod answer;
pub mod category;
pub mod definition;
pub mod question;
pub mod statement;
pub mod word;

pub use answer::{AnswerService, CreateAnswerRequest};
pub use category::{CategoryService, CreateCategoryRequest};
pub use definition::{CreateDefinitionRequest, DefinitionService};
pub use question::{CreateQuestionRequest, QuestionService};
pub use statement::{CreateStatementRequest, StatementService, UpdateStatementRequest};
pub use word::{CreateWordRequest, WordService};

use crate::collaborators::{DictionaryClient, KeywordExtractor};
use crate::error::{CoreError, Result};
use crate::neo4j::traits::GraphStore;
use std::sync::Arc;

/// All six content services over one store handle.
pub struct ContentServices {
    pub words: WordService,
    pub definitions: DefinitionService,
    pub statements: StatementService,
    pub questions: QuestionService,
    pub answers: AnswerService,
    pub categories: CategoryService,
}

impl ContentServices {
    pub fn new(
        store: Arc<dyn GraphStore>,
        extractor: Arc<dyn KeywordExtractor>,
        dictionary: Option<Arc<dyn DictionaryClient>>,
    ) -> Self {
        Self {
            words: WordService::new(store.clone(), dictionary),
            definitions: DefinitionService::new(store.clone()),
            statements: StatementService::new(store.clone(), extractor.clone()),
            questions: QuestionService::new(store.clone(), extractor.clone()),
            answers: AnswerService::new(store.clone(), extractor),
            categories: CategoryService::new(store),
        }
    }
}

/// Trimmed, non-empty required text. Rejected before any store access.
pub(crate) fn ensure_text(value: &str, what: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(CoreError::validation(format!("{what} must not be empty")))
    } else {
        Ok(trimmed.to_string())
    }
}
