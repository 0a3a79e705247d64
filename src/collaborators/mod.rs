//! Interfaces to external collaborator services.
//!
//! Keyword extraction and dictionary lookup live outside this core; only
//! the contracts they expose are defined here. Implementations are injected
//! as trait objects at construction time.

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Where a keyword attached to a node came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeywordSource {
    /// Explicitly supplied by the author.
    User,
    /// Produced by the extraction service.
    Ai,
}

impl KeywordSource {
    pub fn as_str(self) -> &'static str {
        match self {
            KeywordSource::User => "user",
            KeywordSource::Ai => "ai",
        }
    }
}

/// One ranked keyword produced by the extraction service. Not owned by the
/// core; it arrives fully formed from the collaborator or the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordWithFrequency {
    pub word: String,
    pub frequency: f64,
    pub source: KeywordSource,
}

/// Keyword-extraction (NLP) service: free text in, ranked keyword list out.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    /// `user_hints` are words the author explicitly attached; implementations
    /// may merge or boost them.
    async fn extract(
        &self,
        text: &str,
        user_hints: Option<&[String]>,
    ) -> Result<Vec<KeywordWithFrequency>>;
}

/// Dictionary lookup client, used to backfill an initial definition when a
/// word is created. `None` means the dictionary has no entry.
#[async_trait]
pub trait DictionaryClient: Send + Sync {
    async fn lookup(&self, word: &str) -> Result<Option<String>>;
}
