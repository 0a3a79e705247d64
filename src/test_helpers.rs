//! Test factories and stub collaborators.
#![allow(dead_code)]

use crate::collaborators::{
    DictionaryClient, KeywordExtractor, KeywordSource, KeywordWithFrequency,
};
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;

/// Shorthand for an AI-sourced keyword.
pub fn kw(word: &str, frequency: f64) -> KeywordWithFrequency {
    KeywordWithFrequency {
        word: word.to_string(),
        frequency,
        source: KeywordSource::Ai,
    }
}

/// Extractor returning a fixed keyword list regardless of input.
pub struct StubExtractor {
    keywords: Vec<KeywordWithFrequency>,
}

impl StubExtractor {
    pub fn new(keywords: Vec<KeywordWithFrequency>) -> Self {
        Self { keywords }
    }

    pub fn empty() -> Self {
        Self { keywords: vec![] }
    }
}

#[async_trait]
impl KeywordExtractor for StubExtractor {
    async fn extract(
        &self,
        _text: &str,
        _user_hints: Option<&[String]>,
    ) -> Result<Vec<KeywordWithFrequency>> {
        Ok(self.keywords.clone())
    }
}

/// Extractor that always fails, for degraded-path tests.
pub struct FailingExtractor;

#[async_trait]
impl KeywordExtractor for FailingExtractor {
    async fn extract(
        &self,
        _text: &str,
        _user_hints: Option<&[String]>,
    ) -> Result<Vec<KeywordWithFrequency>> {
        anyhow::bail!("extraction service unavailable")
    }
}

/// Dictionary with a fixed entry table.
#[derive(Default)]
pub struct StubDictionary {
    entries: HashMap<String, String>,
}

impl StubDictionary {
    pub fn with(word: &str, definition: &str) -> Self {
        let mut entries = HashMap::new();
        entries.insert(word.to_string(), definition.to_string());
        Self { entries }
    }
}

#[async_trait]
impl DictionaryClient for StubDictionary {
    async fn lookup(&self, word: &str) -> Result<Option<String>> {
        Ok(self.entries.get(word).cloned())
    }
}
