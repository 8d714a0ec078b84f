//! Thesaurus resolution scope
//!
//! Extension properties reference controlled vocabularies by URL. Within one
//! resolution scope (normally one extension document parse) each URL is
//! fetched and parsed at most once; later references reuse the same
//! [`Arc<Vocabulary>`]. The scope is plain per-parse state: concurrent parses
//! each own theirs.

use crate::error::{Error, ResolutionError, Result};
use crate::limits::Limits;
use crate::loaders::Fetch;
use crate::model::Vocabulary;
use crate::parsers::VocabularyParser;
use indexmap::IndexMap;
use std::sync::Arc;
use url::Url;

/// Turns a thesaurus reference into a parsed vocabulary
pub trait ThesaurusResolver {
    /// Resolve the thesaurus at `url` as written in the referencing document
    fn resolve(&mut self, url: &str) -> Result<Arc<Vocabulary>>;
}

/// Per-parse cache of thesaurus URL to vocabulary, backed by a fetcher
pub struct ResolutionScope<'f> {
    fetcher: &'f dyn Fetch,
    limits: Limits,
    vocabularies: IndexMap<String, Arc<Vocabulary>>,
    fetches: usize,
}

impl<'f> ResolutionScope<'f> {
    /// Create an empty scope fetching through `fetcher`
    pub fn new(fetcher: &'f dyn Fetch) -> Self {
        Self {
            fetcher,
            limits: Limits::default(),
            vocabularies: IndexMap::new(),
            fetches: 0,
        }
    }

    /// Set the limits applied to fetched thesauri
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Seed the scope with an already parsed vocabulary
    pub fn preload(&mut self, url: &Url, vocabulary: Vocabulary) -> Arc<Vocabulary> {
        let vocabulary = Arc::new(vocabulary);
        self.vocabularies
            .insert(url.to_string(), Arc::clone(&vocabulary));
        vocabulary
    }

    /// The cached vocabulary for `url`, if resolved already
    pub fn get(&self, url: &Url) -> Option<Arc<Vocabulary>> {
        self.vocabularies.get(url.as_str()).cloned()
    }

    /// Resolved thesaurus URLs, in resolution order
    pub fn urls(&self) -> impl Iterator<Item = &str> {
        self.vocabularies.keys().map(String::as_str)
    }

    /// Number of cached vocabularies
    pub fn len(&self) -> usize {
        self.vocabularies.len()
    }

    /// True if nothing has been resolved or preloaded
    pub fn is_empty(&self) -> bool {
        self.vocabularies.is_empty()
    }

    /// Number of documents fetched through this scope
    pub fn fetch_count(&self) -> usize {
        self.fetches
    }

    fn fetch_and_parse(&mut self, raw: &str, url: &Url) -> Result<Arc<Vocabulary>> {
        self.limits.check_thesauri(self.fetches + 1)?;
        self.fetches += 1;

        tracing::debug!(url = %url, "Fetching thesaurus");
        let bytes = self
            .fetcher
            .fetch(url)
            .map_err(|e| ResolutionError::new(raw, e.to_string()))?;

        let vocabulary = VocabularyParser::new()
            .with_limits(self.limits.clone())
            .parse(bytes.as_slice())
            .map_err(|e| ResolutionError::new(raw, format!("invalid thesaurus document: {}", e)))?;

        tracing::debug!(
            url = %url,
            concepts = vocabulary.concepts.len(),
            "Parsed thesaurus"
        );
        Ok(Arc::new(vocabulary))
    }
}

impl ThesaurusResolver for ResolutionScope<'_> {
    fn resolve(&mut self, raw: &str) -> Result<Arc<Vocabulary>> {
        let url = Url::parse(raw.trim())
            .map_err(|e| Error::from(ResolutionError::new(raw, format!("invalid URL: {}", e))))?;

        if let Some(vocabulary) = self.get(&url) {
            tracing::debug!(url = %url, "Thesaurus cache hit");
            return Ok(vocabulary);
        }

        let vocabulary = self.fetch_and_parse(raw, &url)?;
        self.vocabularies
            .insert(url.to_string(), Arc::clone(&vocabulary));
        Ok(vocabulary)
    }
}

impl std::fmt::Debug for ResolutionScope<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionScope")
            .field("vocabularies", &self.vocabularies.keys().collect::<Vec<_>>())
            .field("fetches", &self.fetches)
            .finish()
    }
}
