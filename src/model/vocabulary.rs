//! Thesauri: controlled vocabularies referenced by extension properties

use super::coerce_link;
use serde::Serialize;
use url::Url;

/// A controlled vocabulary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Vocabulary {
    /// Human readable title
    pub title: Option<String>,
    /// Description
    pub description: Option<String>,
    /// Link to documentation
    pub link: Option<Url>,
    /// Canonical URI
    pub uri: Option<String>,
    /// Concepts in document order
    pub concepts: Vec<VocabularyConcept>,
}

impl Vocabulary {
    /// Create an empty vocabulary
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a concept
    pub fn add_concept(&mut self, concept: VocabularyConcept) {
        self.concepts.push(concept);
    }

    /// Find a concept by identifier, URI, or any of its term titles, ignoring case
    pub fn find_concept(&self, name: &str) -> Option<&VocabularyConcept> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        self.concepts.iter().find(|c| c.is_named(name))
    }

    pub(crate) fn set_title(&mut self, value: &str) {
        self.title = Some(value.to_string());
    }

    pub(crate) fn set_description(&mut self, value: &str) {
        self.description = Some(value.to_string());
    }

    pub(crate) fn set_link(&mut self, value: &str) {
        self.link = coerce_link("link", value);
    }

    pub(crate) fn set_uri(&mut self, value: &str) {
        self.uri = Some(value.to_string());
    }
}

/// One concept of a vocabulary
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyConcept {
    /// Link to documentation
    pub link: Option<Url>,
    /// Description
    pub description: Option<String>,
    /// Canonical URI
    pub uri: Option<String>,
    /// Identifier, usually the value written in data
    pub identifier: Option<String>,
    /// Preferred labels, usually one per language
    pub preferred_terms: Vec<VocabularyTerm>,
    /// Alternative labels and synonyms
    pub alternative_terms: Vec<VocabularyTerm>,
}

impl VocabularyConcept {
    /// Create an empty concept
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a preferred term
    pub fn add_preferred_term(&mut self, term: VocabularyTerm) {
        self.preferred_terms.push(term);
    }

    /// Append an alternative term
    pub fn add_alternative_term(&mut self, term: VocabularyTerm) {
        self.alternative_terms.push(term);
    }

    /// Preferred term in `lang`, falling back to English, then to the first one
    pub fn preferred_term(&self, lang: &str) -> Option<&VocabularyTerm> {
        self.preferred_terms
            .iter()
            .find(|t| t.has_lang(lang))
            .or_else(|| self.preferred_terms.iter().find(|t| t.has_lang("en")))
            .or_else(|| self.preferred_terms.first())
    }

    fn is_named(&self, name: &str) -> bool {
        let matches = |v: &Option<String>| {
            v.as_deref()
                .is_some_and(|v| v.trim().eq_ignore_ascii_case(name))
        };
        matches(&self.identifier)
            || matches(&self.uri)
            || self
                .preferred_terms
                .iter()
                .chain(&self.alternative_terms)
                .any(|t| matches(&t.title))
    }

    pub(crate) fn set_link(&mut self, value: &str) {
        self.link = coerce_link("link", value);
    }

    pub(crate) fn set_description(&mut self, value: &str) {
        self.description = Some(value.to_string());
    }

    pub(crate) fn set_uri(&mut self, value: &str) {
        self.uri = Some(value.to_string());
    }

    pub(crate) fn set_identifier(&mut self, value: &str) {
        self.identifier = Some(value.to_string());
    }
}

/// A label of a concept in one language
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VocabularyTerm {
    /// Language tag
    pub lang: Option<String>,
    /// Display title
    pub title: Option<String>,
}

impl VocabularyTerm {
    /// Create an empty term
    pub fn new() -> Self {
        Self::default()
    }

    fn has_lang(&self, lang: &str) -> bool {
        self.lang
            .as_deref()
            .is_some_and(|l| l.eq_ignore_ascii_case(lang))
    }

    pub(crate) fn set_lang(&mut self, value: &str) {
        self.lang = Some(value.to_string());
    }

    pub(crate) fn set_title(&mut self, value: &str) {
        self.title = Some(value.to_string());
    }
}
