//! Thesaurus document parser

use super::{read_document, Digester};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::locations::Location;
use crate::model::Vocabulary;
use crate::namespaces::VOCABULARY_NAMESPACE;
use crate::rules::{Field, Link, Node, NodeKind, Rule, RuleEngine};
use crate::terms::DefaultTermRegistry;
use std::io::Read;

const THESAURUS: &str = "*/thesaurus";
const CONCEPT: &str = "*/concept";
const PREFERRED_TERM: &str = "*/preferred/term";
const ALTERNATIVE_TERM: &str = "*/alternative/term";

/// Builds a [`Vocabulary`] from a thesaurus definition document
#[derive(Debug, Clone)]
pub struct VocabularyParser {
    engine: RuleEngine,
    limits: Limits,
}

impl VocabularyParser {
    /// Create a parser with default limits
    pub fn new() -> Self {
        let mut engine = RuleEngine::new(VOCABULARY_NAMESPACE);

        engine
            .call_setter(THESAURUS, "title", Field::Title)
            .call_setter(THESAURUS, "description", Field::Description)
            .call_setter(THESAURUS, "relation", Field::Link)
            .call_setter(THESAURUS, "URI", Field::Uri);

        engine
            .register(CONCEPT, Rule::Create(NodeKind::Concept))
            .call_setter(CONCEPT, "relation", Field::Link)
            .call_setter(CONCEPT, "description", Field::Description)
            .call_setter(CONCEPT, "URI", Field::Uri)
            .call_setter(CONCEPT, "identifier", Field::Identifier);

        for (pattern, link) in [
            (PREFERRED_TERM, Link::AddPreferredTerm),
            (ALTERNATIVE_TERM, Link::AddAlternativeTerm),
        ] {
            engine
                .register(pattern, Rule::Create(NodeKind::Term))
                .call_setter(pattern, "lang", Field::Lang)
                .call_setter(pattern, "title", Field::Title)
                .register(pattern, Rule::AttachChild(link));
        }

        // concepts attach after their terms
        engine.register(CONCEPT, Rule::AttachChild(Link::AddConcept));

        Self {
            engine,
            limits: Limits::default(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The rule wiring
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Parse a thesaurus document
    pub fn parse<R: Read>(&self, reader: R) -> Result<Vocabulary> {
        let bytes = read_document(reader, &self.limits)?;

        let terms = DefaultTermRegistry;
        let mut digester = Digester::new(&self.engine, &terms, &self.limits);
        digester.push(Node::Vocabulary(Vocabulary::new()));
        digester.digest(&bytes)?;

        digester
            .finish()?
            .into_vocabulary()
            .ok_or_else(|| Error::Rule("thesaurus parse did not yield a vocabulary".to_string()))
    }

    /// Load and parse a thesaurus document
    pub fn parse_location(&self, location: &Location) -> Result<Vocabulary> {
        let bytes = Loader::new()
            .with_limits(self.limits.clone())
            .load_bytes(location)?;
        self.parse(bytes.as_slice())
    }
}

impl Default for VocabularyParser {
    fn default() -> Self {
        Self::new()
    }
}
