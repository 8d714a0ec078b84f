//! Extension document parser
//!
//! Extensions can reference thesauri, so a parse may recurse once: every
//! `thesaurus` attribute on a property is resolved through a
//! [`ResolutionScope`], which fetches and fully parses the referenced
//! vocabulary the first time its URL is seen and reuses it afterwards. A
//! reference that cannot be resolved fails the whole extension parse.

use super::{read_document, Digester};
use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::loaders::{Fetch, Loader};
use crate::locations::Location;
use crate::model::Extension;
use crate::namespaces::EXTENSION_NAMESPACE;
use crate::rules::{Field, Link, Node, NodeKind, ResolutionScope, Rule, RuleEngine};
use crate::terms::{DefaultTermRegistry, TermRegistry};
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use url::Url;

const EXTENSION: &str = "*/extension";
const PROPERTY: &str = "*/property";

/// Builds an [`Extension`] from an extension definition document
#[derive(Clone)]
pub struct ExtensionParser {
    engine: RuleEngine,
    limits: Limits,
    terms: Arc<dyn TermRegistry + Send + Sync>,
    fetcher: Arc<dyn Fetch + Send + Sync>,
}

impl ExtensionParser {
    /// Create a parser that fetches thesauri with a default [`Loader`]
    pub fn new() -> Self {
        let mut engine = RuleEngine::new(EXTENSION_NAMESPACE);

        engine
            .call_setter(EXTENSION, "title", Field::Title)
            .call_setter(EXTENSION, "name", Field::Name)
            .call_setter(EXTENSION, "namespace", Field::Namespace)
            .call_setter(EXTENSION, "rowType", Field::RowType)
            .call_setter(EXTENSION, "relation", Field::Link)
            .call_setter(EXTENSION, "description", Field::Description)
            .call_setter(EXTENSION, "subject", Field::Subject);

        engine
            .register(PROPERTY, Rule::Create(NodeKind::Property))
            .call_setter(PROPERTY, "qualName", Field::QualName)
            .call_setter(PROPERTY, "name", Field::Name)
            .call_setter(PROPERTY, "namespace", Field::Namespace)
            .call_setter(PROPERTY, "group", Field::Group)
            .call_setter(PROPERTY, "type", Field::DataType)
            .call_setter(PROPERTY, "required", Field::Required)
            .call_setter(PROPERTY, "relation", Field::Link)
            .call_setter(PROPERTY, "description", Field::Description)
            .call_setter(PROPERTY, "examples", Field::Examples)
            .call_setter(PROPERTY, "columnLength", Field::ColumnLength)
            .register(PROPERTY, Rule::ResolveThesaurus)
            .register(PROPERTY, Rule::AttachChild(Link::AddProperty));

        Self {
            engine,
            limits: Limits::default(),
            terms: Arc::new(DefaultTermRegistry),
            fetcher: Arc::new(Loader::new()),
        }
    }

    /// Set the limits, for both the extension and its thesauri
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the registry resolving `rowType` values
    pub fn with_terms(mut self, terms: impl TermRegistry + Send + Sync + 'static) -> Self {
        self.terms = Arc::new(terms);
        self
    }

    /// Set the source of referenced thesaurus documents
    pub fn with_fetcher(mut self, fetcher: impl Fetch + Send + Sync + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    /// The rule wiring
    pub fn engine(&self) -> &RuleEngine {
        &self.engine
    }

    /// Parse an extension document loaded from `url`
    ///
    /// `dev` tags the result as a development (unstable) definition. Each call
    /// resolves thesauri in a fresh scope.
    pub fn parse<R: Read>(&self, reader: R, url: Url, dev: bool) -> Result<Extension> {
        let mut scope = ResolutionScope::new(self.fetcher.as_ref()).with_limits(self.limits.clone());
        self.parse_in_scope(reader, url, dev, &mut scope)
    }

    /// Parse an extension document, resolving thesauri through `scope`
    ///
    /// Sharing a scope across several extensions of one batch fetches each
    /// thesaurus once for the whole batch.
    pub fn parse_in_scope<R: Read>(
        &self,
        reader: R,
        url: Url,
        dev: bool,
        scope: &mut ResolutionScope<'_>,
    ) -> Result<Extension> {
        let bytes = read_document(reader, &self.limits)?;

        let mut digester = Digester::new(&self.engine, self.terms.as_ref(), &self.limits)
            .with_resolver(scope);
        digester.push(Node::Extension(Extension::new(url.clone(), dev)));
        digester.digest(&bytes)?;

        let extension = digester
            .finish()?
            .into_extension()
            .ok_or_else(|| Error::Rule("extension parse did not yield an extension".to_string()))?;

        tracing::debug!(
            url = %url,
            name = extension.name.as_deref().unwrap_or("-"),
            properties = extension.properties().len(),
            "Parsed extension"
        );
        Ok(extension)
    }

    /// Load and parse an extension document
    ///
    /// The location must be a URL or a file path, which becomes the source URL.
    pub fn parse_location(&self, location: &Location, dev: bool) -> Result<Extension> {
        let url = location.to_url().ok_or_else(|| {
            Error::Resource(format!("'{}' does not identify an extension source", location))
        })?;
        let bytes = Loader::new()
            .with_limits(self.limits.clone())
            .load_bytes(location)?;
        self.parse(bytes.as_slice(), url, dev)
    }
}

impl Default for ExtensionParser {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ExtensionParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionParser")
            .field("engine", &self.engine)
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}
