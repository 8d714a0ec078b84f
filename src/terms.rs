//! Term identifiers
//!
//! An extension's `rowType` names the class of record it describes, written
//! either as a full URI (`http://rs.tdwg.org/dwc/terms/Occurrence`) or with a
//! customary prefix (`dwc:Occurrence`). A [`TermRegistry`] turns that string
//! into a canonical [`Term`].

use crate::namespaces::DUBLIN_CORE_NAMESPACE;
use serde::Serialize;
use std::fmt;
use url::Url;

/// Well-known term namespaces and their customary prefixes
const KNOWN_NAMESPACES: &[(&str, &str)] = &[
    ("dwc", "http://rs.tdwg.org/dwc/terms/"),
    ("dc", DUBLIN_CORE_NAMESPACE),
    ("gbif", "http://rs.gbif.org/terms/1.0/"),
    ("abcd", "http://rs.tdwg.org/abcd/terms/"),
    ("iucn", "http://iucn.org/terms/"),
    ("eol", "http://eol.org/schema/"),
    ("ac", "http://rs.tdwg.org/ac/terms/"),
];

/// A canonical term identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Term {
    /// Namespace URI, ending in `/` or `#`
    pub namespace: String,
    /// Customary prefix of the namespace, if known
    pub prefix: Option<String>,
    /// Name within the namespace
    pub simple_name: String,
}

impl Term {
    /// Create a new term
    pub fn new(namespace: impl Into<String>, simple_name: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let prefix = KNOWN_NAMESPACES
            .iter()
            .find(|(_, ns)| *ns == namespace)
            .map(|(p, _)| p.to_string());
        Self {
            namespace,
            prefix,
            simple_name: simple_name.into(),
        }
    }

    /// Full URI of the term
    pub fn qualified_name(&self) -> String {
        format!("{}{}", self.namespace, self.simple_name)
    }

    /// `prefix:name` when the namespace has a known prefix
    pub fn prefixed_name(&self) -> Option<String> {
        self.prefix
            .as_ref()
            .map(|p| format!("{}:{}", p, self.simple_name))
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.namespace, self.simple_name)
    }
}

/// Resolves qualified-name strings to canonical terms
pub trait TermRegistry {
    /// Find the term for `name`, or `None` if it cannot be resolved
    fn find_term(&self, name: &str) -> Option<Term>;
}

/// Registry that knows the customary Darwin Core prefixes and accepts any
/// absolute http(s) URI as a term
#[derive(Debug, Clone, Default)]
pub struct DefaultTermRegistry;

impl DefaultTermRegistry {
    /// Create the registry
    pub fn new() -> Self {
        Self
    }
}

impl TermRegistry for DefaultTermRegistry {
    fn find_term(&self, name: &str) -> Option<Term> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }

        if let Some((prefix, simple)) = name.split_once(':') {
            if let Some((_, ns)) = KNOWN_NAMESPACES.iter().find(|(p, _)| *p == prefix) {
                if simple.is_empty() || simple.contains('/') {
                    return None;
                }
                return Some(Term::new(*ns, simple));
            }
        }

        let url = Url::parse(name).ok()?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return None;
        }

        let split = name.rfind(['/', '#'])?;
        let (namespace, simple) = name.split_at(split + 1);
        if simple.is_empty() {
            return None;
        }
        Some(Term::new(namespace, simple))
    }
}
