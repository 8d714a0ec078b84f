//! XML namespace handling
//!
//! Rule namespaces of the two definition document types, and the expanded
//! element names the event driver hands to the rule engine.

use std::fmt;

/// Namespace of extension definition documents
pub const EXTENSION_NAMESPACE: &str = "http://rs.gbif.org/extension/";

/// Namespace of thesaurus (vocabulary) definition documents
pub const VOCABULARY_NAMESPACE: &str = "http://rs.gbif.org/thesaurus/";

/// Dublin Core terms, used for `title`, `description`, `relation` and `subject` attributes
pub const DUBLIN_CORE_NAMESPACE: &str = "http://purl.org/dc/terms/";

/// Expanded element name - namespace URI plus local name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<String>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// True if the name lives in the given namespace
    pub fn in_namespace(&self, namespace: &str) -> bool {
        self.namespace.as_deref() == Some(namespace)
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}
