//! Darwin Core extension definitions

use super::{coerce_flag, coerce_length, coerce_link, Vocabulary};
use crate::error::DataError;
use crate::names::normalize_extension_name;
use crate::terms::{Term, TermRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use url::Url;

/// A Darwin Core extension definition
///
/// Identity is the pair (row type, source URL): two extensions are equal iff
/// both match, and they order by row type qualified name, then URL.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Extension {
    /// Human readable title
    pub title: Option<String>,
    /// Table, file and XML tag name; never contains whitespace
    pub name: Option<String>,
    /// Namespace URI of the extension's terms
    pub namespace: Option<String>,
    /// Class of record this extension describes
    pub row_type: Option<Term>,
    /// Link to documentation
    pub link: Option<Url>,
    /// Description
    pub description: Option<String>,
    /// Subject keywords
    pub subject: Option<String>,
    /// Whether this is the dataset's core record type
    pub core: bool,
    /// Whether this definition is a development (unstable) version
    pub dev: bool,
    /// Last modification time, stamped by the caller
    pub modified: Option<DateTime<Utc>>,
    url: Url,
    properties: Vec<ExtensionProperty>,
}

impl Extension {
    /// Create an empty extension loaded from `url`
    pub fn new(url: Url, dev: bool) -> Self {
        Self {
            title: None,
            name: None,
            namespace: None,
            row_type: None,
            link: None,
            description: None,
            subject: None,
            core: false,
            dev,
            modified: None,
            url,
            properties: Vec::new(),
        }
    }

    /// Source URL of the definition document
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Properties in document order
    pub fn properties(&self) -> &[ExtensionProperty] {
        &self.properties
    }

    /// Append a property, pointing its back-reference at this extension
    pub fn add_property(&mut self, mut property: ExtensionProperty) {
        property.extension = Some(self.url.clone());
        self.properties.push(property);
    }

    /// True if `property`'s back-reference names this extension
    pub fn owns(&self, property: &ExtensionProperty) -> bool {
        property.extension.as_ref() == Some(&self.url)
    }

    /// Find a property by qualified name, ignoring case
    pub fn property(&self, qual_name: &str) -> Option<&ExtensionProperty> {
        self.properties.iter().find(|p| {
            p.qual_name
                .as_deref()
                .is_some_and(|q| q.eq_ignore_ascii_case(qual_name))
        })
    }

    /// Find the property describing `term`
    pub fn property_for_term(&self, term: &Term) -> Option<&ExtensionProperty> {
        self.property(&term.qualified_name())
    }

    /// True if a property with this qualified name exists
    pub fn has_property(&self, qual_name: &str) -> bool {
        self.property(qual_name).is_some()
    }

    /// Mark this extension as the dataset's core record type
    pub fn set_core(&mut self, core: bool) {
        self.core = core;
    }

    /// Stamp the modification time
    pub fn set_modified(&mut self, modified: DateTime<Utc>) {
        self.modified = Some(modified);
    }

    pub(crate) fn set_title(&mut self, value: &str) {
        self.title = Some(value.to_string());
    }

    pub(crate) fn set_name(&mut self, value: &str) {
        self.name = Some(normalize_extension_name(value));
    }

    pub(crate) fn set_namespace(&mut self, value: &str) {
        self.namespace = Some(value.to_string());
    }

    pub(crate) fn set_row_type(&mut self, value: &str, terms: &dyn TermRegistry) {
        self.row_type = terms.find_term(value);
        if self.row_type.is_none() {
            DataError::new("rowType", value, "unknown term").absorb();
        }
    }

    pub(crate) fn set_link(&mut self, value: &str) {
        self.link = coerce_link("link", value);
    }

    pub(crate) fn set_description(&mut self, value: &str) {
        self.description = Some(value.to_string());
    }

    pub(crate) fn set_subject(&mut self, value: &str) {
        self.subject = Some(value.to_string());
    }

    fn row_type_name(&self) -> Option<String> {
        self.row_type.as_ref().map(Term::qualified_name)
    }
}

impl PartialEq for Extension {
    fn eq(&self, other: &Self) -> bool {
        self.row_type == other.row_type && self.url == other.url
    }
}

impl Eq for Extension {}

impl Hash for Extension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.row_type.hash(state);
        self.url.hash(state);
    }
}

impl PartialOrd for Extension {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Extension {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row_type_name()
            .cmp(&other.row_type_name())
            .then_with(|| self.url.as_str().cmp(other.url.as_str()))
    }
}

impl fmt::Display for Extension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Extension[name={}, rowType={}]",
            self.name.as_deref().unwrap_or("-"),
            self.row_type_name().as_deref().unwrap_or("-")
        )
    }
}

/// One term (column) of an extension
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtensionProperty {
    /// Qualified term name (full URI)
    pub qual_name: Option<String>,
    /// Simple term name
    pub name: Option<String>,
    /// Namespace URI of the term
    pub namespace: Option<String>,
    /// Display group
    pub group: Option<String>,
    /// Declared data type
    #[serde(rename = "type")]
    pub data_type: Option<String>,
    /// Whether every record must populate this term
    pub required: bool,
    /// Link to documentation
    pub link: Option<Url>,
    /// Description
    pub description: Option<String>,
    /// Example values
    pub examples: Option<String>,
    /// Maximum column length
    pub column_length: Option<u32>,
    /// Controlled vocabulary for the term's values
    pub vocabulary: Option<Arc<Vocabulary>>,
    #[serde(skip)]
    extension: Option<Url>,
}

impl ExtensionProperty {
    /// Create an empty property
    pub fn new() -> Self {
        Self::default()
    }

    /// Source URL of the owning extension, set when the property is added to it
    pub fn extension(&self) -> Option<&Url> {
        self.extension.as_ref()
    }

    /// True if a vocabulary constrains this property
    pub fn has_vocabulary(&self) -> bool {
        self.vocabulary.is_some()
    }

    /// Attach the resolved vocabulary
    pub fn set_vocabulary(&mut self, vocabulary: Arc<Vocabulary>) {
        self.vocabulary = Some(vocabulary);
    }

    pub(crate) fn set_qual_name(&mut self, value: &str) {
        self.qual_name = Some(value.to_string());
    }

    pub(crate) fn set_name(&mut self, value: &str) {
        self.name = Some(value.to_string());
    }

    pub(crate) fn set_namespace(&mut self, value: &str) {
        self.namespace = Some(value.to_string());
    }

    pub(crate) fn set_group(&mut self, value: &str) {
        self.group = Some(value.to_string());
    }

    pub(crate) fn set_data_type(&mut self, value: &str) {
        self.data_type = Some(value.to_string());
    }

    pub(crate) fn set_required(&mut self, value: &str) {
        self.required = coerce_flag(value);
    }

    pub(crate) fn set_link(&mut self, value: &str) {
        self.link = coerce_link("link", value);
    }

    pub(crate) fn set_description(&mut self, value: &str) {
        self.description = Some(value.to_string());
    }

    pub(crate) fn set_examples(&mut self, value: &str) {
        self.examples = Some(value.to_string());
    }

    pub(crate) fn set_column_length(&mut self, value: &str) {
        self.column_length = coerce_length("columnLength", value);
    }
}
