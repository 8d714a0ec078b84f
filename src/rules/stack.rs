//! Construction stack
//!
//! Objects under construction live on an explicit stack. `Create` rules push,
//! setters populate the top, and `AttachChild` pops the top object and adds it
//! to the one beneath. After a successful parse exactly the root remains.

use crate::error::{Error, Result};
use crate::model::{Extension, ExtensionProperty, Vocabulary, VocabularyConcept, VocabularyTerm};
use crate::terms::TermRegistry;
use std::fmt;

/// Kinds of object a `Create` rule can allocate
///
/// Roots (extensions and vocabularies) are pushed by the parser before the
/// first event, since they carry parse arguments such as the source URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    /// [`ExtensionProperty`]
    Property,
    /// [`VocabularyConcept`]
    Concept,
    /// [`VocabularyTerm`]
    Term,
}

/// Attribute-backed fields a setter can populate
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Title,
    Name,
    Namespace,
    RowType,
    Link,
    Description,
    Subject,
    QualName,
    Group,
    DataType,
    Required,
    Examples,
    ColumnLength,
    Uri,
    Identifier,
    Lang,
}

impl Field {
    /// Field name as used in diagnostics
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Title => "title",
            Field::Name => "name",
            Field::Namespace => "namespace",
            Field::RowType => "rowType",
            Field::Link => "link",
            Field::Description => "description",
            Field::Subject => "subject",
            Field::QualName => "qualName",
            Field::Group => "group",
            Field::DataType => "type",
            Field::Required => "required",
            Field::Examples => "examples",
            Field::ColumnLength => "columnLength",
            Field::Uri => "uri",
            Field::Identifier => "identifier",
            Field::Lang => "lang",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parent-child relations an `AttachChild` rule can establish
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Link {
    /// Property into extension
    AddProperty,
    /// Concept into vocabulary
    AddConcept,
    /// Term into concept, as a preferred label
    AddPreferredTerm,
    /// Term into concept, as an alternative label
    AddAlternativeTerm,
}

/// An object under construction
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Extension(Extension),
    Property(ExtensionProperty),
    Vocabulary(Vocabulary),
    Concept(VocabularyConcept),
    Term(VocabularyTerm),
}

impl Node {
    /// Allocate an empty object of the given kind
    pub fn create(kind: NodeKind) -> Self {
        match kind {
            NodeKind::Property => Node::Property(ExtensionProperty::new()),
            NodeKind::Concept => Node::Concept(VocabularyConcept::new()),
            NodeKind::Term => Node::Term(VocabularyTerm::new()),
        }
    }

    /// Type name for diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Extension(_) => "extension",
            Node::Property(_) => "property",
            Node::Vocabulary(_) => "vocabulary",
            Node::Concept(_) => "concept",
            Node::Term(_) => "term",
        }
    }

    /// Invoke the setter for `field` with a raw attribute value
    pub fn apply(&mut self, field: Field, value: &str, terms: &dyn TermRegistry) -> Result<()> {
        match (self, field) {
            (Node::Extension(e), Field::Title) => e.set_title(value),
            (Node::Extension(e), Field::Name) => e.set_name(value),
            (Node::Extension(e), Field::Namespace) => e.set_namespace(value),
            (Node::Extension(e), Field::RowType) => e.set_row_type(value, terms),
            (Node::Extension(e), Field::Link) => e.set_link(value),
            (Node::Extension(e), Field::Description) => e.set_description(value),
            (Node::Extension(e), Field::Subject) => e.set_subject(value),

            (Node::Property(p), Field::QualName) => p.set_qual_name(value),
            (Node::Property(p), Field::Name) => p.set_name(value),
            (Node::Property(p), Field::Namespace) => p.set_namespace(value),
            (Node::Property(p), Field::Group) => p.set_group(value),
            (Node::Property(p), Field::DataType) => p.set_data_type(value),
            (Node::Property(p), Field::Required) => p.set_required(value),
            (Node::Property(p), Field::Link) => p.set_link(value),
            (Node::Property(p), Field::Description) => p.set_description(value),
            (Node::Property(p), Field::Examples) => p.set_examples(value),
            (Node::Property(p), Field::ColumnLength) => p.set_column_length(value),

            (Node::Vocabulary(v), Field::Title) => v.set_title(value),
            (Node::Vocabulary(v), Field::Description) => v.set_description(value),
            (Node::Vocabulary(v), Field::Link) => v.set_link(value),
            (Node::Vocabulary(v), Field::Uri) => v.set_uri(value),

            (Node::Concept(c), Field::Link) => c.set_link(value),
            (Node::Concept(c), Field::Description) => c.set_description(value),
            (Node::Concept(c), Field::Uri) => c.set_uri(value),
            (Node::Concept(c), Field::Identifier) => c.set_identifier(value),

            (Node::Term(t), Field::Lang) => t.set_lang(value),
            (Node::Term(t), Field::Title) => t.set_title(value),

            (node, field) => {
                return Err(Error::Rule(format!(
                    "{} has no {} field",
                    node.kind_name(),
                    field
                )))
            }
        }
        Ok(())
    }

    /// The property, if this node is one
    pub fn as_property_mut(&mut self) -> Option<&mut ExtensionProperty> {
        match self {
            Node::Property(p) => Some(p),
            _ => None,
        }
    }

    /// Unwrap a finished extension
    pub fn into_extension(self) -> Option<Extension> {
        match self {
            Node::Extension(e) => Some(e),
            _ => None,
        }
    }

    /// Unwrap a finished vocabulary
    pub fn into_vocabulary(self) -> Option<Vocabulary> {
        match self {
            Node::Vocabulary(v) => Some(v),
            _ => None,
        }
    }
}

/// Last-in-first-out sequence of objects under construction
#[derive(Debug, Default)]
pub struct ConstructionStack {
    nodes: Vec<Node>,
}

impl ConstructionStack {
    /// Create an empty stack
    pub fn new() -> Self {
        Self::default()
    }

    /// Push an object
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Pop the top object
    pub fn pop(&mut self) -> Option<Node> {
        self.nodes.pop()
    }

    /// The top object
    pub fn peek(&self) -> Option<&Node> {
        self.nodes.last()
    }

    /// The top object, mutably
    pub fn peek_mut(&mut self) -> Option<&mut Node> {
        self.nodes.last_mut()
    }

    /// Number of objects on the stack
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if nothing is under construction
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pop the top object and add it to the one now exposed
    pub fn attach(&mut self, link: Link) -> Result<()> {
        let child = self
            .nodes
            .pop()
            .ok_or_else(|| Error::Rule(format!("{:?} on an empty stack", link)))?;
        let parent = self
            .nodes
            .last_mut()
            .ok_or_else(|| Error::Rule(format!("{:?} without a parent object", link)))?;

        match (link, parent, child) {
            (Link::AddProperty, Node::Extension(e), Node::Property(p)) => e.add_property(p),
            (Link::AddConcept, Node::Vocabulary(v), Node::Concept(c)) => v.add_concept(c),
            (Link::AddPreferredTerm, Node::Concept(c), Node::Term(t)) => c.add_preferred_term(t),
            (Link::AddAlternativeTerm, Node::Concept(c), Node::Term(t)) => {
                c.add_alternative_term(t)
            }
            (link, parent, child) => {
                return Err(Error::Rule(format!(
                    "{:?} cannot add a {} to a {}",
                    link,
                    child.kind_name(),
                    parent.kind_name()
                )))
            }
        }
        Ok(())
    }

    /// Take the finished root; fails unless exactly one object remains
    pub fn into_root(mut self) -> Result<Node> {
        match self.nodes.len() {
            1 => self
                .nodes
                .pop()
                .ok_or_else(|| Error::Rule("construction stack is empty".to_string())),
            0 => Err(Error::Rule("construction stack is empty".to_string())),
            n => Err(Error::Rule(format!(
                "{} objects left unattached on the construction stack",
                n - 1
            ))),
        }
    }
}
