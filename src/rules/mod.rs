//! Declarative construction rules
//!
//! Parsers describe a document type as a set of path patterns, each bound to
//! an ordered list of rules. While the XML is read, matching rules create
//! objects on the [`ConstructionStack`], stage attribute values and feed them
//! to setters, link children to parents, and attach referenced thesauri.

pub mod engine;
pub mod pattern;
pub mod stack;
pub mod thesaurus;

pub use engine::{Phase, Rule, RuleEngine};
pub use pattern::{ElementPath, PathPattern};
pub use stack::{ConstructionStack, Field, Link, Node, NodeKind};
pub use thesaurus::{ResolutionScope, ThesaurusResolver};
