//! # dwca-model
//!
//! Object model and parsers for Darwin Core Archive extension and thesaurus
//! definitions, as published by the GBIF registry.
//!
//! An extension document describes one row type of an archive: its title,
//! name, namespace, row type term and an ordered list of properties. A
//! property may reference a thesaurus (controlled vocabulary) by URL; the
//! parser fetches and parses each referenced thesaurus once per parse and
//! shares it between the properties that use it.
//!
//! ## Features
//!
//! - Rule-driven construction from XML, independent of namespace prefixes
//! - Thesaurus resolution with per-scope caching
//! - Lenient field coercion: bad links or lengths are logged and left empty
//! - Protection against oversized or deeply nested documents
//! - JSON output through serde
//!
//! ## Example
//!
//! ```rust,ignore
//! use dwca_model::{ExtensionParser, Location};
//!
//! let parser = ExtensionParser::new();
//! let location = Location::parse("http://rs.gbif.org/extension/gbif/1.0/vernacularname.xml");
//! let extension = parser.parse_location(&location, false)?;
//!
//! for property in extension.properties() {
//!     println!("{}", property.qual_name.as_deref().unwrap_or("-"));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Foundation
pub mod error;
pub mod limits;

// Utilities
pub mod names;
pub mod namespaces;
pub mod locations;
pub mod terms;

// Resource loading
pub mod loaders;

// Object model and construction
pub mod model;
pub mod rules;
pub mod parsers;

// Re-exports for convenience
pub use error::{DataError, Error, ParseError, ResolutionError, Result};
pub use limits::Limits;
pub use loaders::{Fetch, Loader};
pub use locations::Location;
pub use model::{Extension, ExtensionProperty, Vocabulary, VocabularyConcept, VocabularyTerm};
pub use parsers::{ExtensionParser, VocabularyParser};
pub use rules::{ResolutionScope, ThesaurusResolver};
pub use terms::{DefaultTermRegistry, Term, TermRegistry};

/// Version of the dwca-model library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
