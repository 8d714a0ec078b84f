//! Object model built by the definition document parsers
//!
//! Setters take raw attribute strings and coerce them to their semantic
//! type. A value that does not coerce leaves the field empty (see
//! [`DataError`](crate::error::DataError)); no setter can fail a parse.

pub mod extension;
pub mod vocabulary;

pub use extension::{Extension, ExtensionProperty};
pub use vocabulary::{Vocabulary, VocabularyConcept, VocabularyTerm};

use crate::error::DataError;
use url::Url;

/// Parse an absolute URL, dropping malformed values
pub(crate) fn coerce_link(field: &'static str, value: &str) -> Option<Url> {
    match Url::parse(value.trim()) {
        Ok(url) => Some(url),
        Err(e) => {
            DataError::new(field, value, e.to_string()).absorb();
            None
        }
    }
}

/// Case-insensitive `true`; anything else is `false`
pub(crate) fn coerce_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Parse a non-negative integer, dropping malformed values
pub(crate) fn coerce_length(field: &'static str, value: &str) -> Option<u32> {
    match value.trim().parse::<u32>() {
        Ok(n) => Some(n),
        Err(e) => {
            DataError::new(field, value, e.to_string()).absorb();
            None
        }
    }
}
