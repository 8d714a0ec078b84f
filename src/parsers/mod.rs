//! Definition document parsers
//!
//! Each parser owns the rule wiring of one document type and drives a
//! [`Digester`] over a byte source. Parsers hold no per-parse state and can
//! be shared between threads; every call builds its own session.

pub mod digester;
pub mod extension;
pub mod vocabulary;

pub use digester::{Attributes, Digester};
pub use extension::ExtensionParser;
pub use vocabulary::VocabularyParser;

use crate::error::Result;
use crate::limits::Limits;
use std::io::Read;

/// Read a whole document, refusing anything larger than the size limit
pub(crate) fn read_document<R: Read>(reader: R, limits: &Limits) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    reader
        .take(limits.max_xml_size as u64 + 1)
        .read_to_end(&mut bytes)?;
    limits.check_xml_size(bytes.len())?;
    Ok(bytes)
}
