//! Limits and constraints for definition document parsing
//!
//! Guards the rule engine against oversized or hostile inputs. Each parse
//! session checks depth and attribute counts as elements open, the document
//! size before tokenizing, and the number of distinct thesauri fetched per
//! resolution scope.

use crate::error::{Error, Result};

/// Parsing limits configuration
#[derive(Debug, Clone)]
pub struct Limits {
    /// Maximum element nesting depth
    pub max_xml_depth: usize,

    /// Maximum document size in bytes
    pub max_xml_size: usize,

    /// Maximum number of attributes per element
    pub max_attributes: usize,

    /// Maximum number of distinct thesauri fetched in one resolution scope
    pub max_thesauri: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 256,
            max_xml_size: 32 * 1024 * 1024, // 32 MB
            max_attributes: 256,
            max_thesauri: 256,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 32,
            max_xml_size: 4 * 1024 * 1024, // 4 MB
            max_attributes: 64,
            max_thesauri: 32,
        }
    }

    /// Create permissive limits (less restrictive, use with caution)
    pub fn permissive() -> Self {
        Self {
            max_xml_depth: 4096,
            max_xml_size: 512 * 1024 * 1024, // 512 MB
            max_attributes: 4096,
            max_thesauri: 4096,
        }
    }

    /// Check if element depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if document size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if number of attributes is within limits
    pub fn check_attributes(&self, count: usize) -> Result<()> {
        if count > self.max_attributes {
            Err(Error::LimitExceeded(format!(
                "Attribute count {} exceeds maximum {}",
                count, self.max_attributes
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the number of fetched thesauri is within limits
    pub fn check_thesauri(&self, count: usize) -> Result<()> {
        if count > self.max_thesauri {
            Err(Error::LimitExceeded(format!(
                "Thesaurus count {} exceeds maximum {}",
                count, self.max_thesauri
            )))
        } else {
            Ok(())
        }
    }
}
