//! Error types for dwca-model
//!
//! Fatal conditions ([`ParseError`], [`ResolutionError`]) abort a document parse and
//! reach the caller through [`Error`]. Coercion failures are described by [`DataError`],
//! which setters absorb: the affected field stays empty and parsing continues.

use std::fmt;
use thiserror::Error;

/// Result type alias using the dwca-model Error
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for dwca-model operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed XML, unusable by the tokenizer
    #[error("syntax error: {0}")]
    Syntax(#[from] ParseError),

    /// A referenced thesaurus could not be fetched or parsed
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    /// Resource loading error
    #[error("resource error: {0}")]
    Resource(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Rule wiring does not fit the objects on the construction stack
    #[error("rule error: {0}")]
    Rule(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// URL parsing error
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// HTTP transport error
    #[cfg(feature = "http")]
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// True for errors that come from malformed XML
    pub fn is_syntax(&self) -> bool {
        matches!(self, Error::Syntax(_))
    }

    /// True for errors raised while resolving a thesaurus reference
    pub fn is_resolution(&self) -> bool {
        matches!(self, Error::Resolution(_))
    }
}

/// Malformed XML document
#[derive(Debug, Clone)]
pub struct ParseError {
    /// Error message
    pub message: String,
    /// Location in the document (byte offset or element path)
    pub location: Option<String>,
    /// Document source that caused the error
    pub source: Option<String>,
}

impl ParseError {
    /// Create a new parse error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            location: None,
            source: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        if let Some(ref src) = self.source {
            write!(f, "\n\nSource:\n{}", src)?;
        }

        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// A thesaurus reference that could not be turned into a vocabulary
#[derive(Debug, Clone)]
pub struct ResolutionError {
    /// The thesaurus URL as written in the referencing document
    pub url: String,
    /// Why resolution failed
    pub reason: String,
    /// Element path of the referencing property
    pub location: Option<String>,
}

impl ResolutionError {
    /// Create a new resolution error
    pub fn new(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            reason: reason.into(),
            location: None,
        }
    }

    /// Set the element path of the referencing property
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }
}

impl fmt::Display for ResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot resolve thesaurus '{}': {}", self.url, self.reason)?;

        if let Some(ref loc) = self.location {
            write!(f, "\n\nLocation: {}", loc)?;
        }

        Ok(())
    }
}

impl std::error::Error for ResolutionError {}

/// Non-fatal coercion failure of one attribute value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataError {
    /// Field that could not be populated
    pub field: &'static str,
    /// Raw attribute value
    pub value: String,
    /// Why the value was rejected
    pub reason: String,
}

impl DataError {
    /// Create a new data error
    pub fn new(field: &'static str, value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field,
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Log the failure; the field it describes stays empty
    pub fn absorb(self) {
        tracing::warn!(
            field = self.field,
            value = %self.value,
            reason = %self.reason,
            "Ignoring attribute value"
        );
    }
}

impl fmt::Display for DataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid value '{}' for {}: {}",
            self.value, self.field, self.reason
        )
    }
}

impl std::error::Error for DataError {}
