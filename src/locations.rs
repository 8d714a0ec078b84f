//! Resource location resolution
//!
//! Definition documents and the thesauri they reference are addressed by
//! URL, file path, or (in tests and embedded use) an in-memory string.

use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Resource location - can be a URL, file path, or in-memory document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// URL (http, https, file)
    Url(Url),
    /// In-memory document content
    String(String),
}

impl Location {
    /// Create a location from a string (auto-detect type)
    pub fn parse(s: &str) -> Self {
        if let Ok(url) = Url::parse(s) {
            if url.scheme() == "file" {
                if let Ok(path) = url.to_file_path() {
                    return Location::Path(path);
                }
            }
            return Location::Url(url);
        }

        let path = PathBuf::from(s);
        if path.exists() || s.starts_with('/') || s.starts_with('.') {
            return Location::Path(path);
        }

        Location::String(s.to_string())
    }

    /// Get the location as a string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
            Location::String(s) => s.clone(),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }

    /// Check if this is a local file
    pub fn is_file(&self) -> bool {
        matches!(self, Location::Path(_))
    }

    /// URL identifying the document, if it has one
    ///
    /// Paths become `file:` URLs, relative ones resolved against the
    /// working directory.
    pub fn to_url(&self) -> Option<Url> {
        match self {
            Location::Url(u) => Some(u.clone()),
            Location::Path(p) if p.is_absolute() => Url::from_file_path(p).ok(),
            Location::Path(p) => Url::from_file_path(std::env::current_dir().ok()?.join(p)).ok(),
            Location::String(_) => None,
        }
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        if url.scheme() == "file" {
            if let Ok(path) = url.to_file_path() {
                return Location::Path(path);
            }
        }
        Location::Url(url)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_str())
    }
}
