//! Resource loading utilities
//!
//! This module fetches definition documents and referenced thesauri from
//! files, remote URLs, or memory. Remote loading goes through a blocking
//! `reqwest` client behind the `http` feature; timeouts are configured here,
//! at the transport, since the parsing engine itself never times out.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
#[cfg(feature = "http")]
use once_cell::sync::OnceCell;
use std::fs;
use std::time::Duration;
use url::Url;

/// User agent sent with remote requests
const USER_AGENT: &str = concat!("dwca-model/", env!("CARGO_PKG_VERSION"));

/// Default timeout for remote requests
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Capability to retrieve a document by URL
///
/// Thesaurus resolution consumes this; anything that can turn a URL into
/// bytes (a [`Loader`], an in-memory map, a closure) can serve as the source.
pub trait Fetch {
    /// Retrieve the raw bytes of the document at `url`
    fn fetch(&self, url: &Url) -> Result<Vec<u8>>;
}

impl<F> Fetch for F
where
    F: Fn(&Url) -> Result<Vec<u8>>,
{
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        self(url)
    }
}

/// Resource loader for definition documents
#[derive(Debug, Clone)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
    /// Whether to allow remote resources
    allow_remote: bool,
    /// Timeout for remote requests
    timeout: Duration,
    /// User agent for remote requests
    user_agent: String,
    /// Client shared by every remote request, built on first use
    #[cfg(feature = "http")]
    client: OnceCell<reqwest::blocking::Client>,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self {
            limits: Limits::default(),
            allow_remote: true,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: USER_AGENT.to_string(),
            #[cfg(feature = "http")]
            client: OnceCell::new(),
        }
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Set whether to allow remote resources
    pub fn with_allow_remote(mut self, allow: bool) -> Self {
        self.allow_remote = allow;
        self
    }

    /// Set the timeout applied to each remote request
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self.reset_client();
        self
    }

    /// Set the user agent for remote requests
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self.reset_client();
        self
    }

    /// Load a resource as bytes
    pub fn load_bytes(&self, location: &Location) -> Result<Vec<u8>> {
        match location {
            Location::Path(path) => {
                let content = fs::read(path).map_err(|e| {
                    Error::Resource(format!("Failed to read file '{}': {}", path.display(), e))
                })?;

                self.limits.check_xml_size(content.len())?;

                Ok(content)
            }
            Location::Url(url) => {
                if !self.allow_remote {
                    return Err(Error::Resource(
                        "Remote resources are not allowed".to_string(),
                    ));
                }

                self.load_remote(url)
            }
            Location::String(s) => Ok(s.as_bytes().to_vec()),
        }
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        let bytes = self.load_bytes(location)?;
        String::from_utf8(bytes).map_err(|e| {
            Error::Resource(format!("Resource '{}' is not valid UTF-8: {}", location, e))
        })
    }

    #[cfg(feature = "http")]
    fn reset_client(&mut self) {
        self.client = OnceCell::new();
    }

    #[cfg(not(feature = "http"))]
    fn reset_client(&mut self) {}

    /// The HTTP client, built with the configured timeout and user agent
    #[cfg(feature = "http")]
    fn client(&self) -> Result<&reqwest::blocking::Client> {
        self.client.get_or_try_init(|| {
            tracing::debug!(timeout = ?self.timeout, "Building HTTP client");
            reqwest::blocking::Client::builder()
                .timeout(self.timeout)
                .user_agent(self.user_agent.as_str())
                .build()
                .map_err(Error::from)
        })
    }

    #[cfg(feature = "http")]
    fn load_remote(&self, url: &Url) -> Result<Vec<u8>> {
        tracing::debug!(url = %url, "Fetching remote resource");
        let response = self.client()?.get(url.as_str()).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Resource(format!(
                "GET {} returned {}",
                url, status
            )));
        }

        if let Some(length) = response.content_length() {
            self.limits.check_xml_size(declared_size(length))?;
        }

        let bytes = response.bytes()?;
        self.limits.check_xml_size(bytes.len())?;

        Ok(bytes.to_vec())
    }

    #[cfg(not(feature = "http"))]
    fn load_remote(&self, url: &Url) -> Result<Vec<u8>> {
        Err(Error::Resource(format!(
            "Cannot fetch {}: remote loading requires the `http` feature",
            url
        )))
    }
}

/// Content-Length as a size, saturating where `usize` is narrower than `u64`
#[cfg(feature = "http")]
fn declared_size(length: u64) -> usize {
    usize::try_from(length).unwrap_or(usize::MAX)
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetch for Loader {
    fn fetch(&self, url: &Url) -> Result<Vec<u8>> {
        self.load_bytes(&Location::from(url.clone()))
    }
}
