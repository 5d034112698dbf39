//! Client-wide defaults.

use std::collections::BTreeMap;

use url::Url;

use crate::error::EndpointError;

/// Immutable defaults applied to every request a client makes.
///
/// A configuration never changes after it is built; create a new one to
/// change the defaults. Endpoint values take precedence over these.
///
/// ## Examples
///
/// ```rust
/// use netman::Configuration;
///
/// let config = Configuration::builder()
///     .base_url("https://api.example.com")
///     .unwrap()
///     .header("accept", "application/json")
///     .build();
///
/// assert_eq!(config.base_url().unwrap().host_str(), Some("api.example.com"));
/// assert_eq!(config.base_headers().get("accept").map(String::as_str), Some("application/json"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configuration {
    base_url: Option<Url>,
    base_headers: BTreeMap<String, String>,
}

impl Configuration {
    /// Creates a configuration from its parts.
    pub fn new(base_url: Option<Url>, base_headers: BTreeMap<String, String>) -> Self {
        Self {
            base_url,
            base_headers,
        }
    }

    /// Creates a new builder with no base URL and no headers.
    pub fn builder() -> ConfigurationBuilder {
        ConfigurationBuilder::default()
    }

    /// Returns the default host URL, if any.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Returns the headers sent with every request unless an endpoint overrides them.
    pub fn base_headers(&self) -> &BTreeMap<String, String> {
        &self.base_headers
    }
}

/// Builder for [`Configuration`].
#[derive(Debug, Default)]
pub struct ConfigurationBuilder {
    base_url: Option<Url>,
    base_headers: BTreeMap<String, String>,
}

impl ConfigurationBuilder {
    /// Sets the default host from a URL string.
    ///
    /// ## Errors
    ///
    /// Returns an error if `url` does not parse.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self, EndpointError> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the default host from an already parsed URL.
    pub fn base_url_parsed(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Adds a default header. A later call with the same name replaces the value.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.base_headers.insert(name.into(), value.into());
        self
    }

    /// Adds several default headers.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.base_headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Freezes the configuration.
    pub fn build(self) -> Configuration {
        Configuration {
            base_url: self.base_url,
            base_headers: self.base_headers,
        }
    }
}
