//! HTTP methods an endpoint can use.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// The HTTP method of an [`Endpoint`](crate::Endpoint).
///
/// Parsing is case-insensitive so method names coming from configuration or
/// generated code do not need normalizing first.
///
/// ## Examples
///
/// ```rust
/// use netman::HttpMethod;
///
/// let method: HttpMethod = "patch".parse().unwrap();
/// assert_eq!(method, HttpMethod::Patch);
/// assert_eq!(method.as_str(), "PATCH");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum HttpMethod {
    /// Retrieve a resource.
    #[default]
    Get,
    /// Create a resource or trigger an action.
    Post,
    /// Replace a resource.
    Put,
    /// Partially update a resource.
    Patch,
    /// Remove a resource.
    Delete,
    /// Retrieve headers only.
    Head,
    /// Query supported methods.
    Options,
    /// Echo the request back.
    Trace,
}

impl HttpMethod {
    /// Returns the canonical upper-case method name.
    pub fn as_str(self) -> &'static str {
        self.into()
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Head => reqwest::Method::HEAD,
            HttpMethod::Options => reqwest::Method::OPTIONS,
            HttpMethod::Trace => reqwest::Method::TRACE,
        }
    }
}
