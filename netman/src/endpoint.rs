//! Declarative endpoint descriptions with a type-state builder.
//!
//! An [`Endpoint`] is a passive value describing one HTTP call. It is built
//! per call, never mutated, and consumed only by request construction. The
//! [`EndpointBuilder`] tracks the required method and path at compile time.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use url::Url;

use crate::body::RequestBody;
use crate::method::HttpMethod;

/// Marker types for builder state tracking.
pub mod builder_state {
    /// Marker for a field that has not been set.
    pub struct Missing;
    /// Marker for a field that has been set.
    pub struct Present;
}

use builder_state::{Missing, Present};

/// Description of a single HTTP call.
///
/// ## Examples
///
/// ```rust
/// use netman::{Endpoint, HttpMethod};
///
/// let endpoint = Endpoint::builder()
///     .method(HttpMethod::Get)
///     .path("/3/movie/550")
///     .query("language", "en-US")
///     .header("accept", "application/json")
///     .build();
///
/// assert_eq!(endpoint.path(), "/3/movie/550");
/// assert_eq!(endpoint.queries().unwrap().len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Endpoint {
    base_url: Option<Url>,
    path: String,
    method: HttpMethod,
    headers: Option<BTreeMap<String, String>>,
    queries: Option<Vec<(String, String)>>,
    body: RequestBody,
}

impl Endpoint {
    /// Creates a builder with nothing set.
    pub fn builder() -> EndpointBuilder<Missing, Missing> {
        EndpointBuilder::new()
    }

    /// Shorthand for an endpoint with only a method and a path.
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self::builder().method(method).path(path).build()
    }

    /// Returns the host override, if any.
    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    /// Returns the request path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the HTTP method.
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// Returns the endpoint's own headers, applied over the client defaults.
    pub fn headers(&self) -> Option<&BTreeMap<String, String>> {
        self.headers.as_ref()
    }

    /// Returns the query pairs in the order they were added.
    pub fn queries(&self) -> Option<&[(String, String)]> {
        self.queries.as_deref()
    }

    /// Returns the body description.
    pub fn body(&self) -> &RequestBody {
        &self.body
    }
}

/// Type-state builder for [`Endpoint`].
///
/// `build` is only available once both the method and the path are set.
pub struct EndpointBuilder<Method, Path> {
    base_url: Option<Url>,
    path: Option<String>,
    method: Option<HttpMethod>,
    headers: Option<BTreeMap<String, String>>,
    queries: Option<Vec<(String, String)>>,
    body: RequestBody,
    _state: PhantomData<(Method, Path)>,
}

impl EndpointBuilder<Missing, Missing> {
    /// Creates a builder with no fields set.
    pub fn new() -> Self {
        Self {
            base_url: None,
            path: None,
            method: None,
            headers: None,
            queries: None,
            body: RequestBody::None,
            _state: PhantomData,
        }
    }
}

impl Default for EndpointBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> EndpointBuilder<Missing, P> {
    /// Sets the HTTP method.
    pub fn method(self, method: HttpMethod) -> EndpointBuilder<Present, P> {
        EndpointBuilder {
            base_url: self.base_url,
            path: self.path,
            method: Some(method),
            headers: self.headers,
            queries: self.queries,
            body: self.body,
            _state: PhantomData,
        }
    }
}

impl<M> EndpointBuilder<M, Missing> {
    /// Sets the request path.
    pub fn path(self, path: impl Into<String>) -> EndpointBuilder<M, Present> {
        EndpointBuilder {
            base_url: self.base_url,
            path: Some(path.into()),
            method: self.method,
            headers: self.headers,
            queries: self.queries,
            body: self.body,
            _state: PhantomData,
        }
    }
}

impl<M, P> EndpointBuilder<M, P> {
    /// Overrides the client's default host for this endpoint.
    pub fn base_url(mut self, url: Url) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Adds a header. Endpoint headers win over the client's base headers.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Appends a query pair. Duplicate keys are kept.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.queries
            .get_or_insert_with(Vec::new)
            .push((key.into(), value.into()));
        self
    }

    /// Appends several query pairs, keeping their order.
    pub fn queries<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.queries
            .get_or_insert_with(Vec::new)
            .extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sets the request body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }
}

impl EndpointBuilder<Present, Present> {
    /// Builds the endpoint.
    pub fn build(self) -> Endpoint {
        Endpoint {
            base_url: self.base_url,
            path: self.path.unwrap_or_default(),
            method: self.method.unwrap_or_default(),
            headers: self.headers,
            queries: self.queries,
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_minimal() {
        let endpoint = Endpoint::builder()
            .method(HttpMethod::Delete)
            .path("/movies/1")
            .build();

        assert_eq!(endpoint.method(), HttpMethod::Delete);
        assert_eq!(endpoint.path(), "/movies/1");
        assert!(endpoint.base_url().is_none());
        assert!(endpoint.headers().is_none());
        assert!(endpoint.queries().is_none());
        assert!(endpoint.body().is_none());
    }

    #[test]
    fn test_builder_order_independence() {
        let endpoint = Endpoint::builder()
            .query("page", "2")
            .path("/movies")
            .header("x-trace", "abc")
            .method(HttpMethod::Get)
            .build();

        assert_eq!(endpoint.path(), "/movies");
        assert_eq!(endpoint.headers().unwrap()["x-trace"], "abc");
    }

    #[test]
    fn test_queries_keep_order_and_duplicates() {
        let endpoint = Endpoint::builder()
            .method(HttpMethod::Get)
            .path("/movies")
            .query("id", "1")
            .queries([("id", "2"), ("sort", "asc")])
            .build();

        let pairs: Vec<_> = endpoint
            .queries()
            .unwrap()
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(pairs, vec![("id", "1"), ("id", "2"), ("sort", "asc")]);
    }

    #[test]
    fn test_base_url_override() {
        let url = Url::parse("https://images.example.com").unwrap();
        let endpoint = Endpoint::builder()
            .base_url(url.clone())
            .method(HttpMethod::Get)
            .path("/poster.jpg")
            .build();

        assert_eq!(endpoint.base_url(), Some(&url));
    }

    #[test]
    fn test_new_shorthand() {
        let endpoint = Endpoint::new(HttpMethod::Post, "/movies");
        assert_eq!(endpoint.method(), HttpMethod::Post);
        assert_eq!(endpoint.path(), "/movies");
    }
}
