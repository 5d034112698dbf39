//! Turns an [`Endpoint`] and a [`Configuration`] into a transport request.
//!
//! Construction is pure: the same endpoint and configuration always produce
//! the same [`HttpRequest`], and nothing outside the returned value changes.

use std::collections::BTreeMap;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use url::Url;

use crate::config::Configuration;
use crate::endpoint::Endpoint;
use crate::error::EndpointError;
use crate::method::HttpMethod;

/// Scheme used for every built request; plaintext HTTP is not offered.
const SCHEME: &str = "https";

/// A fully formed request, ready for a [`Transport`](crate::transport::Transport).
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: HttpMethod,
    /// Absolute URL including the query string.
    pub url: Url,
    /// Merged headers.
    pub headers: HeaderMap,
    /// Encoded body, if the endpoint has one.
    pub body: Option<Bytes>,
}

/// Builds the transport request for `endpoint`.
///
/// - The host (and an explicit port) come from the endpoint's base URL when it
///   has a host, otherwise from the configuration's.
/// - The scheme is always `https`; the base URL's own path is not used.
/// - Query pairs keep their order, duplicates included.
/// - Endpoint headers override base headers with the same name.
///
/// ## Errors
///
/// - [`EndpointError::MissingHost`] if no host can be resolved.
/// - [`EndpointError::InvalidHeaderName`] / [`EndpointError::InvalidHeaderValue`]
///   for headers HTTP cannot carry.
/// - [`EndpointError::Body`] if the body fails to serialize.
pub fn build_request(
    endpoint: &Endpoint,
    configuration: &Configuration,
) -> Result<HttpRequest, EndpointError> {
    let origin = [endpoint.base_url(), configuration.base_url()]
        .into_iter()
        .flatten()
        .find(|url| url.host_str().is_some())
        .ok_or(EndpointError::MissingHost)?;

    let mut url = Url::parse(&format!("{SCHEME}://localhost"))?;
    url.set_host(origin.host_str())?;
    url.set_port(origin.port())
        .map_err(|()| EndpointError::MissingHost)?;
    url.set_path(endpoint.path());

    if let Some(queries) = endpoint.queries().filter(|q| !q.is_empty()) {
        url.query_pairs_mut().extend_pairs(queries);
    }

    let headers = merge_headers(configuration.base_headers(), endpoint.headers())?;
    let body = endpoint.body().encode()?;

    Ok(HttpRequest {
        method: endpoint.method(),
        url,
        headers,
        body,
    })
}

/// Merges base headers with endpoint overrides; the override wins per name.
///
/// Header names compare case-insensitively, so `Accept` in the overrides
/// replaces `accept` from the base.
///
/// ## Errors
///
/// Returns an error for header names or values HTTP cannot carry.
pub fn merge_headers(
    base: &BTreeMap<String, String>,
    overrides: Option<&BTreeMap<String, String>>,
) -> Result<HeaderMap, EndpointError> {
    let mut merged = HeaderMap::with_capacity(base.len());
    for (name, value) in base.iter().chain(overrides.into_iter().flatten()) {
        let header_name = HeaderName::try_from(name.as_str())
            .map_err(|_| EndpointError::InvalidHeaderName(name.clone()))?;
        let header_value = HeaderValue::try_from(value.as_str())
            .map_err(|_| EndpointError::InvalidHeaderValue(name.clone()))?;
        merged.insert(header_name, header_value);
    }
    Ok(merged)
}
