//! Default [`Transport`] backed by `reqwest`.

use std::time::Duration;

use tokio::runtime::Handle;

use super::{Completion, ResponseHead, Transport, TransportOutcome};
use crate::error::TransportError;
use crate::request::HttpRequest;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default `User-Agent` header: `netman/<version>`.
const DEFAULT_USER_AGENT: &str = concat!("netman/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`ReqwestTransport`].
#[derive(Debug)]
pub struct ReqwestTransportBuilder {
    timeout: Duration,
    user_agent: String,
}

impl Default for ReqwestTransportBuilder {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ReqwestTransportBuilder {
    /// Sets the overall request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the `User-Agent` sent when a request does not carry its own.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Builds the transport.
    ///
    /// ## Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn build(self) -> Result<ReqwestTransport, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent)
            .build()?;
        Ok(ReqwestTransport { client })
    }
}

/// Transport that executes requests with a shared `reqwest::Client`.
///
/// Each dispatched request runs as its own task on the current tokio runtime,
/// so dropping the future awaiting a response does not abort the request.
///
/// ## Examples
///
/// ```rust,ignore
/// use std::time::Duration;
/// use netman::transport::ReqwestTransport;
///
/// let transport = ReqwestTransport::builder()
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// ```
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    ///
    /// ## Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be constructed.
    pub fn new() -> Result<Self, TransportError> {
        Self::builder().build()
    }

    /// Creates a builder for a customized transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Wraps an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl Transport for ReqwestTransport {
    fn dispatch(&self, request: HttpRequest, completion: Completion) {
        let handle = match Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => {
                completion.complete(TransportOutcome::failed(TransportError::Runtime(
                    e.to_string(),
                )));
                return;
            }
        };

        let client = self.client.clone();
        handle.spawn(async move {
            let outcome = send(&client, request).await;
            completion.complete(outcome);
        });
    }
}

async fn send(client: &reqwest::Client, request: HttpRequest) -> TransportOutcome {
    let mut builder = client
        .request(request.method.into(), request.url)
        .headers(request.headers);
    if let Some(body) = request.body {
        builder = builder.body(body);
    }

    let response = match builder.send().await {
        Ok(response) => response,
        Err(e) => return TransportOutcome::failed(e.into()),
    };

    let head = ResponseHead::new(response.status().as_u16());

    match response.bytes().await {
        Ok(data) => TransportOutcome::completed(head, data),
        Err(e) => TransportOutcome {
            data: None,
            response: Some(head),
            error: Some(e.into()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::HttpMethod;
    use crate::transport::perform;
    use bytes::Bytes;
    use reqwest::header::HeaderMap;
    use url::Url;
    use wiremock::matchers::{body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    // Requests are built by hand here: the mock server only speaks plain http.
    fn request(method: HttpMethod, url: String) -> HttpRequest {
        HttpRequest {
            method,
            url: Url::parse(&url).unwrap(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[tokio::test]
    async fn test_get_reports_status_and_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/movies/1"))
            .and(query_param("language", "en"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"id":1,"title":"X"}"#))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let url = format!("{}/movies/1?language=en", mock_server.uri());
        let outcome = perform(&transport, request(HttpMethod::Get, url)).await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.status(), Some(200));
        assert_eq!(outcome.data, Some(Bytes::from_static(br#"{"id":1,"title":"X"}"#)));
    }

    #[tokio::test]
    async fn test_headers_and_body_are_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/movies"))
            .and(header("content-type", "application/json"))
            .and(body_string(r#"{"title":"X"}"#))
            .respond_with(ResponseTemplate::new(201))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let mut req = request(HttpMethod::Post, format!("{}/movies", mock_server.uri()));
        req.headers
            .insert("content-type", "application/json".parse().unwrap());
        req.body = Some(Bytes::from_static(br#"{"title":"X"}"#));

        let outcome = perform(&transport, req).await;
        assert_eq!(outcome.status(), Some(201));
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_transport_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let url = format!("{}/missing", mock_server.uri());
        let outcome = perform(&transport, request(HttpMethod::Get, url)).await;

        assert!(outcome.error.is_none());
        assert_eq!(outcome.status(), Some(404));
        assert_eq!(outcome.data, Some(Bytes::from_static(b"not found")));
    }

    #[tokio::test]
    async fn test_user_agent_is_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(header("user-agent", "netman-tests"))
            .respond_with(ResponseTemplate::new(204))
            .mount(&mock_server)
            .await;

        let transport = ReqwestTransport::builder()
            .user_agent("netman-tests")
            .build()
            .unwrap();
        let outcome = perform(&transport, request(HttpMethod::Get, mock_server.uri())).await;

        assert_eq!(outcome.status(), Some(204));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_transport_error() {
        // bind then release a port so nothing is listening on it
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let url = format!("http://{addr}/gone");

        let transport = ReqwestTransport::builder()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        let outcome = perform(&transport, request(HttpMethod::Get, url)).await;

        assert!(matches!(outcome.error, Some(TransportError::Request(_))));
        assert!(outcome.response.is_none());
    }

    #[test]
    fn test_dispatch_without_runtime_fails() {
        let transport = ReqwestTransport::new().unwrap();
        let (completion, mut receiver) = Completion::channel();

        transport.dispatch(
            request(HttpMethod::Get, "https://api.example.com/".to_string()),
            completion,
        );

        let outcome = receiver.try_recv().unwrap();
        assert!(matches!(outcome.error, Some(TransportError::Runtime(_))));
    }
}
