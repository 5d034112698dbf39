//! Request execution with tracing instrumentation.
//!
//! This module provides the [`ApiClient`] façade. Every entry point runs the
//! same pipeline: build the request, dispatch it, log the attempt, validate
//! the reply, then stop at raw bytes, decode, or decode and map.

use std::sync::Arc;

use reqwest::header::{HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use tracing::{instrument, Level, Span};

use crate::config::Configuration;
use crate::endpoint::Endpoint;
use crate::error::ApiError;
use crate::logger::{RequestAttempt, RequestLogger, TracingLogger};
use crate::mapper::Mappable;
use crate::request::build_request;
use crate::response::{validate, ApiResponse, JsonDecoder, ResponseDecoder};
use crate::transport::{self, ReqwestTransport, Transport};

/// Builder for configuring an [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    configuration: Configuration,
    transport: Option<Arc<dyn Transport>>,
    logger: Option<Arc<dyn RequestLogger>>,
}

impl ApiClientBuilder {
    /// Sets the client-wide defaults.
    pub fn configuration(mut self, configuration: Configuration) -> Self {
        self.configuration = configuration;
        self
    }

    /// Sets the network layer. Defaults to a [`ReqwestTransport`].
    pub fn transport(mut self, transport: impl Transport + 'static) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    /// Shares an existing network layer with this client.
    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the logging collaborator. Defaults to [`TracingLogger`].
    pub fn logger(mut self, logger: impl RequestLogger + 'static) -> Self {
        self.logger = Some(Arc::new(logger));
        self
    }

    /// Shares an existing logger with this client.
    pub fn shared_logger(mut self, logger: Arc<dyn RequestLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Builds the [`ApiClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if no transport was given and the default one cannot
    /// be constructed.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(ReqwestTransport::new()?),
        };
        let logger = self
            .logger
            .unwrap_or_else(|| Arc::new(TracingLogger) as Arc<dyn RequestLogger>);

        Ok(ApiClient::from_parts(self.configuration, transport, logger))
    }
}

/// Async client turning [`Endpoint`]s into raw, decoded or mapped results.
///
/// The client holds only read-only state, so it can be cloned cheaply and
/// used from any number of concurrent tasks. Each call performs exactly one
/// request and reports exactly one outcome.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::{ApiClient, Configuration, Endpoint, HttpMethod};
///
/// #[derive(serde::Deserialize)]
/// struct Movie { id: u64, title: String }
///
/// let configuration = Configuration::builder()
///     .base_url("https://api.example.com")?
///     .header("accept", "application/json")
///     .build();
/// let client = ApiClient::new(configuration)?;
///
/// let endpoint = Endpoint::new(HttpMethod::Get, "/movies/1");
/// let movie: Movie = client.request(&endpoint).await?;
/// println!("Movie: {}", movie.title);
/// ```
#[derive(Clone)]
pub struct ApiClient {
    configuration: Arc<Configuration>,
    transport: Arc<dyn Transport>,
    logger: Arc<dyn RequestLogger>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("configuration", &self.configuration)
            .finish_non_exhaustive()
    }
}

impl ApiClient {
    /// Creates a new builder for configuring an API client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Creates a client with the default transport and logger.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(configuration: Configuration) -> Result<Self, ApiError> {
        Self::builder().configuration(configuration).build()
    }

    /// Assembles a client from already constructed collaborators.
    pub fn from_parts(
        configuration: Configuration,
        transport: Arc<dyn Transport>,
        logger: Arc<dyn RequestLogger>,
    ) -> Self {
        Self {
            configuration: Arc::new(configuration),
            transport,
            logger,
        }
    }

    /// Returns the client-wide defaults.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Executes `endpoint` and returns the body bytes with their status code.
    ///
    /// ## Errors
    ///
    /// - [`ApiError::InvalidEndpoint`] if the request cannot be built.
    /// - [`ApiError::Network`] if the transport fails.
    /// - [`ApiError::BadServerResponse`] if the reply is missing or its
    ///   status falls outside `200..400`.
    #[instrument(
        name = "api_request",
        skip(self, endpoint),
        fields(
            http.method = %endpoint.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn request_raw(&self, endpoint: &Endpoint) -> Result<ApiResponse, ApiError> {
        self.execute(endpoint, None).await
    }

    /// Executes `endpoint` and decodes the body as JSON into `T`.
    ///
    /// ## Errors
    ///
    /// Everything [`request_raw`](Self::request_raw) can return, plus
    /// [`ApiError::Parsing`] if the body does not match `T`.
    #[instrument(
        name = "api_request",
        skip(self, endpoint),
        fields(
            http.method = %endpoint.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn request<T>(&self, endpoint: &Endpoint) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
    {
        let response = self.execute(endpoint, Some(JsonDecoder.content_type())).await?;
        self.decode(&response, &JsonDecoder)
    }

    /// Executes `endpoint` and decodes the body into `T` with `decoder`.
    ///
    /// The decoder's media type is sent as `accept` unless the endpoint or
    /// the configuration already set one.
    ///
    /// ## Errors
    ///
    /// Same as [`request`](Self::request).
    #[instrument(
        name = "api_request",
        skip(self, endpoint, decoder),
        fields(
            http.method = %endpoint.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn request_with<T, D>(&self, endpoint: &Endpoint, decoder: &D) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        D: ResponseDecoder,
    {
        let response = self.execute(endpoint, Some(decoder.content_type())).await?;
        self.decode(&response, decoder)
    }

    /// Executes `endpoint`, decodes the wire model `M::Input` as JSON and
    /// transforms it with `mapper`.
    ///
    /// The mapper runs at most once, and only after decoding succeeded.
    ///
    /// ## Errors
    ///
    /// Pipeline failures are converted into `M::Error`; errors returned by
    /// the mapper are passed through unchanged.
    #[instrument(
        name = "api_request",
        skip(self, endpoint, mapper),
        fields(
            http.method = %endpoint.method(),
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub async fn request_mapped<M>(&self, endpoint: &Endpoint, mapper: &M) -> Result<M::Output, M::Error>
    where
        M: Mappable,
    {
        let response = self.execute(endpoint, Some(JsonDecoder.content_type())).await?;
        let wire: M::Input = self.decode(&response, &JsonDecoder)?;
        mapper.map(wire)
    }

    /// Shared pipeline up to validation.
    ///
    /// `accept` is the decoder's media type, sent only when neither the
    /// endpoint nor the configuration set an `accept` header.
    async fn execute(
        &self,
        endpoint: &Endpoint,
        accept: Option<&'static str>,
    ) -> Result<ApiResponse, ApiError> {
        let mut request = match build_request(endpoint, &self.configuration) {
            Ok(request) => request,
            Err(e) => {
                tracing::warn!(error = %e, path = endpoint.path(), "Cannot build request");
                return Err(e.into());
            }
        };
        if let Some(accept) = accept {
            request
                .headers
                .entry(ACCEPT)
                .or_insert(HeaderValue::from_static(accept));
        }
        Span::current().record("http.url", request.url.as_str());

        let outcome = transport::perform(self.transport.as_ref(), request.clone()).await;

        self.logger.log_request(&RequestAttempt {
            request: &request,
            data: outcome.data.as_ref(),
            status: outcome.status(),
            error: outcome.error.as_ref(),
        });

        if let Some(status) = outcome.status() {
            Span::current().record("http.status_code", status);
        }

        let result = validate(outcome);
        let otel_status = match &result {
            Ok(_) => "OK",
            Err(ApiError::Network(_)) => "ERROR",
            Err(e) if e.status_code().is_some_and(|s| s >= 500) => "ERROR",
            Err(_) => "UNSET",
        };
        Span::current().record("otel.status_code", otel_status);

        result
    }

    /// Decode stage: one attempt, failures logged with their structured detail.
    fn decode<T, D>(&self, response: &ApiResponse, decoder: &D) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        D: ResponseDecoder,
    {
        response.decode_with(decoder).map_err(|e| {
            self.logger
                .log(Level::ERROR, &format!("Decoding error: {}", e.detail()));
            ApiError::Parsing(e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::{JsonEncoder, RequestBody};
    use crate::error::{BadResponse, DecodeErrorKind, EndpointError, TransportError};
    use crate::method::HttpMethod;
    use crate::mock::{RecordingLogger, StubResponse, StubTransport};
    use crate::response::YamlDecoder;
    use bytes::Bytes;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_test::traced_test;

    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Movie {
        id: u64,
        title: String,
    }

    fn configuration() -> Configuration {
        Configuration::builder()
            .base_url("https://api.example.com")
            .unwrap()
            .header("accept", "application/json")
            .build()
    }

    fn client(transport: &StubTransport, logger: &RecordingLogger) -> ApiClient {
        ApiClient::builder()
            .configuration(configuration())
            .transport(transport.clone())
            .logger(logger.clone())
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_request_raw_success() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(200, r#"{"id":1,"title":"X"}"#));
        let logger = RecordingLogger::new();

        let endpoint = Endpoint::new(HttpMethod::Get, "/movies/1");
        let response = client(&transport, &logger).request_raw(&endpoint).await.unwrap();

        assert_eq!(response.status_code, 200);
        assert_eq!(response.data, Bytes::from_static(br#"{"id":1,"title":"X"}"#));
        assert_eq!(logger.attempts().len(), 1);
    }

    #[tokio::test]
    async fn test_request_sends_merged_headers() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(200, "{}"));

        let endpoint = Endpoint::builder()
            .method(HttpMethod::Get)
            .path("/movies/1")
            .header("accept", "application/xml")
            .header("x-trace", "abc")
            .build();
        client(&transport, &RecordingLogger::new())
            .request_raw(&endpoint)
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].headers["accept"], "application/xml");
        assert_eq!(sent[0].headers["x-trace"], "abc");
    }

    #[tokio::test]
    async fn test_decoder_media_type_is_default_accept() {
        let transport = StubTransport::new();
        transport.fallback(StubResponse::new(200, "id: 1\ntitle: X\n"));
        let client = ApiClient::builder()
            .configuration(
                Configuration::builder()
                    .base_url("https://api.example.com")
                    .unwrap()
                    .build(),
            )
            .transport(transport.clone())
            .logger(RecordingLogger::new())
            .build()
            .unwrap();

        let _: Movie = client
            .request_with(&Endpoint::new(HttpMethod::Get, "/movies/1"), &YamlDecoder)
            .await
            .unwrap();
        client
            .request_raw(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await
            .unwrap();

        let sent = transport.requests();
        assert_eq!(sent[0].headers["accept"], "application/yaml");
        assert!(sent[1].headers.get("accept").is_none());
    }

    #[tokio::test]
    async fn test_configured_accept_wins_over_decoder() {
        let transport = StubTransport::new();
        transport.fallback(StubResponse::new(200, "id: 1\ntitle: X\n"));

        let _: Movie = client(&transport, &RecordingLogger::new())
            .request_with(&Endpoint::new(HttpMethod::Get, "/movies/1"), &YamlDecoder)
            .await
            .unwrap();

        assert_eq!(transport.requests()[0].headers["accept"], "application/json");
    }

    #[tokio::test]
    async fn test_body_encoding_failure_never_dispatches() {
        let transport = StubTransport::new();
        let logger = RecordingLogger::new();

        let mut unencodable = std::collections::HashMap::new();
        unencodable.insert((1, 2), "tuple keys are not valid JSON object keys");
        let endpoint = Endpoint::builder()
            .method(HttpMethod::Post)
            .path("/movies")
            .body(RequestBody::encodable(unencodable, JsonEncoder::default()))
            .build();

        let result = client(&transport, &logger).request_raw(&endpoint).await;

        assert!(matches!(
            result,
            Err(ApiError::InvalidEndpoint(EndpointError::Body(_)))
        ));
        assert!(transport.requests().is_empty());
        assert!(logger.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_endpoint_never_dispatches() {
        let transport = StubTransport::new();
        let logger = RecordingLogger::new();
        let client = ApiClient::builder()
            .transport(transport.clone())
            .logger(logger.clone())
            .build()
            .unwrap();

        let result = client
            .request_raw(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await;

        assert!(matches!(
            result,
            Err(ApiError::InvalidEndpoint(EndpointError::MissingHost))
        ));
        assert!(transport.requests().is_empty());
        assert!(logger.attempts().is_empty());
    }

    #[tokio::test]
    async fn test_network_error() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::failure("offline"));
        let logger = RecordingLogger::new();

        let result = client(&transport, &logger)
            .request::<Movie>(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await;

        assert!(matches!(result, Err(ApiError::Network(TransportError::Connection(_)))));
        let attempts = logger.attempts();
        assert_eq!(attempts.len(), 1);
        assert!(attempts[0].error.as_deref().unwrap().contains("offline"));
    }

    #[tokio::test]
    async fn test_dropped_request_is_a_network_error() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::dropped());

        let result = client(&transport, &RecordingLogger::new())
            .request_raw(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await;

        assert!(matches!(result, Err(ApiError::Network(TransportError::Dropped))));
    }

    #[tokio::test]
    async fn test_decode_failure_is_parsing_and_logged() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(200, r#"{"id":1}"#));
        let logger = RecordingLogger::new();

        let result = client(&transport, &logger)
            .request::<Movie>(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await;

        let Err(ApiError::Parsing(err)) = result else {
            panic!("expected a parsing error, got {result:?}");
        };
        assert!(matches!(err.kind(), DecodeErrorKind::KeyNotFound { key } if key == "title"));

        let messages = logger.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].0, Level::ERROR);
        assert!(messages[0].1.starts_with("Decoding error: Key `title` not found"));
    }

    #[tokio::test]
    async fn test_request_with_custom_decoder() {
        let transport = StubTransport::new();
        transport.respond("/movies/1.yaml", StubResponse::new(200, "id: 1\ntitle: X\n"));

        let movie: Movie = client(&transport, &RecordingLogger::new())
            .request_with(&Endpoint::new(HttpMethod::Get, "/movies/1.yaml"), &YamlDecoder)
            .await
            .unwrap();

        assert_eq!(movie.title, "X");
    }

    #[tokio::test]
    async fn test_mapper_runs_once_after_decoding() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(200, r#"{"id":1,"title":"X"}"#));
        let calls = AtomicUsize::new(0);

        let mapper = crate::mapper::map_fn(|movie: Movie| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(movie.title)
        });
        let title = client(&transport, &RecordingLogger::new())
            .request_mapped(&Endpoint::new(HttpMethod::Get, "/movies/1"), &mapper)
            .await
            .unwrap();

        assert_eq!(title, "X");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_mapper_skipped_on_bad_response() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(500, "oops"));
        let calls = AtomicUsize::new(0);

        let mapper = crate::mapper::map_fn(|movie: Movie| {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok::<_, ApiError>(movie.title)
        });
        let result = client(&transport, &RecordingLogger::new())
            .request_mapped(&Endpoint::new(HttpMethod::Get, "/movies/1"), &mapper)
            .await;

        assert!(matches!(
            result,
            Err(ApiError::BadServerResponse(BadResponse::Status { status: 500 }))
        ));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    #[traced_test]
    async fn test_tracing_logger_records_request() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(200, r#"{"id":1,"title":"X"}"#));
        let client = ApiClient::builder()
            .configuration(configuration())
            .transport(transport)
            .build()
            .unwrap();

        client
            .request_raw(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await
            .unwrap();

        assert!(logs_contain("api_request"));
        assert!(logs_contain("Request completed"));
        assert!(logs_contain("https://api.example.com/movies/1"));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_decode_failure_reaches_tracing() {
        let transport = StubTransport::new();
        transport.respond("/movies/1", StubResponse::new(200, "<html>"));
        let client = ApiClient::builder()
            .configuration(configuration())
            .transport(transport)
            .build()
            .unwrap();

        let result = client
            .request::<Movie>(&Endpoint::new(HttpMethod::Get, "/movies/1"))
            .await;

        assert!(matches!(result, Err(ApiError::Parsing(_))));
        assert!(logs_contain("Decoding error: Data corrupted"));
    }

    #[test]
    fn test_client_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ApiClient>();
    }
}
