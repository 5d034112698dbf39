//! Test doubles for driving an [`ApiClient`] without a network.
//!
//! [`mock_client`] returns a client wired the way the movie-database test
//! fixtures expect: a fixed base URL, JSON `accept`/`content-type` headers
//! and a silent logger. [`StubTransport`] answers requests from canned
//! [`StubResponse`]s keyed by URL path, and [`RecordingLogger`] keeps
//! everything it is told for later assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::Level;

use crate::client::ApiClient;
use crate::config::Configuration;
use crate::error::{ApiError, TransportError};
use crate::logger::{NoLogger, RequestAttempt, RequestLogger};
use crate::method::HttpMethod;
use crate::request::HttpRequest;
use crate::transport::{Completion, ResponseHead, Transport, TransportOutcome};

/// Base URL of the mock client.
pub const MOCK_BASE_URL: &str = "https://api.themoviedb.org";

/// Builds a client that talks to `transport` with the mock defaults.
///
/// ## Errors
///
/// Returns an error only if the fixed base URL fails to parse.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::mock::{mock_client, StubResponse, StubTransport};
///
/// let transport = StubTransport::new();
/// transport.respond("/3/movie/550", StubResponse::new(200, r#"{"id":550}"#));
/// let client = mock_client(transport.clone())?;
/// ```
pub fn mock_client(transport: impl Transport + 'static) -> Result<ApiClient, ApiError> {
    let configuration = Configuration::builder()
        .base_url(MOCK_BASE_URL)?
        .header("accept", "application/json")
        .header("content-type", "application/json")
        .build();

    Ok(ApiClient::from_parts(
        configuration,
        Arc::new(transport),
        Arc::new(NoLogger),
    ))
}

/// Canned reply for a [`StubTransport`].
#[derive(Debug, Clone)]
pub struct StubResponse {
    status: Option<u16>,
    body: Option<Bytes>,
    failure: Option<String>,
    drop_completion: bool,
}

impl StubResponse {
    /// A response with `status` and `body`.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status: Some(status),
            body: Some(body.into()),
            failure: None,
            drop_completion: false,
        }
    }

    /// A JSON response serialized from `value`.
    ///
    /// ## Errors
    ///
    /// Returns an error if `value` cannot be serialized.
    pub fn json<T: serde::Serialize>(status: u16, value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self::new(status, serde_json::to_vec(value)?))
    }

    /// A response head without any body.
    pub fn head_only(status: u16) -> Self {
        Self {
            body: None,
            ..Self::new(status, Bytes::new())
        }
    }

    /// A reply carrying neither a head nor a body nor an error.
    pub fn empty() -> Self {
        Self {
            status: None,
            body: None,
            failure: None,
            drop_completion: false,
        }
    }

    /// A connection failure with `message`.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::empty()
        }
    }

    /// Releases the request without ever completing it.
    pub fn dropped() -> Self {
        Self {
            drop_completion: true,
            ..Self::empty()
        }
    }

    fn outcome(&self) -> TransportOutcome {
        TransportOutcome {
            data: self.body.clone(),
            response: self.status.map(ResponseHead::new),
            error: self
                .failure
                .as_ref()
                .map(|message| TransportError::Connection(message.clone())),
        }
    }
}

#[derive(Debug)]
struct StubState {
    routes: HashMap<String, StubResponse>,
    fallback: StubResponse,
    requests: Vec<HttpRequest>,
}

/// Transport answering from canned responses keyed by URL path.
///
/// Clones share their routes and request log, so a test can keep one handle
/// while the client owns another. Unknown paths get the fallback response,
/// which defaults to an empty `404`.
#[derive(Debug, Clone)]
pub struct StubTransport {
    state: Arc<Mutex<StubState>>,
}

impl Default for StubTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl StubTransport {
    /// Creates a transport with no routes.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(StubState {
                routes: HashMap::new(),
                fallback: StubResponse::new(404, Bytes::new()),
                requests: Vec::new(),
            })),
        }
    }

    /// Answers requests for `path` with `response`.
    pub fn respond(&self, path: impl Into<String>, response: StubResponse) {
        self.state().routes.insert(path.into(), response);
    }

    /// Answers requests for unknown paths with `response`.
    pub fn fallback(&self, response: StubResponse) {
        self.state().fallback = response;
    }

    /// Returns every request dispatched so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.state().requests.clone()
    }

    fn state(&self) -> MutexGuard<'_, StubState> {
        // a poisoned lock only means another test thread panicked mid-update
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Transport for StubTransport {
    fn dispatch(&self, request: HttpRequest, completion: Completion) {
        let reply = {
            let mut state = self.state();
            let reply = state
                .routes
                .get(request.url.path())
                .unwrap_or(&state.fallback)
                .clone();
            state.requests.push(request);
            reply
        };

        if reply.drop_completion {
            drop(completion);
            return;
        }
        completion.complete(reply.outcome());
    }
}

/// Owned copy of a [`RequestAttempt`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedAttempt {
    /// Method of the dispatched request.
    pub method: HttpMethod,
    /// Final URL of the dispatched request.
    pub url: String,
    /// Received status code.
    pub status: Option<u16>,
    /// Received body.
    pub data: Option<Bytes>,
    /// Rendered transport error.
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct Recorded {
    attempts: Vec<RecordedAttempt>,
    messages: Vec<(Level, String)>,
}

/// Logger that stores everything it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingLogger {
    recorded: Arc<Mutex<Recorded>>,
}

impl RecordingLogger {
    /// Creates an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded request attempts, oldest first.
    pub fn attempts(&self) -> Vec<RecordedAttempt> {
        self.recorded().attempts.clone()
    }

    /// Returns the recorded leveled messages, oldest first.
    pub fn messages(&self) -> Vec<(Level, String)> {
        self.recorded().messages.clone()
    }

    fn recorded(&self) -> MutexGuard<'_, Recorded> {
        self.recorded
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl RequestLogger for RecordingLogger {
    fn log_request(&self, attempt: &RequestAttempt<'_>) {
        self.recorded().attempts.push(RecordedAttempt {
            method: attempt.request.method,
            url: attempt.request.url.to_string(),
            status: attempt.status,
            data: attempt.data.cloned(),
            error: attempt.error.map(ToString::to_string),
        });
    }

    fn log(&self, level: Level, message: &str) {
        self.recorded().messages.push((level, message.to_string()));
    }
}
