//! The logging collaborator.
//!
//! The client reports every dispatched request to a [`RequestLogger`] and
//! uses it for leveled diagnostics such as decode failures. The logger is
//! injected per client rather than read from global state.

use bytes::Bytes;
use tracing::Level;

use crate::error::TransportError;
use crate::request::HttpRequest;

/// Maximum number of body characters included in attempt logs.
const BODY_SNIPPET_LIMIT: usize = 512;

/// One finished request as seen by the client, before validation.
#[derive(Debug, Clone, Copy)]
pub struct RequestAttempt<'a> {
    /// The request that was dispatched.
    pub request: &'a HttpRequest,
    /// Body bytes, if any were received.
    pub data: Option<&'a Bytes>,
    /// Status code, if a response head was received.
    pub status: Option<u16>,
    /// Transport failure, if any.
    pub error: Option<&'a TransportError>,
}

/// Sink for request attempts and leveled messages.
///
/// Implementations are shared by every request a client makes and may be
/// called from several tasks at once.
pub trait RequestLogger: Send + Sync {
    /// Records a completed request attempt.
    fn log_request(&self, attempt: &RequestAttempt<'_>);

    /// Records a free-form message at `level`.
    fn log(&self, level: Level, message: &str);
}

/// Logger that forwards to `tracing`.
///
/// Attempts are emitted as DEBUG events, or WARN when the transport failed.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl RequestLogger for TracingLogger {
    fn log_request(&self, attempt: &RequestAttempt<'_>) {
        let request = attempt.request;
        let body = attempt.data.map(|data| snippet(data, BODY_SNIPPET_LIMIT));

        match attempt.error {
            Some(error) => tracing::warn!(
                http.method = %request.method,
                http.url = %request.url,
                http.status_code = attempt.status,
                error = %error,
                "Request failed"
            ),
            None => tracing::debug!(
                http.method = %request.method,
                http.url = %request.url,
                http.status_code = attempt.status,
                http.response_size = attempt.data.map(Bytes::len),
                body = body.as_deref(),
                "Request completed"
            ),
        }
    }

    fn log(&self, level: Level, message: &str) {
        match level {
            Level::ERROR => tracing::error!("{message}"),
            Level::WARN => tracing::warn!("{message}"),
            Level::INFO => tracing::info!("{message}"),
            Level::DEBUG => tracing::debug!("{message}"),
            Level::TRACE => tracing::trace!("{message}"),
        }
    }
}

/// Logger that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLogger;

impl RequestLogger for NoLogger {
    fn log_request(&self, _attempt: &RequestAttempt<'_>) {}

    fn log(&self, _level: Level, _message: &str) {}
}

/// Lossy UTF-8 rendering of at most `limit` characters of `data`.
fn snippet(data: &[u8], limit: usize) -> String {
    let text = String::from_utf8_lossy(data);
    if text.chars().count() <= limit {
        return text.into_owned();
    }
    let mut out: String = text.chars().take(limit).collect();
    out.push('…');
    out
}
