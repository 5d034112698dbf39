//! The network collaborator and the bridge that awaits it.
//!
//! A [`Transport`] is callback-driven: it receives a request together with a
//! [`Completion`] and reports the outcome through it whenever it is done. The
//! client awaits the other end of that completion. A completion resolves at
//! most once (`complete` consumes it) and at least once (dropping it resolves
//! with [`TransportError::Dropped`]), so awaiting a transport can neither
//! double-resolve nor hang on a lost callback.

mod http_client;

use bytes::Bytes;
use tokio::sync::oneshot;

use crate::error::TransportError;
use crate::request::HttpRequest;

pub use http_client::{ReqwestTransport, ReqwestTransportBuilder};

/// Status line of a received response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseHead {
    /// HTTP status code.
    pub status: u16,
}

impl ResponseHead {
    /// Creates a head with the given status.
    pub fn new(status: u16) -> Self {
        Self { status }
    }
}

/// Everything a transport reports about one request.
///
/// The three parts are independent: a transport may report a body together
/// with an error, a head without a body, or nothing at all. Validation
/// decides what each combination means.
#[derive(Debug, Default)]
pub struct TransportOutcome {
    /// Body bytes, if any were read.
    pub data: Option<Bytes>,
    /// Response head, if one was received.
    pub response: Option<ResponseHead>,
    /// Transport failure, if one occurred.
    pub error: Option<TransportError>,
}

impl TransportOutcome {
    /// A response with a head and a body.
    pub fn completed(response: ResponseHead, data: impl Into<Bytes>) -> Self {
        Self {
            data: Some(data.into()),
            response: Some(response),
            error: None,
        }
    }

    /// A failure with no response.
    pub fn failed(error: TransportError) -> Self {
        Self {
            error: Some(error),
            ..Self::default()
        }
    }

    /// Returns the status code, if a response head was received.
    pub fn status(&self) -> Option<u16> {
        self.response.as_ref().map(|head| head.status)
    }
}

/// Single-use handle a transport resolves when a request finishes.
#[derive(Debug)]
pub struct Completion {
    sender: Option<oneshot::Sender<TransportOutcome>>,
}

impl Completion {
    /// Creates a completion and the receiver that observes it.
    pub fn channel() -> (Self, oneshot::Receiver<TransportOutcome>) {
        let (sender, receiver) = oneshot::channel();
        (
            Self {
                sender: Some(sender),
            },
            receiver,
        )
    }

    /// Resolves the completion with `outcome`.
    ///
    /// If the awaiting side has gone away the outcome is discarded.
    pub fn complete(mut self, outcome: TransportOutcome) {
        self.settle(outcome);
    }

    fn settle(&mut self, outcome: TransportOutcome) {
        if let Some(sender) = self.sender.take() {
            let _ = sender.send(outcome);
        }
    }
}

impl Drop for Completion {
    fn drop(&mut self) {
        if self.sender.is_some() {
            tracing::warn!("Transport released a request without completing it");
            self.settle(TransportOutcome::failed(TransportError::Dropped));
        }
    }
}

/// The network layer that actually moves bytes.
///
/// Implementations must call [`Completion::complete`] when the request
/// finishes, from any thread. They are shared across concurrent requests.
///
/// ## Examples
///
/// ```rust,ignore
/// use netman::transport::{Completion, ResponseHead, Transport, TransportOutcome};
/// use netman::HttpRequest;
///
/// struct Teapot;
///
/// impl Transport for Teapot {
///     fn dispatch(&self, _request: HttpRequest, completion: Completion) {
///         completion.complete(TransportOutcome::completed(ResponseHead::new(418), "short and stout"));
///     }
/// }
/// ```
pub trait Transport: Send + Sync {
    /// Starts `request` and eventually resolves `completion` with its outcome.
    fn dispatch(&self, request: HttpRequest, completion: Completion);
}

/// Dispatches `request` and waits for its outcome.
pub(crate) async fn perform(transport: &dyn Transport, request: HttpRequest) -> TransportOutcome {
    let (completion, receiver) = Completion::channel();
    transport.dispatch(request, completion);
    receiver
        .await
        .unwrap_or_else(|_| TransportOutcome::failed(TransportError::Dropped))
}
