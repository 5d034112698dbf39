//! Declarative HTTP endpoint client.
//!
//! The `netman` crate turns passive [`Endpoint`] descriptions into HTTP calls
//! and hands the result back in one of three shapes: raw bytes, a decoded
//! value, or a value mapped into an application type.
//!
//! ## Pipeline
//!
//! Every call runs the same stages, and the first failing stage ends it:
//!
//! 1. **Request construction**: [`build_request`] merges the endpoint with the
//!    client [`Configuration`] (host, headers, query, body).
//! 2. **Transport**: a [`Transport`](transport::Transport) moves the bytes and
//!    reports back through a single-use completion.
//! 3. **Validation**: statuses outside `200..400` are rejected before decoding.
//! 4. **Decoding**: a [`ResponseDecoder`](response::ResponseDecoder) (JSON by
//!    default) produces the wire model.
//! 5. **Mapping**: an optional [`Mappable`] produces the application type.
//!
//! Failures from every stage are reported as [`ApiError`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use netman::{ApiClient, Configuration, Endpoint, HttpMethod};
//!
//! #[derive(serde::Deserialize)]
//! struct Movie { id: u64, title: String }
//!
//! let configuration = Configuration::builder()
//!     .base_url("https://api.example.com")?
//!     .header("accept", "application/json")
//!     .build();
//! let client = ApiClient::new(configuration)?;
//!
//! let endpoint = Endpoint::builder()
//!     .method(HttpMethod::Get)
//!     .path("/search/movie")
//!     .query("query", "fight club")
//!     .build();
//! let movies: Vec<Movie> = client.request(&endpoint).await?;
//! ```

pub mod body;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod logger;
pub mod mapper;
pub mod method;
pub mod mock;
pub mod request;
pub mod response;
pub mod transport;

// Re-exports for convenience
pub use body::{JsonEncoder, JsonOptions, RequestBody, YamlEncoder};
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{Configuration, ConfigurationBuilder};
pub use endpoint::{Endpoint, EndpointBuilder};
pub use error::{ApiError, BadResponse, DecodeError, EndpointError, TransportError};
pub use logger::{NoLogger, RequestAttempt, RequestLogger, TracingLogger};
pub use mapper::{map_fn, FnMapper, Mappable};
pub use method::HttpMethod;
pub use request::{build_request, HttpRequest};
pub use response::ApiResponse;
