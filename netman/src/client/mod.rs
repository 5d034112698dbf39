//! The request-execution façade.

mod executor;

pub use executor::{ApiClient, ApiClientBuilder};
