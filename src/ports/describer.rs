//! Description generator port.

use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::config::ProviderConfig;

/// Boxed future returned by [`DescriptionGenerator::describe`], keeping the trait dyn-compatible.
pub type DescribeFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ProviderError>> + Send + 'a>>;

/// The link a description is wanted for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescribeRequest {
    /// Link title.
    pub title: String,
    /// Link URL.
    pub url: String,
}

/// Failure of a single generation call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The request never got a response (DNS, TLS, connection reset).
    #[error("request to {provider} failed: {message}")]
    Transport {
        /// Provider name.
        provider: String,
        /// Underlying error text.
        message: String,
    },
    /// The provider answered with a non-success status (auth, quota, bad model).
    #[error("{provider} returned HTTP {status}: {message}")]
    Status {
        /// Provider name.
        provider: String,
        /// HTTP status code.
        status: u16,
        /// Error message extracted from the body.
        message: String,
    },
    /// The response body did not have the expected shape.
    #[error("could not parse {provider} response: {message}")]
    Malformed {
        /// Provider name.
        provider: String,
        /// Parse error text.
        message: String,
    },
    /// The provider answered but produced no text.
    #[error("{provider} returned an empty description")]
    Empty {
        /// Provider name.
        provider: String,
    },
    /// Anything else, including errors replayed from a cassette.
    #[error("{0}")]
    Other(String),
}

/// Generates short descriptions for links.
pub trait DescriptionGenerator: Send + Sync {
    /// Produces a description for `request` using `config`.
    ///
    /// # Errors
    ///
    /// Returns a [`ProviderError`] on network, auth, quota or parse failures.
    fn describe(&self, request: &DescribeRequest, config: &ProviderConfig) -> DescribeFuture<'_>;
}
