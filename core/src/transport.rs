//! Request/response transport used by screens to talk to the backend.

use std::future::Future;
use thiserror::Error;

/// Errors raised while posting to the backend.
///
/// The screens do not distinguish between kinds when recovering; the
/// variants exist for logging.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The request never produced a response (connection refused, DNS, timeout).
    #[error("Request to {endpoint} failed: {reason}")]
    Network {
        /// Endpoint that was posted to
        endpoint: String,
        /// Underlying failure
        reason: String,
    },

    /// The server answered with a non-success status.
    #[error("Request to {endpoint} returned status {status}: {body}")]
    Status {
        /// Endpoint that was posted to
        endpoint: String,
        /// HTTP status code
        status: u16,
        /// Response body, usually the server's error text
        body: String,
    },

    /// The form body could not be encoded.
    #[error("Failed to encode form body: {0}")]
    Encoding(String),
}

/// Ordered `application/x-www-form-urlencoded` field list.
///
/// Field order is preserved so the body matches document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormBody {
    fields: Vec<(String, String)>,
}

impl FormBody {
    /// Create an empty body
    #[must_use]
    pub const fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Append a field, builder style
    #[must_use]
    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name, value);
        self
    }

    /// Append a field
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.push((name.into(), value.into()));
    }

    /// Value of the first field called `name`
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// All fields in insertion order
    #[must_use]
    pub fn fields(&self) -> &[(String, String)] {
        &self.fields
    }

    /// Url-encode the body
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Encoding`] if serialization fails.
    pub fn encode(&self) -> Result<String, TransportError> {
        serde_urlencoded::to_string(&self.fields)
            .map_err(|e| TransportError::Encoding(e.to_string()))
    }
}

/// Asynchronous request/response transport.
///
/// Implementations post a form body to a named endpoint and return the raw
/// response text.
pub trait Transport: Send + Sync {
    /// Post `body` to `endpoint`.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] on network failure or a non-success response.
    fn post(
        &self,
        endpoint: &str,
        body: FormBody,
    ) -> impl Future<Output = Result<String, TransportError>> + Send;
}
