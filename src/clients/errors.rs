//! HTTP-specific error types.
//!
//! This module contains error types for HTTP operations, including response
//! errors, retry exhaustion, and request validation failures.
//!
//! # Error Handling
//!
//! - [`HttpResponseError`]: a response whose status code is not acceptable
//! - [`MaxHttpRetriesExceededError`]: transient retries are exhausted
//! - [`InvalidHttpRequestError`]: a request fails validation before sending
//! - [`HttpError`]: unified error type encompassing all of the above, plus
//!   transport failures and terminal authentication failures
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::clients::HttpError;
//!
//! match client.request(request).await {
//!     Ok(response) => println!("Success: {}", response.body),
//!     Err(HttpError::Response(e)) => println!("API error {}: {}", e.code, e.message),
//!     Err(HttpError::Auth(e)) => println!("Authentication failed: {e}"),
//!     Err(e) => println!("Request failed: {e}"),
//! }
//! ```

use crate::auth::AuthError;
use thiserror::Error;

/// Error returned when a response carries a status code the request does
/// not accept.
///
/// # Example
///
/// ```rust
/// use drf_consumer::clients::HttpResponseError;
/// use serde_json::json;
///
/// let error = HttpResponseError {
///     code: 404,
///     message: r#"{"detail":"Not found."}"#.to_string(),
///     body: json!({"detail": "Not found."}),
///     error_reference: None,
/// };
/// assert_eq!(error.to_string(), r#"{"detail":"Not found."}"#);
/// ```
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HttpResponseError {
    /// The HTTP status code of the response.
    pub code: u16,
    /// Serialized error message in JSON format.
    pub message: String,
    /// The parsed response body.
    pub body: serde_json::Value,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when maximum retry attempts have been exhausted.
///
/// Raised when a request keeps failing with 429 or 500 responses after all
/// configured tries.
#[derive(Debug, Error)]
#[error("Exceeded maximum retry count of {tries}. Last message: {message}")]
pub struct MaxHttpRetriesExceededError {
    /// The HTTP status code of the last response.
    pub code: u16,
    /// The number of tries that were attempted.
    pub tries: u32,
    /// Serialized error message from the last response.
    pub message: String,
    /// Reference ID for error reporting (from the X-Request-Id header).
    pub error_reference: Option<String>,
}

/// Error returned when an HTTP request fails validation.
///
/// # Example
///
/// ```rust
/// use drf_consumer::clients::InvalidHttpRequestError;
///
/// let error = InvalidHttpRequestError::MultipartNotAllowed {
///     method: "get".to_string(),
/// };
/// assert_eq!(error.to_string(), "Cannot send a multipart payload with get.");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidHttpRequestError {
    /// The request URL is not absolute.
    #[error("Request URL '{url}' is not absolute.")]
    RelativeUrl {
        /// The offending URL.
        url: String,
    },

    /// The number of tries must be at least one.
    #[error("Number of tries must be at least 1.")]
    InvalidTries,

    /// Attachments can only be sent in a request body.
    #[error("Cannot send a multipart payload with {method}.")]
    MultipartNotAllowed {
        /// The HTTP method of the request.
        method: String,
    },

    /// A multipart part declared an unparseable content type.
    #[error("Invalid content type '{mime_type}' for part '{key}'.")]
    InvalidMimeType {
        /// Key of the multipart part.
        key: String,
        /// The content type that failed to parse.
        mime_type: String,
    },
}

/// Unified error type for all HTTP-related errors.
///
/// Authentication failures raised by the OAuth2 middleware are delivered
/// through [`HttpError::Auth`] to the request they affect.
#[derive(Debug, Error)]
pub enum HttpError {
    /// A response with a status code the request does not accept.
    #[error(transparent)]
    Response(#[from] HttpResponseError),

    /// Maximum retry attempts exhausted.
    #[error(transparent)]
    MaxRetries(#[from] MaxHttpRetriesExceededError),

    /// Request validation failed.
    #[error(transparent)]
    InvalidRequest(#[from] InvalidHttpRequestError),

    /// The response content type is not one the request accepts.
    #[error("Response content type '{content_type}' is not acceptable (expected one of {acceptable:?})")]
    UnacceptableContentType {
        /// The content type of the response, empty if missing.
        content_type: String,
        /// The content types the request accepts.
        acceptable: Vec<String>,
    },

    /// Network or connection error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Terminal authentication failure for this request.
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl HttpError {
    /// Returns the HTTP status code carried by this error, if any.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Response(e) => Some(e.code),
            Self::MaxRetries(e) => Some(e.code),
            _ => None,
        }
    }
}
