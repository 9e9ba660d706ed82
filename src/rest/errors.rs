//! Resource-level error types.
//!
//! [`ResourceError`] is returned by every [`Node`](crate::Node) operation.
//! It separates errors a caller can act on (missing id, not found,
//! validation) from response decoding failures and transport errors.
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::rest::ResourceError;
//!
//! match node.get_detail(&id).await {
//!     Ok(widget) => println!("{}", widget.name),
//!     Err(ResourceError::NotFound { resource, id }) => println!("{resource} {id} is gone"),
//!     Err(ResourceError::ValidationFailed { errors, .. }) => println!("{errors:?}"),
//!     Err(ResourceError::Decode { path, message }) => println!("bad field {path}: {message}"),
//!     Err(e) => println!("request failed: {e}"),
//! }
//! ```

use std::collections::HashMap;

use crate::clients::HttpError;
use crate::payload::PayloadError;
use thiserror::Error;

/// Errors that can occur during resource operations.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// A detail URL was requested for an object without an id.
    #[error("{resource} has no id, cannot build its detail URL")]
    MissingId {
        /// The resource type name.
        resource: &'static str,
    },

    /// A list response has no `meta` object.
    #[error("List response has no 'meta' object")]
    MissingMeta,

    /// A list response has no `results` array.
    #[error("List response has no 'results' array")]
    MissingResults,

    /// A field of the response could not be decoded.
    #[error("Failed to decode response at '{path}': {message}")]
    Decode {
        /// JSON path of the offending value, e.g. `results[1].date`.
        path: String,
        /// The decoder's message.
        message: String,
    },

    /// The server answered `404 Not Found`.
    #[error("{resource} with id {id} not found")]
    NotFound {
        /// The resource type name.
        resource: &'static str,
        /// The requested id, `unknown` for list endpoints.
        id: String,
    },

    /// The server answered `400 Bad Request` with field errors.
    #[error("Validation failed: {errors:?}")]
    ValidationFailed {
        /// Messages keyed by field (`non_field_errors` for object-wide errors).
        errors: HashMap<String, Vec<String>>,
        /// The request id for support, if present.
        request_id: Option<String>,
    },

    /// A request payload could not be built.
    #[error(transparent)]
    Payload(#[from] PayloadError),

    /// Any other HTTP failure.
    #[error(transparent)]
    Http(#[from] HttpError),
}

impl ResourceError {
    /// Classifies an HTTP error for `resource`.
    ///
    /// `404` becomes [`ResourceError::NotFound`] and `400`
    /// [`ResourceError::ValidationFailed`]; everything else is kept as
    /// [`ResourceError::Http`].
    #[must_use]
    pub fn from_http_error(error: HttpError, resource: &'static str, id: Option<&str>) -> Self {
        let HttpError::Response(response) = error else {
            return Self::Http(error);
        };

        match response.code {
            404 => Self::NotFound {
                resource,
                id: id.unwrap_or("unknown").to_string(),
            },
            400 => Self::ValidationFailed {
                errors: parse_validation_errors(&response.body),
                request_id: response.error_reference,
            },
            _ => Self::Http(HttpError::Response(response)),
        }
    }

    /// Returns the request id of the failed response, if known.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        match self {
            Self::ValidationFailed { request_id, .. } => request_id.as_deref(),
            Self::Http(HttpError::Response(e)) => e.error_reference.as_deref(),
            Self::Http(HttpError::MaxRetries(e)) => e.error_reference.as_deref(),
            _ => None,
        }
    }
}

const NON_FIELD_ERRORS: &str = "non_field_errors";

fn messages_of(value: &serde_json::Value) -> Vec<String> {
    match value {
        serde_json::Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .map_or_else(|| item.to_string(), ToString::to_string)
            })
            .collect(),
        serde_json::Value::String(s) => vec![s.clone()],
        other => vec![other.to_string()],
    }
}

fn parse_validation_errors(body: &serde_json::Value) -> HashMap<String, Vec<String>> {
    match body {
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(field, messages)| (field.clone(), messages_of(messages)))
            .collect(),
        serde_json::Value::Array(_) | serde_json::Value::String(_) => {
            HashMap::from([(NON_FIELD_ERRORS.to_string(), messages_of(body))])
        }
        _ => HashMap::new(),
    }
}

// Verify ResourceError is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceError>();
};
