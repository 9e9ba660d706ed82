//! OAuth2 error types.
//!
//! - [`OAuthError`]: failures of the explicit token endpoint calls
//!   (password grant, refresh grant, revocation)
//! - [`AuthError`]: terminal authentication failures delivered to the
//!   request they affect
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::auth::{AuthError, OAuthError};
//!
//! let error = OAuthError::TokenRequestFailed {
//!     status: 400,
//!     message: r#"{"error":"invalid_grant"}"#.to_string(),
//! };
//! assert!(error.to_string().contains("invalid_grant"));
//!
//! let error = AuthError::TokenRejected;
//! assert!(error.to_string().contains("rejected"));
//! ```

use thiserror::Error;

/// Errors returned by the token endpoints.
#[derive(Debug, Error)]
pub enum OAuthError {
    /// The password grant was refused or could not be completed.
    #[error("Token request failed with status {status}: {message}")]
    TokenRequestFailed {
        /// The HTTP status code returned, `0` for transport failures.
        status: u16,
        /// The error body or transport error message.
        message: String,
    },

    /// The refresh grant was refused or could not be completed.
    #[error("Token refresh failed with status {status}: {message}")]
    TokenRefreshFailed {
        /// The HTTP status code returned, `0` for transport failures.
        status: u16,
        /// The error body or transport error message.
        message: String,
    },

    /// The revocation request was refused or could not be completed.
    ///
    /// Local credentials are cleared regardless.
    #[error("Token revocation failed with status {status}: {message}")]
    TokenRevokeFailed {
        /// The HTTP status code returned, `0` for transport failures.
        status: u16,
        /// The error body or transport error message.
        message: String,
    },
}

/// Authentication failure surfaced to an individual request.
///
/// Cloned once per queued request when a refresh cycle completes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The refresh grant failed; credentials were cleared.
    #[error("Access token refresh failed: {message}")]
    RefreshFailed {
        /// Description of the refresh failure.
        message: String,
    },

    /// The refresh cycle ended without resolving this request.
    #[error("Access token refresh was aborted")]
    RefreshAborted,

    /// The server rejected a freshly refreshed access token.
    #[error("Access token was rejected after refresh")]
    TokenRejected,

    /// Credentials were removed while the request was waiting.
    #[error("No OAuth2 credentials are available")]
    MissingCredentials,
}

// Verify error types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuthError>();
    assert_send_sync::<AuthError>();
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_request_failed_includes_status_and_message() {
        let error = OAuthError::TokenRequestFailed {
            status: 401,
            message: "Invalid client credentials".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("401"));
        assert!(message.contains("Invalid client credentials"));
    }

    #[test]
    fn test_refresh_failed_includes_cause() {
        let error = AuthError::RefreshFailed {
            message: "invalid_grant".to_string(),
        };
        assert!(error.to_string().contains("invalid_grant"));
    }

    #[test]
    fn test_auth_error_is_cloneable() {
        let error = AuthError::RefreshAborted;
        assert_eq!(error.clone(), AuthError::RefreshAborted);
    }

    #[test]
    fn test_errors_implement_std_error() {
        let _: &dyn std::error::Error = &OAuthError::TokenRevokeFailed {
            status: 0,
            message: "offline".to_string(),
        };
        let _: &dyn std::error::Error = &AuthError::MissingCredentials;
    }
}
