//! Configuration error types.
//!
//! All configuration constructors return `Result<T, ConfigError>` so that a
//! misconfigured [`Node`](crate::Node) is rejected when it is built, not when
//! the first request goes out.
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::{AppSecret, ConfigError};
//!
//! let result = AppSecret::new("");
//! assert!(matches!(result, Err(ConfigError::EmptyAppSecret)));
//! ```

use thiserror::Error;

/// Errors that can occur while building configuration values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A base or endpoint URL could not be parsed.
    #[error("Invalid URL '{url}'. Please provide an absolute URL with scheme (e.g., 'https://api.example.com/').")]
    InvalidUrl {
        /// The invalid URL that was provided.
        url: String,
    },

    /// The OAuth2 application secret cannot be empty.
    #[error("OAuth2 app secret cannot be empty.")]
    EmptyAppSecret,

    /// A list limit of zero was configured.
    #[error("Default list limit for '{resource}' must be greater than zero.")]
    InvalidDefaultLimit {
        /// The resource the limit was configured for (`*` for the global default).
        resource: &'static str,
    },

    /// A required field is missing.
    #[error("Missing required field: '{field}'. This field must be set before building the configuration.")]
    MissingRequiredField {
        /// The name of the missing field.
        field: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_url_error_message() {
        let error = ConfigError::InvalidUrl {
            url: "not a url".to_string(),
        };
        let message = error.to_string();
        assert!(message.contains("not a url"));
        assert!(message.contains("absolute URL"));
    }

    #[test]
    fn test_missing_required_field_error_message() {
        let error = ConfigError::MissingRequiredField { field: "base_url" };
        let message = error.to_string();
        assert!(message.contains("base_url"));
        assert!(message.contains("must be set"));
    }

    #[test]
    fn test_invalid_default_limit_names_resource() {
        let error = ConfigError::InvalidDefaultLimit { resource: "Widget" };
        assert!(error.to_string().contains("Widget"));
    }

    #[test]
    fn test_error_implements_std_error() {
        let error = ConfigError::EmptyAppSecret;
        let _: &dyn std::error::Error = &error;
    }
}
