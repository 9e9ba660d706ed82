//! OAuth2 wire constants.

/// Form field names sent to the token endpoints.
pub mod keys {
    /// `refresh_token`
    pub const REFRESH_TOKEN: &str = "refresh_token";
    /// `grant_type`
    pub const GRANT_TYPE: &str = "grant_type";
    /// `scope`
    pub const SCOPE: &str = "scope";
    /// `username`
    pub const USERNAME: &str = "username";
    /// `password`
    pub const PASSWORD: &str = "password";
    /// `token`
    pub const TOKEN: &str = "token";
}

/// Grant type values.
pub mod grant_types {
    /// Resource owner password credentials grant.
    pub const PASSWORD: &str = "password";
    /// Refresh token grant.
    pub const REFRESH_TOKEN: &str = "refresh_token";
}

/// Scope requested by default.
pub const DEFAULT_SCOPE: &str = "read write";

/// Token type assumed when the server does not send one.
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// `Authorization` header name.
pub const AUTHORIZATION_HEADER: &str = "Authorization";

/// Returns the `Authorization` value for a bearer token.
#[must_use]
pub fn bearer(access_token: &str) -> String {
    format!("Bearer {access_token}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_header_value() {
        assert_eq!(bearer("abc"), "Bearer abc");
    }

    #[test]
    fn test_default_scope() {
        assert_eq!(DEFAULT_SCOPE, "read write");
    }
}
