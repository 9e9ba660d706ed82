//! OAuth2 credentials and their persistence.

use crate::auth::constants::DEFAULT_TOKEN_TYPE;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Mutex, PoisonError};

/// The current OAuth2 token set.
///
/// Tokens are masked in `Debug` output.
///
/// # Example
///
/// ```rust
/// use drf_consumer::auth::OAuth2Credentials;
///
/// let credentials = OAuth2Credentials::new("access", Some("refresh".to_string()));
/// assert!(!credentials.expired());
/// assert!(!format!("{credentials:?}").contains("access"));
/// ```
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuth2Credentials {
    /// Token sent as `Authorization: Bearer <access_token>`.
    pub access_token: String,
    /// Token used to obtain a new access token.
    pub refresh_token: Option<String>,
    /// Token type reported by the server (usually `Bearer`).
    pub token_type: String,
    /// Granted scope.
    pub scope: Option<String>,
    /// When the access token expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuth2Credentials {
    /// Creates bearer credentials without expiry or scope.
    #[must_use]
    pub fn new(access_token: impl Into<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token,
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            scope: None,
            expires_at: None,
        }
    }

    /// Builds credentials from a token endpoint response received at `now`.
    ///
    /// A response without a refresh token keeps `previous_refresh_token`.
    #[must_use]
    pub fn from_token_response(
        response: TokenResponse,
        now: DateTime<Utc>,
        previous_refresh_token: Option<String>,
    ) -> Self {
        let expires_at = response
            .expires_in
            .and_then(Duration::try_seconds)
            .and_then(|lifetime| now.checked_add_signed(lifetime));

        Self {
            access_token: response.access_token,
            refresh_token: response.refresh_token.or(previous_refresh_token),
            token_type: response
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            scope: response.scope,
            expires_at,
        }
    }

    /// Returns `true` if the access token has expired.
    ///
    /// Credentials without an expiry are considered never expired.
    #[must_use]
    pub fn expired(&self) -> bool {
        self.expires_at.is_some_and(|expires| Utc::now() > expires)
    }
}

impl fmt::Debug for OAuth2Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Credentials")
            .field("access_token", &"*****")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "*****"))
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// A token endpoint response.
#[derive(Clone, Deserialize)]
pub struct TokenResponse {
    /// The issued access token.
    pub access_token: String,
    /// The issued refresh token, if any.
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds.
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Token type.
    #[serde(default)]
    pub token_type: Option<String>,
    /// Granted scope.
    #[serde(default)]
    pub scope: Option<String>,
}

impl fmt::Debug for TokenResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenResponse")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .finish_non_exhaustive()
    }
}

/// Persistence for the current credentials.
///
/// The token manager calls the store from inside its critical section, so
/// implementations should not block for long.
pub trait CredentialStore: Send + Sync + fmt::Debug {
    /// Returns the persisted credentials, if any.
    fn load(&self) -> Option<OAuth2Credentials>;

    /// Persists new credentials, replacing previous ones.
    fn store(&self, credentials: &OAuth2Credentials);

    /// Removes persisted credentials.
    fn clear(&self);
}

/// A [`CredentialStore`] that keeps credentials in memory.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    credentials: Mutex<Option<OAuth2Credentials>>,
}

impl InMemoryCredentialStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `credentials`.
    #[must_use]
    pub fn with_credentials(credentials: OAuth2Credentials) -> Self {
        Self {
            credentials: Mutex::new(Some(credentials)),
        }
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn load(&self) -> Option<OAuth2Credentials> {
        self.credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn store(&self, credentials: &OAuth2Credentials) {
        *self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = Some(credentials.clone());
    }

    fn clear(&self) {
        *self
            .credentials
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = None;
    }
}

// Verify credential types are Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<OAuth2Credentials>();
    assert_send_sync::<InMemoryCredentialStore>();
};

#[cfg(test)]
mod tests {
    use super::*;

    fn token_response(json: &str) -> TokenResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_from_token_response_computes_expiry() {
        let now = Utc::now();
        let credentials = OAuth2Credentials::from_token_response(
            token_response(
                r#"{"access_token":"a","refresh_token":"r","expires_in":3600,"token_type":"Bearer","scope":"read write"}"#,
            ),
            now,
            None,
        );

        assert_eq!(credentials.access_token, "a");
        assert_eq!(credentials.refresh_token.as_deref(), Some("r"));
        assert_eq!(credentials.scope.as_deref(), Some("read write"));
        assert_eq!(credentials.expires_at, Some(now + Duration::seconds(3600)));
        assert!(!credentials.expired());
    }

    #[test]
    fn test_from_token_response_keeps_previous_refresh_token() {
        let credentials = OAuth2Credentials::from_token_response(
            token_response(r#"{"access_token":"a"}"#),
            Utc::now(),
            Some("old-refresh".to_string()),
        );
        assert_eq!(credentials.refresh_token.as_deref(), Some("old-refresh"));
        assert_eq!(credentials.token_type, "Bearer");
        assert!(credentials.expires_at.is_none());
    }

    #[test]
    fn test_expired_credentials() {
        let mut credentials = OAuth2Credentials::new("a", None);
        assert!(!credentials.expired());

        credentials.expires_at = Some(Utc::now() - Duration::seconds(1));
        assert!(credentials.expired());
    }

    #[test]
    fn test_debug_masks_tokens() {
        let credentials = OAuth2Credentials::new("secret-access", Some("secret-refresh".into()));
        let debug = format!("{credentials:?}");
        assert!(!debug.contains("secret-access"));
        assert!(!debug.contains("secret-refresh"));
        assert!(debug.contains("*****"));

        let response = token_response(r#"{"access_token":"secret-access"}"#);
        assert!(!format!("{response:?}").contains("secret-access"));
    }

    #[test]
    fn test_in_memory_store_round_trip() {
        let store = InMemoryCredentialStore::new();
        assert!(store.load().is_none());

        let credentials = OAuth2Credentials::new("a", Some("r".into()));
        store.store(&credentials);
        assert_eq!(store.load(), Some(credentials));

        store.clear();
        assert!(store.load().is_none());
    }

    #[test]
    fn test_credentials_serde_round_trip() {
        let credentials = OAuth2Credentials::new("a", Some("r".into()));
        let json = serde_json::to_string(&credentials).unwrap();
        let restored: OAuth2Credentials = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, credentials);
    }
}
