//! OAuth2 endpoint configuration.

use crate::auth::constants::DEFAULT_SCOPE;
use crate::config::{AppSecret, BaseUrl};
use crate::error::ConfigError;

/// Endpoints and client authentication for the OAuth2 token manager.
///
/// Use [`OAuth2Settings::builder`] to construct.
///
/// # Example
///
/// ```rust
/// use drf_consumer::auth::OAuth2Settings;
/// use drf_consumer::config::{AppSecret, BaseUrl};
///
/// let settings = OAuth2Settings::builder()
///     .app_secret(AppSecret::from_client_credentials("client", "secret").unwrap())
///     .token_url(BaseUrl::new("https://api.example.com/o/token/").unwrap())
///     .revoke_url(BaseUrl::new("https://api.example.com/o/revoke_token/").unwrap())
///     .build()
///     .unwrap();
///
/// assert_eq!(settings.scope(), "read write");
/// assert_eq!(settings.refresh_url().as_ref(), "https://api.example.com/o/token/");
/// ```
#[derive(Clone, Debug)]
pub struct OAuth2Settings {
    app_secret: AppSecret,
    token_url: BaseUrl,
    refresh_url: BaseUrl,
    revoke_url: BaseUrl,
    scope: String,
}

impl OAuth2Settings {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> OAuth2SettingsBuilder {
        OAuth2SettingsBuilder::new()
    }

    /// Client credentials sent as HTTP Basic authentication.
    #[must_use]
    pub const fn app_secret(&self) -> &AppSecret {
        &self.app_secret
    }

    /// Endpoint of the password grant.
    #[must_use]
    pub const fn token_url(&self) -> &BaseUrl {
        &self.token_url
    }

    /// Endpoint of the refresh grant.
    #[must_use]
    pub const fn refresh_url(&self) -> &BaseUrl {
        &self.refresh_url
    }

    /// Endpoint of token revocation.
    #[must_use]
    pub const fn revoke_url(&self) -> &BaseUrl {
        &self.revoke_url
    }

    /// Scope requested by the password grant.
    #[must_use]
    pub fn scope(&self) -> &str {
        &self.scope
    }
}

/// Builder for [`OAuth2Settings`].
#[derive(Debug, Default)]
pub struct OAuth2SettingsBuilder {
    app_secret: Option<AppSecret>,
    token_url: Option<BaseUrl>,
    refresh_url: Option<BaseUrl>,
    revoke_url: Option<BaseUrl>,
    scope: Option<String>,
}

impl OAuth2SettingsBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the client credentials (required).
    #[must_use]
    pub fn app_secret(mut self, app_secret: AppSecret) -> Self {
        self.app_secret = Some(app_secret);
        self
    }

    /// Sets the password grant endpoint (required).
    #[must_use]
    pub fn token_url(mut self, url: BaseUrl) -> Self {
        self.token_url = Some(url);
        self
    }

    /// Sets the refresh grant endpoint. Defaults to the token URL.
    #[must_use]
    pub fn refresh_url(mut self, url: BaseUrl) -> Self {
        self.refresh_url = Some(url);
        self
    }

    /// Sets the revocation endpoint (required).
    #[must_use]
    pub fn revoke_url(mut self, url: BaseUrl) -> Self {
        self.revoke_url = Some(url);
        self
    }

    /// Sets the requested scope. Defaults to `read write`.
    #[must_use]
    pub fn scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Builds the settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if the app secret, the
    /// token URL or the revoke URL is missing.
    pub fn build(self) -> Result<OAuth2Settings, ConfigError> {
        let app_secret = self
            .app_secret
            .ok_or(ConfigError::MissingRequiredField { field: "app_secret" })?;
        let token_url = self
            .token_url
            .ok_or(ConfigError::MissingRequiredField { field: "token_url" })?;
        let revoke_url = self
            .revoke_url
            .ok_or(ConfigError::MissingRequiredField { field: "revoke_url" })?;

        Ok(OAuth2Settings {
            app_secret,
            refresh_url: self.refresh_url.unwrap_or_else(|| token_url.clone()),
            token_url,
            revoke_url,
            scope: self.scope.unwrap_or_else(|| DEFAULT_SCOPE.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(value: &str) -> BaseUrl {
        BaseUrl::new(value).unwrap()
    }

    #[test]
    fn test_build_with_all_fields() {
        let settings = OAuth2Settings::builder()
            .app_secret(AppSecret::new("c2VjcmV0").unwrap())
            .token_url(url("https://api.example.com/o/token/"))
            .refresh_url(url("https://api.example.com/o/refresh/"))
            .revoke_url(url("https://api.example.com/o/revoke_token/"))
            .scope("read")
            .build()
            .unwrap();

        assert_eq!(settings.refresh_url().as_ref(), "https://api.example.com/o/refresh/");
        assert_eq!(settings.scope(), "read");
        assert_eq!(settings.app_secret().as_ref(), "c2VjcmV0");
    }

    #[test]
    fn test_missing_app_secret_fails() {
        let result = OAuth2Settings::builder()
            .token_url(url("https://api.example.com/o/token/"))
            .revoke_url(url("https://api.example.com/o/revoke_token/"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingRequiredField { field: "app_secret" }
        );
    }

    #[test]
    fn test_missing_revoke_url_fails() {
        let result = OAuth2Settings::builder()
            .app_secret(AppSecret::new("c2VjcmV0").unwrap())
            .token_url(url("https://api.example.com/o/token/"))
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingRequiredField { field: "revoke_url" }
        );
    }

    #[test]
    fn test_debug_masks_app_secret() {
        let settings = OAuth2Settings::builder()
            .app_secret(AppSecret::new("c2VjcmV0").unwrap())
            .token_url(url("https://api.example.com/o/token/"))
            .revoke_url(url("https://api.example.com/o/revoke_token/"))
            .build()
            .unwrap();
        assert!(!format!("{settings:?}").contains("c2VjcmV0"));
    }
}
