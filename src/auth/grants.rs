//! Token endpoint calls.
//!
//! All three calls POST a form body and authenticate the client with HTTP
//! Basic using the configured [`AppSecret`](crate::config::AppSecret).
//! They return raw token responses; the token manager owns the resulting
//! credentials.

use crate::auth::constants::{grant_types, keys, AUTHORIZATION_HEADER};
use crate::auth::credentials::TokenResponse;
use crate::auth::error::OAuthError;
use crate::auth::settings::OAuth2Settings;
use crate::config::BaseUrl;

/// Which endpoint a call targets; selects the error variant.
#[derive(Clone, Copy, Debug)]
enum Grant {
    Password,
    Refresh,
    Revoke,
}

impl Grant {
    fn error(self, status: u16, message: String) -> OAuthError {
        match self {
            Self::Password => OAuthError::TokenRequestFailed { status, message },
            Self::Refresh => OAuthError::TokenRefreshFailed { status, message },
            Self::Revoke => OAuthError::TokenRevokeFailed { status, message },
        }
    }
}

/// Requests a token set with the resource owner password grant.
///
/// # Errors
///
/// Returns [`OAuthError::TokenRequestFailed`] on a transport failure, a
/// non-success status or an unparseable response.
pub async fn request_password_grant(
    client: &reqwest::Client,
    settings: &OAuth2Settings,
    username: &str,
    password: &str,
) -> Result<TokenResponse, OAuthError> {
    let form = [
        (keys::USERNAME, username),
        (keys::PASSWORD, password),
        (keys::GRANT_TYPE, grant_types::PASSWORD),
        (keys::SCOPE, settings.scope()),
    ];
    let response = post_form(client, settings, settings.token_url(), &form, Grant::Password).await?;
    parse_token_response(response, Grant::Password).await
}

/// Exchanges a refresh token for a new token set.
///
/// # Errors
///
/// Returns [`OAuthError::TokenRefreshFailed`] on a transport failure, a
/// non-success status or an unparseable response.
pub async fn request_refresh_grant(
    client: &reqwest::Client,
    settings: &OAuth2Settings,
    refresh_token: &str,
) -> Result<TokenResponse, OAuthError> {
    let form = [
        (keys::REFRESH_TOKEN, refresh_token),
        (keys::GRANT_TYPE, grant_types::REFRESH_TOKEN),
    ];
    let response =
        post_form(client, settings, settings.refresh_url(), &form, Grant::Refresh).await?;
    parse_token_response(response, Grant::Refresh).await
}

/// Revokes an access token.
///
/// # Errors
///
/// Returns [`OAuthError::TokenRevokeFailed`] on a transport failure or a
/// non-success status.
pub async fn request_revocation(
    client: &reqwest::Client,
    settings: &OAuth2Settings,
    access_token: &str,
) -> Result<(), OAuthError> {
    let form = [(keys::TOKEN, access_token)];
    post_form(client, settings, settings.revoke_url(), &form, Grant::Revoke)
        .await
        .map(|_| ())
}

async fn post_form(
    client: &reqwest::Client,
    settings: &OAuth2Settings,
    url: &BaseUrl,
    form: &[(&str, &str)],
    grant: Grant,
) -> Result<reqwest::Response, OAuthError> {
    tracing::debug!(url = %url, ?grant, "posting to OAuth2 endpoint");

    let response = client
        .post(url.as_ref())
        .header(AUTHORIZATION_HEADER, settings.app_secret().basic_header_value())
        .form(form)
        .send()
        .await
        .map_err(|e| grant.error(0, format!("Network error: {e}")))?;

    let status = response.status().as_u16();

    if !response.status().is_success() {
        let error_body = response.text().await.unwrap_or_default();
        return Err(grant.error(status, error_body));
    }

    Ok(response)
}

async fn parse_token_response(
    response: reqwest::Response,
    grant: Grant,
) -> Result<TokenResponse, OAuthError> {
    let status = response.status().as_u16();
    response
        .json()
        .await
        .map_err(|e| grant.error(status, format!("Failed to parse token response: {e}")))
}
