//! OAuth2 authentication.
//!
//! This module implements the OAuth2 password flow against a Django OAuth
//! Toolkit style backend and keeps the resulting token set fresh.
//!
//! # Overview
//!
//! - [`OAuth2Settings`]: token, refresh and revoke endpoints plus client credentials
//! - [`OAuth2Credentials`]: the current token set
//! - [`CredentialStore`]: injected persistence for credentials
//! - [`OAuth2TokenManager`]: bearer injection and single-flight refresh,
//!   registered on the HTTP client as a middleware
//!
//! # State machine
//!
//! ```text
//! unauthenticated --authenticate--> authenticated
//! authenticated   --401-->          refreshing
//! refreshing      --ok-->           authenticated (queued requests retried)
//! refreshing      --err-->          unauthenticated (queued requests failed)
//! authenticated   --revoke-->       unauthenticated
//! ```
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::auth::{AuthState, InMemoryCredentialStore, OAuth2Settings, OAuth2TokenManager};
//! use drf_consumer::config::{AppSecret, BaseUrl};
//! use std::sync::Arc;
//!
//! let settings = OAuth2Settings::builder()
//!     .app_secret(AppSecret::from_client_credentials("client", "secret").unwrap())
//!     .token_url(BaseUrl::new("https://api.example.com/o/token/").unwrap())
//!     .revoke_url(BaseUrl::new("https://api.example.com/o/revoke_token/").unwrap())
//!     .build()
//!     .unwrap();
//!
//! let manager = OAuth2TokenManager::new(settings, Arc::new(InMemoryCredentialStore::new()));
//! assert_eq!(manager.state(), AuthState::Unauthenticated);
//! ```

pub mod constants;
mod credentials;
mod error;
pub mod grants;
mod settings;
mod token_manager;

pub use credentials::{CredentialStore, InMemoryCredentialStore, OAuth2Credentials, TokenResponse};
pub use error::{AuthError, OAuthError};
pub use settings::{OAuth2Settings, OAuth2SettingsBuilder};
pub use token_manager::{AuthState, OAuth2TokenManager};
