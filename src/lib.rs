//! # DRF Consumer
//!
//! A client library for REST backends built on Django REST Framework
//! conventions: paginated list endpoints, detail endpoints, nested and
//! multipart payloads, and OAuth2 password/refresh-token authentication.
//!
//! ## Overview
//!
//! This library provides:
//! - Declarative routing from resource types to URLs via [`RouteTable`]
//! - Strict decoding of list and detail responses with pluggable pagination
//! - Automatic choice between flat parameters and multipart encoding
//!   based on payload shape
//! - OAuth2 bearer authentication with single-flight token refresh
//! - An async HTTP dispatcher with a middleware chain and retry logic
//!
//! ## Quick Start
//!
//! ```rust
//! use drf_consumer::{BaseUrl, Node, NodeConfig, Route, RouteTable};
//!
//! struct Widget;
//!
//! let config = NodeConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1/").unwrap())
//!     .user_agent_prefix("MyApp/1.0")
//!     .build()
//!     .unwrap();
//!
//! let routes = RouteTable::new()
//!     .with_route(Route::list_get::<Widget>("widgets/"))
//!     .with_route(Route::detail_get::<Widget>("widgets/"));
//!
//! let node = Node::new(config, routes);
//! assert!(node.routes().validate().is_ok());
//! ```
//!
//! ## Resources
//!
//! Resource types opt into operations through capability traits:
//!
//! ```rust,ignore
//! use drf_consumer::rest::{DefaultPagination, DetailGettable, ListGettable, MetaResource};
//!
//! #[derive(serde::Deserialize)]
//! struct Widget {
//!     id: ResourceId<Widget>,
//!     name: String,
//! }
//!
//! impl MetaResource for Widget {}
//! impl ListGettable for Widget {
//!     type Pagination = DefaultPagination;
//! }
//! impl DetailGettable for Widget {}
//!
//! let page = node.get_list::<Widget>(0, 0).await?;
//! let widget = node.get_detail(&page[0].id).await?;
//! ```
//!
//! ## OAuth2
//!
//! ```rust,ignore
//! use drf_consumer::auth::{InMemoryCredentialStore, OAuth2Settings, OAuth2TokenManager};
//! use std::sync::Arc;
//!
//! let settings = OAuth2Settings::builder()
//!     .app_secret(AppSecret::from_client_credentials("client-id", "client-secret")?)
//!     .token_url(BaseUrl::new("https://api.example.com/o/token/")?)
//!     .revoke_url(BaseUrl::new("https://api.example.com/o/revoke_token/")?)
//!     .build()?;
//!
//! let manager = OAuth2TokenManager::new(settings, Arc::new(InMemoryCredentialStore::new()));
//! manager.authenticate("alice", "password").await?;
//!
//! // Every request now carries `Authorization: Bearer <token>`; expired
//! // tokens are refreshed once, however many requests hit the 401.
//! let node = Node::new(config, routes).with_token_manager(manager);
//! ```
//!
//! ## Design Principles
//!
//! - **Route errors are bugs**: a missing or duplicate route panics;
//!   validate the table at start-up with [`RouteTable::validate`]
//! - **Strict decoding**: a missing `results` array is an error, and
//!   decode errors carry the JSON path of the offending field
//! - **Per-request failures**: authentication failures are delivered to
//!   each affected request, never as a global event
//! - **Thread-safe**: all public types are `Send + Sync`
//! - **Async-first**: designed for use with the Tokio runtime

pub mod auth;
pub mod clients;
pub mod config;
pub mod error;
pub mod node;
pub mod payload;
pub mod rest;
pub mod routing;

// Re-export public types at crate root for convenience
pub use config::{AppSecret, BaseUrl, NodeConfig, NodeConfigBuilder};
pub use error::ConfigError;
pub use node::Node;
pub use routing::{ResourceId, ResourceType, Route, RouteKind, RouteTable};

// Re-export HTTP client types
pub use clients::{
    HttpClient, HttpError, HttpMethod, HttpRequest, HttpRequestBuilder, HttpResponse,
    HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError, Middleware,
    ParameterEncoding, RetryDecision,
};

// Re-export OAuth2 types for convenience
pub use auth::{
    AuthError, AuthState, CredentialStore, InMemoryCredentialStore, OAuth2Credentials,
    OAuth2Settings, OAuth2TokenManager, OAuthError,
};

// Re-export resource types
pub use payload::{RequestPayload, PayloadValue};
pub use rest::{ListResponse, ResourceError};
