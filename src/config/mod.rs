//! Configuration types for a [`Node`](crate::Node).
//!
//! # Overview
//!
//! - [`NodeConfig`]: base URL, user agent and per-resource list defaults
//! - [`NodeConfigBuilder`]: a builder for constructing [`NodeConfig`] instances
//! - [`BaseUrl`]: a validated absolute URL
//! - [`AppSecret`]: an OAuth2 client secret with masked debug output
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::config::{BaseUrl, NodeConfig};
//!
//! struct Widget;
//!
//! let config = NodeConfig::builder()
//!     .base_url(BaseUrl::new("https://api.example.com/v1/").unwrap())
//!     .default_limit_for::<Widget>(50)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.default_limit_for::<Widget>(), 50);
//! assert_eq!(config.default_limit_for::<String>(), 1000);
//! ```

mod newtypes;

pub use newtypes::{AppSecret, BaseUrl};

use std::collections::HashMap;

use crate::error::ConfigError;
use crate::rest::Filter;
use crate::routing::ResourceType;

/// List page size used when neither the caller nor the configuration sets one.
pub const DEFAULT_LIMIT: u64 = 1000;

/// Configuration of one backend.
///
/// # Thread Safety
///
/// `NodeConfig` is `Clone`, `Send`, and `Sync`.
#[derive(Clone, Debug)]
pub struct NodeConfig {
    base_url: BaseUrl,
    user_agent_prefix: Option<String>,
    default_limit: u64,
    default_limits: HashMap<ResourceType, u64>,
    default_filters: HashMap<ResourceType, Vec<Filter>>,
}

// Verify NodeConfig is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<NodeConfig>();
};

impl NodeConfig {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> NodeConfigBuilder {
        NodeConfigBuilder::new()
    }

    /// Returns the base URL every route is resolved against.
    #[must_use]
    pub const fn base_url(&self) -> &BaseUrl {
        &self.base_url
    }

    /// Returns the user agent prefix, if configured.
    #[must_use]
    pub fn user_agent_prefix(&self) -> Option<&str> {
        self.user_agent_prefix.as_deref()
    }

    /// Returns the global default list limit.
    #[must_use]
    pub const fn default_limit(&self) -> u64 {
        self.default_limit
    }

    /// Returns the default list limit for resource type `T`.
    #[must_use]
    pub fn default_limit_for<T: ?Sized + 'static>(&self) -> u64 {
        self.default_limits
            .get(&ResourceType::of::<T>())
            .copied()
            .unwrap_or(self.default_limit)
    }

    /// Returns the default filters for resource type `T`.
    #[must_use]
    pub fn default_filters_for<T: ?Sized + 'static>(&self) -> &[Filter] {
        self.default_filters
            .get(&ResourceType::of::<T>())
            .map_or(&[], Vec::as_slice)
    }
}

/// Builder for [`NodeConfig`].
#[derive(Debug, Default)]
pub struct NodeConfigBuilder {
    base_url: Option<BaseUrl>,
    user_agent_prefix: Option<String>,
    default_limit: Option<u64>,
    default_limits: Vec<(ResourceType, u64)>,
    default_filters: HashMap<ResourceType, Vec<Filter>>,
}

impl NodeConfigBuilder {
    /// Creates a new builder with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL (required).
    #[must_use]
    pub fn base_url(mut self, url: BaseUrl) -> Self {
        self.base_url = Some(url);
        self
    }

    /// Sets the user agent prefix for HTTP requests.
    #[must_use]
    pub fn user_agent_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.user_agent_prefix = Some(prefix.into());
        self
    }

    /// Sets the global default list limit (default: 1000).
    #[must_use]
    pub const fn default_limit(mut self, limit: u64) -> Self {
        self.default_limit = Some(limit);
        self
    }

    /// Sets the default list limit for resource type `T`.
    #[must_use]
    pub fn default_limit_for<T: ?Sized + 'static>(mut self, limit: u64) -> Self {
        self.default_limits.push((ResourceType::of::<T>(), limit));
        self
    }

    /// Sets the default filters for resource type `T`, replacing earlier ones.
    #[must_use]
    pub fn default_filters_for<T: ?Sized + 'static>(mut self, filters: Vec<Filter>) -> Self {
        self.default_filters.insert(ResourceType::of::<T>(), filters);
        self
    }

    /// Builds the [`NodeConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingRequiredField`] if `base_url` is not
    /// set and [`ConfigError::InvalidDefaultLimit`] if any limit is zero.
    pub fn build(self) -> Result<NodeConfig, ConfigError> {
        let base_url = self
            .base_url
            .ok_or(ConfigError::MissingRequiredField { field: "base_url" })?;

        let default_limit = self.default_limit.unwrap_or(DEFAULT_LIMIT);
        if default_limit == 0 {
            return Err(ConfigError::InvalidDefaultLimit { resource: "*" });
        }

        let mut default_limits = HashMap::new();
        for (resource_type, limit) in self.default_limits {
            if limit == 0 {
                return Err(ConfigError::InvalidDefaultLimit {
                    resource: resource_type.name(),
                });
            }
            default_limits.insert(resource_type, limit);
        }

        Ok(NodeConfig {
            base_url,
            user_agent_prefix: self.user_agent_prefix,
            default_limit,
            default_limits,
            default_filters: self.default_filters,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::Comparator;

    struct Widget;
    struct Gadget;

    fn base_url() -> BaseUrl {
        BaseUrl::new("https://api.example.com/").unwrap()
    }

    #[test]
    fn test_builder_requires_base_url() {
        let result = NodeConfigBuilder::new().build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingRequiredField { field: "base_url" }
        );
    }

    #[test]
    fn test_defaults() {
        let config = NodeConfig::builder().base_url(base_url()).build().unwrap();
        assert_eq!(config.default_limit(), DEFAULT_LIMIT);
        assert_eq!(config.default_limit_for::<Widget>(), 1000);
        assert!(config.default_filters_for::<Widget>().is_empty());
        assert!(config.user_agent_prefix().is_none());
    }

    #[test]
    fn test_per_resource_limits() {
        let config = NodeConfig::builder()
            .base_url(base_url())
            .default_limit(200)
            .default_limit_for::<Widget>(25)
            .build()
            .unwrap();
        assert_eq!(config.default_limit_for::<Widget>(), 25);
        assert_eq!(config.default_limit_for::<Gadget>(), 200);
    }

    #[test]
    fn test_zero_limits_are_rejected() {
        let result = NodeConfig::builder()
            .base_url(base_url())
            .default_limit(0)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidDefaultLimit { resource: "*" }
        );

        let result = NodeConfig::builder()
            .base_url(base_url())
            .default_limit_for::<Widget>(0)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::InvalidDefaultLimit { resource: "Widget" }
        );
    }

    #[test]
    fn test_default_filters_per_resource() {
        let config = NodeConfig::builder()
            .base_url(base_url())
            .default_filters_for::<Widget>(vec![Filter::new(
                "name",
                Comparator::IContains,
                "a",
            )])
            .build()
            .unwrap();
        assert_eq!(config.default_filters_for::<Widget>().len(), 1);
        assert!(config.default_filters_for::<Gadget>().is_empty());
    }
}
