//! The route table and detail path building.

use super::route::{ResourceType, Route, RouteKind};
use std::collections::HashMap;
use thiserror::Error;

/// A route lookup that did not match exactly one route.
///
/// Both cases are configuration bugs; [`RouteTable::resolve`] panics on
/// them, [`RouteTable::try_resolve`] and [`RouteTable::validate`] return
/// them for start-up checks.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// No route is registered for the pair.
    #[error("No {kind} route registered for resource type '{resource}'")]
    NotFound {
        /// Name of the resource type.
        resource: &'static str,
        /// The requested route kind.
        kind: RouteKind,
    },

    /// More than one route is registered for the pair.
    #[error("{count} {kind} routes registered for resource type '{resource}', expected exactly one")]
    Ambiguous {
        /// Name of the resource type.
        resource: &'static str,
        /// The requested route kind.
        kind: RouteKind,
        /// Number of matching routes.
        count: usize,
    },
}

/// An ordered collection of [`Route`]s.
///
/// Lookups are pure: the same table and key always yield the same route.
///
/// # Example
///
/// ```rust
/// use drf_consumer::routing::{Route, RouteKind, RouteTable};
///
/// struct Widget;
///
/// let routes = RouteTable::new()
///     .with_route(Route::list_get::<Widget>("widgets/"))
///     .with_route(Route::detail_get::<Widget>("widgets/"));
///
/// assert!(routes.validate().is_ok());
/// assert_eq!(routes.resolve::<Widget>(RouteKind::ListGet).template(), "widgets/");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Appends a route.
    #[must_use]
    pub fn with_route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Appends a route in place.
    pub fn push(&mut self, route: Route) {
        self.routes.push(route);
    }

    /// Returns all registered routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Looks up the single route for a resource type tag and kind.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if zero or several routes match.
    pub fn try_route(
        &self,
        resource_type: ResourceType,
        kind: RouteKind,
    ) -> Result<&Route, RouteError> {
        let mut matches = self
            .routes
            .iter()
            .filter(|route| route.matches(resource_type, kind));

        let first = matches.next().ok_or(RouteError::NotFound {
            resource: resource_type.name(),
            kind,
        })?;

        let extra = matches.count();
        if extra > 0 {
            return Err(RouteError::Ambiguous {
                resource: resource_type.name(),
                kind,
                count: extra + 1,
            });
        }

        Ok(first)
    }

    /// Looks up the single route for `T` and `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] if zero or several routes match.
    pub fn try_resolve<T: ?Sized + 'static>(&self, kind: RouteKind) -> Result<&Route, RouteError> {
        self.try_route(ResourceType::of::<T>(), kind)
    }

    /// Returns the single route for a resource type tag and kind.
    ///
    /// # Panics
    ///
    /// Panics if zero or several routes match. A missing or duplicated
    /// route is a bug in the table setup, not a runtime condition.
    #[must_use]
    pub fn route(&self, resource_type: ResourceType, kind: RouteKind) -> &Route {
        match self.try_route(resource_type, kind) {
            Ok(route) => route,
            Err(err) => {
                tracing::debug!(resource = resource_type.name(), %kind, "route resolution failed");
                panic!("{err}");
            }
        }
    }

    /// Returns the single route for `T` and `kind`.
    ///
    /// # Panics
    ///
    /// Panics if zero or several routes match.
    #[must_use]
    pub fn resolve<T: ?Sized + 'static>(&self, kind: RouteKind) -> &Route {
        self.route(ResourceType::of::<T>(), kind)
    }

    /// Checks that no (resource type, kind) pair is registered twice.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::Ambiguous`] for the first duplicated pair, in
    /// registration order.
    pub fn validate(&self) -> Result<(), RouteError> {
        let mut counts: HashMap<(ResourceType, RouteKind), usize> = HashMap::new();
        for route in &self.routes {
            *counts.entry((route.resource_type(), route.kind())).or_default() += 1;
        }

        for route in &self.routes {
            let count = counts
                .get(&(route.resource_type(), route.kind()))
                .copied()
                .unwrap_or_default();
            if count > 1 {
                return Err(RouteError::Ambiguous {
                    resource: route.resource_type().name(),
                    kind: route.kind(),
                    count,
                });
            }
        }

        Ok(())
    }
}

/// Builds a detail path from a route template and a resource id.
///
/// The id is percent-encoded. A template containing `{id}` has the
/// placeholder replaced; otherwise the id is appended as a path segment,
/// keeping a trailing slash if the template had one.
///
/// # Example
///
/// ```rust
/// use drf_consumer::routing::build_detail_path;
///
/// assert_eq!(build_detail_path("widgets/", "42"), "widgets/42/");
/// assert_eq!(build_detail_path("widgets", "42"), "widgets/42");
/// assert_eq!(build_detail_path("widgets/{id}/full/", "a b"), "widgets/a%20b/full/");
/// ```
#[must_use]
pub fn build_detail_path(template: &str, id: &str) -> String {
    let encoded = urlencoding::encode(id);

    if template.contains("{id}") {
        return template.replace("{id}", &encoded);
    }

    if template.is_empty() {
        return encoded.into_owned();
    }

    match template.strip_suffix('/') {
        Some(base) => format!("{base}/{encoded}/"),
        None => format!("{template}/{encoded}"),
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<RouteTable>();
};

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;
    struct Gadget;

    fn table() -> RouteTable {
        RouteTable::new()
            .with_route(Route::list_get::<Widget>("widgets/"))
            .with_route(Route::detail_get::<Widget>("widgets/"))
            .with_route(Route::list_get::<Gadget>("gadgets/"))
    }

    #[test]
    fn test_resolve_returns_matching_route() {
        let routes = table();
        assert_eq!(routes.resolve::<Widget>(RouteKind::ListGet).template(), "widgets/");
        assert_eq!(routes.resolve::<Gadget>(RouteKind::ListGet).template(), "gadgets/");
    }

    #[test]
    fn test_resolve_is_pure() {
        let routes = table();
        let first = routes.resolve::<Widget>(RouteKind::DetailGet).clone();
        let second = routes.resolve::<Widget>(RouteKind::DetailGet).clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_try_resolve_reports_missing_route() {
        let result = table().try_resolve::<Gadget>(RouteKind::DetailDelete).cloned();
        assert_eq!(
            result,
            Err(RouteError::NotFound {
                resource: "Gadget",
                kind: RouteKind::DetailDelete,
            })
        );
    }

    #[test]
    fn test_try_resolve_reports_ambiguous_route() {
        let routes = table().with_route(Route::list_get::<Widget>("other-widgets/"));
        let result = routes.try_resolve::<Widget>(RouteKind::ListGet).cloned();
        assert_eq!(
            result,
            Err(RouteError::Ambiguous {
                resource: "Widget",
                kind: RouteKind::ListGet,
                count: 2,
            })
        );
    }

    #[test]
    #[should_panic(expected = "No detail DELETE route registered")]
    fn test_resolve_panics_on_missing_route() {
        let _ = table().resolve::<Widget>(RouteKind::DetailDelete);
    }

    #[test]
    #[should_panic(expected = "expected exactly one")]
    fn test_resolve_panics_on_conflicting_route() {
        let routes = table().with_route(Route::list_get::<Widget>("widgets/v2/"));
        let _ = routes.resolve::<Widget>(RouteKind::ListGet);
    }

    #[test]
    fn test_validate_detects_duplicates() {
        assert!(table().validate().is_ok());

        let mut routes = table();
        routes.push(Route::list_get::<Gadget>("gadgets/again/"));
        assert!(matches!(
            routes.validate(),
            Err(RouteError::Ambiguous { resource: "Gadget", count: 2, .. })
        ));
    }

    #[test]
    fn test_build_detail_path_variants() {
        assert_eq!(build_detail_path("widgets/", "7"), "widgets/7/");
        assert_eq!(build_detail_path("widgets", "7"), "widgets/7");
        assert_eq!(build_detail_path("", "7"), "7");
        assert_eq!(build_detail_path("widgets/{id}/parts/", "7"), "widgets/7/parts/");
    }

    #[test]
    fn test_build_detail_path_encodes_id() {
        assert_eq!(build_detail_path("files/", "a/b?c"), "files/a%2Fb%3Fc/");
    }

    #[test]
    fn test_table_len() {
        assert_eq!(table().len(), 3);
        assert!(RouteTable::new().is_empty());
    }
}
