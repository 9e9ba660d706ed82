//! Declarative route entries.

use crate::clients::HttpMethod;
use std::any::{type_name, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A runtime tag identifying a resource type.
///
/// Two tags are equal when they were created for the same Rust type. The
/// type name is kept for diagnostics only.
#[derive(Clone, Copy)]
pub struct ResourceType {
    id: TypeId,
    name: &'static str,
}

impl ResourceType {
    /// Returns the tag for `T`.
    #[must_use]
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: short_type_name(type_name::<T>()),
        }
    }

    /// Returns the short type name (without module path).
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

impl PartialEq for ResourceType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ResourceType {}

impl Hash for ResourceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ResourceType({})", self.name)
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The operation a route serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RouteKind {
    /// List endpoint, `GET`.
    ListGet,
    /// List endpoint accepting several objects at once, `POST`.
    ListPost,
    /// Detail endpoint, `GET`.
    DetailGet,
    /// List endpoint creating a single object, `POST`.
    SinglePost,
    /// Detail endpoint, `PUT`.
    DetailPut,
    /// Detail endpoint, `PATCH`.
    DetailPatch,
    /// Detail endpoint, `DELETE`.
    DetailDelete,
}

impl RouteKind {
    /// Returns the HTTP method used for this kind of route.
    #[must_use]
    pub const fn default_http_method(&self) -> HttpMethod {
        match self {
            Self::ListGet | Self::DetailGet => HttpMethod::Get,
            Self::ListPost | Self::SinglePost => HttpMethod::Post,
            Self::DetailPut => HttpMethod::Put,
            Self::DetailPatch => HttpMethod::Patch,
            Self::DetailDelete => HttpMethod::Delete,
        }
    }

    /// Returns `true` for routes addressing a single identified object.
    #[must_use]
    pub const fn is_detail(&self) -> bool {
        matches!(
            self,
            Self::DetailGet | Self::DetailPut | Self::DetailPatch | Self::DetailDelete
        )
    }

    /// Returns the kind name as a string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::ListGet => "list GET",
            Self::ListPost => "list POST",
            Self::DetailGet => "detail GET",
            Self::SinglePost => "single POST",
            Self::DetailPut => "detail PUT",
            Self::DetailPatch => "detail PATCH",
            Self::DetailDelete => "detail DELETE",
        }
    }
}

impl fmt::Display for RouteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A route from (resource type, operation) to a relative URL template.
///
/// Detail templates may contain an `{id}` placeholder. Without one, the
/// id is appended as a path segment.
///
/// # Example
///
/// ```rust
/// use drf_consumer::routing::{Route, RouteKind};
/// use drf_consumer::HttpMethod;
///
/// struct Widget;
///
/// let route = Route::detail_patch::<Widget>("widgets/");
/// assert_eq!(route.kind(), RouteKind::DetailPatch);
/// assert_eq!(route.http_method(), HttpMethod::Patch);
/// assert_eq!(route.template(), "widgets/");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    resource_type: ResourceType,
    kind: RouteKind,
    template: String,
    http_method: HttpMethod,
}

impl Route {
    /// Creates a route for resource type `T`.
    #[must_use]
    pub fn new<T: ?Sized + 'static>(kind: RouteKind, template: impl Into<String>) -> Self {
        Self {
            resource_type: ResourceType::of::<T>(),
            kind,
            template: template.into(),
            http_method: kind.default_http_method(),
        }
    }

    /// Creates a list `GET` route.
    #[must_use]
    pub fn list_get<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::ListGet, template)
    }

    /// Creates a list `POST` route.
    #[must_use]
    pub fn list_post<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::ListPost, template)
    }

    /// Creates a detail `GET` route.
    #[must_use]
    pub fn detail_get<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::DetailGet, template)
    }

    /// Creates a single-object `POST` route.
    #[must_use]
    pub fn single_post<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::SinglePost, template)
    }

    /// Creates a detail `PUT` route.
    #[must_use]
    pub fn detail_put<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::DetailPut, template)
    }

    /// Creates a detail `PATCH` route.
    #[must_use]
    pub fn detail_patch<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::DetailPatch, template)
    }

    /// Creates a detail `DELETE` route.
    #[must_use]
    pub fn detail_delete<T: ?Sized + 'static>(template: impl Into<String>) -> Self {
        Self::new::<T>(RouteKind::DetailDelete, template)
    }

    /// Overrides the HTTP method.
    #[must_use]
    pub const fn with_http_method(mut self, method: HttpMethod) -> Self {
        self.http_method = method;
        self
    }

    /// Returns the resource type tag.
    #[must_use]
    pub const fn resource_type(&self) -> ResourceType {
        self.resource_type
    }

    /// Returns the route kind.
    #[must_use]
    pub const fn kind(&self) -> RouteKind {
        self.kind
    }

    /// Returns the relative URL template.
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Returns the HTTP method.
    #[must_use]
    pub const fn http_method(&self) -> HttpMethod {
        self.http_method
    }

    /// Returns `true` if this route serves `kind` for `resource_type`.
    #[must_use]
    pub fn matches(&self, resource_type: ResourceType, kind: RouteKind) -> bool {
        self.resource_type == resource_type && self.kind == kind
    }
}

const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ResourceType>();
    assert_send_sync::<Route>();
};
