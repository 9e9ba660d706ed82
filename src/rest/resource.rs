//! Capability traits for resource types.
//!
//! A resource type opts into each operation the backend supports by
//! implementing the matching trait. The [`Node`](crate::Node) operations
//! are bounded by these traits, and the route table maps each capability
//! to a URL.
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::rest::{
//!     DefaultPagination, DetailGettable, IdentifiableResource, ListGettable, MetaResource,
//!     PayloadConvertible, SinglePostable,
//! };
//! use drf_consumer::routing::ResourceId;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! struct Widget {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     id: Option<ResourceId<Widget>>,
//!     name: String,
//! }
//!
//! impl MetaResource for Widget {}
//! impl ListGettable for Widget {
//!     type Pagination = DefaultPagination;
//! }
//! impl DetailGettable for Widget {}
//! impl IdentifiableResource for Widget {
//!     fn id(&self) -> Option<ResourceId<Self>> {
//!         self.id.clone()
//!     }
//! }
//! impl PayloadConvertible for Widget {}
//! impl SinglePostable for Widget {}
//!
//! assert_eq!(Widget::resource_name(), "Widget");
//! ```

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::clients::{
    default_acceptable_content_types, default_acceptable_status_codes, HttpMethod,
    ParameterEncoding,
};
use crate::payload::{PayloadError, RequestPayload};
use crate::rest::pagination::Pagination;
use crate::routing::{ResourceId, ResourceType, RouteKind};

/// Base trait of every resource type.
///
/// Besides naming the resource, the trait carries the per-request
/// settings the [`Node`](crate::Node) applies to each operation.
pub trait MetaResource: Send + Sync + 'static {
    /// Name used in log output and error messages.
    #[must_use]
    fn resource_name() -> &'static str {
        ResourceType::of::<Self>().name()
    }

    /// Encoding of request bodies without attachments.
    ///
    /// Defaults to a form body. Payloads with attachments are always sent
    /// as `multipart/form-data`, and `GET`/`DELETE` always use the query
    /// string.
    #[must_use]
    fn body_encoding() -> ParameterEncoding {
        ParameterEncoding::Url
    }

    /// Status codes accepted as success for the `kind` operation.
    #[must_use]
    fn acceptable_status_codes(kind: RouteKind) -> Vec<u16> {
        let _ = kind;
        default_acceptable_status_codes()
    }

    /// Response content types accepted for the `kind` operation.
    #[must_use]
    fn acceptable_content_types(kind: RouteKind) -> Vec<String> {
        let _ = kind;
        default_acceptable_content_types()
    }
}

/// Resources listed with `GET` on a list route.
pub trait ListGettable: MetaResource + DeserializeOwned {
    /// Pagination scheme of the list endpoint.
    type Pagination: Pagination;
}

/// List resources that accept filter query parameters.
pub trait FilteredListGettable: ListGettable {}

/// Resources fetched with `GET` on a detail route.
pub trait DetailGettable: MetaResource + DeserializeOwned {}

/// Resources with an id.
pub trait IdentifiableResource: MetaResource + Sized {
    /// The id, or `None` for objects not yet created on the backend.
    fn id(&self) -> Option<ResourceId<Self>>;
}

/// Objects that can be turned into a request payload.
pub trait PayloadConvertible: Serialize {
    /// Builds the payload sent with `method`.
    ///
    /// The default serializes `self` into a JSON payload. Override it to
    /// attach files or to send different fields per method.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError`] if `self` does not serialize to a JSON
    /// object.
    fn to_payload(&self, method: HttpMethod) -> Result<RequestPayload, PayloadError> {
        let _ = method;
        RequestPayload::from_serialize(self)
    }
}

/// Resources created one at a time with `POST`.
pub trait SinglePostable: MetaResource + PayloadConvertible + DeserializeOwned {}

/// Resources created in bulk with `POST` on a list route.
pub trait ListPostable: MetaResource + PayloadConvertible + DeserializeOwned {}

/// Resources replaced with `PUT` on a detail route.
pub trait DetailPuttable: IdentifiableResource + PayloadConvertible + DeserializeOwned {}

/// Resources partially updated with `PATCH` on a detail route.
pub trait DetailPatchable: IdentifiableResource + PayloadConvertible + DeserializeOwned {}

/// Resources deleted with `DELETE` on a detail route.
pub trait DetailDeletable: IdentifiableResource {}
