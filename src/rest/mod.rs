//! Resource infrastructure for Django REST Framework backends.
//!
//! This module provides:
//!
//! - **Capability traits** ([`ListGettable`], [`DetailGettable`],
//!   [`SinglePostable`], ...): which operations a resource type supports
//! - **[`Pagination`]**: pluggable pagination schemes, with
//!   [`DefaultPagination`] for offset/limit/count
//! - **Extraction** ([`extract_list_response`], [`extract_single_object`],
//!   ...): strict decoding of response bodies
//! - **[`Filter`]**: list query filters with Django field lookups
//! - **[`ListResponse<T, P>`]**: a Deref-based page wrapper
//! - **[`ResourceError`]**: semantic error types for resource operations

mod errors;
pub mod extract;
mod filter;
pub mod pagination;
mod resource;
mod response;

pub use errors::ResourceError;
pub use extract::{
    extract_list_response, extract_objects, extract_pagination, extract_post_list_response,
    extract_single_object,
};
pub use filter::{parameters_from_filters, Comparator, Filter};
pub use pagination::{DefaultPagination, Pagination};
pub use resource::{
    DetailDeletable, DetailGettable, DetailPatchable, DetailPuttable, FilteredListGettable,
    IdentifiableResource, ListGettable, ListPostable, MetaResource, PayloadConvertible,
    SinglePostable,
};
pub use response::ListResponse;
