//! Declarative routing from resource types to relative URLs.
//!
//! A [`RouteTable`] maps each (resource type, [`RouteKind`]) pair to exactly
//! one [`Route`]. Detail routes are completed with a [`ResourceId`] using
//! [`build_detail_path`].
//!
//! # Example
//!
//! ```rust
//! use drf_consumer::routing::{build_detail_path, ResourceId, Route, RouteKind, RouteTable};
//!
//! struct Widget;
//!
//! let routes = RouteTable::new()
//!     .with_route(Route::list_get::<Widget>("widgets/"))
//!     .with_route(Route::detail_get::<Widget>("widgets/"));
//!
//! let id = ResourceId::<Widget>::new("3").unwrap();
//! let route = routes.resolve::<Widget>(RouteKind::DetailGet);
//! assert_eq!(build_detail_path(route.template(), id.as_str()), "widgets/3/");
//! ```

mod resource_id;
mod route;
mod table;

pub use resource_id::ResourceId;
pub use route::{ResourceType, Route, RouteKind};
pub use table::{build_detail_path, RouteError, RouteTable};
