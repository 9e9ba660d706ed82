//! HTTP dispatch layer.
//!
//! This module sends requests to the backend and handles request/response
//! processing, transient retry logic and the middleware chain used for
//! authentication.
//!
//! # Overview
//!
//! - [`HttpClient`]: The async dispatcher
//! - [`HttpRequest`]: A request to an absolute URL with an unencoded payload
//! - [`HttpResponse`]: A parsed response
//! - [`HttpMethod`]: Supported HTTP methods
//! - [`ParameterEncoding`]: URL or JSON encoding of flat parameters
//! - [`Middleware`]: Request adapter and retrier hooks
//!
//! # Example
//!
//! ```rust,ignore
//! use drf_consumer::clients::{HttpClient, HttpMethod, HttpRequest};
//!
//! let client = HttpClient::new(None);
//! let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com/widgets/")
//!     .build()?;
//! let response = client.request(request).await?;
//! println!("{}", response.body);
//! ```

mod errors;
mod http_client;
mod http_request;
mod http_response;
mod middleware;

pub use errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
pub use http_client::{HttpClient, RETRY_WAIT_TIME, SDK_VERSION};
pub use http_request::{
    default_acceptable_content_types, default_acceptable_status_codes, HttpMethod, HttpRequest,
    HttpRequestBuilder, ParameterEncoding,
};
pub use http_response::HttpResponse;
pub use middleware::{Middleware, RetryDecision};
