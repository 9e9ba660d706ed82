//! Request adapters and response-driven retriers.
//!
//! Middlewares are registered on an [`HttpClient`](super::HttpClient) in
//! order. Before every attempt each middleware may adapt the outgoing
//! request; after a failed attempt they are asked in order whether to
//! retry. The first decision other than [`RetryDecision::DoNotRetry`] wins.

use crate::clients::errors::HttpError;
use crate::clients::http_request::HttpRequest;
use async_trait::async_trait;
use std::fmt;

/// What the dispatcher should do after a failed attempt.
#[derive(Debug)]
pub enum RetryDecision {
    /// Leave the error to the next middleware, or to the caller.
    DoNotRetry,
    /// Send the request again (after re-adapting it).
    Retry,
    /// Fail the request with this error instead of the original one.
    Fail(HttpError),
}

/// A hook pair around request dispatch.
///
/// Both methods have pass-through defaults so a middleware only implements
/// the side it cares about.
///
/// # Example
///
/// ```rust
/// use drf_consumer::clients::{HttpError, HttpRequest, Middleware};
///
/// #[derive(Debug)]
/// struct Language(&'static str);
///
/// #[async_trait::async_trait]
/// impl Middleware for Language {
///     fn adapt(&self, request: &mut HttpRequest) -> Result<(), HttpError> {
///         request.set_header("Accept-Language", self.0);
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Middleware: Send + Sync + fmt::Debug {
    /// Adapts a request before it is sent.
    ///
    /// # Errors
    ///
    /// An error aborts the request without sending it.
    fn adapt(&self, request: &mut HttpRequest) -> Result<(), HttpError> {
        let _ = request;
        Ok(())
    }

    /// Decides whether a failed attempt should be retried.
    ///
    /// `retry_count` is the number of times this request was already
    /// retried by any middleware.
    async fn retry(
        &self,
        request: &HttpRequest,
        error: &HttpError,
        retry_count: u32,
    ) -> RetryDecision {
        let _ = (request, error, retry_count);
        RetryDecision::DoNotRetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::HttpMethod;

    #[derive(Debug)]
    struct PassThrough;

    #[async_trait]
    impl Middleware for PassThrough {}

    #[tokio::test]
    async fn test_default_methods_pass_through() {
        let middleware = PassThrough;
        let mut request = HttpRequest::builder(HttpMethod::Get, "https://example.com/")
            .build()
            .unwrap();

        assert!(middleware.adapt(&mut request).is_ok());
        assert!(request.extra_headers.is_empty());

        let error = HttpError::InvalidRequest(
            crate::clients::InvalidHttpRequestError::InvalidTries,
        );
        assert!(matches!(
            middleware.retry(&request, &error, 0).await,
            RetryDecision::DoNotRetry
        ));
    }
}
