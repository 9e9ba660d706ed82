//! HTTP request types.
//!
//! This module provides the [`HttpRequest`] type and its builder. A request
//! carries an unencoded [`RequestPayload`], so it can be re-encoded for
//! every attempt.

use crate::clients::errors::InvalidHttpRequestError;
use crate::payload::RequestPayload;
use std::collections::HashMap;
use std::fmt;

/// HTTP methods used by resource routes and token endpoints.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    /// HTTP GET method for retrieving resources.
    Get,
    /// HTTP POST method for creating resources.
    Post,
    /// HTTP PUT method for replacing resources.
    Put,
    /// HTTP PATCH method for partially updating resources.
    Patch,
    /// HTTP DELETE method for removing resources.
    Delete,
}

impl HttpMethod {
    /// Returns `true` if parameters go into the query string when URL
    /// encoded.
    #[must_use]
    pub const fn encodes_in_url(&self) -> bool {
        matches!(self, Self::Get | Self::Delete)
    }

    pub(crate) const fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => write!(f, "get"),
            Self::Post => write!(f, "post"),
            Self::Put => write!(f, "put"),
            Self::Patch => write!(f, "patch"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// How flat parameters are put on the wire.
///
/// Multipart payloads ignore this setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// Query string for `GET`/`DELETE`, form body otherwise.
    #[default]
    Url,
    /// JSON body.
    Json,
}

/// Status codes accepted by default (`200..300`).
#[must_use]
pub fn default_acceptable_status_codes() -> Vec<u16> {
    (200..300).collect()
}

/// Content types accepted by default (`*/*`).
#[must_use]
pub fn default_acceptable_content_types() -> Vec<String> {
    vec!["*/*".to_string()]
}

/// An HTTP request to an absolute URL.
///
/// Use [`HttpRequest::builder`] to construct requests with the builder pattern.
///
/// # Example
///
/// ```rust
/// use drf_consumer::clients::{HttpRequest, HttpMethod, ParameterEncoding};
/// use drf_consumer::payload::{JsonDict, PayloadValue, RequestPayload};
///
/// let mut fields = JsonDict::new();
/// fields.insert("name".to_string(), PayloadValue::from("widget"));
///
/// let request = HttpRequest::builder(HttpMethod::Post, "https://api.example.com/widgets/")
///     .payload(RequestPayload::Json(fields))
///     .encoding(ParameterEncoding::Json)
///     .acceptable_status_codes(vec![201])
///     .build()
///     .unwrap();
///
/// assert_eq!(request.tries, 1);
/// ```
#[derive(Clone, Debug)]
pub struct HttpRequest {
    /// The HTTP method for this request.
    pub http_method: HttpMethod,
    /// The absolute URL for this request.
    pub url: String,
    /// The unencoded request payload, if any.
    pub payload: Option<RequestPayload>,
    /// How flat parameters are encoded.
    pub encoding: ParameterEncoding,
    /// Additional headers to include in the request.
    pub extra_headers: HashMap<String, String>,
    /// Status codes treated as success.
    pub acceptable_status_codes: Vec<u16>,
    /// Response content types treated as success (`*/*` accepts all).
    pub acceptable_content_types: Vec<String>,
    /// Number of times to attempt the request on 429/500 (default: 1).
    pub tries: u32,
}

impl HttpRequest {
    /// Creates a new builder for constructing an `HttpRequest`.
    #[must_use]
    pub fn builder(method: HttpMethod, url: impl Into<String>) -> HttpRequestBuilder {
        HttpRequestBuilder::new(method, url)
    }

    /// Validates the request.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if:
    /// - the URL is not absolute
    /// - `tries` is zero
    /// - a payload with attachments is combined with `GET` or `DELETE`
    pub fn verify(&self) -> Result<(), InvalidHttpRequestError> {
        if !self.url.contains("://") {
            return Err(InvalidHttpRequestError::RelativeUrl {
                url: self.url.clone(),
            });
        }

        if self.tries == 0 {
            return Err(InvalidHttpRequestError::InvalidTries);
        }

        if self.http_method.encodes_in_url()
            && self
                .payload
                .as_ref()
                .is_some_and(RequestPayload::has_attachment)
        {
            return Err(InvalidHttpRequestError::MultipartNotAllowed {
                method: self.http_method.to_string(),
            });
        }

        Ok(())
    }

    /// Returns the bearer token in the `Authorization` header, if any.
    #[must_use]
    pub fn bearer_token(&self) -> Option<&str> {
        self.extra_headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case("authorization"))
            .and_then(|(_, value)| value.strip_prefix("Bearer "))
    }

    /// Sets a header, replacing any existing header of the same name
    /// regardless of case.
    pub fn set_header(&mut self, key: &str, value: impl Into<String>) {
        self.extra_headers
            .retain(|existing, _| !existing.eq_ignore_ascii_case(key));
        self.extra_headers.insert(key.to_string(), value.into());
    }
}

/// Builder for constructing [`HttpRequest`] instances.
#[derive(Debug)]
pub struct HttpRequestBuilder {
    request: HttpRequest,
}

impl HttpRequestBuilder {
    fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            request: HttpRequest {
                http_method: method,
                url: url.into(),
                payload: None,
                encoding: ParameterEncoding::default(),
                extra_headers: HashMap::new(),
                acceptable_status_codes: default_acceptable_status_codes(),
                acceptable_content_types: default_acceptable_content_types(),
                tries: 1,
            },
        }
    }

    /// Sets the request payload.
    #[must_use]
    pub fn payload(mut self, payload: RequestPayload) -> Self {
        self.request.payload = Some(payload);
        self
    }

    /// Sets the parameter encoding.
    #[must_use]
    pub const fn encoding(mut self, encoding: ParameterEncoding) -> Self {
        self.request.encoding = encoding;
        self
    }

    /// Adds a single extra header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.request.set_header(&key.into(), value);
        self
    }

    /// Replaces the accepted status codes.
    #[must_use]
    pub fn acceptable_status_codes(mut self, codes: Vec<u16>) -> Self {
        self.request.acceptable_status_codes = codes;
        self
    }

    /// Replaces the accepted response content types.
    #[must_use]
    pub fn acceptable_content_types(mut self, content_types: Vec<String>) -> Self {
        self.request.acceptable_content_types = content_types;
        self
    }

    /// Sets the number of times to attempt the request.
    ///
    /// Default is 1 (no retries). Set to a higher value to enable
    /// automatic retries for 429 and 500 responses.
    #[must_use]
    pub const fn tries(mut self, tries: u32) -> Self {
        self.request.tries = tries;
        self
    }

    /// Builds the [`HttpRequest`], validating it in the process.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidHttpRequestError`] if the request fails validation.
    pub fn build(self) -> Result<HttpRequest, InvalidHttpRequestError> {
        self.request.verify()?;
        Ok(self.request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::{FormData, JsonDict, MimeType};

    const URL: &str = "https://api.example.com/widgets/";

    fn attachment_payload() -> RequestPayload {
        RequestPayload::Multipart(vec![FormData::Attachment {
            key: "image".to_string(),
            data: vec![1, 2, 3],
            mime_type: MimeType::Jpeg,
        }])
    }

    #[test]
    fn test_http_method_display() {
        assert_eq!(HttpMethod::Get.to_string(), "get");
        assert_eq!(HttpMethod::Post.to_string(), "post");
        assert_eq!(HttpMethod::Put.to_string(), "put");
        assert_eq!(HttpMethod::Patch.to_string(), "patch");
        assert_eq!(HttpMethod::Delete.to_string(), "delete");
    }

    #[test]
    fn test_builder_defaults() {
        let request = HttpRequest::builder(HttpMethod::Get, URL).build().unwrap();

        assert_eq!(request.http_method, HttpMethod::Get);
        assert_eq!(request.url, URL);
        assert!(request.payload.is_none());
        assert_eq!(request.encoding, ParameterEncoding::Url);
        assert_eq!(request.acceptable_status_codes.first(), Some(&200));
        assert_eq!(request.acceptable_status_codes.last(), Some(&299));
        assert_eq!(request.acceptable_content_types, vec!["*/*".to_string()]);
        assert_eq!(request.tries, 1);
    }

    #[test]
    fn test_verify_rejects_relative_url() {
        let result = HttpRequest::builder(HttpMethod::Get, "widgets/").build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::RelativeUrl { url }) if url == "widgets/"
        ));
    }

    #[test]
    fn test_verify_rejects_zero_tries() {
        let result = HttpRequest::builder(HttpMethod::Get, URL).tries(0).build();
        assert_eq!(result.unwrap_err(), InvalidHttpRequestError::InvalidTries);
    }

    #[test]
    fn test_verify_rejects_multipart_get() {
        let result = HttpRequest::builder(HttpMethod::Get, URL)
            .payload(attachment_payload())
            .build();
        assert!(matches!(
            result,
            Err(InvalidHttpRequestError::MultipartNotAllowed { method }) if method == "get"
        ));

        assert!(HttpRequest::builder(HttpMethod::Post, URL)
            .payload(attachment_payload())
            .build()
            .is_ok());
    }

    #[test]
    fn test_get_with_plain_parameters_is_valid() {
        let request = HttpRequest::builder(HttpMethod::Get, URL)
            .payload(RequestPayload::Json(JsonDict::new()))
            .build();
        assert!(request.is_ok());
    }

    #[test]
    fn test_bearer_token_extraction() {
        let request = HttpRequest::builder(HttpMethod::Get, URL)
            .header("authorization", "Bearer abc")
            .build()
            .unwrap();
        assert_eq!(request.bearer_token(), Some("abc"));

        let request = HttpRequest::builder(HttpMethod::Get, URL)
            .header("Authorization", "Basic xyz")
            .build()
            .unwrap();
        assert_eq!(request.bearer_token(), None);
    }

    #[test]
    fn test_set_header_replaces_case_insensitively() {
        let mut request = HttpRequest::builder(HttpMethod::Get, URL)
            .header("authorization", "Bearer old")
            .build()
            .unwrap();
        request.set_header("Authorization", "Bearer new");

        assert_eq!(request.extra_headers.len(), 1);
        assert_eq!(request.bearer_token(), Some("new"));
    }
}
