//! Session dispatcher for REST backends.
//!
//! This module provides the [`HttpClient`] type that sends [`HttpRequest`]s
//! through the transport, applying a chain of [`Middleware`]s and retrying
//! transient 429/500 responses.

use std::collections::HashMap;
use std::sync::Arc;

use reqwest::multipart::{Form, Part};

use crate::clients::errors::{
    HttpError, HttpResponseError, InvalidHttpRequestError, MaxHttpRetriesExceededError,
};
use crate::clients::http_request::{HttpRequest, ParameterEncoding};
use crate::clients::http_response::HttpResponse;
use crate::clients::middleware::{Middleware, RetryDecision};
use crate::payload::{encode, flatten_parameters, EncodedPayload, MimeType, MultipartMap};

/// Fixed retry wait time in seconds for transient failures.
pub const RETRY_WAIT_TIME: u64 = 1;

/// Library version from Cargo.toml.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// HTTP client dispatching requests through a middleware chain.
///
/// The client handles:
/// - Default headers including User-Agent
/// - Request adaptation and auth-driven retries via [`Middleware`]
/// - Automatic retry logic for 429 and 500 responses
/// - Acceptable status code and content type checks
///
/// # Thread Safety
///
/// `HttpClient` is `Send + Sync`, making it safe to share across async tasks.
///
/// # Example
///
/// ```rust,ignore
/// use drf_consumer::clients::{HttpClient, HttpMethod, HttpRequest};
///
/// let client = HttpClient::new(Some("MyApp/1.0"));
/// let request = HttpRequest::builder(HttpMethod::Get, "https://api.example.com/widgets/")
///     .tries(3)
///     .build()?;
/// let response = client.request(request).await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    default_headers: HashMap<String, String>,
    middlewares: Vec<Arc<dyn Middleware>>,
}

// Verify HttpClient is Send + Sync at compile time
const _: fn() = || {
    const fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<HttpClient>();
};

impl HttpClient {
    /// Creates a new client with an optional User-Agent prefix.
    #[must_use]
    pub fn new(user_agent_prefix: Option<&str>) -> Self {
        let user_agent_prefix =
            user_agent_prefix.map_or(String::new(), |prefix| format!("{prefix} | "));
        let rust_version = env!("CARGO_PKG_RUST_VERSION");
        let user_agent =
            format!("{user_agent_prefix}DRF Consumer Library v{SDK_VERSION} | Rust {rust_version}");

        let mut default_headers = HashMap::new();
        default_headers.insert("User-Agent".to_string(), user_agent);
        default_headers.insert("Accept".to_string(), "application/json".to_string());

        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            default_headers,
            middlewares: Vec::new(),
        }
    }

    /// Appends a middleware to the chain.
    #[must_use]
    pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Returns the default headers for this client.
    #[must_use]
    pub const fn default_headers(&self) -> &HashMap<String, String> {
        &self.default_headers
    }

    /// Returns the number of registered middlewares.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }

    /// Sends a request.
    ///
    /// Every attempt starts from the original request: middlewares adapt a
    /// fresh copy and the payload is encoded again.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError`] if:
    /// - Request validation fails (`InvalidRequest`)
    /// - Network error occurs (`Network`)
    /// - The status code is not acceptable (`Response`)
    /// - The content type is not acceptable (`UnacceptableContentType`)
    /// - Transient retries are exhausted (`MaxRetries`)
    /// - A middleware fails the request (for example `Auth`)
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse, HttpError> {
        request.verify()?;

        let mut retry_count: u32 = 0;
        loop {
            let mut attempt = request.clone();
            for middleware in &self.middlewares {
                middleware.adapt(&mut attempt)?;
            }

            tracing::debug!(
                method = %attempt.http_method,
                url = %attempt.url,
                retry_count,
                "dispatching request"
            );

            let error = match self.send(&attempt).await {
                Ok(response) => return Ok(response),
                Err(error) => error,
            };

            let mut decision = RetryDecision::DoNotRetry;
            for middleware in &self.middlewares {
                decision = middleware.retry(&attempt, &error, retry_count).await;
                if !matches!(decision, RetryDecision::DoNotRetry) {
                    break;
                }
            }

            match decision {
                RetryDecision::DoNotRetry => return Err(error),
                RetryDecision::Fail(replacement) => return Err(replacement),
                RetryDecision::Retry => retry_count += 1,
            }
        }
    }

    /// Sends one adapted request, retrying transient 429/500 responses.
    async fn send(&self, request: &HttpRequest) -> Result<HttpResponse, HttpError> {
        let mut headers = self.default_headers.clone();
        for (key, value) in &request.extra_headers {
            headers.insert(key.clone(), value.clone());
        }

        let mut tries: u32 = 0;
        loop {
            tries += 1;

            let mut req_builder = self
                .client
                .request(request.http_method.as_reqwest(), &request.url);
            for (key, value) in &headers {
                req_builder = req_builder.header(key, value);
            }
            req_builder = Self::apply_payload(req_builder, request)?;

            let res = req_builder.send().await?;

            let code = res.status().as_u16();
            let res_headers = Self::parse_response_headers(res.headers());
            let body_text = res.text().await.unwrap_or_default();

            let body = if body_text.is_empty() {
                serde_json::json!({})
            } else {
                serde_json::from_str(&body_text).unwrap_or_else(|_| {
                    // For 5xx errors, keep the raw body for diagnostics
                    if code >= 500 {
                        serde_json::json!({ "raw_body": body_text })
                    } else {
                        serde_json::json!({})
                    }
                })
            };

            let response = HttpResponse::new(code, res_headers, body);

            if request.acceptable_status_codes.contains(&code) {
                if !response.has_acceptable_content_type(&request.acceptable_content_types) {
                    return Err(HttpError::UnacceptableContentType {
                        content_type: response.content_type().unwrap_or_default().to_string(),
                        acceptable: request.acceptable_content_types.clone(),
                    });
                }
                return Ok(response);
            }

            let error_message = Self::serialize_error(&response);

            let should_retry = code == 429 || code == 500;
            if !should_retry || tries >= request.tries {
                if should_retry && request.tries > 1 {
                    return Err(HttpError::MaxRetries(MaxHttpRetriesExceededError {
                        code,
                        tries: request.tries,
                        message: error_message,
                        error_reference: response.request_id().map(String::from),
                    }));
                }
                return Err(HttpError::Response(HttpResponseError {
                    code,
                    message: error_message,
                    error_reference: response.request_id().map(String::from),
                    body: response.body,
                }));
            }

            let delay = Self::calculate_retry_delay(&response, code);
            tracing::debug!(code, tries, ?delay, "retrying transient failure");
            tokio::time::sleep(delay).await;
        }
    }

    fn apply_payload(
        builder: reqwest::RequestBuilder,
        request: &HttpRequest,
    ) -> Result<reqwest::RequestBuilder, HttpError> {
        let Some(payload) = &request.payload else {
            return Ok(builder);
        };

        match encode(payload) {
            EncodedPayload::Parameters(params) => match request.encoding {
                ParameterEncoding::Url if request.http_method.encodes_in_url() => {
                    Ok(builder.query(&flatten_parameters(&params)))
                }
                ParameterEncoding::Url => Ok(builder.form(&flatten_parameters(&params))),
                ParameterEncoding::Json => Ok(builder.json(&params)),
            },
            EncodedPayload::Multipart(parts) => Ok(builder.multipart(Self::multipart_form(parts)?)),
        }
    }

    fn multipart_form(parts: MultipartMap) -> Result<Form, HttpError> {
        let mut form = Form::new();
        for (key, part) in parts {
            let mime = part.mime_type.as_str().to_string();
            let mut body = Part::bytes(part.data).mime_str(&mime).map_err(|_| {
                InvalidHttpRequestError::InvalidMimeType {
                    key: key.clone(),
                    mime_type: mime.clone(),
                }
            })?;
            if part.mime_type != MimeType::Json {
                let file_name = part
                    .mime_type
                    .file_extension()
                    .map_or_else(|| key.clone(), |ext| format!("{key}.{ext}"));
                body = body.file_name(file_name);
            }
            form = form.part(key, body);
        }
        Ok(form)
    }

    /// Parses response headers into a `HashMap`.
    fn parse_response_headers(
        headers: &reqwest::header::HeaderMap,
    ) -> HashMap<String, Vec<String>> {
        let mut result: HashMap<String, Vec<String>> = HashMap::new();
        for (name, value) in headers {
            let key = name.as_str().to_lowercase();
            let value = value.to_str().unwrap_or_default().to_string();
            result.entry(key).or_default().push(value);
        }
        result
    }

    /// Calculates the retry delay based on response and status code.
    fn calculate_retry_delay(response: &HttpResponse, status: u16) -> std::time::Duration {
        // For 429: use Retry-After if present, otherwise fixed delay
        // For 500: always use fixed delay
        if status == 429 {
            if let Some(retry_after) = response.retry_request_after {
                return std::time::Duration::from_secs_f64(retry_after);
            }
        }
        std::time::Duration::from_secs(RETRY_WAIT_TIME)
    }

    /// Serializes the DRF error fields of a response body to JSON.
    fn serialize_error(response: &HttpResponse) -> String {
        let mut error_body = serde_json::Map::new();

        for key in ["detail", "non_field_errors", "error", "error_description"] {
            if let Some(value) = response.body.get(key) {
                error_body.insert(key.to_string(), value.clone());
            }
        }

        if error_body.is_empty() {
            if let Some(fields) = response.body.as_object() {
                error_body.extend(fields.clone());
            }
        }

        if let Some(request_id) = response.request_id() {
            error_body.insert(
                "error_reference".to_string(),
                serde_json::json!(format!(
                    "If you report this error, please include this id: {request_id}."
                )),
            );
        }

        serde_json::to_string(&error_body).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(None)
    }
}
