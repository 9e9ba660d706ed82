//! HTTP response type.

use std::collections::HashMap;

/// A parsed HTTP response.
///
/// Header names are lowercased; the body is parsed as JSON (an empty body
/// becomes `{}`).
///
/// # Example
///
/// ```rust
/// use drf_consumer::clients::HttpResponse;
/// use serde_json::json;
/// use std::collections::HashMap;
///
/// let mut headers = HashMap::new();
/// headers.insert("content-type".to_string(), vec!["application/json; charset=utf-8".to_string()]);
///
/// let response = HttpResponse::new(200, headers, json!({"id": "1"}));
/// assert_eq!(response.content_type(), Some("application/json"));
/// ```
#[derive(Clone, Debug)]
pub struct HttpResponse {
    /// The HTTP status code.
    pub code: u16,
    /// Response headers, keyed by lowercased name.
    pub headers: HashMap<String, Vec<String>>,
    /// The parsed JSON body.
    pub body: serde_json::Value,
    /// Seconds to wait before retrying, from the `Retry-After` header.
    pub retry_request_after: Option<f64>,
}

impl HttpResponse {
    /// Creates a response, parsing the `Retry-After` header.
    #[must_use]
    pub fn new(code: u16, headers: HashMap<String, Vec<String>>, body: serde_json::Value) -> Self {
        let retry_request_after = headers
            .get("retry-after")
            .and_then(|values| values.first())
            .and_then(|value| value.parse::<f64>().ok());

        Self {
            code,
            headers,
            body,
            retry_request_after,
        }
    }

    /// Returns `true` for 2xx status codes.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.code >= 200 && self.code <= 299
    }

    /// Returns the first value of a header.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    /// Returns the `X-Request-Id` header value, if present.
    #[must_use]
    pub fn request_id(&self) -> Option<&str> {
        self.header("x-request-id")
    }

    /// Returns the media type of the response, without parameters.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header("content-type")
            .map(|value| value.split(';').next().unwrap_or(value).trim())
    }

    /// Returns `true` if the response media type matches one of the
    /// accepted patterns (`*/*`, `type/*` or an exact type).
    #[must_use]
    pub fn has_acceptable_content_type(&self, acceptable: &[String]) -> bool {
        if acceptable.iter().any(|pattern| pattern == "*/*") {
            return true;
        }

        let Some(content_type) = self.content_type() else {
            return false;
        };

        acceptable.iter().any(|pattern| {
            pattern.strip_suffix("/*").map_or_else(
                || pattern.eq_ignore_ascii_case(content_type),
                |major| {
                    content_type
                        .split('/')
                        .next()
                        .is_some_and(|t| t.eq_ignore_ascii_case(major))
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response_with(headers: &[(&str, &str)]) -> HttpResponse {
        let headers = headers
            .iter()
            .map(|(k, v)| ((*k).to_string(), vec![(*v).to_string()]))
            .collect();
        HttpResponse::new(200, headers, json!({}))
    }

    #[test]
    fn test_is_ok_returns_true_for_2xx() {
        for code in 200..=299 {
            let response = HttpResponse::new(code, HashMap::new(), json!({}));
            assert!(response.is_ok(), "Expected is_ok() to be true for code {code}");
        }
        assert!(!HttpResponse::new(401, HashMap::new(), json!({})).is_ok());
    }

    #[test]
    fn test_retry_after_is_parsed() {
        let response = response_with(&[("retry-after", "2.5")]);
        assert_eq!(response.retry_request_after, Some(2.5));

        let response = response_with(&[("retry-after", "soon")]);
        assert_eq!(response.retry_request_after, None);
    }

    #[test]
    fn test_request_id() {
        let response = response_with(&[("x-request-id", "req-1")]);
        assert_eq!(response.request_id(), Some("req-1"));
    }

    #[test]
    fn test_content_type_acceptance() {
        let response = response_with(&[("content-type", "application/json; charset=utf-8")]);

        assert!(response.has_acceptable_content_type(&["*/*".to_string()]));
        assert!(response.has_acceptable_content_type(&["application/json".to_string()]));
        assert!(response.has_acceptable_content_type(&["application/*".to_string()]));
        assert!(!response.has_acceptable_content_type(&["image/*".to_string()]));
        assert!(!response.has_acceptable_content_type(&["text/html".to_string()]));
    }

    #[test]
    fn test_missing_content_type_only_matches_wildcard() {
        let response = response_with(&[]);
        assert!(response.has_acceptable_content_type(&["*/*".to_string()]));
        assert!(!response.has_acceptable_content_type(&["application/json".to_string()]));
    }
}
