//! Decoding of list and detail response bodies.
//!
//! List responses use a fixed envelope:
//!
//! ```json
//! {"meta": {"offset": 0, "limit": 2, "count": 5}, "results": [{"id": "1"}, {"id": "2"}]}
//! ```
//!
//! Every element of `results` is decoded independently; a decode failure
//! reports the JSON path of the offending value.

use crate::rest::errors::ResourceError;
use crate::rest::pagination::Pagination;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Key of the pagination object.
pub const META_KEY: &str = "meta";
/// Key of the object array.
pub const RESULTS_KEY: &str = "results";
/// Key under which list POST payloads carry their objects.
pub const OBJECTS_KEY: &str = "objects";

fn decode<T: DeserializeOwned>(value: &Value, root: &str) -> Result<T, ResourceError> {
    serde_path_to_error::deserialize(value).map_err(|error| {
        let inner = error.path().to_string();
        let path = match (root.is_empty(), inner.as_str()) {
            (true, _) => inner.clone(),
            (false, ".") => root.to_string(),
            (false, _) if inner.starts_with('[') => format!("{root}{inner}"),
            (false, _) => format!("{root}.{inner}"),
        };
        ResourceError::Decode {
            path,
            message: error.into_inner().to_string(),
        }
    })
}

/// Decodes the `meta` object of a list response.
///
/// # Errors
///
/// Returns [`ResourceError::MissingMeta`] if there is no `meta` key and
/// [`ResourceError::Decode`] if it does not match `P`.
pub fn extract_pagination<P: Pagination>(body: &Value) -> Result<P, ResourceError> {
    let meta = body.get(META_KEY).ok_or(ResourceError::MissingMeta)?;
    decode(meta, META_KEY)
}

/// Decodes every element of the `results` array, in order.
///
/// # Errors
///
/// Returns [`ResourceError::MissingResults`] if `results` is absent or not
/// an array, and [`ResourceError::Decode`] for the first element that does
/// not decode.
pub fn extract_objects<T: DeserializeOwned>(body: &Value) -> Result<Vec<T>, ResourceError> {
    let results = body
        .get(RESULTS_KEY)
        .and_then(Value::as_array)
        .ok_or(ResourceError::MissingResults)?;

    results
        .iter()
        .enumerate()
        .map(|(index, element)| decode(element, &format!("{RESULTS_KEY}[{index}]")))
        .collect()
}

/// Decodes a list GET response into its pagination and objects.
///
/// # Errors
///
/// See [`extract_pagination`] and [`extract_objects`].
pub fn extract_list_response<T: DeserializeOwned, P: Pagination>(
    body: &Value,
) -> Result<(P, Vec<T>), ResourceError> {
    let pagination = extract_pagination(body)?;
    let objects = extract_objects(body)?;
    Ok((pagination, objects))
}

/// Decodes a list POST response, which carries `results` but no `meta`.
///
/// # Errors
///
/// See [`extract_objects`].
pub fn extract_post_list_response<T: DeserializeOwned>(
    body: &Value,
) -> Result<Vec<T>, ResourceError> {
    extract_objects(body)
}

/// Decodes a detail response body.
///
/// # Errors
///
/// Returns [`ResourceError::Decode`] if the body does not match `T`.
pub fn extract_single_object<T: DeserializeOwned>(body: &Value) -> Result<T, ResourceError> {
    decode(body, "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rest::DefaultPagination;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Widget {
        id: String,
        #[serde(default)]
        size: Option<u32>,
    }

    #[test]
    fn test_extract_list_response_keeps_order() {
        let body = json!({
            "meta": {"offset": 0, "limit": 2, "count": 5},
            "results": [{"id": "1"}, {"id": "2"}]
        });

        let (pagination, widgets): (DefaultPagination, Vec<Widget>) =
            extract_list_response(&body).unwrap();

        assert_eq!(
            pagination,
            DefaultPagination {
                offset: 0,
                limit: 2,
                total_count: 5
            }
        );
        let ids: Vec<&str> = widgets.iter().map(|w| w.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[test]
    fn test_missing_results_is_an_error() {
        let body = json!({"meta": {"offset": 0, "limit": 2, "count": 0}});
        let result: Result<Vec<Widget>, _> = extract_objects(&body);
        assert!(matches!(result, Err(ResourceError::MissingResults)));
    }

    #[test]
    fn test_non_array_results_is_an_error() {
        let body = json!({"results": {"id": "1"}});
        let result: Result<Vec<Widget>, _> = extract_objects(&body);
        assert!(matches!(result, Err(ResourceError::MissingResults)));
    }

    #[test]
    fn test_empty_results_is_an_empty_list() {
        let body = json!({"results": []});
        let widgets: Vec<Widget> = extract_objects(&body).unwrap();
        assert!(widgets.is_empty());
    }

    #[test]
    fn test_missing_meta_is_an_error() {
        let body = json!({"results": []});
        let result: Result<DefaultPagination, _> = extract_pagination(&body);
        assert!(matches!(result, Err(ResourceError::MissingMeta)));
    }

    #[test]
    fn test_decode_error_reports_element_path() {
        let body = json!({"results": [{"id": "1"}, {"id": "2", "size": "large"}]});
        let result: Result<Vec<Widget>, _> = extract_objects(&body);
        let Err(ResourceError::Decode { path, .. }) = result else {
            panic!("Expected Decode error");
        };
        assert_eq!(path, "results[1].size");
    }

    #[test]
    fn test_decode_error_reports_missing_field_at_element() {
        let body = json!({"results": [{"size": 1}]});
        let result: Result<Vec<Widget>, _> = extract_objects(&body);
        let Err(ResourceError::Decode { path, message }) = result else {
            panic!("Expected Decode error");
        };
        assert_eq!(path, "results[0]");
        assert!(message.contains("id"));
    }

    #[test]
    fn test_decode_error_reports_meta_path() {
        let body = json!({"meta": {"offset": "zero", "limit": 2, "count": 5}, "results": []});
        let result: Result<DefaultPagination, _> = extract_pagination(&body);
        let Err(ResourceError::Decode { path, .. }) = result else {
            panic!("Expected Decode error");
        };
        assert_eq!(path, "meta.offset");
    }

    #[test]
    fn test_extract_single_object() {
        let widget: Widget = extract_single_object(&json!({"id": "9", "size": 3})).unwrap();
        assert_eq!(
            widget,
            Widget {
                id: "9".to_string(),
                size: Some(3)
            }
        );

        let result: Result<Widget, _> = extract_single_object(&json!({"id": 9}));
        let Err(ResourceError::Decode { path, .. }) = result else {
            panic!("Expected Decode error");
        };
        assert_eq!(path, "id");
    }

    #[test]
    fn test_post_list_response_ignores_meta() {
        let body = json!({"results": [{"id": "a"}]});
        let widgets: Vec<Widget> = extract_post_list_response(&body).unwrap();
        assert_eq!(widgets.len(), 1);
    }
}
