//! Request payload trees built before wire encoding.

use super::value::{JsonDict, PayloadValue};
use super::PayloadError;
use serde::Serialize;
use std::fmt;

/// Content type of a multipart part.
///
/// The base set covers JSON values and the two common image formats;
/// [`MimeType::Other`] carries anything else.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum MimeType {
    /// `application/json`
    Json,
    /// `image/jpeg`
    Jpeg,
    /// `image/png`
    Png,
    /// Any other content type.
    Other(String),
}

impl MimeType {
    /// Returns the content type string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Json => "application/json",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
            Self::Other(value) => value,
        }
    }

    /// Returns the conventional file extension, if known.
    #[must_use]
    pub const fn file_extension(&self) -> Option<&'static str> {
        match self {
            Self::Json => Some("json"),
            Self::Jpeg => Some("jpg"),
            Self::Png => Some("png"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for MimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outgoing request body before it is encoded for the wire.
///
/// Whether the body is sent as flat parameters or as `multipart/form-data`
/// is derived from its shape by [`encode`](super::encode): the presence of
/// any [`FormData::Attachment`] in the tree selects multipart.
///
/// # Example
///
/// ```rust
/// use drf_consumer::payload::{
///     encode, EncodedPayload, FormData, JsonDict, MimeType, PayloadValue, RequestPayload,
/// };
///
/// let mut fields = JsonDict::new();
/// fields.insert("name".to_string(), PayloadValue::from("avatar"));
///
/// let payload = RequestPayload::Multipart(vec![
///     FormData::Json(fields),
///     FormData::Attachment {
///         key: "image".to_string(),
///         data: vec![0xFF, 0xD8],
///         mime_type: MimeType::Jpeg,
///     },
/// ]);
///
/// let EncodedPayload::Multipart(parts) = encode(&payload) else { panic!() };
/// assert_eq!(parts["image"].mime_type, MimeType::Jpeg);
/// assert_eq!(parts["name"].data, b"\"avatar\"".to_vec());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum RequestPayload {
    /// A JSON object, merged at the current key prefix.
    Json(JsonDict),
    /// A list of form data entries, all at the current key prefix.
    Multipart(Vec<FormData>),
    /// Child payloads placed under an additional key segment.
    Nested(String, Vec<RequestPayload>),
}

/// One entry of a multipart payload.
#[derive(Clone, Debug, PartialEq)]
pub enum FormData {
    /// A JSON object, merged at the current key prefix.
    Json(JsonDict),
    /// Raw binary content stored under `key`.
    Attachment {
        /// Key of the part, relative to the current prefix.
        key: String,
        /// Raw content.
        data: Vec<u8>,
        /// Content type of the part.
        mime_type: MimeType,
    },
    /// Keyed child payloads, each placed under its own key segment.
    Nested(Vec<(String, RequestPayload)>),
}

impl RequestPayload {
    /// Builds a JSON payload from any serializable object.
    ///
    /// # Errors
    ///
    /// Returns [`PayloadError::Serialize`] if serialization fails and
    /// [`PayloadError::NotAnObject`] if the value is not a JSON object.
    pub fn from_serialize<T: Serialize + ?Sized>(object: &T) -> Result<Self, PayloadError> {
        match PayloadValue::from(serde_json::to_value(object)?) {
            PayloadValue::Object(dict) => Ok(Self::Json(dict)),
            other => Err(PayloadError::NotAnObject {
                found: kind_name(&other),
            }),
        }
    }

    /// Places each item under an indexed key (`key[0]`, `key[1]`, ...).
    ///
    /// When every item is a plain JSON object the result is a single JSON
    /// object holding an array under `key`, so it can also be sent as a
    /// JSON body. Otherwise the items become keyed multipart entries.
    #[must_use]
    pub fn indexed(key: &str, items: Vec<Self>) -> Self {
        if items.iter().all(|item| matches!(item, Self::Json(_))) {
            let array = items
                .into_iter()
                .filter_map(|item| match item {
                    Self::Json(dict) => Some(PayloadValue::Object(dict)),
                    _ => None,
                })
                .collect();
            let mut dict = JsonDict::new();
            dict.insert(key.to_string(), PayloadValue::Array(array));
            return Self::Json(dict);
        }

        let entries = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| (format!("{key}[{index}]"), item))
            .collect();
        Self::Multipart(vec![FormData::Nested(entries)])
    }

    /// Returns `true` if a binary attachment appears anywhere in the tree.
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        match self {
            Self::Json(_) => false,
            Self::Multipart(forms) => forms.iter().any(FormData::has_attachment),
            Self::Nested(_, children) => children.iter().any(Self::has_attachment),
        }
    }
}

impl FormData {
    /// Returns `true` if this entry is or contains a binary attachment.
    #[must_use]
    pub fn has_attachment(&self) -> bool {
        match self {
            Self::Json(_) => false,
            Self::Attachment { .. } => true,
            Self::Nested(entries) => entries.iter().any(|(_, payload)| payload.has_attachment()),
        }
    }
}

const fn kind_name(value: &PayloadValue) -> &'static str {
    match value {
        PayloadValue::Null => "null",
        PayloadValue::Bool(_) => "boolean",
        PayloadValue::Number(_) => "number",
        PayloadValue::String(_) => "string",
        PayloadValue::Array(_) => "array",
        PayloadValue::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Widget {
        name: String,
        count: u32,
        note: Option<String>,
    }

    fn dict(pairs: &[(&str, PayloadValue)]) -> JsonDict {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_from_serialize_builds_json_payload() {
        let widget = Widget {
            name: "w".to_string(),
            count: 3,
            note: None,
        };
        let payload = RequestPayload::from_serialize(&widget).unwrap();
        assert_eq!(
            payload,
            RequestPayload::Json(dict(&[
                ("count", 3_u32.into()),
                ("name", "w".into()),
                ("note", PayloadValue::Null),
            ]))
        );
    }

    #[test]
    fn test_from_serialize_rejects_non_objects() {
        let result = RequestPayload::from_serialize(&vec![1, 2]);
        assert!(matches!(
            result,
            Err(PayloadError::NotAnObject { found: "array" })
        ));
    }

    #[test]
    fn test_indexed_json_items_become_array() {
        let payload = RequestPayload::indexed(
            "objects",
            vec![
                RequestPayload::Json(dict(&[("name", "a".into())])),
                RequestPayload::Json(dict(&[("name", "b".into())])),
            ],
        );
        let RequestPayload::Json(body) = payload else {
            panic!("expected json payload");
        };
        assert_eq!(body["objects"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_indexed_items_with_attachments_use_indexed_keys() {
        let with_image = RequestPayload::Multipart(vec![FormData::Attachment {
            key: "image".to_string(),
            data: vec![1],
            mime_type: MimeType::Png,
        }]);
        let payload = RequestPayload::indexed(
            "objects",
            vec![RequestPayload::Json(JsonDict::new()), with_image],
        );
        assert!(payload.has_attachment());

        let RequestPayload::Multipart(forms) = payload else {
            panic!("expected multipart payload");
        };
        let FormData::Nested(entries) = &forms[0] else {
            panic!("expected nested form data");
        };
        let keys: Vec<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["objects[0]", "objects[1]"]);
    }

    #[test]
    fn test_structural_equality() {
        let a = RequestPayload::Nested("a".into(), vec![RequestPayload::Json(JsonDict::new())]);
        let b = RequestPayload::Nested("a".into(), vec![RequestPayload::Json(JsonDict::new())]);
        let c = RequestPayload::Nested("b".into(), vec![RequestPayload::Json(JsonDict::new())]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_mime_type_strings() {
        assert_eq!(MimeType::Json.as_str(), "application/json");
        assert_eq!(MimeType::Jpeg.to_string(), "image/jpeg");
        assert_eq!(MimeType::Png.file_extension(), Some("png"));
        assert_eq!(MimeType::Other("text/csv".into()).as_str(), "text/csv");
    }
}
