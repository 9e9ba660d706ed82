//! Wire encoding of [`RequestPayload`] trees.
//!
//! The encoder walks the payload depth-first while accumulating a key
//! prefix. Nested keys compose as `outer.inner` and array items as
//! `outer[index]`. Every leaf is written both to a parameter map and to a
//! multipart map; the multipart map is only returned when a binary
//! attachment was found somewhere in the tree.

use super::request::{FormData, MimeType, RequestPayload};
use super::value::{JsonDict, PayloadValue};
use std::collections::BTreeMap;

/// Flat request parameters, keyed by top-level name.
pub type Parameters = BTreeMap<String, PayloadValue>;

/// Multipart parts keyed by their composed form key.
pub type MultipartMap = BTreeMap<String, MultipartPart>;

/// A single encoded multipart part.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartPart {
    /// Raw part content.
    pub data: Vec<u8>,
    /// Content type of the part.
    pub mime_type: MimeType,
}

/// The result of encoding a [`RequestPayload`].
///
/// The two forms are mutually exclusive.
#[derive(Clone, Debug, PartialEq)]
pub enum EncodedPayload {
    /// Flat parameters for URL, form or JSON encoding.
    Parameters(Parameters),
    /// A binary-safe multipart form.
    Multipart(MultipartMap),
}

impl EncodedPayload {
    /// Returns `true` for the multipart form.
    #[must_use]
    pub const fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }
}

/// Encodes a payload into flat parameters or a multipart form.
///
/// # Example
///
/// ```rust
/// use drf_consumer::payload::{encode, EncodedPayload, JsonDict, PayloadValue, RequestPayload};
///
/// let mut inner = JsonDict::new();
/// inner.insert("c".to_string(), PayloadValue::from(1_i64));
/// let payload = RequestPayload::Nested(
///     "a".to_string(),
///     vec![RequestPayload::Nested("b".to_string(), vec![RequestPayload::Json(inner)])],
/// );
///
/// let EncodedPayload::Parameters(params) = encode(&payload) else { panic!() };
/// assert!(params.contains_key("a.b"));
/// ```
#[must_use]
pub fn encode(payload: &RequestPayload) -> EncodedPayload {
    let mut encoder = Encoder::default();
    encoder.payload(payload, None);

    if encoder.has_attachment {
        EncodedPayload::Multipart(encoder.multipart)
    } else {
        EncodedPayload::Parameters(encoder.parameters)
    }
}

/// Flattens parameters into `(key, value)` pairs for URL or form encoding.
///
/// Nested objects use `outer.inner` keys and arrays use `outer[index]`.
/// Strings are emitted unquoted, numbers and booleans as their JSON text,
/// and `null` leaves are omitted.
#[must_use]
pub fn flatten_parameters(parameters: &Parameters) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for (key, value) in parameters {
        flatten_value(key.clone(), value, &mut pairs);
    }
    pairs
}

fn flatten_value(key: String, value: &PayloadValue, out: &mut Vec<(String, String)>) {
    match value {
        PayloadValue::Null => {}
        PayloadValue::Bool(b) => out.push((key, b.to_string())),
        PayloadValue::Number(n) => out.push((key, n.to_string())),
        PayloadValue::String(s) => out.push((key, s.clone())),
        PayloadValue::Array(items) => {
            for (index, item) in items.iter().enumerate() {
                flatten_value(indexed_key(&key, index), item, out);
            }
        }
        PayloadValue::Object(dict) => {
            for (inner, item) in dict {
                flatten_value(nested_key(Some(&key), inner), item, out);
            }
        }
    }
}

fn nested_key(outer: Option<&str>, inner: &str) -> String {
    match outer {
        Some(outer) => format!("{outer}.{inner}"),
        None => inner.to_string(),
    }
}

fn indexed_key(key: &str, index: usize) -> String {
    format!("{key}[{index}]")
}

/// Deep-merges `source` into `target`; later keys win.
fn merge_object(target: &mut JsonDict, source: &JsonDict) {
    for (key, value) in source {
        match (target.get_mut(key), value) {
            (Some(PayloadValue::Object(existing)), PayloadValue::Object(incoming)) => {
                merge_object(existing, incoming);
            }
            _ => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

#[derive(Default)]
struct Encoder {
    parameters: Parameters,
    multipart: MultipartMap,
    has_attachment: bool,
}

impl Encoder {
    fn payload(&mut self, payload: &RequestPayload, prefix: Option<&str>) {
        match payload {
            RequestPayload::Json(dict) => self.json(dict, prefix),
            RequestPayload::Multipart(forms) => {
                for form in forms {
                    self.form(form, prefix);
                }
            }
            RequestPayload::Nested(key, children) => {
                let inner = nested_key(prefix, key);
                for child in children {
                    self.payload(child, Some(&inner));
                }
            }
        }
    }

    fn form(&mut self, form: &FormData, prefix: Option<&str>) {
        match form {
            FormData::Json(dict) => self.json(dict, prefix),
            FormData::Attachment {
                key,
                data,
                mime_type,
            } => {
                self.has_attachment = true;
                self.multipart.insert(
                    nested_key(prefix, key),
                    MultipartPart {
                        data: data.clone(),
                        mime_type: mime_type.clone(),
                    },
                );
            }
            FormData::Nested(entries) => {
                for (key, child) in entries {
                    let inner = nested_key(prefix, key);
                    self.payload(child, Some(&inner));
                }
            }
        }
    }

    fn json(&mut self, dict: &JsonDict, prefix: Option<&str>) {
        match prefix {
            None => {
                for (key, value) in dict {
                    self.parameters.insert(key.clone(), value.clone());
                }
            }
            Some(prefix) => match self.parameters.get_mut(prefix) {
                Some(PayloadValue::Object(existing)) => merge_object(existing, dict),
                _ => {
                    self.parameters
                        .insert(prefix.to_string(), PayloadValue::Object(dict.clone()));
                }
            },
        }

        for (key, value) in dict {
            self.mirror(nested_key(prefix, key), value);
        }
    }

    fn mirror(&mut self, key: String, value: &PayloadValue) {
        match value {
            PayloadValue::Object(dict) => {
                for (inner, item) in dict {
                    self.mirror(nested_key(Some(&key), inner), item);
                }
            }
            PayloadValue::Array(items) => {
                for (index, item) in items.iter().enumerate() {
                    self.mirror(indexed_key(&key, index), item);
                }
            }
            leaf => {
                self.multipart.insert(
                    key,
                    MultipartPart {
                        data: leaf.to_bytes(),
                        mime_type: MimeType::Json,
                    },
                );
            }
        }
    }
}
