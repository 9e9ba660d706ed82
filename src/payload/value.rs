//! The JSON-like value tree carried by request payloads.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// An ordered map of payload values, keyed by field name.
pub type JsonDict = BTreeMap<String, PayloadValue>;

/// A JSON-like value: string, number, boolean, null, array or object.
///
/// Objects are kept in a [`BTreeMap`] so that encoding is deterministic
/// regardless of insertion order.
///
/// # Example
///
/// ```rust
/// use drf_consumer::payload::PayloadValue;
///
/// let value = PayloadValue::from_bytes(br#"{"name":"widget","tags":["a"]}"#).unwrap();
/// assert_eq!(value.get("name").and_then(PayloadValue::as_str), Some("widget"));
/// assert_eq!(value.to_bytes(), br#"{"name":"widget","tags":["a"]}"#.to_vec());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadValue {
    /// JSON `null`.
    Null,
    /// A boolean.
    Bool(bool),
    /// An integer or floating point number.
    Number(serde_json::Number),
    /// A string.
    String(String),
    /// An ordered list of values.
    Array(Vec<PayloadValue>),
    /// A map of named values.
    Object(JsonDict),
}

impl PayloadValue {
    /// Parses a value from raw JSON bytes.
    ///
    /// # Errors
    ///
    /// Returns the parser error if the bytes are not valid JSON.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }

    /// Renders the value as compact JSON bytes.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_string().into_bytes()
    }

    /// Converts into a [`serde_json::Value`].
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::Null => serde_json::Value::Null,
            Self::Bool(b) => serde_json::Value::Bool(*b),
            Self::Number(n) => serde_json::Value::Number(n.clone()),
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Array(items) => {
                serde_json::Value::Array(items.iter().map(Self::to_json).collect())
            }
            Self::Object(dict) => serde_json::Value::Object(
                dict.iter().map(|(k, v)| (k.clone(), v.to_json())).collect(),
            ),
        }
    }

    /// Returns `true` for `null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the string if this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the map if this is an object value.
    #[must_use]
    pub const fn as_object(&self) -> Option<&JsonDict> {
        match self {
            Self::Object(dict) => Some(dict),
            _ => None,
        }
    }

    /// Returns the items if this is an array value.
    #[must_use]
    pub fn as_array(&self) -> Option<&[Self]> {
        match self {
            Self::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Looks up a field of an object value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_object().and_then(|dict| dict.get(key))
    }
}

impl fmt::Display for PayloadValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_json())
    }
}

impl From<serde_json::Value> for PayloadValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Array(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => {
                Self::Object(map.into_iter().map(|(k, v)| (k, Self::from(v))).collect())
            }
        }
    }
}

impl From<bool> for PayloadValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for PayloadValue {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u64> for PayloadValue {
    fn from(value: u64) -> Self {
        Self::Number(value.into())
    }
}

impl From<u32> for PayloadValue {
    fn from(value: u32) -> Self {
        Self::Number(value.into())
    }
}

impl From<i32> for PayloadValue {
    fn from(value: i32) -> Self {
        Self::Number(value.into())
    }
}

/// Non-finite floats have no JSON representation and become `null`.
impl From<f64> for PayloadValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Self::Null, Self::Number)
    }
}

impl From<&str> for PayloadValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PayloadValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<JsonDict> for PayloadValue {
    fn from(value: JsonDict) -> Self {
        Self::Object(value)
    }
}

impl<T: Into<Self>> From<Vec<T>> for PayloadValue {
    fn from(value: Vec<T>) -> Self {
        Self::Array(value.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for PayloadValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_bytes_parses_nested_structures() {
        let value = PayloadValue::from_bytes(br#"{"a":{"b":[1,true,null]}}"#).unwrap();
        let inner = value.get("a").and_then(|a| a.get("b")).unwrap();
        assert_eq!(
            inner.as_array().unwrap(),
            &[
                PayloadValue::from(1_i64),
                PayloadValue::Bool(true),
                PayloadValue::Null
            ]
        );
    }

    #[test]
    fn test_to_bytes_is_compact_json() {
        assert_eq!(PayloadValue::from("x").to_bytes(), b"\"x\"".to_vec());
        assert_eq!(PayloadValue::Null.to_bytes(), b"null".to_vec());
        assert_eq!(PayloadValue::from(42_u64).to_bytes(), b"42".to_vec());
        assert_eq!(PayloadValue::from(false).to_bytes(), b"false".to_vec());
    }

    #[test]
    fn test_object_keys_are_sorted() {
        let value = PayloadValue::from(json!({"b": 1, "a": 2}));
        assert_eq!(value.to_string(), r#"{"a":2,"b":1}"#);
    }

    #[test]
    fn test_from_bytes_rejects_invalid_json() {
        assert!(PayloadValue::from_bytes(b"{not json").is_err());
    }

    #[test]
    fn test_non_finite_float_becomes_null() {
        assert!(PayloadValue::from(f64::NAN).is_null());
        assert_eq!(PayloadValue::from(1.5).to_string(), "1.5");
    }

    #[test]
    fn test_option_conversion() {
        assert!(PayloadValue::from(None::<String>).is_null());
        assert_eq!(PayloadValue::from(Some("x")).as_str(), Some("x"));
    }

    #[test]
    fn test_deserialize_and_json_conversion_agree() {
        let raw = json!({"list": [1, "two", {"three": 3.5}], "flag": null});
        let via_serde: PayloadValue = serde_json::from_value(raw.clone()).unwrap();
        let via_from = PayloadValue::from(raw.clone());
        assert_eq!(via_serde, via_from);
        assert_eq!(via_from.to_json(), raw);
    }
}
