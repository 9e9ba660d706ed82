//! Typed resource identifiers.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// A non-empty identifier of one instance of resource type `T`.
///
/// The type parameter keeps ids of different resources apart at compile
/// time; it does not need to implement any trait.
///
/// Deserialization accepts JSON strings and integers, since Django
/// primary keys are often numeric.
///
/// # Example
///
/// ```rust
/// use drf_consumer::routing::ResourceId;
///
/// struct Widget;
///
/// let id: ResourceId<Widget> = ResourceId::new("42").unwrap();
/// assert_eq!(id.as_str(), "42");
/// assert!(ResourceId::<Widget>::new("").is_none());
/// ```
pub struct ResourceId<T: ?Sized> {
    value: String,
    _resource: PhantomData<fn() -> T>,
}

impl<T: ?Sized> ResourceId<T> {
    /// Creates an id, or `None` for an empty string.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            return None;
        }
        Some(Self {
            value,
            _resource: PhantomData,
        })
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Consumes the id and returns the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.value
    }
}

impl<T: ?Sized> Clone for ResourceId<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            _resource: PhantomData,
        }
    }
}

impl<T: ?Sized> PartialEq for ResourceId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl<T: ?Sized> Eq for ResourceId<T> {}

impl<T: ?Sized> Hash for ResourceId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl<T: ?Sized> fmt::Debug for ResourceId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ResourceId").field(&self.value).finish()
    }
}

impl<T: ?Sized> fmt::Display for ResourceId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl<T: ?Sized> AsRef<str> for ResourceId<T> {
    fn as_ref(&self) -> &str {
        &self.value
    }
}

impl<T: ?Sized> Serialize for ResourceId<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.value)
    }
}

impl<'de, T: ?Sized> Deserialize<'de> for ResourceId<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(IdVisitor(PhantomData))
    }
}

struct IdVisitor<T: ?Sized>(PhantomData<fn() -> T>);

impl<'de, T: ?Sized> Visitor<'de> for IdVisitor<T> {
    type Value = ResourceId<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a non-empty string or integer id")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        ResourceId::new(value).ok_or_else(|| E::custom("resource id cannot be empty"))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        ResourceId::new(value).ok_or_else(|| E::custom("resource id cannot be empty"))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        self.visit_string(value.to_string())
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        self.visit_string(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Widget;

    #[derive(Debug, Deserialize)]
    struct Record {
        id: Option<ResourceId<Widget>>,
    }

    #[test]
    fn test_empty_id_is_rejected() {
        assert!(ResourceId::<Widget>::new("").is_none());
        assert!(ResourceId::<Widget>::new("x").is_some());
    }

    #[test]
    fn test_ids_compare_by_value() {
        let a = ResourceId::<Widget>::new("1").unwrap();
        let b = ResourceId::<Widget>::new("1").unwrap();
        assert_eq!(a, b.clone());
        assert_eq!(format!("{a:?}"), "ResourceId(\"1\")");
        assert_eq!(a.to_string(), "1");
    }

    #[test]
    fn test_deserialize_accepts_strings_and_integers() {
        let from_string: Record = serde_json::from_str(r#"{"id":"abc"}"#).unwrap();
        let from_number: Record = serde_json::from_str(r#"{"id":17}"#).unwrap();
        let from_null: Record = serde_json::from_str(r#"{"id":null}"#).unwrap();

        assert_eq!(from_string.id.unwrap().as_str(), "abc");
        assert_eq!(from_number.id.unwrap().as_str(), "17");
        assert!(from_null.id.is_none());
    }

    #[test]
    fn test_deserialize_rejects_empty_string() {
        let result: Result<Record, _> = serde_json::from_str(r#"{"id":""}"#);
        assert!(result.unwrap_err().to_string().contains("cannot be empty"));
    }

    #[test]
    fn test_serialize_as_string() {
        let id = ResourceId::<Widget>::new("9").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), r#""9""#);
    }
}
