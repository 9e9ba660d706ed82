//! Pagination descriptors read from the `meta` object of list responses.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Query and envelope keys of [`DefaultPagination`].
pub mod keys {
    /// `offset`
    pub const OFFSET: &str = "offset";
    /// `limit`
    pub const LIMIT: &str = "limit";
    /// `count`
    pub const COUNT: &str = "count";
}

/// A pagination scheme.
///
/// Implementations are decoded from the `meta` object of a list response.
/// A resource selects its scheme through
/// [`ListGettable::Pagination`](crate::rest::ListGettable::Pagination).
pub trait Pagination: DeserializeOwned + fmt::Debug + Clone + Send + Sync + 'static {
    /// Offset of the next page, or `None` on the last page.
    fn next_offset(&self) -> Option<u64>;

    /// Returns `true` if another page follows.
    fn has_next_page(&self) -> bool {
        self.next_offset().is_some()
    }
}

/// The standard offset/limit/count scheme.
///
/// # Example
///
/// ```rust
/// use drf_consumer::rest::{DefaultPagination, Pagination};
///
/// let pagination: DefaultPagination =
///     serde_json::from_str(r#"{"offset":0,"limit":2,"count":5}"#).unwrap();
/// assert_eq!(pagination.total_count, 5);
/// assert_eq!(pagination.next_offset(), Some(2));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultPagination {
    /// Index of the first returned object.
    pub offset: u64,
    /// Maximum number of objects per page.
    pub limit: u64,
    /// Total number of objects.
    #[serde(rename = "count")]
    pub total_count: u64,
}

impl Pagination for DefaultPagination {
    fn next_offset(&self) -> Option<u64> {
        let next = self.offset.saturating_add(self.limit);
        (self.limit > 0 && next < self.total_count).then_some(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_last_page_has_no_next_offset() {
        let pagination = DefaultPagination {
            offset: 4,
            limit: 2,
            total_count: 5,
        };
        assert_eq!(pagination.next_offset(), None);
        assert!(!pagination.has_next_page());
    }

    #[test]
    fn test_zero_limit_never_advances() {
        let pagination = DefaultPagination {
            offset: 0,
            limit: 0,
            total_count: 5,
        };
        assert!(!pagination.has_next_page());
    }

    #[test]
    fn test_missing_field_fails_to_decode() {
        let result: Result<DefaultPagination, _> =
            serde_json::from_str(r#"{"offset":0,"limit":2}"#);
        assert!(result.is_err());
    }
}
