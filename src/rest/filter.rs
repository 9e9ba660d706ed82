//! List query filters using Django field lookups.

use crate::payload::{Parameters, PayloadValue};
use std::fmt;

/// A Django field lookup, appended to the field name as `__<lookup>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Comparator {
    /// Plain equality; no suffix.
    Equals,
    /// `__exact`
    Exact,
    /// `__iexact`
    IExact,
    /// `__contains`
    Contains,
    /// `__icontains`
    IContains,
    /// `__in`
    In,
    /// `__gt`
    Gt,
    /// `__gte`
    Gte,
    /// `__lt`
    Lt,
    /// `__lte`
    Lte,
    /// `__startswith`
    StartsWith,
    /// `__istartswith`
    IStartsWith,
    /// `__endswith`
    EndsWith,
    /// `__iendswith`
    IEndsWith,
    /// `__range`
    Range,
    /// `__isnull`
    IsNull,
    /// `__regex`
    Regex,
    /// `__iregex`
    IRegex,
    /// Any other lookup, given without the leading `__`.
    Custom(String),
}

impl Comparator {
    /// Returns the key suffix including the leading `__`, or `""` for
    /// [`Comparator::Equals`].
    #[must_use]
    pub fn suffix(&self) -> String {
        let lookup = match self {
            Self::Equals => return String::new(),
            Self::Exact => "exact",
            Self::IExact => "iexact",
            Self::Contains => "contains",
            Self::IContains => "icontains",
            Self::In => "in",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::StartsWith => "startswith",
            Self::IStartsWith => "istartswith",
            Self::EndsWith => "endswith",
            Self::IEndsWith => "iendswith",
            Self::Range => "range",
            Self::IsNull => "isnull",
            Self::Regex => "regex",
            Self::IRegex => "iregex",
            Self::Custom(lookup) => lookup,
        };
        format!("__{lookup}")
    }
}

/// A single list filter: `field`, lookup and value.
///
/// # Example
///
/// ```rust
/// use drf_consumer::rest::{Comparator, Filter};
///
/// let filter = Filter::new("name", Comparator::IContains, "blubb");
/// assert_eq!(filter.key(), "name__icontains");
/// assert_eq!(filter.value().as_str(), Some("blubb"));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Filter {
    field: String,
    comparator: Comparator,
    value: PayloadValue,
}

impl Filter {
    /// Creates a filter.
    #[must_use]
    pub fn new(
        field: impl Into<String>,
        comparator: Comparator,
        value: impl Into<PayloadValue>,
    ) -> Self {
        Self {
            field: field.into(),
            comparator,
            value: value.into(),
        }
    }

    /// Creates an equality filter.
    #[must_use]
    pub fn equals(field: impl Into<String>, value: impl Into<PayloadValue>) -> Self {
        Self::new(field, Comparator::Equals, value)
    }

    /// The filtered field.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The lookup.
    #[must_use]
    pub const fn comparator(&self) -> &Comparator {
        &self.comparator
    }

    /// The filter value.
    #[must_use]
    pub const fn value(&self) -> &PayloadValue {
        &self.value
    }

    /// The query parameter key, e.g. `name__icontains`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}{}", self.field, self.comparator.suffix())
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key(), self.value.to_json())
    }
}

/// Builds query parameters from filters. Later filters win on key collision.
#[must_use]
pub fn parameters_from_filters(filters: &[Filter]) -> Parameters {
    filters
        .iter()
        .map(|filter| (filter.key(), filter.value.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equals_has_no_suffix() {
        assert_eq!(Filter::equals("id", 3_i64).key(), "id");
    }

    #[test]
    fn test_lookup_suffixes() {
        assert_eq!(Filter::new("date", Comparator::Gte, "2018-01-01").key(), "date__gte");
        assert_eq!(Filter::new("owner", Comparator::IsNull, true).key(), "owner__isnull");
        assert_eq!(
            Filter::new("name", Comparator::Custom("unaccent".into()), "a").key(),
            "name__unaccent"
        );
    }

    #[test]
    fn test_parameters_from_filters_later_wins() {
        let parameters = parameters_from_filters(&[
            Filter::new("name", Comparator::IContains, "first"),
            Filter::new("name", Comparator::IContains, "second"),
            Filter::equals("id", 7_i64),
        ]);
        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters["name__icontains"], PayloadValue::from("second"));
        assert_eq!(parameters["id"], PayloadValue::from(7_i64));
    }

    #[test]
    fn test_display() {
        let filter = Filter::new("name", Comparator::IContains, "x");
        assert_eq!(filter.to_string(), r#"name__icontains="x""#);
    }
}
