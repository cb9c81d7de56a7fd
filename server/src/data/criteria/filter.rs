//! Filter value objects
//!
//! Typed per-field filters used by criteria types, and the untyped
//! [`FieldFilter`] sum type the compiler matches on. A typed filter is built
//! by value (every builder method consumes and returns the filter), so a
//! criteria holding filters can be cloned and compared without aliasing.

use std::fmt;

use chrono::{DateTime, Utc};

/// A value bound into a compiled query
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Integer(i64),
    Text(String),
    Bool(bool),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Integer(v) => write!(f, "{}", v),
            SqlValue::Text(v) => write!(f, "{}", v),
            SqlValue::Bool(v) => write!(f, "{}", v),
        }
    }
}

/// Semantic column types a filter can be declared over
pub trait FilterValue: Clone + PartialEq + fmt::Debug + fmt::Display {
    /// Boolean columns compile to inline literals instead of bound parameters
    const BOOLEAN: bool = false;

    fn to_sql_value(&self) -> SqlValue;

    /// Parse a raw query parameter value
    fn parse_param(raw: &str) -> Result<Self, String>;
}

impl FilterValue for i64 {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Integer(*self)
    }

    fn parse_param(raw: &str) -> Result<Self, String> {
        raw.trim()
            .parse::<i64>()
            .map_err(|_| format!("'{}' is not a valid integer", raw))
    }
}

impl FilterValue for String {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Text(self.clone())
    }

    fn parse_param(raw: &str) -> Result<Self, String> {
        Ok(raw.to_string())
    }
}

impl FilterValue for bool {
    const BOOLEAN: bool = true;

    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Bool(*self)
    }

    fn parse_param(raw: &str) -> Result<Self, String> {
        match raw.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(format!("'{}' is not a valid boolean", raw)),
        }
    }
}

/// Instants are stored as unix milliseconds
impl FilterValue for DateTime<Utc> {
    fn to_sql_value(&self) -> SqlValue {
        SqlValue::Integer(self.timestamp_millis())
    }

    fn parse_param(raw: &str) -> Result<Self, String> {
        DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|_| format!("'{}' is not an ISO 8601 instant", raw))
    }
}

// ============================================================================
// Typed filters
// ============================================================================

/// Equality-family filter: equals, notEquals, in, notIn, specified
#[derive(Debug, Clone, PartialEq)]
pub struct Filter<T> {
    equals: Option<T>,
    not_equals: Option<T>,
    in_values: Option<Vec<T>>,
    not_in_values: Option<Vec<T>>,
    specified: Option<bool>,
}

/// Filter over a boolean column
pub type BooleanFilter = Filter<bool>;

/// Filter over a fixed enumeration
pub type EnumFilter<E> = Filter<E>;

impl<T> Default for Filter<T> {
    fn default() -> Self {
        Self {
            equals: None,
            not_equals: None,
            in_values: None,
            not_in_values: None,
            specified: None,
        }
    }
}

impl<T: FilterValue> Filter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(mut self, value: T) -> Self {
        self.equals = Some(value);
        self
    }

    pub fn not_equals(mut self, value: T) -> Self {
        self.not_equals = Some(value);
        self
    }

    /// Appends to any values already present
    pub fn in_values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.in_values
            .get_or_insert_with(Vec::new)
            .extend(values);
        self
    }

    /// Appends to any values already present
    pub fn not_in_values(mut self, values: impl IntoIterator<Item = T>) -> Self {
        self.not_in_values
            .get_or_insert_with(Vec::new)
            .extend(values);
        self
    }

    pub fn specified(mut self, specified: bool) -> Self {
        self.specified = Some(specified);
        self
    }

    /// True when no operator is set
    pub fn is_empty(&self) -> bool {
        self.equals.is_none()
            && self.not_equals.is_none()
            && self.in_values.is_none()
            && self.not_in_values.is_none()
            && self.specified.is_none()
    }

    fn to_ops(&self) -> EqualityOps {
        EqualityOps {
            equals: self.equals.as_ref().map(FilterValue::to_sql_value),
            not_equals: self.not_equals.as_ref().map(FilterValue::to_sql_value),
            in_values: self
                .in_values
                .as_ref()
                .map(|vs| vs.iter().map(FilterValue::to_sql_value).collect()),
            not_in_values: self
                .not_in_values
                .as_ref()
                .map(|vs| vs.iter().map(FilterValue::to_sql_value).collect()),
            specified: self.specified,
        }
    }

    fn describe(&self, parts: &mut Vec<String>) {
        if let Some(v) = &self.equals {
            parts.push(format!("equals={}", v));
        }
        if let Some(v) = &self.not_equals {
            parts.push(format!("notEquals={}", v));
        }
        if let Some(vs) = &self.in_values {
            parts.push(format!("in={}", join_values(vs)));
        }
        if let Some(vs) = &self.not_in_values {
            parts.push(format!("notIn={}", join_values(vs)));
        }
        if let Some(v) = self.specified {
            parts.push(format!("specified={}", v));
        }
    }
}

/// Range filter over an ordered column
#[derive(Debug, Clone, PartialEq)]
pub struct RangeFilter<T> {
    base: Filter<T>,
    greater_than: Option<T>,
    less_than: Option<T>,
    greater_than_or_equal: Option<T>,
    less_than_or_equal: Option<T>,
}

impl<T> Default for RangeFilter<T> {
    fn default() -> Self {
        Self {
            base: Filter::default(),
            greater_than: None,
            less_than: None,
            greater_than_or_equal: None,
            less_than_or_equal: None,
        }
    }
}

impl<T: FilterValue + PartialOrd> RangeFilter<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(self, value: T) -> Self {
        Self {
            base: self.base.equals(value),
            ..self
        }
    }

    pub fn not_equals(self, value: T) -> Self {
        Self {
            base: self.base.not_equals(value),
            ..self
        }
    }

    pub fn in_values(self, values: impl IntoIterator<Item = T>) -> Self {
        Self {
            base: self.base.in_values(values),
            ..self
        }
    }

    pub fn not_in_values(self, values: impl IntoIterator<Item = T>) -> Self {
        Self {
            base: self.base.not_in_values(values),
            ..self
        }
    }

    pub fn specified(self, specified: bool) -> Self {
        Self {
            base: self.base.specified(specified),
            ..self
        }
    }

    pub fn greater_than(mut self, value: T) -> Self {
        self.greater_than = Some(value);
        self
    }

    pub fn less_than(mut self, value: T) -> Self {
        self.less_than = Some(value);
        self
    }

    pub fn greater_than_or_equal(mut self, value: T) -> Self {
        self.greater_than_or_equal = Some(value);
        self
    }

    pub fn less_than_or_equal(mut self, value: T) -> Self {
        self.less_than_or_equal = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty()
            && self.greater_than.is_none()
            && self.less_than.is_none()
            && self.greater_than_or_equal.is_none()
            && self.less_than_or_equal.is_none()
    }

    fn to_range_ops(&self) -> RangeOps {
        RangeOps {
            greater_than: self.greater_than.as_ref().map(FilterValue::to_sql_value),
            less_than: self.less_than.as_ref().map(FilterValue::to_sql_value),
            greater_than_or_equal: self
                .greater_than_or_equal
                .as_ref()
                .map(FilterValue::to_sql_value),
            less_than_or_equal: self
                .less_than_or_equal
                .as_ref()
                .map(FilterValue::to_sql_value),
        }
    }
}

/// String filter with case-insensitive substring matching
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StringFilter {
    base: Filter<String>,
    contains: Option<String>,
    does_not_contain: Option<String>,
}

impl StringFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn equals(self, value: impl Into<String>) -> Self {
        Self {
            base: self.base.equals(value.into()),
            ..self
        }
    }

    pub fn not_equals(self, value: impl Into<String>) -> Self {
        Self {
            base: self.base.not_equals(value.into()),
            ..self
        }
    }

    pub fn in_values<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            base: self.base.in_values(values.into_iter().map(Into::into)),
            ..self
        }
    }

    pub fn not_in_values<S: Into<String>>(self, values: impl IntoIterator<Item = S>) -> Self {
        Self {
            base: self.base.not_in_values(values.into_iter().map(Into::into)),
            ..self
        }
    }

    pub fn specified(self, specified: bool) -> Self {
        Self {
            base: self.base.specified(specified),
            ..self
        }
    }

    pub fn contains(mut self, value: impl Into<String>) -> Self {
        self.contains = Some(value.into());
        self
    }

    pub fn does_not_contain(mut self, value: impl Into<String>) -> Self {
        self.does_not_contain = Some(value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.base.is_empty() && self.contains.is_none() && self.does_not_contain.is_none()
    }
}

// ============================================================================
// Untyped filter kinds
// ============================================================================

/// Equality-family operators lowered to SQL values
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EqualityOps {
    pub equals: Option<SqlValue>,
    pub not_equals: Option<SqlValue>,
    pub in_values: Option<Vec<SqlValue>>,
    pub not_in_values: Option<Vec<SqlValue>>,
    pub specified: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeOps {
    pub greater_than: Option<SqlValue>,
    pub less_than: Option<SqlValue>,
    pub greater_than_or_equal: Option<SqlValue>,
    pub less_than_or_equal: Option<SqlValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextOps {
    pub contains: Option<String>,
    pub does_not_contain: Option<String>,
}

/// A filter of one kind, ready to be compiled against a column
#[derive(Debug, Clone, PartialEq)]
pub enum FieldFilter {
    Equality(EqualityOps),
    Range(EqualityOps, RangeOps),
    String(EqualityOps, TextOps),
    Boolean(EqualityOps),
}

/// Conversion from a typed filter to its compiled kind
pub trait IntoFieldFilter {
    fn to_field_filter(&self) -> FieldFilter;
}

impl<T: FilterValue> IntoFieldFilter for Filter<T> {
    fn to_field_filter(&self) -> FieldFilter {
        if T::BOOLEAN {
            FieldFilter::Boolean(self.to_ops())
        } else {
            FieldFilter::Equality(self.to_ops())
        }
    }
}

impl<T: FilterValue + PartialOrd> IntoFieldFilter for RangeFilter<T> {
    fn to_field_filter(&self) -> FieldFilter {
        FieldFilter::Range(self.base.to_ops(), self.to_range_ops())
    }
}

impl IntoFieldFilter for StringFilter {
    fn to_field_filter(&self) -> FieldFilter {
        FieldFilter::String(
            self.base.to_ops(),
            TextOps {
                contains: self.contains.clone(),
                does_not_contain: self.does_not_contain.clone(),
            },
        )
    }
}

// ============================================================================
// Display (used when logging criteria)
// ============================================================================

fn join_values<T: fmt::Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

impl<T: FilterValue> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.describe(&mut parts);
        write!(f, "Filter [{}]", parts.join(", "))
    }
}

impl<T: FilterValue + PartialOrd> fmt::Display for RangeFilter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.base.describe(&mut parts);
        if let Some(v) = &self.greater_than {
            parts.push(format!("greaterThan={}", v));
        }
        if let Some(v) = &self.less_than {
            parts.push(format!("lessThan={}", v));
        }
        if let Some(v) = &self.greater_than_or_equal {
            parts.push(format!("greaterThanOrEqual={}", v));
        }
        if let Some(v) = &self.less_than_or_equal {
            parts.push(format!("lessThanOrEqual={}", v));
        }
        write!(f, "RangeFilter [{}]", parts.join(", "))
    }
}

impl fmt::Display for StringFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        self.base.describe(&mut parts);
        if let Some(v) = &self.contains {
            parts.push(format!("contains={}", v));
        }
        if let Some(v) = &self.does_not_contain {
            parts.push(format!("doesNotContain={}", v));
        }
        write!(f, "StringFilter [{}]", parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_report_empty() {
        assert!(Filter::<i64>::new().is_empty());
        assert!(RangeFilter::<i64>::new().is_empty());
        assert!(StringFilter::new().is_empty());
        assert!(!StringFilter::new().contains("a").is_empty());
        assert!(!RangeFilter::new().less_than(3i64).is_empty());
    }

    #[test]
    fn in_values_accumulate() {
        let filter = Filter::new().in_values([1i64, 2]).in_values([3i64]);
        match filter.to_field_filter() {
            FieldFilter::Equality(ops) => assert_eq!(
                ops.in_values,
                Some(vec![
                    SqlValue::Integer(1),
                    SqlValue::Integer(2),
                    SqlValue::Integer(3)
                ])
            ),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn boolean_filter_has_boolean_kind() {
        let filter = BooleanFilter::new().equals(true);
        assert!(matches!(filter.to_field_filter(), FieldFilter::Boolean(_)));
    }

    #[test]
    fn range_filter_keeps_base_operators() {
        let filter = RangeFilter::new()
            .greater_than_or_equal(5i64)
            .less_than(10i64)
            .specified(true);
        match filter.to_field_filter() {
            FieldFilter::Range(base, range) => {
                assert_eq!(base.specified, Some(true));
                assert_eq!(range.greater_than_or_equal, Some(SqlValue::Integer(5)));
                assert_eq!(range.less_than, Some(SqlValue::Integer(10)));
                assert_eq!(range.greater_than, None);
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn instants_lower_to_unix_millis() {
        let instant = DateTime::<Utc>::parse_param("1970-01-02T00:00:00Z").unwrap();
        assert_eq!(instant.to_sql_value(), SqlValue::Integer(86_400_000));

        let fractional = DateTime::<Utc>::parse_param("1970-01-02T00:00:00.5Z").unwrap();
        assert_eq!(fractional.to_sql_value(), SqlValue::Integer(86_400_500));
    }

    #[test]
    fn parse_param_rejects_malformed_values() {
        assert!(i64::parse_param("abc").is_err());
        assert!(bool::parse_param("yes").is_err());
        assert!(DateTime::<Utc>::parse_param("yesterday").is_err());
        assert_eq!(i64::parse_param(" 42 ").unwrap(), 42);
    }

    #[test]
    fn copies_compare_equal() {
        let filter = StringFilter::new().contains("John").not_equals("Jane");
        let copy = filter.clone();
        assert_eq!(filter, copy);
        assert_ne!(filter, copy.does_not_contain("x"));
    }

    #[test]
    fn display_lists_set_operators_only() {
        let filter = StringFilter::new().contains("John");
        assert_eq!(filter.to_string(), "StringFilter [contains=John]");

        let range = RangeFilter::new().in_values([1i64, 2]).greater_than(0i64);
        assert_eq!(range.to_string(), "RangeFilter [in=[1, 2], greaterThan=0]");
    }
}
