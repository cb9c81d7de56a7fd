//! Request parameter parsing
//!
//! Turns `field.operator=value` pairs into a criteria value. Keys reserved for
//! paging (`page`, `size`, `sort`) are skipped; `distinct` sets the dedup flag.

use std::fmt;

use thiserror::Error;

use super::Criteria;
use super::filter::{Filter, FilterValue, RangeFilter, StringFilter};
use crate::utils::string::split_csv;

/// Most filter parameters accepted in one request
pub const MAX_FILTER_PARAMS: usize = 50;

/// Most `in`/`notIn` values accepted in one request, across all fields
pub const MAX_IN_VALUES: usize = 1000;

const RESERVED_PAGING_KEYS: &[&str] = &["page", "size", "sort"];
const DISTINCT_KEY: &str = "distinct";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Equals,
    NotEquals,
    In,
    NotIn,
    Specified,
    GreaterThan,
    LessThan,
    GreaterThanOrEqual,
    LessThanOrEqual,
    Contains,
    DoesNotContain,
}

impl FilterOp {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "equals" => Some(Self::Equals),
            "notEquals" => Some(Self::NotEquals),
            "in" => Some(Self::In),
            "notIn" => Some(Self::NotIn),
            "specified" => Some(Self::Specified),
            "greaterThan" => Some(Self::GreaterThan),
            "lessThan" => Some(Self::LessThan),
            "greaterThanOrEqual" => Some(Self::GreaterThanOrEqual),
            "lessThanOrEqual" => Some(Self::LessThanOrEqual),
            "contains" => Some(Self::Contains),
            "doesNotContain" => Some(Self::DoesNotContain),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Equals => "equals",
            Self::NotEquals => "notEquals",
            Self::In => "in",
            Self::NotIn => "notIn",
            Self::Specified => "specified",
            Self::GreaterThan => "greaterThan",
            Self::LessThan => "lessThan",
            Self::GreaterThanOrEqual => "greaterThanOrEqual",
            Self::LessThanOrEqual => "lessThanOrEqual",
            Self::Contains => "contains",
            Self::DoesNotContain => "doesNotContain",
        }
    }
}

impl fmt::Display for FilterOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterParamError {
    #[error("Unknown filter field '{0}'")]
    UnknownField(String),

    #[error("Parameter '{0}' must have the form field.operator")]
    MissingOperator(String),

    #[error("Unknown operator '{op}' on field '{field}'")]
    UnknownOperator { field: String, op: String },

    #[error("Operator '{op}' is not supported by field '{field}'")]
    UnsupportedOperator { field: String, op: FilterOp },

    #[error("Invalid value for {field}.{op}: {reason}")]
    InvalidValue {
        field: String,
        op: FilterOp,
        reason: String,
    },

    #[error("Too many filter parameters (max {0})")]
    TooManyParams(usize),

    #[error("Too many in/notIn values (max {0})")]
    TooManyValues(usize),
}

impl FilterParamError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownField(_) => "UNKNOWN_FILTER_FIELD",
            Self::MissingOperator(_) | Self::UnknownOperator { .. } => "INVALID_FILTER_OPERATOR",
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_FILTER_OPERATOR",
            Self::InvalidValue { .. } => "INVALID_FILTER_VALUE",
            Self::TooManyParams(_) | Self::TooManyValues(_) => "TOO_MANY_FILTERS",
        }
    }
}

/// A typed filter that can absorb one parsed operator
pub trait ParamFilter: Sized + Default {
    fn apply(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError>;
}

fn parse_one<T: FilterValue>(field: &str, op: FilterOp, raw: &str) -> Result<T, FilterParamError> {
    T::parse_param(raw).map_err(|reason| FilterParamError::InvalidValue {
        field: field.to_string(),
        op,
        reason,
    })
}

fn parse_list<T: FilterValue>(
    field: &str,
    op: FilterOp,
    raw: &str,
) -> Result<Vec<T>, FilterParamError> {
    split_csv(raw)
        .into_iter()
        .map(|item| parse_one(field, op, item))
        .collect()
}

fn unsupported(field: &str, op: FilterOp) -> FilterParamError {
    FilterParamError::UnsupportedOperator {
        field: field.to_string(),
        op,
    }
}

impl<T: FilterValue> ParamFilter for Filter<T> {
    fn apply(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError> {
        Ok(match op {
            FilterOp::Equals => self.equals(parse_one(field, op, raw)?),
            FilterOp::NotEquals => self.not_equals(parse_one(field, op, raw)?),
            FilterOp::In => self.in_values(parse_list(field, op, raw)?),
            FilterOp::NotIn => self.not_in_values(parse_list(field, op, raw)?),
            FilterOp::Specified => self.specified(parse_one(field, op, raw)?),
            _ => return Err(unsupported(field, op)),
        })
    }
}

impl<T: FilterValue + PartialOrd> ParamFilter for RangeFilter<T> {
    fn apply(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError> {
        Ok(match op {
            FilterOp::Equals => self.equals(parse_one(field, op, raw)?),
            FilterOp::NotEquals => self.not_equals(parse_one(field, op, raw)?),
            FilterOp::In => self.in_values(parse_list(field, op, raw)?),
            FilterOp::NotIn => self.not_in_values(parse_list(field, op, raw)?),
            FilterOp::Specified => self.specified(parse_one(field, op, raw)?),
            FilterOp::GreaterThan => self.greater_than(parse_one(field, op, raw)?),
            FilterOp::LessThan => self.less_than(parse_one(field, op, raw)?),
            FilterOp::GreaterThanOrEqual => self.greater_than_or_equal(parse_one(field, op, raw)?),
            FilterOp::LessThanOrEqual => self.less_than_or_equal(parse_one(field, op, raw)?),
            FilterOp::Contains | FilterOp::DoesNotContain => return Err(unsupported(field, op)),
        })
    }
}

impl ParamFilter for StringFilter {
    fn apply(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError> {
        Ok(match op {
            FilterOp::Equals => self.equals(raw),
            FilterOp::NotEquals => self.not_equals(raw),
            FilterOp::In => self.in_values(split_csv(raw)),
            FilterOp::NotIn => self.not_in_values(split_csv(raw)),
            FilterOp::Specified => self.specified(parse_one(field, op, raw)?),
            FilterOp::Contains => self.contains(raw),
            FilterOp::DoesNotContain => self.does_not_contain(raw),
            _ => return Err(unsupported(field, op)),
        })
    }
}

/// Apply one operator to an optional filter slot
pub fn apply_param<F: ParamFilter>(
    current: Option<F>,
    field: &str,
    op: FilterOp,
    raw: &str,
) -> Result<Option<F>, FilterParamError> {
    current.unwrap_or_default().apply(field, op, raw).map(Some)
}

/// Criteria buildable from request parameters
pub trait FromFilterParams: Criteria + Default {
    /// Apply `field.op=raw`; unknown field names are rejected
    fn with_param(self, field: &str, op: FilterOp, raw: &str) -> Result<Self, FilterParamError>;

    fn with_distinct(self, distinct: bool) -> Self;
}

/// Build a criteria from raw query pairs
pub fn parse_criteria<C: FromFilterParams>(
    pairs: &[(String, String)],
) -> Result<C, FilterParamError> {
    let filter_count = pairs
        .iter()
        .filter(|(key, _)| !RESERVED_PAGING_KEYS.contains(&key.as_str()))
        .count();
    if filter_count > MAX_FILTER_PARAMS {
        return Err(FilterParamError::TooManyParams(MAX_FILTER_PARAMS));
    }

    // Each listed value becomes one bound SQL variable
    let listed_values: usize = pairs
        .iter()
        .filter(|(key, _)| {
            matches!(
                key.rsplit_once('.').map(|(_, op)| op),
                Some("in") | Some("notIn")
            )
        })
        .map(|(_, raw)| split_csv(raw).len())
        .sum();
    if listed_values > MAX_IN_VALUES {
        return Err(FilterParamError::TooManyValues(MAX_IN_VALUES));
    }

    pairs.iter().try_fold(C::default(), |criteria, (key, raw)| {
        if RESERVED_PAGING_KEYS.contains(&key.as_str()) {
            return Ok(criteria);
        }
        if key == DISTINCT_KEY {
            let distinct = bool::parse_param(raw).map_err(|reason| {
                FilterParamError::InvalidValue {
                    field: DISTINCT_KEY.to_string(),
                    op: FilterOp::Equals,
                    reason,
                }
            })?;
            return Ok(criteria.with_distinct(distinct));
        }

        let (field, op_name) = key
            .split_once('.')
            .ok_or_else(|| FilterParamError::MissingOperator(key.clone()))?;
        let op = FilterOp::parse(op_name).ok_or_else(|| FilterParamError::UnknownOperator {
            field: field.to_string(),
            op: op_name.to_string(),
        })?;
        criteria.with_param(field, op, raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_op_round_trip_names() {
        for name in ["equals", "notIn", "greaterThanOrEqual", "doesNotContain"] {
            assert_eq!(FilterOp::parse(name).unwrap().as_str(), name);
        }
        assert_eq!(FilterOp::parse("like"), None);
        assert_eq!(FilterOp::parse("Equals"), None);
    }

    #[test]
    fn test_range_filter_accepts_all_operators() {
        let filter = RangeFilter::<i64>::default()
            .apply("id", FilterOp::GreaterThan, "3")
            .unwrap()
            .apply("id", FilterOp::In, "1,2")
            .unwrap();
        assert_eq!(
            filter,
            RangeFilter::new().greater_than(3i64).in_values([1i64, 2])
        );
    }

    #[test]
    fn test_repeated_in_accumulates() {
        let filter = Filter::<i64>::default()
            .apply("id", FilterOp::In, "1")
            .unwrap()
            .apply("id", FilterOp::In, "2,3")
            .unwrap();
        assert_eq!(filter, Filter::new().in_values([1i64, 2, 3]));
    }

    #[test]
    fn test_empty_in_value_is_empty_set() {
        let filter = Filter::<i64>::default()
            .apply("id", FilterOp::In, "")
            .unwrap();
        assert_eq!(filter, Filter::new().in_values(Vec::<i64>::new()));
    }

    #[test]
    fn test_string_filter_rejects_range_operator() {
        let err = StringFilter::default()
            .apply("name", FilterOp::GreaterThan, "a")
            .unwrap_err();
        assert_eq!(err.code(), "UNSUPPORTED_FILTER_OPERATOR");
    }

    #[test]
    fn test_equality_filter_rejects_contains() {
        let err = Filter::<i64>::default()
            .apply("x", FilterOp::Contains, "a")
            .unwrap_err();
        assert!(matches!(err, FilterParamError::UnsupportedOperator { .. }));
    }

    #[test]
    fn test_invalid_value_reports_field_and_operator() {
        let err = RangeFilter::<i64>::default()
            .apply("id", FilterOp::Equals, "abc")
            .unwrap_err();
        assert_eq!(err.code(), "INVALID_FILTER_VALUE");
        assert!(err.to_string().starts_with("Invalid value for id.equals"));
    }

    #[test]
    fn test_specified_requires_boolean() {
        assert!(
            StringFilter::default()
                .apply("name", FilterOp::Specified, "maybe")
                .is_err()
        );
        assert_eq!(
            StringFilter::default()
                .apply("name", FilterOp::Specified, "false")
                .unwrap(),
            StringFilter::new().specified(false)
        );
    }

    #[test]
    fn test_apply_param_starts_from_default() {
        let slot: Option<StringFilter> = None;
        let slot = apply_param(slot, "name", FilterOp::Contains, "jo").unwrap();
        assert_eq!(slot, Some(StringFilter::new().contains("jo")));
    }
}
