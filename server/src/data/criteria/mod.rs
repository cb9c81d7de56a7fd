//! Criteria-to-query compilation
//!
//! - `filter` - typed per-field filters and the untyped kinds they lower to
//! - `field` - entity metadata, field paths and join registration
//! - `compiler` - two-phase compilation into SQL fragments and bound values
//! - `params` - parsing of `field.operator=value` request parameters

pub mod compiler;
pub mod field;
pub mod filter;
pub mod params;

use std::fmt;

pub use compiler::{
    CompiledQuery, DedupMode, PageRequest, QueryCompiler, SortDirection, SortOrder, SqlParams,
    compile,
};
pub use field::{Cardinality, EntityDef, FieldPath, Relation};
pub use filter::{
    BooleanFilter, EnumFilter, FieldFilter, Filter, FilterValue, IntoFieldFilter, RangeFilter,
    SqlValue, StringFilter,
};
pub use params::{FilterOp, FilterParamError, FromFilterParams, parse_criteria};

/// All filters a caller may place on one entity type, ANDed together
///
/// Each implementation names its filterable fields with a closed enum, so
/// resolving a field to a column cannot fail.
pub trait Criteria: Clone + PartialEq + fmt::Display + Send + Sync {
    type Field: Copy + fmt::Debug;

    /// Row type the compiled query returns
    type Entity;

    /// Root entity the query runs against
    fn entity() -> &'static EntityDef;

    fn resolve(field: Self::Field) -> FieldPath;

    /// Set filters only, in declared field order
    fn filters(&self) -> Vec<(Self::Field, FieldFilter)>;

    fn distinct(&self) -> Option<bool>;
}

/// Push `filter` under `field` when it is set
pub fn push_filter<Fd, F>(out: &mut Vec<(Fd, FieldFilter)>, field: Fd, filter: &Option<F>)
where
    F: IntoFieldFilter,
{
    if let Some(filter) = filter {
        out.push((field, filter.to_field_filter()));
    }
}

/// Render set entries as `Name{field=Filter [..], distinct=..}`
pub fn describe(name: &str, entries: &[(&str, Option<String>)], distinct: Option<bool>) -> String {
    let mut parts: Vec<String> = entries
        .iter()
        .filter_map(|(field, value)| value.as_ref().map(|v| format!("{}={}", field, v)))
        .collect();
    if let Some(distinct) = distinct {
        parts.push(format!("distinct={}", distinct));
    }
    format!("{}{{{}}}", name, parts.join(", "))
}
