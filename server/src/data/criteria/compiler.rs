//! Criteria-to-query compiler
//!
//! Compilation runs in two phases. The dedup mode is fixed when the compiler
//! is created, then every set filter is resolved to a column, compiled into
//! atomic predicates and ANDed into the query. The result is plain data
//! (SQL fragments plus bound values); nothing here touches the database.

use std::fmt;

use super::Criteria;
use super::field::{EntityDef, FieldPath, Join, JoinRegistry};
use super::filter::{EqualityOps, FieldFilter, IntoFieldFilter, RangeOps, SqlValue, TextOps};
use crate::utils::sql::{contains_pattern, placeholders};
use crate::utils::string::single_line;

/// Bound parameters, in placeholder order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlParams {
    pub values: Vec<SqlValue>,
}

impl SqlParams {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, value: SqlValue) {
        self.values.push(value);
    }
}

/// Whether duplicate root rows are collapsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupMode {
    All,
    Distinct,
}

impl DedupMode {
    pub fn from_flag(distinct: Option<bool>) -> Self {
        if distinct.unwrap_or(false) {
            DedupMode::Distinct
        } else {
            DedupMode::All
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

/// One ORDER BY term over a root column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

/// Zero-indexed page window plus ordering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub size: u32,
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            sort: Vec::new(),
        }
    }

    pub fn with_sort(mut self, sort: Vec<SortOrder>) -> Self {
        self.sort = sort;
        self
    }

    pub fn offset(&self) -> u64 {
        self.page as u64 * self.size as u64
    }
}

/// A criteria compiled against one root entity
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    root: &'static EntityDef,
    dedup: DedupMode,
    joins: Vec<Join>,
    predicates: Vec<String>,
    params: SqlParams,
}

impl CompiledQuery {
    pub fn root(&self) -> &'static EntityDef {
        self.root
    }

    pub fn is_distinct(&self) -> bool {
        self.dedup == DedupMode::Distinct
    }

    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn params(&self) -> &[SqlValue] {
        &self.params.values
    }

    /// Conjunction of all predicates, `1=1` when there are none
    pub fn where_clause(&self) -> String {
        if self.predicates.is_empty() {
            "1=1".to_string()
        } else {
            self.predicates.join(" AND ")
        }
    }

    fn from_clause(&self) -> String {
        let mut from = self.root.table.to_string();
        for join in &self.joins {
            from.push(' ');
            from.push_str(&join.to_sql());
        }
        from
    }

    /// SELECT over the root columns
    ///
    /// The root id is appended as a final sort key so pages are stable.
    pub fn select_sql(&self, sort: &[SortOrder], window: Option<(u32, u64)>) -> String {
        let table = self.root.table;
        let columns: Vec<String> = self
            .root
            .columns
            .iter()
            .map(|c| format!("{}.{}", table, c))
            .collect();

        let mut order: Vec<String> = sort
            .iter()
            .map(|s| format!("{}.{} {}", table, s.column, s.direction.as_sql()))
            .collect();
        if !sort.iter().any(|s| s.column == self.root.id_column) {
            order.push(format!("{}.{} ASC", table, self.root.id_column));
        }

        let mut sql = format!(
            "SELECT {}{} FROM {} WHERE {} ORDER BY {}",
            if self.is_distinct() { "DISTINCT " } else { "" },
            columns.join(", "),
            self.from_clause(),
            self.where_clause(),
            order.join(", ")
        );
        if let Some((limit, offset)) = window {
            sql.push_str(&format!(" LIMIT {} OFFSET {}", limit, offset));
        }
        sql
    }

    /// COUNT matching the rows `select_sql` returns
    pub fn count_sql(&self) -> String {
        let table = self.root.table;
        let counted = if self.is_distinct() {
            format!("COUNT(DISTINCT {}.{})", table, self.root.id_column)
        } else {
            "COUNT(*)".to_string()
        };
        format!(
            "SELECT {} FROM {} WHERE {}",
            counted,
            self.from_clause(),
            self.where_clause()
        )
    }
}

impl fmt::Display for CompiledQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.count_sql())?;
        for (i, value) in self.params.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", single_line(&value.to_string()))?;
        }
        write!(f, "]")
    }
}

/// Builds a [`CompiledQuery`] for one root entity
#[derive(Debug)]
pub struct QueryCompiler {
    root: &'static EntityDef,
    dedup: DedupMode,
    joins: JoinRegistry,
    predicates: Vec<String>,
    params: SqlParams,
}

impl QueryCompiler {
    /// Phase one: the dedup mode is fixed before any predicate is added
    pub fn new(root: &'static EntityDef, dedup: DedupMode) -> Self {
        Self {
            root,
            dedup,
            joins: JoinRegistry::new(root.table),
            predicates: Vec::new(),
            params: SqlParams::new(),
        }
    }

    /// Phase two: AND one filter over a resolved path into the query
    pub fn and(mut self, path: FieldPath, filter: &FieldFilter) -> Self {
        let column = match path {
            FieldPath::Direct { column } => format!("{}.{}", self.root.table, column),
            FieldPath::Relation { relation, column } => {
                if relation.fans_out() && self.dedup == DedupMode::All {
                    tracing::trace!(
                        relation = relation.name,
                        "One-to-many join without distinct may repeat rows"
                    );
                }
                let alias = self.joins.alias_for(relation);
                format!("{}.{}", alias, column)
            }
        };
        let clauses = compile_filter(&column, filter, &mut self.params);
        self.predicates.extend(clauses);
        self
    }

    pub fn finish(self) -> CompiledQuery {
        CompiledQuery {
            root: self.root,
            dedup: self.dedup,
            joins: self.joins.into_joins(),
            predicates: self.predicates,
            params: self.params,
        }
    }
}

/// Compile every set filter of `criteria`, in declared field order
pub fn compile<C: Criteria>(criteria: &C) -> CompiledQuery {
    let compiled = criteria
        .filters()
        .into_iter()
        .fold(
            QueryCompiler::new(C::entity(), DedupMode::from_flag(criteria.distinct())),
            |compiler, (field, filter)| compiler.and(C::resolve(field), &filter),
        )
        .finish();
    tracing::trace!(query = %compiled, "Compiled criteria");
    compiled
}

/// Lower a set of typed filters into the untyped kinds the compiler matches on
pub fn field_filter<F: IntoFieldFilter>(filter: &F) -> FieldFilter {
    filter.to_field_filter()
}

/// Atomic predicates for one filter over one column
///
/// All returned clauses are ANDed. An empty result means "no constraint".
pub fn compile_filter(column: &str, filter: &FieldFilter, params: &mut SqlParams) -> Vec<String> {
    let mut clauses = Vec::new();
    match filter {
        FieldFilter::Equality(ops) => {
            equality_clauses(column, ops, params, &mut clauses);
        }
        FieldFilter::Range(ops, range) => {
            equality_clauses(column, ops, params, &mut clauses);
            range_clauses(column, range, params, &mut clauses);
        }
        FieldFilter::String(ops, text) => {
            equality_clauses(column, ops, params, &mut clauses);
            text_clauses(column, text, params, &mut clauses);
        }
        FieldFilter::Boolean(ops) => {
            boolean_clauses(column, ops, &mut clauses);
        }
    }
    clauses
}

fn bind_list(values: &[SqlValue], params: &mut SqlParams) -> String {
    for value in values {
        params.push(value.clone());
    }
    placeholders(values.len())
}

fn specified_clause(column: &str, specified: bool) -> String {
    if specified {
        format!("{} IS NOT NULL", column)
    } else {
        format!("{} IS NULL", column)
    }
}

fn equality_clauses(
    column: &str,
    ops: &EqualityOps,
    params: &mut SqlParams,
    clauses: &mut Vec<String>,
) {
    if let Some(value) = &ops.equals {
        params.push(value.clone());
        clauses.push(format!("{} = ?", column));
    }
    if let Some(value) = &ops.not_equals {
        params.push(value.clone());
        clauses.push(format!("{} <> ?", column));
    }
    if let Some(values) = &ops.in_values {
        if values.is_empty() {
            clauses.push("1=0".to_string());
        } else {
            clauses.push(format!("{} IN ({})", column, bind_list(values, params)));
        }
    }
    if let Some(values) = &ops.not_in_values
        && !values.is_empty()
    {
        clauses.push(format!("{} NOT IN ({})", column, bind_list(values, params)));
    }
    if let Some(specified) = ops.specified {
        clauses.push(specified_clause(column, specified));
    }
}

fn range_clauses(column: &str, range: &RangeOps, params: &mut SqlParams, clauses: &mut Vec<String>) {
    let bounds = [
        (&range.greater_than, ">"),
        (&range.less_than, "<"),
        (&range.greater_than_or_equal, ">="),
        (&range.less_than_or_equal, "<="),
    ];
    for (bound, op) in bounds {
        if let Some(value) = bound {
            params.push(value.clone());
            clauses.push(format!("{} {} ?", column, op));
        }
    }
}

fn text_clauses(column: &str, text: &TextOps, params: &mut SqlParams, clauses: &mut Vec<String>) {
    if let Some(needle) = &text.contains {
        params.push(SqlValue::Text(contains_pattern(needle)));
        clauses.push(format!("UPPER({}) LIKE ? ESCAPE '\\'", column));
    }
    if let Some(needle) = &text.does_not_contain {
        params.push(SqlValue::Text(contains_pattern(needle)));
        clauses.push(format!("UPPER({}) NOT LIKE ? ESCAPE '\\'", column));
    }
}

fn bool_literal(value: &SqlValue) -> &'static str {
    match value {
        SqlValue::Bool(true) => "TRUE",
        SqlValue::Integer(v) if *v != 0 => "TRUE",
        _ => "FALSE",
    }
}

/// Boolean values are inlined as literals, never bound
fn boolean_clauses(column: &str, ops: &EqualityOps, clauses: &mut Vec<String>) {
    if let Some(value) = &ops.equals {
        clauses.push(format!("{} = {}", column, bool_literal(value)));
    }
    if let Some(value) = &ops.not_equals {
        clauses.push(format!("{} <> {}", column, bool_literal(value)));
    }
    if let Some(values) = &ops.in_values {
        if values.is_empty() {
            clauses.push("1=0".to_string());
        } else {
            let literals: Vec<&str> = values.iter().map(bool_literal).collect();
            clauses.push(format!("{} IN ({})", column, literals.join(", ")));
        }
    }
    if let Some(values) = &ops.not_in_values
        && !values.is_empty()
    {
        let literals: Vec<&str> = values.iter().map(bool_literal).collect();
        clauses.push(format!("{} NOT IN ({})", column, literals.join(", ")));
    }
    if let Some(specified) = ops.specified {
        clauses.push(specified_clause(column, specified));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::criteria::field::{Cardinality, Relation};
    use crate::data::criteria::filter::{BooleanFilter, Filter, RangeFilter, StringFilter};

    static PARENT: EntityDef = EntityDef {
        name: "Parent",
        table: "parent",
        id_column: "id",
        columns: &["id", "name"],
        sortable: &[("id", "id"), ("name", "name")],
    };

    static CHILD: EntityDef = EntityDef {
        name: "Child",
        table: "child",
        id_column: "id",
        columns: &["id", "parent_id"],
        sortable: &[("id", "id")],
    };

    static CHILDREN: Relation = Relation {
        name: "children",
        target: &CHILD,
        local_column: "id",
        remote_column: "parent_id",
        cardinality: Cardinality::OneToMany,
    };

    fn clauses(filter: &FieldFilter) -> (Vec<String>, Vec<SqlValue>) {
        let mut params = SqlParams::new();
        let clauses = compile_filter("t.col", filter, &mut params);
        (clauses, params.values)
    }

    #[test]
    fn test_empty_filter_contributes_nothing() {
        let (sql, params) = clauses(&field_filter(&StringFilter::new()));
        assert!(sql.is_empty());
        assert!(params.is_empty());
    }

    #[test]
    fn test_equality_operators() {
        let filter = Filter::new()
            .equals(1i64)
            .not_equals(2i64)
            .in_values([3i64, 4])
            .not_in_values([5i64])
            .specified(true);
        let (sql, params) = clauses(&field_filter(&filter));
        assert_eq!(
            sql,
            vec![
                "t.col = ?",
                "t.col <> ?",
                "t.col IN (?, ?)",
                "t.col NOT IN (?)",
                "t.col IS NOT NULL"
            ]
        );
        assert_eq!(
            params,
            vec![
                SqlValue::Integer(1),
                SqlValue::Integer(2),
                SqlValue::Integer(3),
                SqlValue::Integer(4),
                SqlValue::Integer(5)
            ]
        );
    }

    #[test]
    fn test_empty_in_is_false_and_empty_not_in_is_true() {
        let filter = Filter::<i64>::new()
            .in_values(Vec::new())
            .not_in_values(Vec::new());
        let (sql, params) = clauses(&field_filter(&filter));
        assert_eq!(sql, vec!["1=0"]);
        assert!(params.is_empty());
    }

    #[test]
    fn test_specified_false() {
        let (sql, _) = clauses(&field_filter(&Filter::<i64>::new().specified(false)));
        assert_eq!(sql, vec!["t.col IS NULL"]);
    }

    #[test]
    fn test_range_bounds() {
        let filter = RangeFilter::new()
            .greater_than(1i64)
            .less_than(9i64)
            .greater_than_or_equal(2i64)
            .less_than_or_equal(8i64);
        let (sql, params) = clauses(&field_filter(&filter));
        assert_eq!(
            sql,
            vec!["t.col > ?", "t.col < ?", "t.col >= ?", "t.col <= ?"]
        );
        assert_eq!(params.len(), 4);
    }

    #[test]
    fn test_contains_is_case_insensitive_and_escaped() {
        let filter = StringFilter::new().contains("50%").does_not_contain("x_y");
        let (sql, params) = clauses(&field_filter(&filter));
        assert_eq!(
            sql,
            vec![
                "UPPER(t.col) LIKE ? ESCAPE '\\'",
                "UPPER(t.col) NOT LIKE ? ESCAPE '\\'"
            ]
        );
        assert_eq!(
            params,
            vec![
                SqlValue::Text("%50\\%%".to_string()),
                SqlValue::Text("%X\\_Y%".to_string())
            ]
        );
    }

    #[test]
    fn test_boolean_equals_is_inline_literal() {
        let (sql, params) = clauses(&field_filter(&BooleanFilter::new().equals(true)));
        assert_eq!(sql, vec!["t.col = TRUE"]);
        assert!(params.is_empty());

        let (sql, _) = clauses(&field_filter(
            &BooleanFilter::new().not_equals(true).in_values([false]),
        ));
        assert_eq!(sql, vec!["t.col <> TRUE", "t.col IN (FALSE)"]);
    }

    #[test]
    fn test_compiler_without_filters_matches_everything() {
        let query = QueryCompiler::new(&PARENT, DedupMode::All).finish();
        assert_eq!(query.where_clause(), "1=1");
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(*) FROM parent WHERE 1=1"
        );
        assert!(query.joins().is_empty());
    }

    #[test]
    fn test_compiler_reuses_join_for_same_relation() {
        let path = FieldPath::Relation {
            relation: &CHILDREN,
            column: "id",
        };
        let query = QueryCompiler::new(&PARENT, DedupMode::Distinct)
            .and(path, &field_filter(&RangeFilter::new().greater_than(1i64)))
            .and(path, &field_filter(&RangeFilter::new().less_than(5i64)))
            .finish();

        assert_eq!(query.joins().len(), 1);
        assert_eq!(
            query.where_clause(),
            "children_1.id > ? AND children_1.id < ?"
        );
        assert_eq!(
            query.count_sql(),
            "SELECT COUNT(DISTINCT parent.id) FROM parent \
             LEFT JOIN child AS children_1 ON children_1.parent_id = parent.id \
             WHERE children_1.id > ? AND children_1.id < ?"
        );
    }

    #[test]
    fn test_select_sql_orders_and_windows() {
        let query = QueryCompiler::new(&PARENT, DedupMode::Distinct)
            .and(
                FieldPath::Direct { column: "name" },
                &field_filter(&StringFilter::new().equals("a")),
            )
            .finish();
        assert_eq!(
            query.select_sql(&[SortOrder::desc("name")], Some((20, 40))),
            "SELECT DISTINCT parent.id, parent.name FROM parent WHERE parent.name = ? \
             ORDER BY parent.name DESC, parent.id ASC LIMIT 20 OFFSET 40"
        );
        assert_eq!(
            query.select_sql(&[SortOrder::desc("id")], None),
            "SELECT DISTINCT parent.id, parent.name FROM parent WHERE parent.name = ? \
             ORDER BY parent.id DESC"
        );
    }

    #[test]
    fn test_dedup_mode_from_flag() {
        assert_eq!(DedupMode::from_flag(None), DedupMode::All);
        assert_eq!(DedupMode::from_flag(Some(false)), DedupMode::All);
        assert_eq!(DedupMode::from_flag(Some(true)), DedupMode::Distinct);
    }

    #[test]
    fn test_page_request_offset() {
        assert_eq!(PageRequest::new(0, 20).offset(), 0);
        assert_eq!(PageRequest::new(3, 25).offset(), 75);
    }
}
