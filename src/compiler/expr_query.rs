//! Expression-block compilation into a single SELECT statement.

use tracing::debug;

use crate::compiler::join_plan::JoinPlan;
use crate::error::{Error, Result};
use crate::inputs::materializer::MaterializedInput;
use crate::parser::lines::split_lines;
use crate::parser::tables::extract_table_refs;

/// Predicate appended to the filter lines when drop-null-rows is set.
pub const DROP_NA_PREDICATE: &str = "COLUMNS(*) IS NOT NULL";

/// Compile an expression block plus a filter block into one query.
///
/// Expression lines become the select list in source order; filter lines are
/// AND-composed into a QUALIFY clause, which runs after windowed/aggregate
/// computation. Tables referenced as `name.column` in either block are
/// discovered and joined automatically; unqualified columns fall back to the
/// default-tables list.
///
/// An expression block with zero lines after comment filtering is a
/// configuration error.
pub fn build_expr_query(
    expr: &str,
    expr_filters: &str,
    default_tables: &str,
    order_by: &str,
    drop_na: bool,
    inputs: &[MaterializedInput],
) -> Result<String> {
    let expr_lines = split_lines(expr);
    if expr_lines.is_empty() {
        return Err(Error::EmptyExpression);
    }
    let mut filter_lines = split_lines(expr_filters);

    let mut refs: Vec<String> = Vec::new();
    for line in expr_lines.iter().chain(filter_lines.iter()) {
        refs.extend(extract_table_refs(line));
    }
    let plan = JoinPlan::build(default_tables, inputs, &refs);
    debug!(
        expressions = expr_lines.len(),
        filters = filter_lines.len(),
        tables = plan.tables.len(),
        "planned expression query"
    );

    // The appended predicate references no tables, so it stays out of the scan.
    if drop_na {
        filter_lines.push(DROP_NA_PREDICATE.to_string());
    }

    let mut sql = format!(
        "SELECT\n    {}\nFROM {}",
        expr_lines.join(",\n    "),
        plan.render_from()
    );
    if !filter_lines.is_empty() {
        sql.push_str("\nQUALIFY\n    ");
        sql.push_str(&filter_lines.join("\n    AND "));
    }
    let order_by = order_by.trim();
    if !order_by.is_empty() {
        sql.push_str("\nORDER BY ");
        sql.push_str(order_by);
    }

    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(expr: &str, filters: &str, tables: &str) -> String {
        build_expr_query(expr, filters, tables, "date, instrument", true, &[]).unwrap()
    }

    #[test]
    fn single_expression_with_default_table() {
        let sql = compile("close AS c", "", "cn_stock_bar1d");
        assert_eq!(
            sql,
            "SELECT\n    close AS c\nFROM cn_stock_bar1d\nQUALIFY\n    COLUMNS(*) IS NOT NULL\nORDER BY date, instrument"
        );
    }

    #[test]
    fn discovered_tables_are_joined_on_the_composite_key() {
        let sql = compile("a.x + b.y AS z", "", "");
        assert!(sql.contains("FROM a\n    JOIN b USING(date, instrument)"));
    }

    #[test]
    fn filters_are_and_composed_in_qualify() {
        let sql = compile("close AS c", "c > 0\nc < 10", "t");
        assert!(sql.contains(
            "QUALIFY\n    c > 0\n    AND c < 10\n    AND COLUMNS(*) IS NOT NULL"
        ));
    }

    #[test]
    fn drop_na_can_be_disabled() {
        let sql = build_expr_query("close AS c", "", "t", "", false, &[]).unwrap();
        assert!(!sql.contains("QUALIFY"));
        assert!(!sql.contains("ORDER BY"));
        assert_eq!(sql, "SELECT\n    close AS c\nFROM t");
    }

    #[test]
    fn filter_lines_contribute_table_references() {
        let sql = compile("close AS c", "bar.turn > 0.02", "prefactors");
        assert!(sql.contains(
            "FROM prefactors\n    JOIN bar USING(date, instrument)"
        ));
    }

    #[test]
    fn comment_lines_never_reach_the_output() {
        let sql = compile("-- note\nclose AS c\n# other", "-- filter note", "t");
        assert!(!sql.contains("note"));
        assert_eq!(
            sql,
            "SELECT\n    close AS c\nFROM t\nQUALIFY\n    COLUMNS(*) IS NOT NULL\nORDER BY date, instrument"
        );
    }

    #[test]
    fn quoted_literals_do_not_create_joins() {
        let sql = compile("close AS c", "instrument IN ('jm2201.DCE')", "t");
        assert!(!sql.contains("JOIN"));
    }

    #[test]
    fn compiling_twice_yields_identical_sql() {
        let first = compile("t.a AS a\nu.b AS b", "u.c > 0", "base");
        let second = compile("t.a AS a\nu.b AS b", "u.c > 0", "base");
        assert_eq!(first, second);
    }

    #[test]
    fn empty_expression_block_is_rejected() {
        let err = build_expr_query("-- only comments", "", "t", "", true, &[]).unwrap_err();
        assert!(matches!(err, Error::EmptyExpression));
    }

    #[test]
    fn whitespace_only_order_by_is_omitted() {
        let sql = build_expr_query("close AS c", "", "t", "   ", false, &[]).unwrap();
        assert!(!sql.contains("ORDER BY"));
    }
}
