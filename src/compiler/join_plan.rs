//! Table resolution and join planning for the FROM clause.
//!
//! Merges three table sources in a fixed precedence order (explicit
//! defaults, then materialized inputs, then references discovered in
//! expression text) into one deduplicated list, and renders it as
//! `FROM a JOIN b USING(...)`.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::inputs::materializer::MaterializedInput;

/// Join condition applied between factor tables when none is given.
pub const DEFAULT_JOIN_KEY: &str = "USING(date, instrument)";

/// Deduplicated, order-preserving join plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    /// Resolved table identifiers in first-seen order.
    pub tables: Vec<String>,
    /// Explicit `USING(...)` clause per table; the last one seen wins.
    pub usings: HashMap<String, String>,
}

impl JoinPlan {
    /// Build a plan from the `;`-delimited default-tables spec, the
    /// materialized inputs, and the table references discovered in
    /// expression and filter lines.
    ///
    /// A candidate may carry an inline clause (`"tbl USING(colA,colB)"`);
    /// the clause is peeled off and remembered for that table. Candidates
    /// matching an input placeholder name are replaced by the slot's
    /// materialized table identifier before deduplication, so `input_1` and
    /// its physical table never both appear.
    pub fn build(default_tables: &str, inputs: &[MaterializedInput], refs: &[String]) -> JoinPlan {
        let by_name: HashMap<&str, &str> = inputs
            .iter()
            .map(|item| (item.name.as_str(), item.table_id.as_str()))
            .collect();

        let mut candidates: Vec<String> = default_tables
            .split(';')
            .map(str::trim)
            .filter(|table| !table.is_empty())
            .map(str::to_string)
            .collect();
        candidates.extend(inputs.iter().map(|item| item.table_id.clone()));
        candidates.extend(refs.iter().cloned());

        let mut usings: HashMap<String, String> = HashMap::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut tables: Vec<String> = Vec::new();

        for candidate in candidates {
            let mut table = candidate;
            if table.contains(" USING(") {
                if let Some((head, clause)) = table.split_once(' ') {
                    let head = by_name.get(head).copied().unwrap_or(head).to_string();
                    let clause = clause.to_string();
                    usings.insert(head.clone(), clause);
                    table = head;
                }
            }
            if let Some(resolved) = by_name.get(table.as_str()) {
                table = (*resolved).to_string();
            }
            if seen.insert(table.clone()) {
                tables.push(table);
            }
        }

        let plan = JoinPlan { tables, usings };
        if plan.is_empty() {
            warn!("no tables resolved; the FROM clause will be empty");
        }
        plan
    }

    /// Render the FROM target: the first table bare, every further table as
    /// a JOIN with its recorded clause or [`DEFAULT_JOIN_KEY`].
    pub fn render_from(&self) -> String {
        let mut rendered: Vec<String> = Vec::with_capacity(self.tables.len());
        for (index, table) in self.tables.iter().enumerate() {
            if index == 0 {
                rendered.push(table.clone());
                continue;
            }
            let clause = self
                .usings
                .get(table)
                .map_or(DEFAULT_JOIN_KEY, String::as_str)
                .trim();
            rendered.push(format!("{table} {clause}"));
        }
        rendered.join("\n    JOIN ")
    }

    /// True when no table was resolved at all.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
