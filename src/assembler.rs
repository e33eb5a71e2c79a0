//! Query assembly entry point.
//!
//! Ties the pieces together: validates the parameter set, materializes bound
//! input slots, dispatches on the compilation mode, substitutes input
//! placeholders with physical table identifiers, and splices preparatory SQL
//! ahead of the final query. The extraction path hands the finished artifact
//! to an injected [`QueryEngine`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::compiler::expr_query::build_expr_query;
use crate::engine::{FrameLike, QueryEngine};
use crate::error::{Error, Result};
use crate::inputs::materializer::{materialize_inputs, preparatory_sql};
use crate::inputs::source::{DataHandle, InputSource};
use crate::parser::tables::is_word_char;

/// Compilation mode selector.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Derive the full query from per-line column expressions.
    #[default]
    Expr,
    /// Use the caller-supplied SQL text verbatim as the base query.
    Sql,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Expr => write!(f, "expr"),
            Mode::Sql => write!(f, "sql"),
        }
    }
}

impl FromStr for Mode {
    type Err = String;
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "expr" => Ok(Mode::Expr),
            "sql" => Ok(Mode::Sql),
            _ => Err(format!("Invalid mode: {s} (expected 'expr' or 'sql')")),
        }
    }
}

/// Full parameter set consumed by [`compile`] and [`run`].
///
/// Defaults follow the platform conventions: unqualified columns resolve
/// against `cn_stock_prefactors`, the composite key columns are always
/// selected and ordered by, and null-bearing rows are dropped. Construction
/// via [`Params::default`] builds a fresh value on every call; no state is
/// shared between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    /// Upstream references bound to the three input slots.
    pub inputs: [Option<InputSource>; 3],
    /// Which compilation path to take.
    pub mode: Mode,
    /// Expression block, one output column per line.
    pub expr: String,
    /// Filter block, one predicate per line, AND-composed into QUALIFY.
    pub expr_filters: String,
    /// `;`-delimited default tables supplying unqualified columns.
    pub expr_tables: String,
    /// `,`-delimited fields merged into the expression block as extra lines.
    pub extra_fields: String,
    /// ORDER BY key spec; empty omits the clause.
    pub order_by: String,
    /// Drop rows containing null values.
    pub expr_drop_na: bool,
    /// In expression mode, prepend the trimmed raw SQL text to the compiled
    /// query.
    pub expr_add_sql: bool,
    /// Raw SQL text: the whole base query in SQL mode, an optional prefix in
    /// expression mode.
    pub sql: String,
    /// Execute the compiled query instead of returning its text.
    pub extract_data: bool,
}

impl Default for Params {
    fn default() -> Params {
        Params {
            inputs: [None, None, None],
            mode: Mode::Expr,
            expr: String::new(),
            expr_filters: String::new(),
            expr_tables: "cn_stock_prefactors".to_string(),
            extra_fields: "date, instrument".to_string(),
            order_by: "date, instrument".to_string(),
            expr_drop_na: true,
            expr_add_sql: false,
            sql: String::new(),
            extract_data: false,
        }
    }
}

/// The compiled artifact: preparatory statements followed by the final query.
///
/// Immutable once produced; the extraction path consumes it exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// Complete SQL text, ready to hand to the engine.
    pub sql: String,
}

impl Artifact {
    /// JSON payload form, as written through the engine collaborator.
    pub fn to_json(&self) -> Value {
        json!({ "sql": self.sql })
    }
}

/// Compile `params` into the final SQL artifact.
///
/// Nothing is executed here; the only side effect is minting fresh table
/// identifiers for SQL-backed input slots, so two compilations of the same
/// parameters differ only in those identifiers.
pub fn compile(params: &Params) -> Result<Artifact> {
    // User-input-quality guard, checked before any materialization work.
    if params.expr_tables.contains('；') {
        return Err(Error::FullWidthSeparator);
    }

    let inputs = materialize_inputs(&params.inputs)?;

    let mut sql = match params.mode {
        Mode::Expr => {
            info!("expr mode");
            let expr = merge_extra_fields(&params.expr, &params.extra_fields);
            let compiled = build_expr_query(
                &expr,
                &params.expr_filters,
                &params.expr_tables,
                &params.order_by,
                params.expr_drop_na,
                &inputs,
            )?;
            if params.expr_add_sql {
                format!("{}\n{}", params.sql.trim(), compiled)
            } else {
                compiled
            }
        }
        Mode::Sql => {
            info!("sql mode");
            params.sql.clone()
        }
    };

    for input in &inputs {
        sql = replace_word(&sql, &input.name, &input.table_id);
    }

    Ok(Artifact {
        sql: format!("{}{sql}", preparatory_sql(&inputs)),
    })
}

/// Compile `params` and hand the artifact to `engine`.
///
/// With `extract_data` set, the compiled query is executed and the realized
/// frame written back as a tabular handle; otherwise the `{"sql": ...}`
/// payload is written. Either write is based on the slot 1 handle when one is
/// bound, carrying its lineage metadata onto the output.
pub fn run<E: QueryEngine>(params: &Params, engine: &E) -> Result<DataHandle> {
    let artifact = compile(params)?;
    let base = match &params.inputs[0] {
        Some(InputSource::Handle(handle)) => Some(handle),
        _ => None,
    };

    if params.extract_data {
        info!("extract data ..");
        let frame = match engine.query(&artifact.sql) {
            Ok(frame) => frame,
            Err(err) => {
                error!(sql = %artifact.sql, "query failed");
                return Err(err.into());
            }
        };
        let (rows, columns) = frame.shape();
        info!(rows, columns, "extracted");
        Ok(engine.write_frame(frame, base)?)
    } else {
        Ok(engine.write_json(&artifact.to_json(), base)?)
    }
}

/// Append the `,`-delimited extra fields to the expression block, one field
/// per line, so each becomes one more output column.
fn merge_extra_fields(expr: &str, extra_fields: &str) -> String {
    format!("{expr}\n{}", extra_fields.replace(',', "\n"))
}

/// Replace every whole-word occurrence of `word` in `text`.
///
/// A match must not touch an identifier character on either side, so binding
/// slot 1 never rewrites the `input_1` prefix of an `input_10` reference.
/// Boundaries are checked against the original text, not the unconsumed
/// remainder, so an occurrence sitting right behind a skipped one still sees
/// its true left neighbor.
fn replace_word(text: &str, word: &str, replacement: &str) -> String {
    if word.is_empty() {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while let Some(found) = text[pos..].find(word) {
        let at = pos + found;
        let end = at + word.len();
        let bounded_left = text[..at]
            .chars()
            .next_back()
            .map_or(true, |ch| !is_word_char(ch));
        let bounded_right = text[end..].chars().next().map_or(true, |ch| !is_word_char(ch));

        out.push_str(&text[pos..at]);
        if bounded_left && bounded_right {
            out.push_str(replacement);
        } else {
            out.push_str(word);
        }
        pos = end;
    }
    out.push_str(&text[pos..]);
    out
}
