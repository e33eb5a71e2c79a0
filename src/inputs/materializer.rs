//! Conversion of bound input slots into named, queryable tables.
//!
//! SQL-backed slots become a `CREATE TABLE <id> AS ...` preparatory statement
//! with a freshly minted identifier; handle-backed slots reuse their existing
//! table name and contribute no preparatory SQL.

use uuid::Uuid;

use crate::error::{Error, Result};
use crate::inputs::source::{Carrier, DataHandle, InputSource, SLOT_NAMES};
use crate::parser::statements::split_statements;

/// Outcome of materializing one bound input slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaterializedInput {
    /// Placeholder name the slot is addressed by (`input_1`..`input_3`).
    pub name: String,
    /// Physical table identifier the placeholder resolves to.
    pub table_id: String,
    /// Preparatory statements creating `table_id`; empty for handle-backed slots.
    pub sql: String,
}

/// Mint a table identifier unique across slots and concurrent compilations.
fn fresh_table_id() -> String {
    format!("_t_{}", Uuid::new_v4().simple())
}

/// Resolve one bound slot into preparatory SQL plus a table identifier.
///
/// `slot` is 1-based. Carrier dispatch: raw SQL and text payloads are used
/// directly, JSON payloads contribute their `sql` field, and any other handle
/// is taken to be a physical table already. For the SQL-backed cases, only
/// the last top-level statement is rewritten into a `CREATE TABLE ... AS`;
/// earlier statements pass through unmodified.
pub fn materialize(slot: usize, source: &InputSource) -> Result<MaterializedInput> {
    let name = slot_name(slot);

    let sql_text = match source {
        InputSource::Sql(sql) => sql.clone(),
        InputSource::Handle(handle) => match &handle.carrier {
            Carrier::Json(payload) => sql_from_json_payload(slot, payload)?,
            Carrier::Text(sql) => sql.clone(),
            Carrier::Table => {
                return Ok(MaterializedInput {
                    name,
                    table_id: handle.id.clone(),
                    sql: String::new(),
                });
            }
        },
    };

    let mut parts: Vec<String> = split_statements(&sql_text)
        .into_iter()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect();

    let table_id = fresh_table_id();
    match parts.last_mut() {
        Some(last) => *last = format!("CREATE TABLE {table_id} AS {last}"),
        None => {
            return Err(Error::MalformedInput {
                slot,
                reason: "no SQL statements found".to_string(),
            });
        }
    }

    let mut sql = parts.join(";\n");
    sql.push_str(";\n");

    Ok(MaterializedInput {
        name,
        table_id,
        sql,
    })
}

/// Materialize every bound slot, preserving slot order and slot numbering.
pub fn materialize_inputs(inputs: &[Option<InputSource>; 3]) -> Result<Vec<MaterializedInput>> {
    let mut items = Vec::new();
    for (index, source) in inputs.iter().enumerate() {
        let Some(source) = source else { continue };
        items.push(materialize(index + 1, source)?);
    }
    Ok(items)
}

/// Concatenated preparatory SQL for `items`, in slot order.
pub fn preparatory_sql(items: &[MaterializedInput]) -> String {
    items.iter().map(|item| item.sql.as_str()).collect()
}

fn slot_name(slot: usize) -> String {
    slot.checked_sub(1)
        .and_then(|index| SLOT_NAMES.get(index))
        .map_or_else(|| format!("input_{slot}"), |name| (*name).to_string())
}

fn sql_from_json_payload(slot: usize, payload: &str) -> Result<String> {
    let value: serde_json::Value = serde_json::from_str(payload).map_err(|err| {
        Error::MalformedInput {
            slot,
            reason: format!("json payload is not valid JSON: {err}"),
        }
    })?;
    match value.get("sql").and_then(serde_json::Value::as_str) {
        Some(sql) => Ok(sql.to_string()),
        None => Err(Error::MalformedInput {
            slot,
            reason: "json payload has no string `sql` field".to_string(),
        }),
    }
}
