//! Upstream data-source references bound to input slots.
//!
//! An input slot carries either raw SQL text or a catalog [`DataHandle`]. The
//! compiler only ever reads these; producing new handles is the engine's job.

use serde::{Deserialize, Serialize};

/// Reserved placeholder names for the three input slots, in slot order.
pub const SLOT_NAMES: [&str; 3] = ["input_1", "input_2", "input_3"];

/// Opaque reference to an upstream data source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputSource {
    /// Raw SQL text standing in for the upstream result.
    Sql(String),
    /// A handle issued by the platform's data catalog.
    Handle(DataHandle),
}

/// A catalog data handle together with its payload carrier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataHandle {
    /// Catalog identifier; doubles as the physical table name for tabular handles.
    pub id: String,
    /// What the handle's payload actually is.
    pub carrier: Carrier,
}

/// Payload carrier of a [`DataHandle`].
///
/// Anything that is neither a JSON nor a text payload is treated as an
/// already-physical table whose name is the handle id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "lowercase")]
pub enum Carrier {
    /// JSON document; its `sql` field holds the query text.
    Json(String),
    /// Plain SQL text.
    Text(String),
    /// Already a physical table, no payload to read.
    Table,
}

impl DataHandle {
    /// Handle for an already-materialized table.
    pub fn table(id: impl Into<String>) -> DataHandle {
        DataHandle {
            id: id.into(),
            carrier: Carrier::Table,
        }
    }

    /// Handle whose payload is a JSON document.
    pub fn json(id: impl Into<String>, payload: impl Into<String>) -> DataHandle {
        DataHandle {
            id: id.into(),
            carrier: Carrier::Json(payload.into()),
        }
    }

    /// Handle whose payload is plain SQL text.
    pub fn text(id: impl Into<String>, payload: impl Into<String>) -> DataHandle {
        DataHandle {
            id: id.into(),
            carrier: Carrier::Text(payload.into()),
        }
    }
}
