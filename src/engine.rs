//! Seam between the compiler and the platform's query engine.
//!
//! The compiler never talks to a database directly. The extraction path in
//! [`crate::assembler`] receives a [`QueryEngine`] from the caller, so tests
//! (and embedders without an engine) substitute their own implementation.
//! Calls are synchronous, side-effecting, and never retried here.

use serde_json::Value;
use thiserror::Error;

use crate::inputs::source::DataHandle;

/// Error returned by a [`QueryEngine`] implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine rejected or failed while executing a query.
    #[error("query failed: {0}")]
    Query(String),
    /// The engine failed to persist an output handle.
    #[error("write failed: {0}")]
    Write(String),
}

/// Behavior required of a realized tabular result.
pub trait FrameLike {
    /// `(rows, columns)` of the realized result.
    fn shape(&self) -> (usize, usize);
}

/// Query-execution collaborator.
pub trait QueryEngine {
    /// Realized tabular result type.
    type Frame: FrameLike;

    /// Execute `sql` and realize the full result.
    fn query(&self, sql: &str) -> Result<Self::Frame, EngineError>;

    /// Persist a realized frame as a new tabular data handle.
    ///
    /// `base` carries lineage metadata forward onto the new handle.
    fn write_frame(
        &self,
        frame: Self::Frame,
        base: Option<&DataHandle>,
    ) -> Result<DataHandle, EngineError>;

    /// Persist a JSON payload as a new data handle.
    fn write_json(&self, payload: &Value, base: Option<&DataHandle>)
        -> Result<DataHandle, EngineError>;
}
