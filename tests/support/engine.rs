use std::cell::RefCell;

use expr2sql::engine::{EngineError, FrameLike, QueryEngine};
use expr2sql::inputs::source::DataHandle;
use serde_json::Value;

/// Minimal realized-result stand-in carrying only its `(rows, columns)` shape.
pub(crate) struct StubFrame {
    pub rows: usize,
    pub columns: usize,
}

impl FrameLike for StubFrame {
    fn shape(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }
}

/// Records every engine call so tests can assert on the SQL and base handles
/// the assembler hands over.
#[derive(Default)]
pub(crate) struct RecordingEngine {
    pub queries: RefCell<Vec<String>>,
    pub json_writes: RefCell<Vec<(Value, Option<String>)>>,
    pub frame_writes: RefCell<Vec<Option<String>>>,
    /// Make every `query` call fail, for exercising the error path.
    pub fail_queries: bool,
}

impl RecordingEngine {
    pub(crate) fn failing() -> RecordingEngine {
        RecordingEngine {
            fail_queries: true,
            ..RecordingEngine::default()
        }
    }
}

impl QueryEngine for RecordingEngine {
    type Frame = StubFrame;

    fn query(&self, sql: &str) -> Result<StubFrame, EngineError> {
        self.queries.borrow_mut().push(sql.to_string());
        if self.fail_queries {
            return Err(EngineError::Query("relation does not exist".to_string()));
        }
        Ok(StubFrame { rows: 3, columns: 2 })
    }

    fn write_frame(
        &self,
        _frame: StubFrame,
        base: Option<&DataHandle>,
    ) -> Result<DataHandle, EngineError> {
        self.frame_writes
            .borrow_mut()
            .push(base.map(|handle| handle.id.clone()));
        Ok(DataHandle::table("extracted_result"))
    }

    fn write_json(
        &self,
        payload: &Value,
        base: Option<&DataHandle>,
    ) -> Result<DataHandle, EngineError> {
        self.json_writes
            .borrow_mut()
            .push((payload.clone(), base.map(|handle| handle.id.clone())));
        Ok(DataHandle::json("artifact_handle", payload.to_string()))
    }
}
