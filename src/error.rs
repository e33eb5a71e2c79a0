use thiserror::Error;

use crate::engine::EngineError;

/// Convenience alias for results produced by this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can go wrong while compiling or running a feature query.
///
/// There is no partial-success mode: a compilation either yields one complete
/// query string or fails with one of these.
#[derive(Debug, Error)]
pub enum Error {
    /// The default-tables list was delimited with the full-width `；`.
    #[error("full-width separator '；' found in the default tables list; use the ASCII ';' instead")]
    FullWidthSeparator,

    /// The expression block contained no expression lines after filtering.
    #[error("expression block is empty; at least one expression line is required")]
    EmptyExpression,

    /// An upstream reference bound to an input slot could not be materialized.
    #[error("malformed input in slot {slot}: {reason}")]
    MalformedInput {
        /// 1-based input slot index.
        slot: usize,
        /// What made the reference unusable.
        reason: String,
    },

    /// The execution engine rejected a query or a write.
    #[error(transparent)]
    Engine(#[from] EngineError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_input_message_names_the_slot() {
        let err = Error::MalformedInput {
            slot: 2,
            reason: "no SQL statements found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "malformed input in slot 2: no SQL statements found"
        );
    }

    #[test]
    fn engine_errors_pass_through_unwrapped() {
        let err = Error::from(EngineError::Query("relation missing".to_string()));
        assert_eq!(err.to_string(), "query failed: relation missing");
    }
}
