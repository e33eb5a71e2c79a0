//! Compile per-line factor expressions into a single per-date/per-instrument SQL feature query.
#![warn(missing_docs)]

/// Query assembly: mode dispatch, placeholder substitution, and the extraction path.
pub mod assembler;
/// Expression-to-SQL compilation: join planning and SELECT assembly.
pub mod compiler;
/// Injectable query-execution collaborator interface.
pub mod engine;
/// Crate-wide error taxonomy and result alias.
pub mod error;
/// Input-slot references and their materialization into named tables.
pub mod inputs;
/// Text-level analysis: line filtering, statement splitting, table-reference extraction.
pub mod parser;
