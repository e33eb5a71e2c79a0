/// Line filtering for expression and filter blocks.
pub mod lines;
/// Quote-aware splitting of upstream SQL into top-level statements.
pub mod statements;
/// Heuristic table-reference extraction from expression text.
pub mod tables;
