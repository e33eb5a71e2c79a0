/// SELECT statement assembly from expression and filter blocks.
pub mod expr_query;
/// Table resolution, deduplication, and FROM-clause rendering.
pub mod join_plan;
