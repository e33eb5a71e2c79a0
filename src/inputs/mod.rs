/// Materialization of bound slots into preparatory SQL plus table ids.
pub mod materializer;
/// Input-slot reference types: raw SQL, catalog handles, payload carriers.
pub mod source;
