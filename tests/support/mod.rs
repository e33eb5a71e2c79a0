#![allow(dead_code)]

pub(crate) mod engine;

use std::path::PathBuf;

use expr2sql::assembler::Params;

pub(crate) fn fixture_dir(fixture: &str) -> PathBuf {
    PathBuf::from("tests/fixtures").join(fixture)
}

pub(crate) fn read_fixture(fixture: &str, file: &str) -> String {
    let path = fixture_dir(fixture).join(file);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", path.display()))
}

/// Momentum factor block compiled with the platform defaults.
pub(crate) fn momentum_params() -> Params {
    Params {
        expr: read_fixture("momentum", "expr.sql"),
        expr_filters: read_fixture("momentum", "filters.sql"),
        ..Params::default()
    }
}
