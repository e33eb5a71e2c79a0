/// Split SQL text into its top-level `;`-delimited statements.
///
/// Semicolons inside single-quoted literals do not split. The delimiter is
/// dropped; surrounding whitespace is kept for the caller to trim, and an
/// empty trailing piece appears when the text ends with `;`.
pub fn split_statements(sql: &str) -> Vec<&str> {
    let mut in_quotes = false;
    let mut start = 0usize;
    let mut parts: Vec<&str> = Vec::new();

    for (idx, ch) in sql.char_indices() {
        match ch {
            '\'' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                parts.push(&sql[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&sql[start..]);
    parts
}
