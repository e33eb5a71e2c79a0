/// Split a text block into trimmed, non-empty, non-comment lines.
///
/// A line is a comment when its first non-whitespace characters are `--` or
/// `#`. Blank lines are dropped outright. Source order is preserved; it
/// drives both output column order and join discovery order downstream.
pub fn split_lines(block: &str) -> Vec<String> {
    let mut lines = Vec::new();
    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("--") || line.starts_with('#') {
            continue;
        }
        lines.push(line.to_string());
    }
    lines
}
