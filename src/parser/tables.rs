/// True for characters that can appear inside an identifier token.
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Remove every complete single-quoted literal from `line`, quotes included.
///
/// Literal values (e.g. instrument codes such as `'jm2201.DCE'`) must never
/// be mistaken for table references, so their whole span is blanked before
/// scanning. An unterminated quote is left as-is.
pub fn mask_string_literals(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('\'') {
        out.push_str(&rest[..open]);
        match rest[open + 1..].find('\'') {
            Some(close) => rest = &rest[open + 1 + close + 1..],
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Collect identifiers used in `name.column` or `name.*` position in `line`.
///
/// This is a heuristic lexical scan, not SQL parsing: after masking string
/// literals, any identifier token that starts with a letter or underscore, is
/// not itself preceded by a `.`, and is directly followed by `.` plus a
/// letter, underscore, or `*` counts as a table reference. Aliases introduced
/// mid-expression are not resolved. Duplicates and source order are kept for
/// the join planner to handle.
pub fn extract_table_refs(line: &str) -> Vec<String> {
    let masked = mask_string_literals(line);
    let chars: Vec<char> = masked.chars().collect();
    let mut refs = Vec::new();
    let mut idx = 0;

    while idx < chars.len() {
        if !is_word_char(chars[idx]) {
            idx += 1;
            continue;
        }
        let start = idx;
        while idx < chars.len() && is_word_char(chars[idx]) {
            idx += 1;
        }

        let starts_like_identifier = chars[start].is_ascii_alphabetic() || chars[start] == '_';
        let preceded_by_dot = start > 0 && chars[start - 1] == '.';
        let followed_by_member = chars.get(idx) == Some(&'.')
            && chars
                .get(idx + 1)
                .is_some_and(|ch| ch.is_ascii_alphabetic() || *ch == '_' || *ch == '*');

        if starts_like_identifier && !preceded_by_dot && followed_by_member {
            refs.push(chars[start..idx].iter().collect());
        }
    }

    refs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_qualified_column_references() {
        assert_eq!(
            extract_table_refs("a.x + b.y AS z"),
            vec!["a".to_string(), "b".to_string()]
        );
    }

    #[test]
    fn extracts_star_projection_references() {
        assert_eq!(
            extract_table_refs("input_1.* EXCLUDE(date, instrument)"),
            vec!["input_1".to_string()]
        );
    }

    #[test]
    fn chained_qualifiers_only_yield_the_head() {
        assert_eq!(extract_table_refs("a.b.c"), vec!["a".to_string()]);
    }

    #[test]
    fn quoted_literals_never_contribute_references() {
        assert!(extract_table_refs("instrument IN ('jm2201.DCE')").is_empty());
        assert_eq!(
            extract_table_refs("t.code = 'abc.def'"),
            vec!["t".to_string()]
        );
    }

    #[test]
    fn numeric_heads_and_bare_columns_are_ignored() {
        assert!(extract_table_refs("9abc.x").is_empty());
        assert!(extract_table_refs("close / open AS ratio").is_empty());
        assert!(extract_table_refs("m_lag(close, 3.5)").is_empty());
    }

    #[test]
    fn duplicates_and_order_are_preserved() {
        assert_eq!(
            extract_table_refs("t.a + u.b + t.c"),
            vec!["t".to_string(), "u".to_string(), "t".to_string()]
        );
    }

    #[test]
    fn masking_removes_literal_spans_entirely() {
        assert_eq!(mask_string_literals("x = 'a.b' + 'c'"), "x =  + ");
        assert_eq!(mask_string_literals("no quotes"), "no quotes");
    }

    #[test]
    fn masking_keeps_an_unterminated_quote() {
        assert_eq!(mask_string_literals("x = 'open"), "x = 'open");
    }
}
