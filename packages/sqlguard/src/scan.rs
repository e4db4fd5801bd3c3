//! Quote and parenthesis aware scanning helpers.
//!
//! Both helpers walk the text once, tracking single/double quoted regions and
//! the parenthesis depth. They never fail: unbalanced quotes or parentheses just
//! leave the state open until the end of the input.

/// Placeholder written over masked characters
pub const MASK_CHAR: char = ' ';

#[derive(Debug, Default, Clone, Copy)]
struct ScanState {
    depth: usize,
    in_single: bool,
    in_double: bool,
}

impl ScanState {
    fn in_quotes(&self) -> bool {
        self.in_single || self.in_double
    }

    fn step(&mut self, ch: char) {
        match ch {
            // A quote of one kind is plain text while the other kind is open
            '\'' if !self.in_double => self.in_single = !self.in_single,
            '"' if !self.in_single => self.in_double = !self.in_double,
            '(' if !self.in_quotes() => self.depth += 1,
            ')' if !self.in_quotes() => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
    }
}

/// Splits `s` on `separator` wherever it occurs at depth zero and outside quotes.
///
/// Every fragment is trimmed. The last fragment is always returned, so an empty
/// input yields a single empty string.
///
/// ```
/// use sqlguard::scan::split_top_level;
///
/// assert_eq!(
///     split_top_level("a, f(b,c), 'x,y'", ','),
///     vec!["a", "f(b,c)", "'x,y'"]
/// );
/// ```
pub fn split_top_level(s: &str, separator: char) -> Vec<String> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut state = ScanState::default();

    for ch in s.chars() {
        if ch == separator && state.depth == 0 && !state.in_quotes() {
            parts.push(current.trim().to_string());
            current.clear();
            continue;
        }
        state.step(ch);
        current.push(ch);
    }
    parts.push(current.trim().to_string());

    parts
}

/// Blanks every character nested inside parentheses, except quoted literals.
///
/// The outermost parentheses are kept and the output has the same byte length
/// as the input, so offsets found in the masked text can slice the original.
/// The result is only meant for keyword scanning.
pub fn mask_parens(s: &str) -> String {
    let mut masked = String::with_capacity(s.len());
    let mut state = ScanState::default();

    for ch in s.chars() {
        let depth_before = state.depth;
        let quoted_before = state.in_quotes();
        state.step(ch);

        let keep =
            depth_before == 0 || state.depth == 0 || quoted_before || state.in_quotes();
        if keep {
            masked.push(ch);
        } else {
            masked.extend(std::iter::repeat(MASK_CHAR).take(ch.len_utf8()));
        }
    }

    masked
}

/// Whether the character starting at byte `offset` sits inside a quoted literal
/// or quoted identifier.
pub fn is_quoted_at(s: &str, offset: usize) -> bool {
    let mut state = ScanState::default();
    for (idx, ch) in s.char_indices() {
        if idx >= offset {
            break;
        }
        state.step(ch);
    }
    state.in_quotes()
}

/// Byte offset just past the innermost `(` still open at `offset`, or 0 when
/// `offset` is at the top level.
pub fn enclosing_scope_start(s: &str, offset: usize) -> usize {
    let mut opened = Vec::new();
    let mut state = ScanState::default();

    for (idx, ch) in s.char_indices() {
        if idx >= offset {
            break;
        }
        if !state.in_quotes() {
            match ch {
                '(' => opened.push(idx + 1),
                ')' => {
                    opened.pop();
                }
                _ => {}
            }
        }
        state.step(ch);
    }

    opened.last().copied().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_respects_parens_and_quotes() {
        assert_eq!(
            split_top_level("a, f(b,c), 'x,y'", ','),
            vec!["a", "f(b,c)", "'x,y'"]
        );
    }

    #[test]
    fn test_split_empty_input_yields_single_empty_fragment() {
        assert_eq!(split_top_level("", ','), vec![""]);
    }

    #[test]
    fn test_split_keeps_trailing_fragment() {
        assert_eq!(split_top_level("a,b", ','), vec!["a", "b"]);
        assert_eq!(split_top_level("a,", ','), vec!["a", ""]);
    }

    #[test]
    fn test_split_quote_kinds_do_not_toggle_each_other() {
        // The apostrophe inside the double-quoted identifier must not open a literal
        assert_eq!(
            split_top_level(r#""it's", b"#, ','),
            vec![r#""it's""#, "b"]
        );
        assert_eq!(
            split_top_level(r#"'say "hi", ok', c"#, ','),
            vec![r#"'say "hi", ok'"#, "c"]
        );
    }

    #[test]
    fn test_split_unbalanced_close_paren_does_not_underflow() {
        assert_eq!(split_top_level("a), b", ','), vec!["a)", "b"]);
    }

    #[test]
    fn test_split_other_separator() {
        assert_eq!(split_top_level("a.b.'c.d'", '.'), vec!["a", "b", "'c.d'"]);
    }

    #[test]
    fn test_mask_blanks_nested_content() {
        let sql = "SELECT f(a, (b)) FROM t";
        let masked = mask_parens(sql);
        assert_eq!(masked, format!("SELECT f({}) FROM t", " ".repeat(6)));
        assert_eq!(masked.len(), sql.len());
    }

    #[test]
    fn test_mask_hides_subquery_keywords() {
        let sql = "SELECT a FROM (SELECT b FROM inner_t) x";
        let masked = mask_parens(sql);
        assert!(!masked.contains("inner_t"));
        assert!(masked.starts_with("SELECT a FROM ("));
        assert!(masked.ends_with(") x"));
    }

    #[test]
    fn test_mask_preserves_quoted_literals() {
        let sql = "SELECT f('a (b)', c) FROM t";
        let masked = mask_parens(sql);
        assert!(masked.contains("'a (b)'"));
        assert!(!masked.contains(" c)"));
        assert_eq!(masked.len(), sql.len());
    }

    #[test]
    fn test_mask_keeps_byte_layout_for_multibyte_chars() {
        let sql = "SELECT f('x', é) FROM t";
        let masked = mask_parens(sql);
        assert_eq!(masked.len(), sql.len());
        assert_eq!(masked.find("FROM"), sql.find("FROM"));
    }

    #[test]
    fn test_mask_without_parens_is_identity() {
        let sql = "SELECT a, b FROM t WHERE a = 'x'";
        assert_eq!(mask_parens(sql), sql);
    }

    #[test]
    fn test_is_quoted_at() {
        let sql = "SELECT 'a(b' AS x, \"it's\" FROM t";
        assert!(!is_quoted_at(sql, 0));
        assert!(is_quoted_at(sql, sql.find("a(b").unwrap()));
        assert!(!is_quoted_at(sql, sql.find("AS").unwrap()));
        assert!(is_quoted_at(sql, sql.find("s\"").unwrap()));
        assert!(!is_quoted_at(sql, sql.find("FROM").unwrap()));
    }

    #[test]
    fn test_enclosing_scope_start() {
        let sql = "SELECT * FROM (SELECT a FROM (SELECT 1) x WHERE a > 1) s";
        assert_eq!(enclosing_scope_start(sql, sql.find("FROM").unwrap()), 0);

        let inner_where = sql.find("WHERE").unwrap();
        assert_eq!(enclosing_scope_start(sql, inner_where), sql.find('(').unwrap() + 1);

        // Parentheses inside a literal do not open a scope
        let sql = "SELECT ')(' FROM t WHERE a = 1";
        assert_eq!(enclosing_scope_start(sql, sql.find("WHERE").unwrap()), 0);
    }
}
