//! FROM/JOIN target extraction.
//!
//! Works on paren-masked SQL so that derived tables, table functions and
//! subqueries do not contribute targets.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

/// `FROM`/`JOIN` followed by a candidate token. Trailing `;`/`,` is captured
/// separately so that a listed table (`FROM a, b`) is not read as aliased.
static TABLE_TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\b(?:FROM|JOIN)\s+([A-Za-z0-9_."()]+)([;,]*)"#)
        .expect("TABLE_TOKEN_PATTERN regex should compile")
});

static ALIAS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s+(?:AS\s+)?([A-Za-z0-9_]+)")
        .expect("ALIAS_PATTERN regex should compile")
});

static TABLE_IDENTIFIER_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.]+$").expect("TABLE_IDENTIFIER_PATTERN regex should compile")
});

/// Words that can follow a table name without being its alias
const NON_ALIAS_KEYWORDS: &[&str] = &[
    "CONNECT", "CROSS", "EXCEPT", "FETCH", "FOR", "FULL", "GROUP", "HAVING", "INNER", "INTERSECT",
    "JOIN", "LEFT", "LIMIT", "MINUS", "NATURAL", "OFFSET", "ON", "ORDER", "OUTER", "RIGHT",
    "START", "UNION", "USING", "WHERE", "WINDOW",
];

/// A `FROM`/`JOIN` target. Any schema prefix is dropped, the catalog is keyed
/// by bare table name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableReference {
    pub table: String,
    pub alias: Option<String>,
}

impl TableReference {
    pub fn new(table: String) -> Self {
        Self { table, alias: None }
    }

    /// Case-normalized table name used for catalog lookups
    pub fn identity(&self) -> String {
        self.table.to_uppercase()
    }
}

fn is_alias_candidate(word: &str) -> bool {
    !NON_ALIAS_KEYWORDS
        .iter()
        .any(|keyword| keyword.eq_ignore_ascii_case(word))
}

/// Scans masked SQL for `FROM`/`JOIN` targets and their optional aliases.
///
/// Tokens holding a parenthesis (derived tables, table functions) and tokens
/// that are not plain dotted identifiers are skipped. References are returned
/// in text order and may repeat.
pub fn parse_table_refs(masked_sql: &str) -> Vec<TableReference> {
    let mut references = Vec::new();

    for caps in TABLE_TOKEN_PATTERN.captures_iter(masked_sql) {
        let (Some(token_match), Some(punctuation)) = (caps.get(1), caps.get(2)) else {
            continue;
        };

        let token = token_match.as_str().trim_matches('"');
        if token.contains(['(', ')']) {
            debug!("Skipping non-table token in FROM/JOIN: {}", token);
            continue;
        }

        let token = token.trim_end_matches([';', ',']);
        if !TABLE_IDENTIFIER_PATTERN.is_match(token) {
            debug!("Skipping non-identifier token in FROM/JOIN: {}", token);
            continue;
        }

        let table = token.rsplit('.').next().unwrap_or(token);
        if table.is_empty() {
            debug!("Skipping FROM/JOIN token without a table segment: {}", token);
            continue;
        }

        // A table followed by a list separator or statement end has no alias
        let alias = if punctuation.as_str().is_empty() {
            ALIAS_PATTERN
                .captures(&masked_sql[token_match.end()..])
                .and_then(|alias_caps| alias_caps.get(1))
                .map(|m| m.as_str())
                .filter(|word| is_alias_candidate(word))
                .map(str::to_string)
        } else {
            None
        };

        references.push(TableReference {
            table: table.to_string(),
            alias,
        });
    }

    references
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::mask_parens;

    fn tables_of(sql: &str) -> Vec<String> {
        parse_table_refs(&mask_parens(sql))
            .iter()
            .map(TableReference::identity)
            .collect()
    }

    #[test]
    fn test_simple_from() {
        let refs = parse_table_refs("SELECT a FROM users");
        assert_eq!(refs, vec![TableReference::new("users".to_string())]);
    }

    #[test]
    fn test_schema_prefix_is_dropped_from_identity() {
        let refs = parse_table_refs("SELECT a FROM hr.employees");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].identity(), "EMPLOYEES");
        assert_eq!(refs[0].table, "employees");

        let refs = parse_table_refs("SELECT a FROM db.hr.employees e");
        assert_eq!(refs[0].table, "employees");
        assert_eq!(refs[0].alias.as_deref(), Some("e"));
    }

    #[test]
    fn test_alias_with_and_without_as() {
        let refs = parse_table_refs("SELECT e.a FROM emp e JOIN dept AS d ON e.x = d.x");
        assert_eq!(refs.len(), 2);
        assert_eq!(refs[0].alias.as_deref(), Some("e"));
        assert_eq!(refs[1].table, "dept");
        assert_eq!(refs[1].alias.as_deref(), Some("d"));
    }

    #[test]
    fn test_keyword_after_table_is_not_an_alias() {
        let refs = parse_table_refs("SELECT a FROM t WHERE a = 1");
        assert_eq!(refs[0].alias, None);

        // The join keyword must stay available for the next match
        assert_eq!(
            tables_of("SELECT a FROM t1 LEFT JOIN t2 ON t1.id = t2.id"),
            vec!["T1", "T2"]
        );
        assert_eq!(tables_of("SELECT a FROM t1 JOIN t2 USING (id)"), vec!["T1", "T2"]);
    }

    #[test]
    fn test_comma_separated_tables_have_no_alias() {
        let refs = parse_table_refs("SELECT a FROM t1, t2");
        assert_eq!(refs[0].table, "t1");
        assert_eq!(refs[0].alias, None);
    }

    #[test]
    fn test_trailing_semicolon_is_stripped() {
        let refs = parse_table_refs("SELECT a FROM t;");
        assert_eq!(refs, vec![TableReference::new("t".to_string())]);
    }

    #[test]
    fn test_quoted_table_is_unquoted() {
        assert_eq!(tables_of(r#"SELECT a FROM "orders""#), vec!["ORDERS"]);
    }

    #[test]
    fn test_subquery_in_from_is_skipped() {
        assert_eq!(
            tables_of("SELECT x FROM (SELECT a AS x FROM inner_t) sub"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_table_function_is_skipped() {
        assert_eq!(
            tables_of("SELECT column_value FROM TABLE(split('a,b'))"),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_case_insensitive_keywords() {
        assert_eq!(tables_of("select a from t1 inner join t2 on 1=1"), vec!["T1", "T2"]);
    }
}
