//! Target dialects and their row-limit rewrites.

use regex::{Match, Regex};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::scan::{enclosing_scope_start, is_quoted_at, mask_parens};

/// ANSI row limit, including the whitespace in front of it so that removing it
/// leaves no gap.
static FETCH_FIRST_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*\bFETCH\s+FIRST\s+([0-9]+)\s+ROWS\s+ONLY\b")
        .expect("FETCH_FIRST_PATTERN regex should compile")
});

static WHERE_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bWHERE\b").expect("WHERE_KEYWORD regex should compile")
});

static ROWNUM_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bROWNUM\b").expect("ROWNUM_KEYWORD regex should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Dialect {
    #[default]
    #[serde(alias = "ANSI", alias = "ansi")]
    Ansi,
    #[serde(alias = "ORACLE", alias = "oracle")]
    Oracle,
}

impl Dialect {
    pub fn rewrites_row_limit(&self) -> bool {
        matches!(self, Dialect::Oracle)
    }

    /// Adapts `sql` to this dialect. Only row-limiting syntax is touched.
    pub fn prepare<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        match self {
            Dialect::Ansi => Cow::Borrowed(sql),
            Dialect::Oracle => Cow::Owned(rewrite_row_limit(sql)),
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Ansi => write!(f, "ansi"),
            Dialect::Oracle => write!(f, "oracle"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown SQL dialect '{0}', expected one of: ansi, oracle")]
pub struct ParseDialectError(String);

impl FromStr for Dialect {
    type Err = ParseDialectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ansi" => Ok(Dialect::Ansi),
            "oracle" => Ok(Dialect::Oracle),
            _ => Err(ParseDialectError(s.to_string())),
        }
    }
}

/// Rewrites an ANSI `FETCH FIRST <n> ROWS ONLY` clause into an Oracle
/// `ROWNUM` predicate.
///
/// Only the first clause outside quoted text is rewritten. The predicate is
/// joined with `AND` when a `WHERE` precedes the clause at its own nesting
/// level and opens a `WHERE` otherwise. A statement that already mentions
/// `ROWNUM` only loses the clause. Statements without the clause come back
/// unchanged, which makes the rewrite idempotent.
///
/// ```
/// use sqlguard::rewrite_row_limit;
///
/// assert_eq!(
///     rewrite_row_limit("SELECT a FROM t WHERE a>1 FETCH FIRST 5 ROWS ONLY"),
///     "SELECT a FROM t WHERE a>1 AND ROWNUM <= 5"
/// );
/// ```
pub fn rewrite_row_limit(sql: &str) -> String {
    let Some((clause, limit)) = find_row_limit(sql) else {
        return sql.to_string();
    };

    let head = &sql[..clause.start()];
    let tail = &sql[clause.end()..];

    // The query level the clause belongs to, with deeper levels blanked out
    let scope = mask_parens(&head[enclosing_scope_start(sql, clause.start())..]);

    let mut rewritten = String::with_capacity(sql.len() + 24);
    rewritten.push_str(head);
    if !ROWNUM_KEYWORD.is_match(sql) {
        let connective = if has_unquoted_match(&WHERE_KEYWORD, &scope) {
            "AND"
        } else {
            "WHERE"
        };
        rewritten.push_str(&format!(" {} ROWNUM <= {}", connective, limit.as_str()));
    }
    rewritten.push_str(tail);

    rewritten
}

/// First row-limit clause whose keyword is not inside a quoted literal,
/// together with its row count.
fn find_row_limit(sql: &str) -> Option<(Match<'_>, Match<'_>)> {
    FETCH_FIRST_PATTERN.captures_iter(sql).find_map(|caps| {
        let clause = caps.get(0)?;
        let limit = caps.get(1)?;
        let keyword_start = clause.end() - clause.as_str().trim_start().len();
        (!is_quoted_at(sql, keyword_start)).then_some((clause, limit))
    })
}

fn has_unquoted_match(pattern: &Regex, text: &str) -> bool {
    pattern
        .find_iter(text)
        .any(|m| !is_quoted_at(text, m.start()))
}
