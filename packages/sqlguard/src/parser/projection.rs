//! Projection list column resolution.
//!
//! Each SELECT item is reduced to the identifier it most likely reads from:
//! aliases are stripped, function calls are unwrapped to their first argument
//! and qualifiers are dropped. This is a heuristic and is known to misread
//! expressions that end in a bare column without an alias (`a + b` resolves to
//! `a`), `CASE` expressions and literals.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;
use tracing::debug;

use crate::scan::split_top_level;

pub const WILDCARD: &str = "*";

static SELECT_KEYWORD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSELECT\b").expect("SELECT_KEYWORD regex should compile")
});

static FROM_KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bFROM\b").expect("FROM_KEYWORD regex should compile"));

static AS_ALIAS_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+AS\s+[A-Za-z0-9_]+$").expect("AS_ALIAS_SUFFIX regex should compile")
});

static BARE_ALIAS_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+[A-Za-z0-9_]+$").expect("BARE_ALIAS_SUFFIX regex should compile")
});

static FUNCTION_CALL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^([A-Za-z_][A-Za-z0-9_]*)\s*\((.*)\)$")
        .expect("FUNCTION_CALL regex should compile")
});

/// Returns the text between the first `SELECT` and the first `FROM` after it.
///
/// Keywords are located in `masked_sql`, the slice is taken from `sql`; both
/// must share the same byte layout (see [`crate::scan::mask_parens`]).
pub fn projection_region<'a>(sql: &'a str, masked_sql: &str) -> Option<&'a str> {
    let select = SELECT_KEYWORD.find(masked_sql)?;
    let from = FROM_KEYWORD.find_at(masked_sql, select.end())?;
    sql.get(select.end()..from.start())
}

/// Reduces one projection item to an upper-cased column identifier.
///
/// Returns `None` for wildcards and items that leave nothing behind.
pub fn resolve_column(item: &str) -> Option<String> {
    let without_as = AS_ALIAS_SUFFIX.replace(item, "");
    let mut expr = BARE_ALIAS_SUFFIX.replace(&without_as, "").into_owned();

    loop {
        let Some(caps) = FUNCTION_CALL.captures(expr.trim()) else {
            break;
        };
        let arguments = caps.get(2).map_or("", |m| m.as_str()).trim();
        if arguments.is_empty() {
            break;
        }

        let first = split_top_level(arguments, ',')
            .into_iter()
            .next()
            .unwrap_or_default();
        if first == expr {
            debug!("Stopping function unwrap, no progress on: {}", expr);
            break;
        }
        expr = first;
    }

    let segment = expr
        .rsplit('.')
        .next()
        .unwrap_or_default()
        .trim()
        .trim_matches('"');
    let column: String = segment
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect::<String>()
        .to_uppercase();

    if column.is_empty() || column == WILDCARD {
        None
    } else {
        Some(column)
    }
}

/// Collects the columns read by the first statement's projection list.
pub fn parse_projection(sql: &str, masked_sql: &str) -> BTreeSet<String> {
    let Some(region) = projection_region(sql, masked_sql) else {
        debug!("No SELECT ... FROM region found, no projected columns to check");
        return BTreeSet::new();
    };

    split_top_level(region, ',')
        .iter()
        .filter(|item| !item.is_empty())
        .filter_map(|item| resolve_column(item))
        .collect()
}
