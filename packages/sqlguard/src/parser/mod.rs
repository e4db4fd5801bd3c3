//! # Reference extraction
//!
//! Pulls the referenced tables, aliases and projected columns out of a SQL
//! statement without a grammar. The validator only talks to this module through
//! [`ReferenceExtractor`], so a real SQL parser can be dropped in later without
//! changing validation results for callers.

use std::collections::{BTreeMap, BTreeSet};

use crate::scan::mask_parens;

pub mod projection;
pub mod tables;

pub use projection::parse_projection;
pub use tables::{parse_table_refs, TableReference};

/// Upper-cased references found in one statement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedReference {
    pub tables_found: BTreeSet<String>,
    /// Alias to table name, every value is also in `tables_found`
    pub alias_map: BTreeMap<String, String>,
    /// Never contains the wildcard
    pub columns_used: BTreeSet<String>,
}

impl ParsedReference {
    fn record_table(&mut self, reference: &TableReference) {
        let table = reference.identity();
        if let Some(alias) = &reference.alias {
            self.alias_map.insert(alias.to_uppercase(), table.clone());
        }
        self.tables_found.insert(table);
    }
}

pub trait ReferenceExtractor {
    fn extract(&self, sql: &str) -> ParsedReference;
}

/// Regex and paren-masking based extractor.
#[derive(Debug, Default, Clone, Copy)]
pub struct HeuristicExtractor;

impl ReferenceExtractor for HeuristicExtractor {
    fn extract(&self, sql: &str) -> ParsedReference {
        let masked = mask_parens(sql);
        let mut parsed = ParsedReference::default();

        for reference in parse_table_refs(&masked) {
            parsed.record_table(&reference);
        }
        parsed.columns_used = parse_projection(sql, &masked);

        parsed
    }
}
