//! # Validator
//!
//! Confirms that every table a statement reads from and every column it projects
//! exists in the caller's schema metadata.
//!
//! Column checks are deliberately lenient: a column is accepted when *any* table
//! in scope has it, whatever alias it was written against. When the statement
//! names no table at all (e.g. `SELECT SYSDATE`), every catalog table is in scope.

use std::borrow::Cow;
use tracing::debug;

use crate::catalog::{SchemaCatalog, SchemaMetadata};
use crate::dialect::Dialect;
use crate::parser::{HeuristicExtractor, ParsedReference, ReferenceExtractor};

/// Offending identifiers are upper-cased and sorted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("SQL references unknown table(s): {}", .0.join(", "))]
    UnknownTable(Vec<String>),
    #[error("SQL references unknown column(s): {}", .0.join(", "))]
    UnknownColumn(Vec<String>),
}

impl ValidationError {
    pub fn identifiers(&self) -> &[String] {
        match self {
            ValidationError::UnknownTable(names) | ValidationError::UnknownColumn(names) => names,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Validator<E = HeuristicExtractor> {
    dialect: Dialect,
    extractor: E,
}

impl Validator {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            extractor: HeuristicExtractor,
        }
    }
}

impl<E: ReferenceExtractor> Validator<E> {
    pub fn with_extractor(dialect: Dialect, extractor: E) -> Self {
        Self { dialect, extractor }
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    /// Returns the statement exactly as it gets analyzed: trimmed, without
    /// trailing semicolons and adapted to the target dialect.
    pub fn prepare<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        let statement = sql.trim().trim_end_matches(';');
        self.dialect.prepare(statement)
    }

    pub fn validate(&self, sql: &str, metadata: &SchemaMetadata) -> Result<(), ValidationError> {
        self.validate_catalog(sql, &SchemaCatalog::from_metadata(metadata))
    }

    pub fn validate_catalog(
        &self,
        sql: &str,
        catalog: &SchemaCatalog,
    ) -> Result<(), ValidationError> {
        let statement = self.prepare(sql);
        let parsed = self.extractor.extract(&statement);
        debug!(
            "Extracted {} table(s) and {} column(s) from statement",
            parsed.tables_found.len(),
            parsed.columns_used.len()
        );

        check_references(&parsed, catalog).inspect_err(|e| debug!("{}", e))
    }
}

/// Validates `sql` against `metadata` without any dialect rewrite.
pub fn validate(sql: &str, metadata: &SchemaMetadata) -> Result<(), ValidationError> {
    Validator::new(Dialect::Ansi).validate(sql, metadata)
}

fn check_references(
    parsed: &ParsedReference,
    catalog: &SchemaCatalog,
) -> Result<(), ValidationError> {
    let unknown_tables: Vec<String> = parsed
        .tables_found
        .iter()
        .filter(|table| !catalog.contains_table(table))
        .cloned()
        .collect();
    if !unknown_tables.is_empty() {
        return Err(ValidationError::UnknownTable(unknown_tables));
    }

    let scope: Vec<&str> = if parsed.tables_found.is_empty() {
        catalog.table_names().collect()
    } else {
        parsed.tables_found.iter().map(String::as_str).collect()
    };

    let unknown_columns: Vec<String> = parsed
        .columns_used
        .iter()
        .filter(|column| {
            !scope
                .iter()
                .any(|table| catalog.table_has_column(table, column))
        })
        .cloned()
        .collect();
    if !unknown_columns.is_empty() {
        return Err(ValidationError::UnknownColumn(unknown_columns));
    }

    Ok(())
}
