use sqlguard::{Dialect, SchemaCatalog, SchemaMetadata, Validator};
use std::path::Path;
use tracing::info;

use super::metadata::load_tables_for_routine;
use crate::cli::display::Message;
use crate::cli::routines::{RoutineFailure, RoutineSuccess};

/// Checks `sql` against the metadata and prints the statement that was
/// checked, after trimming and any dialect rewrite.
pub fn validate_query(
    sql: &str,
    tables_path: &Path,
    dialect: Dialect,
) -> Result<RoutineSuccess, RoutineFailure> {
    let metadata = load_tables_for_routine(tables_path)?;
    let checked = check_statement(sql, &metadata, dialect)?;

    println!("{checked}");

    Ok(RoutineSuccess::success(Message::new(
        "Valid".to_string(),
        format!("All referenced tables and columns exist ({dialect})"),
    )))
}

fn check_statement(
    sql: &str,
    metadata: &SchemaMetadata,
    dialect: Dialect,
) -> Result<String, RoutineFailure> {
    let validator = Validator::new(dialect);
    let catalog = SchemaCatalog::from_metadata(metadata);
    info!(
        "Validating statement against {} table(s) with the {} dialect",
        catalog.len(),
        dialect
    );

    validator
        .validate_catalog(sql, &catalog)
        .map_err(|e| RoutineFailure::error(Message::new("Invalid".to_string(), e.to_string())))?;

    Ok(validator.prepare(sql).into_owned())
}
