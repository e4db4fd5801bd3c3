//! Inspecting table metadata: normalized column sets and prompt summaries.

use serde_json::{Map, Value};
use sqlguard::{normalize_columns, summarize_tables, SchemaMetadata};
use std::path::Path;

use super::metadata::load_tables_for_routine;
use crate::cli::display::Message;
use crate::cli::routines::{RoutineFailure, RoutineSuccess};

/// Prints the normalized columns of `table`, or of every table when none is
/// named. Table lookup ignores case.
pub fn show_columns(
    tables_path: &Path,
    table: Option<&str>,
) -> Result<RoutineSuccess, RoutineFailure> {
    let metadata = load_tables_for_routine(tables_path)?;
    let columns = column_listing(&metadata, table)?;

    println!("{}", to_pretty_json(&columns)?);

    Ok(RoutineSuccess::success(Message::new(
        "Columns".to_string(),
        match table {
            Some(table) => format!("Normalized columns of {table}"),
            None => format!("Normalized columns of {} table(s)", metadata.len()),
        },
    )))
}

fn column_listing(metadata: &SchemaMetadata, table: Option<&str>) -> Result<Value, RoutineFailure> {
    let as_json = |table_metadata: &Value| -> Value {
        normalize_columns(table_metadata)
            .into_iter()
            .map(Value::String)
            .collect()
    };

    match table {
        Some(name) => metadata
            .get(name)
            .or_else(|| {
                metadata
                    .iter()
                    .find(|(key, _)| key.eq_ignore_ascii_case(name))
                    .map(|(_, value)| value)
            })
            .map(as_json)
            .ok_or_else(|| {
                RoutineFailure::error(Message::new(
                    "Columns".to_string(),
                    format!("Table {name} is not in the metadata"),
                ))
            }),
        None => Ok(Value::Object(
            metadata
                .iter()
                .map(|(name, table_metadata)| (name.clone(), as_json(table_metadata)))
                .collect::<Map<String, Value>>(),
        )),
    }
}

/// Prints the size-bounded summary that prompts embed.
pub fn show_summary(
    tables_path: &Path,
    max_chars: usize,
) -> Result<RoutineSuccess, RoutineFailure> {
    let metadata = load_tables_for_routine(tables_path)?;
    let summary = summarize_tables(&metadata, max_chars);

    println!("{}", to_pretty_json(&summary)?);

    Ok(RoutineSuccess::success(Message::new(
        "Summarized".to_string(),
        format!("{} table(s), limit {} chars", summary.len(), max_chars),
    )))
}

pub(crate) fn to_pretty_json<T: serde::Serialize>(value: &T) -> Result<String, RoutineFailure> {
    serde_json::to_string_pretty(value).map_err(|e| {
        RoutineFailure::new(
            Message::new("Output".to_string(), "Failed to format JSON".to_string()),
            e,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn metadata() -> SchemaMetadata {
        json!({
            "Orders": {"columns": {"id": "identifier", "amount": "total"}},
            "legacy": "see wiki"
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn test_single_table_lookup_ignores_case() {
        assert_eq!(
            column_listing(&metadata(), Some("orders")).unwrap(),
            json!(["AMOUNT", "ID"])
        );
    }

    #[test]
    fn test_all_tables() {
        assert_eq!(
            column_listing(&metadata(), None).unwrap(),
            json!({"Orders": ["AMOUNT", "ID"], "legacy": []})
        );
    }

    #[test]
    fn test_unknown_table() {
        let failure = column_listing(&metadata(), Some("missing")).unwrap_err();
        assert_eq!(failure.message.details, "Table missing is not in the metadata");
    }
}
