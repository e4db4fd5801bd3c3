//! Size-bounded catalog projection for prompts.
//!
//! The output only bounds how much schema text is shown to a language model.
//! Validation never reads it, it always works from the full metadata.

use serde_json::{json, Map, Value};
use tracing::debug;

use crate::catalog::{value_text, RawTableMetadata, SchemaMetadata, COLUMNS_KEY};

pub const DEFAULT_SUMMARY_MAX_CHARS: usize = 8_000;
/// Column names kept per table once meanings are dropped
pub const MAX_SUMMARY_COLUMNS: usize = 50;

const INFO_KEY: &str = "info";
const TRUNCATED_KEY: &str = "truncated";

/// Shrinks `metadata` until its compact JSON fits in `max_chars` characters.
///
/// Three forms are tried in order:
/// 1. columns with their meanings, unusual shapes collapsed to an `info` string
/// 2. column names only, at most [`MAX_SUMMARY_COLUMNS`] per table
/// 3. table names with empty column lists
pub fn summarize_tables(metadata: &SchemaMetadata, max_chars: usize) -> SchemaMetadata {
    let compact: SchemaMetadata = metadata
        .iter()
        .map(|(name, table_metadata)| (name.clone(), compact_table(table_metadata)))
        .collect();
    let compact_len = serialized_len(&compact);
    if compact_len <= max_chars {
        return compact;
    }
    debug!(
        "Compact table summary is {} chars (limit {}), dropping column meanings",
        compact_len, max_chars
    );

    let names_only: SchemaMetadata = compact
        .iter()
        .map(|(name, entry)| (name.clone(), column_names_only(entry)))
        .collect();
    let names_only_len = serialized_len(&names_only);
    if names_only_len <= max_chars {
        return names_only;
    }
    debug!(
        "Column-name summary is {} chars (limit {}), keeping table names only",
        names_only_len, max_chars
    );

    metadata
        .keys()
        .map(|name| (name.clone(), json!({ COLUMNS_KEY: [] })))
        .collect()
}

fn compact_table(table_metadata: &Value) -> Value {
    match RawTableMetadata::classify(table_metadata) {
        RawTableMetadata::ColumnMeanings(columns) => {
            let columns: Map<String, Value> = columns
                .iter()
                .map(|(column, meaning)| (column.clone(), displayable(meaning)))
                .collect();
            json!({ COLUMNS_KEY: columns })
        }
        RawTableMetadata::ColumnList(columns) => json!({ COLUMNS_KEY: columns }),
        RawTableMetadata::FlatMeanings(entry) if entry.values().all(is_scalar) => {
            let columns: Map<String, Value> = entry
                .iter()
                .map(|(column, meaning)| (column.clone(), Value::String(value_text(meaning))))
                .collect();
            json!({ COLUMNS_KEY: columns })
        }
        RawTableMetadata::FlatMeanings(_) => json!({ INFO_KEY: table_metadata.to_string() }),
        RawTableMetadata::Opaque(value) => json!({ INFO_KEY: value_text(value) }),
    }
}

fn column_names_only(compact_entry: &Value) -> Value {
    let names: Vec<String> = match compact_entry.get(COLUMNS_KEY) {
        Some(Value::Object(columns)) => columns.keys().cloned().collect(),
        Some(Value::Array(columns)) => columns.iter().map(value_text).collect(),
        _ => Vec::new(),
    };

    if names.len() > MAX_SUMMARY_COLUMNS {
        json!({
            COLUMNS_KEY: &names[..MAX_SUMMARY_COLUMNS],
            TRUNCATED_KEY: true,
        })
    } else {
        json!({ COLUMNS_KEY: names })
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Object(_) | Value::Array(_))
}

/// Keeps printable meanings and replaces nested ones with their JSON type name.
fn displayable(meaning: &Value) -> Value {
    match meaning {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => meaning.clone(),
        Value::Null => Value::String("null".to_string()),
        Value::Array(_) => Value::String("array".to_string()),
        Value::Object(_) => Value::String("object".to_string()),
    }
}

fn serialized_len(summary: &SchemaMetadata) -> usize {
    serde_json::to_string(summary)
        .map(|s| s.chars().count())
        .unwrap_or(usize::MAX)
}
