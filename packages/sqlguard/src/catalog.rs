//! # Schema catalog
//!
//! Caller-supplied table metadata comes in a few shapes:
//!
//! ```json
//! {
//!   "orders":    {"columns": ["ID", "AMOUNT"]},
//!   "customers": {"columns": {"ID": "identifier", "NAME": "full name"}},
//!   "products":  {"SKU": "stock keeping unit", "PRICE": "unit price"},
//!   "legacy":    "anything else"
//! }
//! ```
//!
//! This module normalizes every shape into a set of upper-cased column names.
//! The resulting [`SchemaCatalog`] is the ground truth for validation.

use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Table name to raw table metadata, as supplied by the caller
pub type SchemaMetadata = Map<String, Value>;

pub const COLUMNS_KEY: &str = "columns";

/// Borrowed view over one table's metadata, classified by shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RawTableMetadata<'a> {
    /// `{"columns": ["A", "B"]}`
    ColumnList(&'a [Value]),
    /// `{"columns": {"A": "meaning"}}`
    ColumnMeanings(&'a Map<String, Value>),
    /// `{"A": "meaning"}` with no `columns` key
    FlatMeanings(&'a Map<String, Value>),
    /// The part that could not be interpreted: a scalar `columns` value, an
    /// empty object or a non-object entry
    Opaque(&'a Value),
}

impl<'a> RawTableMetadata<'a> {
    pub fn classify(table_metadata: &'a Value) -> Self {
        match table_metadata {
            Value::Object(entry) => match entry.get(COLUMNS_KEY) {
                Some(Value::Object(columns)) => Self::ColumnMeanings(columns),
                Some(Value::Array(columns)) => Self::ColumnList(columns),
                Some(other) => Self::Opaque(other),
                None if !entry.is_empty() => Self::FlatMeanings(entry),
                None => Self::Opaque(table_metadata),
            },
            _ => Self::Opaque(table_metadata),
        }
    }

    /// Column names as written, in declaration order.
    pub fn column_names(&self) -> Vec<String> {
        match self {
            Self::ColumnList(columns) => columns.iter().map(value_text).collect(),
            Self::ColumnMeanings(columns) | Self::FlatMeanings(columns) => {
                columns.keys().cloned().collect()
            }
            Self::Opaque(_) => Vec::new(),
        }
    }
}

/// Renders a JSON value the way it reads to a person: strings without quotes,
/// everything else as JSON text.
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Upper-cased column names for one table's metadata.
///
/// ```
/// use serde_json::json;
/// use sqlguard::normalize_columns;
///
/// assert_eq!(
///     normalize_columns(&json!({"columns": {"id": "identifier"}})),
///     normalize_columns(&json!({"columns": ["ID"]}))
/// );
/// ```
pub fn normalize_columns(table_metadata: &Value) -> BTreeSet<String> {
    RawTableMetadata::classify(table_metadata)
        .column_names()
        .into_iter()
        .map(|column| column.to_uppercase())
        .collect()
}

/// Upper-cased table name to upper-cased column names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaCatalog {
    tables: BTreeMap<String, BTreeSet<String>>,
}

impl SchemaCatalog {
    /// Builds the catalog from raw metadata. Table names that only differ by
    /// case are merged.
    pub fn from_metadata(metadata: &SchemaMetadata) -> Self {
        let mut tables: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (name, table_metadata) in metadata {
            tables
                .entry(name.to_uppercase())
                .or_default()
                .extend(normalize_columns(table_metadata));
        }
        Self { tables }
    }

    pub fn contains_table(&self, table: &str) -> bool {
        self.tables.contains_key(&table.to_uppercase())
    }

    pub fn columns(&self, table: &str) -> Option<&BTreeSet<String>> {
        self.tables.get(&table.to_uppercase())
    }

    pub fn table_has_column(&self, table: &str, column: &str) -> bool {
        self.columns(table)
            .is_some_and(|columns| columns.contains(&column.to_uppercase()))
    }

    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
