//! Heuristic reference checks for generated SQL.
//!
//! `sqlguard` confirms that a `SELECT` statement only reads tables and columns
//! that exist in caller-supplied schema metadata. It does not parse SQL with a
//! grammar. A paren-aware scanner plus a handful of regular expressions are
//! enough to catch hallucinated identifiers in machine-written queries.
//!
//! ```
//! use serde_json::json;
//! use sqlguard::{validate, ValidationError};
//!
//! let tables = json!({"orders": {"columns": ["ID", "AMOUNT"]}});
//! let tables = tables.as_object().unwrap();
//!
//! assert!(validate("SELECT o.amount FROM orders o", tables).is_ok());
//! assert_eq!(
//!     validate("SELECT total FROM orders", tables),
//!     Err(ValidationError::UnknownColumn(vec!["TOTAL".to_string()]))
//! );
//! ```

pub mod catalog;
pub mod dialect;
pub mod parser;
pub mod prompt;
pub mod scan;
pub mod summary;
pub mod validator;

pub use catalog::{normalize_columns, RawTableMetadata, SchemaCatalog, SchemaMetadata};
pub use dialect::{rewrite_row_limit, Dialect, ParseDialectError};
pub use parser::{HeuristicExtractor, ParsedReference, ReferenceExtractor, TableReference};
pub use prompt::{build_messages, ChatMessage, Role};
pub use summary::{summarize_tables, DEFAULT_SUMMARY_MAX_CHARS, MAX_SUMMARY_COLUMNS};
pub use validator::{validate, ValidationError, Validator};
