//! Loading caller-supplied table metadata from JSON files.

use serde_json::Value;
use sqlguard::SchemaMetadata;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::display::Message;
use crate::cli::routines::RoutineFailure;

#[derive(Debug, thiserror::Error)]
pub enum MetadataLoadError {
    #[error("Failed to read table metadata from {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Table metadata in {} is not valid JSON", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Table metadata in {} must be a JSON object keyed by table name", .path.display())]
    NotAnObject { path: PathBuf },
}

pub fn load_tables(path: &Path) -> Result<SchemaMetadata, MetadataLoadError> {
    let contents = std::fs::read_to_string(path).map_err(|source| MetadataLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value: Value =
        serde_json::from_str(&contents).map_err(|source| MetadataLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    match value {
        Value::Object(tables) => {
            debug!("Loaded metadata for {} table(s) from {:?}", tables.len(), path);
            Ok(tables)
        }
        _ => Err(MetadataLoadError::NotAnObject {
            path: path.to_path_buf(),
        }),
    }
}

/// [`load_tables`] for routines, with the failure already shaped for display.
pub fn load_tables_for_routine(path: &Path) -> Result<SchemaMetadata, RoutineFailure> {
    load_tables(path).map_err(|e| {
        RoutineFailure::new(
            Message::new("Metadata".to_string(), e.to_string()),
            e,
        )
    })
}
