//! # Routines
//!
//! Each CLI command is backed by a routine. A routine writes its payload (SQL or
//! JSON) to stdout and returns a [`RoutineSuccess`] or [`RoutineFailure`] whose
//! message is shown on stderr by `main`.

use std::io::Read;
use std::path::Path;

use super::display::{self, Message, MessageType};

pub mod catalog;
pub mod metadata;
pub mod prompt;
pub mod rewrite;
pub mod validate;

#[derive(Debug, Clone)]
#[must_use = "The message should be displayed."]
pub struct RoutineSuccess {
    pub message: Message,
    pub message_type: MessageType,
}

impl RoutineSuccess {
    pub fn success(message: Message) -> Self {
        Self {
            message,
            message_type: MessageType::Success,
        }
    }

    pub fn info(message: Message) -> Self {
        Self {
            message,
            message_type: MessageType::Info,
        }
    }

    pub fn highlight(message: Message) -> Self {
        Self {
            message,
            message_type: MessageType::Highlight,
        }
    }

    pub fn show(&self, no_ansi: bool) {
        display::show_message(self.message_type, &self.message, no_ansi);
    }
}

#[derive(Debug)]
pub struct RoutineFailure {
    pub message: Message,
    pub message_type: MessageType,
    pub error: Option<anyhow::Error>,
}

impl RoutineFailure {
    pub fn new<F: Into<anyhow::Error>>(message: Message, error: F) -> Self {
        Self {
            message,
            message_type: MessageType::Error,
            error: Some(error.into()),
        }
    }

    /// create a RoutineFailure error without an error
    pub fn error(message: Message) -> Self {
        Self {
            message,
            message_type: MessageType::Error,
            error: None,
        }
    }
}

/// Reads the SQL text for a command: the file when one is given (`-` for
/// stdin), otherwise the positional words joined by spaces.
pub fn read_sql_input(words: &[String], file: Option<&Path>) -> Result<String, RoutineFailure> {
    let sql = match file {
        Some(path) if path == Path::new("-") => {
            let mut sql = String::new();
            std::io::stdin().read_to_string(&mut sql).map_err(|e| {
                RoutineFailure::new(
                    Message::new("Input".to_string(), "Failed to read SQL from stdin".to_string()),
                    e,
                )
            })?;
            sql
        }
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            RoutineFailure::new(
                Message::new(
                    "Input".to_string(),
                    format!("Failed to read SQL from {}", path.display()),
                ),
                e,
            )
        })?,
        None => words.join(" "),
    };

    if sql.trim().is_empty() {
        return Err(RoutineFailure::error(Message::new(
            "Input".to_string(),
            "No SQL given, pass it as arguments or with --file".to_string(),
        )));
    }

    Ok(sql)
}
