use sqlguard::{build_messages, summarize_tables};
use std::path::Path;
use tracing::info;

use super::catalog::to_pretty_json;
use super::metadata::load_tables_for_routine;
use crate::cli::display::Message;
use crate::cli::routines::{RoutineFailure, RoutineSuccess};

/// Prints the chat messages for `question` as a JSON array. The tables are
/// summarized first so the prompt stays within `max_chars` of metadata.
pub fn show_prompt(
    question: &str,
    tables_path: &Path,
    max_chars: usize,
) -> Result<RoutineSuccess, RoutineFailure> {
    if question.trim().is_empty() {
        return Err(RoutineFailure::error(Message::new(
            "Prompt".to_string(),
            "A question is required".to_string(),
        )));
    }

    let metadata = load_tables_for_routine(tables_path)?;
    let summary = summarize_tables(&metadata, max_chars);
    let messages = build_messages(question.trim(), &summary);
    info!("Built {} prompt messages", messages.len());

    println!("{}", to_pretty_json(&messages)?);

    Ok(RoutineSuccess::highlight(Message::new(
        "Prompt".to_string(),
        "Send these messages to the model, then validate its answer".to_string(),
    )))
}
