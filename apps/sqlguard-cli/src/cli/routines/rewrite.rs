use sqlguard::rewrite_row_limit;
use tracing::debug;

use crate::cli::display::Message;
use crate::cli::routines::{RoutineFailure, RoutineSuccess};

pub fn rewrite_query(sql: &str) -> Result<RoutineSuccess, RoutineFailure> {
    let rewritten = rewrite_row_limit(sql.trim());
    let changed = rewritten != sql.trim();
    debug!("Row limit rewrite changed the statement: {}", changed);

    println!("{rewritten}");

    if changed {
        Ok(RoutineSuccess::success(Message::new(
            "Rewritten".to_string(),
            "FETCH FIRST clause replaced with a ROWNUM predicate".to_string(),
        )))
    } else {
        Ok(RoutineSuccess::info(Message::new(
            "Unchanged".to_string(),
            "No FETCH FIRST clause to rewrite".to_string(),
        )))
    }
}
