//! Chat messages asking a language model for a single SQL answer.
//!
//! Only the messages are built here. Sending them and retrying on a
//! [`crate::ValidationError`] is up to the caller.

use serde::{Deserialize, Serialize};

use crate::catalog::SchemaMetadata;

const SYSTEM_PROMPT: &str = "You are an expert SQL generator.
Return ONLY the SQL statements needed to answer the user's request.
Never return explanations, commentary, markdown, backticks or code fences.
Use table and column names exactly as they are provided. When the request is
ambiguous, pick the smallest reasonable interpretation and write safe SQL.
Target Oracle SQL (Oracle 12c+) and use Oracle-compatible syntax and data types.
Never invent tables or columns. Every attribute you return must exist in the
provided table metadata.";

const OUTPUT_RULES_REMINDER: &str =
    "Output rules reminder: ONLY SQL. No comments, no explanation, no markdown.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Builds the system and user messages for `question`.
///
/// `tables` is embedded as pretty-printed JSON. Pass a
/// [`crate::summarize_tables`] result to keep the prompt small.
pub fn build_messages(question: &str, tables: &SchemaMetadata) -> Vec<ChatMessage> {
    let tables_json =
        serde_json::to_string_pretty(tables).expect("Formatting JSON metadata never fails");

    let user = format!(
        "Below is database table metadata in JSON.\n\
         Answer the question with SQL that only uses that metadata.\n\
         Do NOT invent columns or tables.\n\n\
         TABLES JSON:\n{tables_json}\n\n\
         QUESTION: {question}\n\n\
         {OUTPUT_RULES_REMINDER}"
    );

    vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(user)]
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_messages() {
        let tables = json!({"orders": {"columns": ["ID", "AMOUNT"]}});
        let messages = build_messages("total amount?", tables.as_object().unwrap());

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[0].content.contains("Oracle 12c+"));
        assert!(messages[0].content.contains("Never invent tables or columns"));

        let user = &messages[1];
        assert_eq!(user.role, Role::User);
        assert!(user.content.contains("TABLES JSON:\n{\n  \"orders\""));
        assert!(user.content.contains("\n\nQUESTION: total amount?\n\n"));
        assert!(user.content.ends_with(OUTPUT_RULES_REMINDER));
    }

    #[test]
    fn test_roles_serialize_lowercase() {
        let message = ChatMessage::user("hi");
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"role": "user", "content": "hi"})
        );
    }

    #[test]
    fn test_table_order_is_kept_in_prompt() {
        let tables = json!({"zeta": {"columns": []}, "alpha": {"columns": []}});
        let messages = build_messages("q", tables.as_object().unwrap());
        let content = &messages[1].content;

        let zeta = content.find("zeta").unwrap();
        let alpha = content.find("alpha").unwrap();
        assert!(zeta < alpha);
    }
}
