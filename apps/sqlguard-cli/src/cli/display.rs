//! Styled status lines for the CLI.
//!
//! Status lines always go to stderr. Stdout is reserved for command payloads
//! (rewritten SQL, JSON) so they can be piped into other tools.

use crossterm::{
    execute,
    style::{Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
};
use std::io::{stderr, Result as IoResult, Write};

/// Width of the action column in terminal output
pub const ACTION_WIDTH: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Success,
    Warning,
    Error,
    Highlight,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub action: String,
    pub details: String,
}

impl Message {
    pub fn new(action: String, details: String) -> Self {
        Self { action, details }
    }

    pub fn is_empty(&self) -> bool {
        self.action.is_empty() && self.details.is_empty()
    }
}

/// Builder for the styled action column.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledText {
    text: String,
    foreground: Option<Color>,
    background: Option<Color>,
    bold: bool,
}

impl StyledText {
    pub fn new(text: String) -> Self {
        Self {
            text,
            foreground: None,
            background: None,
            bold: false,
        }
    }

    pub fn from_str(text: &str) -> Self {
        Self::new(text.to_string())
    }

    pub fn cyan(mut self) -> Self {
        self.foreground = Some(Color::Cyan);
        self
    }

    pub fn green(mut self) -> Self {
        self.foreground = Some(Color::Green);
        self
    }

    pub fn yellow(mut self) -> Self {
        self.foreground = Some(Color::Yellow);
        self
    }

    pub fn red(mut self) -> Self {
        self.foreground = Some(Color::Red);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn on_green(mut self) -> Self {
        self.background = Some(Color::Green);
        self
    }
}

impl MessageType {
    fn style(&self, action: &str) -> StyledText {
        let styled = StyledText::from_str(action).bold();
        match self {
            MessageType::Info => styled.cyan(),
            MessageType::Success => styled.green(),
            MessageType::Warning => styled.yellow(),
            MessageType::Error => styled.red(),
            MessageType::Highlight => styled.on_green(),
        }
    }
}

/// Writes `[ACTION right-aligned to ACTION_WIDTH] message` to `writer`.
/// Actions longer than the column are cut on a char boundary.
fn write_styled_line_to<W: Write>(
    writer: &mut W,
    styled_text: &StyledText,
    message: &str,
    no_ansi: bool,
) -> IoResult<()> {
    let truncated_action: String = styled_text.text.chars().take(ACTION_WIDTH).collect();
    let padded_action = format!("{truncated_action:>ACTION_WIDTH$}");

    if !no_ansi {
        if let Some(color) = styled_text.foreground {
            execute!(writer, SetForegroundColor(color))?;
        }
        if let Some(color) = styled_text.background {
            execute!(writer, SetBackgroundColor(color))?;
        }
        if styled_text.bold {
            execute!(writer, SetAttribute(Attribute::Bold))?;
        }
    }

    execute!(writer, Print(&padded_action))?;

    if !no_ansi {
        execute!(writer, ResetColor)?;
        if styled_text.bold {
            execute!(writer, SetAttribute(Attribute::Reset))?;
        }
    }

    execute!(writer, Print(" "), Print(message), Print("\n"))?;

    Ok(())
}

/// Shows `message` on stderr, styled for its type.
pub fn show_message(message_type: MessageType, message: &Message, no_ansi: bool) {
    let styled = message_type.style(&message.action);
    let mut stderr = stderr();
    // A closed stderr leaves nowhere to report the failure
    let _ = write_styled_line_to(&mut stderr, &styled, &message.details, no_ansi);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(styled: &StyledText, message: &str, no_ansi: bool) -> String {
        let mut buffer = Vec::new();
        write_styled_line_to(&mut buffer, styled, message, no_ansi).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_styled_text_equality() {
        let styled1 = StyledText::from_str("Test").green().bold();
        let styled2 = StyledText::from_str("Test").green().bold();
        assert_eq!(styled1, styled2);
        assert_ne!(styled1, StyledText::from_str("Test").red().bold());
    }

    #[test]
    fn test_action_is_right_aligned() {
        let output = render(&StyledText::from_str("Valid"), "ok", true);
        assert_eq!(output, format!("{:>15} ok\n", "Valid"));
    }

    #[test]
    fn test_long_action_is_truncated_on_char_boundary() {
        let output = render(&StyledText::from_str("ééééééééééééééééééé"), "msg", true);
        assert_eq!(output, format!("{} msg\n", "é".repeat(ACTION_WIDTH)));
    }

    #[test]
    fn test_ansi_codes_follow_no_ansi_flag() {
        let styled = StyledText::from_str("Bold").green().bold();

        let with_ansi = render(&styled, "message", false);
        assert!(with_ansi.contains("\x1b["));
        assert!(with_ansi.contains("\x1b[1m"), "Should contain bold ANSI code");

        let without_ansi = render(&styled, "message", true);
        assert!(!without_ansi.contains("\x1b["));
        assert!(without_ansi.contains("Bold"));
        assert!(without_ansi.contains("message"));
    }

    #[test]
    fn test_every_message_type_is_plain_without_ansi() {
        for message_type in [
            MessageType::Info,
            MessageType::Success,
            MessageType::Warning,
            MessageType::Error,
            MessageType::Highlight,
        ] {
            let output = render(&message_type.style("Action"), "details", true);
            assert!(
                !output.contains("\x1b["),
                "{:?} should not produce ANSI codes with no_ansi=true. Got: {:?}",
                message_type,
                output
            );
        }
    }

    #[test]
    fn test_empty_message() {
        assert!(Message::new(String::new(), String::new()).is_empty());
        assert!(!Message::new("Valid".to_string(), String::new()).is_empty());
    }
}
