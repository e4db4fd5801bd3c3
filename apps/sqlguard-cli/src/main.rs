mod cli;

use std::process::ExitCode;

use clap::Parser;
use cli::display::{show_message, Message, MessageType};
use cli::logger::LoggerLevel;

// Entry point for the CLI application
fn main() -> ExitCode {
    let cli_result = cli::Cli::parse();
    let no_ansi = cli_result.no_ansi;

    if let Err(e) = cli::settings::setup_user_directory() {
        show_message(
            MessageType::Error,
            &Message::new(
                "Init".to_string(),
                format!("Failed to initialize ~/.sqlguard, please check your permissions: {e:?}"),
            ),
            no_ansi,
        );
        return ExitCode::from(1);
    }

    let settings = match cli::settings::read_settings() {
        Ok(settings) => settings,
        Err(e) => {
            show_message(
                MessageType::Error,
                &Message::new(
                    "Settings".to_string(),
                    format!("Failed to read {:?}: {e}", cli::settings::config_path()),
                ),
                no_ansi,
            );
            return ExitCode::from(1);
        }
    };

    let mut logger_settings = settings.logger.clone();
    if cli_result.debug {
        logger_settings.level = LoggerLevel::Debug;
    }
    if let Err(e) = cli::logger::setup_logging(&logger_settings) {
        show_message(
            MessageType::Warning,
            &Message::new("Logging".to_string(), format!("{e}, continuing without logs")),
            no_ansi,
        );
    }

    match cli::top_command_handler(settings, &cli_result.command) {
        Ok(s) => {
            if !s.message.is_empty() {
                s.show(no_ansi);
            }
            ExitCode::from(0)
        }
        Err(e) => {
            show_message(e.message_type, &e.message, no_ansi);
            if let Some(err) = e.error {
                eprintln!("{err:?}");
            }
            ExitCode::from(1)
        }
    }
}
