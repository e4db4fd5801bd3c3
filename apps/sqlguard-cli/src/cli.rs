pub mod commands;
pub mod display;
pub mod logger;
pub mod routines;
pub mod settings;

use clap::Parser;
use commands::Commands;
use routines::catalog::{show_columns, show_summary};
use routines::prompt::show_prompt;
use routines::read_sql_input;
use routines::rewrite::rewrite_query;
use routines::validate::validate_query;
use routines::{RoutineFailure, RoutineSuccess};
use settings::Settings;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "sqlguard", author, version, about, long_about = None, arg_required_else_help(true))]
pub struct Cli {
    /// Turn debugging information on
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Print status messages without colors or styling
    #[arg(long, global = true)]
    pub no_ansi: bool,

    #[command(subcommand)]
    pub command: Commands,
}

pub fn top_command_handler(
    settings: Settings,
    commands: &Commands,
) -> Result<RoutineSuccess, RoutineFailure> {
    let validator_settings = settings.validator;

    match commands {
        Commands::Validate {
            sql,
            file,
            tables,
            dialect,
        } => {
            let tables_path = tables.as_ref().unwrap_or(&validator_settings.tables_path);
            let dialect = dialect.unwrap_or(validator_settings.dialect);
            info!(
                "Running validate command with tables: {:?}, dialect: {}",
                tables_path, dialect
            );

            let sql = read_sql_input(sql, file.as_deref())?;
            validate_query(&sql, tables_path, dialect)
        }
        Commands::Rewrite { sql, file } => {
            info!("Running rewrite command");

            let sql = read_sql_input(sql, file.as_deref())?;
            rewrite_query(&sql)
        }
        Commands::Columns { table, tables } => {
            let tables_path = tables.as_ref().unwrap_or(&validator_settings.tables_path);
            info!(
                "Running columns command with tables: {:?}, table: {:?}",
                tables_path, table
            );

            show_columns(tables_path, table.as_deref())
        }
        Commands::Summarize { tables, max_chars } => {
            let tables_path = tables.as_ref().unwrap_or(&validator_settings.tables_path);
            let max_chars = max_chars.unwrap_or(validator_settings.summary_max_chars);
            info!(
                "Running summarize command with tables: {:?}, max_chars: {}",
                tables_path, max_chars
            );

            show_summary(tables_path, max_chars)
        }
        Commands::Prompt {
            question,
            tables,
            max_chars,
        } => {
            let tables_path = tables.as_ref().unwrap_or(&validator_settings.tables_path);
            let max_chars = max_chars.unwrap_or(validator_settings.summary_max_chars);
            info!(
                "Running prompt command with tables: {:?}, max_chars: {}",
                tables_path, max_chars
            );

            show_prompt(&question.join(" "), tables_path, max_chars)
        }
    }
}
