//! # CLI Commands
//! A module for all the commands that can be run from the CLI

use std::path::PathBuf;

use clap::Subcommand;
use sqlguard::Dialect;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Checks that a SELECT only references known tables and columns, then prints it
    Validate {
        /// SQL statement, as one or more words
        sql: Vec<String>,

        /// Read the statement from a file instead, `-` for stdin
        #[arg(short, long, conflicts_with = "sql")]
        file: Option<PathBuf>,

        /// JSON table metadata, defaults to the configured tables path
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Target dialect (ansi or oracle), defaults to the configured dialect
        #[arg(long)]
        dialect: Option<Dialect>,
    },
    /// Rewrites an ANSI FETCH FIRST row limit into an Oracle ROWNUM predicate
    Rewrite {
        /// SQL statement, as one or more words
        sql: Vec<String>,

        /// Read the statement from a file instead, `-` for stdin
        #[arg(short, long, conflicts_with = "sql")]
        file: Option<PathBuf>,
    },
    /// Prints the normalized column names of one table or of all tables
    Columns {
        /// Only show this table
        table: Option<String>,

        /// JSON table metadata, defaults to the configured tables path
        #[arg(short, long)]
        tables: Option<PathBuf>,
    },
    /// Prints the size-bounded table summary used in prompts
    Summarize {
        /// JSON table metadata, defaults to the configured tables path
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Maximum summary size in characters
        #[arg(long)]
        max_chars: Option<usize>,
    },
    /// Prints the chat messages asking a model to answer a question in SQL
    Prompt {
        /// Natural language question
        #[arg(required = true)]
        question: Vec<String>,

        /// JSON table metadata, defaults to the configured tables path
        #[arg(short, long)]
        tables: Option<PathBuf>,

        /// Maximum size of the embedded table summary in characters
        #[arg(long)]
        max_chars: Option<usize>,
    },
}
