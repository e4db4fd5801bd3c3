//! # Settings
//!
//! User-level configuration, layered by the `config` crate:
//! 1. built-in defaults
//! 2. `~/.sqlguard/config.toml`, when it exists
//! 3. `SQLGUARD_`-prefixed environment variables, nested with `__`
//!    (e.g. `SQLGUARD_VALIDATOR__DIALECT=ansi`)
//!
//! Command line flags override the loaded values for a single invocation.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use sqlguard::{Dialect, DEFAULT_SUMMARY_MAX_CHARS};
use std::path::{Path, PathBuf};

use super::logger::LoggerSettings;

const CLI_USER_DIRECTORY: &str = ".sqlguard";
const CLI_CONFIG_FILE: &str = "config.toml";
const ENVIRONMENT_VARIABLE_PREFIX: &str = "SQLGUARD";

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Settings {
    #[serde(default)]
    pub logger: LoggerSettings,
    #[serde(default)]
    pub validator: ValidatorSettings,
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct ValidatorSettings {
    #[serde(default = "default_dialect")]
    pub dialect: Dialect,
    /// Table metadata used when a command gets no `--tables`
    #[serde(default = "default_tables_path")]
    pub tables_path: PathBuf,
    #[serde(default = "default_summary_max_chars")]
    pub summary_max_chars: usize,
}

fn default_dialect() -> Dialect {
    Dialect::Oracle
}

fn default_tables_path() -> PathBuf {
    PathBuf::from("data/tables.json")
}

fn default_summary_max_chars() -> usize {
    DEFAULT_SUMMARY_MAX_CHARS
}

impl Default for ValidatorSettings {
    fn default() -> Self {
        Self {
            dialect: default_dialect(),
            tables_path: default_tables_path(),
            summary_max_chars: default_summary_max_chars(),
        }
    }
}

pub fn user_directory() -> PathBuf {
    home::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CLI_USER_DIRECTORY)
}

pub fn config_path() -> PathBuf {
    user_directory().join(CLI_CONFIG_FILE)
}

pub fn setup_user_directory() -> std::io::Result<()> {
    std::fs::create_dir_all(user_directory())
}

pub fn read_settings() -> Result<Settings, ConfigError> {
    read_settings_from(&config_path())
}

pub fn read_settings_from(config_file: &Path) -> Result<Settings, ConfigError> {
    Config::builder()
        .add_source(File::from(config_file.to_path_buf()).required(false))
        .add_source(
            Environment::with_prefix(ENVIRONMENT_VARIABLE_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?
        .try_deserialize()
}
