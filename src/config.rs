use crate::error::{ImporterError, Result};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;

const CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub import: ImportConfig,
}

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct ImportConfig {
    /// Directory the downloader deposits export files into.
    #[serde(default = "default_export_dir")]
    pub export_dir: String,
    /// Path of the category reference artifact.
    #[serde(default = "default_categories_path")]
    pub categories_path: String,
}

fn default_db_path() -> String {
    "camkoha.db".to_string()
}

fn default_export_dir() -> String {
    "downloads/projects".to_string()
}

fn default_categories_path() -> String {
    "data/dim_project_category.json".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            categories_path: default_categories_path(),
        }
    }
}

impl Config {
    /// Loads `config.toml` from the working directory, falling back to
    /// defaults when the file does not exist. `CAMKOHA_DB` overrides the
    /// configured database path either way.
    pub fn load() -> Result<Self> {
        let mut config = if Path::new(CONFIG_PATH).exists() {
            let config_content = fs::read_to_string(CONFIG_PATH).map_err(|e| {
                ImporterError::Config(format!("failed to read config file '{CONFIG_PATH}': {e}"))
            })?;
            toml::from_str(&config_content)?
        } else {
            Config {
                database: DatabaseConfig::default(),
                import: ImportConfig::default(),
            }
        };

        if let Ok(db_path) = env::var("CAMKOHA_DB") {
            config.database.path = db_path;
        }

        Ok(config)
    }
}
