use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("export XML is not well-formed: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("invalid date string '{input}': {reason}")]
    DateFormat { input: String, reason: String },

    #[error("sheet '{sheet}' is missing expected columns: {columns:?}")]
    MissingColumns { sheet: String, columns: Vec<String> },

    #[error("column {column} holds invalid id '{value}'")]
    InvalidId { column: String, value: String },

    #[error("category table error: {0}")]
    CategoryTable(String),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ImporterError>;
