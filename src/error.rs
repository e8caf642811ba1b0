use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("Missing mandatory option --{0}.")]
    MissingOption(&'static str),

    #[error("Invalid table prefix {0:?}: only ASCII letters, digits, '_' and '.' are allowed")]
    InvalidPrefix(String),

    #[error("Failed to load settings: {0}")]
    Settings(#[from] config::ConfigError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Node {nid} has an unrepresentable created timestamp {created}")]
    InvalidTimestamp { nid: i64, created: i64 },

    #[error("Failed to render metadata block: {0}")]
    Metadata(#[from] serde_yaml::Error),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MigrateError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigrateError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, MigrateError>;
