use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Config option [{section}] {option} is missing")]
    ConfigMissing { section: String, option: String },

    #[error("Invalid weather column: {0}")]
    InvalidColumn(String),

    #[error("Element '{locator}' not visible after {waited:?}")]
    ElementNotFound { locator: String, waited: Duration },

    #[error("Store operation '{operation}' failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: tokio_rusqlite::Error,
    },

    #[error("Key missing from API response: {0}")]
    KeyMissing(String),

    #[error("Cannot read a number from '{0}'")]
    UnparseableReading(String),

    #[error("No stored {column} for {city}")]
    MissingStoredValue { city: String, column: String },

    #[error("MIN_or_MAX must be either 'MIN' or 'MAX', got '{0}'")]
    InvalidBoundary(String),

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Config parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Spreadsheet error: {0}")]
    Sheet(#[from] calamine::Error),

    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, AppError>;
