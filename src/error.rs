use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no result sets found under {0}")]
    NoResultsFound(PathBuf),

    #[error("result set candidate has no parseable timestamp in its path: {0}")]
    AmbiguousTimestamp(PathBuf),

    #[error("result parse error: {0}")]
    ResultParse(String),

    #[error("content-test name not found in generated source: {0}")]
    NameNotFound(String),

    #[error("history fetch failed for {path}: {reason}")]
    HistoryFetchFailed { path: PathBuf, reason: String },

    #[error("diagnostics unavailable: {0}")]
    DiagnosticsUnavailable(String),

    #[error("process error: {0}")]
    Process(String),
}

pub type Result<T> = std::result::Result<T, Error>;
