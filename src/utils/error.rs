use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoanError {
    #[error("Storage error at {}: {source}", path.display())]
    StorageError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt loan record {}: {message}", path.display())]
    CorruptDataError { path: PathBuf, message: String },

    #[error("Remote service '{service}' failed: {message}")]
    RemoteServiceError { service: String, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

impl LoanError {
    pub(crate) fn storage(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LoanError::StorageError {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn remote(service: &str, message: impl Into<String>) -> Self {
        LoanError::RemoteServiceError {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, LoanError>;
