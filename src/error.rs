// file: src/error.rs
// description: Custom error types and result type aliases
// reference: https://docs.rs/thiserror

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, LoaderError>;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{service} request failed with status {status}: {message}")]
    Service {
        service: &'static str,
        status: u16,
        message: String,
    },

    #[error("CSV parsing error in {file}: {message}")]
    CsvParse { file: String, message: String },

    #[error("File operation failed for {path}: {source}")]
    FileOperation {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl LoaderError {
    pub fn service(service: &'static str, status: reqwest::StatusCode, message: String) -> Self {
        Self::Service {
            service,
            status: status.as_u16(),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_error_display() {
        let err = LoaderError::service(
            "search",
            reqwest::StatusCode::FORBIDDEN,
            "Forbidden".to_string(),
        );
        assert_eq!(
            err.to_string(),
            "search request failed with status 403: Forbidden"
        );
    }

    #[test]
    fn test_csv_error_display() {
        let err = LoaderError::CsvParse {
            file: "bad.csv".to_string(),
            message: "EOF inside string starting at line 2".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "CSV parsing error in bad.csv: EOF inside string starting at line 2"
        );
    }
}
