// src/error.rs
//! Unified error type for academy-solver
//!
//! This module provides a centralized error type for every operation that
//! talks to a lab (HTTP probes, page parsing, configuration, report output).
//! The search core keeps its own generic error in `search::error` and
//! converts into this one at the lab boundary.

use std::fmt;

use crate::search::SearchError;

/// Main error type for all solver operations
#[derive(Debug)]
pub enum SolverError {
    /// Caller supplied something the operation cannot work with
    InvalidInput(String),

    /// Extracted value lies outside the searched candidate range
    OutOfRange(String),

    /// HTTP request/response error
    Http(String),

    /// Parsing error (URL, HTML, JSON, YAML)
    Parse(String),

    /// Configuration error
    Config(String),

    /// A spawned extraction task failed to complete
    Task(String),

    /// I/O error (file operations)
    Io(std::io::Error),
}

impl std::error::Error for SolverError {}

impl fmt::Display for SolverError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SolverError::InvalidInput(s) => write!(f, "Invalid input error: {}", s),
            SolverError::OutOfRange(s) => write!(f, "Out of range error: {}", s),
            SolverError::Http(s) => write!(f, "HTTP error: {}", s),
            SolverError::Parse(s) => write!(f, "Parse error: {}", s),
            SolverError::Config(s) => write!(f, "Configuration error: {}", s),
            SolverError::Task(s) => write!(f, "Task error: {}", s),
            SolverError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl From<std::io::Error> for SolverError {
    fn from(e: std::io::Error) -> Self {
        SolverError::Io(e)
    }
}

impl From<reqwest::Error> for SolverError {
    fn from(e: reqwest::Error) -> Self {
        SolverError::Http(e.to_string())
    }
}

impl From<url::ParseError> for SolverError {
    fn from(e: url::ParseError) -> Self {
        SolverError::Parse(e.to_string())
    }
}

impl From<serde_json::Error> for SolverError {
    fn from(e: serde_json::Error) -> Self {
        SolverError::Parse(format!("JSON parse error: {}", e))
    }
}

impl From<serde_yaml::Error> for SolverError {
    fn from(e: serde_yaml::Error) -> Self {
        SolverError::Parse(format!("YAML parse error: {}", e))
    }
}

impl From<tokio::task::JoinError> for SolverError {
    fn from(e: tokio::task::JoinError) -> Self {
        SolverError::Task(e.to_string())
    }
}

// Oracle failures surface unchanged; only the empty-input case is new here.
impl From<SearchError<SolverError>> for SolverError {
    fn from(e: SearchError<SolverError>) -> Self {
        match e {
            SearchError::InvalidInput(s) => SolverError::InvalidInput(s.to_string()),
            SearchError::Oracle(inner) => inner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_input_error() {
        let error = SolverError::InvalidInput("empty candidate sequence".to_string());
        assert_eq!(error.to_string(), "Invalid input error: empty candidate sequence");
    }

    #[test]
    fn test_out_of_range_error() {
        let error = SolverError::OutOfRange("length exceeds 64".to_string());
        assert_eq!(error.to_string(), "Out of range error: length exceeds 64");
    }

    #[test]
    fn test_http_error() {
        let error = SolverError::Http("504 Gateway Timeout".to_string());
        assert_eq!(error.to_string(), "HTTP error: 504 Gateway Timeout");
    }

    #[test]
    fn test_config_error() {
        let error = SolverError::Config("Server ID must be 32 hex digits".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: Server ID must be 32 hex digits"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "Access denied");
        let solver_error: SolverError = io_error.into();
        assert!(matches!(solver_error, SolverError::Io(_)));
    }

    #[test]
    fn test_url_parse_error_conversion() {
        let parse_error = url::Url::parse("not a valid url").unwrap_err();
        let solver_error: SolverError = parse_error.into();
        assert!(matches!(solver_error, SolverError::Parse(_)));
    }

    #[test]
    fn test_search_error_conversion_keeps_oracle_error() {
        let error: SolverError =
            SearchError::Oracle(SolverError::Http("connection reset".to_string())).into();
        assert!(matches!(error, SolverError::Http(ref s) if s == "connection reset"));

        let error: SolverError = SearchError::<SolverError>::InvalidInput("empty").into();
        assert!(matches!(error, SolverError::InvalidInput(_)));
    }

    #[test]
    fn test_display_formatting() {
        let errors = vec![
            SolverError::InvalidInput("test".to_string()),
            SolverError::OutOfRange("test".to_string()),
            SolverError::Http("test".to_string()),
            SolverError::Parse("test".to_string()),
            SolverError::Config("test".to_string()),
            SolverError::Task("test".to_string()),
        ];

        for error in errors {
            let display = error.to_string();
            assert!(!display.is_empty());
            assert!(display.contains("error"));
        }
    }
}
