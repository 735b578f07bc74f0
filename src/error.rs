//! Error types for duckscan
//!
//! This module defines all error types used throughout the facade.

use thiserror::Error;

use crate::action::Action;

/// The four error categories surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    DataAccess,
    Query,
    Resource,
}

/// The main error type for duckscan
#[derive(Error, Debug)]
pub enum Error {
    // ========== Configuration Errors ==========
    #[error("Configuration error: unknown action '{0}'")]
    UnknownAction(String),

    #[error("Configuration error: action '{action}' requires --{param}")]
    MissingParameter { action: Action, param: &'static str },

    #[error("Configuration error: {0}")]
    InvalidParameter(String),

    // ========== Data Access Errors ==========
    #[error("Data access error: action '{action}' failed for '{target}': {source}")]
    DataAccess {
        action: Action,
        target: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Data access error: {0}")]
    Io(#[from] std::io::Error),

    // ========== Query Errors ==========
    #[error("Query error: action '{action}' failed for '{target}': {source}")]
    Query {
        action: Action,
        target: String,
        #[source]
        source: duckdb::Error,
    },

    // ========== Resource Errors ==========
    #[error("Resource error: could not open database: {0}")]
    OpenFailed(#[source] duckdb::Error),

    #[error("Resource error: connection did not close cleanly: {0}")]
    CloseFailed(#[source] duckdb::Error),
}

impl Error {
    /// Category of this error, per the facade's error taxonomy.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::UnknownAction(_)
            | Error::MissingParameter { .. }
            | Error::InvalidParameter(_) => ErrorKind::Configuration,
            Error::DataAccess { .. } | Error::Io(_) => ErrorKind::DataAccess,
            Error::Query { .. } => ErrorKind::Query,
            Error::OpenFailed(_) | Error::CloseFailed(_) => ErrorKind::Resource,
        }
    }

    /// Wrap an engine failure with the action and the parameter it was
    /// operating on. Missing files and tables are data-access failures;
    /// everything else the engine rejects is a query failure.
    pub(crate) fn from_engine(action: Action, target: &str, source: duckdb::Error) -> Error {
        let message = source.to_string();
        let data_access = message.contains("IO Error")
            || message.contains("No files found")
            || message.contains("No such file")
            || message.contains("does not exist");
        if data_access {
            Error::DataAccess {
                action,
                target: target.to_string(),
                source,
            }
        } else {
            Error::Query {
                action,
                target: target.to_string(),
                source,
            }
        }
    }
}

/// Result type alias for duckscan operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::UnknownAction("explode".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown action 'explode'"
        );

        let err = Error::MissingParameter {
            action: Action::Stats,
            param: "column",
        };
        assert_eq!(
            err.to_string(),
            "Configuration error: action 'stats' requires --column"
        );
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(
            Error::UnknownAction("x".to_string()).kind(),
            ErrorKind::Configuration
        );
        assert_eq!(
            Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone")).kind(),
            ErrorKind::DataAccess
        );
    }
}
