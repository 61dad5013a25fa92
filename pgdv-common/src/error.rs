//! Common error types for pgdv

use serde::Serialize;
use thiserror::Error;

/// Common result type for pgdv operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that stop a validation run before any check is evaluated
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Broad class of a per-check error, carried into the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorClass {
    /// The check itself is misconfigured; no query was run
    Configuration,
    /// The query failed or returned an unexpected shape
    Execution,
    /// The database could not be reached
    Connection,
}

/// Errors raised while interpreting or evaluating a single check.
///
/// None of these abort the run: the coordinator turns each into a FAIL
/// verdict for the check that raised it.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CheckError {
    #[error("Unknown check kind: {0}")]
    UnknownCheckKind(String),

    #[error("{kind} check is missing required parameter `{field}`")]
    MissingParameter { kind: &'static str, field: &'static str },

    #[error("{kind} check has invalid parameter `{field}`: {reason}")]
    InvalidParameter {
        kind: &'static str,
        field: &'static str,
        reason: String,
    },

    #[error("Unsupported operator: {0}")]
    UnsupportedOperator(String),

    #[error("Query execution failed: {0}")]
    QueryExecution(String),

    #[error("Malformed query result: {0}")]
    MalformedResult(String),

    #[error("Connection failed: {0}")]
    Connection(String),
}

impl CheckError {
    pub fn class(&self) -> ErrorClass {
        match self {
            CheckError::UnknownCheckKind(_)
            | CheckError::MissingParameter { .. }
            | CheckError::InvalidParameter { .. }
            | CheckError::UnsupportedOperator(_) => ErrorClass::Configuration,
            CheckError::QueryExecution(_) | CheckError::MalformedResult(_) => {
                ErrorClass::Execution
            }
            CheckError::Connection(_) => ErrorClass::Connection,
        }
    }
}

impl From<sqlx::Error> for CheckError {
    fn from(err: sqlx::Error) -> Self {
        CheckError::QueryExecution(err.to_string())
    }
}
