//! # pgdv common library
//!
//! Shared code for the PostgreSQL data validator:
//! - Error types for whole-run and per-check failures
//! - Configuration loading (JSON or TOML)
//! - Typed check definitions and comparison operators
//! - Query execution against PostgreSQL

pub mod checks;
pub mod config;
pub mod db;
pub mod error;

pub use checks::{CheckDefinition, CheckKind, CompareOperator};
pub use config::{load_config, CheckEntry, ConnectionConfig, DatabaseTarget, ValidatorConfig};
pub use error::{CheckError, Error, ErrorClass, Result};
