//! Query execution seam
//!
//! Evaluators only ever talk to a [`QueryExecutor`]; the run coordinator
//! obtains one per database from a [`Connector`]. The PostgreSQL
//! implementations live in `db::postgres`.

use async_trait::async_trait;

use super::result::{QueryResult, TableRef};
use crate::config::ConnectionConfig;
use crate::error::CheckError;

/// Read-only access to one open database connection
#[async_trait]
pub trait QueryExecutor: Send {
    /// Run a SQL statement and return its rows.
    ///
    /// Callers only issue read queries. Failures surface as
    /// `CheckError::QueryExecution` and are never retried.
    async fn fetch_rows(&mut self, sql: &str) -> Result<QueryResult, CheckError>;

    /// Base tables visible in the catalog
    async fn list_tables(&mut self) -> Result<Vec<TableRef>, CheckError>;

    /// Schema that unqualified table names refer to
    fn default_schema(&self) -> &str;

    /// Release the connection
    async fn close(self) -> Result<(), CheckError>;
}

/// Opens one executor per configured database
#[async_trait]
pub trait Connector: Send + Sync {
    type Executor: QueryExecutor;

    async fn connect(&self, connection: &ConnectionConfig) -> Result<Self::Executor, CheckError>;
}
