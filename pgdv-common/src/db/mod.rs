//! Database access: the query executor seam and its PostgreSQL implementation
//!
//! All connections are used for read-only inspection queries.

pub mod decode;
pub mod executor;
pub mod postgres;
pub mod result;

pub use executor::{Connector, QueryExecutor};
pub use postgres::{PgConnector, PgExecutor};
pub use result::{QueryResult, TableRef};
