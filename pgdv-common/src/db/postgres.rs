//! PostgreSQL connector and executor

use async_trait::async_trait;
use sqlx::postgres::{PgConnectOptions, PgConnection, PgRow};
use sqlx::{Column, Connection, Executor, Row, TypeInfo};
use tracing::{debug, info};

use super::decode::text_to_json;
use super::executor::{Connector, QueryExecutor};
use super::result::{QueryResult, TableRef};
use crate::config::ConnectionConfig;
use crate::error::CheckError;

const LIST_TABLES_SQL: &str = r#"
    SELECT table_schema::text, table_name::text
    FROM information_schema.tables
    WHERE table_type = 'BASE TABLE'
      AND table_schema NOT IN ('pg_catalog', 'information_schema')
    ORDER BY table_schema, table_name
"#;

/// Build connect options, leaving unset fields to the `PG*` environment defaults
pub fn connect_options(connection: &ConnectionConfig) -> PgConnectOptions {
    let mut options = PgConnectOptions::new();
    if let Some(host) = &connection.host {
        options = options.host(host);
    }
    if let Some(port) = connection.port {
        options = options.port(port);
    }
    if let Some(dbname) = &connection.dbname {
        options = options.database(dbname);
    }
    if let Some(user) = &connection.user {
        options = options.username(user);
    }
    if let Some(password) = &connection.password {
        options = options.password(password);
    }
    options
}

/// Quote a name for use as an SQL identifier
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Opens a dedicated [`PgConnection`] per database
#[derive(Debug, Default, Clone, Copy)]
pub struct PgConnector;

#[async_trait]
impl Connector for PgConnector {
    type Executor = PgExecutor;

    async fn connect(&self, connection: &ConnectionConfig) -> Result<PgExecutor, CheckError> {
        let options = connect_options(connection);
        let mut conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| CheckError::Connection(e.to_string()))?;
        info!("Connected to PostgreSQL database {}", connection.display_name());

        let schema = connection.schema().to_string();
        if connection.schema.is_some() {
            let statement = format!("SET search_path TO {}", quote_identifier(&schema));
            conn.execute(sqlx::raw_sql(&statement))
                .await
                .map_err(|e| CheckError::Connection(format!("Failed to set search path: {}", e)))?;
            info!("Search path set to schema: {}", schema);
        }

        Ok(PgExecutor { conn, schema })
    }
}

/// Executor over one open PostgreSQL connection
#[derive(Debug)]
pub struct PgExecutor {
    conn: PgConnection,
    schema: String,
}

impl PgExecutor {
    fn decode_row(row: &PgRow) -> Result<Vec<serde_json::Value>, CheckError> {
        row.columns()
            .iter()
            .map(|column| -> Result<serde_json::Value, CheckError> {
                // Simple-protocol results are text for every type
                let text: Option<String> = row.try_get_unchecked(column.ordinal())?;
                Ok(text_to_json(column.type_info().name(), text.as_deref()))
            })
            .collect()
    }
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch_rows(&mut self, sql: &str) -> Result<QueryResult, CheckError> {
        debug!("Executing query: {}", sql);
        let rows = self.conn.fetch_all(sqlx::raw_sql(sql)).await?;

        let columns: Vec<String> = rows
            .first()
            .map(|row| row.columns().iter().map(|c| c.name().to_string()).collect())
            .unwrap_or_default();
        let rows = rows
            .iter()
            .map(Self::decode_row)
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Query returned {} rows", rows.len());
        Ok(QueryResult::new(columns, rows))
    }

    async fn list_tables(&mut self) -> Result<Vec<TableRef>, CheckError> {
        let tables = sqlx::query_as::<_, (String, String)>(LIST_TABLES_SQL)
            .fetch_all(&mut self.conn)
            .await?;

        Ok(tables
            .into_iter()
            .map(|(schema, name)| TableRef { schema, name })
            .collect())
    }

    fn default_schema(&self) -> &str {
        &self.schema
    }

    async fn close(self) -> Result<(), CheckError> {
        self.conn.close().await?;
        info!("Database connection closed.");
        Ok(())
    }
}
