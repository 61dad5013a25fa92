//! Test helpers: an in-memory stand-in for PostgreSQL
//!
//! A `FakeConnector` maps connection hosts to canned databases. Each fake
//! database answers queries from a fixed SQL → result table and records what
//! was executed, so tests can assert on query order and connection release.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pgdv_common::db::{Connector, QueryExecutor, QueryResult, TableRef};
use pgdv_common::{CheckError, ConnectionConfig};
use serde_json::Value;

/// Shared record of what happened on fake connections
#[derive(Debug, Default, Clone)]
pub struct Journal {
    inner: Arc<Mutex<JournalInner>>,
}

#[derive(Debug, Default)]
struct JournalInner {
    connects: Vec<String>,
    queries: Vec<String>,
    closes: Vec<String>,
}

impl Journal {
    pub fn connects(&self) -> Vec<String> {
        self.inner.lock().unwrap().connects.clone()
    }

    pub fn queries(&self) -> Vec<String> {
        self.inner.lock().unwrap().queries.clone()
    }

    pub fn closes(&self) -> Vec<String> {
        self.inner.lock().unwrap().closes.clone()
    }
}

/// Canned contents of one database
#[derive(Debug, Clone, Default)]
pub struct FakeDatabase {
    pub schema: String,
    pub tables: Vec<TableRef>,
    pub responses: HashMap<String, Result<QueryResult, CheckError>>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        Self { schema: "public".into(), ..Default::default() }
    }

    pub fn with_tables(mut self, names: &[&str]) -> Self {
        self.tables
            .extend(names.iter().map(|n| TableRef::new(self.schema.clone(), *n)));
        self
    }

    pub fn with_rows(mut self, sql: &str, columns: &[&str], rows: Vec<Vec<Value>>) -> Self {
        let columns = columns.iter().map(|c| c.to_string()).collect();
        self.responses
            .insert(sql.to_string(), Ok(QueryResult::new(columns, rows)));
        self
    }

    pub fn with_error(mut self, sql: &str, message: &str) -> Self {
        self.responses.insert(
            sql.to_string(),
            Err(CheckError::QueryExecution(message.to_string())),
        );
        self
    }
}

#[derive(Debug, Default)]
pub struct FakeConnector {
    databases: HashMap<String, FakeDatabase>,
    pub journal: Journal,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a database reachable at `host`
    pub fn with_database(mut self, host: &str, database: FakeDatabase) -> Self {
        self.databases.insert(host.to_string(), database);
        self
    }
}

#[async_trait]
impl Connector for FakeConnector {
    type Executor = FakeExecutor;

    async fn connect(&self, connection: &ConnectionConfig) -> Result<FakeExecutor, CheckError> {
        let host = connection.host.clone().unwrap_or_default();
        self.journal.inner.lock().unwrap().connects.push(host.clone());

        match self.databases.get(&host) {
            Some(database) => Ok(FakeExecutor {
                host,
                database: database.clone(),
                journal: self.journal.clone(),
            }),
            None => Err(CheckError::Connection(format!(
                "could not connect to server at \"{}\"",
                host
            ))),
        }
    }
}

#[derive(Debug)]
pub struct FakeExecutor {
    host: String,
    database: FakeDatabase,
    journal: Journal,
}

#[async_trait]
impl QueryExecutor for FakeExecutor {
    async fn fetch_rows(&mut self, sql: &str) -> Result<QueryResult, CheckError> {
        self.journal.inner.lock().unwrap().queries.push(sql.to_string());
        self.database
            .responses
            .get(sql)
            .cloned()
            .unwrap_or_else(|| {
                Err(CheckError::QueryExecution(format!(
                    "syntax error at or near \"{}\"",
                    sql
                )))
            })
    }

    async fn list_tables(&mut self) -> Result<Vec<TableRef>, CheckError> {
        self.journal
            .inner
            .lock()
            .unwrap()
            .queries
            .push("<catalog>".to_string());
        Ok(self.database.tables.clone())
    }

    fn default_schema(&self) -> &str {
        &self.database.schema
    }

    async fn close(self) -> Result<(), CheckError> {
        self.journal.inner.lock().unwrap().closes.push(self.host);
        Ok(())
    }
}
