//! TABLE_EXISTS evaluator

use std::collections::HashSet;

use pgdv_common::checks::TableExistsCheck;
use pgdv_common::db::{QueryExecutor, TableRef};
use pgdv_common::CheckError;
use tracing::{error, info};

use super::Evaluation;

pub async fn evaluate<E: QueryExecutor>(
    check: &TableExistsCheck,
    executor: &mut E,
) -> Result<Evaluation, CheckError> {
    info!("Checking for tables: {:?}", check.required_tables);
    let catalog = executor.list_tables().await?;
    let missing = missing_tables(&check.required_tables, &catalog, executor.default_schema());

    if missing.is_empty() {
        info!("All required tables exist!");
        Ok(Evaluation::pass(format!(
            "All {} required tables exist",
            check.required_tables.len()
        )))
    } else {
        error!("Missing tables: {:?}", missing);
        Ok(Evaluation::fail(format!("Missing tables: {}", missing.join(", "))))
    }
}

/// Required names absent from the catalog, in configuration order, each once.
///
/// An unqualified name refers to `default_schema`; `schema.table` refers to
/// that schema. Comparison is byte-for-byte, matching PostgreSQL's stored
/// (already case-folded) catalog names.
pub fn missing_tables(required: &[String], catalog: &[TableRef], default_schema: &str) -> Vec<String> {
    let present: HashSet<(&str, &str)> = catalog
        .iter()
        .map(|t| (t.schema.as_str(), t.name.as_str()))
        .collect();

    let mut seen = HashSet::new();
    required
        .iter()
        .filter(|name| seen.insert(name.as_str()))
        .filter(|name| {
            if present.contains(&(default_schema, name.as_str())) {
                return false;
            }
            match name.split_once('.') {
                Some((schema, table)) => !present.contains(&(schema, table)),
                None => true,
            }
        })
        .cloned()
        .collect()
}
