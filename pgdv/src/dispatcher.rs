//! Validation dispatcher
//!
//! Routes each check to the evaluator for its kind. Configuration errors
//! recorded at load time (unknown kind, missing or invalid parameters,
//! unsupported operator) are returned here before any query runs.

use pgdv_common::db::QueryExecutor;
use pgdv_common::{CheckDefinition, CheckEntry, CheckError};

use crate::checks::{count, includes, printer, table_exists, Evaluation};

/// Evaluate a typed check definition
pub async fn dispatch<E: QueryExecutor>(
    definition: &CheckDefinition,
    executor: &mut E,
) -> Result<Evaluation, CheckError> {
    match definition {
        CheckDefinition::TableExists(check) => table_exists::evaluate(check, executor).await,
        CheckDefinition::Count(check) => count::evaluate(check, executor).await,
        CheckDefinition::Printer(check) => printer::evaluate(check, executor).await,
        CheckDefinition::Includes(check) => includes::evaluate(check, executor).await,
    }
}

/// Evaluate a configured check, surfacing its configuration error if it has one
pub async fn dispatch_entry<E: QueryExecutor>(
    entry: &CheckEntry,
    executor: &mut E,
) -> Result<Evaluation, CheckError> {
    match &entry.definition {
        Ok(definition) => dispatch(definition, executor).await,
        Err(err) => Err(err.clone()),
    }
}
