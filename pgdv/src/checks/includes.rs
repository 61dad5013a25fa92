//! INCLUDES_CHECK evaluator

use pgdv_common::checks::{ExpectedRow, IncludesCheck};
use pgdv_common::db::{QueryExecutor, QueryResult};
use pgdv_common::CheckError;
use serde_json::Value;
use tracing::{error, info};

use super::{values_equal, Evaluation};

pub async fn evaluate<E: QueryExecutor>(
    check: &IncludesCheck,
    executor: &mut E,
) -> Result<Evaluation, CheckError> {
    info!("Query: {}", check.query);
    info!(
        "Expected values: {}",
        check.values.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
    );

    let result = executor.fetch_rows(&check.query).await?;
    let missing = unmatched(&check.values, &result);

    if missing.is_empty() {
        info!("All expected values are present.");
        Ok(Evaluation::pass(format!(
            "All {} expected values are present",
            check.values.len()
        )))
    } else {
        let listed = missing.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ");
        error!("Missing values: {}", listed);
        Ok(Evaluation::fail(format!("Missing values: {}", listed)))
    }
}

/// Expected rows with no matching actual row, each listed once
pub fn unmatched<'a>(expected: &'a [ExpectedRow], result: &QueryResult) -> Vec<&'a ExpectedRow> {
    let mut missing: Vec<&ExpectedRow> = Vec::new();
    for wanted in expected {
        let found = result
            .rows
            .iter()
            .any(|row| row_matches(wanted, result, row));
        if !found && !missing.contains(&wanted) {
            missing.push(wanted);
        }
    }
    missing
}

/// Positional rows must match the whole row; column rows only the named columns
pub fn row_matches(expected: &ExpectedRow, result: &QueryResult, row: &[Value]) -> bool {
    match expected {
        ExpectedRow::Positional(values) => {
            values.len() == row.len()
                && values.iter().zip(row).all(|(want, have)| values_equal(want, have))
        }
        ExpectedRow::Columns(map) => map.iter().all(|(column, want)| {
            result
                .column_index(column)
                .and_then(|i| row.get(i))
                .map(|have| values_equal(want, have))
                .unwrap_or(false)
        }),
    }
}
