//! COUNT_CHECK evaluator

use pgdv_common::checks::{CompareOperator, CountCheck};
use pgdv_common::db::decode::parse_number;
use pgdv_common::db::{QueryExecutor, QueryResult};
use pgdv_common::CheckError;
use serde_json::{Number, Value};
use tracing::{error, info};

use super::{compare_numbers, Evaluation};

pub async fn evaluate<E: QueryExecutor>(
    check: &CountCheck,
    executor: &mut E,
) -> Result<Evaluation, CheckError> {
    info!("Query: {}", check.query);
    info!("Operator: {}, Value: {}", check.operator, check.value);

    let result = executor.fetch_rows(&check.query).await?;
    let actual = scalar_number(&result)?;
    Ok(judge(&actual, check.operator, &check.value))
}

/// Compare the extracted scalar against the configured threshold
pub fn judge(actual: &Number, operator: CompareOperator, expected: &Number) -> Evaluation {
    if operator.holds(compare_numbers(actual, expected)) {
        info!("Check passed: {} {} {}", actual, operator, expected);
        Evaluation::pass(format!("{} {} {}", actual, operator, expected))
    } else {
        error!("Check failed: {} {} {} is false", actual, operator, expected);
        Evaluation::fail(format!("{} {} {} is false", actual, operator, expected))
    }
}

/// The single numeric value of a one-row, one-column result
pub fn scalar_number(result: &QueryResult) -> Result<Number, CheckError> {
    let row = match result.rows.as_slice() {
        [row] => row,
        rows => {
            return Err(CheckError::MalformedResult(format!(
                "expected exactly one row, got {}",
                rows.len()
            )))
        }
    };
    let value = match row.as_slice() {
        [value] => value,
        values => {
            return Err(CheckError::MalformedResult(format!(
                "expected exactly one column, got {}",
                values.len()
            )))
        }
    };

    match value {
        Value::Number(n) => Ok(n.clone()),
        Value::String(s) => parse_number(s).ok_or_else(|| {
            CheckError::MalformedResult(format!("value {:?} is not numeric", s))
        }),
        Value::Null => Err(CheckError::MalformedResult("query returned NULL".to_string())),
        other => Err(CheckError::MalformedResult(format!("value {} is not numeric", other))),
    }
}
