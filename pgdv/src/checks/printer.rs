//! PRINTER evaluator
//!
//! Shows query rows for manual inspection. Row content never fails the
//! check; only query execution errors do.

use pgdv_common::checks::PrinterCheck;
use pgdv_common::db::{QueryExecutor, QueryResult};
use pgdv_common::CheckError;
use serde_json::Value;
use tracing::info;

use super::Evaluation;

pub async fn evaluate<E: QueryExecutor>(
    check: &PrinterCheck,
    executor: &mut E,
) -> Result<Evaluation, CheckError> {
    info!("Query: {}", check.query);
    let result = executor.fetch_rows(&check.query).await?;

    info!("{} rows returned:", result.len());
    let lines = render_rows(&result);
    for line in &lines {
        info!("{}", line);
    }

    let mut message = format!("{} rows returned", result.len());
    for line in lines {
        message.push('\n');
        message.push_str(&line);
    }
    Ok(Evaluation::pass(message))
}

/// One JSON object per row
pub fn render_rows(result: &QueryResult) -> Vec<String> {
    (0..result.len())
        .filter_map(|i| result.row_object(i))
        .map(|row| Value::Object(row).to_string())
        .collect()
}
