//! Check evaluators
//!
//! One module per check kind. Each evaluator runs its query through a
//! [`QueryExecutor`](pgdv_common::db::QueryExecutor) and turns the rows into
//! an [`Evaluation`]. Errors (bad SQL, unexpected result shape) are returned
//! as `CheckError` and become FAIL verdicts in the coordinator.

use serde_json::{Number, Value};
use std::cmp::Ordering;

use crate::report::Outcome;

pub mod count;
pub mod includes;
pub mod printer;
pub mod table_exists;

/// Outcome and message produced by one evaluator
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub outcome: Outcome,
    pub message: String,
}

impl Evaluation {
    pub fn pass(message: impl Into<String>) -> Self {
        Self { outcome: Outcome::Pass, message: message.into() }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self { outcome: Outcome::Fail, message: message.into() }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

/// Numeric ordering of two JSON numbers; exact when both are integers
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    if let (Some(x), Some(y)) = (a.as_i64(), b.as_i64()) {
        return x.cmp(&y);
    }
    if let (Some(x), Some(y)) = (a.as_u64(), b.as_u64()) {
        return x.cmp(&y);
    }
    let x = a.as_f64().unwrap_or(f64::NAN);
    let y = b.as_f64().unwrap_or(f64::NAN);
    x.total_cmp(&y)
}

/// Value equality for row matching: numbers by value, everything else exactly
pub(crate) fn values_equal(expected: &Value, actual: &Value) -> bool {
    match (expected, actual) {
        (Value::Number(a), Value::Number(b)) => compare_numbers(a, b) == Ordering::Equal,
        _ => expected == actual,
    }
}
