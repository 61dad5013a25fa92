//! Verdicts and the run report

use chrono::{DateTime, Utc};
use pgdv_common::{CheckEntry, CheckError, ErrorClass};
use serde::Serialize;
use std::fmt;

use crate::checks::Evaluation;

/// PASS or FAIL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Outcome {
    Pass,
    Fail,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Pass => write!(f, "PASS"),
            Outcome::Fail => write!(f, "FAIL"),
        }
    }
}

/// Result of one check
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Verdict {
    /// 1-based position within the database's check list
    pub index: usize,
    /// Check kind tag as configured
    pub kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub outcome: Outcome,
    pub message: String,
    /// Set when the check could not be evaluated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<ErrorClass>,
}

impl Verdict {
    pub fn from_evaluation(entry: &CheckEntry, evaluation: Evaluation) -> Self {
        Self {
            index: entry.index,
            kind: entry.kind.clone(),
            description: entry.description.clone(),
            outcome: evaluation.outcome,
            message: evaluation.message,
            cause: None,
        }
    }

    pub fn from_error(entry: &CheckEntry, error: &CheckError) -> Self {
        Self {
            index: entry.index,
            kind: entry.kind.clone(),
            description: entry.description.clone(),
            outcome: Outcome::Fail,
            message: error.to_string(),
            cause: Some(error.class()),
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome == Outcome::Pass
    }

    /// `#2 COUNT_CHECK (enough users)`
    pub fn label(&self) -> String {
        let kind = if self.kind.is_empty() { "<untyped>" } else { self.kind.as_str() };
        match &self.description {
            Some(description) => format!("#{} {} ({})", self.index, kind, description),
            None => format!("#{} {}", self.index, kind),
        }
    }
}

/// Verdicts for one database, in configuration order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseReport {
    pub name: String,
    pub verdicts: Vec<Verdict>,
}

impl DatabaseReport {
    pub fn passed(&self) -> bool {
        self.verdicts.iter().all(Verdict::passed)
    }
}

/// Check counts for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub databases: usize,
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
}

/// The full run report
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub databases: Vec<DatabaseReport>,
}

impl Report {
    /// True iff every verdict in every database passed
    pub fn passed(&self) -> bool {
        self.databases.iter().all(DatabaseReport::passed)
    }

    pub fn outcome(&self) -> Outcome {
        if self.passed() {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }

    pub fn verdicts(&self) -> impl Iterator<Item = &Verdict> {
        self.databases.iter().flat_map(|db| db.verdicts.iter())
    }

    pub fn summary(&self) -> Summary {
        let total = self.verdicts().count();
        let passed = self.verdicts().filter(|v| v.passed()).count();
        Summary {
            databases: self.databases.len(),
            total,
            passed,
            failed: total - passed,
        }
    }

    /// Process exit code: 0 when the run passed, 1 otherwise
    pub fn exit_code(&self) -> u8 {
        if self.passed() {
            0
        } else {
            1
        }
    }
}
