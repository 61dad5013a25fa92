//! Typed check definitions
//!
//! Each configured check is interpreted into one of four complete shapes
//! before any database is contacted. Field presence and types are verified
//! here so evaluators never see a partial definition.

use serde::Serialize;
use serde_json::{Map, Number, Value};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::CheckError;

/// The four supported check kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CheckKind {
    #[serde(rename = "TABLE_EXISTS")]
    TableExists,
    #[serde(rename = "COUNT_CHECK")]
    CountCheck,
    #[serde(rename = "PRINTER")]
    Printer,
    #[serde(rename = "INCLUDES_CHECK")]
    IncludesCheck,
}

impl CheckKind {
    pub const ALL: [CheckKind; 4] = [
        CheckKind::TableExists,
        CheckKind::CountCheck,
        CheckKind::Printer,
        CheckKind::IncludesCheck,
    ];

    /// Configuration tag for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::TableExists => "TABLE_EXISTS",
            CheckKind::CountCheck => "COUNT_CHECK",
            CheckKind::Printer => "PRINTER",
            CheckKind::IncludesCheck => "INCLUDES_CHECK",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CheckKind {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CheckKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CheckError::UnknownCheckKind(s.to_string()))
    }
}

/// Comparison operator for COUNT_CHECK
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompareOperator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl CompareOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            CompareOperator::Eq => "=",
            CompareOperator::Ne => "!=",
            CompareOperator::Gt => ">",
            CompareOperator::Lt => "<",
            CompareOperator::Ge => ">=",
            CompareOperator::Le => "<=",
        }
    }

    /// Whether `actual <op> expected` holds, given `actual.cmp(expected)`
    pub fn holds(&self, ordering: Ordering) -> bool {
        match self {
            CompareOperator::Eq => ordering == Ordering::Equal,
            CompareOperator::Ne => ordering != Ordering::Equal,
            CompareOperator::Gt => ordering == Ordering::Greater,
            CompareOperator::Lt => ordering == Ordering::Less,
            CompareOperator::Ge => ordering != Ordering::Less,
            CompareOperator::Le => ordering != Ordering::Greater,
        }
    }
}

impl fmt::Display for CompareOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for CompareOperator {
    type Err = CheckError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "=" => Ok(CompareOperator::Eq),
            "!=" => Ok(CompareOperator::Ne),
            ">" => Ok(CompareOperator::Gt),
            "<" => Ok(CompareOperator::Lt),
            ">=" => Ok(CompareOperator::Ge),
            "<=" => Ok(CompareOperator::Le),
            other => Err(CheckError::UnsupportedOperator(other.to_string())),
        }
    }
}

/// TABLE_EXISTS: every listed table must be present in the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct TableExistsCheck {
    /// Table names, optionally `schema.table` qualified
    pub required_tables: Vec<String>,
}

/// COUNT_CHECK: a single scalar compared against a threshold
#[derive(Debug, Clone, PartialEq)]
pub struct CountCheck {
    pub query: String,
    pub operator: CompareOperator,
    pub value: Number,
}

/// PRINTER: run a query and show its rows
#[derive(Debug, Clone, PartialEq)]
pub struct PrinterCheck {
    pub query: String,
}

/// INCLUDES_CHECK: every expected row must appear in the query result
#[derive(Debug, Clone, PartialEq)]
pub struct IncludesCheck {
    pub query: String,
    pub values: Vec<ExpectedRow>,
}

/// One expected row of an INCLUDES_CHECK
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedRow {
    /// Compared position by position against the full row
    Positional(Vec<Value>),
    /// Compared on the named columns only
    Columns(Map<String, Value>),
}

impl ExpectedRow {
    /// Arrays are positional, objects are by column, scalars are one-column rows
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Array(items) => ExpectedRow::Positional(items.clone()),
            Value::Object(map) => ExpectedRow::Columns(map.clone()),
            scalar => ExpectedRow::Positional(vec![scalar.clone()]),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            ExpectedRow::Positional(items) => Value::Array(items.clone()),
            ExpectedRow::Columns(map) => Value::Object(map.clone()),
        }
    }
}

impl fmt::Display for ExpectedRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_value())
    }
}

/// A fully validated check, one variant per kind
#[derive(Debug, Clone, PartialEq)]
pub enum CheckDefinition {
    TableExists(TableExistsCheck),
    Count(CountCheck),
    Printer(PrinterCheck),
    Includes(IncludesCheck),
}

impl CheckDefinition {
    pub fn kind(&self) -> CheckKind {
        match self {
            CheckDefinition::TableExists(_) => CheckKind::TableExists,
            CheckDefinition::Count(_) => CheckKind::CountCheck,
            CheckDefinition::Printer(_) => CheckKind::Printer,
            CheckDefinition::Includes(_) => CheckKind::IncludesCheck,
        }
    }

    /// Interpret the kind-specific fields of one configured check.
    ///
    /// Unknown fields (such as `description`) are ignored.
    pub fn from_params(kind: CheckKind, params: &Map<String, Value>) -> Result<Self, CheckError> {
        let tag = kind.as_str();
        match kind {
            CheckKind::TableExists => {
                let tables = required_array(params, tag, "required_tables")?;
                let required_tables = tables
                    .iter()
                    .map(|t| {
                        t.as_str().map(str::to_string).ok_or_else(|| CheckError::InvalidParameter {
                            kind: tag,
                            field: "required_tables",
                            reason: format!("expected table name string, got {}", t),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(CheckDefinition::TableExists(TableExistsCheck { required_tables }))
            }
            CheckKind::CountCheck => {
                let query = required_query(params, tag)?;
                let operator = required_str(params, tag, "operator")?.parse()?;
                let value = match params.get("value") {
                    None | Some(Value::Null) => {
                        return Err(CheckError::MissingParameter { kind: tag, field: "value" })
                    }
                    Some(Value::Number(n)) => n.clone(),
                    Some(other) => {
                        return Err(CheckError::InvalidParameter {
                            kind: tag,
                            field: "value",
                            reason: format!("expected a number, got {}", other),
                        })
                    }
                };
                Ok(CheckDefinition::Count(CountCheck { query, operator, value }))
            }
            CheckKind::Printer => Ok(CheckDefinition::Printer(PrinterCheck {
                query: required_query(params, tag)?,
            })),
            CheckKind::IncludesCheck => {
                let query = required_query(params, tag)?;
                let values = required_array(params, tag, "values")?
                    .iter()
                    .map(ExpectedRow::from_value)
                    .collect();
                Ok(CheckDefinition::Includes(IncludesCheck { query, values }))
            }
        }
    }
}

fn required_str<'a>(
    params: &'a Map<String, Value>,
    kind: &'static str,
    field: &'static str,
) -> Result<&'a str, CheckError> {
    match params.get(field) {
        None | Some(Value::Null) => Err(CheckError::MissingParameter { kind, field }),
        Some(Value::String(s)) => Ok(s.as_str()),
        Some(other) => Err(CheckError::InvalidParameter {
            kind,
            field,
            reason: format!("expected a string, got {}", other),
        }),
    }
}

fn required_query(params: &Map<String, Value>, kind: &'static str) -> Result<String, CheckError> {
    let query = required_str(params, kind, "query")?;
    if query.trim().is_empty() {
        return Err(CheckError::InvalidParameter {
            kind,
            field: "query",
            reason: "query is empty".to_string(),
        });
    }
    Ok(query.to_string())
}

fn required_array<'a>(
    params: &'a Map<String, Value>,
    kind: &'static str,
    field: &'static str,
) -> Result<&'a Vec<Value>, CheckError> {
    match params.get(field) {
        None | Some(Value::Null) => Err(CheckError::MissingParameter { kind, field }),
        Some(Value::Array(items)) => Ok(items),
        Some(other) => Err(CheckError::InvalidParameter {
            kind,
            field,
            reason: format!("expected an array, got {}", other),
        }),
    }
}
