//! Integration tests for the validation run
//!
//! Tests cover:
//! - Each check kind end to end through the dispatcher
//! - Configuration errors recorded as FAIL without running queries
//! - Execution errors recorded as FAIL without stopping the run
//! - Unreachable databases failing only their own checks
//! - Report aggregation and exit codes

mod common;

use common::{FakeConnector, FakeDatabase};
use pgdv::{Outcome, RunCoordinator};
use pgdv_common::{ErrorClass, ValidatorConfig};
use serde_json::json;

/// Test helper: one database at `host` with the given checks
fn single_database(host: &str, checks: serde_json::Value) -> ValidatorConfig {
    ValidatorConfig::from_value(json!({
        "databases": [
            { "connection": { "host": host }, "validation": checks }
        ]
    }))
    .expect("Config should parse")
}

// =============================================================================
// TABLE_EXISTS
// =============================================================================

#[tokio::test]
async fn test_missing_table_fails_run_and_names_table() {
    let connector = FakeConnector::new()
        .with_database("restored", FakeDatabase::new().with_tables(&["users"]));
    let config = single_database(
        "restored",
        json!([{ "type": "TABLE_EXISTS", "required_tables": ["users", "orders"] }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    assert!(!report.passed());
    assert_eq!(report.exit_code(), 1);
    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Fail);
    assert_eq!(verdict.message, "Missing tables: orders");
    assert_eq!(verdict.cause, None);
}

#[tokio::test]
async fn test_all_tables_present_passes() {
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_tables(&["users", "orders", "audit_log"]),
    );
    let config = single_database(
        "restored",
        json!([{ "type": "TABLE_EXISTS", "required_tables": ["orders", "users"] }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    assert!(report.passed());
    assert_eq!(report.exit_code(), 0);
}

// =============================================================================
// COUNT_CHECK
// =============================================================================

#[tokio::test]
async fn test_count_check_passes_on_threshold() {
    let sql = "SELECT count(*) FROM users";
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_rows(sql, &["count"], vec![vec![json!(42)]]),
    );
    let config = single_database(
        "restored",
        json!([{ "type": "COUNT_CHECK", "query": sql, "operator": ">=", "value": 40 }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    assert!(report.passed());
    assert_eq!(report.databases[0].verdicts[0].message, "42 >= 40");
}

#[tokio::test]
async fn test_unsupported_operator_fails_check_but_others_run() {
    let count_sql = "SELECT count(*) FROM orders";
    let printer_sql = "SELECT key, value FROM settings";
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new()
            .with_rows(count_sql, &["count"], vec![vec![json!(10)]])
            .with_rows(printer_sql, &["key", "value"], vec![vec![json!("mode"), json!("ro")]]),
    );
    let config = single_database(
        "restored",
        json!([
            { "type": "COUNT_CHECK", "query": count_sql, "operator": "~=", "value": 10 },
            { "type": "PRINTER", "query": printer_sql }
        ]),
    );

    let journal = connector.journal.clone();
    let report = RunCoordinator::new(connector).run(&config).await;

    let verdicts = &report.databases[0].verdicts;
    assert_eq!(verdicts.len(), 2);
    assert_eq!(verdicts[0].outcome, Outcome::Fail);
    assert_eq!(verdicts[0].cause, Some(ErrorClass::Configuration));
    assert!(verdicts[0].message.contains("Unsupported operator: ~="));
    assert_eq!(verdicts[1].outcome, Outcome::Pass);
    assert!(!report.passed());

    // The misconfigured check never reached the database
    assert_eq!(journal.queries(), vec![printer_sql.to_string()]);
}

#[tokio::test]
async fn test_malformed_count_result_is_execution_failure() {
    let sql = "SELECT id FROM users";
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_rows(sql, &["id"], vec![vec![json!(1)], vec![json!(2)]]),
    );
    let config = single_database(
        "restored",
        json!([{ "type": "COUNT_CHECK", "query": sql, "operator": "=", "value": 1 }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Fail);
    assert_eq!(verdict.cause, Some(ErrorClass::Execution));
    assert!(verdict.message.starts_with("Malformed query result"));
}

// =============================================================================
// PRINTER
// =============================================================================

#[tokio::test]
async fn test_printer_passes_with_zero_rows() {
    let sql = "SELECT * FROM empty_table";
    let connector = FakeConnector::new()
        .with_database("restored", FakeDatabase::new().with_rows(sql, &[], vec![]));
    let config = single_database("restored", json!([{ "type": "PRINTER", "query": sql }]));

    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Pass);
    assert_eq!(verdict.message, "0 rows returned");
}

#[tokio::test]
async fn test_printer_message_contains_rows() {
    let sql = "SELECT id, email FROM users";
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_rows(
            sql,
            &["id", "email"],
            vec![vec![json!(1), json!("a@example.com")], vec![json!(2), json!(null)]],
        ),
    );
    let config = single_database("restored", json!([{ "type": "PRINTER", "query": sql }]));

    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Pass);
    let mut lines = verdict.message.lines();
    assert_eq!(lines.next(), Some("2 rows returned"));
    let rows: Vec<serde_json::Value> = lines
        .map(|line| serde_json::from_str(line).expect("Row should be JSON"))
        .collect();
    assert_eq!(
        rows,
        vec![json!({"id": 1, "email": "a@example.com"}), json!({"id": 2, "email": null})]
    );
}

#[tokio::test]
async fn test_printer_query_error_fails() {
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_error("SELECT * FROM gone", "relation \"gone\" does not exist"),
    );
    let config = single_database(
        "restored",
        json!([{ "type": "PRINTER", "query": "SELECT * FROM gone" }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Fail);
    assert_eq!(verdict.cause, Some(ErrorClass::Execution));
    assert!(verdict.message.contains("relation \"gone\" does not exist"));
}

// =============================================================================
// INCLUDES_CHECK
// =============================================================================

#[tokio::test]
async fn test_includes_passes_with_extra_rows() {
    let sql = "SELECT id FROM users";
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_rows(sql, &["id"], vec![vec![json!(1)], vec![json!(2)]]),
    );
    let config = single_database(
        "restored",
        json!([{ "type": "INCLUDES_CHECK", "query": sql, "values": [{ "id": 1 }] }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    assert!(report.passed());
}

#[tokio::test]
async fn test_includes_names_missing_values() {
    let sql = "SELECT code, name FROM regions";
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new().with_rows(sql, &["code", "name"], vec![vec![json!("EU"), json!("Europe")]]),
    );
    let config = single_database(
        "restored",
        json!([{
            "type": "INCLUDES_CHECK",
            "query": sql,
            "values": [["EU", "Europe"], ["US", "United States"]]
        }]),
    );

    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Fail);
    assert_eq!(verdict.message, r#"Missing values: ["US","United States"]"#);
}

// =============================================================================
// Dispatch and coordination
// =============================================================================

#[tokio::test]
async fn test_unknown_kind_recorded_without_query() {
    let connector = FakeConnector::new().with_database("restored", FakeDatabase::new());
    let config = single_database(
        "restored",
        json!([{ "type": "ROW_HASH", "query": "SELECT 1" }]),
    );

    let journal = connector.journal.clone();
    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.outcome, Outcome::Fail);
    assert_eq!(verdict.kind, "ROW_HASH");
    assert_eq!(verdict.cause, Some(ErrorClass::Configuration));
    assert_eq!(verdict.message, "Unknown check kind: ROW_HASH");
    assert!(journal.queries().is_empty());
}

#[tokio::test]
async fn test_missing_parameter_recorded_as_configuration_failure() {
    let connector = FakeConnector::new().with_database("restored", FakeDatabase::new());
    let config = single_database("restored", json!([{ "type": "COUNT_CHECK", "query": "SELECT 1" }]));

    let report = RunCoordinator::new(connector).run(&config).await;

    let verdict = &report.databases[0].verdicts[0];
    assert_eq!(verdict.cause, Some(ErrorClass::Configuration));
    assert!(verdict.message.contains("`operator`"));
}

#[tokio::test]
async fn test_unreachable_database_fails_its_checks_only() {
    let sql = "SELECT count(*) FROM users";
    let connector = FakeConnector::new().with_database(
        "replica",
        FakeDatabase::new().with_rows(sql, &["count"], vec![vec![json!(5)]]),
    );
    let config = ValidatorConfig::from_value(json!({
        "databases": [
            {
                "name": "primary",
                "connection": { "host": "primary" },
                "validation": [
                    { "type": "PRINTER", "query": "SELECT 1" },
                    { "type": "TABLE_EXISTS", "required_tables": ["users"] }
                ]
            },
            {
                "name": "replica",
                "connection": { "host": "replica" },
                "validation": [
                    { "type": "COUNT_CHECK", "query": sql, "operator": ">", "value": 0 }
                ]
            }
        ]
    }))
    .unwrap();

    let journal = connector.journal.clone();
    let report = RunCoordinator::new(connector).run(&config).await;

    let primary = &report.databases[0];
    assert_eq!(primary.name, "primary");
    assert_eq!(primary.verdicts.len(), 2);
    assert!(primary
        .verdicts
        .iter()
        .all(|v| v.outcome == Outcome::Fail && v.cause == Some(ErrorClass::Connection)));

    let replica = &report.databases[1];
    assert!(replica.passed());

    assert_eq!(journal.connects(), vec!["primary", "replica"]);
    assert_eq!(journal.closes(), vec!["replica"]);
    assert!(!report.passed());
}

#[tokio::test]
async fn test_checks_run_in_order_over_one_connection() {
    let connector = FakeConnector::new().with_database(
        "restored",
        FakeDatabase::new()
            .with_tables(&["users"])
            .with_rows("SELECT 1", &["?column?"], vec![vec![json!(1)]])
            .with_rows("SELECT 2", &["?column?"], vec![vec![json!(2)]]),
    );
    let config = single_database(
        "restored",
        json!([
            { "type": "PRINTER", "query": "SELECT 2" },
            { "type": "TABLE_EXISTS", "required_tables": ["users"] },
            { "type": "PRINTER", "query": "SELECT broken" },
            { "type": "COUNT_CHECK", "query": "SELECT 1", "operator": "=", "value": 1 }
        ]),
    );

    let journal = connector.journal.clone();
    let report = RunCoordinator::new(connector).run(&config).await;

    assert_eq!(
        journal.queries(),
        vec!["SELECT 2", "<catalog>", "SELECT broken", "SELECT 1"]
    );
    assert_eq!(journal.connects().len(), 1);
    assert_eq!(journal.closes().len(), 1);

    let outcomes: Vec<_> = report.databases[0].verdicts.iter().map(|v| v.outcome).collect();
    assert_eq!(outcomes, vec![Outcome::Pass, Outcome::Pass, Outcome::Fail, Outcome::Pass]);
    let indexes: Vec<_> = report.databases[0].verdicts.iter().map(|v| v.index).collect();
    assert_eq!(indexes, vec![1, 2, 3, 4]);

    let summary = report.summary();
    assert_eq!((summary.total, summary.passed, summary.failed), (4, 3, 1));
}

#[tokio::test]
async fn test_database_without_checks_is_not_contacted() {
    let connector = FakeConnector::new();
    let config = single_database("nowhere", json!([]));

    let journal = connector.journal.clone();
    let report = RunCoordinator::new(connector).run(&config).await;

    assert!(report.passed());
    assert!(journal.connects().is_empty());
}
