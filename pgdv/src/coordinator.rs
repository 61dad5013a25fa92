//! Run coordinator
//!
//! Walks the configured databases in order, opens one connection per
//! database, evaluates each check sequentially and collects verdicts. A
//! failing check never stops the run; an unreachable database fails all of
//! its own checks and the run moves on to the next database.

use chrono::Utc;
use pgdv_common::db::{Connector, QueryExecutor};
use pgdv_common::{CheckEntry, DatabaseTarget, ValidatorConfig};
use tracing::{error, info, warn};

use crate::dispatcher::dispatch_entry;
use crate::report::{DatabaseReport, Report, Verdict};

const BANNER: &str =
    "##########################################################################";

pub struct RunCoordinator<C: Connector> {
    connector: C,
}

impl<C: Connector> RunCoordinator<C> {
    pub fn new(connector: C) -> Self {
        Self { connector }
    }

    /// Run every check of every configured database
    pub async fn run(&self, config: &ValidatorConfig) -> Report {
        let started_at = Utc::now();
        let mut databases = Vec::with_capacity(config.databases.len());

        for target in &config.databases {
            databases.push(self.run_database(target).await);
        }

        let report = Report {
            started_at,
            finished_at: Utc::now(),
            databases,
        };
        let summary = report.summary();
        info!(
            "Validation finished: {} checks, {} passed, {} failed",
            summary.total, summary.passed, summary.failed
        );
        report
    }

    /// Run one database's checks over a single connection
    pub async fn run_database(&self, target: &DatabaseTarget) -> DatabaseReport {
        info!("Validating database {} ({} checks)", target.name, target.checks.len());

        if target.checks.is_empty() {
            warn!("No checks configured for {}, skipping connection", target.name);
            return DatabaseReport { name: target.name.clone(), verdicts: Vec::new() };
        }

        let mut executor = match self.connector.connect(&target.connection).await {
            Ok(executor) => executor,
            Err(err) => {
                error!("Failed to connect to database {}: {}", target.name, err);
                return DatabaseReport {
                    name: target.name.clone(),
                    verdicts: target
                        .checks
                        .iter()
                        .map(|entry| Verdict::from_error(entry, &err))
                        .collect(),
                };
            }
        };

        let mut verdicts = Vec::with_capacity(target.checks.len());
        for entry in &target.checks {
            verdicts.push(run_check(entry, &mut executor).await);
        }

        if let Err(err) = executor.close().await {
            warn!("Error closing connection to {}: {}", target.name, err);
        }

        DatabaseReport { name: target.name.clone(), verdicts }
    }
}

/// Evaluate one check, converting any error into a FAIL verdict
pub async fn run_check<E: QueryExecutor>(entry: &CheckEntry, executor: &mut E) -> Verdict {
    info!("{}", BANNER);
    info!(
        "Running {}: {}",
        if entry.kind.is_empty() { "check" } else { entry.kind.as_str() },
        entry.description.as_deref().unwrap_or("No description")
    );

    match dispatch_entry(entry, executor).await {
        Ok(evaluation) => Verdict::from_evaluation(entry, evaluation),
        Err(err) => {
            error!("Check #{} failed to run: {}", entry.index, err);
            Verdict::from_error(entry, &err)
        }
    }
}
