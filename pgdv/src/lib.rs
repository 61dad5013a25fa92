//! pgdv library - PostgreSQL data validator
//!
//! Runs a declarative list of data-integrity checks against one or more
//! databases (typically right after a restore or migration) and produces a
//! pass/fail report.
//!
//! # Example
//!
//! ```no_run
//! use pgdv::{RunCoordinator, PgConnector};
//! use pgdv_common::load_config;
//! use std::path::Path;
//!
//! # async fn example() -> pgdv_common::Result<()> {
//! let config = load_config(Path::new("validation.json"))?;
//! let report = RunCoordinator::new(PgConnector).run(&config).await;
//! println!("{}", pgdv::output::render_text(&report));
//! # Ok(())
//! # }
//! ```

pub mod checks;
pub mod coordinator;
pub mod dispatcher;
pub mod output;
pub mod report;

pub use coordinator::RunCoordinator;
pub use pgdv_common::db::PgConnector;
pub use report::{DatabaseReport, Outcome, Report, Summary, Verdict};

/// Version, profile and target of this build, for the startup log line
pub fn build_info() -> String {
    format!(
        "pgdv v{} ({}, {})",
        env!("CARGO_PKG_VERSION"),
        env!("PGDV_BUILD_PROFILE"),
        env!("PGDV_BUILD_TARGET")
    )
}
