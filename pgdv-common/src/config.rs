//! Validation configuration loading
//!
//! The configuration file lists databases, each with connection parameters
//! and an ordered list of checks. JSON is the native format; files ending in
//! `.toml` are read as TOML and mapped onto the same document shape.
//!
//! Whole-file problems (missing file, syntax errors, wrong top-level shape)
//! are fatal. Problems inside a single check are not: they are kept on that
//! check's [`CheckEntry`] and surface later as a FAIL verdict.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;
use tracing::{debug, info};

use crate::checks::{CheckDefinition, CheckKind};
use crate::error::CheckError;
use crate::{Error, Result};

/// Schema used for unqualified table names when none is configured
pub const DEFAULT_SCHEMA: &str = "public";

/// PostgreSQL connection parameters.
///
/// Every field is optional; anything left out falls back to the standard
/// `PG*` environment variables when connecting.
#[derive(Clone, Default, Deserialize, Serialize)]
pub struct ConnectionConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    /// Applied as the session search path and used for unqualified table names.
    ///
    /// This names exactly one schema. It is sent as a quoted identifier, so
    /// case is kept as written (`Sales` is not folded to `sales`) and lists
    /// such as `sales, public` are rejected at load time.
    pub schema: Option<String>,
}

impl ConnectionConfig {
    pub fn schema(&self) -> &str {
        self.schema.as_deref().unwrap_or(DEFAULT_SCHEMA)
    }

    /// Reject connection settings that cannot be applied as written
    pub fn validate(&self) -> Result<()> {
        if let Some(schema) = &self.schema {
            if schema.trim().is_empty() {
                return Err(Error::Config(format!(
                    "Database {}: schema must not be empty",
                    self.display_name()
                )));
            }
            if schema.contains(',') {
                return Err(Error::Config(format!(
                    "Database {}: schema '{}' must name a single schema, not a search path list",
                    self.display_name(),
                    schema
                )));
            }
        }
        Ok(())
    }

    /// `user@host:port/dbname`, with absent parts left out
    pub fn display_name(&self) -> String {
        let mut name = String::new();
        if let Some(user) = &self.user {
            name.push_str(user);
            name.push('@');
        }
        name.push_str(self.host.as_deref().unwrap_or("(default host)"));
        if let Some(port) = self.port {
            name.push_str(&format!(":{}", port));
        }
        if let Some(dbname) = &self.dbname {
            name.push('/');
            name.push_str(dbname);
        }
        name
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("dbname", &self.dbname)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("schema", &self.schema)
            .finish()
    }
}

/// One configured check, interpreted at load time
#[derive(Debug, Clone)]
pub struct CheckEntry {
    /// 1-based position within its database's check list
    pub index: usize,
    /// The `type` tag as written in the configuration
    pub kind: String,
    pub description: Option<String>,
    /// The typed check, or the configuration error that prevents running it
    pub definition: std::result::Result<CheckDefinition, CheckError>,
}

impl CheckEntry {
    fn from_value(index: usize, value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return CheckEntry {
                index,
                kind: String::new(),
                description: None,
                definition: Err(CheckError::InvalidParameter {
                    kind: "check",
                    field: "type",
                    reason: format!("check entry must be an object, got {}", value),
                }),
            };
        };

        let description = fields
            .get("description")
            .and_then(Value::as_str)
            .map(str::to_string);

        let (kind, definition) = match fields.get("type") {
            None | Some(Value::Null) => (
                String::new(),
                Err(CheckError::MissingParameter { kind: "check", field: "type" }),
            ),
            Some(Value::String(tag)) => (
                tag.clone(),
                tag.parse::<CheckKind>()
                    .and_then(|kind| CheckDefinition::from_params(kind, fields)),
            ),
            Some(other) => (
                other.to_string(),
                Err(CheckError::UnknownCheckKind(other.to_string())),
            ),
        };

        CheckEntry { index, kind, description, definition }
    }
}

/// A database and the checks to run against it
#[derive(Debug, Clone)]
pub struct DatabaseTarget {
    /// Display name used in logs and the report
    pub name: String,
    pub connection: ConnectionConfig,
    pub checks: Vec<CheckEntry>,
}

/// Top-level validation configuration
#[derive(Debug, Clone, Default)]
pub struct ValidatorConfig {
    pub databases: Vec<DatabaseTarget>,
}

#[derive(Deserialize)]
struct RawConfig {
    #[serde(default)]
    databases: Vec<RawDatabase>,
}

#[derive(Deserialize)]
struct RawDatabase {
    name: Option<String>,
    #[serde(default)]
    connection: ConnectionConfig,
    #[serde(default)]
    validation: Vec<Value>,
}

impl ValidatorConfig {
    /// Interpret an already-parsed configuration document
    pub fn from_value(document: Value) -> Result<Self> {
        let raw: RawConfig = serde_json::from_value(document)
            .map_err(|e| Error::Config(format!("Invalid configuration structure: {}", e)))?;

        let databases = raw
            .databases
            .into_iter()
            .map(|db| {
                db.connection.validate()?;
                let checks = db
                    .validation
                    .iter()
                    .enumerate()
                    .map(|(i, value)| CheckEntry::from_value(i + 1, value))
                    .collect();
                Ok(DatabaseTarget {
                    name: db.name.unwrap_or_else(|| db.connection.display_name()),
                    connection: db.connection,
                    checks,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(ValidatorConfig { databases })
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let document: Value = serde_json::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid JSON in config file: {}", e)))?;
        Self::from_value(document)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let document: toml::Value = toml::from_str(content)
            .map_err(|e| Error::Config(format!("Invalid TOML in config file: {}", e)))?;
        let document = serde_json::to_value(document)
            .map_err(|e| Error::Config(format!("Unsupported TOML value: {}", e)))?;
        Self::from_value(document)
    }

    /// Number of configured checks across all databases
    pub fn check_count(&self) -> usize {
        self.databases.iter().map(|db| db.checks.len()).sum()
    }
}

/// Load configuration from a JSON or TOML file
pub fn load_config(path: &Path) -> Result<ValidatorConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::Config(format!("Configuration file '{}' not found", path.display()))
        } else {
            Error::Io(e)
        }
    })?;

    let is_toml = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("toml"))
        .unwrap_or(false);
    debug!("Parsing {} as {}", path.display(), if is_toml { "TOML" } else { "JSON" });

    let config = if is_toml {
        ValidatorConfig::from_toml_str(&content)?
    } else {
        ValidatorConfig::from_json_str(&content)?
    };

    info!(
        "Loaded {} database(s), {} check(s) from {}",
        config.databases.len(),
        config.check_count(),
        path.display()
    );
    Ok(config)
}
