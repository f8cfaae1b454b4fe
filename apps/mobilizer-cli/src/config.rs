//! CLI configuration from `MOBILIZER_*` environment variables.

use std::path::PathBuf;

use mobilizer_locations::DEFAULT_MAX_ROWS;

/// Runtime configuration of the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    /// Log filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,

    /// Emit JSON log lines instead of compact text.
    pub log_json: bool,

    /// Scope policy file for `check-scope`. The built-in policy applies
    /// when unset.
    pub scope_policy: Option<PathBuf>,

    /// Upper bound on rows per imported batch.
    pub max_import_rows: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            log_json: false,
            scope_policy: None,
            max_import_rows: DEFAULT_MAX_ROWS,
        }
    }
}

impl CliConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_reader(|key| std::env::var(key))
    }

    /// Load configuration from a custom variable reader.
    ///
    /// This allows tests to supply variables without mutating process-global
    /// environment state.
    pub fn from_reader<F>(reader: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        let log_filter = reader("MOBILIZER_LOG_FILTER").unwrap_or_else(|_| "info".to_string());
        if log_filter.trim().is_empty() {
            return Err(ConfigError::InvalidValue(
                "MOBILIZER_LOG_FILTER".into(),
                "must not be empty".into(),
            ));
        }

        let log_json = reader("MOBILIZER_LOG_JSON")
            .unwrap_or_else(|_| "false".to_string())
            .parse::<bool>()
            .map_err(|e| ConfigError::InvalidValue("MOBILIZER_LOG_JSON".into(), e.to_string()))?;

        let scope_policy = reader("MOBILIZER_SCOPE_POLICY")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        let max_import_rows = reader("MOBILIZER_MAX_IMPORT_ROWS")
            .unwrap_or_else(|_| DEFAULT_MAX_ROWS.to_string())
            .parse::<usize>()
            .map_err(|e| {
                ConfigError::InvalidValue("MOBILIZER_MAX_IMPORT_ROWS".into(), e.to_string())
            })?;
        if max_import_rows == 0 {
            return Err(ConfigError::InvalidValue(
                "MOBILIZER_MAX_IMPORT_ROWS".into(),
                "must be greater than zero".into(),
            ));
        }

        Ok(Self {
            log_filter,
            log_json,
            scope_policy,
            max_import_rows,
        })
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {0}: {1}")]
    InvalidValue(String, String),
}
