//! CLI error types and exit codes

use mobilizer_authorization::PolicyError;
use mobilizer_core::MobilizerError;
use mobilizer_locations::LocationError;
use thiserror::Error;

use crate::config::ConfigError;

/// Exit codes for the CLI
/// - 0: Success
/// - 1: General error
/// - 2: Unauthorized
/// - 3: Forbidden
/// - 4: Validation error
/// - 5: Not found
pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(String),

    #[error("{0}")]
    General(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Unauthorized(_) => 2,
            CliError::Forbidden(_) => 3,
            CliError::Validation(_) => 4,
            CliError::NotFound(_) => 5,
            CliError::Config(_) | CliError::Io(_) | CliError::General(_) => 1,
        }
    }

    /// Print the error to stderr with appropriate formatting
    pub fn print(&self) {
        let use_color = std::env::var("NO_COLOR").is_err();

        if use_color {
            eprintln!("\x1b[31mError:\x1b[0m {}", self);
        } else {
            eprintln!("Error: {}", self);
        }

        if let Some(suggestion) = self.suggestion() {
            if use_color {
                eprintln!("\n\x1b[33mSuggestion:\x1b[0m {}", suggestion);
            } else {
                eprintln!("\nSuggestion: {}", suggestion);
            }
        }
    }

    fn suggestion(&self) -> Option<&'static str> {
        match self {
            CliError::Unauthorized(_) => Some("Pass --scope for each scope the caller holds."),
            CliError::Forbidden(_) => {
                Some("Check the caller's scopes and movement memberships.")
            }
            CliError::Config(_) => Some("Check the MOBILIZER_* environment variables."),
            _ => None,
        }
    }
}

impl From<MobilizerError> for CliError {
    fn from(e: MobilizerError) -> Self {
        let message = e.to_string();
        match e {
            MobilizerError::Unauthorized { .. } => CliError::Unauthorized(message),
            MobilizerError::Forbidden { .. } => CliError::Forbidden(message),
            MobilizerError::NotFound { .. } => CliError::NotFound(message),
            MobilizerError::ValidationError { .. } => CliError::Validation(message),
            MobilizerError::Store { .. } => CliError::General(message),
        }
    }
}

impl From<LocationError> for CliError {
    fn from(e: LocationError) -> Self {
        match e {
            LocationError::Core(inner) => inner.into(),
            other => CliError::Validation(other.to_string()),
        }
    }
}

impl From<PolicyError> for CliError {
    fn from(e: PolicyError) -> Self {
        match e {
            PolicyError::Io { .. } => CliError::Io(e.to_string()),
            PolicyError::Json(_) | PolicyError::InvalidScope { .. } => {
                CliError::Config(format!("Scope policy: {e}"))
            }
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        CliError::Io(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Validation(format!("JSON error: {}", e))
    }
}
