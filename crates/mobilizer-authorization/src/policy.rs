//! Declared scope requirements per operation.
//!
//! A [`ScopePolicy`] maps modules and their handlers to the scopes a caller
//! must hold. It is loaded once at startup from JSON:
//!
//! ```json
//! {
//!   "modules": {
//!     "users": {
//!       "required": ["users:read"],
//!       "handlers": { "getUserRoles": ["users:roles:read"] }
//!     }
//!   }
//! }
//! ```
//!
//! A handler entry replaces its module's set rather than adding to it.
//! Operations with no entry at all require nothing.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Module name of the user operations.
pub const USERS_MODULE: &str = "users";

/// Handler name of the role lookup.
pub const GET_USER_ROLES: &str = "getUserRoles";

/// Scope required by [`GET_USER_ROLES`] under [`ScopePolicy::default_policy`].
pub const USER_ROLES_READ_SCOPE: &str = "users:roles:read";

/// Errors raised while loading a policy.
#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("failed to read policy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid policy JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid scope in {location}: {message}")]
    InvalidScope { location: String, message: String },
}

/// Scope requirements of one module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleScopes {
    /// Applies to every handler without its own entry.
    #[serde(default)]
    pub required: BTreeSet<String>,
    /// Per-handler overrides.
    #[serde(default)]
    pub handlers: BTreeMap<String, BTreeSet<String>>,
}

/// Scope requirements of every module.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopePolicy {
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleScopes>,
}

impl ScopePolicy {
    /// The policy used when none is configured.
    #[must_use]
    pub fn default_policy() -> Self {
        Self::default().with_handler(USERS_MODULE, GET_USER_ROLES, [USER_ROLES_READ_SCOPE])
    }

    /// Parse and validate a policy.
    pub fn from_json_str(json: &str) -> Result<Self, PolicyError> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Read, parse and validate a policy file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PolicyError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Set the module-level requirement.
    #[must_use]
    pub fn with_module<I, S>(mut self, module: &str, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules.entry(module.to_string()).or_default().required =
            scopes.into_iter().map(Into::into).collect();
        self
    }

    /// Set a handler-level requirement.
    #[must_use]
    pub fn with_handler<I, S>(mut self, module: &str, handler: &str, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.modules
            .entry(module.to_string())
            .or_default()
            .handlers
            .insert(handler.to_string(), scopes.into_iter().map(Into::into).collect());
        self
    }

    /// Scopes required to call `handler` of `module`.
    ///
    /// Handler-level beats module-level. An empty set means nothing is
    /// required.
    #[must_use]
    pub fn required_scopes(&self, module: &str, handler: &str) -> BTreeSet<String> {
        let Some(scopes) = self.modules.get(module) else {
            return BTreeSet::new();
        };
        scopes
            .handlers
            .get(handler)
            .unwrap_or(&scopes.required)
            .clone()
    }

    /// Check every declared scope string.
    pub fn validate(&self) -> Result<(), PolicyError> {
        for (module, scopes) in &self.modules {
            for scope in &scopes.required {
                if let Some(message) = validate_scope(scope) {
                    return Err(PolicyError::InvalidScope {
                        location: module.clone(),
                        message,
                    });
                }
            }
            for (handler, handler_scopes) in &scopes.handlers {
                for scope in handler_scopes {
                    if let Some(message) = validate_scope(scope) {
                        return Err(PolicyError::InvalidScope {
                            location: format!("{module}.{handler}"),
                            message,
                        });
                    }
                }
            }
        }
        Ok(())
    }
}

/// Validate a single scope string.
/// Returns None if valid, or Some(error_message) if invalid.
#[must_use]
pub fn validate_scope(scope: &str) -> Option<String> {
    if scope.is_empty() {
        return Some("Scope cannot be empty string".to_string());
    }

    if let Some(c) = scope
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, ':' | '.' | '_' | '-')))
    {
        return Some(format!("Invalid character {c:?} in scope '{scope}'"));
    }

    if scope.split(':').any(str::is_empty) {
        return Some(format!(
            "Invalid scope format: '{scope}'. Segments between ':' cannot be empty"
        ));
    }

    None
}
