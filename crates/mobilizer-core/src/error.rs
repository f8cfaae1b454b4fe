//! Error Types
//!
//! Typed failures shared by every Mobilizer crate. The gateway maps each
//! variant to a user-facing code through [`MobilizerError::status_code`] and
//! [`MobilizerError::error_code`]; failures are never turned into empty
//! results along the way.
//!
//! # Example
//!
//! ```
//! use mobilizer_core::{MobilizerError, Result};
//!
//! fn find_user(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(MobilizerError::NotFound {
//!             resource: "User".to_string(),
//!             id: None,
//!         });
//!     }
//!     Ok(format!("User {}", id))
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for Mobilizer.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MobilizerError {
    /// No authenticated caller, or the caller could not be identified.
    ///
    /// Maps to HTTP 401 Unauthorized.
    #[error("Unauthorized{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Unauthorized {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// The caller is known but lacks visibility or scopes.
    ///
    /// Maps to HTTP 403 Forbidden.
    #[error("Forbidden{}", message.as_ref().map(|m| format!(": {m}")).unwrap_or_default())]
    Forbidden {
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },

    /// Requested resource was not found.
    ///
    /// Maps to HTTP 404 Not Found.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The type of resource that was not found (e.g., "User", "Movement")
        resource: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// Input validation failure.
    ///
    /// Maps to HTTP 400 Bad Request.
    #[error("Validation error on field '{field}': {message}")]
    ValidationError { field: String, message: String },

    /// The backing store failed.
    ///
    /// Maps to HTTP 500.
    #[error("Store error: {message}")]
    Store { message: String },
}

impl MobilizerError {
    /// Shorthand for a `NotFound` carrying the offending identifier.
    pub fn not_found(resource: &str, id: impl ToString) -> Self {
        Self::NotFound {
            resource: resource.to_string(),
            id: Some(id.to_string()),
        }
    }

    /// Shorthand for a `Forbidden` with a message.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: Some(message.into()),
        }
    }

    /// Shorthand for a `ValidationError`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// HTTP status code the gateway should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unauthorized { .. } => 401,
            Self::Forbidden { .. } => 403,
            Self::NotFound { .. } => 404,
            Self::ValidationError { .. } => 400,
            Self::Store { .. } => 500,
        }
    }

    /// Machine-readable error code.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized { .. } => "unauthorized",
            Self::Forbidden { .. } => "forbidden",
            Self::NotFound { .. } => "not_found",
            Self::ValidationError { .. } => "validation_error",
            Self::Store { .. } => "store_error",
        }
    }
}

/// Type alias for Results using `MobilizerError`.
pub type Result<T> = std::result::Result<T, MobilizerError>;
