//! Error types for location reference data.

use mobilizer_core::{HierarchyLevel, LocationId, MobilizerError};
use thiserror::Error;

/// A single violation of the location hierarchy invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// A country node carries a parent reference.
    #[error("country {0} must not have a parent")]
    CountryWithParent(LocationId),

    /// A non-country node has no parent reference.
    #[error("{level} {id} has no parent")]
    MissingParent { id: LocationId, level: HierarchyLevel },

    /// The referenced parent does not exist in the hierarchy.
    #[error("{id} references unknown parent {parent_id}")]
    UnknownParent {
        id: LocationId,
        parent_id: LocationId,
    },

    /// The parent does not sit exactly one level above the child.
    #[error("{level} {id} cannot have a {parent_level} parent")]
    LevelMismatch {
        id: LocationId,
        level: HierarchyLevel,
        parent_level: HierarchyLevel,
    },

    /// Following parents from this node revisits a node.
    #[error("parent chain of {0} contains a cycle")]
    Cycle(LocationId),
}

/// Errors raised while ingesting or seeding location data.
#[derive(Debug, Error)]
pub enum LocationError {
    /// The batch exceeds the configured row cap.
    #[error("Too many rows: {rows} exceeds the limit of {limit}")]
    TooManyRows { rows: usize, limit: usize },

    /// Required CSV headers are missing.
    #[error("Missing required headers: {0}")]
    MissingHeaders(String),

    /// The input could not be read as CSV at all.
    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    /// The input is empty.
    #[error("Input contains no records")]
    Empty,

    /// The built hierarchy violates its invariants.
    #[error("Location hierarchy is inconsistent ({} violation(s))", .0.len())]
    Hierarchy(Vec<HierarchyError>),

    /// The location store failed.
    #[error(transparent)]
    Core(#[from] MobilizerError),
}

impl From<LocationError> for MobilizerError {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::Core(inner) => inner,
            LocationError::TooManyRows { rows, limit } => MobilizerError::validation(
                "rows",
                format!("{rows} rows exceeds the limit of {limit}"),
            ),
            LocationError::MissingHeaders(headers) => {
                MobilizerError::validation("headers", format!("missing {headers}"))
            }
            LocationError::InvalidCsv(msg) => MobilizerError::validation("file", msg),
            LocationError::Empty => MobilizerError::validation("file", "no records"),
            other @ LocationError::Hierarchy(_) => {
                MobilizerError::validation("hierarchy", other.to_string())
            }
        }
    }
}

/// Convenience Result type for location operations.
pub type Result<T> = std::result::Result<T, LocationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hierarchy_error_display() {
        let id = LocationId::new();
        let err = HierarchyError::LevelMismatch {
            id,
            level: HierarchyLevel::Ward,
            parent_level: HierarchyLevel::State,
        };
        assert_eq!(err.to_string(), format!("ward {id} cannot have a state parent"));
    }

    #[test]
    fn test_hierarchy_violation_count_in_message() {
        let err = LocationError::Hierarchy(vec![
            HierarchyError::Cycle(LocationId::new()),
            HierarchyError::CountryWithParent(LocationId::new()),
        ]);
        assert!(err.to_string().contains("2 violation(s)"));
    }

    #[test]
    fn test_too_many_rows_maps_to_validation_error() {
        let err: MobilizerError = LocationError::TooManyRows { rows: 11, limit: 10 }.into();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("11 rows exceeds the limit of 10"));
    }

    #[test]
    fn test_core_error_passes_through() {
        let inner = MobilizerError::Store {
            message: "down".to_string(),
        };
        let err: MobilizerError = LocationError::Core(inner.clone()).into();
        assert_eq!(err, inner);
    }
}
