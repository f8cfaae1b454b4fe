//! Mobilizer Core Library
//!
//! Shared types for the membership scoping model.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (UserId, MovementId, OrganizationId, ...)
//! - [`level`] - The country → polling unit hierarchy shared by locations and organizations
//! - [`traits`] - Movement-scoped entities (MovementScoped)
//! - [`error`] - Standardized error type (MobilizerError)
//!
//! # Example
//!
//! ```
//! use mobilizer_core::{HierarchyLevel, MobilizerError, MovementId, Result};
//!
//! let movement = MovementId::new();
//! assert!(HierarchyLevel::State.is_at_or_above(HierarchyLevel::Ward));
//!
//! fn example(movement: MovementId) -> Result<()> {
//!     Err(MobilizerError::not_found("Movement", movement))
//! }
//! assert!(example(movement).is_err());
//! ```

pub mod error;
pub mod ids;
pub mod level;
pub mod traits;

pub use error::{MobilizerError, Result};
pub use ids::{LocationId, MovementId, OrganizationId, ParseIdError, RoleId, UserId};
pub use level::{HierarchyLevel, LocationLevel, OrgLevel, ParseLevelError};
pub use traits::MovementScoped;
