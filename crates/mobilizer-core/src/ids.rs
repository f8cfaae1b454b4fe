//! Strongly Typed Identifiers
//!
//! Newtype wrappers around UUIDs for every entity the membership model
//! references. Passing an `OrganizationId` where a `MovementId` is expected
//! does not compile.
//!
//! # Example
//!
//! ```
//! use mobilizer_core::{MovementId, UserId};
//!
//! let movement = MovementId::new();
//! let user = UserId::new();
//!
//! fn requires_movement(id: MovementId) -> String {
//!     id.to_string()
//! }
//!
//! let result = requires_movement(movement);
//! // requires_movement(user); // This would not compile!
//! ```

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Error type for ID parsing failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseIdError {
    /// The type of ID that failed to parse
    pub id_type: &'static str,
    /// The underlying UUID parse error message
    pub message: String,
}

impl Display for ParseIdError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to parse {}: {}", self.id_type, self.message)
    }
}

impl std::error::Error for ParseIdError {}

/// Macro to define a strongly-typed ID type
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random ID using UUID v4.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns a reference to the underlying UUID.
            #[must_use]
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl FromStr for $name {
            type Err = ParseIdError;

            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                Uuid::parse_str(s)
                    .map(Self)
                    .map_err(|e| ParseIdError {
                        id_type: stringify!($name),
                        message: e.to_string(),
                    })
            }
        }
    };
}

define_id!(
    /// Identifier of a platform user.
    ///
    /// ```
    /// use mobilizer_core::UserId;
    ///
    /// let user_id: UserId = "123e4567-e89b-12d3-a456-426614174000".parse().unwrap();
    /// assert_eq!(user_id.to_string(), "123e4567-e89b-12d3-a456-426614174000");
    /// ```
    UserId
);

define_id!(
    /// Identifier of a movement, the top-level organizing entity.
    MovementId
);

define_id!(
    /// Identifier of an organization (a chapter at some `OrgLevel`).
    OrganizationId
);

define_id!(
    /// Identifier of a role declared within a movement.
    RoleId
);

define_id!(
    /// Identifier of a location node (country through polling unit).
    LocationId
);
