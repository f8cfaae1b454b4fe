//! Membership domain models.

use chrono::{DateTime, Utc};
use mobilizer_core::{
    LocationId, MobilizerError, MovementId, MovementScoped, OrgLevel, OrganizationId, Result,
    RoleId, UserId,
};
use serde::{Deserialize, Serialize};

/// A platform user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    /// Platform administrators may look into movements they do not belong to.
    #[serde(default)]
    pub is_platform_admin: bool,
}

/// A top-level political or organizing entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    pub id: MovementId,
    pub name: String,
}

/// A chapter of a movement at some level of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: OrganizationId,
    pub movement_id: MovementId,
    pub name: String,
    pub level: OrgLevel,
    /// `None` for the movement's top chapter(s).
    #[serde(default)]
    pub parent_id: Option<OrganizationId>,
    /// The location this chapter covers, when known.
    #[serde(default)]
    pub location_id: Option<LocationId>,
}

impl MovementScoped for Organization {
    fn movement_id(&self) -> MovementId {
        self.movement_id
    }
}

/// A role declared at one level of a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    pub id: RoleId,
    pub movement_id: MovementId,
    pub name: String,
    pub level: OrgLevel,
}

impl MovementScoped for Role {
    fn movement_id(&self) -> MovementId {
        self.movement_id
    }
}

/// Links a user to an organization.
///
/// Invariant: `is_admin` implies `is_active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub organization_id: OrganizationId,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_active: bool,
    pub joined_at: DateTime<Utc>,
    #[serde(default)]
    pub approved_at: Option<DateTime<Utc>>,
}

impl Membership {
    /// A freshly requested membership awaiting approval.
    #[must_use]
    pub fn pending(user_id: UserId, organization_id: OrganizationId, joined_at: DateTime<Utc>) -> Self {
        Self {
            user_id,
            organization_id,
            is_admin: false,
            is_active: false,
            joined_at,
            approved_at: None,
        }
    }

    /// An approved, active membership.
    #[must_use]
    pub fn approved(
        user_id: UserId,
        organization_id: OrganizationId,
        joined_at: DateTime<Utc>,
    ) -> Self {
        Self {
            is_active: true,
            approved_at: Some(joined_at),
            ..Self::pending(user_id, organization_id, joined_at)
        }
    }

    /// Check the membership invariants.
    pub fn validate(&self) -> Result<()> {
        if self.is_admin && !self.is_active {
            return Err(MobilizerError::validation(
                "is_admin",
                "an admin membership must be active",
            ));
        }
        if let Some(approved_at) = self.approved_at {
            if approved_at < self.joined_at {
                return Err(MobilizerError::validation(
                    "approved_at",
                    "approval cannot precede joining",
                ));
            }
        }
        Ok(())
    }

    /// Active and approved; only these count for scope resolution.
    #[must_use]
    pub fn is_effective(&self) -> bool {
        self.is_active && self.approved_at.is_some()
    }

    /// Approve and activate.
    pub fn approve(&mut self, at: DateTime<Utc>) -> Result<()> {
        if at < self.joined_at {
            return Err(MobilizerError::validation(
                "approved_at",
                "approval cannot precede joining",
            ));
        }
        self.approved_at = Some(at);
        self.is_active = true;
        Ok(())
    }

    /// Deactivate. Admin rights go with it.
    pub fn suspend(&mut self) {
        self.is_active = false;
        self.is_admin = false;
    }

    /// Grant admin rights on an effective membership.
    pub fn promote(&mut self) -> Result<()> {
        if !self.is_effective() {
            return Err(MobilizerError::validation(
                "is_admin",
                "only an active, approved membership can be promoted",
            ));
        }
        self.is_admin = true;
        Ok(())
    }
}
