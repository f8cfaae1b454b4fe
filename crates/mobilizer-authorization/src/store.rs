//! Read access to the membership directory.
//!
//! Scope resolution only ever reads. Writes (joining, approval, role grants)
//! belong to other services; the in-memory store exposes seeding helpers for
//! tests and the CLI.

use std::collections::HashMap;
use std::sync::Arc;

use mobilizer_core::{
    MobilizerError, MovementId, MovementScoped, OrganizationId, Result, RoleId, UserId,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::models::{Membership, Movement, Organization, Role, User};
use crate::org_graph::OrgHierarchy;

/// Trait for directory storage backends.
#[async_trait::async_trait]
pub trait DirectoryStore: Send + Sync {
    async fn get_user(&self, id: UserId) -> Result<Option<User>>;

    async fn get_movement(&self, id: MovementId) -> Result<Option<Movement>>;

    async fn get_organization(&self, id: OrganizationId) -> Result<Option<Organization>>;

    /// Every membership of a user, in any state.
    async fn list_user_memberships(&self, user_id: UserId) -> Result<Vec<Membership>>;

    async fn list_organizations(&self, movement_id: MovementId) -> Result<Vec<Organization>>;

    async fn list_roles(&self, movement_id: MovementId) -> Result<Vec<Role>>;
}

/// Serializable dump of a directory, used to load fixtures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DirectorySnapshot {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub movements: Vec<Movement>,
    #[serde(default)]
    pub organizations: Vec<Organization>,
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub memberships: Vec<Membership>,
}

#[derive(Debug, Default)]
struct Directory {
    users: HashMap<UserId, User>,
    movements: HashMap<MovementId, Movement>,
    organizations: HashMap<OrganizationId, Organization>,
    roles: HashMap<RoleId, Role>,
    memberships: Vec<Membership>,
}

impl Directory {
    fn insert_organization(&mut self, org: Organization) -> Result<()> {
        if !self.movements.contains_key(&org.movement_id) {
            return Err(MobilizerError::validation(
                "movement_id",
                format!("unknown movement {}", org.movement_id),
            ));
        }
        self.organizations.insert(org.id, org);
        Ok(())
    }

    /// Parents are added before their children. The parent must exist in the
    /// same movement and sit strictly above; any children already stored must
    /// still sit strictly below.
    fn add_organization(&mut self, org: Organization) -> Result<()> {
        if let Some(parent_id) = org.parent_id {
            let parent = self
                .organizations
                .get(&parent_id)
                .filter(|p| p.belongs_to(org.movement_id))
                .ok_or_else(|| {
                    MobilizerError::validation(
                        "parent_id",
                        format!(
                            "organization {} has a parent outside movement {}",
                            org.id, org.movement_id
                        ),
                    )
                })?;
            if parent.level >= org.level {
                return Err(MobilizerError::validation(
                    "parent_id",
                    format!(
                        "{} organization {} cannot nest under {} organization {}",
                        org.level, org.id, parent.level, parent.id
                    ),
                ));
            }
        }
        let stranded = self.organizations.values().find(|child| {
            child.parent_id == Some(org.id)
                && (!child.belongs_to(org.movement_id) || child.level <= org.level)
        });
        if let Some(child) = stranded {
            return Err(MobilizerError::validation(
                "level",
                format!(
                    "organization {} would no longer sit above its child {}",
                    org.id, child.id
                ),
            ));
        }
        self.insert_organization(org)
    }

    /// Index every movement's organizations, rejecting parents that are
    /// missing, foreign or not strictly above their children.
    fn check_hierarchies(&self) -> Result<()> {
        let mut by_movement: HashMap<MovementId, Vec<Organization>> = HashMap::new();
        for org in self.organizations.values() {
            by_movement
                .entry(org.movement_id)
                .or_default()
                .push(org.clone());
        }
        for (movement_id, organizations) in by_movement {
            OrgHierarchy::build(movement_id, organizations)?;
        }
        Ok(())
    }

    fn add_role(&mut self, role: Role) -> Result<()> {
        if !self.movements.contains_key(&role.movement_id) {
            return Err(MobilizerError::validation(
                "movement_id",
                format!("unknown movement {}", role.movement_id),
            ));
        }
        self.roles.insert(role.id, role);
        Ok(())
    }

    fn add_membership(&mut self, membership: Membership) -> Result<()> {
        membership.validate()?;
        if !self.users.contains_key(&membership.user_id) {
            return Err(MobilizerError::validation(
                "user_id",
                format!("unknown user {}", membership.user_id),
            ));
        }
        if !self.organizations.contains_key(&membership.organization_id) {
            return Err(MobilizerError::validation(
                "organization_id",
                format!("unknown organization {}", membership.organization_id),
            ));
        }
        let already_active = self.memberships.iter().any(|m| {
            m.is_active
                && m.user_id == membership.user_id
                && m.organization_id == membership.organization_id
        });
        if membership.is_active && already_active {
            return Err(MobilizerError::validation(
                "organization_id",
                "user already holds an active membership in this organization",
            ));
        }
        self.memberships.push(membership);
        Ok(())
    }
}

/// In-memory directory store for tests and fixtures.
#[derive(Debug, Default, Clone)]
pub struct InMemoryDirectoryStore {
    inner: Arc<RwLock<Directory>>,
}

impl InMemoryDirectoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a snapshot, applying the same checks as the
    /// `add_*` helpers. Users and movements load first so the rest can
    /// reference them. Organizations may appear in any order; their nesting
    /// is checked once all of them are in.
    pub fn from_snapshot(snapshot: DirectorySnapshot) -> Result<Self> {
        let mut directory = Directory::default();
        for user in snapshot.users {
            directory.users.insert(user.id, user);
        }
        for movement in snapshot.movements {
            directory.movements.insert(movement.id, movement);
        }
        for org in snapshot.organizations {
            directory.insert_organization(org)?;
        }
        directory.check_hierarchies()?;
        for role in snapshot.roles {
            directory.add_role(role)?;
        }
        for membership in snapshot.memberships {
            directory.add_membership(membership)?;
        }
        Ok(Self {
            inner: Arc::new(RwLock::new(directory)),
        })
    }

    pub async fn add_user(&self, user: User) {
        self.inner.write().await.users.insert(user.id, user);
    }

    pub async fn add_movement(&self, movement: Movement) {
        self.inner
            .write()
            .await
            .movements
            .insert(movement.id, movement);
    }

    /// Record an organization. Its parent must already be stored.
    pub async fn add_organization(&self, org: Organization) -> Result<()> {
        self.inner.write().await.add_organization(org)
    }

    pub async fn add_role(&self, role: Role) -> Result<()> {
        self.inner.write().await.add_role(role)
    }

    /// Record a membership. Rejects invalid memberships and a second active
    /// membership for the same user and organization.
    pub async fn add_membership(&self, membership: Membership) -> Result<()> {
        self.inner.write().await.add_membership(membership)
    }
}

#[async_trait::async_trait]
impl DirectoryStore for InMemoryDirectoryStore {
    async fn get_user(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn get_movement(&self, id: MovementId) -> Result<Option<Movement>> {
        Ok(self.inner.read().await.movements.get(&id).cloned())
    }

    async fn get_organization(&self, id: OrganizationId) -> Result<Option<Organization>> {
        Ok(self.inner.read().await.organizations.get(&id).cloned())
    }

    async fn list_user_memberships(&self, user_id: UserId) -> Result<Vec<Membership>> {
        Ok(self
            .inner
            .read()
            .await
            .memberships
            .iter()
            .filter(|m| m.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_organizations(&self, movement_id: MovementId) -> Result<Vec<Organization>> {
        Ok(self
            .inner
            .read()
            .await
            .organizations
            .values()
            .filter(|o| o.belongs_to(movement_id))
            .cloned()
            .collect())
    }

    async fn list_roles(&self, movement_id: MovementId) -> Result<Vec<Role>> {
        Ok(self
            .inner
            .read()
            .await
            .roles
            .values()
            .filter(|r| r.belongs_to(movement_id))
            .cloned()
            .collect())
    }
}
