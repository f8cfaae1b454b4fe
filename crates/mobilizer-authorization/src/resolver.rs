//! Scope resolver for membership roles.
//!
//! Resolves, for one user, the roles they hold in each movement and the
//! support groups reachable under each role:
//! 1. Effective memberships (active and approved) are grouped by movement
//! 2. A role at level L is held when some membership sits at or above L
//! 3. Support groups are the organizations at or below L beneath those
//!    memberships, deduplicated by organization id
//!
//! Every call reads fresh from the [`DirectoryStore`]; nothing is cached and
//! nothing is written.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use mobilizer_core::{MobilizerError, MovementId, OrganizationId, Result, RoleId, UserId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::models::{Membership, Movement, Organization, Role};
use crate::org_graph::OrgHierarchy;
use crate::store::DirectoryStore;

/// An organization reachable under a role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportGroup {
    pub id: OrganizationId,
    pub name: String,
}

/// A role held by the user, with its support groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedRole {
    pub role_id: RoleId,
    pub role_name: String,
    pub support_groups: Vec<SupportGroup>,
}

/// All roles held by the user within one movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementRoles {
    pub movement_id: MovementId,
    pub movement_name: String,
    pub roles: Vec<ResolvedRole>,
}

/// Resolves visible roles and support groups for users.
pub struct ScopeResolver {
    store: Arc<dyn DirectoryStore>,
}

impl ScopeResolver {
    /// Create a new resolver.
    pub fn new(store: Arc<dyn DirectoryStore>) -> Self {
        Self { store }
    }

    /// Resolve the roles of `user_id`, optionally restricted to one movement.
    ///
    /// Movements come back ordered by name, roles by level then name.
    ///
    /// # Errors
    ///
    /// - `NotFound` when the user, or the requested movement, does not exist
    /// - `Forbidden` when a movement is requested that the user has no
    ///   membership in and the user is not a platform administrator
    ///
    /// A user without effective memberships gets an empty list.
    #[instrument(skip(self))]
    pub async fn get_user_roles(
        &self,
        user_id: UserId,
        movement_id: Option<MovementId>,
    ) -> Result<Vec<MovementRoles>> {
        tracing::debug!(
            target: "authorization",
            user_id = %user_id,
            movement_id = ?movement_id,
            "Resolving user roles"
        );

        let result = self.resolve(user_id, movement_id).await;
        if let Err(e) = &result {
            tracing::warn!(
                target: "authorization",
                user_id = %user_id,
                movement_id = ?movement_id,
                error = %e,
                "Role resolution failed"
            );
        }
        result
    }

    async fn resolve(
        &self,
        user_id: UserId,
        movement_id: Option<MovementId>,
    ) -> Result<Vec<MovementRoles>> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or_else(|| MobilizerError::not_found("User", user_id))?;

        if let Some(id) = movement_id {
            if self.store.get_movement(id).await?.is_none() {
                return Err(MobilizerError::not_found("Movement", id));
            }
        }

        // Pair each membership with its organization.
        let mut memberships: Vec<(Membership, Organization)> = Vec::new();
        for membership in self.store.list_user_memberships(user_id).await? {
            match self.store.get_organization(membership.organization_id).await? {
                Some(org) => memberships.push((membership, org)),
                None => tracing::warn!(
                    target: "authorization",
                    organization_id = %membership.organization_id,
                    "Membership references a missing organization"
                ),
            }
        }

        if let Some(id) = movement_id {
            let is_member = memberships.iter().any(|(_, org)| org.movement_id == id);
            if !is_member {
                if !user.is_platform_admin {
                    return Err(MobilizerError::forbidden(format!(
                        "user has no membership in movement {id}"
                    )));
                }
                tracing::debug!(
                    target: "authorization",
                    user_id = %user_id,
                    movement_id = %id,
                    "Platform admin outside movement, nothing to resolve"
                );
                return Ok(Vec::new());
            }
        }

        let mut by_movement: BTreeMap<MovementId, Vec<Organization>> = BTreeMap::new();
        for (membership, org) in memberships {
            if !membership.is_effective() {
                continue;
            }
            if movement_id.is_some_and(|id| id != org.movement_id) {
                continue;
            }
            by_movement.entry(org.movement_id).or_default().push(org);
        }

        let mut movements: Vec<(Movement, Vec<Organization>)> = Vec::new();
        for (id, orgs) in by_movement {
            match self.store.get_movement(id).await? {
                Some(movement) => movements.push((movement, orgs)),
                None => tracing::warn!(
                    target: "authorization",
                    movement_id = %id,
                    "Organization references a missing movement"
                ),
            }
        }
        movements.sort_by(|(a, _), (b, _)| (&a.name, a.id).cmp(&(&b.name, b.id)));

        let mut resolved = Vec::new();
        for (movement, member_orgs) in movements {
            let hierarchy =
                OrgHierarchy::build(movement.id, self.store.list_organizations(movement.id).await?)?;
            let roles = self.store.list_roles(movement.id).await?;
            let roles = resolve_roles(&hierarchy, member_orgs, roles);
            if roles.is_empty() {
                continue;
            }
            resolved.push(MovementRoles {
                movement_id: movement.id,
                movement_name: movement.name,
                roles,
            });
        }

        tracing::debug!(
            target: "authorization",
            user_id = %user_id,
            movements = resolved.len(),
            "User roles resolved"
        );
        Ok(resolved)
    }
}

/// Match a movement's roles against the user's membership organizations.
fn resolve_roles(
    hierarchy: &OrgHierarchy,
    mut member_orgs: Vec<Organization>,
    mut roles: Vec<Role>,
) -> Vec<ResolvedRole> {
    member_orgs.sort_by(|a, b| (a.level, &a.name, a.id).cmp(&(b.level, &b.name, b.id)));
    member_orgs.dedup_by_key(|o| o.id);
    roles.sort_by(|a, b| (a.level, &a.name, a.id).cmp(&(b.level, &b.name, b.id)));

    let mut resolved = Vec::new();
    for role in roles {
        let holders: Vec<&Organization> = member_orgs
            .iter()
            .filter(|o| o.level.is_at_or_above(role.level))
            .collect();
        if holders.is_empty() {
            continue;
        }

        let mut seen = HashSet::new();
        let mut support_groups = Vec::new();
        for holder in holders {
            for org in hierarchy.descendants_inclusive(holder.id) {
                if org.level.is_at_or_below(role.level) && seen.insert(org.id) {
                    support_groups.push(SupportGroup {
                        id: org.id,
                        name: org.name.clone(),
                    });
                }
            }
        }

        resolved.push(ResolvedRole {
            role_id: role.id,
            role_name: role.name,
            support_groups,
        });
    }
    resolved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::store::InMemoryDirectoryStore;
    use chrono::Utc;
    use mobilizer_core::OrgLevel;

    struct Fixture {
        store: InMemoryDirectoryStore,
        movement: Movement,
        user: User,
    }

    impl Fixture {
        async fn new() -> Self {
            let store = InMemoryDirectoryStore::new();
            let movement = Movement {
                id: MovementId::new(),
                name: "Green Wave".to_string(),
            };
            let user = User {
                id: UserId::new(),
                name: "Amina".to_string(),
                is_platform_admin: false,
            };
            store.add_movement(movement.clone()).await;
            store.add_user(user.clone()).await;
            Self {
                store,
                movement,
                user,
            }
        }

        async fn org(&self, name: &str, level: OrgLevel, parent: Option<&Organization>) -> Organization {
            let org = Organization {
                id: OrganizationId::new(),
                movement_id: self.movement.id,
                name: name.to_string(),
                level,
                parent_id: parent.map(|p| p.id),
                location_id: None,
            };
            self.store.add_organization(org.clone()).await.unwrap();
            org
        }

        async fn role(&self, name: &str, level: OrgLevel) -> Role {
            let role = Role {
                id: RoleId::new(),
                movement_id: self.movement.id,
                name: name.to_string(),
                level,
            };
            self.store.add_role(role.clone()).await.unwrap();
            role
        }

        async fn join(&self, org: &Organization) {
            self.store
                .add_membership(Membership::approved(self.user.id, org.id, Utc::now()))
                .await
                .unwrap();
        }

        fn resolver(&self) -> ScopeResolver {
            ScopeResolver::new(Arc::new(self.store.clone()))
        }
    }

    #[tokio::test]
    async fn test_role_held_at_or_above_level() {
        let fx = Fixture::new().await;
        let state = fx.org("Kano", OrgLevel::State, None).await;
        let lga = fx.org("Gwale", OrgLevel::Lga, Some(&state)).await;
        fx.role("State Coordinator", OrgLevel::State).await;
        fx.role("LGA Coordinator", OrgLevel::Lga).await;
        fx.role("National Chair", OrgLevel::Country).await;
        fx.join(&lga).await;

        let result = fx.resolver().get_user_roles(fx.user.id, None).await.unwrap();
        assert_eq!(result.len(), 1);
        let names: Vec<&str> = result[0].roles.iter().map(|r| r.role_name.as_str()).collect();
        assert_eq!(names, vec!["LGA Coordinator"]);
    }

    #[tokio::test]
    async fn test_support_groups_at_or_below_role_level() {
        let fx = Fixture::new().await;
        let state = fx.org("Kano", OrgLevel::State, None).await;
        let lga = fx.org("Gwale", OrgLevel::Lga, Some(&state)).await;
        let ward = fx.org("Dorayi", OrgLevel::Ward, Some(&lga)).await;
        fx.role("LGA Coordinator", OrgLevel::Lga).await;
        fx.join(&state).await;

        let result = fx.resolver().get_user_roles(fx.user.id, None).await.unwrap();
        let groups: Vec<OrganizationId> = result[0].roles[0]
            .support_groups
            .iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(groups, vec![lga.id, ward.id]);
    }

    #[tokio::test]
    async fn test_pending_membership_grants_nothing() {
        let fx = Fixture::new().await;
        let state = fx.org("Kano", OrgLevel::State, None).await;
        fx.role("State Coordinator", OrgLevel::State).await;
        fx.store
            .add_membership(Membership::pending(fx.user.id, state.id, Utc::now()))
            .await
            .unwrap();

        let resolver = fx.resolver();
        assert!(resolver.get_user_roles(fx.user.id, None).await.unwrap().is_empty());
        // A pending membership still counts as membership for visibility.
        assert!(resolver
            .get_user_roles(fx.user.id, Some(fx.movement.id))
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_unknown_movement_is_not_found() {
        let fx = Fixture::new().await;
        let err = fx
            .resolver()
            .get_user_roles(fx.user.id, Some(MovementId::new()))
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "not_found");
    }

    #[test]
    fn test_resolve_roles_orders_by_level_then_name() {
        let movement_id = MovementId::new();
        let state = Organization {
            id: OrganizationId::new(),
            movement_id,
            name: "Kano".to_string(),
            level: OrgLevel::State,
            parent_id: None,
            location_id: None,
        };
        let hierarchy = OrgHierarchy::build(movement_id, vec![state.clone()]).unwrap();
        let role = |name: &str, level| Role {
            id: RoleId::new(),
            movement_id,
            name: name.to_string(),
            level,
        };
        let roles = vec![
            role("Ward Agent", OrgLevel::Ward),
            role("Treasurer", OrgLevel::State),
            role("Secretary", OrgLevel::State),
        ];

        let resolved = resolve_roles(&hierarchy, vec![state], roles);
        let names: Vec<&str> = resolved.iter().map(|r| r.role_name.as_str()).collect();
        assert_eq!(names, vec!["Secretary", "Treasurer", "Ward Agent"]);
        // The state chapter sits above ward level, so it is not a ward support group.
        assert!(resolved[2].support_groups.is_empty());
    }
}
