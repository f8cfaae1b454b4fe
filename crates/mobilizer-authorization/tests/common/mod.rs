//! Common test utilities for mobilizer-authorization integration tests.
//!
//! Every test gets its own in-memory directory seeded with two movements:
//!
//! ```text
//! Green Wave
//!   Kano (state)
//!     Gwale (lga)
//!       Dorayi (ward)
//!         Dorayi PU 001 (polling unit)
//!       Goron Dutse (ward)
//!     Nassarawa (lga)
//! Unity Front
//!   Lagos (state)
//! ```

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{Duration, Utc};
use mobilizer_authorization::{
    InMemoryDirectoryStore, Membership, Movement, Organization, Role, ScopeResolver, User,
};
use mobilizer_core::{MovementId, OrgLevel, OrganizationId, RoleId, UserId};

/// Organizations of the Green Wave movement.
pub struct GreenWave {
    pub movement: Movement,
    pub kano: Organization,
    pub gwale: Organization,
    pub nassarawa: Organization,
    pub dorayi: Organization,
    pub goron_dutse: Organization,
    pub dorayi_pu: Organization,
}

/// Test context containing the store, resolver, and seeded data.
pub struct TestContext {
    pub store: Arc<InMemoryDirectoryStore>,
    pub resolver: ScopeResolver,
    pub green: GreenWave,
    pub unity: Movement,
    pub lagos: Organization,
}

impl TestContext {
    /// Create a new isolated context with both movements and their roles.
    pub async fn new() -> Self {
        let store = Arc::new(InMemoryDirectoryStore::new());

        let green_movement = movement("Green Wave");
        let unity = movement("Unity Front");
        store.add_movement(green_movement.clone()).await;
        store.add_movement(unity.clone()).await;

        let kano = org(&green_movement, "Kano", OrgLevel::State, None);
        let gwale = org(&green_movement, "Gwale", OrgLevel::Lga, Some(&kano));
        let nassarawa = org(&green_movement, "Nassarawa", OrgLevel::Lga, Some(&kano));
        let dorayi = org(&green_movement, "Dorayi", OrgLevel::Ward, Some(&gwale));
        let goron_dutse = org(&green_movement, "Goron Dutse", OrgLevel::Ward, Some(&gwale));
        let dorayi_pu = org(
            &green_movement,
            "Dorayi PU 001",
            OrgLevel::PollingUnit,
            Some(&dorayi),
        );
        let lagos = org(&unity, "Lagos", OrgLevel::State, None);

        for o in [
            &kano,
            &gwale,
            &nassarawa,
            &dorayi,
            &goron_dutse,
            &dorayi_pu,
            &lagos,
        ] {
            store
                .add_organization(o.clone())
                .await
                .expect("Failed to add organization");
        }

        for (m, name, level) in [
            (&green_movement, "National Chair", OrgLevel::Country),
            (&green_movement, "State Coordinator", OrgLevel::State),
            (&green_movement, "LGA Coordinator", OrgLevel::Lga),
            (&green_movement, "Ward Agent", OrgLevel::Ward),
            (&unity, "State Secretary", OrgLevel::State),
        ] {
            store
                .add_role(Role {
                    id: RoleId::new(),
                    movement_id: m.id,
                    name: name.to_string(),
                    level,
                })
                .await
                .expect("Failed to add role");
        }

        Self {
            resolver: ScopeResolver::new(store.clone()),
            store,
            green: GreenWave {
                movement: green_movement,
                kano,
                gwale,
                nassarawa,
                dorayi,
                goron_dutse,
                dorayi_pu,
            },
            unity,
            lagos,
        }
    }

    /// Add a user with no memberships.
    pub async fn user(&self, name: &str) -> UserId {
        self.add_user(name, false).await
    }

    /// Add a platform administrator with no memberships.
    pub async fn platform_admin(&self, name: &str) -> UserId {
        self.add_user(name, true).await
    }

    async fn add_user(&self, name: &str, is_platform_admin: bool) -> UserId {
        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            is_platform_admin,
        };
        self.store.add_user(user.clone()).await;
        user.id
    }

    /// Give `user` an active, approved membership.
    pub async fn join(&self, user: UserId, org: &Organization) {
        let joined = Utc::now() - Duration::days(7);
        let mut membership = Membership::pending(user, org.id, joined);
        membership
            .approve(joined + Duration::days(1))
            .expect("Failed to approve membership");
        self.store
            .add_membership(membership)
            .await
            .expect("Failed to add membership");
    }

    /// Give `user` a membership that was never approved.
    pub async fn request(&self, user: UserId, org: &Organization) {
        self.store
            .add_membership(Membership::pending(user, org.id, Utc::now()))
            .await
            .expect("Failed to add membership");
    }

    /// Give `user` an approved membership that has since been suspended.
    pub async fn join_suspended(&self, user: UserId, org: &Organization) {
        let mut membership = Membership::approved(user, org.id, Utc::now());
        membership.suspend();
        self.store
            .add_membership(membership)
            .await
            .expect("Failed to add membership");
    }
}

pub fn movement(name: &str) -> Movement {
    Movement {
        id: MovementId::new(),
        name: name.to_string(),
    }
}

pub fn org(
    movement: &Movement,
    name: &str,
    level: OrgLevel,
    parent: Option<&Organization>,
) -> Organization {
    Organization {
        id: OrganizationId::new(),
        movement_id: movement.id,
        name: name.to_string(),
        level,
        parent_id: parent.map(|p| p.id),
        location_id: None,
    }
}

/// Role names in resolution order.
pub fn role_names(roles: &mobilizer_authorization::MovementRoles) -> Vec<&str> {
    roles.roles.iter().map(|r| r.role_name.as_str()).collect()
}
