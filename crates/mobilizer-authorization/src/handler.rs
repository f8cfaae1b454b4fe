//! The `getUserRoles` operation as the gateway invokes it.

use std::sync::Arc;

use mobilizer_core::{MobilizerError, MovementId, Result};
use tracing::instrument;

use crate::caller::CallerContext;
use crate::guard::ScopeGuard;
use crate::policy::{GET_USER_ROLES, USERS_MODULE};
use crate::resolver::{MovementRoles, ScopeResolver};
use crate::store::DirectoryStore;

/// Guarded entry point for role lookups of the calling user.
pub struct UserRolesHandler {
    guard: ScopeGuard,
    resolver: ScopeResolver,
}

impl UserRolesHandler {
    pub fn new(guard: ScopeGuard, store: Arc<dyn DirectoryStore>) -> Self {
        Self {
            guard,
            resolver: ScopeResolver::new(store),
        }
    }

    /// Check the caller's scopes, then resolve the caller's own roles.
    #[instrument(skip(self, caller), fields(user_id = ?caller.map(|c| c.user_id)))]
    pub async fn get_user_roles(
        &self,
        caller: Option<&CallerContext>,
        movement_id: Option<MovementId>,
    ) -> Result<Vec<MovementRoles>> {
        self.guard.ensure(USERS_MODULE, GET_USER_ROLES, caller)?;

        // An undeclared operation lets anonymous callers through the guard,
        // but there is still nobody to resolve roles for.
        let caller = caller.ok_or(MobilizerError::Unauthorized { message: None })?;
        self.resolver.get_user_roles(caller.user_id, movement_id).await
    }
}
