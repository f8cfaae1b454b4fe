//! Membership scoping for Mobilizer.
//!
//! - [`models`] - Users, movements, organizations, roles and memberships
//! - [`store`] - Read-only [`store::DirectoryStore`] seam and an in-memory backend
//! - [`org_graph`] - A movement's organization tree, walked in memory
//! - [`resolver`] - [`resolver::ScopeResolver`]: roles and support groups per user
//! - [`policy`] / [`guard`] - Declared scope requirements and the guard checking them
//! - [`handler`] - The guarded `getUserRoles` operation
//!
//! # Example
//!
//! ```
//! use mobilizer_authorization::{CallerContext, ScopeGuard, ScopePolicy};
//! use mobilizer_core::UserId;
//!
//! let guard = ScopeGuard::new(ScopePolicy::default_policy());
//! let caller = CallerContext::new(UserId::new()).with_scopes(["users:roles:read"]);
//! assert!(guard.check("users", "getUserRoles", Some(&caller)).is_allowed());
//! assert!(!guard.check("users", "getUserRoles", None).is_allowed());
//! ```

pub mod caller;
pub mod guard;
pub mod handler;
pub mod models;
pub mod org_graph;
pub mod policy;
pub mod resolver;
pub mod store;

pub use caller::CallerContext;
pub use guard::{DenyReason, GuardDecision, ScopeGuard};
pub use handler::UserRolesHandler;
pub use models::{Membership, Movement, Organization, Role, User};
pub use org_graph::OrgHierarchy;
pub use policy::{
    validate_scope, ModuleScopes, PolicyError, ScopePolicy, GET_USER_ROLES, USERS_MODULE,
    USER_ROLES_READ_SCOPE,
};
pub use resolver::{MovementRoles, ResolvedRole, ScopeResolver, SupportGroup};
pub use store::{DirectorySnapshot, DirectoryStore, InMemoryDirectoryStore};
