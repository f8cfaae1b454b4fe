//! Scope guard: a pure predicate over declared and held scopes.

use std::collections::BTreeSet;

use mobilizer_core::{MobilizerError, Result};
use serde::Serialize;

use crate::caller::CallerContext;
use crate::policy::ScopePolicy;

/// Why the guard refused a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
    /// Scopes are required and no caller is authenticated.
    Unauthenticated,
    /// The caller lacks these scopes.
    MissingScopes { missing: BTreeSet<String> },
}

/// Outcome of a guard check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum GuardDecision {
    Allow,
    Deny(DenyReason),
}

impl GuardDecision {
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Gates operations on the scopes declared in a [`ScopePolicy`].
#[derive(Debug, Clone, Default)]
pub struct ScopeGuard {
    policy: ScopePolicy,
}

impl ScopeGuard {
    #[must_use]
    pub fn new(policy: ScopePolicy) -> Self {
        Self { policy }
    }

    #[must_use]
    pub fn policy(&self) -> &ScopePolicy {
        &self.policy
    }

    /// Decide whether `caller` may invoke `handler` of `module`.
    ///
    /// Allows when nothing is required, or when the caller holds every
    /// required scope. Without a caller, any requirement denies.
    #[must_use]
    pub fn check(
        &self,
        module: &str,
        handler: &str,
        caller: Option<&CallerContext>,
    ) -> GuardDecision {
        let required = self.policy.required_scopes(module, handler);
        if required.is_empty() {
            return GuardDecision::Allow;
        }

        let Some(caller) = caller else {
            return GuardDecision::Deny(DenyReason::Unauthenticated);
        };

        let missing: BTreeSet<String> = required.difference(&caller.scopes).cloned().collect();
        if missing.is_empty() {
            GuardDecision::Allow
        } else {
            GuardDecision::Deny(DenyReason::MissingScopes { missing })
        }
    }

    /// Like [`check`](Self::check), as a `Result`.
    ///
    /// `Unauthenticated` becomes `Unauthorized`; missing scopes become
    /// `Forbidden`.
    pub fn ensure(
        &self,
        module: &str,
        handler: &str,
        caller: Option<&CallerContext>,
    ) -> Result<()> {
        match self.check(module, handler, caller) {
            GuardDecision::Allow => Ok(()),
            GuardDecision::Deny(DenyReason::Unauthenticated) => {
                tracing::warn!(
                    target: "authorization",
                    module,
                    handler,
                    "Unauthenticated call to protected operation"
                );
                Err(MobilizerError::Unauthorized {
                    message: Some(format!("{module}.{handler} requires an authenticated caller")),
                })
            }
            GuardDecision::Deny(DenyReason::MissingScopes { missing }) => {
                let missing: Vec<String> = missing.into_iter().collect();
                tracing::warn!(
                    target: "authorization",
                    module,
                    handler,
                    missing = ?missing,
                    "Caller lacks required scopes"
                );
                Err(MobilizerError::forbidden(format!(
                    "missing scopes: {}",
                    missing.join(", ")
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilizer_core::UserId;

    fn guard() -> ScopeGuard {
        ScopeGuard::new(
            ScopePolicy::default()
                .with_module("users", ["users:read"])
                .with_handler("users", "getUserRoles", ["users:roles:read", "users:read"]),
        )
    }

    fn caller(scopes: &[&str]) -> CallerContext {
        CallerContext::new(UserId::new()).with_scopes(scopes.iter().copied())
    }

    #[test]
    fn test_superset_allows() {
        let caller = caller(&["users:read", "users:roles:read", "posts:write"]);
        assert!(guard().check("users", "getUserRoles", Some(&caller)).is_allowed());
    }

    #[test]
    fn test_missing_scope_lists_what_is_missing() {
        let caller = caller(&["users:read"]);
        assert_eq!(
            guard().check("users", "getUserRoles", Some(&caller)),
            GuardDecision::Deny(DenyReason::MissingScopes {
                missing: BTreeSet::from(["users:roles:read".to_string()])
            })
        );
    }

    #[test]
    fn test_anonymous_denied_when_required() {
        assert_eq!(
            guard().check("users", "listUsers", None),
            GuardDecision::Deny(DenyReason::Unauthenticated)
        );
    }

    #[test]
    fn test_anonymous_allowed_when_undeclared() {
        assert!(guard().check("posts", "feed", None).is_allowed());
    }

    #[test]
    fn test_ensure_maps_to_errors() {
        let guard = guard();
        let err = guard.ensure("users", "listUsers", None).unwrap_err();
        assert_eq!(err.status_code(), 401);

        let err = guard
            .ensure("users", "listUsers", Some(&caller(&[])))
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert!(err.to_string().contains("users:read"));

        assert!(guard
            .ensure("users", "listUsers", Some(&caller(&["users:read"])))
            .is_ok());
    }
}
