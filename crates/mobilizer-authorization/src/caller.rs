//! The authenticated caller, as attached to a request upstream.

use std::collections::BTreeSet;

use mobilizer_core::UserId;
use serde::{Deserialize, Serialize};

/// Identity and scopes of the caller making a request.
///
/// Produced by the authentication layer; this crate only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallerContext {
    pub user_id: UserId,
    #[serde(default)]
    pub scopes: BTreeSet<String>,
}

impl CallerContext {
    #[must_use]
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            scopes: BTreeSet::new(),
        }
    }

    #[must_use]
    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes.extend(scopes.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.contains(scope)
    }
}
