//! Scope guard evaluation command

use std::path::PathBuf;

use clap::Args;
use mobilizer_authorization::{
    CallerContext, DenyReason, GuardDecision, ScopeGuard, ScopePolicy,
};
use mobilizer_core::UserId;
use serde_json::json;

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Arguments for the check-scope command
#[derive(Args, Debug)]
pub struct CheckScopeArgs {
    /// Scope policy file (overrides MOBILIZER_SCOPE_POLICY)
    #[arg(long)]
    pub policy: Option<PathBuf>,

    /// Module the operation belongs to
    #[arg(long)]
    pub module: String,

    /// Handler (operation) name
    #[arg(long)]
    pub handler: String,

    /// A scope the caller holds (repeatable)
    #[arg(long = "scope", short = 's')]
    pub scopes: Vec<String>,

    /// Evaluate without an authenticated caller
    #[arg(long, conflicts_with = "scopes")]
    pub anonymous: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute check-scope command.
///
/// Prints the decision on allow; a denial is returned as an error so the
/// exit code reflects it.
pub fn execute(args: CheckScopeArgs, config: &CliConfig) -> CliResult<String> {
    let policy = match args.policy.as_ref().or(config.scope_policy.as_ref()) {
        Some(path) => ScopePolicy::from_path(path)?,
        None => ScopePolicy::default_policy(),
    };
    let guard = ScopeGuard::new(policy);

    let caller = (!args.anonymous)
        .then(|| CallerContext::new(UserId::new()).with_scopes(args.scopes.iter().cloned()));
    let required = guard.policy().required_scopes(&args.module, &args.handler);
    let decision = guard.check(&args.module, &args.handler, caller.as_ref());

    tracing::debug!(
        module = %args.module,
        handler = %args.handler,
        required = ?required,
        allowed = decision.is_allowed(),
        "Evaluated scope guard"
    );

    let operation = format!("{}.{}", args.module, args.handler);
    match decision {
        GuardDecision::Allow if args.json => Ok(format!(
            "{}\n",
            serde_json::to_string_pretty(&json!({
                "operation": operation,
                "required": required,
                "decision": GuardDecision::Allow,
            }))?
        )),
        GuardDecision::Allow if required.is_empty() => {
            Ok(format!("ALLOW {operation} (no scopes declared)\n"))
        }
        GuardDecision::Allow => Ok(format!(
            "ALLOW {operation} (requires {})\n",
            required.into_iter().collect::<Vec<_>>().join(", ")
        )),
        GuardDecision::Deny(DenyReason::Unauthenticated) => Err(CliError::Unauthorized(format!(
            "{operation} requires an authenticated caller"
        ))),
        GuardDecision::Deny(DenyReason::MissingScopes { missing }) => {
            Err(CliError::Forbidden(format!(
                "{operation} is missing scopes: {}",
                missing.into_iter().collect::<Vec<_>>().join(", ")
            )))
        }
    }
}
