//! User role resolution command

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Args;
use mobilizer_authorization::{
    DirectorySnapshot, InMemoryDirectoryStore, MovementRoles, ScopeResolver,
};
use mobilizer_core::{MovementId, UserId};

use crate::config::CliConfig;
use crate::error::{CliError, CliResult};

/// Arguments for the user-roles command
#[derive(Args, Debug)]
pub struct UserRolesArgs {
    /// Directory snapshot (JSON) to resolve against
    #[arg(long)]
    pub snapshot: PathBuf,

    /// User ID (UUID)
    #[arg(long, short = 'u')]
    pub user: String,

    /// Restrict to one movement (UUID)
    #[arg(long, short = 'm')]
    pub movement: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Execute user-roles command
pub async fn execute(args: UserRolesArgs, _config: &CliConfig) -> CliResult<String> {
    let user_id = parse_id::<UserId>(&args.user, "user")?;
    let movement_id = args
        .movement
        .as_deref()
        .map(|m| parse_id::<MovementId>(m, "movement"))
        .transpose()?;

    let store = load_snapshot(&args.snapshot)?;
    let resolver = ScopeResolver::new(Arc::new(store));
    let roles = resolver.get_user_roles(user_id, movement_id).await?;

    if args.json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&roles)?))
    } else {
        Ok(render_roles(&roles))
    }
}

/// Load a directory snapshot file into an in-memory store.
pub fn load_snapshot(path: &std::path::Path) -> CliResult<InMemoryDirectoryStore> {
    let data = std::fs::read(path)
        .map_err(|e| CliError::Io(format!("Failed to read {}: {e}", path.display())))?;
    let snapshot: DirectorySnapshot = serde_json::from_slice(&data).map_err(|e| {
        CliError::Validation(format!("Invalid snapshot {}: {e}", path.display()))
    })?;
    Ok(InMemoryDirectoryStore::from_snapshot(snapshot)?)
}

fn parse_id<T: std::str::FromStr>(value: &str, what: &str) -> CliResult<T> {
    value.parse::<T>().map_err(|_| {
        CliError::Validation(format!(
            "Invalid {what} ID '{value}'. Must be a valid UUID."
        ))
    })
}

fn render_roles(roles: &[MovementRoles]) -> String {
    if roles.is_empty() {
        return "No roles.\n".to_string();
    }

    let mut out = String::new();
    for movement in roles {
        let _ = writeln!(out, "{} ({})", movement.movement_name, movement.movement_id);
        for role in &movement.roles {
            let _ = writeln!(out, "  {} ({})", role.role_name, role.role_id);
            for group in &role.support_groups {
                let _ = writeln!(out, "    - {} ({})", group.name, group.id);
            }
        }
    }
    out
}
