//! Common test utilities for CLI integration tests

#![allow(dead_code)]

use std::path::PathBuf;

use clap::Parser;
use mobilizer_cli::config::CliConfig;
use mobilizer_cli::error::CliResult;
use mobilizer_cli::{run, Cli};
use tempfile::TempDir;

pub const MOVEMENT_ID: &str = "11111111-1111-1111-1111-111111111111";
pub const OTHER_MOVEMENT_ID: &str = "22222222-2222-2222-2222-222222222222";
pub const MEMBER_ID: &str = "aaaaaaaa-aaaa-aaaa-aaaa-aaaaaaaaaaaa";
pub const OUTSIDER_ID: &str = "bbbbbbbb-bbbb-bbbb-bbbb-bbbbbbbbbbbb";
pub const STATE_ORG_ID: &str = "33333333-3333-3333-3333-333333333333";
pub const LGA_ORG_ID: &str = "44444444-4444-4444-4444-444444444444";
pub const LAGOS_ORG_ID: &str = "55555555-5555-5555-5555-555555555555";

/// A directory with one member of the Kano LGA chapter and one outsider
/// who belongs to a different movement.
pub fn snapshot_json() -> String {
    format!(
        r#"{{
  "users": [
    {{ "id": "{MEMBER_ID}", "name": "Amina" }},
    {{ "id": "{OUTSIDER_ID}", "name": "Bello" }}
  ],
  "movements": [
    {{ "id": "{MOVEMENT_ID}", "name": "Green Wave" }},
    {{ "id": "{OTHER_MOVEMENT_ID}", "name": "Unity Front" }}
  ],
  "organizations": [
    {{ "id": "{STATE_ORG_ID}", "movement_id": "{MOVEMENT_ID}", "name": "Kano", "level": "state" }},
    {{ "id": "{LGA_ORG_ID}", "movement_id": "{MOVEMENT_ID}", "name": "Gwale", "level": "lga", "parent_id": "{STATE_ORG_ID}" }},
    {{ "id": "{LAGOS_ORG_ID}", "movement_id": "{OTHER_MOVEMENT_ID}", "name": "Lagos", "level": "state" }}
  ],
  "roles": [
    {{ "id": "66666666-6666-6666-6666-666666666666", "movement_id": "{MOVEMENT_ID}", "name": "State Coordinator", "level": "state" }},
    {{ "id": "77777777-7777-7777-7777-777777777777", "movement_id": "{MOVEMENT_ID}", "name": "LGA Coordinator", "level": "lga" }}
  ],
  "memberships": [
    {{
      "user_id": "{MEMBER_ID}",
      "organization_id": "{LGA_ORG_ID}",
      "is_active": true,
      "joined_at": "2024-01-01T00:00:00Z",
      "approved_at": "2024-01-02T00:00:00Z"
    }},
    {{
      "user_id": "{OUTSIDER_ID}",
      "organization_id": "{LAGOS_ORG_ID}",
      "is_active": true,
      "joined_at": "2024-01-01T00:00:00Z",
      "approved_at": "2024-01-01T00:00:00Z"
    }}
  ]
}}"#
    )
}

pub const TUPLE_DUMP: &str = "\
(1, 20, 1, 1, 'Kofar Yamma Pri. Sch.'),
(1, 20, 1, 1, 'Gidan Sarki'),
(1, 20, 1, 2, 'Kofar Yamma Pri. Sch.'),
(1, 20, x, 2, 'Broken'),
";

pub const POLICY_JSON: &str = r#"{
  "modules": {
    "users": {
      "required": ["users:read"],
      "handlers": { "getUserRoles": ["users:roles:read"] }
    }
  }
}"#;

/// Test context with an isolated temp directory for input files.
pub struct TestContext {
    pub temp_dir: TempDir,
    pub config: CliConfig,
}

impl TestContext {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
            config: CliConfig::default(),
        }
    }

    /// Write `contents` to `name` inside the temp directory.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        self.write_bytes(name, contents.as_bytes())
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::write(&path, contents).expect("Failed to write fixture");
        path
    }

    /// Parse `args` as a command line and run it.
    pub async fn run(&self, args: &[&str]) -> CliResult<String> {
        let argv = std::iter::once("mobilizer").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv).expect("Failed to parse arguments");
        run(cli, &self.config).await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
