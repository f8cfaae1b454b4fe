//! Seeding service: validate, build, check, and optionally commit.

use std::collections::HashMap;
use std::sync::Arc;

use mobilizer_core::{HierarchyLevel, LocationId};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{LocationError, Result};
use crate::hierarchy::LocationHierarchy;
use crate::record::RawRecord;
use crate::seed::{build_hierarchy, SeedSummary};
use crate::store::LocationStore;
use crate::validator::{DelimitationValidator, DuplicateReport};

/// Whether a seeding pass writes to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Build and report only.
    #[default]
    DryRun,
    /// Insert the built nodes.
    Commit,
}

/// Result of a seeding pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedOutcome {
    pub mode: SeedMode,
    pub report: DuplicateReport,
    pub summary: SeedSummary,
    /// Nodes newly written to the store (always 0 for a dry run).
    pub inserted: usize,
}

/// Loads delimitation batches into a [`LocationStore`].
pub struct SeedService {
    store: Arc<dyn LocationStore>,
    validator: DelimitationValidator,
}

impl SeedService {
    /// Create a new seed service.
    pub fn new(store: Arc<dyn LocationStore>, validator: DelimitationValidator) -> Self {
        Self { store, validator }
    }

    /// Report on a batch without building anything.
    pub fn report(&self, records: &[RawRecord]) -> Result<DuplicateReport> {
        self.validator.validate(records)
    }

    /// Validate a batch, build its hierarchy, and commit it when asked to.
    ///
    /// Duplicates and unparseable rows are reported, never fatal. A built
    /// hierarchy that violates its invariants aborts before anything is
    /// written. Both modes read the store so polling-unit codes continue the
    /// numbering of wards seeded earlier.
    #[instrument(skip(self, records), fields(rows = records.len()))]
    pub async fn seed(&self, records: &[RawRecord], mode: SeedMode) -> Result<SeedOutcome> {
        let (report, parsed) = self.validator.partition(records)?;
        let (mut hierarchy, summary) = build_hierarchy(&parsed);
        self.continue_unit_codes(&mut hierarchy).await?;

        if let Err(errors) = hierarchy.validate() {
            tracing::warn!(
                target: "locations",
                violations = errors.len(),
                "Seed hierarchy failed validation"
            );
            return Err(LocationError::Hierarchy(errors));
        }

        let inserted = match mode {
            SeedMode::DryRun => 0,
            SeedMode::Commit => {
                let nodes = hierarchy.root_first().into_iter().cloned().collect();
                self.store.insert_nodes(nodes).await?
            }
        };

        tracing::info!(
            target: "locations",
            nodes = summary.total_nodes(),
            skipped_duplicates = summary.skipped_duplicates,
            inserted,
            "Seeding pass finished"
        );

        Ok(SeedOutcome {
            mode,
            report,
            summary,
            inserted,
        })
    }

    /// Give polling units of already stored wards their stored code, and
    /// number new ones after the highest code the ward already has.
    async fn continue_unit_codes(&self, hierarchy: &mut LocationHierarchy) -> Result<()> {
        let wards: Vec<LocationId> = hierarchy
            .iter()
            .filter(|n| n.level == HierarchyLevel::Ward)
            .map(|n| n.id)
            .collect();

        for ward in wards {
            if self.store.get(ward).await?.is_none() {
                continue;
            }
            let stored = self.store.children(ward).await?;
            let stored_codes: HashMap<LocationId, Option<String>> =
                stored.iter().map(|n| (n.id, n.code.clone())).collect();
            let mut last = stored
                .iter()
                .filter_map(|n| n.code.as_deref()?.parse::<u32>().ok())
                .max()
                .unwrap_or(0);

            let units: Vec<_> = hierarchy.children(ward).into_iter().cloned().collect();
            for mut unit in units {
                match stored_codes.get(&unit.id) {
                    Some(code) => unit.code = code.clone(),
                    None => {
                        last += 1;
                        unit.code = Some(format!("{last:03}"));
                    }
                }
                hierarchy.insert(unit);
            }
        }
        Ok(())
    }
}
