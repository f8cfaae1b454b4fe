//! Duplicate-free construction of the location hierarchy from delimitation
//! records.
//!
//! Node ids are UUIDv5 values over the code path (`1/25/3/7`), so seeding the
//! same data twice produces the same ids and a store can skip what it
//! already holds.

use std::collections::{BTreeMap, HashMap};

use mobilizer_core::{HierarchyLevel, LocationId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hierarchy::{LocationHierarchy, LocationNode};
use crate::record::DelimitationRecord;

/// Namespace for deterministic location ids.
pub const LOCATION_NAMESPACE: Uuid = Uuid::from_u128(0x6d6f_6269_6c69_7a65_725f_6c6f_6361_7469);

/// Deterministic id for a node identified by its key path.
#[must_use]
pub fn location_id(key: &str) -> LocationId {
    LocationId::from_uuid(Uuid::new_v5(&LOCATION_NAMESPACE, key.as_bytes()))
}

/// What a seeding pass produced.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub nodes_by_level: BTreeMap<HierarchyLevel, usize>,
    /// Records whose (ward, delimitation) pair was already seeded.
    pub skipped_duplicates: usize,
}

impl SeedSummary {
    #[must_use]
    pub fn total_nodes(&self) -> usize {
        self.nodes_by_level.values().sum()
    }
}

/// Builds a [`LocationHierarchy`] one record at a time.
#[derive(Debug, Default)]
pub struct SeedBuilder {
    hierarchy: LocationHierarchy,
    polling_units_per_ward: HashMap<LocationId, u32>,
    skipped_duplicates: usize,
}

impl SeedBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one record. Returns `false` when its polling unit already exists.
    pub fn add(&mut self, record: &DelimitationRecord) -> bool {
        let country_key = record.country_code.to_string();
        let state_key = format!("{country_key}/{}", record.state_code);
        let lga_key = format!("{state_key}/{}", record.lga_code);
        let ward_key = format!("{lga_key}/{}", record.ward_code);

        let country = self.ensure(HierarchyLevel::Country, &country_key, record.country_code, None);
        let state = self.ensure(
            HierarchyLevel::State,
            &state_key,
            record.state_code,
            Some(country),
        );
        let lga = self.ensure(HierarchyLevel::Lga, &lga_key, record.lga_code, Some(state));
        let ward = self.ensure(HierarchyLevel::Ward, &ward_key, record.ward_code, Some(lga));

        let pu_id = location_id(&format!("{ward_key}#{}", record.delimitation));
        if self.hierarchy.contains(pu_id) {
            self.skipped_duplicates += 1;
            tracing::debug!(
                target: "locations",
                ward = %ward_key,
                delimitation = %record.delimitation,
                "Polling unit already seeded"
            );
            return false;
        }

        let ordinal = self.polling_units_per_ward.entry(ward).or_insert(0);
        *ordinal += 1;
        self.hierarchy.insert(LocationNode {
            id: pu_id,
            level: HierarchyLevel::PollingUnit,
            name: record.delimitation.clone(),
            code: Some(format!("{:03}", *ordinal)),
            parent_id: Some(ward),
        });
        true
    }

    fn ensure(
        &mut self,
        level: HierarchyLevel,
        key: &str,
        code: u32,
        parent_id: Option<LocationId>,
    ) -> LocationId {
        let id = location_id(key);
        if !self.hierarchy.contains(id) {
            self.hierarchy.insert(LocationNode {
                id,
                level,
                name: format!("{} {code}", level_label(level)),
                code: Some(code.to_string()),
                parent_id,
            });
        }
        id
    }

    /// Finish building and return the hierarchy with its summary.
    #[must_use]
    pub fn finish(self) -> (LocationHierarchy, SeedSummary) {
        let summary = SeedSummary {
            nodes_by_level: self.hierarchy.count_by_level(),
            skipped_duplicates: self.skipped_duplicates,
        };
        (self.hierarchy, summary)
    }
}

fn level_label(level: HierarchyLevel) -> &'static str {
    match level {
        HierarchyLevel::Country => "Country",
        HierarchyLevel::State => "State",
        HierarchyLevel::Lga => "LGA",
        HierarchyLevel::Ward => "Ward",
        HierarchyLevel::PollingUnit => "Polling Unit",
    }
}

/// Build a hierarchy from a slice of records.
#[must_use]
pub fn build_hierarchy(records: &[DelimitationRecord]) -> (LocationHierarchy, SeedSummary) {
    let mut builder = SeedBuilder::new();
    for record in records {
        builder.add(record);
    }
    builder.finish()
}
