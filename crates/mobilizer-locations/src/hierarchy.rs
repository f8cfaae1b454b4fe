//! The location hierarchy table.
//!
//! Nodes are held in memory keyed by id. [`LocationHierarchy::validate`]
//! checks that every parent chain ends at exactly one country with each step
//! going up exactly one level.

use std::collections::{BTreeMap, HashSet};

use mobilizer_core::{HierarchyLevel, LocationId, LocationLevel};
use serde::{Deserialize, Serialize};

use crate::error::HierarchyError;

/// A country, state, LGA, ward or polling unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationNode {
    pub id: LocationId,
    pub level: LocationLevel,
    pub name: String,
    pub code: Option<String>,
    /// `None` only for countries.
    pub parent_id: Option<LocationId>,
}

/// In-memory location table.
#[derive(Debug, Clone, Default)]
pub struct LocationHierarchy {
    nodes: BTreeMap<LocationId, LocationNode>,
}

impl LocationHierarchy {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a node. Returns the replaced node, if any.
    pub fn insert(&mut self, node: LocationNode) -> Option<LocationNode> {
        self.nodes.insert(node.id, node)
    }

    #[must_use]
    pub fn get(&self, id: LocationId) -> Option<&LocationNode> {
        self.nodes.get(&id)
    }

    #[must_use]
    pub fn contains(&self, id: LocationId) -> bool {
        self.nodes.contains_key(&id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LocationNode> {
        self.nodes.values()
    }

    /// Nodes ordered so that every parent precedes its children.
    #[must_use]
    pub fn root_first(&self) -> Vec<&LocationNode> {
        let mut nodes: Vec<&LocationNode> = self.nodes.values().collect();
        nodes.sort_by_key(|n| n.level);
        nodes
    }

    /// Direct children, ordered by code then name.
    #[must_use]
    pub fn children(&self, id: LocationId) -> Vec<&LocationNode> {
        let mut children: Vec<&LocationNode> = self
            .nodes
            .values()
            .filter(|n| n.parent_id == Some(id))
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.name.cmp(&b.name)));
        children
    }

    /// Ancestors of `id`, nearest first. Stops at a missing parent or a cycle.
    #[must_use]
    pub fn ancestors(&self, id: LocationId) -> Vec<&LocationNode> {
        let mut chain = Vec::new();
        let mut seen = HashSet::from([id]);
        let mut next = self.get(id).and_then(|n| n.parent_id);
        while let Some(parent_id) = next {
            if !seen.insert(parent_id) {
                break;
            }
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            chain.push(parent);
            next = parent.parent_id;
        }
        chain
    }

    /// The country `id` belongs to (itself, if it is a country).
    #[must_use]
    pub fn country_of(&self, id: LocationId) -> Option<&LocationNode> {
        let node = self.get(id)?;
        if node.level == HierarchyLevel::Country {
            return Some(node);
        }
        self.ancestors(id)
            .into_iter()
            .last()
            .filter(|n| n.level == HierarchyLevel::Country)
    }

    /// Node counts per level. Levels without nodes are present with zero.
    #[must_use]
    pub fn count_by_level(&self) -> BTreeMap<HierarchyLevel, usize> {
        let mut counts: BTreeMap<HierarchyLevel, usize> =
            HierarchyLevel::all().iter().map(|l| (*l, 0)).collect();
        for node in self.nodes.values() {
            *counts.entry(node.level).or_insert(0) += 1;
        }
        counts
    }

    /// Check the parent-chain invariants, collecting every violation.
    pub fn validate(&self) -> Result<(), Vec<HierarchyError>> {
        let mut errors = Vec::new();

        for node in self.nodes.values() {
            match (node.level.parent(), node.parent_id) {
                (None, Some(_)) => errors.push(HierarchyError::CountryWithParent(node.id)),
                (Some(_), None) => errors.push(HierarchyError::MissingParent {
                    id: node.id,
                    level: node.level,
                }),
                (Some(expected), Some(parent_id)) => match self.nodes.get(&parent_id) {
                    None => errors.push(HierarchyError::UnknownParent {
                        id: node.id,
                        parent_id,
                    }),
                    Some(parent) if parent.level != expected => {
                        errors.push(HierarchyError::LevelMismatch {
                            id: node.id,
                            level: node.level,
                            parent_level: parent.level,
                        });
                    }
                    Some(_) => {}
                },
                (None, None) => {}
            }

            if self.has_cycle(node.id) {
                errors.push(HierarchyError::Cycle(node.id));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn has_cycle(&self, start: LocationId) -> bool {
        let mut seen = HashSet::from([start]);
        let mut next = self.get(start).and_then(|n| n.parent_id);
        while let Some(id) = next {
            if !seen.insert(id) {
                return true;
            }
            next = self.get(id).and_then(|n| n.parent_id);
        }
        false
    }
}
