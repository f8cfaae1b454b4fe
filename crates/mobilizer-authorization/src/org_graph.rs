//! In-memory organization hierarchy of one movement.
//!
//! Built once per resolution from the movement's organizations, then walked
//! without going back to the store. The in-memory directory builds one per
//! movement when it loads a snapshot, so data it accepts always indexes.

use std::collections::{HashMap, HashSet, VecDeque};

use mobilizer_core::{MobilizerError, MovementId, MovementScoped, OrganizationId, Result};

use crate::models::Organization;

/// Parent/child index over a movement's organizations.
///
/// Every parent sits strictly above its children, which also rules out
/// cycles.
#[derive(Debug, Clone)]
pub struct OrgHierarchy {
    organizations: HashMap<OrganizationId, Organization>,
    children: HashMap<OrganizationId, Vec<OrganizationId>>,
}

impl OrgHierarchy {
    /// Index `organizations`, checking that they all belong to
    /// `movement_id` and nest by level.
    pub fn build(movement_id: MovementId, organizations: Vec<Organization>) -> Result<Self> {
        let organizations: HashMap<OrganizationId, Organization> =
            organizations.into_iter().map(|o| (o.id, o)).collect();

        let mut children: HashMap<OrganizationId, Vec<OrganizationId>> = HashMap::new();
        for org in organizations.values() {
            if !org.belongs_to(movement_id) {
                return Err(MobilizerError::validation(
                    "movement_id",
                    format!("organization {} belongs to another movement", org.id),
                ));
            }
            let Some(parent_id) = org.parent_id else {
                continue;
            };
            let parent = organizations.get(&parent_id).ok_or_else(|| {
                MobilizerError::validation(
                    "parent_id",
                    format!("organization {} has a parent outside movement {movement_id}", org.id),
                )
            })?;
            if parent.level >= org.level {
                return Err(MobilizerError::validation(
                    "parent_id",
                    format!(
                        "{} organization {} cannot nest under {} organization {}",
                        org.level, org.id, parent.level, parent.id
                    ),
                ));
            }
            children.entry(parent_id).or_default().push(org.id);
        }

        for ids in children.values_mut() {
            ids.sort_by(|a, b| {
                let (a, b) = (&organizations[a], &organizations[b]);
                (a.level, &a.name, a.id).cmp(&(b.level, &b.name, b.id))
            });
        }

        Ok(Self {
            organizations,
            children,
        })
    }

    fn get(&self, id: OrganizationId) -> Option<&Organization> {
        self.organizations.get(&id)
    }

    /// `id` and everything beneath it, breadth first.
    #[must_use]
    pub fn descendants_inclusive(&self, id: OrganizationId) -> Vec<&Organization> {
        let mut out = Vec::new();
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([id]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current) {
                continue;
            }
            let Some(org) = self.get(current) else {
                continue;
            };
            out.push(org);
            queue.extend(self.children.get(&current).into_iter().flatten().copied());
        }
        out
    }
}
