//! Storage seam for location reference data.

use std::collections::HashMap;
use std::sync::Arc;

use mobilizer_core::{LocationId, Result};
use tokio::sync::RwLock;

use crate::hierarchy::LocationNode;

/// Trait for location storage backends.
#[async_trait::async_trait]
pub trait LocationStore: Send + Sync {
    /// Get a node by id.
    async fn get(&self, id: LocationId) -> Result<Option<LocationNode>>;

    /// Insert nodes, skipping ids already present. Returns how many were new.
    ///
    /// Callers pass parents before children.
    async fn insert_nodes(&self, nodes: Vec<LocationNode>) -> Result<usize>;

    /// Direct children of a node.
    async fn children(&self, parent_id: LocationId) -> Result<Vec<LocationNode>>;

    /// Total number of stored nodes.
    async fn count(&self) -> Result<usize>;
}

/// In-memory location store for tests and previews.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLocationStore {
    nodes: Arc<RwLock<HashMap<LocationId, LocationNode>>>,
}

impl InMemoryLocationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl LocationStore for InMemoryLocationStore {
    async fn get(&self, id: LocationId) -> Result<Option<LocationNode>> {
        Ok(self.nodes.read().await.get(&id).cloned())
    }

    async fn insert_nodes(&self, nodes: Vec<LocationNode>) -> Result<usize> {
        let mut stored = self.nodes.write().await;
        let mut inserted = 0;
        for node in nodes {
            if let std::collections::hash_map::Entry::Vacant(slot) = stored.entry(node.id) {
                slot.insert(node);
                inserted += 1;
            }
        }
        Ok(inserted)
    }

    async fn children(&self, parent_id: LocationId) -> Result<Vec<LocationNode>> {
        let stored = self.nodes.read().await;
        let mut children: Vec<LocationNode> = stored
            .values()
            .filter(|n| n.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code).then_with(|| a.name.cmp(&b.name)));
        Ok(children)
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.nodes.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mobilizer_core::HierarchyLevel;

    fn country(name: &str) -> LocationNode {
        LocationNode {
            id: LocationId::new(),
            level: HierarchyLevel::Country,
            name: name.to_string(),
            code: None,
            parent_id: None,
        }
    }

    #[tokio::test]
    async fn test_insert_is_idempotent() {
        let store = InMemoryLocationStore::new();
        let ng = country("Nigeria");

        assert_eq!(store.insert_nodes(vec![ng.clone()]).await.unwrap(), 1);
        assert_eq!(store.insert_nodes(vec![ng.clone()]).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 1);
        assert_eq!(store.get(ng.id).await.unwrap(), Some(ng));
    }

    #[tokio::test]
    async fn test_children() {
        let store = InMemoryLocationStore::new();
        let ng = country("Nigeria");
        let kano = LocationNode {
            id: LocationId::new(),
            level: HierarchyLevel::State,
            name: "Kano".to_string(),
            code: Some("20".to_string()),
            parent_id: Some(ng.id),
        };
        store
            .insert_nodes(vec![ng.clone(), kano.clone()])
            .await
            .unwrap();

        assert_eq!(store.children(ng.id).await.unwrap(), vec![kano]);
        assert!(store.children(LocationId::new()).await.unwrap().is_empty());
    }
}
