//! In-memory permission store.

use std::collections::HashSet;

use async_trait::async_trait;
use authz_gate_sdk::{Permission, PermissionStore, StoreError};

use crate::config::StaticPolicyConfig;
use crate::error::StaticPolicyError;

/// Permission table backed by the plugin config.
#[derive(Debug)]
pub struct StaticPermissionStore {
    permissions: Vec<Permission>,
}

impl StaticPermissionStore {
    /// Build the store from config.
    ///
    /// # Errors
    ///
    /// [`StaticPolicyError::DuplicatePermission`] if two entries share an id.
    pub fn from_config(config: &StaticPolicyConfig) -> Result<Self, StaticPolicyError> {
        let mut seen = HashSet::new();
        for entry in &config.permissions {
            if !seen.insert(entry.id.as_str()) {
                return Err(StaticPolicyError::DuplicatePermission {
                    id: entry.id.clone(),
                });
            }
        }

        Ok(Self {
            permissions: config
                .permissions
                .iter()
                .map(|entry| Permission {
                    id: entry.id.clone(),
                    model_id: entry.model.clone(),
                    adapter_id: entry.adapter.clone(),
                    resources: entry.resources.clone(),
                })
                .collect(),
        })
    }
}

#[async_trait]
impl PermissionStore for StaticPermissionStore {
    async fn get_by_id(&self, id: &str) -> Result<Option<Permission>, StoreError> {
        Ok(self.permissions.iter().find(|p| p.id == id).cloned())
    }

    async fn get_by_model(&self, owner: &str, name: &str) -> Result<Vec<Permission>, StoreError> {
        let model_id = format!("{owner}/{name}");
        Ok(self
            .permissions
            .iter()
            .filter(|p| p.model_id == model_id)
            .cloned()
            .collect())
    }

    async fn get_by_resource(&self, resource_id: &str) -> Result<Vec<Permission>, StoreError> {
        Ok(self
            .permissions
            .iter()
            .filter(|p| p.resources.iter().any(|r| r == resource_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::config::PermissionEntry;

    fn entry(id: &str, model: &str, adapter: &str, resources: &[&str]) -> PermissionEntry {
        PermissionEntry {
            id: id.to_owned(),
            model: model.to_owned(),
            adapter: adapter.to_owned(),
            resources: resources.iter().map(|&r| r.to_owned()).collect(),
        }
    }

    fn store() -> StaticPermissionStore {
        StaticPermissionStore::from_config(&StaticPolicyConfig {
            permissions: vec![
                entry("built-in/p1", "built-in/m1", "built-in/a1", &["app-x"]),
                entry("built-in/p2", "built-in/m1", "built-in/a1", &[]),
                entry("built-in/p3", "built-in/m2", "built-in/a1", &["app-x"]),
            ],
            rules: vec![],
        })
        .unwrap()
    }

    #[tokio::test]
    async fn lookup_by_id() {
        let store = store();
        let hit = store.get_by_id("built-in/p1").await.unwrap();
        assert_eq!(hit.unwrap().model_id, "built-in/m1");
        assert!(store.get_by_id("built-in/p9").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn lookup_by_model_matches_owner_and_name() {
        let store = store();
        let hits = store.get_by_model("built-in", "m1").await.unwrap();
        assert_eq!(hits.len(), 2);
        assert!(store.get_by_model("built-in", "m9").await.unwrap().is_empty());
        assert!(store.get_by_model("other", "m1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lookup_by_resource() {
        let store = store();
        let hits = store.get_by_resource("app-x").await.unwrap();
        let ids: Vec<&str> = hits.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["built-in/p1", "built-in/p3"]);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = StaticPermissionStore::from_config(&StaticPolicyConfig {
            permissions: vec![
                entry("built-in/p1", "built-in/m1", "built-in/a1", &[]),
                entry("built-in/p1", "built-in/m2", "built-in/a1", &[]),
            ],
            rules: vec![],
        })
        .unwrap_err();
        assert!(matches!(err, StaticPolicyError::DuplicatePermission { .. }));
    }
}
