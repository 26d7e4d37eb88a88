//! Permission resolution.
//!
//! Maps a selector to the concrete permission records it applies to, via
//! the permission store.

use std::sync::Arc;

use authz_gate_sdk::{ModelRef, Permission, PermissionStore};
use tracing::debug;

use super::error::DomainError;

/// Resolves selectors to permission records.
pub struct PermissionResolver {
    store: Arc<dyn PermissionStore>,
}

impl PermissionResolver {
    #[must_use]
    pub fn new(store: Arc<dyn PermissionStore>) -> Self {
        Self { store }
    }

    /// Resolve an explicitly named permission.
    ///
    /// Absence is `Ok(None)`; the caller decides whether that means
    /// "denied" (it does, for decision requests).
    ///
    /// # Errors
    ///
    /// [`DomainError::Lookup`] if the store fails.
    pub async fn by_id(&self, id: &str) -> Result<Option<Permission>, DomainError> {
        let permission = self.store.get_by_id(id).await?;
        debug!(permission_id = %id, found = permission.is_some(), "resolved explicit permission");
        Ok(permission)
    }

    /// All permissions attached to a policy model.
    ///
    /// # Errors
    ///
    /// [`DomainError::Lookup`] if the store fails.
    pub async fn by_model(&self, model: &ModelRef) -> Result<Vec<Permission>, DomainError> {
        let permissions = self.store.get_by_model(&model.owner, &model.name).await?;
        debug!(model = %model, count = permissions.len(), "resolved permissions by model");
        Ok(permissions)
    }

    /// All permissions whose scope covers a resource.
    ///
    /// # Errors
    ///
    /// [`DomainError::Lookup`] if the store fails.
    pub async fn by_resource(&self, resource_id: &str) -> Result<Vec<Permission>, DomainError> {
        let permissions = self.store.get_by_resource(resource_id).await?;
        debug!(resource_id = %resource_id, count = permissions.len(), "resolved permissions by resource");
        Ok(permissions)
    }
}
