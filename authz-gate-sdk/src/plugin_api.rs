//! Collaborator seams consumed by the decision gate.
//!
//! The gate is storage- and engine-agnostic: the permission store, the
//! policy-evaluation engine, and the named-evaluator registry are supplied
//! by the integrating system as trait objects.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{EngineError, StoreError};
use crate::models::{AccessRequest, Permission, PermissionScope, PolicyIdentity};

/// Read-only lookup of permission records.
#[async_trait]
pub trait PermissionStore: Send + Sync {
    /// Fetch a single permission by its `owner/name` identifier.
    ///
    /// Absence is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the store is unreachable or the identifier is
    /// malformed.
    async fn get_by_id(&self, id: &str) -> Result<Option<Permission>, StoreError>;

    /// All permissions attached to the given policy model.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the store is unreachable.
    async fn get_by_model(&self, owner: &str, name: &str) -> Result<Vec<Permission>, StoreError>;

    /// All permissions whose scope covers the given resource.
    ///
    /// # Errors
    ///
    /// [`StoreError`] if the store is unreachable.
    async fn get_by_resource(&self, resource_id: &str) -> Result<Vec<Permission>, StoreError>;
}

/// Compiles policy identities into queryable evaluators.
///
/// Compilation is assumed to be the most expensive operation in the system;
/// callers memoize the result per identity and apply scoping per evaluation
/// call rather than recompiling.
#[async_trait]
pub trait PolicyEngine: Send + Sync {
    /// Compile the model + rule source named by `identity` into an
    /// unscoped evaluator.
    ///
    /// # Errors
    ///
    /// [`EngineError::Compilation`] if the model or rule source cannot be
    /// loaded or parsed.
    async fn compile(&self, identity: &PolicyIdentity) -> Result<Arc<dyn Evaluator>, EngineError>;
}

/// A compiled, queryable policy model + rule set.
///
/// `scope`, when present, restricts visibility to rules belonging to the
/// given permissions, so shared evaluators do not leak rules of unrelated
/// permissions. Absent scope means every rule is visible.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// Decide a single request.
    ///
    /// # Errors
    ///
    /// [`EngineError::Evaluation`] on engine failure.
    async fn evaluate(
        &self,
        request: &AccessRequest,
        scope: Option<&PermissionScope>,
    ) -> Result<bool, EngineError>;

    /// Decide an ordered batch of requests in one engine call.
    ///
    /// The result is aligned to the input order and has one entry per
    /// request.
    ///
    /// # Errors
    ///
    /// [`EngineError::Evaluation`] on engine failure.
    async fn evaluate_batch(
        &self,
        requests: &[AccessRequest],
        scope: Option<&PermissionScope>,
    ) -> Result<Vec<bool>, EngineError>;
}

/// Pre-initialized evaluators addressable by name.
///
/// Lifecycle is owned by the integrating system: entries are registered at
/// startup or on demand and torn down on policy change. Lookup of an
/// unknown name is `None`; the gate surfaces that as an error, unlike a
/// missing permission.
pub trait EvaluatorRegistry: Send + Sync {
    fn get(&self, evaluator_id: &str) -> Option<Arc<dyn Evaluator>>;
}
