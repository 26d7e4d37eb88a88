//! Enforcement orchestrator.
//!
//! Drives resolution → grouping → evaluator binding → aggregation for
//! single and batched decision requests.

use std::sync::Arc;

use authz_gate_sdk::{
    AccessRequest, Evaluator, EvaluatorRegistry, Permission, PermissionScope, PermissionStore,
    PolicyEngine, Selector,
};
use tracing::debug;

use super::binding::EvaluatorCache;
use super::error::DomainError;
use super::grouping::group_by_policy;
use super::resolver::PermissionResolver;
use crate::config::AuthzGateConfig;

/// Decision gate service.
///
/// Stateless apart from the evaluator cache; safe to share across
/// concurrent callers. Read-only with respect to permission and policy
/// data.
pub struct Service {
    resolver: PermissionResolver,
    cache: EvaluatorCache,
    registry: Arc<dyn EvaluatorRegistry>,
}

impl Service {
    #[must_use]
    pub fn new(
        store: Arc<dyn PermissionStore>,
        engine: Arc<dyn PolicyEngine>,
        registry: Arc<dyn EvaluatorRegistry>,
        config: &AuthzGateConfig,
    ) -> Self {
        Self {
            resolver: PermissionResolver::new(store),
            cache: EvaluatorCache::new(engine).with_ttl(config.cache.ttl()),
            registry,
        }
    }

    /// Access to the evaluator cache, for invalidation hooks.
    #[must_use]
    pub fn evaluator_cache(&self) -> &EvaluatorCache {
        &self.cache
    }

    /// Decide a single request.
    ///
    /// Returns one boolean per resolved permission group, in group order;
    /// the explicit paths return a single entry. An explicitly named
    /// permission that does not exist yields `[false]` — absence of a
    /// permission is "not granted", not an error.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EvaluatorNotFound`] for an unregistered evaluator id
    /// - [`DomainError::Lookup`] if the permission store fails
    /// - [`DomainError::Compilation`] / [`DomainError::Evaluation`] if the
    ///   engine fails; any group failing fails the whole call
    #[tracing::instrument(skip_all, fields(selector = %selector))]
    pub async fn decide(
        &self,
        selector: &Selector,
        request: &AccessRequest,
    ) -> Result<Vec<bool>, DomainError> {
        match selector {
            Selector::Evaluator(id) => {
                let evaluator = self.named_evaluator(id)?;
                let decision = evaluator.evaluate(request, None).await?;
                Ok(vec![decision])
            }
            Selector::Permission(id) => {
                let Some(permission) = self.resolver.by_id(id).await? else {
                    debug!(permission_id = %id, "permission does not exist, not granted");
                    return Ok(vec![false]);
                };
                let (evaluator, scope) = self.bind_single(&permission).await?;
                let decision = evaluator.evaluate(request, Some(&scope)).await?;
                Ok(vec![decision])
            }
            Selector::Model(model) => {
                let permissions = self.resolver.by_model(model).await?;
                self.decide_grouped(&permissions, request).await
            }
            Selector::Resource(id) => {
                let permissions = self.resolver.by_resource(id).await?;
                self.decide_grouped(&permissions, request).await
            }
        }
    }

    /// Decide an ordered batch of requests.
    ///
    /// Returns one row per resolved permission group, each row aligned to
    /// the input request order. Evaluators receive the whole batch in one
    /// call so the engine can amortize per-call overhead.
    ///
    /// # Errors
    ///
    /// - [`DomainError::EmptyInput`] if `requests` is empty
    /// - otherwise as for [`Service::decide`]
    #[tracing::instrument(skip_all, fields(selector = %selector, request_count = requests.len()))]
    pub async fn decide_batch(
        &self,
        selector: &Selector,
        requests: &[AccessRequest],
    ) -> Result<Vec<Vec<bool>>, DomainError> {
        if requests.is_empty() {
            return Err(DomainError::EmptyInput);
        }

        match selector {
            Selector::Evaluator(id) => {
                let evaluator = self.named_evaluator(id)?;
                let row = evaluator.evaluate_batch(requests, None).await?;
                Ok(vec![checked_row(row, requests.len())?])
            }
            Selector::Permission(id) => {
                let Some(permission) = self.resolver.by_id(id).await? else {
                    debug!(permission_id = %id, "permission does not exist, denying batch");
                    return Ok(vec![vec![false; requests.len()]]);
                };
                let (evaluator, scope) = self.bind_single(&permission).await?;
                let row = evaluator.evaluate_batch(requests, Some(&scope)).await?;
                Ok(vec![checked_row(row, requests.len())?])
            }
            Selector::Model(model) => {
                let permissions = self.resolver.by_model(model).await?;
                self.decide_grouped_batch(&permissions, requests).await
            }
            Selector::Resource(id) => {
                let permissions = self.resolver.by_resource(id).await?;
                self.decide_grouped_batch(&permissions, requests).await
            }
        }
    }

    fn named_evaluator(&self, id: &str) -> Result<Arc<dyn Evaluator>, DomainError> {
        self.registry
            .get(id)
            .ok_or_else(|| DomainError::EvaluatorNotFound { id: id.to_owned() })
    }

    async fn bind_single(
        &self,
        permission: &Permission,
    ) -> Result<(Arc<dyn Evaluator>, PermissionScope), DomainError> {
        let evaluator = self.cache.bind(&permission.policy_identity()).await?;
        let scope = std::iter::once(permission.id.as_str()).collect();
        Ok((evaluator, scope))
    }

    async fn decide_grouped(
        &self,
        permissions: &[Permission],
        request: &AccessRequest,
    ) -> Result<Vec<bool>, DomainError> {
        let groups = group_by_policy(permissions);
        debug!(
            permission_count = permissions.len(),
            group_count = groups.len(),
            "deciding per permission group"
        );

        let mut decisions = Vec::with_capacity(groups.len());
        for group in &groups {
            let evaluator = self.cache.bind(&group.identity).await?;
            let scope = group.scope();
            decisions.push(evaluator.evaluate(request, Some(&scope)).await?);
        }
        Ok(decisions)
    }

    async fn decide_grouped_batch(
        &self,
        permissions: &[Permission],
        requests: &[AccessRequest],
    ) -> Result<Vec<Vec<bool>>, DomainError> {
        let groups = group_by_policy(permissions);
        debug!(
            permission_count = permissions.len(),
            group_count = groups.len(),
            "deciding batch per permission group"
        );

        let mut rows = Vec::with_capacity(groups.len());
        for group in &groups {
            let evaluator = self.cache.bind(&group.identity).await?;
            let scope = group.scope();
            let row = evaluator.evaluate_batch(requests, Some(&scope)).await?;
            rows.push(checked_row(row, requests.len())?);
        }
        Ok(rows)
    }
}

/// Every row must be aligned to the input request order; an engine that
/// returns a differently sized row has violated the batching contract.
fn checked_row(row: Vec<bool>, expected: usize) -> Result<Vec<bool>, DomainError> {
    if row.len() == expected {
        Ok(row)
    } else {
        Err(DomainError::Evaluation(format!(
            "engine returned {} decisions for {expected} requests",
            row.len()
        )))
    }
}
