//! Local (in-process) client for the decision gate.

use std::sync::Arc;

use async_trait::async_trait;
use authz_gate_sdk::{AccessRequest, DecisionClient, DecisionError, Selector};

use super::error::DomainError;
use super::service::Service;

/// Local client wrapping the service.
pub struct AuthzGateLocalClient {
    svc: Arc<Service>,
}

impl AuthzGateLocalClient {
    #[must_use]
    pub fn new(svc: Arc<Service>) -> Self {
        Self { svc }
    }
}

fn log_and_convert(op: &str, e: DomainError) -> DecisionError {
    tracing::error!(operation = op, error = ?e, "authz_gate call failed");
    e.into()
}

#[async_trait]
impl DecisionClient for AuthzGateLocalClient {
    async fn decide(
        &self,
        selector: &Selector,
        request: &AccessRequest,
    ) -> Result<Vec<bool>, DecisionError> {
        self.svc
            .decide(selector, request)
            .await
            .map_err(|e| log_and_convert("decide", e))
    }

    async fn decide_batch(
        &self,
        selector: &Selector,
        requests: &[AccessRequest],
    ) -> Result<Vec<Vec<bool>>, DecisionError> {
        self.svc
            .decide_batch(selector, requests)
            .await
            .map_err(|e| log_and_convert("decide_batch", e))
    }
}
