#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Authorization decision gate.
//!
//! The gate sits between an inbound access-control request and the
//! policy-evaluation engine. For each request it:
//!
//! 1. resolves the permission records the selector applies to,
//! 2. partitions them into groups sharing a compiled-policy identity,
//! 3. binds a cached evaluator per group (compiling at most once per
//!    identity), and
//! 4. evaluates the request(s) scoped to each group's permissions,
//!    aggregating one decision per group in group order.
//!
//! A selector naming a pre-initialized evaluator bypasses resolution
//! entirely.
//!
//! The permission store, the evaluation engine and the named-evaluator
//! registry are trait seams from `authz_gate_sdk`; wire them up and hand
//! the service to callers behind [`domain::AuthzGateLocalClient`]:
//!
//! ```ignore
//! let service = Arc::new(Service::new(store, engine, registry, &config));
//! let gate: Arc<dyn DecisionClient> = Arc::new(AuthzGateLocalClient::new(service));
//! ```

pub mod config;
pub mod domain;

pub use config::{AuthzGateConfig, CacheConfig};
pub use domain::{
    AuthzGateLocalClient, DomainError, EvaluatorCache, PermissionResolver, Service,
    SharedEvaluatorRegistry, group_by_policy,
};
