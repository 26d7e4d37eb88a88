#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Static policy plugin.
//!
//! Config-driven, in-memory implementations of the `authz_gate_sdk`
//! collaborator seams, for development and testing:
//!
//! - [`StaticPermissionStore`] - permission table backing `PermissionStore`
//! - [`StaticPolicyEngine`] - rule-matching engine backing `PolicyEngine`
//! - [`StaticPolicyConfig`] - the deserializable rule/permission tables
//!
//! Rules are `(subject, object, action[, domain])` tuples with `*`
//! wildcards, each owned by a permission; scoped evaluation only consults
//! rules whose owner is in scope.

pub mod config;
pub mod engine;
pub mod error;
pub mod store;

pub use config::{PermissionEntry, RuleEntry, StaticPolicyConfig};
pub use engine::StaticPolicyEngine;
pub use error::StaticPolicyError;
pub use store::StaticPermissionStore;
