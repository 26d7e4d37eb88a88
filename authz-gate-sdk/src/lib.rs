#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! AuthZ Gate SDK
//!
//! This crate provides the public contract for the `authz_gate` module:
//!
//! - [`DecisionClient`] - Public API trait for consumers
//! - [`AccessRequest`], [`Permission`], [`PolicyIdentity`], [`PermissionGroup`],
//!   [`PermissionScope`] - Decision models
//! - [`Selector`], [`ModelRef`] - Request selector types
//! - [`PermissionStore`], [`PolicyEngine`], [`Evaluator`], [`EvaluatorRegistry`] -
//!   Collaborator seams the gate consumes
//! - [`DecisionError`], [`StoreError`], [`EngineError`] - Error types
//!
//! ## Usage
//!
//! ```ignore
//! use authz_gate_sdk::{AccessRequest, DecisionClient, Selector};
//!
//! let selector = Selector::from_parts(None, Some("built-in/read-docs"), None, None)?;
//! let request = AccessRequest::new("alice", "doc-1", "read");
//!
//! let decisions = gate.decide(&selector, &request).await?;
//! ```

pub mod api;
pub mod error;
pub mod models;
pub mod plugin_api;
pub mod selector;

// Re-export main types at crate root
pub use api::DecisionClient;
pub use error::{DecisionError, EngineError, StoreError};
pub use models::{
    AccessRequest, MalformedRequest, Permission, PermissionGroup, PermissionScope, PolicyIdentity,
};
pub use plugin_api::{Evaluator, EvaluatorRegistry, PermissionStore, PolicyEngine};
pub use selector::{ModelRef, Selector, SelectorError};
