//! Error types for the `authz_gate` module.

use thiserror::Error;

use crate::selector::SelectorError;

/// Errors surfaced by the decision API.
///
/// A permission that resolves to nothing is NOT an error — it degrades to a
/// `false` decision. A named evaluator that does not exist IS an error:
/// naming a nonexistent evaluator is a caller mistake, not a denial.
#[derive(Debug, Error)]
pub enum DecisionError {
    /// The request payload was absent or empty.
    #[error("request payload is empty")]
    EmptyInput,

    /// No usable selector was supplied.
    #[error("no usable selector supplied")]
    MissingSelector,

    /// No evaluator is registered under the given identifier.
    #[error("no evaluator registered under '{0}'")]
    EvaluatorNotFound(String),

    /// The permission store is unreachable or an identifier is malformed.
    #[error("permission lookup failed: {0}")]
    Lookup(String),

    /// A policy model or rule source could not be loaded or parsed.
    #[error("policy compilation failed: {0}")]
    Compilation(String),

    /// The evaluation engine failed while deciding.
    #[error("policy evaluation failed: {0}")]
    Evaluation(String),
}

impl From<SelectorError> for DecisionError {
    fn from(e: SelectorError) -> Self {
        match e {
            SelectorError::Missing => Self::MissingSelector,
            SelectorError::MalformedId { .. } => Self::Lookup(e.to_string()),
        }
    }
}

/// Errors from the permission store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be reached.
    #[error("permission store unavailable: {0}")]
    Unavailable(String),

    /// An identifier the store was asked to resolve is malformed.
    #[error("malformed identifier '{id}': {reason}")]
    MalformedId { id: String, reason: String },
}

/// Errors from the policy-evaluation engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The policy model or its rule source is invalid or unloadable.
    #[error("cannot compile policy: {0}")]
    Compilation(String),

    /// The engine failed while evaluating a request.
    #[error("evaluation failed: {0}")]
    Evaluation(String),
}
