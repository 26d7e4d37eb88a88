//! Domain errors for the decision gate.

use authz_gate_sdk::{DecisionError, EngineError, StoreError};

/// Internal domain errors.
#[derive(Debug, thiserror::Error)]
pub enum DomainError {
    #[error("request payload is empty")]
    EmptyInput,

    #[error("no evaluator registered under '{id}'")]
    EvaluatorNotFound { id: String },

    #[error("permission lookup failed: {0}")]
    Lookup(String),

    #[error("policy compilation failed: {0}")]
    Compilation(String),

    #[error("policy evaluation failed: {0}")]
    Evaluation(String),
}

impl From<StoreError> for DomainError {
    fn from(e: StoreError) -> Self {
        Self::Lookup(e.to_string())
    }
}

impl From<EngineError> for DomainError {
    fn from(e: EngineError) -> Self {
        match e {
            EngineError::Compilation(reason) => Self::Compilation(reason),
            EngineError::Evaluation(reason) => Self::Evaluation(reason),
        }
    }
}

impl From<DomainError> for DecisionError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::EmptyInput => Self::EmptyInput,
            DomainError::EvaluatorNotFound { id } => Self::EvaluatorNotFound(id),
            DomainError::Lookup(reason) => Self::Lookup(reason),
            DomainError::Compilation(reason) => Self::Compilation(reason),
            DomainError::Evaluation(reason) => Self::Evaluation(reason),
        }
    }
}
