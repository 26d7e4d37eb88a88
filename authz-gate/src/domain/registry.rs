//! Process-wide registry of pre-initialized evaluators.

use std::collections::HashMap;
use std::sync::Arc;

use authz_gate_sdk::{Evaluator, EvaluatorRegistry};
use parking_lot::RwLock;
use tracing::debug;

/// The default [`EvaluatorRegistry`] implementation.
///
/// An explicit service object with its own lifecycle: the integrating
/// system creates it at startup, registers evaluators as it initializes
/// them, and removes entries when the backing policy changes. Lookup is
/// read-mostly, registration rare.
#[derive(Default)]
pub struct SharedEvaluatorRegistry {
    entries: RwLock<HashMap<String, Arc<dyn Evaluator>>>,
}

impl SharedEvaluatorRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `evaluator` under `id`, replacing any previous entry.
    pub fn register(&self, id: impl Into<String>, evaluator: Arc<dyn Evaluator>) {
        let id = id.into();
        debug!(evaluator_id = %id, "registered evaluator");
        self.entries.write().insert(id, evaluator);
    }

    /// Remove the evaluator registered under `id`.
    ///
    /// Returns `true` if an entry was present.
    pub fn remove(&self, id: &str) -> bool {
        self.entries.write().remove(id).is_some()
    }
}

impl EvaluatorRegistry for SharedEvaluatorRegistry {
    fn get(&self, evaluator_id: &str) -> Option<Arc<dyn Evaluator>> {
        self.entries.read().get(evaluator_id).cloned()
    }
}
