//! Configuration for the decision gate.

use std::time::Duration;

use serde::Deserialize;

/// Configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthzGateConfig {
    /// Evaluator cache tuning.
    pub cache: CacheConfig,
}

/// Evaluator cache settings.
///
/// The gate never invalidates compiled evaluators on its own; a TTL is the
/// opt-in time bound for deployments where the rule source changes without
/// an invalidation signal.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// Maximum age of a compiled evaluator, in seconds. Absent means
    /// entries live until explicitly invalidated.
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    #[must_use]
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_secs.map(Duration::from_secs)
    }
}
