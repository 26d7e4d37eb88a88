//! Evaluator binding and the compiled-evaluator cache.

use std::sync::Arc;
use std::time::{Duration, Instant};

use authz_gate_sdk::{Evaluator, PolicyEngine, PolicyIdentity};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use super::error::DomainError;

/// Memoizes compiled evaluators per [`PolicyIdentity`].
///
/// Compiling a policy model is the most expensive operation in the system,
/// so each identity is compiled at most once and the *unscoped* evaluator is
/// cached; scoping is applied per evaluation call on top of the cached form.
///
/// Binding uses a per-key single-flight pattern: a sync fast-path read, then
/// a per-identity build lock with a re-check after acquiring, so concurrent
/// first-use of one identity never compiles twice and never observes a
/// partially built evaluator.
///
/// The cache never invalidates itself on policy change; the owning system
/// either calls [`EvaluatorCache::invalidate`] from its change signal or
/// sets a TTL via [`EvaluatorCache::with_ttl`].
pub struct EvaluatorCache {
    engine: Arc<dyn PolicyEngine>,
    ttl: Option<Duration>,
    compiled: DashMap<PolicyIdentity, CacheEntry>,
    build_locks: DashMap<PolicyIdentity, Arc<Mutex<()>>>,
}

struct CacheEntry {
    evaluator: Arc<dyn Evaluator>,
    built_at: Instant,
}

impl CacheEntry {
    fn is_fresh(&self, ttl: Option<Duration>) -> bool {
        ttl.is_none_or(|ttl| self.built_at.elapsed() < ttl)
    }
}

impl EvaluatorCache {
    #[must_use]
    pub fn new(engine: Arc<dyn PolicyEngine>) -> Self {
        Self {
            engine,
            ttl: None,
            compiled: DashMap::new(),
            build_locks: DashMap::new(),
        }
    }

    /// Bound the lifetime of cached evaluators.
    #[must_use]
    pub fn with_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// Obtain the compiled evaluator for `identity`, compiling on first use.
    ///
    /// # Errors
    ///
    /// [`DomainError::Compilation`] if the engine cannot compile the
    /// identity's model or rule source.
    pub async fn bind(&self, identity: &PolicyIdentity) -> Result<Arc<dyn Evaluator>, DomainError> {
        // Fast path: already compiled and fresh.
        if let Some(hit) = self.lookup_fresh(identity) {
            return Ok(hit);
        }

        let lock = self.build_lock(identity);
        let _build_guard = lock.lock().await;

        // Re-check after acquiring the lock (another caller may have built).
        if let Some(hit) = self.lookup_fresh(identity) {
            return Ok(hit);
        }

        let evaluator = self.engine.compile(identity).await?;
        self.compiled.insert(
            identity.clone(),
            CacheEntry {
                evaluator: Arc::clone(&evaluator),
                built_at: Instant::now(),
            },
        );
        debug!(policy = %identity, "compiled policy evaluator");

        Ok(evaluator)
    }

    /// Drop the cached evaluator for `identity`.
    ///
    /// Returns `true` if an entry was present. The next bind recompiles.
    pub fn invalidate(&self, identity: &PolicyIdentity) -> bool {
        self.compiled.remove(identity).is_some()
    }

    /// Drop every cached evaluator.
    pub fn clear(&self) {
        self.compiled.clear();
    }

    fn lookup_fresh(&self, identity: &PolicyIdentity) -> Option<Arc<dyn Evaluator>> {
        let entry = self.compiled.get(identity)?;
        entry
            .is_fresh(self.ttl)
            .then(|| Arc::clone(&entry.evaluator))
    }

    fn build_lock(&self, identity: &PolicyIdentity) -> Arc<Mutex<()>> {
        Arc::clone(&self.build_locks.entry(identity.clone()).or_default())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use authz_gate_sdk::{AccessRequest, EngineError, PermissionScope};

    use super::*;

    struct GrantAll;

    #[async_trait]
    impl Evaluator for GrantAll {
        async fn evaluate(
            &self,
            _request: &AccessRequest,
            _scope: Option<&PermissionScope>,
        ) -> Result<bool, EngineError> {
            Ok(true)
        }

        async fn evaluate_batch(
            &self,
            requests: &[AccessRequest],
            _scope: Option<&PermissionScope>,
        ) -> Result<Vec<bool>, EngineError> {
            Ok(vec![true; requests.len()])
        }
    }

    /// Engine that counts compilations and yields before returning, so
    /// concurrent binds genuinely overlap.
    #[derive(Default)]
    struct CountingEngine {
        compiles: AtomicUsize,
    }

    #[async_trait]
    impl PolicyEngine for CountingEngine {
        async fn compile(
            &self,
            _identity: &PolicyIdentity,
        ) -> Result<Arc<dyn Evaluator>, EngineError> {
            self.compiles.fetch_add(1, Ordering::SeqCst);
            tokio::task::yield_now().await;
            Ok(Arc::new(GrantAll))
        }
    }

    struct BrokenEngine;

    #[async_trait]
    impl PolicyEngine for BrokenEngine {
        async fn compile(
            &self,
            identity: &PolicyIdentity,
        ) -> Result<Arc<dyn Evaluator>, EngineError> {
            Err(EngineError::Compilation(format!(
                "rule source for '{identity}' is unloadable"
            )))
        }
    }

    #[tokio::test]
    async fn concurrent_binds_compile_once() {
        let engine = Arc::new(CountingEngine::default());
        let cache = Arc::new(EvaluatorCache::new(Arc::clone(&engine) as Arc<dyn PolicyEngine>));
        let identity = PolicyIdentity::new("m1", "a1");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let cache = Arc::clone(&cache);
                let identity = identity.clone();
                tokio::spawn(async move { cache.bind(&identity).await.map(|_| ()) })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        assert_eq!(engine.compiles.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn distinct_identities_compile_separately() {
        let engine = Arc::new(CountingEngine::default());
        let cache = EvaluatorCache::new(Arc::clone(&engine) as Arc<dyn PolicyEngine>);

        cache.bind(&PolicyIdentity::new("m1", "a1")).await.unwrap();
        cache.bind(&PolicyIdentity::new("m1", "a2")).await.unwrap();
        cache.bind(&PolicyIdentity::new("m1", "a1")).await.unwrap();

        assert_eq!(engine.compiles.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn invalidate_forces_recompilation() {
        let engine = Arc::new(CountingEngine::default());
        let cache = EvaluatorCache::new(Arc::clone(&engine) as Arc<dyn PolicyEngine>);
        let identity = PolicyIdentity::new("m1", "a1");

        cache.bind(&identity).await.unwrap();
        assert!(cache.invalidate(&identity));
        assert!(!cache.invalidate(&identity));
        cache.bind(&identity).await.unwrap();

        assert_eq!(engine.compiles.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn expired_entries_are_rebuilt() {
        let engine = Arc::new(CountingEngine::default());
        let cache =
            EvaluatorCache::new(Arc::clone(&engine) as Arc<dyn PolicyEngine>).with_ttl(Some(Duration::ZERO));
        let identity = PolicyIdentity::new("m1", "a1");

        cache.bind(&identity).await.unwrap();
        cache.bind(&identity).await.unwrap();

        assert_eq!(engine.compiles.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn compilation_failure_surfaces_and_is_not_cached() {
        let cache = EvaluatorCache::new(Arc::new(BrokenEngine));
        let identity = PolicyIdentity::new("m1", "a1");

        let Err(err) = cache.bind(&identity).await else {
            panic!("expected compilation error");
        };
        assert!(matches!(err, DomainError::Compilation(_)));

        // Still fails on retry; no poisoned entry was cached.
        let Err(err) = cache.bind(&identity).await else {
            panic!("expected compilation error");
        };
        assert!(matches!(err, DomainError::Compilation(_)));
    }
}
