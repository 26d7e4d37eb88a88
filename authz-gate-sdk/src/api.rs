//! Public API trait for the `authz_gate` module.

use async_trait::async_trait;

use crate::error::DecisionError;
use crate::models::AccessRequest;
use crate::selector::Selector;

/// Public API trait for the authorization decision gate.
///
/// Implementations resolve the selector to a set of permission groups and
/// return one decision per group (or a single decision for the explicit
/// evaluator/permission paths):
///
/// ```ignore
/// let decisions = gate.decide(&selector, &request).await?;
/// let granted = decisions.iter().any(|d| *d);
/// ```
#[async_trait]
pub trait DecisionClient: Send + Sync {
    /// Decide a single access request.
    ///
    /// Returns one boolean per resolved permission group, in group order.
    /// The explicit-evaluator and explicit-permission paths return a single
    /// entry; a resource selector covering no permissions returns an empty
    /// list.
    ///
    /// # Errors
    ///
    /// - `EvaluatorNotFound` if the selector names an unregistered evaluator
    /// - `Lookup` if the permission store fails
    /// - `Compilation` / `Evaluation` if the engine fails
    async fn decide(
        &self,
        selector: &Selector,
        request: &AccessRequest,
    ) -> Result<Vec<bool>, DecisionError>;

    /// Decide an ordered batch of access requests.
    ///
    /// Returns one row per resolved permission group, each row aligned to
    /// the input request order. Any group failing fails the whole call; no
    /// partial matrix is returned.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if the request list is empty
    /// - `EvaluatorNotFound` if the selector names an unregistered evaluator
    /// - `Lookup` if the permission store fails
    /// - `Compilation` / `Evaluation` if the engine fails
    async fn decide_batch(
        &self,
        selector: &Selector,
        requests: &[AccessRequest],
    ) -> Result<Vec<Vec<bool>>, DecisionError>;
}
