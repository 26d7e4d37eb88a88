//! Rule-matching policy engine.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use authz_gate_sdk::{
    AccessRequest, EngineError, Evaluator, PermissionScope, PolicyEngine, PolicyIdentity,
};
use tracing::debug;

use crate::config::StaticPolicyConfig;
use crate::error::StaticPolicyError;

const WILDCARD: &str = "*";

/// One compiled rule row, tagged with its owning permission.
#[derive(Debug, Clone)]
struct Rule {
    permission_id: String,
    subject: String,
    object: String,
    action: String,
    domain: Option<String>,
}

impl Rule {
    fn matches(&self, request: &AccessRequest) -> bool {
        field_matches(&self.subject, request.subject())
            && field_matches(&self.object, request.object())
            && field_matches(&self.action, request.action())
            && domain_matches(self.domain.as_deref(), request.domain())
    }
}

fn field_matches(rule_field: &str, value: &str) -> bool {
    rule_field == WILDCARD || rule_field == value
}

/// A rule without a domain is domain-agnostic; a rule with one requires
/// the request to carry a matching domain.
fn domain_matches(rule_domain: Option<&str>, request_domain: Option<&str>) -> bool {
    match (rule_domain, request_domain) {
        (None, _) => true,
        (Some(rule), Some(request)) => field_matches(rule, request),
        (Some(_), None) => false,
    }
}

/// Policy engine whose rule tables come from the plugin config.
///
/// "Compilation" resolves the identity's rule table into a shared rule
/// slice; an identity with no configured table is a compilation error, the
/// same way a missing rule source would be for a real engine.
#[derive(Debug)]
pub struct StaticPolicyEngine {
    tables: HashMap<PolicyIdentity, Arc<[Rule]>>,
}

impl StaticPolicyEngine {
    /// Build the engine from config.
    ///
    /// # Errors
    ///
    /// [`StaticPolicyError::UnknownPermission`] if a rule names a
    /// permission that is not in the permission table.
    pub fn from_config(config: &StaticPolicyConfig) -> Result<Self, StaticPolicyError> {
        let identities: HashMap<&str, PolicyIdentity> = config
            .permissions
            .iter()
            .map(|entry| {
                (
                    entry.id.as_str(),
                    PolicyIdentity::new(entry.model.clone(), entry.adapter.clone()),
                )
            })
            .collect();

        let mut tables: HashMap<PolicyIdentity, Vec<Rule>> = HashMap::new();
        for rule in &config.rules {
            let identity = identities.get(rule.permission.as_str()).ok_or_else(|| {
                StaticPolicyError::UnknownPermission {
                    permission: rule.permission.clone(),
                }
            })?;
            tables.entry(identity.clone()).or_default().push(Rule {
                permission_id: rule.permission.clone(),
                subject: rule.subject.clone(),
                object: rule.object.clone(),
                action: rule.action.clone(),
                domain: rule.domain.clone(),
            });
        }

        // Permissions without rules still get an (empty) table, so binding
        // them succeeds and denies everything.
        for identity in identities.values() {
            tables.entry(identity.clone()).or_default();
        }

        Ok(Self {
            tables: tables
                .into_iter()
                .map(|(identity, rules)| (identity, rules.into()))
                .collect(),
        })
    }
}

#[async_trait]
impl PolicyEngine for StaticPolicyEngine {
    async fn compile(&self, identity: &PolicyIdentity) -> Result<Arc<dyn Evaluator>, EngineError> {
        let rules = self.tables.get(identity).ok_or_else(|| {
            EngineError::Compilation(format!("no rule table for policy '{identity}'"))
        })?;
        debug!(policy = %identity, rule_count = rules.len(), "compiled static rule table");
        Ok(Arc::new(StaticEvaluator {
            rules: Arc::clone(rules),
        }))
    }
}

/// Evaluator over a compiled rule slice.
struct StaticEvaluator {
    rules: Arc<[Rule]>,
}

impl StaticEvaluator {
    fn decide(&self, request: &AccessRequest, scope: Option<&PermissionScope>) -> bool {
        self.rules.iter().any(|rule| {
            scope.is_none_or(|scope| scope.contains(&rule.permission_id)) && rule.matches(request)
        })
    }
}

#[async_trait]
impl Evaluator for StaticEvaluator {
    async fn evaluate(
        &self,
        request: &AccessRequest,
        scope: Option<&PermissionScope>,
    ) -> Result<bool, EngineError> {
        Ok(self.decide(request, scope))
    }

    async fn evaluate_batch(
        &self,
        requests: &[AccessRequest],
        scope: Option<&PermissionScope>,
    ) -> Result<Vec<bool>, EngineError> {
        Ok(requests
            .iter()
            .map(|request| self.decide(request, scope))
            .collect())
    }
}
