//! Decision models for the `authz_gate` module.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// An access-control request: the ordered tuple submitted for a decision.
///
/// The wire form is an ordered array of three or four strings:
/// `[subject, object, action]` or `[subject, object, action, domain]`.
/// Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct AccessRequest {
    subject: String,
    object: String,
    action: String,
    domain: Option<String>,
}

impl AccessRequest {
    /// Create a request without a domain field.
    pub fn new(
        subject: impl Into<String>,
        object: impl Into<String>,
        action: impl Into<String>,
    ) -> Self {
        Self {
            subject: subject.into(),
            object: object.into(),
            action: action.into(),
            domain: None,
        }
    }

    /// Attach a domain/tenant field.
    #[must_use]
    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    #[must_use]
    pub fn subject(&self) -> &str {
        &self.subject
    }

    #[must_use]
    pub fn object(&self) -> &str {
        &self.object
    }

    #[must_use]
    pub fn action(&self) -> &str {
        &self.action
    }

    #[must_use]
    pub fn domain(&self) -> Option<&str> {
        self.domain.as_deref()
    }
}

/// A request tuple whose wire form did not have three or four fields.
#[derive(Debug, Error)]
#[error("access request must have 3 or 4 fields, got {0}")]
pub struct MalformedRequest(pub usize);

impl TryFrom<Vec<String>> for AccessRequest {
    type Error = MalformedRequest;

    fn try_from(fields: Vec<String>) -> Result<Self, Self::Error> {
        let len = fields.len();
        let mut fields = fields.into_iter();
        match (fields.next(), fields.next(), fields.next(), fields.next()) {
            (Some(subject), Some(object), Some(action), domain) if len <= 4 => Ok(Self {
                subject,
                object,
                action,
                domain,
            }),
            _ => Err(MalformedRequest(len)),
        }
    }
}

impl From<AccessRequest> for Vec<String> {
    fn from(request: AccessRequest) -> Self {
        let mut fields = vec![request.subject, request.object, request.action];
        if let Some(domain) = request.domain {
            fields.push(domain);
        }
        fields
    }
}

/// A stored permission record: a named rule set and the policy identity it
/// is checked against.
///
/// Records are owned and mutated by the permission store; the gate only
/// reads them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    /// Unique identifier (an `owner/name` composite).
    pub id: String,
    /// Identifier of the policy model this permission is checked against.
    pub model_id: String,
    /// Identifier of the rule source (adapter) backing that model.
    pub adapter_id: String,
    /// Resources this permission applies to.
    #[serde(default)]
    pub resources: Vec<String>,
}

impl Permission {
    /// The evaluator-reuse key for this permission.
    #[must_use]
    pub fn policy_identity(&self) -> PolicyIdentity {
        PolicyIdentity::new(self.model_id.clone(), self.adapter_id.clone())
    }
}

/// The (model, adapter) pair that determines evaluator reuse.
///
/// Two permissions may share one compiled evaluator iff their identities
/// are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PolicyIdentity {
    pub model_id: String,
    pub adapter_id: String,
}

impl PolicyIdentity {
    pub fn new(model_id: impl Into<String>, adapter_id: impl Into<String>) -> Self {
        Self {
            model_id: model_id.into(),
            adapter_id: adapter_id.into(),
        }
    }
}

impl fmt::Display for PolicyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model_id, self.adapter_id)
    }
}

/// A policy identity plus the permissions sharing it, in input order.
///
/// Derived and ephemeral: recomputed per request, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermissionGroup {
    pub identity: PolicyIdentity,
    pub permission_ids: Vec<String>,
}

impl PermissionGroup {
    /// The evaluation scope covering exactly this group's permissions.
    #[must_use]
    pub fn scope(&self) -> PermissionScope {
        self.permission_ids.iter().collect()
    }
}

/// An explicit set of permission identifiers restricting which rules an
/// evaluator may consult. Absent scope means unscoped evaluation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionScope(BTreeSet<String>);

impl PermissionScope {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, permission_id: &str) -> bool {
        self.0.contains(permission_id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<S: Into<String>> FromIterator<S> for PermissionScope {
    fn from_iter<I: IntoIterator<Item = S>>(ids: I) -> Self {
        Self(ids.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn request_wire_form_roundtrip() {
        let request = AccessRequest::new("alice", "data1", "read");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"["alice","data1","read"]"#);

        let parsed: AccessRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, request);
    }

    #[test]
    fn request_wire_form_with_domain() {
        let request = AccessRequest::new("alice", "data1", "read").with_domain("tenant-1");
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"["alice","data1","read","tenant-1"]"#);

        let parsed: AccessRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.domain(), Some("tenant-1"));
    }

    #[test]
    fn request_rejects_short_tuple() {
        let err = serde_json::from_str::<AccessRequest>(r#"["alice","data1"]"#).unwrap_err();
        assert!(err.to_string().contains("3 or 4 fields"));
    }

    #[test]
    fn request_rejects_long_tuple() {
        let err = serde_json::from_str::<AccessRequest>(r#"["a","b","c","d","e"]"#).unwrap_err();
        assert!(err.to_string().contains("got 5"));
    }

    #[test]
    fn request_rejects_empty_tuple() {
        let err = serde_json::from_str::<AccessRequest>("[]").unwrap_err();
        assert!(err.to_string().contains("got 0"));
    }

    #[test]
    fn permissions_sharing_model_and_adapter_are_evaluator_equivalent() {
        let p1 = Permission {
            id: "built-in/p1".to_owned(),
            model_id: "built-in/m1".to_owned(),
            adapter_id: "built-in/a1".to_owned(),
            resources: vec![],
        };
        let p2 = Permission {
            id: "built-in/p2".to_owned(),
            model_id: "built-in/m1".to_owned(),
            adapter_id: "built-in/a1".to_owned(),
            resources: vec!["app-x".to_owned()],
        };
        let p3 = Permission {
            id: "built-in/p3".to_owned(),
            model_id: "built-in/m1".to_owned(),
            adapter_id: "built-in/a2".to_owned(),
            resources: vec![],
        };

        assert_eq!(p1.policy_identity(), p2.policy_identity());
        assert_ne!(p1.policy_identity(), p3.policy_identity());
    }

    #[test]
    fn group_scope_covers_exactly_its_permissions() {
        let group = PermissionGroup {
            identity: PolicyIdentity::new("m1", "a1"),
            permission_ids: vec!["p1".to_owned(), "p2".to_owned()],
        };

        let scope = group.scope();
        assert_eq!(scope.len(), 2);
        assert!(scope.contains("p1"));
        assert!(scope.contains("p2"));
        assert!(!scope.contains("p3"));
    }
}
