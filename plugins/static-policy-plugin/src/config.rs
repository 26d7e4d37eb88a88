//! Configuration for the static policy plugin.

use serde::Deserialize;

/// Configuration: the permission table and the rule table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticPolicyConfig {
    /// Permission records served by the store.
    pub permissions: Vec<PermissionEntry>,
    /// Policy rules, each owned by a permission.
    pub rules: Vec<RuleEntry>,
}

/// One permission record.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PermissionEntry {
    /// Unique `owner/name` identifier.
    pub id: String,
    /// Policy model the permission is checked against.
    pub model: String,
    /// Rule source backing that model.
    pub adapter: String,
    /// Resources the permission applies to.
    #[serde(default)]
    pub resources: Vec<String>,
}

/// One policy rule. `*` matches any value in the subject, object and
/// action positions.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleEntry {
    /// Identifier of the owning permission.
    pub permission: String,
    pub subject: String,
    pub object: String,
    pub action: String,
    /// Absent means the rule is domain-agnostic.
    #[serde(default)]
    pub domain: Option<String>,
}
