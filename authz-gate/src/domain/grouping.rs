//! Partitioning of permissions by compiled-policy identity.

use std::collections::HashMap;

use authz_gate_sdk::{Permission, PermissionGroup, PolicyIdentity};

/// Partition permissions into groups sharing a [`PolicyIdentity`].
///
/// Deterministic and order-preserving: groups appear in first-seen order of
/// their identity, and within a group permission ids retain their relative
/// order from the input. Compiling a policy dominates the cost of deciding
/// against it, so one compiled evaluator serves every permission in a group.
#[must_use]
pub fn group_by_policy(permissions: &[Permission]) -> Vec<PermissionGroup> {
    let mut index: HashMap<PolicyIdentity, usize> = HashMap::new();
    let mut groups: Vec<PermissionGroup> = Vec::new();

    for permission in permissions {
        let identity = permission.policy_identity();
        if let Some(&at) = index.get(&identity) {
            groups[at].permission_ids.push(permission.id.clone());
        } else {
            index.insert(identity.clone(), groups.len());
            groups.push(PermissionGroup {
                identity,
                permission_ids: vec![permission.id.clone()],
            });
        }
    }

    groups
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::collections::BTreeSet;

    use super::*;

    fn permission(id: &str, model: &str, adapter: &str) -> Permission {
        Permission {
            id: id.to_owned(),
            model_id: model.to_owned(),
            adapter_id: adapter.to_owned(),
            resources: vec![],
        }
    }

    #[test]
    fn empty_input_yields_no_groups() {
        assert!(group_by_policy(&[]).is_empty());
    }

    #[test]
    fn single_identity_yields_one_group_in_input_order() {
        let permissions = vec![
            permission("p2", "m1", "a1"),
            permission("p1", "m1", "a1"),
            permission("p3", "m1", "a1"),
        ];

        let groups = group_by_policy(&permissions);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].permission_ids, vec!["p2", "p1", "p3"]);
    }

    #[test]
    fn groups_follow_first_seen_identity_order() {
        let permissions = vec![
            permission("p1", "m1", "a1"),
            permission("p3", "m1", "a2"),
            permission("p2", "m1", "a1"),
            permission("p4", "m2", "a1"),
        ];

        let groups = group_by_policy(&permissions);
        assert_eq!(groups.len(), 3);
        assert_eq!(groups[0].identity, PolicyIdentity::new("m1", "a1"));
        assert_eq!(groups[0].permission_ids, vec!["p1", "p2"]);
        assert_eq!(groups[1].identity, PolicyIdentity::new("m1", "a2"));
        assert_eq!(groups[1].permission_ids, vec!["p3"]);
        assert_eq!(groups[2].identity, PolicyIdentity::new("m2", "a1"));
        assert_eq!(groups[2].permission_ids, vec!["p4"]);
    }

    #[test]
    fn groups_are_disjoint_and_cover_the_input() {
        let permissions = vec![
            permission("p1", "m1", "a1"),
            permission("p2", "m1", "a2"),
            permission("p3", "m2", "a1"),
            permission("p4", "m1", "a1"),
            permission("p5", "m2", "a2"),
        ];

        let groups = group_by_policy(&permissions);

        let mut seen = BTreeSet::new();
        for group in &groups {
            for id in &group.permission_ids {
                assert!(seen.insert(id.clone()), "{id} appears in two groups");
            }
        }
        let expected: BTreeSet<String> = permissions.iter().map(|p| p.id.clone()).collect();
        assert_eq!(seen, expected);
    }
}
