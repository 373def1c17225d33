//! Routing-policy change detection.
//!
//! Policy statements are evaluated in order, so downstream replaces the
//! whole policy at once. The diff only answers whether anything changed.

use crate::config::schema::RoutingPolicy;

/// Returns true if the routing policy must be replaced.
///
/// `None` means no policy was configured on that side.
pub fn policy_changed<'a>(current: Option<RoutingPolicy<'a>>, new: Option<RoutingPolicy<'a>>) -> bool {
    tracing::debug!(current = ?current, new = ?new, "Comparing routing policy");

    match (current, new) {
        (None, None) => false,
        (Some(current), Some(new)) => current != new,
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{
        ConfigSnapshot, PolicyDefinition, PrefixSet, RouteDisposition, Statement,
    };

    fn policy(name: &str, disposition: RouteDisposition) -> PolicyDefinition {
        let mut statement = Statement {
            name: format!("{name}-stmt"),
            ..Default::default()
        };
        statement.actions.route_disposition = disposition;
        PolicyDefinition {
            name: name.to_string(),
            statements: vec![statement],
        }
    }

    fn snapshot(policies: Vec<PolicyDefinition>) -> ConfigSnapshot {
        ConfigSnapshot {
            policy_definitions: policies,
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_policies() {
        let snap = snapshot(vec![]);
        assert!(!policy_changed(None, None));
        assert!(policy_changed(None, Some(snap.routing_policy())));
        assert!(policy_changed(Some(snap.routing_policy()), None));
    }

    #[test]
    fn test_identical_policy_unchanged() {
        let a = snapshot(vec![policy("p1", RouteDisposition::AcceptRoute)]);
        let b = a.clone();
        assert!(!policy_changed(Some(a.routing_policy()), Some(b.routing_policy())));
    }

    #[test]
    fn test_definition_order_matters() {
        let a = snapshot(vec![
            policy("p1", RouteDisposition::AcceptRoute),
            policy("p2", RouteDisposition::RejectRoute),
        ]);
        let b = snapshot(vec![
            policy("p2", RouteDisposition::RejectRoute),
            policy("p1", RouteDisposition::AcceptRoute),
        ]);
        assert!(policy_changed(Some(a.routing_policy()), Some(b.routing_policy())));
    }

    #[test]
    fn test_defined_set_change_detected() {
        let a = snapshot(vec![policy("p1", RouteDisposition::AcceptRoute)]);
        let mut b = a.clone();
        b.defined_sets.prefix_sets.push(PrefixSet {
            prefix_set_name: "customers".into(),
            prefix_list: Vec::new(),
        });
        assert!(policy_changed(Some(a.routing_policy()), Some(b.routing_policy())));
    }

    #[test]
    fn test_unrelated_sections_ignored() {
        let a = snapshot(vec![policy("p1", RouteDisposition::AcceptRoute)]);
        let mut b = a.clone();
        b.global.config.as_number = 65000;
        assert!(!policy_changed(Some(a.routing_policy()), Some(b.routing_policy())));
    }
}
