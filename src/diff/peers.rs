//! Peer-group and neighbor change sets.

use std::net::IpAddr;

use crate::config::schema::{ConfigSnapshot, Neighbor, PeerGroup};
use crate::diff::change_set::{diff_keyed, ChangeSet, Keyed};

impl Keyed for PeerGroup {
    type Key = str;

    fn key(&self) -> &str {
        &self.config.peer_group_name
    }
}

impl Keyed for Neighbor {
    type Key = IpAddr;

    fn key(&self) -> &IpAddr {
        &self.config.neighbor_address
    }
}

/// Peer groups added, deleted or updated, matched by name.
pub fn peer_group_changes(current: &ConfigSnapshot, new: &ConfigSnapshot) -> ChangeSet<PeerGroup> {
    diff_keyed(&current.peer_groups, &new.peer_groups)
}

/// Neighbors added, deleted or updated, matched by peer address.
pub fn neighbor_changes(current: &ConfigSnapshot, new: &ConfigSnapshot) -> ChangeSet<Neighbor> {
    diff_keyed(&current.neighbors, &new.neighbors)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_groups(groups: &[(&str, u32)]) -> ConfigSnapshot {
        ConfigSnapshot {
            peer_groups: groups.iter().map(|(name, asn)| PeerGroup::new(*name, *asn)).collect(),
            ..Default::default()
        }
    }

    fn with_neighbors(neighbors: &[(&str, u32)]) -> ConfigSnapshot {
        ConfigSnapshot {
            neighbors: neighbors
                .iter()
                .map(|(addr, asn)| Neighbor::new(addr.parse().unwrap(), *asn))
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_peer_group_added_and_updated() {
        let current = with_groups(&[("A", 65001)]);
        let new = with_groups(&[("A", 65002), ("B", 65003)]);

        let changes = peer_group_changes(&current, &new);
        assert_eq!(changes.added, vec![PeerGroup::new("B", 65003)]);
        assert!(changes.deleted.is_empty());
        assert_eq!(changes.updated, vec![PeerGroup::new("A", 65002)]);
    }

    #[test]
    fn test_neighbor_deleted() {
        let current = with_neighbors(&[("10.0.0.1", 65001), ("10.0.0.2", 65001)]);
        let new = with_neighbors(&[("10.0.0.1", 65001)]);

        let changes = neighbor_changes(&current, &new);
        assert!(changes.added.is_empty());
        assert_eq!(changes.deleted, vec![Neighbor::new("10.0.0.2".parse().unwrap(), 65001)]);
        assert!(changes.updated.is_empty());
    }

    #[test]
    fn test_no_op_reload_is_empty() {
        let snapshot = ConfigSnapshot {
            neighbors: with_neighbors(&[("10.0.0.1", 65001), ("2001:db8::2", 65002)]).neighbors,
            peer_groups: with_groups(&[("A", 65001), ("B", 65002)]).peer_groups,
            ..Default::default()
        };
        let reread = snapshot.clone();

        assert!(peer_group_changes(&snapshot, &reread).is_empty());
        assert!(neighbor_changes(&snapshot, &reread).is_empty());
    }

    #[test]
    fn test_added_and_deleted_are_antisymmetric() {
        let a = with_groups(&[("A", 1), ("B", 2), ("C", 3)]);
        let b = with_groups(&[("B", 20), ("C", 3), ("D", 4), ("E", 5)]);

        let forward = peer_group_changes(&a, &b);
        let backward = peer_group_changes(&b, &a);
        assert_eq!(forward.deleted, backward.added);
        assert_eq!(forward.added, backward.deleted);
        assert_eq!(forward.updated, vec![PeerGroup::new("B", 20)]);
        assert_eq!(backward.updated, vec![PeerGroup::new("B", 2)]);
    }

    #[test]
    fn test_field_change_is_update_not_replace() {
        let current = with_neighbors(&[("10.0.0.1", 65001)]);
        let mut new = current.clone();
        new.neighbors[0].config.description = "edge router".into();
        new.neighbors[0].timers.config.hold_time = 30;

        let changes = neighbor_changes(&current, &new);
        assert!(changes.added.is_empty());
        assert!(changes.deleted.is_empty());
        assert_eq!(changes.updated, vec![new.neighbors[0].clone()]);
    }

    #[test]
    fn test_reordering_is_not_a_change() {
        let current = with_neighbors(&[("10.0.0.1", 65001), ("10.0.0.2", 65002)]);
        let new = with_neighbors(&[("10.0.0.2", 65002), ("10.0.0.1", 65001)]);

        assert!(neighbor_changes(&current, &new).is_empty());
    }

    #[test]
    fn test_neighbor_keyed_by_address_value() {
        // Same address in a different textual form is the same neighbor
        let current = with_neighbors(&[("2001:db8:0:0::1", 65001)]);
        let new = with_neighbors(&[("2001:db8::1", 65009)]);

        let changes = neighbor_changes(&current, &new);
        assert!(changes.added.is_empty());
        assert!(changes.deleted.is_empty());
        assert_eq!(changes.updated.len(), 1);
    }
}
