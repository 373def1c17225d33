//! Snapshot comparison.
//!
//! # Data Flow
//! ```text
//! applied snapshot ─┐
//!                   ├─→ peer_group_changes → ChangeSet<PeerGroup>
//! new snapshot ─────┤─→ neighbor_changes   → ChangeSet<Neighbor>
//!                   └─→ policy_changed     → bool
//! ```
//!
//! # Design Decisions
//! - Pure functions over immutable snapshots, callable from any task
//! - Peer groups and neighbors get a three-way diff so that unaffected
//!   sessions are left alone
//! - Routing policy is all-or-nothing because statement order matters
//! - Equality is the derived `PartialEq` of each entity

pub mod change_set;
pub mod peers;
pub mod policy;

use std::sync::Arc;

use crate::config::schema::{ConfigSnapshot, Neighbor, PeerGroup};

pub use change_set::{diff_keyed, ChangeSet, Keyed};
pub use peers::{neighbor_changes, peer_group_changes};
pub use policy::policy_changed;

/// Everything that differs between two snapshots.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigChanges {
    /// Global settings differ. These cannot be applied without a restart.
    pub global_changed: bool,
    pub peer_groups: ChangeSet<PeerGroup>,
    pub neighbors: ChangeSet<Neighbor>,
    pub policy_changed: bool,
}

impl ConfigChanges {
    pub fn between(current: &ConfigSnapshot, new: &ConfigSnapshot) -> Self {
        Self {
            global_changed: current.global != new.global,
            peer_groups: peer_group_changes(current, new),
            neighbors: neighbor_changes(current, new),
            policy_changed: policy_changed(Some(current.routing_policy()), Some(new.routing_policy())),
        }
    }

    /// Changes for the first snapshot: everything is new.
    pub fn initial(new: &ConfigSnapshot) -> Self {
        let empty = ConfigSnapshot::default();
        Self {
            global_changed: false,
            peer_groups: peer_group_changes(&empty, new),
            neighbors: neighbor_changes(&empty, new),
            policy_changed: policy_changed(None, Some(new.routing_policy())),
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.global_changed
            && !self.policy_changed
            && self.peer_groups.is_empty()
            && self.neighbors.is_empty()
    }
}

/// Consumer-side record of the last applied snapshot.
///
/// Diffs are taken against what was applied, not what was last received.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    applied: Option<Arc<ConfigSnapshot>>,
}

impl ChangeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn applied(&self) -> Option<&Arc<ConfigSnapshot>> {
        self.applied.as_ref()
    }

    pub fn changes(&self, new: &ConfigSnapshot) -> ConfigChanges {
        match &self.applied {
            Some(current) => ConfigChanges::between(current, new),
            None => ConfigChanges::initial(new),
        }
    }

    /// Record `snapshot` as applied.
    pub fn commit(&mut self, snapshot: Arc<ConfigSnapshot>) {
        self.applied = Some(snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ConfigSnapshot {
        let mut config = ConfigSnapshot::default();
        config.global.config.as_number = 64512;
        config.peer_groups.push(PeerGroup::new("upstream", 65001));
        config.neighbors.push(Neighbor::new("10.0.0.1".parse().unwrap(), 65001));
        config
    }

    #[test]
    fn test_initial_changes() {
        let config = snapshot();
        let changes = ConfigChanges::initial(&config);

        assert!(!changes.global_changed);
        assert_eq!(changes.peer_groups.added.len(), 1);
        assert_eq!(changes.neighbors.added.len(), 1);
        assert!(changes.policy_changed);
    }

    #[test]
    fn test_between_identical_is_empty() {
        let config = snapshot();
        assert!(ConfigChanges::between(&config, &config.clone()).is_empty());
    }

    #[test]
    fn test_global_change_flagged() {
        let current = snapshot();
        let mut new = current.clone();
        new.global.config.router_id = "192.0.2.9".parse().unwrap();

        let changes = ConfigChanges::between(&current, &new);
        assert!(changes.global_changed);
        assert!(changes.peer_groups.is_empty());
        assert!(!changes.is_empty());
    }

    #[test]
    fn test_tracker_diffs_against_applied() {
        let mut tracker = ChangeTracker::new();
        let first = Arc::new(snapshot());
        assert_eq!(tracker.changes(&first).neighbors.added.len(), 1);
        tracker.commit(first.clone());

        let mut second = (*first).clone();
        second.neighbors.push(Neighbor::new("10.0.0.2".parse().unwrap(), 65002));

        // Received but not committed: the next diff is still against `first`
        let _ = tracker.changes(&second);
        let mut third = second.clone();
        third.neighbors.push(Neighbor::new("10.0.0.3".parse().unwrap(), 65003));

        let changes = tracker.changes(&third);
        assert_eq!(changes.neighbors.added.len(), 2);
        assert!(Arc::ptr_eq(tracker.applied().unwrap(), &first));
    }
}
