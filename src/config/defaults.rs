//! Default-value population.
//!
//! # Responsibilities
//! - Fill in unset global, peer-group and neighbor settings
//! - Merge peer-group settings into the neighbors that reference them
//! - Reject snapshots whose identity keys are not unique
//!
//! # Design Decisions
//! - Runs after deserialization, before the snapshot leaves the loader
//! - Zero / empty values mean "not configured" and are eligible for defaults
//! - Peer groups are completed first so neighbors inherit finished values,
//!   except timers, which are inherited as configured and completed per session

use std::collections::{HashMap, HashSet};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use thiserror::Error;

use crate::config::schema::{
    AfiSafi, AfiSafiType, ConfigSnapshot, Neighbor, PeerGroup, Timers, TimersConfig,
};

pub const DEFAULT_BGP_PORT: u16 = 179;
pub const DEFAULT_CONNECT_RETRY_SECS: u32 = 120;
pub const DEFAULT_HOLD_TIME_SECS: u32 = 90;
pub const DEFAULT_EBGP_ADVERTISEMENT_INTERVAL_SECS: u32 = 30;
pub const DEFAULT_IBGP_ADVERTISEMENT_INTERVAL_SECS: u32 = 5;

/// Errors raised while populating defaults.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefaultsError {
    #[error("global config: as is missing")]
    MissingGlobalAs,

    #[error("duplicate peer-group name '{0}'")]
    DuplicatePeerGroup(String),

    #[error("duplicate neighbor address {0}")]
    DuplicateNeighbor(IpAddr),

    #[error("neighbor {neighbor}: no such peer-group '{peer_group}'")]
    UnknownPeerGroup { neighbor: IpAddr, peer_group: String },

    #[error("neighbor {0}: peer-as is missing")]
    MissingPeerAs(IpAddr),

    #[error("dynamic neighbor {prefix}: no such peer-group '{peer_group}'")]
    UnknownDynamicPeerGroup { prefix: String, peer_group: String },
}

/// Populate defaults in place.
pub fn apply_defaults(config: &mut ConfigSnapshot) -> Result<(), DefaultsError> {
    let global = &mut config.global.config;
    if global.as_number == 0 {
        return Err(DefaultsError::MissingGlobalAs);
    }
    if global.port == 0 {
        global.port = DEFAULT_BGP_PORT;
    }
    if global.local_address_list.is_empty() {
        global.local_address_list = vec![
            IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            IpAddr::V6(Ipv6Addr::UNSPECIFIED),
        ];
    }
    let global_as = global.as_number;

    check_unique_keys(config)?;

    // Neighbors inherit the timers a group was configured with, not the
    // completed ones: the advertisement interval depends on each session.
    let configured_timers: HashMap<String, Timers> = config
        .peer_groups
        .iter()
        .map(|pg| (pg.name().to_string(), pg.timers.clone()))
        .collect();

    for group in &mut config.peer_groups {
        complete_peer_group(group, global_as);
    }

    let groups: HashMap<&str, (&PeerGroup, &Timers)> = config
        .peer_groups
        .iter()
        .filter_map(|pg| {
            configured_timers
                .get(pg.name())
                .map(|timers| (pg.name(), (pg, timers)))
        })
        .collect();

    for neighbor in &mut config.neighbors {
        if let Some(name) = neighbor.config.peer_group.as_deref() {
            let (group, timers) = groups.get(name).ok_or_else(|| DefaultsError::UnknownPeerGroup {
                neighbor: neighbor.address(),
                peer_group: name.to_string(),
            })?;
            inherit_from_group(neighbor, group, timers);
        }
        complete_neighbor(neighbor, global_as)?;
    }

    for dynamic in &config.dynamic_neighbors {
        if !groups.contains_key(dynamic.config.peer_group.as_str()) {
            return Err(DefaultsError::UnknownDynamicPeerGroup {
                prefix: dynamic.config.prefix.clone(),
                peer_group: dynamic.config.peer_group.clone(),
            });
        }
    }

    Ok(())
}

fn check_unique_keys(config: &ConfigSnapshot) -> Result<(), DefaultsError> {
    let mut names = HashSet::new();
    for group in &config.peer_groups {
        if !names.insert(group.name()) {
            return Err(DefaultsError::DuplicatePeerGroup(group.name().to_string()));
        }
    }

    let mut addresses = HashSet::new();
    for neighbor in &config.neighbors {
        if !addresses.insert(neighbor.address()) {
            return Err(DefaultsError::DuplicateNeighbor(neighbor.address()));
        }
    }
    Ok(())
}

fn complete_peer_group(group: &mut PeerGroup, global_as: u32) {
    if group.config.local_as == 0 {
        group.config.local_as = global_as;
    }
    let ibgp = (group.config.peer_as != 0).then(|| group.config.peer_as == group.config.local_as);
    fill_timers(&mut group.timers.config, ibgp);
    if group.transport.config.remote_port == 0 {
        group.transport.config.remote_port = DEFAULT_BGP_PORT;
    }
}

/// Copy every unset neighbor setting from its peer group.
///
/// `timers` are the group's timers as configured, before defaults.
fn inherit_from_group(neighbor: &mut Neighbor, group: &PeerGroup, timers: &Timers) {
    let config = &mut neighbor.config;
    if config.peer_as == 0 {
        config.peer_as = group.config.peer_as;
    }
    if config.local_as == 0 {
        config.local_as = group.config.local_as;
    }
    if config.description.is_empty() {
        config.description = group.config.description.clone();
    }
    if config.auth_password.is_empty() {
        config.auth_password = group.config.auth_password.clone();
    }

    if neighbor.timers == Default::default() {
        neighbor.timers = timers.clone();
    }
    if neighbor.transport == Default::default() {
        neighbor.transport = group.transport.clone();
    }
    if neighbor.afi_safis.is_empty() {
        neighbor.afi_safis = group.afi_safis.clone();
    }
    if neighbor.apply_policy == Default::default() {
        neighbor.apply_policy = group.apply_policy.clone();
    }
    if neighbor.route_reflector == Default::default() {
        neighbor.route_reflector = group.route_reflector.clone();
    }
    if neighbor.ebgp_multihop == Default::default() {
        neighbor.ebgp_multihop = group.ebgp_multihop.clone();
    }
}

fn complete_neighbor(neighbor: &mut Neighbor, global_as: u32) -> Result<(), DefaultsError> {
    if neighbor.config.local_as == 0 {
        neighbor.config.local_as = global_as;
    }
    if neighbor.config.peer_as == 0 {
        return Err(DefaultsError::MissingPeerAs(neighbor.address()));
    }

    let ibgp = neighbor.is_ibgp();
    fill_timers(&mut neighbor.timers.config, Some(ibgp));

    if neighbor.transport.config.remote_port == 0 {
        neighbor.transport.config.remote_port = DEFAULT_BGP_PORT;
    }

    if neighbor.afi_safis.is_empty() {
        let family = match neighbor.address() {
            IpAddr::V4(_) => AfiSafiType::Ipv4Unicast,
            IpAddr::V6(_) => AfiSafiType::Ipv6Unicast,
        };
        neighbor.afi_safis.push(AfiSafi::new(family));
    }
    Ok(())
}

/// `ibgp` is `None` when the session type is not known yet.
fn fill_timers(timers: &mut TimersConfig, ibgp: Option<bool>) {
    if timers.connect_retry == 0 {
        timers.connect_retry = DEFAULT_CONNECT_RETRY_SECS;
    }
    if timers.hold_time == 0 {
        timers.hold_time = DEFAULT_HOLD_TIME_SECS;
    }
    if timers.keepalive_interval == 0 {
        timers.keepalive_interval = timers.hold_time / 3;
    }
    if timers.minimum_advertisement_interval == 0 {
        timers.minimum_advertisement_interval = match ibgp {
            Some(true) => DEFAULT_IBGP_ADVERTISEMENT_INTERVAL_SECS,
            Some(false) => DEFAULT_EBGP_ADVERTISEMENT_INTERVAL_SECS,
            None => 0,
        };
    }
}
