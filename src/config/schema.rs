//! Configuration schema definitions.
//!
//! This module defines the complete structure of a BGP daemon configuration
//! file. Keys are kebab-case and follow the openconfig layout, where every
//! entity keeps its settings under a nested `config` table. Unknown keys are
//! rejected so that typos surface as parse errors instead of silently
//! falling back to defaults.

use std::net::{IpAddr, Ipv4Addr};

use serde::{Deserialize, Serialize};

/// One complete parse of the configuration file.
///
/// Once a snapshot leaves the loader it is never mutated; a change on disk
/// always produces a new snapshot.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ConfigSnapshot {
    /// Router-wide settings (local AS, router ID, listen addresses).
    pub global: Global,

    /// Peers, identified by their address.
    pub neighbors: Vec<Neighbor>,

    /// Shared settings templates for neighbors, identified by name.
    pub peer_groups: Vec<PeerGroup>,

    /// RPKI cache servers.
    pub rpki_servers: Vec<RpkiServer>,

    /// BMP monitoring stations.
    pub bmp_servers: Vec<BmpServer>,

    /// VRF definitions.
    pub vrfs: Vec<Vrf>,

    /// MRT dump jobs.
    pub mrt_dump: Vec<Mrt>,

    /// Collector (time-series export) settings.
    pub collector: Collector,

    /// Named sets referenced by policy conditions.
    pub defined_sets: DefinedSets,

    /// Ordered policy definitions.
    pub policy_definitions: Vec<PolicyDefinition>,

    /// Prefix ranges accepting passive peers into a peer group.
    pub dynamic_neighbors: Vec<DynamicNeighbor>,
}

impl ConfigSnapshot {
    /// Project the routing-policy inputs out of this snapshot.
    pub fn routing_policy(&self) -> RoutingPolicy<'_> {
        RoutingPolicy {
            defined_sets: &self.defined_sets,
            policy_definitions: &self.policy_definitions,
        }
    }
}

/// The routing-policy view of a snapshot.
///
/// Policy definitions are evaluated in order, so two views are only equal if
/// their definitions appear in the same sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutingPolicy<'a> {
    pub defined_sets: &'a DefinedSets,
    pub policy_definitions: &'a [PolicyDefinition],
}

// ---------------------------------------------------------------------------
// Global
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Global {
    pub config: GlobalConfig,
    pub apply_policy: ApplyPolicy,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct GlobalConfig {
    /// Local autonomous system number.
    #[serde(rename = "as")]
    pub as_number: u32,

    pub router_id: Ipv4Addr,

    /// BGP listen port (0 = default).
    #[serde(default)]
    pub port: u16,

    /// Listen addresses (empty = all IPv4 and IPv6 addresses).
    #[serde(default)]
    pub local_address_list: Vec<IpAddr>,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            as_number: 0,
            router_id: Ipv4Addr::UNSPECIFIED,
            port: 0,
            local_address_list: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Peer groups and neighbors
// ---------------------------------------------------------------------------

/// A named template of neighbor settings.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PeerGroup {
    pub config: PeerGroupConfig,
    pub timers: Timers,
    pub transport: Transport,
    pub afi_safis: Vec<AfiSafi>,
    pub apply_policy: ApplyPolicy,
    pub route_reflector: RouteReflector,
    pub ebgp_multihop: EbgpMultihop,
}

impl PeerGroup {
    pub fn new(name: impl Into<String>, peer_as: u32) -> Self {
        Self {
            config: PeerGroupConfig {
                peer_group_name: name.into(),
                peer_as,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.config.peer_group_name
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PeerGroupConfig {
    pub peer_group_name: String,
    pub peer_as: u32,
    pub local_as: u32,
    pub description: String,
    pub auth_password: String,
}

/// A BGP peer.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Neighbor {
    pub config: NeighborConfig,
    #[serde(default)]
    pub timers: Timers,
    #[serde(default)]
    pub transport: Transport,
    #[serde(default)]
    pub afi_safis: Vec<AfiSafi>,
    #[serde(default)]
    pub apply_policy: ApplyPolicy,
    #[serde(default)]
    pub route_reflector: RouteReflector,
    #[serde(default)]
    pub ebgp_multihop: EbgpMultihop,
}

impl Neighbor {
    pub fn new(address: IpAddr, peer_as: u32) -> Self {
        Self {
            config: NeighborConfig {
                neighbor_address: address,
                peer_as,
                local_as: 0,
                peer_group: None,
                description: String::new(),
                auth_password: String::new(),
                admin_down: false,
            },
            timers: Timers::default(),
            transport: Transport::default(),
            afi_safis: Vec::new(),
            apply_policy: ApplyPolicy::default(),
            route_reflector: RouteReflector::default(),
            ebgp_multihop: EbgpMultihop::default(),
        }
    }

    pub fn address(&self) -> IpAddr {
        self.config.neighbor_address
    }

    pub fn is_ibgp(&self) -> bool {
        self.config.peer_as != 0 && self.config.peer_as == self.config.local_as
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct NeighborConfig {
    pub neighbor_address: IpAddr,
    #[serde(default)]
    pub peer_as: u32,
    #[serde(default)]
    pub local_as: u32,
    /// Name of the peer group this neighbor inherits from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub peer_group: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub auth_password: String,
    #[serde(default)]
    pub admin_down: bool,
}

/// Session timers in seconds. Zero means "not configured".
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Timers {
    pub config: TimersConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TimersConfig {
    pub connect_retry: u32,
    pub hold_time: u32,
    pub keepalive_interval: u32,
    pub minimum_advertisement_interval: u32,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Transport {
    pub config: TransportConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct TransportConfig {
    pub passive_mode: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_address: Option<IpAddr>,
    /// Remote TCP port (0 = default).
    pub remote_port: u16,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AfiSafi {
    pub config: AfiSafiConfig,
}

impl AfiSafi {
    pub fn new(name: AfiSafiType) -> Self {
        Self {
            config: AfiSafiConfig {
                afi_safi_name: name,
                enabled: true,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AfiSafiConfig {
    pub afi_safi_name: AfiSafiType,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
}

fn enabled_by_default() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AfiSafiType {
    Ipv4Unicast,
    Ipv6Unicast,
    Ipv4LabelledUnicast,
    Ipv6LabelledUnicast,
    L3vpnIpv4Unicast,
    L3vpnIpv6Unicast,
    L2vpnEvpn,
    Ipv4Flowspec,
    Ipv6Flowspec,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ApplyPolicy {
    pub config: ApplyPolicyConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct ApplyPolicyConfig {
    pub import_policy_list: Vec<String>,
    pub default_import_policy: DefaultPolicyType,
    pub export_policy_list: Vec<String>,
    pub default_export_policy: DefaultPolicyType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DefaultPolicyType {
    #[default]
    AcceptRoute,
    RejectRoute,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RouteReflector {
    pub config: RouteReflectorConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RouteReflectorConfig {
    pub route_reflector_client: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub route_reflector_cluster_id: Option<Ipv4Addr>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EbgpMultihop {
    pub config: EbgpMultihopConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct EbgpMultihopConfig {
    pub enabled: bool,
    pub multihop_ttl: u8,
}

// ---------------------------------------------------------------------------
// Defined sets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DefinedSets {
    pub prefix_sets: Vec<PrefixSet>,
    pub neighbor_sets: Vec<NeighborSet>,
    pub bgp_defined_sets: BgpDefinedSets,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PrefixSet {
    pub prefix_set_name: String,
    pub prefix_list: Vec<Prefix>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Prefix {
    /// CIDR notation, e.g. `10.0.0.0/8`.
    pub ip_prefix: String,
    /// Mask length range, e.g. `16..24`. Empty means exact match.
    pub masklength_range: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct NeighborSet {
    pub neighbor_set_name: String,
    pub neighbor_info_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BgpDefinedSets {
    pub community_sets: Vec<CommunitySet>,
    pub as_path_sets: Vec<AsPathSet>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CommunitySet {
    pub community_set_name: String,
    pub community_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct AsPathSet {
    pub as_path_set_name: String,
    pub as_path_list: Vec<String>,
}

// ---------------------------------------------------------------------------
// Policy definitions
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct PolicyDefinition {
    pub name: String,
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Statement {
    pub name: String,
    pub conditions: Conditions,
    pub actions: Actions,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Conditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_prefix_set: Option<MatchPrefixSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_neighbor_set: Option<MatchNeighborSet>,
    pub bgp_conditions: BgpConditions,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MatchPrefixSet {
    pub prefix_set: String,
    pub match_set_options: MatchSetOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MatchNeighborSet {
    pub neighbor_set: String,
    pub match_set_options: MatchSetOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BgpConditions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_community_set: Option<MatchCommunitySet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_as_path_set: Option<MatchAsPathSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_path_length: Option<AsPathLength>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MatchCommunitySet {
    pub community_set: String,
    pub match_set_options: MatchSetOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MatchAsPathSet {
    pub as_path_set: String,
    pub match_set_options: MatchSetOptions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchSetOptions {
    #[default]
    Any,
    All,
    Invert,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct AsPathLength {
    pub operator: ComparisonOperator,
    pub value: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComparisonOperator {
    Eq,
    Ge,
    Le,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Actions {
    pub route_disposition: RouteDisposition,
    pub bgp_actions: BgpActions,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RouteDisposition {
    #[default]
    None,
    AcceptRoute,
    RejectRoute,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct BgpActions {
    /// MED value or adjustment (`100`, `+10`, `-10`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_med: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_local_pref: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_next_hop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_community: Option<SetCommunity>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub set_as_path_prepend: Option<SetAsPathPrepend>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SetCommunity {
    pub options: SetCommunityOption,
    pub set_community_method: SetCommunityMethod,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SetCommunityOption {
    #[default]
    Add,
    Remove,
    Replace,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct SetCommunityMethod {
    pub communities_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct SetAsPathPrepend {
    /// AS number to prepend, or `last-as`.
    #[serde(rename = "as")]
    pub asn: String,
    #[serde(default = "single_prepend")]
    pub repeat_n: u8,
}

fn single_prepend() -> u8 {
    1
}

// ---------------------------------------------------------------------------
// Auxiliary sections
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RpkiServer {
    pub config: RpkiServerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RpkiServerConfig {
    pub address: IpAddr,
    #[serde(default = "default_rpki_port")]
    pub port: u16,
    #[serde(default)]
    pub refresh_time: u64,
}

fn default_rpki_port() -> u16 {
    323
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BmpServer {
    pub config: BmpServerConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BmpServerConfig {
    pub address: IpAddr,
    #[serde(default = "default_bmp_port")]
    pub port: u16,
    #[serde(default)]
    pub route_monitoring_policy: BmpRouteMonitoringPolicy,
}

fn default_bmp_port() -> u16 {
    11019
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BmpRouteMonitoringPolicy {
    #[default]
    PrePolicy,
    PostPolicy,
    Both,
    LocalRib,
    All,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Vrf {
    pub config: VrfConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct VrfConfig {
    pub name: String,
    pub id: u32,
    /// Route distinguisher, e.g. `65000:100`.
    pub rd: String,
    pub import_rt_list: Vec<String>,
    pub export_rt_list: Vec<String>,
    pub both_rt_list: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Mrt {
    pub config: MrtConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct MrtConfig {
    pub dump_type: MrtType,
    pub file_name: String,
    pub table_name: String,
    pub dump_interval: u64,
    pub rotation_interval: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MrtType {
    #[default]
    Updates,
    Table,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DynamicNeighbor {
    pub config: DynamicNeighborConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct DynamicNeighborConfig {
    pub prefix: String,
    pub peer_group: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Collector {
    pub config: CollectorConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct CollectorConfig {
    pub url: String,
    pub db_name: String,
    pub table_dump_interval: u64,
}
