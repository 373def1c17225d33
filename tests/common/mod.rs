//! Shared utilities for reload loop integration tests.

use std::collections::VecDeque;
use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use bgp_confd::config::defaults::DefaultsError;
use bgp_confd::config::schema::{ConfigSnapshot, Neighbor, PeerGroup};
use bgp_confd::config::LoadError;
use bgp_confd::reload::SnapshotSource;

/// One scripted outcome of a load attempt.
pub enum Outcome {
    Loaded(ConfigSnapshot),
    NotFound,
    Invalid,
}

/// A snapshot source that replays a fixed script of outcomes.
///
/// Once the script runs out every load reports the file as missing.
pub struct ScriptedSource {
    path: PathBuf,
    script: Arc<Mutex<VecDeque<Outcome>>>,
    loads: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn new(script: Vec<Outcome>) -> Self {
        Self {
            path: PathBuf::from("/etc/bgp/bgpd.toml"),
            script: Arc::new(Mutex::new(script.into())),
            loads: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Counter of load attempts, shared with the source.
    pub fn loads(&self) -> Arc<AtomicUsize> {
        self.loads.clone()
    }

    /// Queue for appending outcomes after the loop has started.
    #[allow(dead_code)]
    pub fn script(&self) -> Arc<Mutex<VecDeque<Outcome>>> {
        self.script.clone()
    }
}

impl SnapshotSource for ScriptedSource {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&mut self) -> Result<ConfigSnapshot, LoadError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Outcome::Loaded(snapshot)) => Ok(snapshot),
            Some(Outcome::Invalid) => Err(LoadError::Defaults(DefaultsError::MissingGlobalAs)),
            Some(Outcome::NotFound) | None => Err(LoadError::NotFound {
                path: self.path.clone(),
            }),
        }
    }
}

/// A minimal snapshot with the given peer groups.
pub fn snapshot(groups: &[(&str, u32)]) -> ConfigSnapshot {
    let mut config = ConfigSnapshot::default();
    config.global.config.as_number = 64512;
    config.global.config.router_id = Ipv4Addr::new(192, 0, 2, 1);
    config.peer_groups = groups.iter().map(|(name, asn)| PeerGroup::new(*name, *asn)).collect();
    config
}

/// Add a neighbor to a snapshot.
#[allow(dead_code)]
pub fn with_neighbor(mut config: ConfigSnapshot, addr: &str, peer_as: u32) -> ConfigSnapshot {
    config.neighbors.push(Neighbor::new(addr.parse().unwrap(), peer_as));
    config
}

pub fn loads(counter: &Arc<AtomicUsize>) -> usize {
    counter.load(Ordering::SeqCst)
}
