//! Intermediate routing model.

use std::collections::HashMap;
use std::fmt;

use crate::model::service::{IpFamily, Protocol};

/// Identifies one listener/backend-group pair.
///
/// The string form `<Family>_<Port>_<PROTOCOL>` names the generated
/// listener and cluster and decides emission order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoutingKey {
    pub family: IpFamily,
    pub port: u16,
    pub protocol: Protocol,
}

impl RoutingKey {
    pub fn new(family: IpFamily, port: u16, protocol: Protocol) -> Self {
        Self {
            family,
            port,
            protocol,
        }
    }
}

impl fmt::Display for RoutingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.family, self.port, self.protocol)
    }
}

/// An address/port/protocol triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub address: String,
    pub port: u16,
    pub protocol: Protocol,
}

impl Endpoint {
    pub fn new(address: impl Into<String>, port: u16, protocol: Protocol) -> Self {
        Self {
            address: address.into(),
            port,
            protocol,
        }
    }
}

/// A listener plus the backends it forwards to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEntry {
    pub listener: Endpoint,
    /// Backend endpoints in node input order.
    pub cluster: Vec<Endpoint>,
}

/// Everything the renderer needs to produce a proxy configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutingModel {
    /// Port probed on every backend, shared by all entries.
    pub health_check_port: u16,
    pub service_ports: HashMap<RoutingKey, RoutingEntry>,
}

impl RoutingModel {
    pub fn is_empty(&self) -> bool {
        self.service_ports.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&RoutingEntry> {
        self.service_ports
            .iter()
            .find(|(k, _)| k.to_string() == key)
            .map(|(_, entry)| entry)
    }

    /// Entries sorted by the byte-wise order of their key strings.
    pub fn sorted_entries(&self) -> Vec<(String, &RoutingEntry)> {
        let mut entries: Vec<(String, &RoutingEntry)> = self
            .service_ports
            .iter()
            .map(|(key, entry)| (key.to_string(), entry))
            .collect();
        entries.sort_by(|a, b| a.0.as_bytes().cmp(b.0.as_bytes()));
        entries
    }

    /// Total number of backend endpoints across all entries.
    pub fn endpoint_count(&self) -> usize {
        self.service_ports.values().map(|e| e.cluster.len()).sum()
    }
}
