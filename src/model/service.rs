//! Service description types.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// IP address family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
pub enum IpFamily {
    #[serde(rename = "IPv4")]
    IPv4,
    #[serde(rename = "IPv6")]
    IPv6,
}

impl IpFamily {
    /// Canonical name used inside routing keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            IpFamily::IPv4 => "IPv4",
            IpFamily::IPv6 => "IPv6",
        }
    }

    /// All-interfaces bind address, in the form the proxy grammar expects.
    ///
    /// The IPv6 form carries its own quotes because a bare `::` is not a
    /// valid plain scalar.
    pub fn wildcard(&self) -> &'static str {
        match self {
            IpFamily::IPv4 => "0.0.0.0",
            IpFamily::IPv6 => "\"::\"",
        }
    }
}

impl fmt::Display for IpFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IpFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ipv4") {
            Ok(IpFamily::IPv4)
        } else if s.eq_ignore_ascii_case("ipv6") {
            Ok(IpFamily::IPv6)
        } else {
            Err(format!("unknown IP family `{}`", s))
        }
    }
}

/// Transport protocol of a service port.
///
/// `Sctp` is accepted on input so real service objects deserialize, but the
/// data plane only proxies TCP and UDP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    Tcp,
    Udp,
    Sctp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
            Protocol::Sctp => "SCTP",
        }
    }

    /// Whether the proxy can carry this protocol.
    pub fn is_proxyable(&self) -> bool {
        matches!(self, Protocol::Tcp | Protocol::Udp)
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One exposed port of a service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServicePort {
    /// Port the proxy listens on.
    pub listen_port: u16,

    /// Port traffic is forwarded to on every backend host (the node port).
    #[serde(alias = "nodePort")]
    pub target_port: u16,

    #[serde(default = "default_protocol")]
    pub protocol: Protocol,
}

fn default_protocol() -> Protocol {
    Protocol::Tcp
}

impl ServicePort {
    pub fn new(listen_port: u16, target_port: u16, protocol: Protocol) -> Self {
        Self {
            listen_port,
            target_port,
            protocol,
        }
    }
}

/// Declarative description of a load-balanced service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ServiceDescription {
    /// Exposed ports, in declaration order.
    pub ports: Vec<ServicePort>,

    /// Address families the service is reachable on (two for dual-stack).
    pub ip_families: Vec<IpFamily>,

    /// Port probed on every backend host, shared by all of the service's ports.
    pub health_check_port: u16,
}

impl ServiceDescription {
    pub fn is_empty(&self) -> bool {
        self.ports.is_empty() || self.ip_families.is_empty()
    }
}
