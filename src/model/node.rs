//! Backend host types and node address selection.
//!
//! # Responsibilities
//! - Represent a backend host as one address per IP family
//! - Derive that map from the raw address list a cluster node reports
//!
//! # Design Decisions
//! - Only internal addresses are eligible as backends
//! - Family is decided by parsing the address, not by trusting a label
//! - First eligible address per family wins; later ones are ignored

use std::collections::BTreeMap;
use std::net::IpAddr;

use serde::{Deserialize, Serialize};

use crate::model::service::IpFamily;

/// Kind of address a node reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum AddressType {
    InternalIP,
    ExternalIP,
    Hostname,
}

/// A single reported node address.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct NodeAddress {
    #[serde(rename = "type")]
    pub kind: AddressType,
    pub address: String,
}

impl NodeAddress {
    pub fn internal(address: impl Into<String>) -> Self {
        Self {
            kind: AddressType::InternalIP,
            address: address.into(),
        }
    }
}

/// A host that can receive traffic for a service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(try_from = "RawBackendHost")]
pub struct BackendHost {
    /// Host identifier, used only for logging.
    pub name: String,

    /// One address per supported family.
    pub addresses: BTreeMap<IpFamily, String>,
}

impl BackendHost {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            addresses: BTreeMap::new(),
        }
    }

    /// Builder-style helper to set the address for one family.
    pub fn with_address(mut self, family: IpFamily, address: impl Into<String>) -> Self {
        self.addresses.insert(family, address.into());
        self
    }

    /// Build a host from the address list a node reports.
    pub fn from_node_addresses(name: impl Into<String>, node_addresses: &[NodeAddress]) -> Self {
        let mut host = Self::new(name);

        for node_address in node_addresses {
            if node_address.kind != AddressType::InternalIP {
                continue;
            }

            let family = match family_of(&node_address.address) {
                Some(family) => family,
                None => {
                    tracing::warn!(
                        node = %host.name,
                        address = %node_address.address,
                        "Skipping node address that is not an IP literal"
                    );
                    continue;
                }
            };

            host.addresses
                .entry(family)
                .or_insert_with(|| node_address.address.clone());
        }

        host
    }

    /// Address of this host in the given family, if it has one.
    pub fn address(&self, family: IpFamily) -> Option<&str> {
        self.addresses.get(&family).map(String::as_str)
    }
}

/// Family of an IP literal, or `None` if `address` is not one.
fn family_of(address: &str) -> Option<IpFamily> {
    match address.parse::<IpAddr>() {
        Ok(IpAddr::V4(_)) => Some(IpFamily::IPv4),
        Ok(IpAddr::V6(_)) => Some(IpFamily::IPv6),
        Err(_) => None,
    }
}

/// On-disk shape of a backend host.
///
/// Either an explicit `addresses` map keyed by family, a raw
/// `nodeAddresses` list, or both (explicit entries take precedence).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBackendHost {
    #[serde(default)]
    name: String,
    #[serde(default)]
    addresses: BTreeMap<String, String>,
    #[serde(default)]
    node_addresses: Vec<NodeAddress>,
}

impl TryFrom<RawBackendHost> for BackendHost {
    type Error = String;

    fn try_from(raw: RawBackendHost) -> Result<Self, Self::Error> {
        let mut host = BackendHost::from_node_addresses(raw.name, &raw.node_addresses);
        for (label, address) in raw.addresses {
            let family: IpFamily = label.parse()?;
            let actual = family_of(&address)
                .ok_or_else(|| format!("address `{}` is not an IP literal", address))?;
            if actual != family {
                return Err(format!(
                    "address `{}` is listed under {} but is an {} address",
                    address, family, actual
                ));
            }
            host.addresses.insert(family, address);
        }
        Ok(host)
    }
}
