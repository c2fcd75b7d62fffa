//! Shared fixtures for integration tests.

#![allow(dead_code)]

use lb_proxy_config::model::{
    BackendHost, IpFamily, NodeAddress, Protocol, ServiceDescription, ServicePort,
};

/// A node reporting a single internal address.
pub fn make_node(name: &str, ip: &str) -> BackendHost {
    BackendHost::from_node_addresses(name, &[NodeAddress::internal(ip)])
}

/// A dual-stack node.
pub fn make_dual_stack_node(name: &str, ipv4: &str, ipv6: &str) -> BackendHost {
    BackendHost::from_node_addresses(
        name,
        &[NodeAddress::internal(ipv4), NodeAddress::internal(ipv6)],
    )
}

/// A service with the given `(listen, node port, protocol)` triples.
pub fn make_service(
    ports: &[(u16, u16, Protocol)],
    families: &[IpFamily],
    health_check_port: u16,
) -> ServiceDescription {
    ServiceDescription {
        ports: ports
            .iter()
            .map(|&(listen, target, protocol)| ServicePort::new(listen, target, protocol))
            .collect(),
        ip_families: families.to_vec(),
        health_check_port,
    }
}
