//! Routing-model construction.

use crate::model::{
    BackendHost, Endpoint, RoutingEntry, RoutingKey, RoutingModel, ServiceDescription,
};

/// Compile a service and its backend hosts into a routing model.
///
/// An absent service yields the zero model.
pub fn build(service: Option<&ServiceDescription>, nodes: &[BackendHost]) -> RoutingModel {
    let Some(service) = service else {
        return RoutingModel::default();
    };

    let mut model = RoutingModel {
        health_check_port: service.health_check_port,
        ..RoutingModel::default()
    };

    for &family in &service.ip_families {
        for port in &service.ports {
            if !port.protocol.is_proxyable() {
                tracing::info!(
                    protocol = %port.protocol,
                    port = port.listen_port,
                    "Service port protocol not supported, skipping"
                );
                continue;
            }

            let key = RoutingKey::new(family, port.listen_port, port.protocol);
            let listener = Endpoint::new(family.wildcard(), port.listen_port, port.protocol);

            let cluster: Vec<Endpoint> = nodes
                .iter()
                .filter_map(|node| {
                    let address = node.address(family);
                    if address.is_none() {
                        tracing::debug!(
                            node = %node.name,
                            family = %family,
                            "Node has no address in family"
                        );
                    }
                    address
                })
                .map(|address| Endpoint::new(address, port.target_port, port.protocol))
                .collect();

            tracing::debug!(key = %key, backends = cluster.len(), "Routing entry built");

            if model
                .service_ports
                .insert(key, RoutingEntry { listener, cluster })
                .is_some()
            {
                tracing::warn!(
                    key = %key,
                    "Duplicate routing key, later port overwrites earlier one"
                );
            }
        }
    }

    model
}
