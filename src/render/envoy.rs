//! Envoy static bootstrap rendering.

use std::fmt::Write;

use thiserror::Error;

use crate::model::{Endpoint, IpFamily, RoutingEntry, RoutingModel};

const ADMIN_ADDRESS: &str = "127.0.0.1";
const ADMIN_PORT: u16 = 9901;

const TCP_PROXY_FILTER: &str = "envoy.filters.network.tcp_proxy";
const TCP_PROXY_TYPE: &str =
    "type.googleapis.com/envoy.extensions.filters.network.tcp_proxy.v3.TcpProxy";
const STAT_PREFIX: &str = "destination";

const CONNECT_TIMEOUT: &str = "5s";
const CLUSTER_TYPE: &str = "STATIC";
const LB_POLICY: &str = "RANDOM";

const HEALTH_CHECK_TIMEOUT: &str = "5s";
const HEALTH_CHECK_INTERVAL: &str = "3s";
const UNHEALTHY_THRESHOLD: u32 = 3;
const HEALTHY_THRESHOLD: u32 = 1;
const HEALTH_CHECK_PATH: &str = "/healthz";

/// Error type for rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A value cannot be carried by the document grammar.
    #[error("cannot represent {field} `{value}` in proxy configuration")]
    Unrepresentable { field: &'static str, value: String },

    #[error("formatting failed: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Render a routing model into the proxy's configuration document.
pub fn render(model: &RoutingModel) -> Result<String, RenderError> {
    let entries = model.sorted_entries();

    for (_, entry) in &entries {
        check_listener_address(&entry.listener.address)?;
        for endpoint in &entry.cluster {
            check_plain_scalar("backend address", &endpoint.address)?;
        }
    }

    let mut out = String::new();
    write_admin(&mut out)?;

    writeln!(out, "static_resources:")?;
    writeln!(out, "  listeners:")?;
    for (key, entry) in &entries {
        write_listener(&mut out, key, &entry.listener)?;
    }

    writeln!(out)?;
    writeln!(out, "  clusters:")?;
    for (key, entry) in &entries {
        write_cluster(&mut out, key, entry, model.health_check_port)?;
    }

    tracing::debug!(
        entries = entries.len(),
        bytes = out.len(),
        "Proxy configuration rendered"
    );

    Ok(out)
}

fn write_admin(out: &mut String) -> std::fmt::Result {
    writeln!(out)?;
    writeln!(out, "admin:")?;
    writeln!(out, "  address:")?;
    writeln!(
        out,
        "    socket_address: {{ address: {}, port_value: {} }}",
        ADMIN_ADDRESS, ADMIN_PORT
    )?;
    writeln!(out)
}

fn write_listener(out: &mut String, key: &str, listener: &Endpoint) -> std::fmt::Result {
    writeln!(out, "  - name: listener_{}", key)?;
    writeln!(out, "    address:")?;
    write_socket_address(out, 6, listener)?;
    writeln!(out, "    filter_chains:")?;
    writeln!(out, "      - filters:")?;
    writeln!(out, "        - name: {}", TCP_PROXY_FILTER)?;
    writeln!(out, "          typed_config:")?;
    writeln!(out, "            \"@type\": {}", TCP_PROXY_TYPE)?;
    writeln!(out, "            stat_prefix: {}", STAT_PREFIX)?;
    writeln!(out, "            cluster: cluster_{}", key)
}

fn write_cluster(
    out: &mut String,
    key: &str,
    entry: &RoutingEntry,
    health_check_port: u16,
) -> std::fmt::Result {
    writeln!(out, "  - name: cluster_{}", key)?;
    writeln!(out, "    connect_timeout: {}", CONNECT_TIMEOUT)?;
    writeln!(out, "    type: {}", CLUSTER_TYPE)?;
    writeln!(out, "    lb_policy: {}", LB_POLICY)?;
    writeln!(out, "    health_checks:")?;
    writeln!(out, "      - timeout: {}", HEALTH_CHECK_TIMEOUT)?;
    writeln!(out, "        interval: {}", HEALTH_CHECK_INTERVAL)?;
    writeln!(out, "        unhealthy_threshold: {}", UNHEALTHY_THRESHOLD)?;
    writeln!(out, "        healthy_threshold: {}", HEALTHY_THRESHOLD)?;
    writeln!(out, "        always_log_health_check_failures: true")?;
    writeln!(out, "        always_log_health_check_success: true")?;
    writeln!(out, "        http_health_check:")?;
    writeln!(out, "          path: {}", HEALTH_CHECK_PATH)?;
    writeln!(out, "    load_assignment:")?;
    writeln!(out, "      cluster_name: cluster_{}", key)?;
    writeln!(out, "      endpoints:")?;
    for endpoint in &entry.cluster {
        writeln!(out, "        - lb_endpoints:")?;
        writeln!(out, "          - endpoint:")?;
        writeln!(out, "              health_check_config:")?;
        writeln!(out, "                port_value: {}", health_check_port)?;
        writeln!(out, "              address:")?;
        write_socket_address(out, 16, endpoint)?;
    }
    Ok(())
}

fn write_socket_address(out: &mut String, indent: usize, endpoint: &Endpoint) -> std::fmt::Result {
    let pad = " ".repeat(indent);
    writeln!(out, "{}socket_address:", pad)?;
    writeln!(out, "{}  address: {}", pad, endpoint.address)?;
    writeln!(out, "{}  port_value: {}", pad, endpoint.port)?;
    writeln!(out, "{}  protocol: {}", pad, endpoint.protocol)
}

fn check_listener_address(address: &str) -> Result<(), RenderError> {
    if address == IpFamily::IPv6.wildcard() {
        return Ok(());
    }
    check_plain_scalar("listener address", address)
}

/// Characters that start a YAML indicator when they lead a plain scalar.
const LEADING_INDICATORS: &[char] = &['-', '?', '*', '&', '!', '|', '>', '%', '@', '`'];

/// Plain scalars that YAML resolves to non-string values.
const KEYWORD_SCALARS: &[&str] = &["~", "null", "true", "false", "yes", "no", "on", "off"];

fn check_plain_scalar(field: &'static str, value: &str) -> Result<(), RenderError> {
    let has_bad_char = value.chars().any(|c| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '#' | ',' | '{' | '}' | '[' | ']' | '"' | '\'')
    });
    let has_bad_start = value.starts_with(LEADING_INDICATORS);
    let is_keyword = KEYWORD_SCALARS.iter().any(|k| value.eq_ignore_ascii_case(k));

    if value.is_empty() || has_bad_char || has_bad_start || is_keyword {
        Err(RenderError::Unrepresentable {
            field,
            value: value.to_string(),
        })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Protocol, RoutingKey};

    const EMPTY_DOCUMENT: &str = "
admin:
  address:
    socket_address: { address: 127.0.0.1, port_value: 9901 }

static_resources:
  listeners:

  clusters:
";

    fn entry(
        family: IpFamily,
        port: u16,
        backends: &[(&str, u16)],
        protocol: Protocol,
    ) -> RoutingEntry {
        RoutingEntry {
            listener: Endpoint::new(family.wildcard(), port, protocol),
            cluster: backends
                .iter()
                .map(|(addr, p)| Endpoint::new(*addr, *p, protocol))
                .collect(),
        }
    }

    #[test]
    fn test_empty_model_renders_admin_only() {
        let doc = render(&RoutingModel::default()).unwrap();
        assert_eq!(doc, EMPTY_DOCUMENT);
    }

    #[test]
    fn test_ipv6_listener_is_quoted() {
        let mut model = RoutingModel {
            health_check_port: 32000,
            ..Default::default()
        };
        model.service_ports.insert(
            RoutingKey::new(IpFamily::IPv6, 80, Protocol::Tcp),
            entry(IpFamily::IPv6, 80, &[("2001:db2::3", 30000)], Protocol::Tcp),
        );

        let doc = render(&model).unwrap();
        assert!(doc.contains("        address: \"::\"\n"));
        assert!(doc.contains("                  address: 2001:db2::3\n"));
        assert!(doc.contains("  - name: listener_IPv6_80_TCP\n"));
    }

    #[test]
    fn test_empty_cluster_has_no_endpoints() {
        let mut model = RoutingModel::default();
        model.service_ports.insert(
            RoutingKey::new(IpFamily::IPv4, 80, Protocol::Udp),
            entry(IpFamily::IPv4, 80, &[], Protocol::Udp),
        );

        let doc = render(&model).unwrap();
        assert!(doc.ends_with("      cluster_name: cluster_IPv4_80_UDP\n      endpoints:\n"));
        assert!(!doc.contains("lb_endpoints"));
    }

    #[test]
    fn test_health_check_port_on_every_endpoint() {
        let mut model = RoutingModel {
            health_check_port: 32764,
            ..Default::default()
        };
        model.service_ports.insert(
            RoutingKey::new(IpFamily::IPv4, 80, Protocol::Tcp),
            entry(IpFamily::IPv4, 80, &[("10.0.0.1", 30000), ("10.0.0.2", 30000)], Protocol::Tcp),
        );
        model.service_ports.insert(
            RoutingKey::new(IpFamily::IPv4, 443, Protocol::Tcp),
            entry(IpFamily::IPv4, 443, &[("10.0.0.1", 31000)], Protocol::Tcp),
        );

        let doc = render(&model).unwrap();
        assert_eq!(doc.matches("                port_value: 32764\n").count(), 3);
    }

    #[test]
    fn test_unrepresentable_address_fails() {
        let mut model = RoutingModel::default();
        model.service_ports.insert(
            RoutingKey::new(IpFamily::IPv4, 80, Protocol::Tcp),
            entry(IpFamily::IPv4, 80, &[("10.0.0.1\n  evil: true", 30000)], Protocol::Tcp),
        );

        match render(&model) {
            Err(RenderError::Unrepresentable { field, .. }) => assert_eq!(field, "backend address"),
            other => panic!("expected Unrepresentable, got {:?}", other),
        }

        for bad in ["*a", "&anchor", "!tag", "|", ">x", "%x", "@x", "`x", "-1", "?x"] {
            assert!(check_plain_scalar("backend address", bad).is_err(), "{} accepted", bad);
        }
        for keyword in ["null", "NULL", "~", "true", "False", "yes", "off"] {
            let result = check_plain_scalar("backend address", keyword);
            assert!(result.is_err(), "{} accepted", keyword);
        }
        assert!(check_plain_scalar("backend address", "::1").is_ok());
        assert!(check_plain_scalar("backend address", "10.0.0.1").is_ok());
    }

    #[test]
    fn test_empty_address_fails() {
        assert!(check_plain_scalar("backend address", "").is_err());
        assert!(check_plain_scalar("backend address", "fe80::1%eth0").is_ok());
        assert!(check_listener_address("\"::\"").is_ok());
        assert!(check_listener_address("\"10.0.0.1\"").is_err());
    }
}
