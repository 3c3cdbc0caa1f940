//! Hysteria protocol parser
//!
//! This module provides parsing for Hysteria v1 (hysteria:// or hy://) URIs.
//! Format: hysteria://[auth@]host:port?protocol=udp&auth=..&upmbps=..&downmbps=..#tag

use tracing::trace;

use crate::config::{HysteriaProxy, ProxyConfig, default_name};
use crate::error::Result;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{UriParts, is_truthy, non_blank};

use super::{ProtocolParser, parse_alpn, parse_number};

const PROTOCOL: Protocol = Protocol::Hysteria;
const DEFAULT_PORT: u16 = 443;

/// Parser for Hysteria (hysteria:// or hy://) URIs
pub struct HysteriaParser;

impl ProtocolParser for HysteriaParser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing Hysteria URI");
        let (_, rest) = self.strip_scheme(uri)?;
        let parts = UriParts::tokenize(rest, PROTOCOL, false)?;

        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, Some(DEFAULT_PORT))?;

        let mut proxy = HysteriaProxy {
            name: String::new(),
            server,
            port,
            auth_str: parts.auth_decoded().and_then(|auth| non_blank(&auth)),
            obfs: None,
            protocol: "udp".to_string(),
            up: None,
            down: None,
            ports: None,
            sni: None,
            alpn: None,
            skip_cert_verify: false,
            fast_open: false,
            recv_window_conn: None,
            recv_window: None,
            ca: None,
            ca_str: None,
            disable_mtu_discovery: false,
            fingerprint: None,
        };

        let params = parts.params();
        let mut peer = None;
        for (key, value) in params.iter() {
            match key {
                "auth" => {
                    if let Some(auth) = non_blank(value) {
                        proxy.auth_str = Some(auth);
                    }
                }
                "alpn" => proxy.alpn = parse_alpn(value),
                "insecure" | "skip-cert-verify" => proxy.skip_cert_verify = is_truthy(value),
                "mport" | "ports" => proxy.ports = non_blank(value),
                "obfsParam" | "obfs" => proxy.obfs = non_blank(value),
                "upmbps" | "up" => proxy.up = non_blank(value),
                "downmbps" | "down" => proxy.down = non_blank(value),
                "fast-open" | "fastopen" => proxy.fast_open = is_truthy(value),
                "peer" => peer = non_blank(value),
                "sni" => proxy.sni = non_blank(value),
                "recv-window-conn" => {
                    proxy.recv_window_conn = parse_number(PROTOCOL, key, value)
                }
                "recv-window" => proxy.recv_window = parse_number(PROTOCOL, key, value),
                "ca" => proxy.ca = non_blank(value),
                "ca-str" => proxy.ca_str = non_blank(value),
                "disable-mtu-discovery" => proxy.disable_mtu_discovery = is_truthy(value),
                "fingerprint" => proxy.fingerprint = non_blank(value),
                "protocol" => {
                    if let Some(protocol) = non_blank(value) {
                        proxy.protocol = protocol;
                    }
                }
                _ => trace!("Ignoring Hysteria query parameter '{}'", key),
            }
        }
        if proxy.sni.is_none() {
            proxy.sni = peer;
        }

        proxy.name = parts
            .name()
            .unwrap_or_else(|| default_name(PROTOCOL, &proxy.server, proxy.port));

        trace!(
            "Hysteria config: server={}:{}, protocol={}",
            proxy.server, proxy.port, proxy.protocol
        );
        Ok(ProxyConfig::Hysteria(proxy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_hysteria(uri: &str) -> HysteriaProxy {
        match HysteriaParser.parse(uri).unwrap() {
            ProxyConfig::Hysteria(hysteria) => hysteria,
            other => panic!("Expected Hysteria proxy, got {other:?}"),
        }
    }

    #[test]
    fn test_hysteria_basic() {
        let hysteria = parse_hysteria(
            "hysteria://example.com:36712?protocol=udp&auth=secret&peer=sni.example.com&insecure=1&upmbps=50&downmbps=100&alpn=hysteria&obfsParam=xplus#HY",
        );
        assert_eq!(hysteria.name, "HY");
        assert_eq!(hysteria.server, "example.com");
        assert_eq!(hysteria.port, 36712);
        assert_eq!(hysteria.auth_str.as_deref(), Some("secret"));
        assert_eq!(hysteria.protocol, "udp");
        assert_eq!(hysteria.sni.as_deref(), Some("sni.example.com"));
        assert!(hysteria.skip_cert_verify);
        assert_eq!(hysteria.up.as_deref(), Some("50"));
        assert_eq!(hysteria.down.as_deref(), Some("100"));
        assert_eq!(hysteria.alpn, Some(vec!["hysteria".to_string()]));
        assert_eq!(hysteria.obfs.as_deref(), Some("xplus"));
    }

    #[test]
    fn test_hysteria_defaults() {
        let hysteria = parse_hysteria("hy://example.com");
        assert_eq!(hysteria.port, 443);
        assert_eq!(hysteria.protocol, "udp");
        assert_eq!(hysteria.auth_str, None);
        assert_eq!(hysteria.name, "Hysteria example.com:443");
    }

    #[test]
    fn test_hysteria_userinfo_auth_and_sni_precedence() {
        let hysteria =
            parse_hysteria("hysteria://tok%20en@example.com:443?sni=a.example&peer=b.example");
        assert_eq!(hysteria.auth_str.as_deref(), Some("tok en"));
        assert_eq!(hysteria.sni.as_deref(), Some("a.example"));
    }

    #[test]
    fn test_hysteria_extended_fields() {
        let hysteria = parse_hysteria(
            "hysteria://example.com:443?mport=1000-2000&fastopen=1&recv_window_conn=12582912&recv-window=abc&protocol=faketcp&disable_mtu_discovery=true",
        );
        assert_eq!(hysteria.ports.as_deref(), Some("1000-2000"));
        assert!(hysteria.fast_open);
        assert_eq!(hysteria.recv_window_conn, Some(12_582_912));
        assert_eq!(hysteria.recv_window, None);
        assert_eq!(hysteria.protocol, "faketcp");
        assert!(hysteria.disable_mtu_discovery);
    }
}
