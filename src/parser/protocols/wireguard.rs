//! WireGuard protocol parser
//!
//! Format: wireguard://private-key@host:port?address=10.0.0.2/32,fd00::2/128&public-key=..#tag

use std::sync::LazyLock;

use regex::Regex;
use tracing::{trace, warn};

use crate::config::{ProxyConfig, WireguardProxy, default_name};
use crate::error::{ParseError, Result};
use crate::parser::scheme::Protocol;
use crate::parser::uri::{UriParts, is_truthy, non_blank, split_list};

use super::ProtocolParser;

const PROTOCOL: Protocol = Protocol::Wireguard;
const DEFAULT_PORT: u16 = 443;

static IPV4: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)\.){3}(?:25[0-5]|2[0-4]\d|1\d\d|[1-9]?\d)$")
        .expect("valid ipv4 regex")
});
static IPV6: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?i)(?:[0-9a-f]{0,4}:){2,7}[0-9a-f]{0,4}$").expect("valid ipv6 regex")
});

/// Parser for WireGuard (wireguard:// or wg://) URIs
pub struct WireguardParser;

impl ProtocolParser for WireguardParser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing WireGuard URI");
        let (_, rest) = self.strip_scheme(uri)?;
        let parts = UriParts::tokenize(rest, PROTOCOL, true)?;

        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, Some(DEFAULT_PORT))?;
        let private_key = parts
            .auth_decoded()
            .and_then(|key| non_blank(&key))
            .ok_or_else(|| ParseError::invalid_field(PROTOCOL, "private-key", "missing key"))?;

        let mut proxy = WireguardProxy {
            name: String::new(),
            server,
            port,
            private_key,
            public_key: None,
            pre_shared_key: None,
            ip: None,
            ipv6: None,
            allowed_ips: None,
            reserved: None,
            mtu: None,
            dns: None,
            remote_dns_resolve: false,
            udp: true,
        };

        let params = parts.params();
        let addresses = params.get_all("address").chain(params.get_all("ip"));
        for address in addresses.flat_map(split_list) {
            classify_address(&mut proxy, &address);
        }
        for (key, value) in params.iter() {
            match key {
                "address" | "ip" => {}
                "public-key" | "publickey" => proxy.public_key = non_blank(value),
                "pre-shared-key" | "presharedkey" => proxy.pre_shared_key = non_blank(value),
                "allowed-ips" => {
                    let ips = split_list(value);
                    proxy.allowed_ips = (!ips.is_empty()).then_some(ips);
                }
                "reserved" => proxy.reserved = parse_reserved(value),
                "udp" => proxy.udp = is_truthy(value),
                "mtu" => proxy.mtu = value.trim().parse().ok(),
                "dns" => {
                    let dns = split_list(value);
                    proxy.dns = (!dns.is_empty()).then_some(dns);
                }
                "remote-dns-resolve" => proxy.remote_dns_resolve = is_truthy(value),
                _ => trace!("Ignoring WireGuard query parameter '{}'", key),
            }
        }

        proxy.name = parts
            .name()
            .unwrap_or_else(|| default_name(PROTOCOL, &proxy.server, proxy.port));

        trace!(
            "WireGuard config: server={}:{}, ip={:?}, ipv6={:?}",
            proxy.server, proxy.port, proxy.ip, proxy.ipv6
        );
        Ok(ProxyConfig::Wireguard(proxy))
    }
}

/// Strips the CIDR suffix and sorts the address into `ip` or `ipv6`.
fn classify_address(proxy: &mut WireguardProxy, address: &str) {
    let address = address.split('/').next().unwrap_or_default().trim();
    let address = address.trim_start_matches('[').trim_end_matches(']');
    if IPV4.is_match(address) {
        proxy.ip = Some(address.to_string());
    } else if IPV6.is_match(address) {
        proxy.ipv6 = Some(address.to_string());
    } else {
        warn!(address, "Ignoring WireGuard address that is neither IPv4 nor IPv6");
    }
}

/// `reserved` must be exactly three byte values, e.g. `209,98,59`. Any token
/// that is not a byte discards the whole list.
fn parse_reserved(value: &str) -> Option<[u8; 3]> {
    let bytes: Vec<u8> = split_list(value)
        .iter()
        .map(|b| b.parse::<u8>())
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    match bytes.as_slice() {
        [a, b, c] => Some([*a, *b, *c]),
        _ => {
            trace!("Ignoring WireGuard reserved '{}'", value);
            None
        }
    }
}
