use serde::{Deserialize, Serialize};

use crate::config::transport::{RealityOpts, ShadowsocksPlugin, Transport, TrojanSsOpts};
use crate::config::util::{default_true, is_false};

// ============================================================================
// Shared Enums
// ============================================================================

/// Address family preference for HTTP and SOCKS5 proxies
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IpVersion {
    #[default]
    Dual,
    Ipv4,
    Ipv6,
    Ipv4Prefer,
    Ipv6Prefer,
}

impl IpVersion {
    /// Parses one of the five accepted values; anything else is `None`.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dual" => Some(IpVersion::Dual),
            "ipv4" => Some(IpVersion::Ipv4),
            "ipv6" => Some(IpVersion::Ipv6),
            "ipv4-prefer" => Some(IpVersion::Ipv4Prefer),
            "ipv6-prefer" => Some(IpVersion::Ipv6Prefer),
            _ => None,
        }
    }
}

// ============================================================================
// Proxy Types
// ============================================================================

/// Shadowsocks proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ShadowsocksProxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub cipher: String,
    pub password: String,

    #[serde(flatten)]
    pub plugin: Option<ShadowsocksPlugin>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub udp_over_tcp: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub tfo: bool,
}

/// ShadowsocksR proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct ShadowsocksRProxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub cipher: String,
    pub password: String,
    pub protocol: String,
    pub obfs: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol_param: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs_param: Option<String>,
}

/// VMess proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct VmessProxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub uuid: String,

    #[serde(rename = "alterId", default)]
    pub alter_id: u32,

    pub cipher: String,

    #[serde(default)]
    pub tls: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tfo: Option<bool>,

    #[serde(flatten)]
    pub transport: Option<Transport>,
}

/// VLESS proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct VlessProxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub uuid: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flow: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servername: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reality_opts: Option<RealityOpts>,

    #[serde(flatten)]
    pub transport: Option<Transport>,
}

/// Trojan proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TrojanProxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub password: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ss_opts: Option<TrojanSsOpts>,

    #[serde(flatten)]
    pub transport: Option<Transport>,
}

/// Hysteria (v1) proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HysteriaProxy {
    pub name: String,
    pub server: String,
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_str: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,

    /// `udp`, `wechat-video` or `faketcp`
    pub protocol: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub fast_open: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv_window_conn: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recv_window: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_str: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_mtu_discovery: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// Hysteria2 proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Hysteria2Proxy {
    pub name: String,
    pub server: String,
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obfs_password: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub fast_open: bool,

    /// Certificate SHA-256 pin
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// TUIC proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct TuicProxy {
    pub name: String,
    pub server: String,
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// TUIC v4 authentication token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub congestion_controller: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp_relay_mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heartbeat_interval: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_udp_relay_packet_size: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_open_streams: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alpn: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub disable_sni: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub reduce_rtt: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub fast_open: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,
}

/// WireGuard proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct WireguardProxy {
    pub name: String,
    pub server: String,
    pub port: u16,
    pub private_key: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre_shared_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipv6: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allowed_ips: Option<Vec<String>>,

    /// Always exactly three bytes when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reserved: Option<[u8; 3]>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtu: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dns: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub remote_dns_resolve: bool,

    #[serde(default = "default_true")]
    pub udp: bool,
}

/// HTTP(S) proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct HttpProxy {
    pub name: String,
    pub server: String,
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sni: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default)]
    pub ip_version: IpVersion,
}

/// SOCKS5 proxy
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct Socks5Proxy {
    pub name: String,
    pub server: String,
    pub port: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(default, skip_serializing_if = "is_false")]
    pub tls: bool,

    #[serde(default, skip_serializing_if = "is_false")]
    pub skip_cert_verify: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub udp: Option<bool>,

    #[serde(default)]
    pub ip_version: IpVersion,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ip_version_parse() {
        assert_eq!(IpVersion::parse("ipv4-prefer"), Some(IpVersion::Ipv4Prefer));
        assert_eq!(IpVersion::parse("dual"), Some(IpVersion::Dual));
        assert_eq!(IpVersion::parse("v4"), None);
        assert_eq!(IpVersion::default(), IpVersion::Dual);
    }

    #[test]
    fn test_ip_version_serializes_kebab() {
        assert_eq!(
            serde_json::to_value(IpVersion::Ipv6Prefer).unwrap(),
            "ipv6-prefer"
        );
    }
}
