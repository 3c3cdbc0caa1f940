use serde::{Deserialize, Serialize};

use crate::parser::scheme::Protocol;

pub mod proxy;
pub mod transport;
pub mod util;

pub use proxy::{
    HttpProxy, Hysteria2Proxy, HysteriaProxy, IpVersion, ShadowsocksProxy, ShadowsocksRProxy,
    Socks5Proxy, TrojanProxy, TuicProxy, VlessProxy, VmessProxy, WireguardProxy,
};
pub use transport::{
    GrpcOpts, H2Opts, HttpOpts, ObfsPluginOpts, RealityOpts, ShadowsocksPlugin, Transport,
    TrojanSsOpts, V2rayPluginOpts, WsOpts,
};

// ============================================================================
// Proxy Config Enum
// ============================================================================

/// A proxy parsed from a share link
///
/// Serializes in the mihomo (Clash.Meta) `proxies:` entry shape, with the
/// protocol in the `type` field.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "type")]
pub enum ProxyConfig {
    #[serde(rename = "ss")]
    Shadowsocks(ShadowsocksProxy),
    #[serde(rename = "ssr")]
    ShadowsocksR(ShadowsocksRProxy),
    #[serde(rename = "vmess")]
    Vmess(VmessProxy),
    #[serde(rename = "vless")]
    Vless(VlessProxy),
    #[serde(rename = "trojan")]
    Trojan(TrojanProxy),
    #[serde(rename = "hysteria")]
    Hysteria(HysteriaProxy),
    #[serde(rename = "hysteria2")]
    Hysteria2(Hysteria2Proxy),
    #[serde(rename = "tuic")]
    Tuic(TuicProxy),
    #[serde(rename = "wireguard")]
    Wireguard(WireguardProxy),
    #[serde(rename = "http")]
    Http(HttpProxy),
    #[serde(rename = "socks5")]
    Socks5(Socks5Proxy),
}

macro_rules! common_field {
    ($self:ident, $field:ident) => {
        match $self {
            ProxyConfig::Shadowsocks(p) => &p.$field,
            ProxyConfig::ShadowsocksR(p) => &p.$field,
            ProxyConfig::Vmess(p) => &p.$field,
            ProxyConfig::Vless(p) => &p.$field,
            ProxyConfig::Trojan(p) => &p.$field,
            ProxyConfig::Hysteria(p) => &p.$field,
            ProxyConfig::Hysteria2(p) => &p.$field,
            ProxyConfig::Tuic(p) => &p.$field,
            ProxyConfig::Wireguard(p) => &p.$field,
            ProxyConfig::Http(p) => &p.$field,
            ProxyConfig::Socks5(p) => &p.$field,
        }
    };
}

impl ProxyConfig {
    pub fn protocol(&self) -> Protocol {
        match self {
            ProxyConfig::Shadowsocks(_) => Protocol::Shadowsocks,
            ProxyConfig::ShadowsocksR(_) => Protocol::ShadowsocksR,
            ProxyConfig::Vmess(_) => Protocol::Vmess,
            ProxyConfig::Vless(_) => Protocol::Vless,
            ProxyConfig::Trojan(_) => Protocol::Trojan,
            ProxyConfig::Hysteria(_) => Protocol::Hysteria,
            ProxyConfig::Hysteria2(_) => Protocol::Hysteria2,
            ProxyConfig::Tuic(_) => Protocol::Tuic,
            ProxyConfig::Wireguard(_) => Protocol::Wireguard,
            ProxyConfig::Http(_) => Protocol::Http,
            ProxyConfig::Socks5(_) => Protocol::Socks5,
        }
    }

    pub fn name(&self) -> &str {
        common_field!(self, name)
    }

    pub fn server(&self) -> &str {
        common_field!(self, server)
    }

    pub fn port(&self) -> u16 {
        *common_field!(self, port)
    }
}

/// Name used when a link carries none: `"<Label> <server>:<port>"`.
pub fn default_name(protocol: Protocol, server: &str, port: u16) -> String {
    format!("{} {}:{}", protocol.label(), server, port)
}

/// A mihomo `proxies:` document, the shape the importing profile expects.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ProxyList {
    #[serde(default)]
    pub proxies: Vec<ProxyConfig>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ProxyConfig {
        ProxyConfig::Http(HttpProxy {
            name: "node".to_string(),
            server: "proxy.example".to_string(),
            port: 8080,
            username: None,
            password: None,
            tls: false,
            sni: None,
            skip_cert_verify: false,
            fingerprint: None,
            ip_version: IpVersion::Dual,
        })
    }

    #[test]
    fn test_common_accessors() {
        let proxy = sample();
        assert_eq!(proxy.name(), "node");
        assert_eq!(proxy.server(), "proxy.example");
        assert_eq!(proxy.port(), 8080);
        assert_eq!(proxy.protocol(), Protocol::Http);
    }

    #[test]
    fn test_serializes_type_tag() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["type"], "http");
        assert_eq!(json["ip-version"], "dual");
        assert!(json.get("tls").is_none());
        assert!(json.get("username").is_none());
    }

    #[test]
    fn test_default_name() {
        assert_eq!(
            default_name(Protocol::Hysteria2, "h2.example", 443),
            "Hysteria2 h2.example:443"
        );
    }

    #[test]
    fn test_proxy_list_yaml() {
        let list = ProxyList {
            proxies: vec![sample()],
        };
        let yaml = serde_yaml::to_string(&list).unwrap();
        assert!(yaml.starts_with("proxies:"));
        assert!(yaml.contains("type: http"));
    }
}
