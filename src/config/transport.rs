use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::config::util::is_false;

// ============================================================================
// Stream Transports
// ============================================================================

/// Stream transport carried by VMess, VLESS and Trojan.
///
/// Serializes as `network: <name>` plus the matching `<name>-opts` record.
/// Plain TCP is the absence of a transport.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "network", rename_all = "lowercase")]
pub enum Transport {
    Ws {
        #[serde(rename = "ws-opts", default, skip_serializing_if = "Option::is_none")]
        opts: Option<WsOpts>,
    },
    Http {
        #[serde(
            rename = "http-opts",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        opts: Option<HttpOpts>,
    },
    H2 {
        #[serde(rename = "h2-opts", default, skip_serializing_if = "Option::is_none")]
        opts: Option<H2Opts>,
    },
    Grpc {
        #[serde(
            rename = "grpc-opts",
            default,
            skip_serializing_if = "Option::is_none"
        )]
        opts: Option<GrpcOpts>,
    },
}

impl Transport {
    /// The `network` value this transport serializes under.
    pub fn network(&self) -> &'static str {
        match self {
            Transport::Ws { .. } => "ws",
            Transport::Http { .. } => "http",
            Transport::H2 { .. } => "h2",
            Transport::Grpc { .. } => "grpc",
        }
    }

    pub fn ws_opts(&self) -> Option<&WsOpts> {
        match self {
            Transport::Ws { opts } => opts.as_ref(),
            _ => None,
        }
    }

    pub fn http_opts(&self) -> Option<&HttpOpts> {
        match self {
            Transport::Http { opts } => opts.as_ref(),
            _ => None,
        }
    }

    pub fn h2_opts(&self) -> Option<&H2Opts> {
        match self {
            Transport::H2 { opts } => opts.as_ref(),
            _ => None,
        }
    }

    pub fn grpc_opts(&self) -> Option<&GrpcOpts> {
        match self {
            Transport::Grpc { opts } => opts.as_ref(),
            _ => None,
        }
    }

    /// The `Host` header (or h2 host) a TLS client can fall back to for SNI.
    pub fn host(&self) -> Option<&str> {
        match self {
            Transport::Ws { opts } => opts.as_ref()?.headers.get("Host").map(String::as_str),
            Transport::Http { opts } => opts
                .as_ref()?
                .headers
                .get("Host")
                .and_then(|hosts| hosts.first())
                .map(String::as_str),
            Transport::H2 { opts } => opts.as_ref()?.host.first().map(String::as_str),
            Transport::Grpc { .. } => None,
        }
    }
}

/// WebSocket transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct WsOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, String>,

    /// Set for `httpupgrade` links, which ride on the WebSocket settings.
    #[serde(
        rename = "v2ray-http-upgrade",
        default,
        skip_serializing_if = "is_false"
    )]
    pub v2ray_http_upgrade: bool,

    #[serde(
        rename = "v2ray-http-upgrade-fast-open",
        default,
        skip_serializing_if = "is_false"
    )]
    pub v2ray_http_upgrade_fast_open: bool,
}

/// HTTP/1.1 obfuscation transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct HttpOpts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<String>,

    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub headers: HashMap<String, Vec<String>>,
}

/// HTTP/2 transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct H2Opts {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub host: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

/// gRPC transport options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct GrpcOpts {
    #[serde(
        rename = "grpc-service-name",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub grpc_service_name: Option<String>,
}

// ============================================================================
// TLS Extensions
// ============================================================================

/// REALITY settings for VLESS
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct RealityOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_id: Option<String>,
}

/// Shadowsocks layered inside Trojan
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TrojanSsOpts {
    pub enabled: bool,
    pub method: String,
    pub password: String,
}

// ============================================================================
// Shadowsocks Plugins
// ============================================================================

/// SIP003 plugin attached to a Shadowsocks server.
///
/// Serializes as `plugin: <name>` plus `plugin-opts`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "plugin", content = "plugin-opts")]
pub enum ShadowsocksPlugin {
    #[serde(rename = "obfs")]
    Obfs(ObfsPluginOpts),
    #[serde(rename = "v2ray-plugin")]
    V2ray(V2rayPluginOpts),
}

impl ShadowsocksPlugin {
    pub fn name(&self) -> &'static str {
        match self {
            ShadowsocksPlugin::Obfs(_) => "obfs",
            ShadowsocksPlugin::V2ray(_) => "v2ray-plugin",
        }
    }
}

/// simple-obfs / obfs-local options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct ObfsPluginOpts {
    /// `http` or `tls`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

/// v2ray-plugin options
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub struct V2rayPluginOpts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mux: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_cert_verify: Option<bool>,
}
