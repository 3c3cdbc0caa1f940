//! Shadowsocks protocol parser
//!
//! This module provides parsing for Shadowsocks (ss://) URIs.
//! Supports both SIP002 format and legacy format, as well as SIP003 plugins.

use tracing::{trace, warn};

use crate::config::{
    ObfsPluginOpts, ProxyConfig, ShadowsocksPlugin, ShadowsocksProxy, V2rayPluginOpts,
    default_name,
};
use crate::error::{ParseError, Result};
use crate::parser::base64::decode_base64_or_literal;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{
    QueryParams, UriParts, decode_fragment, is_truthy, non_blank, percent_decode,
    split_fragment, split_query,
};

use super::{ProtocolParser, normalize_cipher};

const PROTOCOL: Protocol = Protocol::Shadowsocks;

// ============================================================================
// Shadowsocks Parser
// ============================================================================

/// Parser for Shadowsocks (ss://) URIs
///
/// Supports both SIP002 format and legacy format, as well as SIP003 plugins:
/// - SIP002: ss://BASE64(method:password)@host:port#tag
/// - SIP002 with userinfo: ss://method:password@host:port#tag
/// - SIP002 with SIP003 plugin: ss://userinfo@host:port/?plugin=plugin-name;plugin-opts#tag
/// - Legacy: ss://BASE64(method:password@host:port)#tag
/// - Shadowrocket: ss://BASE64(method:password@host:port)?v2ray-plugin=BASE64(json)#tag
pub struct ShadowsocksParser;

impl ProtocolParser for ShadowsocksParser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing Shadowsocks URI");
        let (_, rest) = self.strip_scheme(uri)?;

        let (main_part, fragment) = split_fragment(rest);
        let (body, query) = split_query(main_part);

        // SIP002 when an '@' is visible, otherwise the whole body is Base64
        let (userinfo, hostport) = match body.rfind('@') {
            Some(at_pos) => {
                trace!("Parsing as SIP002 format (found @ separator)");
                let userinfo = percent_decode(&body[..at_pos]);
                (
                    decode_base64_or_literal(&userinfo),
                    body[at_pos + 1..].to_string(),
                )
            }
            None => {
                trace!("Parsing as legacy Base64 format");
                let decoded = decode_base64_or_literal(body.trim_end_matches('/'));
                let at_pos = decoded.rfind('@').ok_or_else(|| {
                    ParseError::invalid_uri(PROTOCOL, "missing '@' between userinfo and server")
                })?;
                (
                    decoded[..at_pos].to_string(),
                    decoded[at_pos + 1..].to_string(),
                )
            }
        };

        let parts = UriParts::tokenize(&hostport, PROTOCOL, false)?;
        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, None)?;

        let (method, password) = userinfo
            .split_once(':')
            .ok_or_else(|| ParseError::invalid_uri(PROTOCOL, "userinfo is not method:password"))?;

        let params = QueryParams::parse(query.unwrap_or_default());
        let mut plugin = None;
        let mut shadowrocket_plugin = None;
        let mut udp_over_tcp = false;
        let mut tfo = false;
        for (key, value) in params.iter() {
            match key {
                "plugin" => plugin = parse_sip003_plugin(value)?,
                "v2ray-plugin" => shadowrocket_plugin = Some(value),
                "uot" | "udp-over-tcp" => udp_over_tcp = is_truthy(value),
                "tfo" | "fast-open" => tfo = is_truthy(value),
                _ => trace!("Ignoring Shadowsocks query parameter '{}'", key),
            }
        }
        if plugin.is_none()
            && let Some(encoded) = shadowrocket_plugin
        {
            plugin = parse_shadowrocket_plugin(encoded)?;
        }

        let name = decode_fragment(fragment).unwrap_or_else(|| default_name(PROTOCOL, &server, port));

        Ok(ProxyConfig::Shadowsocks(ShadowsocksProxy {
            name,
            server,
            port,
            cipher: normalize_cipher(Some(method)),
            password: password.to_string(),
            plugin,
            udp_over_tcp,
            tfo,
        }))
    }
}

/// Parses the SIP003 `plugin` query parameter.
///
/// The plugin parameter format is: `plugin=plugin-name;plugin-opts`
/// where the first `;` separates the plugin name from its options.
///
/// Examples:
/// - `plugin=obfs-local;obfs=http;obfs-host=example.com`
///   → obfs, mode `http`, host `example.com`
/// - `plugin=v2ray-plugin;tls;host=example.com;path=/ws`
///   → v2ray-plugin, websocket over TLS
///
/// Only these two plugin families exist in mihomo, so any other name is an
/// error rather than a silently dropped option.
fn parse_sip003_plugin(value: &str) -> Result<Option<ShadowsocksPlugin>> {
    let mut segments = value.split(';');
    let name = segments.next().unwrap_or_default().trim();
    if name.is_empty() {
        return Ok(None);
    }

    let mut opts: Vec<(&str, Option<&str>)> = Vec::new();
    for segment in segments.filter(|s| !s.is_empty()) {
        match segment.split_once('=') {
            Some((key, val)) => opts.push((key.trim(), Some(val))),
            None => opts.push((segment.trim(), None)),
        }
    }
    let opt = |key: &str| {
        opts.iter()
            .rev()
            .find(|(k, _)| *k == key)
            .and_then(|(_, v)| *v)
            .and_then(non_blank)
    };
    let flag = |key: &str| opts.iter().any(|(k, _)| *k == key);

    let plugin = match name {
        "obfs-local" | "simple-obfs" | "obfs" => {
            if name == "simple-obfs" {
                warn!(
                    deprecated = "simple-obfs",
                    replacement = "obfs",
                    "Deprecated SIP003 plugin mapped to obfs"
                );
            }
            ShadowsocksPlugin::Obfs(ObfsPluginOpts {
                mode: opt("obfs"),
                host: opt("obfs-host"),
            })
        }
        "v2ray-plugin" => ShadowsocksPlugin::V2ray(V2rayPluginOpts {
            mode: Some(opt("mode").unwrap_or_else(|| "websocket".to_string())),
            host: opt("host").or_else(|| opt("obfs-host")),
            path: opt("path"),
            tls: flag("tls").then_some(true),
            mux: opt("mux").map(|m| is_truthy(&m)),
            skip_cert_verify: None,
        }),
        other => {
            return Err(ParseError::UnsupportedOption {
                protocol: PROTOCOL,
                option: "plugin",
                value: other.to_string(),
            });
        }
    };
    trace!("Parsed SIP003 plugin '{}'", plugin.name());
    Ok(Some(plugin))
}

/// Parses Shadowrocket's `v2ray-plugin=BASE64(json)` parameter.
fn parse_shadowrocket_plugin(encoded: &str) -> Result<Option<ShadowsocksPlugin>> {
    if encoded.trim().is_empty() {
        return Ok(None);
    }
    let json = decode_base64_or_literal(encoded);
    let opts: V2rayPluginOpts = serde_json::from_str(&json)
        .map_err(|e| ParseError::invalid_field(PROTOCOL, "v2ray-plugin", e.to_string()))?;
    Ok(Some(ShadowsocksPlugin::V2ray(opts)))
}
