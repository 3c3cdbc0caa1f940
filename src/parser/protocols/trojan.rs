//! Trojan protocol parser
//!
//! This module provides parsing for Trojan (trojan://) URIs.
//! Format: trojan://password@host:port?params#tag

use std::collections::HashMap;

use tracing::{trace, warn};

use crate::config::{
    GrpcOpts, ProxyConfig, Transport, TrojanProxy, TrojanSsOpts, WsOpts, default_name,
};
use crate::error::Result;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{UriParts, is_truthy, non_blank};

use super::{ProtocolParser, parse_alpn, validate_client_fingerprint};

const PROTOCOL: Protocol = Protocol::Trojan;
const DEFAULT_PORT: u16 = 443;

// ============================================================================
// Trojan Parser
// ============================================================================

/// Parser for Trojan (trojan://) URIs
///
/// Format: trojan://password@host:port?params#tag
/// The port defaults to 443.
pub struct TrojanParser;

impl ProtocolParser for TrojanParser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing Trojan URI");
        let (_, rest) = self.strip_scheme(uri)?;
        let parts = UriParts::tokenize(rest, PROTOCOL, true)?;

        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, Some(DEFAULT_PORT))?;
        let password = parts.auth_decoded().unwrap_or_default();

        let params = parts.params();
        let network = params.get("type").map(str::trim);
        let mut host = None;
        let mut path = None;
        let mut service_name = None;
        let mut sni = None;
        let mut peer = None;
        let mut alpn = None;
        let mut client_fingerprint = None;
        let mut fingerprint = None;
        let mut skip_cert_verify = false;
        let mut ss_opts = None;
        for (key, value) in params.iter() {
            match key {
                "type" => {}
                "host" => host = non_blank(value),
                "path" => path = non_blank(value),
                "service-name" | "serviceName" => service_name = non_blank(value),
                "sni" => sni = non_blank(value),
                "peer" => peer = non_blank(value),
                "alpn" => alpn = parse_alpn(value),
                "fp" => client_fingerprint = validate_client_fingerprint(value),
                "fingerprint" => fingerprint = non_blank(value),
                "allow-insecure" | "allowInsecure" | "skip-cert-verify" => {
                    skip_cert_verify = is_truthy(value)
                }
                "encryption" => ss_opts = parse_encryption(value),
                _ => trace!("Ignoring Trojan query parameter '{}'", key),
            }
        }

        let transport = match network {
            None | Some("") | Some("tcp") | Some("original") => None,
            Some("ws") => {
                let mut headers = HashMap::new();
                if let Some(host) = host {
                    headers.insert("Host".to_string(), host);
                }
                let opts = WsOpts {
                    path,
                    headers,
                    ..Default::default()
                };
                let opts = (opts != WsOpts::default()).then_some(opts);
                Some(Transport::Ws { opts })
            }
            Some("grpc") => Some(Transport::Grpc {
                opts: service_name.map(|service| GrpcOpts {
                    grpc_service_name: Some(service),
                }),
            }),
            Some(other) => {
                warn!(network = other, "Unsupported Trojan transport, using tcp");
                None
            }
        };

        let name = parts
            .name()
            .unwrap_or_else(|| default_name(PROTOCOL, &server, port));

        trace!(
            "Trojan config: server={}:{}, network={:?}",
            server,
            port,
            transport.as_ref().map(Transport::network)
        );

        Ok(ProxyConfig::Trojan(TrojanProxy {
            name,
            server,
            port,
            password,
            sni: sni.or(peer),
            alpn,
            fingerprint,
            client_fingerprint,
            skip_cert_verify,
            ss_opts,
            transport,
        }))
    }
}

/// Parses `encryption=ss;method;password` into Shadowsocks-over-Trojan options.
///
/// Anything other than exactly three `;`-separated parts is ignored.
fn parse_encryption(value: &str) -> Option<TrojanSsOpts> {
    let parts: Vec<&str> = value.split(';').collect();
    match parts.as_slice() {
        [_, method, password] => Some(TrojanSsOpts {
            enabled: true,
            method: method.to_string(),
            password: password.to_string(),
        }),
        _ => {
            trace!("Ignoring Trojan encryption with {} parts", parts.len());
            None
        }
    }
}
