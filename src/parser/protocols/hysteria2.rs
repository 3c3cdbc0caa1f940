//! Hysteria2 protocol parser
//!
//! This module provides parsing for Hysteria2 (hysteria2:// or hy2://) URIs.
//! Format: hysteria2://auth@host:port?params#tag

use tracing::trace;

use crate::config::{Hysteria2Proxy, ProxyConfig, default_name};
use crate::error::Result;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{UriParts, is_truthy, non_blank};

use super::{ProtocolParser, parse_alpn};

const PROTOCOL: Protocol = Protocol::Hysteria2;
const DEFAULT_PORT: u16 = 443;

// ============================================================================
// Hysteria2 Parser
// ============================================================================

/// Parser for Hysteria2 (hysteria2:// or hy2://) URIs
///
/// Format: hysteria2://auth@host:port?params#tag
/// Both the auth part and the port are optional; the port defaults to 443.
pub struct Hysteria2Parser;

impl ProtocolParser for Hysteria2Parser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing Hysteria2 URI");
        let (_, rest) = self.strip_scheme(uri)?;
        let parts = UriParts::tokenize(rest, PROTOCOL, false)?;

        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, Some(DEFAULT_PORT))?;
        let password = parts.auth_decoded().and_then(|auth| non_blank(&auth));

        let params = parts.params();
        let mut sni = None;
        let mut peer = None;
        let mut obfs = None;
        let mut obfs_password = None;
        let mut ports = None;
        let mut alpn = None;
        let mut up = None;
        let mut down = None;
        let mut skip_cert_verify = false;
        let mut fast_open = false;
        let mut fingerprint = None;
        for (key, value) in params.iter() {
            match key {
                "sni" => sni = non_blank(value),
                "peer" => peer = non_blank(value),
                "obfs" => obfs = non_blank(value).filter(|o| o != "none"),
                "obfs-password" => obfs_password = non_blank(value),
                "insecure" | "skip-cert-verify" => skip_cert_verify = is_truthy(value),
                "pinSHA256" | "pinsha256" | "fingerprint" => fingerprint = non_blank(value),
                "mport" | "ports" => ports = non_blank(value),
                "fastopen" | "fast-open" => fast_open = is_truthy(value),
                "alpn" => alpn = parse_alpn(value),
                "up" | "upmbps" => up = non_blank(value),
                "down" | "downmbps" => down = non_blank(value),
                _ => trace!("Ignoring Hysteria2 query parameter '{}'", key),
            }
        }

        let name = parts
            .name()
            .unwrap_or_else(|| default_name(PROTOCOL, &server, port));

        trace!(
            "Hysteria2 config: server={}:{}, obfs={:?}",
            server, port, obfs
        );

        Ok(ProxyConfig::Hysteria2(Hysteria2Proxy {
            name,
            server,
            port,
            password,
            ports,
            obfs,
            obfs_password,
            sni: sni.or(peer),
            alpn,
            up,
            down,
            skip_cert_verify,
            fast_open,
            fingerprint,
        }))
    }
}
