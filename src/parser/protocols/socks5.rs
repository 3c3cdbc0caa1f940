//! SOCKS5 proxy parser
//!
//! Format: socks5://[user:pass@]host:port?params#tag

use tracing::trace;

use crate::config::{IpVersion, ProxyConfig, Socks5Proxy, default_name};
use crate::error::Result;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{UriParts, is_truthy, non_blank};

use super::{ProtocolParser, split_credentials};

const PROTOCOL: Protocol = Protocol::Socks5;

/// Parser for SOCKS5 (socks5:// or socks://) proxy URIs
pub struct Socks5Parser;

impl ProtocolParser for Socks5Parser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing SOCKS5 proxy URI");
        let (_, rest) = self.strip_scheme(uri)?;
        let parts = UriParts::tokenize(rest, PROTOCOL, false)?;

        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, None)?;
        let (username, password) = split_credentials(parts.auth);

        let params = parts.params();
        let mut tls = false;
        let mut skip_cert_verify = false;
        let mut fingerprint = None;
        let mut udp = None;
        let mut ip_version = IpVersion::default();
        for (key, value) in params.iter() {
            match key {
                "tls" => tls = is_truthy(value),
                "skip-cert-verify" | "allow-insecure" => skip_cert_verify = is_truthy(value),
                "fingerprint" => fingerprint = non_blank(value),
                "udp" => udp = Some(is_truthy(value)),
                "ip-version" => ip_version = IpVersion::parse(value).unwrap_or_default(),
                _ => trace!("Ignoring SOCKS5 query parameter '{}'", key),
            }
        }

        let name = parts
            .name()
            .unwrap_or_else(|| default_name(PROTOCOL, &server, port));

        Ok(ProxyConfig::Socks5(Socks5Proxy {
            name,
            server,
            port,
            username,
            password,
            tls,
            skip_cert_verify,
            fingerprint,
            udp,
            ip_version,
        }))
    }
}
