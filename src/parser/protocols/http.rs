//! HTTP proxy parser
//!
//! Format: http://[user:pass@]host:port?params#tag, or https:// for TLS

use tracing::trace;

use crate::config::{HttpProxy, IpVersion, ProxyConfig, default_name};
use crate::error::Result;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{UriParts, is_truthy, non_blank};

use super::{ProtocolParser, split_credentials};

const PROTOCOL: Protocol = Protocol::Http;

/// Parser for HTTP (http:// or https://) proxy URIs
pub struct HttpParser;

impl ProtocolParser for HttpParser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing HTTP proxy URI");
        let (scheme, rest) = self.strip_scheme(uri)?;
        let parts = UriParts::tokenize(rest, PROTOCOL, false)?;

        let server = parts.host.to_string();
        let port = parts.port_or(PROTOCOL, None)?;
        let (username, password) = split_credentials(parts.auth);

        let params = parts.params();
        let mut tls = scheme.eq_ignore_ascii_case("https");
        let mut sni = None;
        let mut skip_cert_verify = false;
        let mut fingerprint = None;
        let mut ip_version = IpVersion::default();
        for (key, value) in params.iter() {
            match key {
                "tls" => tls |= is_truthy(value),
                "sni" => sni = non_blank(value),
                "skip-cert-verify" | "allow-insecure" => skip_cert_verify = is_truthy(value),
                "fingerprint" => fingerprint = non_blank(value),
                "ip-version" => ip_version = IpVersion::parse(value).unwrap_or_default(),
                _ => trace!("Ignoring HTTP query parameter '{}'", key),
            }
        }

        let name = parts
            .name()
            .unwrap_or_else(|| default_name(PROTOCOL, &server, port));

        Ok(ProxyConfig::Http(HttpProxy {
            name,
            server,
            port,
            username,
            password,
            tls,
            sni,
            skip_cert_verify,
            fingerprint,
            ip_version,
        }))
    }
}
