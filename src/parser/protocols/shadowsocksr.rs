//! ShadowsocksR protocol parser
//!
//! Format: ssr://BASE64(host:port:protocol:method:obfs:BASE64(password)/?params)

use tracing::trace;

use crate::config::{ProxyConfig, ShadowsocksRProxy, default_name};
use crate::error::{ParseError, Result};
use crate::parser::base64::decode_base64_or_literal;
use crate::parser::scheme::Protocol;
use crate::parser::uri::{QueryParams, parse_port};

use super::{ProtocolParser, normalize_cipher};

const PROTOCOL: Protocol = Protocol::ShadowsocksR;

/// Parser for ShadowsocksR (ssr://) URIs
///
/// The whole body is Base64. Inside it the server part is colon separated and
/// parsed from the right, so IPv6 hosts with their own colons stay intact.
/// Optional parameters (`remarks`, `protoparam`, `obfsparam`) are Base64 too.
pub struct ShadowsocksRParser;

impl ProtocolParser for ShadowsocksRParser {
    fn protocol(&self) -> Protocol {
        PROTOCOL
    }

    fn parse(&self, uri: &str) -> Result<ProxyConfig> {
        trace!("Parsing ShadowsocksR URI");
        let (_, rest) = self.strip_scheme(uri)?;
        let decoded = decode_base64_or_literal(rest);

        let (main, query) = match decoded.split_once("/?") {
            Some((main, query)) => (main, Some(query)),
            None => match decoded.split_once('?') {
                Some((main, query)) => (main, Some(query)),
                None => (decoded.as_str(), None),
            },
        };
        let main = main.trim_end_matches('/');

        // host:port:protocol:method:obfs:password, right to left
        let mut fields = main.rsplitn(6, ':');
        let mut next = |what: &str| {
            fields
                .next()
                .ok_or_else(|| ParseError::invalid_uri(PROTOCOL, format!("missing {what}")))
        };
        let password_b64 = next("password")?;
        let obfs = next("obfs")?;
        let cipher = next("method")?;
        let ssr_protocol = next("protocol")?;
        let port_token = next("port")?;
        let host = next("server")?;

        let host = host.trim_start_matches('[').trim_end_matches(']');
        if host.is_empty() {
            return Err(ParseError::invalid_uri(PROTOCOL, "missing server"));
        }
        let port = parse_port(PROTOCOL, port_token)?;

        let mut name = None;
        let mut protocol_param = None;
        let mut obfs_param = None;
        let params = QueryParams::parse(query.unwrap_or_default());
        for (key, value) in params.iter() {
            match key {
                "remarks" => name = decoded_param(value),
                "protoparam" => protocol_param = decoded_param(value).map(strip_whitespace),
                "obfsparam" => obfs_param = decoded_param(value).map(strip_whitespace),
                _ => trace!("Ignoring ShadowsocksR parameter '{}'", key),
            }
        }

        let server = host.to_string();
        let name = name.unwrap_or_else(|| default_name(PROTOCOL, &server, port));

        Ok(ProxyConfig::ShadowsocksR(ShadowsocksRProxy {
            name,
            server,
            port,
            cipher: normalize_cipher(Some(cipher)),
            password: decode_base64_or_literal(password_b64),
            protocol: ssr_protocol.to_string(),
            obfs: obfs.to_string(),
            protocol_param: protocol_param.filter(|p| !p.is_empty()),
            obfs_param: obfs_param.filter(|p| !p.is_empty()),
        }))
    }
}

/// Base64-decodes an optional parameter; blank means absent.
fn decoded_param(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    let decoded = decode_base64_or_literal(value);
    let decoded = decoded.trim();
    (!decoded.is_empty()).then(|| decoded.to_string())
}

fn strip_whitespace(value: String) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}
